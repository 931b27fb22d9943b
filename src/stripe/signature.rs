//! Verification of the `Stripe-Signature` header sent with webhook events.

use std::error::Error;
use std::fmt;
use std::fmt::Formatter;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

/// Maximum age, in seconds, of a signed event.
pub const TOLERANCE_SECONDS: i64 = 300;

#[derive(Debug, PartialEq)]
pub enum SignatureError {
    MalformedHeader,
    OutsideTolerance,
    InvalidSecret,
    Mismatch,
}

impl Error for SignatureError {}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SignatureError::MalformedHeader => write!(f, "invalid signature header format"),
            SignatureError::OutsideTolerance => write!(f, "timestamp outside tolerance window"),
            SignatureError::InvalidSecret => write!(f, "invalid webhook secret"),
            SignatureError::Mismatch => write!(f, "no matching signature"),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct SignatureHeader {
    pub timestamp: i64,
    pub signatures: Vec<String>,
}

/// Parses `t=<unix seconds>,v1=<hex>[,v1=<hex>...]`. Unknown schemes are ignored.
pub fn parse_signature_header(header: &str) -> Result<SignatureHeader, SignatureError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => {
                timestamp = Some(
                    value
                        .parse::<i64>()
                        .map_err(|_| SignatureError::MalformedHeader)?,
                )
            }
            Some(("v1", value)) if !value.is_empty() => signatures.push(value.to_string()),
            _ => {}
        }
    }

    match timestamp {
        Some(timestamp) if !signatures.is_empty() => Ok(SignatureHeader {
            timestamp,
            signatures,
        }),
        _ => Err(SignatureError::MalformedHeader),
    }
}

/// Hex encoded HMAC-SHA256 of `"{timestamp}.{payload}"`.
pub fn compute_signature(
    secret: &str,
    timestamp: i64,
    payload: &str,
) -> Result<String, SignatureError> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|_| SignatureError::InvalidSecret)?;
    mac.update(format!("{}.{}", timestamp, payload).as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

pub fn verify_signature(
    payload: &str,
    header: &str,
    secret: &str,
    now: i64,
) -> Result<(), SignatureError> {
    let header = parse_signature_header(header)?;

    if now.abs_diff(header.timestamp) > TOLERANCE_SECONDS as u64 {
        return Err(SignatureError::OutsideTolerance);
    }

    let expected = compute_signature(secret, header.timestamp, payload)?;
    let matched = header
        .signatures
        .iter()
        .any(|candidate| bool::from(expected.as_bytes().ct_eq(candidate.as_bytes())));

    if matched {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}
