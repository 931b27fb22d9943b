use reqwest::{Client, Response};
use serde_json::from_str;

use super::error::TurnstileError;
use super::types::SiteVerifyResponse;

pub struct TurnstileClient {
    secret: String,
    domain: String,
}

impl TurnstileClient {
    pub fn new(secret: String, domain: String) -> TurnstileClient {
        TurnstileClient { secret, domain }
    }

    /// A non-2xx status always counts as a failed verification.
    pub async fn verify(
        &self,
        token: &str,
        remote_ip: Option<&str>,
    ) -> Result<SiteVerifyResponse, TurnstileError> {
        let url = format!("{}/turnstile/v0/siteverify", self.domain);

        let mut form = vec![("secret", self.secret.as_str()), ("response", token)];
        if let Some(remote_ip) = remote_ip {
            form.push(("remoteip", remote_ip));
        }

        let resp: Response = Client::new().post(&url).form(&form).send().await?;
        let ok = resp.status().is_success();

        let mut verification: SiteVerifyResponse = from_str(&resp.text().await?)?;
        if !ok {
            verification.success = false;
        }
        Ok(verification)
    }
}
