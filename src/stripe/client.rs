use reqwest::{Client, Response};
use serde_json::from_str;

use super::error::StripeError;
use super::types::{CheckoutParams, CheckoutSession};

pub struct StripeClient {
    secret_key: String,
    domain: String,
}

impl StripeClient {
    pub fn new(secret_key: String, domain: String) -> StripeClient {
        StripeClient { secret_key, domain }
    }

    pub async fn create_checkout_session(
        &self,
        params: &CheckoutParams<'_>,
    ) -> Result<CheckoutSession, StripeError> {
        let url = format!("{}/v1/checkout/sessions", self.domain);
        let resp: Response = Client::new()
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&params.form())
            .send()
            .await?;

        if resp.status().is_success() {
            let session: CheckoutSession = from_str(&resp.text().await?)?;
            Ok(session)
        } else {
            Err(resp.text().await?.into())
        }
    }
}
