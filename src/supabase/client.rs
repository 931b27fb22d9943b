use reqwest::{Client, RequestBuilder, Response};
use serde_json::{from_str, Value};

use super::error::SupabaseError;
use super::types::{Credentials, Session, SignUp, User};

/// Client for the Supabase auth (GoTrue) API.
pub struct SupabaseClient {
    anon_key: String,
    domain: String,
}

impl SupabaseClient {
    pub fn new(anon_key: String, domain: String) -> SupabaseClient {
        SupabaseClient {
            anon_key,
            domain: domain.trim_end_matches('/').to_string(),
        }
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("apikey", &self.anon_key)
    }

    /// Resolves the user behind an access token.
    pub async fn get_user(&self, access_token: &str) -> Result<User, SupabaseError> {
        let url = format!("{}/auth/v1/user", self.domain);
        let resp: Response = self
            .request(Client::new().get(&url))
            .bearer_auth(access_token)
            .send()
            .await?;

        if resp.status().is_success() {
            let user: User = from_str(&resp.text().await?)?;
            Ok(user)
        } else {
            Err(resp.text().await?.into())
        }
    }

    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, SupabaseError> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.domain);
        let resp: Response = self
            .request(Client::new().post(&url))
            .bearer_auth(&self.anon_key)
            .json(&Credentials { email, password })
            .send()
            .await?;

        if resp.status().is_success() {
            let session: Session = from_str(&resp.text().await?)?;
            Ok(session)
        } else {
            Err(resp.text().await?.into())
        }
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUp, SupabaseError> {
        let url = format!("{}/auth/v1/signup", self.domain);
        let resp: Response = self
            .request(Client::new().post(&url))
            .bearer_auth(&self.anon_key)
            .json(&Credentials { email, password })
            .send()
            .await?;

        if resp.status().is_success() {
            let value: Value = from_str(&resp.text().await?)?;
            Ok(SignUp::from_value(value)?)
        } else {
            Err(resp.text().await?.into())
        }
    }
}
