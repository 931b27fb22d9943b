use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Sign-up yields a session right away unless email confirmation is on,
/// in which case only the user comes back.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SignUp {
    pub user: Option<User>,
    pub session: Option<Session>,
}

impl SignUp {
    pub fn from_value(value: Value) -> Result<SignUp, serde_json::Error> {
        if value.get("access_token").is_some() {
            let session: Session = serde_json::from_value(value)?;
            return Ok(SignUp {
                user: Some(session.user.clone()),
                session: Some(session),
            });
        }

        let user = match value.get("user") {
            Some(user) if !user.is_null() => serde_json::from_value(user.clone())?,
            _ => serde_json::from_value(value)?,
        };
        Ok(SignUp {
            user: Some(user),
            session: None,
        })
    }
}
