use serde::{Deserialize, Serialize};

/// Form body for password login. `username` carries the email, following
/// the OAuth2 password-grant field names.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Form body for registration.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub name: Option<String>,
}

/// Query received on the provider callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: String,
}

/// Response returned after any successful authentication.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_response_serializes_bearer_type() {
        let json = serde_json::to_string(&TokenResponse::bearer("abc".into())).unwrap();
        assert!(json.contains(r#""access_token":"abc""#));
        assert!(json.contains(r#""token_type":"bearer""#));
    }
}
