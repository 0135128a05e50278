use serde::Deserialize;

/// Credentials guarding the admin routes
#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    /// HTTP Basic username
    pub username: String,

    /// HTTP Basic password
    pub password: String,
}

impl AuthConfig {
    /// Validate authentication configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.username.is_empty() {
            return Err("BASIC_AUTH_USERNAME must not be empty".to_string());
        }

        if self.username.contains(':') {
            return Err("BASIC_AUTH_USERNAME must not contain ':'".to_string());
        }

        if self.password.is_empty() {
            return Err("BASIC_AUTH_PASSWORD must not be empty".to_string());
        }

        Ok(())
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}
