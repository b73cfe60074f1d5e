use thiserror::Error;

/// Environment variable holding the basic-auth username.
pub const USERNAME_VAR: &str = "BITBUCKET_USERNAME";
/// Environment variable holding the basic-auth password.
pub const PASSWORD_VAR: &str = "BITBUCKET_PASSWORD";

/// Lines written to standard error when credentials are missing.
pub const USAGE_LINES: [&str; 3] = [
    "No BitBucket credentials in environment:",
    "$ export BITBUCKET_USERNAME=\"your username\"",
    "$ export BITBUCKET_PASSWORD=\"your password\"",
];

#[derive(Debug, Error, PartialEq)]
pub enum CredentialsError {
    #[error("Environment variable {name} is not set")]
    Missing { name: &'static str },
}

/// Basic-auth credentials for the Bitbucket API.
#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Loads credentials through `lookup`, which maps a variable name to its value.
    ///
    /// Presence is the only check. Whether the pair is accepted is only known
    /// once the API answers.
    ///
    /// # Returns
    ///
    /// * `Ok(Credentials)` if both variables are present.
    /// * `Err(CredentialsError::Missing)` naming the first absent variable.
    pub fn load<F>(lookup: F) -> Result<Self, CredentialsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let username = lookup(USERNAME_VAR).ok_or(CredentialsError::Missing {
            name: USERNAME_VAR,
        })?;
        let password = lookup(PASSWORD_VAR).ok_or(CredentialsError::Missing {
            name: PASSWORD_VAR,
        })?;
        Ok(Credentials { username, password })
    }
}
