//! Authentication primitives handed to every remote call.
//!
//! Credentials are validated on construction so the transport never sends a
//! request with a blank username or password.

use std::fmt;

use zeroize::Zeroizing;

/// Error returned when credential values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
    /// Access token was blank once trimmed.
    EmptyToken,
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::EmptyToken => write!(f, "access token must not be empty"),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

/// Validated username/password pair.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` must be non-empty; caller-provided whitespace is kept.
///
/// # Examples
/// ```
/// use moysklad_sdk::domain::Credentials;
///
/// let creds = Credentials::try_from_parts(" admin@shop ", "secret").unwrap();
/// assert_eq!(creds.username(), "admin@shop");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(CredentialsValidationError::EmptyUsername);
        }

        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Login name sent to the remote.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Authentication attached to a remote call.
#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    /// HTTP basic authentication.
    Basic(Credentials),
    /// Bearer access token.
    Token(Zeroizing<String>),
}

impl Auth {
    /// Basic authentication from raw username/password inputs.
    pub fn basic(username: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        Credentials::try_from_parts(username, password).map(Self::Basic)
    }

    /// Bearer authentication from a raw access token.
    pub fn token(token: &str) -> Result<Self, CredentialsValidationError> {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(CredentialsValidationError::EmptyToken);
        }
        Ok(Self::Token(Zeroizing::new(trimmed.to_owned())))
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic(credentials) => f.debug_tuple("Basic").field(credentials).finish(),
            Self::Token(_) => f.debug_tuple("Token").field(&"<redacted>").finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", CredentialsValidationError::EmptyUsername)]
    #[case("   ", "pw", CredentialsValidationError::EmptyUsername)]
    #[case("user", "", CredentialsValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: CredentialsValidationError,
    ) {
        let err = Credentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  admin@shop  ", "secret")]
    #[case("clerk@shop", " spaced password ")]
    fn valid_credentials_trim_username_only(#[case] username: &str, #[case] password: &str) {
        let creds = Credentials::try_from_parts(username, password)
            .expect("valid inputs should succeed");
        assert_eq!(creds.username(), username.trim());
        assert_eq!(creds.password(), password);
    }

    #[rstest]
    fn blank_tokens_are_rejected() {
        assert_eq!(Auth::token("  "), Err(CredentialsValidationError::EmptyToken));
    }

    #[rstest]
    fn debug_output_never_contains_secrets() {
        let basic = Auth::basic("admin", "hunter2").expect("valid credentials");
        let token = Auth::token("tok-123").expect("valid token");

        assert!(!format!("{basic:?}").contains("hunter2"));
        assert!(!format!("{token:?}").contains("tok-123"));
    }
}
