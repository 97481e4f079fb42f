//! SDK connection settings loaded via OrthoConfig.
//!
//! Values come from `MOYSKLAD_*` environment variables, configuration files
//! or command-line flags; anything left unset falls back to the public API
//! defaults.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::outbound::http::{HttpIdentity, HttpTransport};

const DEFAULT_BASE_URL: &str = "https://online.moysklad.ru/api/remap/1.1/";
const DEFAULT_USER_AGENT: &str = "moysklad-sdk/0.1";

/// Errors raised while turning settings into a transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportSetupError {
    /// The configured API root is not a valid URL.
    #[error("invalid base url {url}: {source}")]
    InvalidBaseUrl {
        /// Offending value.
        url: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
    /// The HTTP client could not be constructed.
    #[error("http client could not be built: {0}")]
    Client(#[from] reqwest::Error),
}

/// Configuration values controlling how the SDK reaches the remote API.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MOYSKLAD")]
pub struct SdkSettings {
    /// API root every endpoint is resolved against.
    pub base_url: Option<String>,
    /// Per-request timeout in seconds.
    #[ortho_config(default = 30, file_key = "timeout_seconds")]
    pub request_timeout_seconds: u64,
    /// User-agent header sent with every request.
    pub user_agent: Option<String>,
}

impl SdkSettings {
    /// Return the configured API root, falling back to the public one.
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Return the configured request timeout, never shorter than a second.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds.max(1))
    }

    /// Return the configured user-agent, falling back to the default.
    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    /// Build the HTTP transport these settings describe.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL does not parse or the HTTP client
    /// cannot be constructed.
    pub fn http_transport(&self) -> Result<HttpTransport, TransportSetupError> {
        let base_url =
            Url::parse(self.base_url()).map_err(|source| TransportSetupError::InvalidBaseUrl {
                url: self.base_url().to_owned(),
                source,
            })?;
        let identity = HttpIdentity {
            user_agent: self.user_agent().to_owned(),
        };
        Ok(HttpTransport::with_identity(
            base_url,
            self.request_timeout(),
            identity,
        )?)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for SDK settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

    fn load_from_args(program: &str) -> SdkSettings {
        SdkSettings::load_from_iter([OsString::from(program)]).expect("config should load")
    }

    fn load_from_empty_args() -> SdkSettings {
        load_from_args("moysklad-sdk")
    }

    #[rstest]
    #[case::library("moysklad-sdk")]
    #[case::login_probe("login-probe")]
    fn default_values_are_used_when_missing(#[case] program: &str) {
        let _guard = lock_env([
            ("MOYSKLAD_BASE_URL", None::<String>),
            ("MOYSKLAD_REQUEST_TIMEOUT_SECONDS", None::<String>),
            ("MOYSKLAD_USER_AGENT", None::<String>),
        ]);

        let settings = load_from_args(program);
        assert_eq!(settings.base_url(), DEFAULT_BASE_URL);
        assert_eq!(
            settings.request_timeout(),
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECONDS)
        );
        assert_eq!(settings.user_agent(), DEFAULT_USER_AGENT);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            (
                "MOYSKLAD_BASE_URL",
                Some("https://staging.example.test/api/".to_owned()),
            ),
            ("MOYSKLAD_REQUEST_TIMEOUT_SECONDS", Some("5".to_owned())),
            ("MOYSKLAD_USER_AGENT", Some("probe/2".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.base_url(), "https://staging.example.test/api/");
        assert_eq!(settings.request_timeout(), Duration::from_secs(5));
        assert_eq!(settings.user_agent(), "probe/2");
    }

    #[rstest]
    fn zero_timeouts_are_raised_to_one_second() {
        let settings = SdkSettings {
            base_url: None,
            request_timeout_seconds: 0,
            user_agent: None,
        };
        assert_eq!(settings.request_timeout(), Duration::from_secs(1));
    }

    #[rstest]
    fn invalid_base_urls_are_rejected() {
        let settings = SdkSettings {
            base_url: Some("not a url".to_owned()),
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
            user_agent: None,
        };
        let error = settings
            .http_transport()
            .expect_err("invalid url must fail");
        assert!(matches!(error, TransportSetupError::InvalidBaseUrl { .. }));
    }

    #[rstest]
    fn default_settings_build_a_transport() {
        let settings = SdkSettings {
            base_url: None,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
            user_agent: None,
        };
        let transport = settings.http_transport().expect("transport should build");
        assert_eq!(transport.base_url().as_str(), DEFAULT_BASE_URL);
    }
}
