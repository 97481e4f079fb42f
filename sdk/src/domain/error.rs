//! Terminal failures of data-service operations.
//!
//! Every composite call ends in either its full result or exactly one of
//! these errors. Suppressed failures never surface here; they are turned into
//! defaults by the recovery policy before reaching the caller.

use serde::{Deserialize, Serialize};

use super::ports::{Endpoint, TransportError};

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The transport failed below this layer.
    Transport,
    /// The response did not have the expected document shape.
    MalformedEnvelope,
    /// Some records of a response array could not be decoded.
    Integrity,
    /// The account's plan does not include the requested feature.
    PlanRestriction,
    /// The caller asked for something the remote cannot serve.
    InvalidRequest,
}

/// Errors returned by data-service operations.
///
/// # Examples
/// ```
/// use moysklad_sdk::domain::ports::Endpoint;
/// use moysklad_sdk::domain::{Error, ErrorCode};
///
/// let err = Error::integrity(Endpoint::Store, 1, 2);
/// assert_eq!(err.code(), ErrorCode::Integrity);
/// assert_eq!(err.to_string(), "entity/store returned 2 rows but only 1 decoded");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The transport reported a failure.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The response lacked the expected document shape.
    #[error("incorrect response from {endpoint}")]
    MalformedEnvelope {
        /// Endpoint that produced the response.
        endpoint: Endpoint,
    },
    /// The response array held rows that did not decode.
    #[error("{endpoint} returned {total} rows but only {decoded} decoded")]
    Integrity {
        /// Endpoint that produced the response.
        endpoint: Endpoint,
        /// Rows decoded successfully.
        decoded: usize,
        /// Rows present in the response.
        total: usize,
    },
    /// A known failure rewritten into a plan restriction.
    #[error("{message}")]
    PlanRestriction {
        /// Explanation shown to the user.
        message: String,
    },
    /// The request cannot be issued as asked.
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// What was wrong with the request.
        message: String,
    },
    /// A single-record fetch returned a bare reference where the full
    /// object is required.
    #[error("{endpoint} returned an unresolved reference")]
    UnexpectedReference {
        /// Endpoint that produced the response.
        endpoint: Endpoint,
    },
}

impl Error {
    /// Malformed envelope from `endpoint`.
    pub fn malformed(endpoint: Endpoint) -> Self {
        Self::MalformedEnvelope { endpoint }
    }

    /// Integrity failure: `decoded` of `total` rows survived decoding.
    pub fn integrity(endpoint: Endpoint, decoded: usize, total: usize) -> Self {
        Self::Integrity {
            endpoint,
            decoded,
            total,
        }
    }

    /// Plan restriction with a user-facing `message`.
    pub fn plan_restriction(message: impl Into<String>) -> Self {
        Self::PlanRestriction {
            message: message.into(),
        }
    }

    /// Invalid request with a `message` naming the problem.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Unresolved reference returned by `endpoint`.
    pub fn unexpected_reference(endpoint: Endpoint) -> Self {
        Self::UnexpectedReference { endpoint }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Transport(_) => ErrorCode::Transport,
            Self::MalformedEnvelope { .. } | Self::UnexpectedReference { .. } => {
                ErrorCode::MalformedEnvelope
            }
            Self::Integrity { .. } => ErrorCode::Integrity,
            Self::PlanRestriction { .. } => ErrorCode::PlanRestriction,
            Self::InvalidRequest { .. } => ErrorCode::InvalidRequest,
        }
    }

    /// The underlying transport failure, if this error wraps one.
    pub fn as_transport(&self) -> Option<&TransportError> {
        match self {
            Self::Transport(error) => Some(error),
            _ => None,
        }
    }
}

/// Result alias for data-service operations.
pub type SdkResult<T> = Result<T, Error>;
