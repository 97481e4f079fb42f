//! DTOs for decoding the remote's structured error bodies.
//!
//! Failed responses usually carry `{"errors": [{"error": ..., "code": ...}]}`;
//! the adapter decodes that shape first and falls back to a body preview when
//! it does not match.

use serde::{Deserialize, Serialize};

use crate::domain::ports::{ApiError, ApiErrors};

#[derive(Debug, Deserialize)]
pub(super) struct ErrorBodyDto {
    #[serde(default)]
    pub(super) errors: Vec<ErrorEntryDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorEntryDto {
    pub(super) error: String,
    #[serde(default)]
    pub(super) code: u32,
}

impl ErrorBodyDto {
    /// Domain error list, or `None` when the body listed no errors.
    pub(super) fn into_api_errors(self) -> Option<ApiErrors> {
        if self.errors.is_empty() {
            return None;
        }
        Some(
            self.errors
                .into_iter()
                .map(|entry| ApiError::new(entry.code, entry.error))
                .collect::<Vec<_>>()
                .into(),
        )
    }
}

#[derive(Debug, Serialize)]
pub(super) struct RegisterRequestDto<'a> {
    pub(super) email: &'a str,
}
