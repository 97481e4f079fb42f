//! Data-orchestration layer of the MoySklad client SDK.
//!
//! The [`domain`] module turns raw remote documents into typed entities and
//! composite views; [`outbound`] holds the reqwest transport and [`config`]
//! the settings that build it.

pub mod config;
pub mod domain;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
