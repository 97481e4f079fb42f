//! Reqwest-backed implementation of the transport port.

mod dto;
mod query;
mod transport;

pub use transport::{HttpIdentity, HttpTransport};
