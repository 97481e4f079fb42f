//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod transport;

#[cfg(test)]
pub use transport::MockTransport;
pub use transport::{
    ACCESS_DENIED_CODE, ApiError, ApiErrors, CRM_ACCESS_DENIED_CODE, Endpoint, Transport,
    TransportError,
};
