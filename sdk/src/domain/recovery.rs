//! Per-call recovery policy for well-known remote failures.
//!
//! The same API error code means different things on different endpoints,
//! so recovery is attached to individual calls rather than applied globally.

use tracing::{debug, warn};

use super::error::{Error, SdkResult};
use super::ports::{Endpoint, TransportError};

/// Message shown when the account plan does not cover currency management.
pub const CURRENCY_PLAN_RESTRICTION: &str =
    "access to currencies is not available on the current plan";

/// Recovery combinators for data-service results.
pub trait Recovery<T>: Sized {
    /// Rewrite an access denial into a plan restriction carrying `message`.
    ///
    /// # Errors
    /// Returns [`Error::PlanRestriction`] for access denials and every other
    /// error unchanged.
    fn remap_access_denied(self, endpoint: Endpoint, message: &str) -> SdkResult<T>;

    /// Swallow a CRM access denial, substituting `fallback()`.
    ///
    /// # Errors
    /// Returns every error other than a CRM access denial unchanged.
    fn suppress_crm_access_denied<F>(self, endpoint: Endpoint, fallback: F) -> SdkResult<T>
    where
        F: FnOnce() -> T;
}

impl<T> Recovery<T> for SdkResult<T> {
    fn remap_access_denied(self, endpoint: Endpoint, message: &str) -> SdkResult<T> {
        self.map_err(|error| {
            if error
                .as_transport()
                .is_some_and(TransportError::is_access_denied)
            {
                debug!(endpoint = %endpoint, "remapped access denial to plan restriction");
                return Error::plan_restriction(message);
            }
            error
        })
    }

    fn suppress_crm_access_denied<F>(self, endpoint: Endpoint, fallback: F) -> SdkResult<T>
    where
        F: FnOnce() -> T,
    {
        match self {
            Err(error)
                if error
                    .as_transport()
                    .is_some_and(TransportError::is_crm_access_denied) =>
            {
                warn!(endpoint = %endpoint, "CRM access denied; continuing without enrichment");
                Ok(fallback())
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{ApiError, ACCESS_DENIED_CODE, CRM_ACCESS_DENIED_CODE};
    use rstest::rstest;

    fn denied(code: u32) -> Error {
        Error::from(TransportError::api(403_u16, vec![ApiError::new(code, "denied")]))
    }

    #[rstest]
    fn access_denial_becomes_plan_restriction() {
        let result: SdkResult<()> = Err(denied(ACCESS_DENIED_CODE));
        let remapped = result.remap_access_denied(Endpoint::Currency, CURRENCY_PLAN_RESTRICTION);
        assert_eq!(remapped, Err(Error::plan_restriction(CURRENCY_PLAN_RESTRICTION)));
    }

    #[rstest]
    #[case::crm(denied(CRM_ACCESS_DENIED_CODE))]
    #[case::network(Error::from(TransportError::timeout("slow")))]
    #[case::integrity(Error::integrity(Endpoint::Currency, 0, 1))]
    fn remap_leaves_other_failures_alone(#[case] error: Error) {
        let result: SdkResult<()> = Err(error.clone());
        assert_eq!(
            result.remap_access_denied(Endpoint::Currency, CURRENCY_PLAN_RESTRICTION),
            Err(error)
        );
    }

    #[rstest]
    fn crm_denial_is_suppressed_to_fallback() {
        let result: SdkResult<Vec<u8>> = Err(denied(CRM_ACCESS_DENIED_CODE));
        assert_eq!(
            result.suppress_crm_access_denied(Endpoint::CounterpartyReport, Vec::new),
            Ok(Vec::new())
        );
    }

    #[rstest]
    #[case::plain_denial(denied(ACCESS_DENIED_CODE))]
    #[case::status(Error::from(TransportError::status(500_u16, "boom")))]
    fn suppression_is_specific_to_crm_denials(#[case] error: Error) {
        let result: SdkResult<Vec<u8>> = Err(error.clone());
        assert_eq!(
            result.suppress_crm_access_denied(Endpoint::CounterpartyReport, Vec::new),
            Err(error)
        );
    }

    #[rstest]
    fn successes_pass_through_both_policies() {
        let result: SdkResult<u8> = Ok(7);
        let result = result
            .remap_access_denied(Endpoint::Currency, CURRENCY_PLAN_RESTRICTION)
            .suppress_crm_access_denied(Endpoint::Currency, || 0);
        assert_eq!(result, Ok(7));
    }
}
