//! Data service: the orchestration entry point.
//!
//! The service holds only its collaborators. Credentials travel with every
//! call, so one service instance can serve any number of sessions.

use std::sync::Arc;

use chrono::NaiveDateTime;
use mockable::Clock;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::auth::Auth;
use super::decode_gate::{decode_entity_rows, decode_single};
use super::entity::EntityRef;
use super::error::SdkResult;
use super::ports::{Endpoint, Transport};
use super::url_parameters::UrlParameter;

/// Orchestrates remote reads into typed results and composite views.
#[derive(Clone)]
pub struct DataService {
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
}

impl DataService {
    /// Create a service over `transport`, reading "now" from `clock`.
    pub fn new(transport: Arc<dyn Transport>, clock: Arc<dyn Clock>) -> Self {
        Self { transport, clock }
    }

    /// Current wall-clock time.
    pub(crate) fn now(&self) -> NaiveDateTime {
        self.clock.local().naive_local()
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Issue one read and surface transport failures as domain errors.
    pub(crate) async fn fetch(
        &self,
        endpoint: Endpoint,
        auth: &Auth,
        path: &[String],
        parameters: &[UrlParameter],
    ) -> SdkResult<Value> {
        debug!(endpoint = %endpoint, segments = path.len(), parameters = parameters.len(), "fetching");
        let document = self
            .transport
            .get(endpoint, auth, path, parameters)
            .await?;
        Ok(document)
    }

    /// Fetch a list endpoint and strictly decode its rows.
    pub(crate) async fn fetch_rows<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        auth: &Auth,
        path: &[String],
        parameters: &[UrlParameter],
    ) -> SdkResult<Vec<EntityRef<T>>> {
        let document = self.fetch(endpoint, auth, path, parameters).await?;
        decode_entity_rows(&document, endpoint)
    }

    /// Fetch a single-record endpoint.
    pub(crate) async fn fetch_single<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        auth: &Auth,
        path: &[String],
        parameters: &[UrlParameter],
    ) -> SdkResult<EntityRef<T>> {
        let document = self.fetch(endpoint, auth, path, parameters).await?;
        decode_single(&document, endpoint)
    }
}

impl std::fmt::Debug for DataService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataService").finish_non_exhaustive()
    }
}
