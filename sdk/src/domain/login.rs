//! Session operations: registration, metadata loading and log-in.
//!
//! Log-in fans out five independent reads and joins them into one
//! [`LogInInfo`]. The join is fail-fast: the first unrecovered failure ends
//! the call and drops the reads still in flight.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use super::auth::Auth;
use super::decode_gate::{decode_rows, RowPolicy, ROWS_FIELD};
use super::entity::{decode_entity_value, decode_value, ObjectType};
use super::error::{Error, SdkResult};
use super::metadata::{aggregate_metadata, MetadataIndex};
use super::model::{
    AttributeDefinition, CompanySettings, Currency, Employee, Group, RegistrationResult, State,
};
use super::ports::Endpoint;
use super::recovery::{Recovery, CURRENCY_PLAN_RESTRICTION};
use super::service::DataService;
use super::url_parameters::{Expander, Offset, UrlParameter};

/// Page window of the reference lists read during log-in.
const LOGIN_PAGE: Offset = Offset::new(100, 100, 0);
/// Page window of the metadata document.
const METADATA_PAGE: Offset = Offset::new(0, 100, 0);

/// Static data loaded once per successful log-in.
#[derive(Debug, Clone, PartialEq)]
pub struct LogInInfo {
    /// The employee owning the credentials.
    pub employee: Employee,
    pub company_settings: CompanySettings,
    /// Valid workflow states per entity kind.
    pub states: HashMap<ObjectType, Vec<State>>,
    /// Custom attribute definitions per entity kind.
    pub attributes: HashMap<ObjectType, Vec<AttributeDefinition>>,
    /// Currencies keyed by href without query parameters.
    pub currencies: HashMap<String, Currency>,
    pub counterparty_tags: Vec<String>,
    /// Price type names of products.
    pub price_types: Vec<String>,
    /// Groups keyed by href without query parameters.
    pub groups: HashMap<String, Group>,
    /// Default-sharing flag per entity kind.
    pub create_shared: HashMap<ObjectType, bool>,
}

impl LogInInfo {
    /// Combine the five log-in reads. Each argument fills its own slots, so
    /// the result does not depend on which read finished first.
    pub fn assemble(
        employee: Employee,
        company_settings: CompanySettings,
        currencies: Vec<Currency>,
        metadata: MetadataIndex,
        groups: Vec<Group>,
    ) -> Self {
        let counterparty_tags = metadata
            .get(ObjectType::Counterparty)
            .map(|m| m.tags.clone())
            .unwrap_or_default();
        let price_types = metadata
            .get(ObjectType::Product)
            .map(|m| m.price_types.clone())
            .unwrap_or_default();

        let mut states = HashMap::with_capacity(metadata.len());
        let mut attributes = HashMap::with_capacity(metadata.len());
        let mut create_shared = HashMap::with_capacity(metadata.len());
        for result in metadata {
            states.insert(result.kind, result.states);
            attributes.insert(result.kind, result.attributes);
            create_shared.insert(result.kind, result.create_shared);
        }

        Self {
            employee,
            company_settings,
            states,
            attributes,
            currencies: currencies
                .into_iter()
                .map(|currency| (currency.meta.href_without_parameters().to_owned(), currency))
                .collect(),
            counterparty_tags,
            price_types,
            groups: groups
                .into_iter()
                .map(|group| (group.meta.href_without_parameters().to_owned(), group))
                .collect(),
            create_shared,
        }
    }
}

impl DataService {
    /// Register a new account for `email`.
    ///
    /// # Errors
    /// Transport failures, or [`Error::MalformedEnvelope`] when the response
    /// is not a registration record.
    pub async fn register(&self, email: &str) -> SdkResult<RegistrationResult> {
        let document = self.transport().register(email).await?;
        if !document.is_object() {
            return Err(Error::malformed(Endpoint::Register));
        }
        decode_value(&document).ok_or_else(|| Error::malformed(Endpoint::Register))
    }

    /// Log in: load the employee, company settings, currencies, metadata and
    /// groups concurrently and combine them.
    ///
    /// # Errors
    /// The first failure among the five reads. An access denial on the
    /// currency list surfaces as [`Error::PlanRestriction`].
    pub async fn log_in(&self, auth: &Auth) -> SdkResult<LogInInfo> {
        debug!("log-in fan-out started");
        let (employee, company_settings, currencies, metadata, groups) = tokio::try_join!(
            self.context_employee(auth),
            self.company_settings(auth),
            self.login_currencies(auth),
            self.load_metadata(auth),
            self.login_groups(auth),
        )?;
        debug!(
            currencies = currencies.len(),
            groups = groups.len(),
            kinds = metadata.len(),
            "log-in fan-out joined"
        );
        Ok(LogInInfo::assemble(
            employee,
            company_settings,
            currencies,
            metadata,
            groups,
        ))
    }

    /// Load metadata of every kind in [`METADATA_KINDS`](super::METADATA_KINDS).
    ///
    /// A response that is not an object yields an empty index.
    ///
    /// # Errors
    /// Transport failures only.
    pub async fn load_metadata(&self, auth: &Auth) -> SdkResult<MetadataIndex> {
        let document = self
            .fetch(
                Endpoint::EntityMetadata,
                auth,
                &[],
                &[UrlParameter::Offset(METADATA_PAGE)],
            )
            .await?;
        Ok(aggregate_metadata(&document))
    }

    async fn context_employee(&self, auth: &Auth) -> SdkResult<Employee> {
        let endpoint = Endpoint::ContextEmployee;
        self.fetch_single::<Employee>(endpoint, auth, &[], &[])
            .await?
            .into_value()
            .ok_or_else(|| Error::unexpected_reference(endpoint))
    }

    async fn company_settings(&self, auth: &Auth) -> SdkResult<CompanySettings> {
        let endpoint = Endpoint::CompanySettings;
        let parameters = [UrlParameter::Expand(vec![Expander::new("currency")])];
        self.fetch_single::<CompanySettings>(endpoint, auth, &[], &parameters)
            .await?
            .into_value()
            .ok_or_else(|| Error::unexpected_reference(endpoint))
    }

    async fn login_currencies(&self, auth: &Auth) -> SdkResult<Vec<Currency>> {
        let endpoint = Endpoint::Currency;
        let document = self
            .fetch(endpoint, auth, &[], &[UrlParameter::Offset(LOGIN_PAGE)])
            .await
            .remap_access_denied(endpoint, CURRENCY_PLAN_RESTRICTION)?;
        lenient_rows(&document, endpoint)
    }

    async fn login_groups(&self, auth: &Auth) -> SdkResult<Vec<Group>> {
        let endpoint = Endpoint::Group;
        let document = self
            .fetch(endpoint, auth, &[], &[UrlParameter::Offset(LOGIN_PAGE)])
            .await?;
        lenient_rows(&document, endpoint)
    }
}

fn lenient_rows<T: serde::de::DeserializeOwned>(
    document: &Value,
    endpoint: Endpoint,
) -> SdkResult<Vec<T>> {
    decode_rows(
        document,
        endpoint,
        ROWS_FIELD,
        RowPolicy::Lenient,
        decode_entity_value::<T>,
    )
}
