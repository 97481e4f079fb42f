//! Counterparty reads, report enrichment and company lookups.

use std::collections::HashMap;

use tracing::debug;

use super::auth::Auth;
use super::decode_gate::{decode_entity_rows, decode_rows, RowPolicy, ROWS_FIELD};
use super::entity::{decode_entity, decode_value, EntityRef, ObjectType};
use super::error::{Error, SdkResult};
use super::model::{
    Account, Agent, BankSearchResult, ContactPerson, CounterpartyReport, CounterpartySearchResult,
};
use super::ports::Endpoint;
use super::recovery::Recovery;
use super::service::DataService;
use super::url_parameters::{Filter, FilterArgument, ListQuery, Offset, UrlParameter};

impl DataService {
    /// List counterparties.
    ///
    /// # Errors
    /// Transport failures, malformed envelopes and rows that do not decode.
    pub async fn counterparties(
        &self,
        auth: &Auth,
        query: &ListQuery,
    ) -> SdkResult<Vec<EntityRef<Agent>>> {
        self.fetch_rows(Endpoint::Counterparty, auth, &[], &query.to_parameters())
            .await
    }

    /// List counterparties and attach each one's financial report.
    ///
    /// Reports are fetched in one read covering the listed counterparties.
    /// Accounts without the CRM module get the plain list back. Order
    /// follows the counterparty list; counterparties without a report keep
    /// `report: None`.
    ///
    /// # Errors
    /// Failures of the counterparty read, and report failures other than a
    /// CRM access denial.
    pub async fn counterparties_with_report(
        &self,
        auth: &Auth,
        query: &ListQuery,
    ) -> SdkResult<Vec<EntityRef<Agent>>> {
        let mut counterparties = self.counterparties(auth, query).await?;
        let filter: Vec<FilterArgument> = counterparties
            .iter()
            .filter_map(EntityRef::value)
            .map(|agent| FilterArgument::equals("counterparty", agent.meta.href_without_parameters()))
            .collect();
        if filter.is_empty() {
            return Ok(counterparties);
        }

        let reports = self
            .counterparty_reports(auth, filter)
            .await
            .suppress_crm_access_denied(Endpoint::CounterpartyReport, Vec::new)?;
        attach_reports(&mut counterparties, reports);
        Ok(counterparties)
    }

    /// Bank accounts of a counterparty or organization.
    ///
    /// # Errors
    /// [`Error::InvalidRequest`] for other agent kinds, then transport
    /// failures, malformed envelopes and rows that do not decode.
    pub async fn agent_accounts(
        &self,
        auth: &Auth,
        agent: &Agent,
        query: &ListQuery,
    ) -> SdkResult<Vec<EntityRef<Account>>> {
        let endpoint = match agent.meta.object_type {
            ObjectType::Counterparty => Endpoint::Counterparty,
            ObjectType::Organization => Endpoint::Organization,
            other => {
                return Err(Error::invalid_request(format!(
                    "accounts are only available for counterparties and organizations, not {other}"
                )));
            }
        };
        let path = [agent.id.to_string(), "accounts".to_owned()];
        self.fetch_rows(endpoint, auth, &path, &query.to_parameters())
            .await
    }

    /// Contact persons of a counterparty; unreadable entries are dropped.
    ///
    /// # Errors
    /// Transport failures, or a response that is not an object.
    pub async fn counterparty_contacts(
        &self,
        auth: &Auth,
        counterparty_id: &str,
    ) -> SdkResult<Vec<EntityRef<ContactPerson>>> {
        let endpoint = Endpoint::Counterparty;
        let path = [counterparty_id.to_owned(), "contactpersons".to_owned()];
        let document = self.fetch(endpoint, auth, &path, &[]).await?;
        decode_rows(
            &document,
            endpoint,
            ROWS_FIELD,
            RowPolicy::Lenient,
            decode_entity::<ContactPerson>,
        )
    }

    /// Company details registered under a tax number.
    ///
    /// # Errors
    /// Transport failures, or a response that is not an object.
    pub async fn search_counterparty_by_inn(
        &self,
        auth: &Auth,
        inn: &str,
    ) -> SdkResult<Vec<CounterpartySearchResult>> {
        self.suggest(Endpoint::SuggestCounterparty, auth, inn).await
    }

    /// Bank details registered under a BIC.
    ///
    /// # Errors
    /// Transport failures, or a response that is not an object.
    pub async fn search_bank_by_bic(
        &self,
        auth: &Auth,
        bic: &str,
    ) -> SdkResult<Vec<BankSearchResult>> {
        self.suggest(Endpoint::SuggestBank, auth, bic).await
    }

    async fn counterparty_reports(
        &self,
        auth: &Auth,
        filter: Vec<FilterArgument>,
    ) -> SdkResult<Vec<EntityRef<CounterpartyReport>>> {
        let endpoint = Endpoint::CounterpartyReport;
        let size = u32::try_from(filter.len()).unwrap_or(u32::MAX);
        let parameters = [
            UrlParameter::Offset(Offset::new(size, size, 0)),
            UrlParameter::Filter(Filter::new(filter)),
        ];
        let document = self.fetch(endpoint, auth, &[], &parameters).await?;
        decode_entity_rows(&document, endpoint)
    }

    async fn suggest<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        auth: &Auth,
        search: &str,
    ) -> SdkResult<Vec<T>> {
        let document = self
            .fetch(endpoint, auth, &[], &[UrlParameter::generic("search", search)])
            .await?;
        decode_rows(&document, endpoint, ROWS_FIELD, RowPolicy::Lenient, decode_value::<T>)
    }
}

/// Attach each report to the counterparty it belongs to, matching on the
/// counterparty's object id. Reports for unlisted counterparties are dropped.
pub fn attach_reports(
    counterparties: &mut [EntityRef<Agent>],
    reports: Vec<EntityRef<CounterpartyReport>>,
) {
    let mut by_counterparty: HashMap<String, CounterpartyReport> = reports
        .into_iter()
        .filter_map(EntityRef::into_value)
        .map(|report| (report.counterparty.meta.object_id().to_owned(), report))
        .collect();
    let total = by_counterparty.len();

    for agent in counterparties.iter_mut().filter_map(EntityRef::value_mut) {
        let report = by_counterparty.remove(agent.meta.object_id());
        if report.is_some() {
            agent.report = report;
        }
    }
    debug!(
        attached = total - by_counterparty.len(),
        unmatched = by_counterparty.len(),
        "attached counterparty reports"
    );
}
