//! Driven port for issuing requests against the remote API.
//!
//! The domain owns the request vocabulary (endpoint, credentials, path
//! segments, URL parameters) and the raw-document contract, so orchestration
//! stays independent of the HTTP stack underneath.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;
use crate::domain::{Auth, DocumentKind, UrlParameter};

/// API error code the remote returns when the user lacks a permission.
pub const ACCESS_DENIED_CODE: u32 = 1016;
/// API error code the remote returns when the CRM module is not available
/// to the account.
pub const CRM_ACCESS_DENIED_CODE: u32 = 1073;

/// Remote endpoints reachable through the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Account self-registration.
    Register,
    /// The employee owning the current credentials.
    ContextEmployee,
    /// Company-wide settings.
    CompanySettings,
    /// Metadata for every entity kind in one document.
    EntityMetadata,
    DashboardDay,
    DashboardWeek,
    DashboardMonth,
    Assortment,
    Organization,
    Counterparty,
    /// Per-counterparty financial indicators.
    CounterpartyReport,
    StockAll,
    StockByStore,
    ProductFolder,
    Store,
    Project,
    Group,
    Currency,
    Contract,
    Employee,
    Product,
    Bundle,
    Variant,
    /// Variant characteristics metadata.
    VariantMetadata,
    Service,
    CustomEntity,
    SalesByProduct,
    /// Counterparty lookup by tax number.
    SuggestCounterparty,
    /// Bank lookup by BIC.
    SuggestBank,
    Task,
    ExpenseItem,
    Country,
    Uom,
    /// List endpoint of one document kind.
    Document(DocumentKind),
}

impl Endpoint {
    /// Path of the endpoint relative to the API root.
    ///
    /// # Examples
    ///
    /// ```
    /// use moysklad_sdk::domain::ports::Endpoint;
    ///
    /// assert_eq!(Endpoint::StockAll.path(), "report/stock/all");
    /// ```
    pub fn path(self) -> &'static str {
        match self {
            Self::Register => "register",
            Self::ContextEmployee => "context/employee",
            Self::CompanySettings => "context/companysettings",
            Self::EntityMetadata => "entity/metadata",
            Self::DashboardDay => "report/dashboard/day",
            Self::DashboardWeek => "report/dashboard/week",
            Self::DashboardMonth => "report/dashboard/month",
            Self::Assortment => "entity/assortment",
            Self::Organization => "entity/organization",
            Self::Counterparty => "entity/counterparty",
            Self::CounterpartyReport => "report/counterparty",
            Self::StockAll => "report/stock/all",
            Self::StockByStore => "report/stock/bystore",
            Self::ProductFolder => "entity/productfolder",
            Self::Store => "entity/store",
            Self::Project => "entity/project",
            Self::Group => "entity/group",
            Self::Currency => "entity/currency",
            Self::Contract => "entity/contract",
            Self::Employee => "entity/employee",
            Self::Product => "entity/product",
            Self::Bundle => "entity/bundle",
            Self::Variant => "entity/variant",
            Self::VariantMetadata => "entity/variant/metadata",
            Self::Service => "entity/service",
            Self::CustomEntity => "entity/customentity",
            Self::SalesByProduct => "report/profit/byproduct",
            Self::SuggestCounterparty => "suggest/counterparty",
            Self::SuggestBank => "suggest/bank",
            Self::Task => "entity/task",
            Self::ExpenseItem => "entity/expenseitem",
            Self::Country => "entity/country",
            Self::Uom => "entity/uom",
            Self::Document(kind) => kind.path(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// One entry of the structured error list returned by the remote API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Numeric API error code.
    pub code: u32,
    /// Human-readable message supplied by the remote.
    pub message: String,
}

impl ApiError {
    /// Build an API error entry.
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Ordered list of API errors attached to one failed response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiErrors(pub Vec<ApiError>);

impl ApiErrors {
    /// The first reported error, which identifies the failure.
    pub fn first(&self) -> Option<&ApiError> {
        self.0.first()
    }
}

impl From<Vec<ApiError>> for ApiErrors {
    fn from(value: Vec<ApiError>) -> Self {
        Self(value)
    }
}

impl fmt::Display for ApiErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, error) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "[{}] {}", error.code, error.message)?;
        }
        Ok(())
    }
}

define_port_error! {
    /// Errors surfaced while calling the remote API.
    pub enum TransportError {
        /// The request could not be assembled from its parts.
        Request { message: String } =>
            "request could not be built: {message}",
        /// Network transport failed before receiving a response.
        Network { message: String } =>
            "transport failed: {message}",
        /// The request exceeded its timeout.
        Timeout { message: String } =>
            "request timed out: {message}",
        /// Non-success status without a structured error body.
        Status { status: u16, message: String } =>
            "remote returned status {status}: {message}",
        /// Non-success status with the remote's structured error list.
        Api { status: u16, errors: ApiErrors } =>
            "remote rejected request with status {status}: {errors}",
        /// The response body was not a JSON document.
        Decode { message: String } =>
            "response body decode failed: {message}",
    }
}

impl TransportError {
    /// Code of the first structured API error, when there is one.
    pub fn first_api_code(&self) -> Option<u32> {
        match self {
            Self::Api { errors, .. } => errors.first().map(|error| error.code),
            _ => None,
        }
    }

    /// Whether the remote denied access to the requested resource.
    pub fn is_access_denied(&self) -> bool {
        self.first_api_code() == Some(ACCESS_DENIED_CODE)
    }

    /// Whether the remote denied access because the CRM module is
    /// unavailable.
    pub fn is_crm_access_denied(&self) -> bool {
        self.first_api_code() == Some(CRM_ACCESS_DENIED_CODE)
    }
}

/// Port for reading raw documents from the remote API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue an authenticated read against `endpoint`.
    ///
    /// `path` segments are appended to the endpoint path in order and
    /// `parameters` are passed through positionally.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let document = transport
    ///     .get(Endpoint::ContextEmployee, &auth, &[], &[])
    ///     .await?;
    /// assert!(document.is_object());
    /// ```
    async fn get(
        &self,
        endpoint: Endpoint,
        auth: &Auth,
        path: &[String],
        parameters: &[UrlParameter],
    ) -> Result<Value, TransportError>;

    /// Submit an unauthenticated account registration for `email`.
    async fn register(&self, email: &str) -> Result<Value, TransportError>;
}
