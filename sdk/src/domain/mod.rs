//! Domain layer of the SDK.
//!
//! Purpose: turn raw remote documents into typed entities and composite
//! views. Remote access goes through the [`ports::Transport`] port; nothing
//! here knows about HTTP.
//!
//! Public surface:
//! - `DataService`: every remote read, list, join and grouping operation.
//! - `Error` / `ErrorCode`: terminal failures and their stable codes.
//! - `EntityRef`, `Meta` and the typed model: decoded records.
//! - `decode_rows` and friends: the strict and lenient decode gate.

mod auth;
mod catalogue;
mod counterparty;
mod decode_gate;
mod entity;
pub mod error;
mod grouping;
mod login;
mod metadata;
mod model;
pub mod ports;
mod recovery;
mod reports;
mod service;
mod stock;
mod url_parameters;

pub use self::auth::{Auth, Credentials, CredentialsValidationError};
pub use self::counterparty::attach_reports;
pub use self::decode_gate::{
    decode_entity_rows, decode_records, decode_rows, decode_single, RowPolicy, ROWS_FIELD,
};
pub use self::entity::{
    decode_entity, decode_entity_value, decode_value, format_moment, DocumentKind, EntityRef,
    HasMeta, Link, Meta, ObjectType,
};
pub use self::error::{Error, ErrorCode, SdkResult};
pub use self::grouping::{group_assortment_by_folder, group_documents_by_day, FolderBucket};
pub use self::login::LogInInfo;
pub use self::metadata::{
    aggregate_metadata, kind_metadata, MetadataIndex, MetadataLoadResult, METADATA_KINDS,
};
pub use self::model::{
    Account, Agent, Assortment, AttributeDefinition, BankSearchResult, CompanySettings,
    ContactPerson, Contract, Country, CounterpartyReport, CounterpartySearchResult, Currency,
    CustomEntity, Dashboard, DashboardMoney, DashboardOrders, DashboardSales, Document, Employee,
    ExpenseItem, Group, ProductFolder, ProductStockAll, ProductStockStore, Project,
    RegistrationResult, SaleByProduct, SalePrice, State, Store, Task, Uom, VariantAttribute,
};
pub use self::recovery::{Recovery, CURRENCY_PLAN_RESTRICTION};
pub use self::reports::ReportPeriod;
pub use self::service::DataService;
pub use self::stock::CombinedStock;
pub use self::url_parameters::{
    merge_url_parameters, AssortmentScope, Expander, Filter, FilterArgument, ListQuery, Offset,
    SortDirection, StockMode, UrlParameter,
};
pub use pagination::{Bucket, DayBucket};
