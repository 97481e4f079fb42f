//! Typed remote objects decoded from wire records.
//!
//! Entities carry a [`Meta`] identity block and decode through
//! [`decode_entity`](super::decode_entity); report payloads without identity
//! decode through [`decode_value`](super::decode_value). Field names follow
//! the remote's camelCase wire names.

use chrono::NaiveDateTime;
use serde::Deserialize;
use uuid::Uuid;

use super::entity::{moment, EntityRef, HasMeta, Link, Meta};

macro_rules! has_meta {
    ($($entity:ty),+ $(,)?) => {
        $(
            impl HasMeta for $entity {
                fn meta(&self) -> &Meta {
                    &self.meta
                }
            }
        )+
    };
}

has_meta!(
    Employee,
    CompanySettings,
    State,
    AttributeDefinition,
    Currency,
    Group,
    Agent,
    CounterpartyReport,
    Assortment,
    ProductFolder,
    Store,
    Project,
    Contract,
    Account,
    CustomEntity,
    ContactPerson,
    Task,
    ExpenseItem,
    Country,
    Uom,
    VariantAttribute,
    ProductStockAll,
    ProductStockStore,
    Document,
);

/// An employee account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub meta: Meta,
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Login of the employee.
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub archived: bool,
}

/// Company-wide settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySettings {
    pub meta: Meta,
    /// Accounting currency of the company.
    #[serde(rename = "currency", default)]
    pub default_currency: Option<EntityRef<Currency>>,
    #[serde(default)]
    pub discount_strategy: Option<String>,
    #[serde(default)]
    pub check_shipping_stock: bool,
    #[serde(default)]
    pub check_min_price: bool,
}

/// One workflow state of an entity kind.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub meta: Meta,
    pub id: Uuid,
    pub name: String,
    /// RGB colour packed into an integer.
    #[serde(default)]
    pub color: Option<u64>,
    #[serde(default)]
    pub state_type: Option<String>,
}

/// Definition of a custom attribute of an entity kind.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDefinition {
    pub meta: Meta,
    pub id: Uuid,
    pub name: String,
    /// Value type, e.g. `string` or `customentity`.
    #[serde(rename = "type")]
    pub value_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: Option<String>,
}

/// A currency known to the account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub meta: Meta,
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub iso_code: Option<String>,
    /// Whether this is the accounting currency.
    #[serde(rename = "default", default)]
    pub is_default: bool,
}

/// An employee group (department).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Group {
    pub meta: Meta,
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub index: Option<u32>,
}

/// A counterparty, organization or employee acting as a document agent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub meta: Meta,
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub inn: Option<String>,
    #[serde(default)]
    pub kpp: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company_type: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Financial indicators attached by report enrichment.
    #[serde(skip)]
    pub report: Option<CounterpartyReport>,
}

/// Financial indicators of one counterparty.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterpartyReport {
    pub meta: Meta,
    /// The counterparty the indicators belong to.
    pub counterparty: Link,
    #[serde(default)]
    pub balance: f64,
    #[serde(default)]
    pub profit: f64,
    #[serde(default)]
    pub sales_amount: f64,
    #[serde(default)]
    pub demands_count: u32,
    #[serde(default)]
    pub demands_sum: f64,
    #[serde(default)]
    pub average_receipt: f64,
    #[serde(default, deserialize_with = "moment::deserialize_option")]
    pub last_demand_date: Option<NaiveDateTime>,
}

/// Sale price entry of an assortment item.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalePrice {
    /// Price in minor currency units.
    pub value: f64,
    #[serde(default)]
    pub price_type: Option<String>,
}

/// A product, variant, service or bundle.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assortment {
    pub meta: Meta,
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub article: Option<String>,
    #[serde(default)]
    pub product_folder: Option<EntityRef<ProductFolder>>,
    /// Parent product of a variant.
    #[serde(default)]
    pub product: Option<Box<EntityRef<Assortment>>>,
    #[serde(default)]
    pub sale_prices: Vec<SalePrice>,
    #[serde(default)]
    pub stock: Option<f64>,
    #[serde(default)]
    pub reserve: Option<f64>,
    #[serde(default)]
    pub in_transit: Option<f64>,
    #[serde(default)]
    pub quantity: Option<f64>,
}

impl Assortment {
    /// Name of the folder holding the item; variants report their parent
    /// product's folder.
    pub fn folder_name(&self) -> Option<&str> {
        if let Some(folder) = self.product_folder.as_ref().and_then(EntityRef::value) {
            return Some(folder.name.as_str());
        }
        self.product
            .as_deref()
            .and_then(EntityRef::value)
            .and_then(Self::folder_name)
    }
}

/// A product folder.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFolder {
    pub meta: Meta,
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub path_name: Option<String>,
}

/// A warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Store {
    pub meta: Meta,
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Project {
    pub meta: Meta,
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A contract with a counterparty.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub meta: Meta,
    pub id: Uuid,
    pub name: String,
    #[serde(default, deserialize_with = "moment::deserialize_option")]
    pub moment: Option<NaiveDateTime>,
    #[serde(default)]
    pub sum: f64,
    #[serde(default)]
    pub contract_type: Option<String>,
}

/// A bank account of a counterparty or organization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub meta: Meta,
    pub id: Uuid,
    pub account_number: String,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub bic: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

/// An element of a user-defined directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CustomEntity {
    pub meta: Meta,
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
}

/// A contact person of a counterparty.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContactPerson {
    pub meta: Meta,
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub meta: Meta,
    pub id: Uuid,
    pub description: String,
    #[serde(default, deserialize_with = "moment::deserialize_option")]
    pub due_to_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub assignee: Option<Link>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExpenseItem {
    pub meta: Meta,
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Country {
    pub meta: Meta,
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
}

/// Unit of measure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Uom {
    pub meta: Meta,
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
}

/// A characteristic variants can be distinguished by.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VariantAttribute {
    pub meta: Meta,
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type", default)]
    pub value_type: Option<String>,
    #[serde(default)]
    pub required: bool,
}

/// Aggregate stock of one item across all stores.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStockAll {
    pub meta: Meta,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub stock: f64,
    #[serde(default)]
    pub reserve: f64,
    #[serde(default)]
    pub in_transit: f64,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub sale_price: f64,
}

impl ProductStockAll {
    /// Zeroed aggregate used when the remote reports no stock at all.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Stock of one item in one store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStockStore {
    /// Identity of the store.
    pub meta: Meta,
    pub name: String,
    #[serde(default)]
    pub stock: f64,
    #[serde(default)]
    pub reserve: f64,
    #[serde(default)]
    pub in_transit: f64,
}

/// Common header of any business document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub meta: Meta,
    pub id: Uuid,
    pub name: String,
    /// Point in time the document is dated at.
    #[serde(deserialize_with = "moment::deserialize")]
    pub moment: NaiveDateTime,
    #[serde(default)]
    pub sum: f64,
    #[serde(default)]
    pub applicable: bool,
    #[serde(default)]
    pub agent: Option<Link>,
    #[serde(default)]
    pub state: Option<EntityRef<State>>,
}

/// Sales indicators of one dashboard period.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardSales {
    pub count: u32,
    pub amount: f64,
    pub movement_amount: f64,
}

/// Order indicators of one dashboard period.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardOrders {
    pub count: u32,
    pub amount: f64,
    pub movement_amount: f64,
}

/// Cash indicators of one dashboard period.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardMoney {
    pub income: f64,
    pub outcome: f64,
    pub balance: f64,
    pub today_movement: f64,
    pub movement: f64,
}

/// Summary indicators for a day, week or month.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Dashboard {
    pub sales: DashboardSales,
    pub orders: DashboardOrders,
    pub money: DashboardMoney,
}

/// One row of the profitability-by-product report.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleByProduct {
    pub assortment: EntityRef<Assortment>,
    #[serde(default)]
    pub sell_quantity: f64,
    #[serde(default)]
    pub sell_price: f64,
    #[serde(default)]
    pub sell_cost: f64,
    #[serde(default)]
    pub sell_sum: f64,
    #[serde(default)]
    pub sell_cost_sum: f64,
    #[serde(default)]
    pub return_quantity: f64,
    #[serde(default)]
    pub return_sum: f64,
    #[serde(default)]
    pub profit: f64,
    #[serde(default)]
    pub margin: f64,
}

/// Credentials issued for a newly registered account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegistrationResult {
    pub uid: String,
    pub password: String,
}

/// Company details suggested for a tax number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterpartySearchResult {
    pub name: String,
    #[serde(default)]
    pub inn: Option<String>,
    #[serde(default)]
    pub kpp: Option<String>,
    #[serde(default)]
    pub ogrn: Option<String>,
    #[serde(default)]
    pub legal_address: Option<String>,
    #[serde(rename = "type", default)]
    pub company_type: Option<String>,
}

/// Bank details suggested for a BIC.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankSearchResult {
    pub bic: String,
    pub name: String,
    #[serde(default)]
    pub correspondent_account: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}
