//! Entity references and the per-record decode contract.
//!
//! Every wire record carries a `meta` block identifying the object. A record
//! holding nothing but `meta` is a reference to an object the response did
//! not expand; a record holding more must decode completely. Decoding never
//! raises: it yields `None` when a record cannot be read, and callers decide
//! whether that is fatal.

use std::fmt;

use chrono::NaiveDateTime;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Kind of a remote object, as named in `meta.type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    CustomerOrder,
    Demand,
    InvoiceIn,
    InvoiceOut,
    CashIn,
    CashOut,
    PaymentIn,
    PaymentOut,
    Supply,
    PurchaseOrder,
    Counterparty,
    Move,
    Inventory,
    Product,
    Variant,
    Service,
    Bundle,
    ProductFolder,
    Organization,
    Employee,
    Store,
    Project,
    Group,
    Currency,
    Contract,
    Account,
    State,
    Task,
    CompanySettings,
    /// Any kind this crate does not model.
    #[default]
    #[serde(other)]
    Unknown,
}

impl ObjectType {
    /// Wire name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CustomerOrder => "customerorder",
            Self::Demand => "demand",
            Self::InvoiceIn => "invoicein",
            Self::InvoiceOut => "invoiceout",
            Self::CashIn => "cashin",
            Self::CashOut => "cashout",
            Self::PaymentIn => "paymentin",
            Self::PaymentOut => "paymentout",
            Self::Supply => "supply",
            Self::PurchaseOrder => "purchaseorder",
            Self::Counterparty => "counterparty",
            Self::Move => "move",
            Self::Inventory => "inventory",
            Self::Product => "product",
            Self::Variant => "variant",
            Self::Service => "service",
            Self::Bundle => "bundle",
            Self::ProductFolder => "productfolder",
            Self::Organization => "organization",
            Self::Employee => "employee",
            Self::Store => "store",
            Self::Project => "project",
            Self::Group => "group",
            Self::Currency => "currency",
            Self::Contract => "contract",
            Self::Account => "account",
            Self::State => "state",
            Self::Task => "task",
            Self::CompanySettings => "companysettings",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document kinds that can be listed and grouped by day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    CustomerOrder,
    Demand,
    InvoiceOut,
    InvoiceIn,
    CashIn,
    CashOut,
    PaymentIn,
    PaymentOut,
    Supply,
    PurchaseOrder,
    Move,
    Inventory,
}

impl DocumentKind {
    /// Object type of documents of this kind.
    pub fn object_type(self) -> ObjectType {
        match self {
            Self::CustomerOrder => ObjectType::CustomerOrder,
            Self::Demand => ObjectType::Demand,
            Self::InvoiceOut => ObjectType::InvoiceOut,
            Self::InvoiceIn => ObjectType::InvoiceIn,
            Self::CashIn => ObjectType::CashIn,
            Self::CashOut => ObjectType::CashOut,
            Self::PaymentIn => ObjectType::PaymentIn,
            Self::PaymentOut => ObjectType::PaymentOut,
            Self::Supply => ObjectType::Supply,
            Self::PurchaseOrder => ObjectType::PurchaseOrder,
            Self::Move => ObjectType::Move,
            Self::Inventory => ObjectType::Inventory,
        }
    }

    /// List endpoint path relative to the API root.
    pub fn path(self) -> &'static str {
        match self {
            Self::CustomerOrder => "entity/customerorder",
            Self::Demand => "entity/demand",
            Self::InvoiceOut => "entity/invoiceout",
            Self::InvoiceIn => "entity/invoicein",
            Self::CashIn => "entity/cashin",
            Self::CashOut => "entity/cashout",
            Self::PaymentIn => "entity/paymentin",
            Self::PaymentOut => "entity/paymentout",
            Self::Supply => "entity/supply",
            Self::PurchaseOrder => "entity/purchaseorder",
            Self::Move => "entity/move",
            Self::Inventory => "entity/inventory",
        }
    }
}

/// Identity block attached to every remote object.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    /// Canonical URL of the object, possibly with query parameters.
    pub href: String,
    /// Kind of the object.
    #[serde(rename = "type", default)]
    pub object_type: ObjectType,
    /// Media type of the linked document.
    #[serde(default)]
    pub media_type: Option<String>,
}

impl Meta {
    /// The href without its query string; stable across expansions.
    ///
    /// # Examples
    /// ```
    /// use moysklad_sdk::domain::Meta;
    ///
    /// let meta = Meta {
    ///     href: "https://host/entity/currency/42?expand=x".to_owned(),
    ///     ..Meta::default()
    /// };
    /// assert_eq!(meta.href_without_parameters(), "https://host/entity/currency/42");
    /// assert_eq!(meta.object_id(), "42");
    /// ```
    pub fn href_without_parameters(&self) -> &str {
        self.href
            .split_once('?')
            .map_or(self.href.as_str(), |(base, _)| base)
    }

    /// Object identifier: the last path segment of the href.
    pub fn object_id(&self) -> &str {
        self.href_without_parameters()
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
    }
}

/// Objects exposing their identity block.
pub trait HasMeta {
    /// Identity block of the object.
    fn meta(&self) -> &Meta;
}

/// Reference-only view of a related object, ignoring any expanded fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Link {
    /// Identity block of the related object.
    pub meta: Meta,
}

impl HasMeta for Link {
    fn meta(&self) -> &Meta {
        &self.meta
    }
}

/// A decoded record: either the full object or a reference to it.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityRef<T> {
    /// Fully decoded object.
    Entity(T),
    /// Object known by reference only; keeps arrays aligned with the source.
    Reference(Meta),
}

impl<T> EntityRef<T> {
    /// The decoded object, if the record was expanded.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Entity(value) => Some(value),
            Self::Reference(_) => None,
        }
    }

    /// Mutable access to the decoded object.
    pub fn value_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Entity(value) => Some(value),
            Self::Reference(_) => None,
        }
    }

    /// Consume the reference, keeping only an expanded object.
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Entity(value) => Some(value),
            Self::Reference(_) => None,
        }
    }

    /// Whether this is an unresolved reference.
    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Reference(_))
    }
}

impl<T: HasMeta> EntityRef<T> {
    /// Identity block of the referenced object, expanded or not.
    pub fn object_meta(&self) -> &Meta {
        match self {
            Self::Entity(value) => value.meta(),
            Self::Reference(meta) => meta,
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for EntityRef<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = Value::deserialize(deserializer)?;
        decode_entity(&record)
            .ok_or_else(|| de::Error::custom("record is neither a decodable object nor a reference"))
    }
}

/// Decode one entity record.
///
/// Returns `None` when the record has no readable `meta`, or when it holds
/// fields besides `meta` that do not decode as `T`.
///
/// # Examples
/// ```
/// use moysklad_sdk::domain::{decode_entity, EntityRef, Store};
/// use serde_json::json;
///
/// let reference = decode_entity::<Store>(&json!({
///     "meta": { "href": "https://host/entity/store/1", "type": "store" }
/// }));
/// assert!(matches!(reference, Some(EntityRef::Reference(_))));
/// assert!(decode_entity::<Store>(&json!({ "name": "no meta" })).is_none());
/// ```
pub fn decode_entity<T: DeserializeOwned>(record: &Value) -> Option<EntityRef<T>> {
    let object = record.as_object()?;
    let meta = Meta::deserialize(object.get("meta")?).ok()?;
    if object.len() == 1 {
        return Some(EntityRef::Reference(meta));
    }
    match T::deserialize(record) {
        Ok(value) => Some(EntityRef::Entity(value)),
        Err(error) => {
            debug!(href = %meta.href, error = %error, "entity record failed to decode");
            None
        }
    }
}

/// Decode one record that must be fully expanded; references read as
/// unreadable.
pub fn decode_entity_value<T: DeserializeOwned>(record: &Value) -> Option<T> {
    decode_entity(record).and_then(EntityRef::into_value)
}

/// Decode one plain payload record that carries no identity block.
pub fn decode_value<T: DeserializeOwned>(record: &Value) -> Option<T> {
    T::deserialize(record)
        .map_err(|error| debug!(error = %error, "payload record failed to decode"))
        .ok()
}

/// Serde helpers for the remote's `YYYY-MM-DD hh:mm:ss[.fff]` timestamps.
pub(crate) mod moment {
    use chrono::NaiveDateTime;
    use serde::de::{self, Deserializer};
    use serde::Deserialize;

    const FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

    pub(crate) fn parse(raw: &str) -> Option<NaiveDateTime> {
        FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid moment: {raw}")))
    }

    pub(crate) fn deserialize_option<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid moment: {raw}"))),
            None => Ok(None),
        }
    }
}

/// Render a timestamp in the remote's wire format.
pub fn format_moment(moment: NaiveDateTime) -> String {
    moment.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Named {
        meta: Meta,
        name: String,
    }

    impl HasMeta for Named {
        fn meta(&self) -> &Meta {
            &self.meta
        }
    }

    fn meta_json(id: &str) -> Value {
        json!({ "href": format!("https://host/entity/store/{id}"), "type": "store" })
    }

    #[rstest]
    fn full_record_decodes_to_entity() {
        let decoded = decode_entity::<Named>(&json!({ "meta": meta_json("1"), "name": "Main" }))
            .expect("record should decode");
        assert_eq!(decoded.value().map(|n| n.name.as_str()), Some("Main"));
        assert_eq!(decoded.object_meta().object_type, ObjectType::Store);
    }

    #[rstest]
    fn meta_only_record_decodes_to_reference() {
        let decoded =
            decode_entity::<Named>(&json!({ "meta": meta_json("7") })).expect("reference");
        assert!(decoded.is_reference());
        assert_eq!(decoded.object_meta().object_id(), "7");
    }

    #[rstest]
    #[case::missing_meta(json!({ "name": "Main" }))]
    #[case::broken_meta(json!({ "meta": { "type": "store" }, "name": "Main" }))]
    #[case::incomplete_entity(json!({ "meta": meta_json("1"), "code": "x" }))]
    #[case::not_an_object(json!(["meta"]))]
    fn unreadable_records_yield_none(#[case] record: Value) {
        assert!(decode_entity::<Named>(&record).is_none());
    }

    #[rstest]
    fn unknown_object_types_fall_back() {
        let meta: Meta = serde_json::from_value(json!({ "href": "h", "type": "retaildemand" }))
            .expect("meta decodes");
        assert_eq!(meta.object_type, ObjectType::Unknown);
    }

    #[rstest]
    #[case("2024-01-01 09:00:00", "2024-01-01T09:00:00")]
    #[case("2024-01-01 09:00:00.123", "2024-01-01T09:00:00.123")]
    #[case("2024-01-01T09:00:00", "2024-01-01T09:00:00")]
    fn parses_wire_moments(#[case] raw: &str, #[case] expected: &str) {
        let expected: NaiveDateTime = expected.parse().expect("fixture moment");
        assert_eq!(moment::parse(raw), Some(expected));
    }
}
