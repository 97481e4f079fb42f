//! Metadata aggregation across entity kinds.
//!
//! One `entity/metadata` document holds a sub-document per entity kind. Each
//! sub-document is read independently and leniently: a missing sub-document
//! yields an empty result, and unreadable states or attributes are dropped
//! without failing the kind.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::debug;

use super::entity::{decode_entity, EntityRef, ObjectType};
use super::model::{AttributeDefinition, State};

/// Entity kinds whose metadata the login snapshot needs.
pub const METADATA_KINDS: [ObjectType; 14] = [
    ObjectType::CustomerOrder,
    ObjectType::Demand,
    ObjectType::InvoiceIn,
    ObjectType::InvoiceOut,
    ObjectType::CashIn,
    ObjectType::CashOut,
    ObjectType::PaymentIn,
    ObjectType::PaymentOut,
    ObjectType::Supply,
    ObjectType::PurchaseOrder,
    ObjectType::Counterparty,
    ObjectType::Move,
    ObjectType::Inventory,
    ObjectType::Product,
];

/// Metadata of one entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataLoadResult {
    /// Entity kind the metadata describes.
    pub kind: ObjectType,
    /// Workflow states valid for the kind.
    pub states: Vec<State>,
    /// Custom attribute definitions.
    pub attributes: Vec<AttributeDefinition>,
    /// Tag names.
    pub tags: Vec<String>,
    /// Price type names.
    pub price_types: Vec<String>,
    /// Whether new objects of the kind are shared by default.
    pub create_shared: bool,
}

impl MetadataLoadResult {
    /// Metadata of a kind the document says nothing about.
    pub fn empty(kind: ObjectType) -> Self {
        Self {
            kind,
            states: Vec::new(),
            attributes: Vec::new(),
            tags: Vec::new(),
            price_types: Vec::new(),
            create_shared: false,
        }
    }
}

/// Metadata keyed by entity kind.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MetadataIndex {
    by_kind: HashMap<ObjectType, MetadataLoadResult>,
}

impl MetadataIndex {
    /// Metadata of `kind`, if it was loaded.
    pub fn get(&self, kind: ObjectType) -> Option<&MetadataLoadResult> {
        self.by_kind.get(&kind)
    }

    /// Number of kinds indexed.
    pub fn len(&self) -> usize {
        self.by_kind.len()
    }

    /// Whether no kind was indexed.
    pub fn is_empty(&self) -> bool {
        self.by_kind.is_empty()
    }

    /// Iterate over the indexed results in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &MetadataLoadResult> {
        self.by_kind.values()
    }
}

impl FromIterator<MetadataLoadResult> for MetadataIndex {
    fn from_iter<I: IntoIterator<Item = MetadataLoadResult>>(iter: I) -> Self {
        Self {
            by_kind: iter.into_iter().map(|result| (result.kind, result)).collect(),
        }
    }
}

impl IntoIterator for MetadataIndex {
    type Item = MetadataLoadResult;
    type IntoIter = std::collections::hash_map::IntoValues<ObjectType, MetadataLoadResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.by_kind.into_values()
    }
}

/// Reshape a metadata document into one result per kind in
/// [`METADATA_KINDS`].
///
/// A document that is not an object yields an empty index.
///
/// # Examples
/// ```
/// use moysklad_sdk::domain::{aggregate_metadata, ObjectType};
/// use serde_json::json;
///
/// let index = aggregate_metadata(&json!({ "product": { "createShared": true } }));
/// assert_eq!(index.len(), 14);
/// assert!(index.get(ObjectType::Product).is_some_and(|m| m.create_shared));
/// assert!(index.get(ObjectType::Demand).is_some_and(|m| m.states.is_empty()));
/// ```
pub fn aggregate_metadata(document: &Value) -> MetadataIndex {
    let Some(object) = document.as_object() else {
        debug!("metadata document is not an object; no kinds loaded");
        return MetadataIndex::default();
    };
    METADATA_KINDS
        .iter()
        .map(|kind| kind_metadata(object, *kind))
        .collect()
}

/// Read the sub-document of `kind` from a metadata document.
pub fn kind_metadata(document: &Map<String, Value>, kind: ObjectType) -> MetadataLoadResult {
    let Some(section) = document.get(kind.as_str()).and_then(Value::as_object) else {
        return MetadataLoadResult::empty(kind);
    };
    MetadataLoadResult {
        kind,
        states: entities(section, "states"),
        attributes: entities(section, "attributes"),
        tags: array(section, "groups")
            .filter_map(|tag| tag.as_str().map(str::to_owned))
            .collect(),
        price_types: array(section, "priceTypes")
            .filter_map(|price_type| price_type.get("name").and_then(Value::as_str))
            .map(str::to_owned)
            .collect(),
        create_shared: section
            .get("createShared")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    }
}

fn array<'a>(section: &'a Map<String, Value>, field: &str) -> impl Iterator<Item = &'a Value> {
    section
        .get(field)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
        .iter()
}

fn entities<T: serde::de::DeserializeOwned>(section: &Map<String, Value>, field: &str) -> Vec<T> {
    array(section, field)
        .filter_map(decode_entity::<T>)
        .filter_map(EntityRef::into_value)
        .collect()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn state(id: &str, name: &str) -> Value {
        json!({
            "meta": { "href": format!("https://host/entity/customerorder/metadata/states/{id}"), "type": "state" },
            "id": id,
            "name": name,
        })
    }

    fn document() -> Value {
        json!({
            "customerorder": {
                "states": [
                    state("7c3f0f9e-2b59-4d61-9f43-9b4a2b8e4a01", "New"),
                    { "meta": { "href": "h", "type": "state" }, "name": "broken" },
                    state("8d4f1f9e-2b59-4d61-9f43-9b4a2b8e4a02", "Done"),
                ],
                "attributes": [{
                    "meta": { "href": "https://host/attr/1", "type": "attributemetadata" },
                    "id": "0c1e2d3f-4a5b-4c6d-8e7f-8091a2b3c4d5",
                    "name": "Courier",
                    "type": "string",
                }],
                "createShared": true,
            },
            "counterparty": { "groups": ["vip", "wholesale", 7] },
            "product": { "priceTypes": [{ "name": "Retail" }, { "id": 1 }, { "name": "Wholesale" }] },
        })
    }

    #[rstest]
    fn every_fixed_kind_is_indexed() {
        let index = aggregate_metadata(&document());
        assert_eq!(index.len(), METADATA_KINDS.len());
        for kind in METADATA_KINDS {
            assert_eq!(index.get(kind).map(|m| m.kind), Some(kind));
        }
    }

    #[rstest]
    fn malformed_states_are_dropped_not_fatal() {
        let index = aggregate_metadata(&document());
        let orders = index.get(ObjectType::CustomerOrder).expect("orders indexed");
        let names: Vec<_> = orders.states.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["New", "Done"]);
        assert_eq!(orders.attributes.len(), 1);
        assert!(orders.create_shared);
    }

    #[rstest]
    fn tags_and_price_types_keep_only_names() {
        let index = aggregate_metadata(&document());
        let tags = &index.get(ObjectType::Counterparty).expect("counterparty").tags;
        assert_eq!(tags, &["vip", "wholesale"]);
        let prices = &index.get(ObjectType::Product).expect("product").price_types;
        assert_eq!(prices, &["Retail", "Wholesale"]);
    }

    #[rstest]
    #[case(ObjectType::Supply)]
    #[case(ObjectType::Inventory)]
    fn missing_sections_read_as_empty(#[case] kind: ObjectType) {
        let index = aggregate_metadata(&document());
        assert_eq!(index.get(kind), Some(&MetadataLoadResult::empty(kind)));
    }

    #[rstest]
    #[case::null(Value::Null)]
    #[case::array(json!([]))]
    fn non_object_documents_yield_nothing(#[case] document: Value) {
        assert!(aggregate_metadata(&document).is_empty());
    }

    #[rstest]
    fn kinds_outside_the_fixed_set_are_ignored() {
        let index = aggregate_metadata(&json!({ "retaildemand": { "createShared": true } }));
        assert!(index.get(ObjectType::Unknown).is_none());
    }
}
