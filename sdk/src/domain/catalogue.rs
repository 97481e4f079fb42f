//! Reference lists and single-item reads.
//!
//! List reads go through the strict decode gate: a response with any
//! unreadable row fails as a whole.

use uuid::Uuid;

use super::auth::Auth;
use super::decode_gate::{decode_rows, RowPolicy};
use super::entity::{decode_entity, EntityRef};
use super::error::SdkResult;
use super::model::{
    Agent, Assortment, Contract, Country, Currency, CustomEntity, Employee, ExpenseItem, Group,
    ProductFolder, Project, Store, Task, Uom, VariantAttribute,
};
use super::ports::Endpoint;
use super::service::DataService;
use super::url_parameters::{
    merge_url_parameters, AssortmentScope, Expander, ListQuery, Offset, UrlParameter,
};

macro_rules! list_operations {
    ($($(#[$doc:meta])* $name:ident => $endpoint:ident as $entity:ty;)+) => {
        impl DataService {
            $(
                $(#[$doc])*
                ///
                /// # Errors
                /// Transport failures, malformed envelopes and rows that do
                /// not decode.
                pub async fn $name(
                    &self,
                    auth: &Auth,
                    query: &ListQuery,
                ) -> SdkResult<Vec<EntityRef<$entity>>> {
                    self.fetch_rows(Endpoint::$endpoint, auth, &[], &query.to_parameters())
                        .await
                }
            )+
        }
    };
}

list_operations! {
    /// List legal entities of the account.
    organizations => Organization as Agent;
    /// List product folders.
    product_folders => ProductFolder as ProductFolder;
    /// List warehouses.
    stores => Store as Store;
    projects => Project as Project;
    /// List employee groups.
    groups => Group as Group;
    currencies => Currency as Currency;
    contracts => Contract as Contract;
    employees => Employee as Employee;
    /// List employees read as agents, for pickers mixing employees with
    /// counterparties.
    employees_for_agents => Employee as Agent;
    /// List tasks; the query's sort order is passed through.
    tasks => Task as Task;
    expense_items => ExpenseItem as ExpenseItem;
    countries => Country as Country;
    /// List units of measure.
    uoms => Uom as Uom;
    /// List product variants.
    variants => Variant as Assortment;
}

impl DataService {
    /// List goods with stock columns as of now.
    ///
    /// # Errors
    /// Transport failures, malformed envelopes and rows that do not decode.
    pub async fn assortment(
        &self,
        auth: &Auth,
        query: &ListQuery,
        stock_store: Option<&str>,
        scope: Option<AssortmentScope>,
    ) -> SdkResult<Vec<EntityRef<Assortment>>> {
        let parameters = merge_url_parameters(
            query.to_parameters().into_iter().map(Some).chain([
                stock_store.map(|href| UrlParameter::StockStore(href.to_owned())),
                scope.map(UrlParameter::Scope),
                Some(UrlParameter::StockMomentAssortment(self.now())),
            ]),
        );
        self.fetch_rows(Endpoint::Assortment, auth, &[], &parameters)
            .await
    }

    /// List elements of the user-defined directory `metadata_id`.
    ///
    /// # Errors
    /// Transport failures, malformed envelopes and rows that do not decode.
    pub async fn custom_entities(
        &self,
        auth: &Auth,
        metadata_id: &str,
        offset: Option<Offset>,
        search: Option<&str>,
    ) -> SdkResult<Vec<EntityRef<CustomEntity>>> {
        let parameters = merge_url_parameters([
            offset.map(UrlParameter::Offset),
            search.map(|text| UrlParameter::Search(text.to_owned())),
        ]);
        self.fetch_rows(
            Endpoint::CustomEntity,
            auth,
            &[metadata_id.to_owned()],
            &parameters,
        )
        .await
    }

    /// Characteristics variants can be distinguished by; unreadable entries
    /// are dropped.
    ///
    /// # Errors
    /// Transport failures, or a response that is not an object.
    pub async fn variant_metadata(&self, auth: &Auth) -> SdkResult<Vec<EntityRef<VariantAttribute>>> {
        let endpoint = Endpoint::VariantMetadata;
        let document = self.fetch(endpoint, auth, &[], &[]).await?;
        decode_rows(
            &document,
            endpoint,
            "characteristics",
            RowPolicy::Lenient,
            decode_entity::<VariantAttribute>,
        )
    }

    /// Read one product.
    ///
    /// # Errors
    /// Transport failures, or a response that is not a decodable record.
    pub async fn product_assortment_by_id(
        &self,
        auth: &Auth,
        id: Uuid,
        expanders: &[Expander],
    ) -> SdkResult<EntityRef<Assortment>> {
        self.assortment_by_id(Endpoint::Product, auth, id, expanders)
            .await
    }

    /// Read one bundle.
    ///
    /// # Errors
    /// Transport failures, or a response that is not a decodable record.
    pub async fn bundle_assortment_by_id(
        &self,
        auth: &Auth,
        id: Uuid,
        expanders: &[Expander],
    ) -> SdkResult<EntityRef<Assortment>> {
        self.assortment_by_id(Endpoint::Bundle, auth, id, expanders)
            .await
    }

    /// Read one variant.
    ///
    /// # Errors
    /// Transport failures, or a response that is not a decodable record.
    pub async fn variant_assortment_by_id(
        &self,
        auth: &Auth,
        id: Uuid,
        expanders: &[Expander],
    ) -> SdkResult<EntityRef<Assortment>> {
        self.assortment_by_id(Endpoint::Variant, auth, id, expanders)
            .await
    }

    /// Read one service.
    ///
    /// # Errors
    /// Transport failures, or a response that is not a decodable record.
    pub async fn service_assortment_by_id(
        &self,
        auth: &Auth,
        id: Uuid,
        expanders: &[Expander],
    ) -> SdkResult<EntityRef<Assortment>> {
        self.assortment_by_id(Endpoint::Service, auth, id, expanders)
            .await
    }

    /// Read one task. Only the query's search, filter and expansions apply.
    ///
    /// # Errors
    /// Transport failures, or a response that is not a decodable record.
    pub async fn task_by_id(
        &self,
        auth: &Auth,
        id: Uuid,
        query: &ListQuery,
    ) -> SdkResult<EntityRef<Task>> {
        let parameters = merge_url_parameters([
            query.search.clone().map(UrlParameter::Search),
            Some(UrlParameter::Expand(query.expanders.clone())),
            query.filter.clone().map(UrlParameter::Filter),
        ]);
        self.fetch_single(Endpoint::Task, auth, &[id.to_string()], &parameters)
            .await
    }

    async fn assortment_by_id(
        &self,
        endpoint: Endpoint,
        auth: &Auth,
        id: Uuid,
        expanders: &[Expander],
    ) -> SdkResult<EntityRef<Assortment>> {
        let parameters = [UrlParameter::Expand(expanders.to_vec())];
        self.fetch_single(endpoint, auth, &[id.to_string()], &parameters)
            .await
    }
}

/// Keep only expanded entities, in order.
pub(crate) fn expanded<T>(items: Vec<EntityRef<T>>) -> Vec<T> {
    items.into_iter().filter_map(EntityRef::into_value).collect()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for list and single-item reads.
    use std::sync::Arc;

    use chrono::NaiveDateTime;
    use rstest::{fixture, rstest};
    use serde_json::{json, Value};

    use super::*;
    use crate::domain::ports::MockTransport;
    use crate::domain::{Credentials, Error, ErrorCode, SortDirection};
    use crate::test_support::FixedClock;

    const NOW: &str = "2024-03-14T12:30:00";

    fn now() -> NaiveDateTime {
        NOW.parse().expect("fixture moment")
    }

    #[fixture]
    fn auth() -> Auth {
        Auth::Basic(Credentials::try_from_parts("admin@shop", "secret").expect("valid credentials"))
    }

    fn store(id: &str) -> Value {
        json!({
            "meta": { "href": format!("https://host/entity/store/{id}"), "type": "store" },
            "id": "1a2b3c4d-5e6f-4a1b-8c2d-3e4f5a6b7c8d",
            "name": format!("store {id}"),
        })
    }

    fn service(transport: MockTransport) -> DataService {
        DataService::new(Arc::new(transport), Arc::new(FixedClock::at(now())))
    }

    #[rstest]
    #[tokio::test]
    async fn list_reads_pass_the_query_through(auth: Auth) {
        let query = ListQuery::page(Offset::new(25, 25, 50))
            .with_search("main")
            .ordered_by("name", SortDirection::Ascending);
        let expected = query.to_parameters();
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .withf(move |endpoint, _, path, parameters| {
                *endpoint == Endpoint::Store && path.is_empty() && parameters == expected.as_slice()
            })
            .times(1)
            .returning(|_, _, _, _| Ok(json!({ "rows": [store("1"), store("2")] })));

        let stores = service(transport).stores(&auth, &query).await.expect("stores");
        assert_eq!(stores.len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn a_single_bad_row_fails_the_list(auth: Auth) {
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .returning(|_, _, _, _| Ok(json!({ "rows": [store("1"), { "meta": store("2")["meta"].clone(), "name": 5 }] })));

        let error = service(transport)
            .stores(&auth, &ListQuery::default())
            .await
            .expect_err("integrity failure");
        assert_eq!(error, Error::integrity(Endpoint::Store, 1, 2));
    }

    #[rstest]
    #[tokio::test]
    async fn a_list_without_rows_is_empty(auth: Auth) {
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .times(1)
            .returning(|_, _, _, _| Ok(json!({ "meta": { "size": 0 } })));

        let stores = service(transport)
            .stores(&auth, &ListQuery::default())
            .await
            .expect("missing rows read as empty");
        assert!(stores.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn empty_lists_are_valid(auth: Auth) {
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .returning(|_, _, _, _| Ok(json!({ "rows": [] })));

        let uoms = service(transport)
            .uoms(&auth, &ListQuery::default())
            .await
            .expect("empty list");
        assert!(uoms.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn assortment_adds_scope_store_and_stock_moment(auth: Auth) {
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .withf(|endpoint, _, _, parameters| {
                *endpoint == Endpoint::Assortment
                    && parameters.ends_with(&[
                        UrlParameter::StockStore("https://host/entity/store/1".to_owned()),
                        UrlParameter::Scope(AssortmentScope::Product),
                        UrlParameter::StockMomentAssortment(now()),
                    ])
            })
            .times(1)
            .returning(|_, _, _, _| Ok(json!({ "rows": [] })));

        service(transport)
            .assortment(
                &auth,
                &ListQuery::default(),
                Some("https://host/entity/store/1"),
                Some(AssortmentScope::Product),
            )
            .await
            .expect("assortment");
    }

    #[rstest]
    #[tokio::test]
    async fn custom_entities_address_the_directory(auth: Auth) {
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .withf(|endpoint, _, path, parameters| {
                *endpoint == Endpoint::CustomEntity
                    && path == ["directory-1".to_owned()]
                    && parameters == [UrlParameter::Search("red".to_owned())]
            })
            .returning(|_, _, _, _| Ok(json!({ "rows": [] })));

        service(transport)
            .custom_entities(&auth, "directory-1", None, Some("red"))
            .await
            .expect("custom entities");
    }

    #[rstest]
    #[tokio::test]
    async fn variant_metadata_drops_unreadable_characteristics(auth: Auth) {
        let mut transport = MockTransport::new();
        transport.expect_get().returning(|_, _, _, _| {
            Ok(json!({
                "characteristics": [
                    {
                        "meta": { "href": "https://host/c/1", "type": "attributemetadata" },
                        "id": "2b3c4d5e-6f7a-4b8c-9d0e-1f2a3b4c5d6e",
                        "name": "Colour",
                    },
                    { "meta": { "href": "https://host/c/2" }, "name": "Size" },
                ]
            }))
        });

        let attributes = service(transport).variant_metadata(&auth).await.expect("metadata");
        assert_eq!(attributes.len(), 1);
    }

    #[rstest]
    #[case::product(Endpoint::Product)]
    #[case::bundle(Endpoint::Bundle)]
    #[case::variant(Endpoint::Variant)]
    #[case::service(Endpoint::Service)]
    #[tokio::test]
    async fn item_reads_address_the_id(#[case] expected: Endpoint, auth: Auth) {
        let id = Uuid::nil();
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .withf(move |endpoint, _, path, _| *endpoint == expected && path == [id.to_string()])
            .returning(|_, _, _, _| {
                Ok(json!({ "meta": { "href": "https://host/entity/product/0", "type": "product" } }))
            });
        let service = service(transport);

        let item = match expected {
            Endpoint::Product => service.product_assortment_by_id(&auth, id, &[]).await,
            Endpoint::Bundle => service.bundle_assortment_by_id(&auth, id, &[]).await,
            Endpoint::Variant => service.variant_assortment_by_id(&auth, id, &[]).await,
            _ => service.service_assortment_by_id(&auth, id, &[]).await,
        };
        assert!(item.expect("item").is_reference());
    }

    #[rstest]
    #[tokio::test]
    async fn malformed_item_is_rejected(auth: Auth) {
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .returning(|_, _, _, _| Ok(json!({ "name": "no meta" })));

        let error = service(transport)
            .task_by_id(&auth, Uuid::nil(), &ListQuery::default())
            .await
            .expect_err("malformed");
        assert_eq!(error.code(), ErrorCode::MalformedEnvelope);
    }
}
