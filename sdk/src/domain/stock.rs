//! Stock reports.
//!
//! An empty stock report means the item has no stock anywhere; it is a
//! valid result, not a failure.

use chrono::NaiveDateTime;
use serde_json::Value;

use super::auth::Auth;
use super::decode_gate::{decode_records, RowPolicy, ROWS_FIELD};
use super::entity::{decode_entity, EntityRef};
use super::error::{Error, SdkResult};
use super::model::{Assortment, ProductStockAll, ProductStockStore, Store};
use super::ports::Endpoint;
use super::service::DataService;
use super::url_parameters::{Offset, StockMode, UrlParameter};

const STOCK_PAGE: Offset = Offset::new(100, 100, 0);

/// Aggregate stock of one item together with its per-store breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedStock {
    /// Stock across all stores; zeroed when the remote reports none.
    pub all: ProductStockAll,
    /// Stock per store.
    pub by_store: Vec<ProductStockStore>,
}

impl DataService {
    /// Aggregate stock of `assortments`, optionally for one store and point
    /// in time.
    ///
    /// # Errors
    /// Transport failures, malformed envelopes and rows that do not decode.
    pub async fn product_stock_all(
        &self,
        auth: &Auth,
        assortments: &[EntityRef<Assortment>],
        store: Option<&Store>,
        mode: StockMode,
        moment: Option<NaiveDateTime>,
    ) -> SdkResult<Vec<EntityRef<ProductStockAll>>> {
        let mut parameters: Vec<UrlParameter> = assortments
            .iter()
            .map(|item| UrlParameter::StockProductId(item.object_meta().object_id().to_owned()))
            .collect();
        if let Some(store) = store {
            parameters.push(UrlParameter::StockStoreId(store.id.to_string()));
        }
        if let Some(moment) = moment {
            parameters.push(UrlParameter::StockMoment(moment));
        }
        parameters.push(UrlParameter::StockMode(mode));
        parameters.push(UrlParameter::Offset(STOCK_PAGE));

        self.fetch_rows(Endpoint::StockAll, auth, &[], &parameters)
            .await
    }

    /// Stock of one item per store.
    ///
    /// Reads the `stockByStore` array of the first report row; a missing or
    /// empty array means no stock.
    ///
    /// # Errors
    /// Transport failures, a response that is not an object, and store rows
    /// that do not decode.
    pub async fn product_stock_by_store(
        &self,
        auth: &Auth,
        assortment: &Assortment,
    ) -> SdkResult<Vec<EntityRef<ProductStockStore>>> {
        let endpoint = Endpoint::StockByStore;
        let parameters = [
            UrlParameter::Offset(STOCK_PAGE),
            UrlParameter::StockProductId(assortment.id.to_string()),
        ];
        let document = self.fetch(endpoint, auth, &[], &parameters).await?;
        let Some(report) = document.as_object() else {
            return Err(Error::malformed(endpoint));
        };
        let records = report
            .get(ROWS_FIELD)
            .and_then(Value::as_array)
            .and_then(|rows| rows.first())
            .and_then(|row| row.get("stockByStore"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        decode_records(records, endpoint, RowPolicy::Strict, decode_entity::<ProductStockStore>)
    }

    /// Aggregate stock of one item, then its per-store breakdown.
    ///
    /// # Errors
    /// Failures of either read, and [`Error::UnexpectedReference`] when
    /// either report returns a bare reference.
    pub async fn product_combined_stock(
        &self,
        auth: &Auth,
        assortment: &Assortment,
    ) -> SdkResult<CombinedStock> {
        let item = [EntityRef::Entity(assortment.clone())];
        let all = match self
            .product_stock_all(auth, &item, None, StockMode::All, None)
            .await?
            .into_iter()
            .next()
        {
            None => ProductStockAll::empty(),
            Some(EntityRef::Entity(all)) => all,
            Some(EntityRef::Reference(_)) => {
                return Err(Error::unexpected_reference(Endpoint::StockAll));
            }
        };

        let by_store = self
            .product_stock_by_store(auth, assortment)
            .await?
            .into_iter()
            .map(|row| {
                row.into_value()
                    .ok_or_else(|| Error::unexpected_reference(Endpoint::StockByStore))
            })
            .collect::<SdkResult<Vec<_>>>()?;

        Ok(CombinedStock { all, by_store })
    }
}
