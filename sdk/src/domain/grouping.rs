//! Grouping-aware reads for paged screens.
//!
//! Each call takes the grouping returned by the previous page so a new page
//! extends it: assortment runs continue the trailing folder bucket, and
//! documents merge into existing days.

use pagination::{group_by_day, group_runs, Bucket, DayBucket};

use super::auth::Auth;
use super::catalogue::expanded;
use super::entity::{DocumentKind, EntityRef};
use super::error::SdkResult;
use super::model::{Assortment, Document};
use super::ports::Endpoint;
use super::service::DataService;
use super::url_parameters::{AssortmentScope, ListQuery};

/// Assortment grouped into runs sharing a folder name.
pub type FolderBucket = Bucket<String, Assortment>;

/// Group assortment by folder name in arrival order.
///
/// Items without a resolvable folder share the empty key. References are
/// skipped. Items must arrive sorted by folder for one bucket per folder.
pub fn group_assortment_by_folder(
    items: Vec<EntityRef<Assortment>>,
    previous: Option<Vec<FolderBucket>>,
) -> Vec<FolderBucket> {
    group_runs(
        expanded(items),
        |item| item.folder_name().unwrap_or_default().to_owned(),
        previous,
    )
}

/// Group documents by calendar day, newest day first.
///
/// References are skipped. Documents from `items` follow the previous
/// page's documents of the same day.
pub fn group_documents_by_day(
    items: Vec<EntityRef<Document>>,
    previous: Option<Vec<DayBucket<Document>>>,
) -> Vec<DayBucket<Document>> {
    group_by_day(expanded(items), |document| document.moment, previous)
}

impl DataService {
    /// Read a page of assortment and fold it into `previous` by folder.
    ///
    /// # Errors
    /// See [`DataService::assortment`].
    pub async fn assortment_grouped_by_product_folder(
        &self,
        auth: &Auth,
        query: &ListQuery,
        stock_store: Option<&str>,
        scope: Option<AssortmentScope>,
        previous: Option<Vec<FolderBucket>>,
    ) -> SdkResult<Vec<FolderBucket>> {
        let items = self.assortment(auth, query, stock_store, scope).await?;
        Ok(group_assortment_by_folder(items, previous))
    }

    /// List documents of one kind.
    ///
    /// # Errors
    /// Transport failures, malformed envelopes and rows that do not decode.
    pub async fn documents(
        &self,
        auth: &Auth,
        kind: DocumentKind,
        query: &ListQuery,
    ) -> SdkResult<Vec<EntityRef<Document>>> {
        self.fetch_rows(Endpoint::Document(kind), auth, &[], &query.to_parameters())
            .await
    }

    /// Read a page of documents and fold it into `previous` by day.
    ///
    /// # Errors
    /// See [`DataService::documents`].
    pub async fn documents_grouped_by_day(
        &self,
        auth: &Auth,
        kind: DocumentKind,
        query: &ListQuery,
        previous: Option<Vec<DayBucket<Document>>>,
    ) -> SdkResult<Vec<DayBucket<Document>>> {
        let items = self.documents(auth, kind, query).await?;
        Ok(group_documents_by_day(items, previous))
    }
}
