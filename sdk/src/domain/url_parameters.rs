//! URL parameters composed by callers and passed through to the transport.
//!
//! The orchestration layer only collects and orders these values; rendering
//! them into query strings is the transport adapter's job.

use chrono::NaiveDateTime;

/// Page window requested from a list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offset {
    /// Page size the caller renders.
    pub size: u32,
    /// Maximum number of rows requested.
    pub limit: u32,
    /// Index of the first row.
    pub offset: u32,
}

impl Offset {
    /// Build a page window.
    pub const fn new(size: u32, limit: u32, offset: u32) -> Self {
        Self {
            size,
            limit,
            offset,
        }
    }
}

/// A single `key=value` condition of a structured filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterArgument {
    /// Filtered field name.
    pub field: String,
    /// Comparison operator, `=` for equality.
    pub operator: String,
    /// Comparison value.
    pub value: String,
}

impl FilterArgument {
    /// Equality condition on `field`.
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator: "=".to_owned(),
            value: value.into(),
        }
    }
}

/// Structured filter made of conditions combined by the remote.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Filter(pub Vec<FilterArgument>);

impl Filter {
    /// Filter holding the given conditions.
    pub fn new(arguments: Vec<FilterArgument>) -> Self {
        Self(arguments)
    }
}

/// Nested objects the remote should expand inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expander(pub String);

impl Expander {
    /// Expand the field at `path`, e.g. `agent` or `positions.assortment`.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }
}

/// Restricts assortment listings to one kind of goods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssortmentScope {
    Product,
    Variant,
    Service,
    Bundle,
    Consignment,
}

impl AssortmentScope {
    /// Wire value of the scope.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Variant => "variant",
            Self::Service => "service",
            Self::Bundle => "bundle",
            Self::Consignment => "consignment",
        }
    }
}

/// Which stock rows a stock report returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StockMode {
    #[default]
    All,
    PositiveOnly,
    NegativeOnly,
    Empty,
    NonEmpty,
    UnderMinimum,
}

impl StockMode {
    /// Wire value of the mode.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::PositiveOnly => "positiveOnly",
            Self::NegativeOnly => "negativeOnly",
            Self::Empty => "empty",
            Self::NonEmpty => "nonEmpty",
            Self::UnderMinimum => "underMinimum",
        }
    }
}

/// Sort direction of an [`UrlParameter::Order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One query parameter of a remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlParameter {
    /// Page window.
    Offset(Offset),
    /// Structured filter.
    Filter(Filter),
    /// Free-text search.
    Search(String),
    /// Field expansion directives; rendered only when non-empty.
    Expand(Vec<Expander>),
    /// Restrict stock columns to the store at this href.
    StockStore(String),
    /// Restrict an assortment listing to one kind of goods.
    Scope(AssortmentScope),
    /// Stock report mode.
    StockMode(StockMode),
    /// Point in time for assortment stock columns.
    StockMomentAssortment(NaiveDateTime),
    /// Point in time for stock reports.
    StockMoment(NaiveDateTime),
    /// Restrict a stock report to one product id.
    StockProductId(String),
    /// Restrict a stock report to one store id.
    StockStoreId(String),
    /// Sort order by field.
    Order {
        /// Sorted field.
        field: String,
        /// Direction of the sort.
        direction: SortDirection,
    },
    /// Parameter without dedicated semantics.
    Generic {
        /// Query parameter name.
        name: String,
        /// Query parameter value.
        value: String,
    },
}

impl UrlParameter {
    /// Generic `name=value` parameter.
    pub fn generic(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Generic {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Collect the present parameters, keeping their relative order.
///
/// # Examples
/// ```
/// use moysklad_sdk::domain::{merge_url_parameters, UrlParameter};
///
/// let merged = merge_url_parameters([
///     None,
///     Some(UrlParameter::Search("tea".to_owned())),
///     None,
/// ]);
/// assert_eq!(merged, vec![UrlParameter::Search("tea".to_owned())]);
/// ```
pub fn merge_url_parameters(
    parameters: impl IntoIterator<Item = Option<UrlParameter>>,
) -> Vec<UrlParameter> {
    parameters.into_iter().flatten().collect()
}

/// Common arguments of list operations.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListQuery {
    /// Requested page window.
    pub offset: Option<Offset>,
    /// Objects to expand inline.
    pub expanders: Vec<Expander>,
    /// Structured filter.
    pub filter: Option<Filter>,
    /// Free-text search.
    pub search: Option<String>,
    /// Sort order.
    pub order: Option<(String, SortDirection)>,
}

impl ListQuery {
    /// Query with only a page window.
    pub fn page(offset: Offset) -> Self {
        Self {
            offset: Some(offset),
            ..Self::default()
        }
    }

    /// Set the free-text search.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Set the structured filter.
    #[must_use]
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Add an expansion directive.
    #[must_use]
    pub fn expand(mut self, expander: Expander) -> Self {
        self.expanders.push(expander);
        self
    }

    /// Set the sort order.
    #[must_use]
    pub fn ordered_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.order = Some((field.into(), direction));
        self
    }

    /// Render the query as positional parameters: offset, search,
    /// expansions, filter, order.
    pub fn to_parameters(&self) -> Vec<UrlParameter> {
        merge_url_parameters([
            self.offset.map(UrlParameter::Offset),
            self.search.clone().map(UrlParameter::Search),
            Some(UrlParameter::Expand(self.expanders.clone())),
            self.filter.clone().map(UrlParameter::Filter),
            self.order
                .clone()
                .map(|(field, direction)| UrlParameter::Order { field, direction }),
        ])
    }
}
