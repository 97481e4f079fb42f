//! Rendering of domain URL parameters into query-string pairs.
//!
//! Parameters are rendered in the order the caller supplied them. A page
//! window expands into `limit` and `offset`; the page size is a caller-side
//! rendering hint and never reaches the wire.

use crate::domain::{format_moment, Filter, SortDirection, UrlParameter};

pub(super) type QueryPair = (String, String);

pub(super) fn query_pairs(parameters: &[UrlParameter]) -> Vec<QueryPair> {
    let mut pairs = Vec::with_capacity(parameters.len() + 1);
    for parameter in parameters {
        push_parameter(&mut pairs, parameter);
    }
    pairs
}

fn push_parameter(pairs: &mut Vec<QueryPair>, parameter: &UrlParameter) {
    match parameter {
        UrlParameter::Offset(offset) => {
            pairs.push(pair("limit", offset.limit.to_string()));
            pairs.push(pair("offset", offset.offset.to_string()));
        }
        UrlParameter::Filter(filter) => {
            if let Some(rendered) = render_filter(filter) {
                pairs.push(pair("filter", rendered));
            }
        }
        UrlParameter::Search(text) => pairs.push(pair("search", text.clone())),
        UrlParameter::Expand(expanders) => {
            if !expanders.is_empty() {
                let joined = expanders
                    .iter()
                    .map(|expander| expander.0.as_str())
                    .collect::<Vec<_>>()
                    .join(",");
                pairs.push(pair("expand", joined));
            }
        }
        UrlParameter::StockStore(href) => pairs.push(pair("stockstore", href.clone())),
        UrlParameter::Scope(scope) => pairs.push(pair("scope", scope.as_str().to_owned())),
        UrlParameter::StockMode(mode) => pairs.push(pair("stockMode", mode.as_str().to_owned())),
        UrlParameter::StockMomentAssortment(moment) => {
            pairs.push(pair("stockmoment", format_moment(*moment)));
        }
        UrlParameter::StockMoment(moment) => pairs.push(pair("moment", format_moment(*moment))),
        UrlParameter::StockProductId(id) => pairs.push(pair("product.id", id.clone())),
        UrlParameter::StockStoreId(id) => pairs.push(pair("store.id", id.clone())),
        UrlParameter::Order { field, direction } => {
            let direction = match direction {
                SortDirection::Ascending => "asc",
                SortDirection::Descending => "desc",
            };
            pairs.push(pair("order", format!("{field},{direction}")));
        }
        UrlParameter::Generic { name, value } => pairs.push((name.clone(), value.clone())),
    }
}

fn render_filter(filter: &Filter) -> Option<String> {
    if filter.0.is_empty() {
        return None;
    }
    let rendered = filter
        .0
        .iter()
        .map(|argument| format!("{}{}{}", argument.field, argument.operator, argument.value))
        .collect::<Vec<_>>()
        .join(";");
    Some(rendered)
}

fn pair(name: &str, value: String) -> QueryPair {
    (name.to_owned(), value)
}
