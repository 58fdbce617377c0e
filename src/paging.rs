//! Shared access patterns: pagination, unique lookups, href ids, filters
//!
//! Every resource accessor is built from the same few pieces:
//! - `fetch_all_pages` keeps requesting `page + 1` while
//!   `total > page * page_size`, concatenating records and repeating the
//!   page size the server reported
//! - `expect_single` turns a filtered result list into exactly one record
//! - `href_id` derives an id from the last path segment of an href
//! - `Filter` and `QueryPath` build `(field==value;field2==value2)` queries

use std::fmt;
use std::future::Future;

use tracing::debug;
use url::form_urlencoded;

use crate::error::{VcdError, VcdResult};

/// A response envelope carrying one page of records.
pub trait Paged {
    type Item;

    fn page(&self) -> u32;
    fn page_size(&self) -> u32;
    fn total(&self) -> u32;
    fn into_items(self) -> Vec<Self::Item>;
}

/// Fetches every page of a paginated listing.
///
/// `fetch` is called with page numbers `1, 2, ...` and stops after the first
/// page for which `total <= page * page_size`. The first call gets no page
/// size so the server default applies; later calls get the size the
/// previous page reported, keeping the offsets consistent. A page that reports a zero
/// page size, or comes back empty before `total` is reached, is an error
/// rather than an endless loop.
pub async fn fetch_all_pages<P, F, Fut>(mut fetch: F) -> VcdResult<Vec<P::Item>>
where
    P: Paged,
    F: FnMut(u32, Option<u32>) -> Fut,
    Fut: Future<Output = VcdResult<P>>,
{
    let mut items = Vec::new();
    let mut next = 1;
    let mut size = None;
    loop {
        let envelope = fetch(next, size).await?;
        let page = envelope.page().max(next);
        let page_size = envelope.page_size();
        let total = envelope.total();
        let records = envelope.into_items();
        debug!(
            "Fetched page {} ({} records, pageSize={}, total={})",
            page,
            records.len(),
            page_size,
            total
        );

        let more = u64::from(total) > u64::from(page) * u64::from(page_size);
        if more && (page_size == 0 || records.is_empty()) {
            return Err(VcdError::decode(
                "paged result",
                format!("page {} is empty but total is {}", page, total),
            ));
        }
        items.extend(records);
        if !more {
            return Ok(items);
        }
        next = page + 1;
        size = Some(page_size);
    }
}

/// Reduces a filtered result list to the single expected record.
///
/// Zero matches is `NotFound` naming the identifier. More than one match
/// means the filter was not unique on the server side and is reported as
/// `NotUnique`; the first record is never picked silently.
pub fn expect_single<T>(mut items: Vec<T>, kind: &'static str, name: &str) -> VcdResult<T> {
    match items.len() {
        0 => Err(VcdError::not_found(kind, name)),
        1 => Ok(items.remove(0)),
        count => Err(VcdError::NotUnique {
            kind,
            name: name.to_string(),
            count,
        }),
    }
}

/// First record accepted by `matches`, scanning client-side.
///
/// Callers decide the matching rule; exact name equality is the norm.
pub fn find_one<T>(
    items: Vec<T>,
    kind: &'static str,
    name: &str,
    matches: impl Fn(&T) -> bool,
) -> VcdResult<T> {
    items
        .into_iter()
        .find(|item| matches(item))
        .ok_or_else(|| VcdError::not_found(kind, name))
}

/// Last `/`-separated segment of an href; the whole string when it has no `/`.
pub fn href_id(href: &str) -> &str {
    href.rsplit('/').next().unwrap_or(href)
}

/// Sorts records by name, byte-wise ascending.
pub fn sort_by_name<T>(items: &mut [T], name: impl Fn(&T) -> &str) {
    items.sort_by(|a, b| name(a).cmp(name(b)));
}

/// A `(field==value;field2==value2)` filter expression.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    terms: Vec<(String, String)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: impl Into<String>) -> Self {
        self.terms.push((field.to_string(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms = self
            .terms
            .iter()
            .map(|(field, value)| format!("{}=={}", field, value))
            .collect::<Vec<_>>()
            .join(";");
        write!(f, "({})", terms)
    }
}

/// Builds a request path with an encoded query string.
#[derive(Debug, Clone)]
pub struct QueryPath {
    path: String,
    params: Vec<(String, String)>,
}

impl QueryPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
        }
    }

    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    pub fn filter(self, filter: &Filter) -> Self {
        if filter.is_empty() {
            return self;
        }
        self.param("filter", filter)
    }

    pub fn page(self, page: u32) -> Self {
        self.param("page", page)
    }

    /// Adds `pageSize` when one is known.
    pub fn page_size(self, size: Option<u32>) -> Self {
        match size {
            Some(size) => self.param("pageSize", size),
            None => self,
        }
    }

    pub fn build(&self) -> String {
        if self.params.is_empty() {
            return self.path.clone();
        }
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.params {
            serializer.append_pair(key, value);
        }
        format!("{}?{}", self.path, serializer.finish())
    }
}
