//! Cursor-driven pagination
//!
//! Workable list endpoints return `{ "<collection>": [...], "paging": { "next": url } }`.
//! The `next` URL is server-supplied and followed verbatim. A [`Pager`] fetches
//! one page per `Iterator::next` call, so consumers can start working on early
//! pages while later ones have not been requested yet.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;

use super::api::Paging;
use super::{ApiError, WorkableClient};

/// One page of a list response
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Absolute URL of the following page, `None` on the last page
    pub next: Option<String>,
}

impl<T: DeserializeOwned> Page<T> {
    /// Parse a list response body, reading items from `collection`
    pub fn parse(body: Value, collection: &str) -> Result<Self, ApiError> {
        let mut body = body;

        let items = match body.get_mut(collection).map(Value::take) {
            Some(Value::Null) | None => Vec::new(),
            Some(items) => serde_json::from_value(items)?,
        };

        let paging: Paging = match body.get_mut("paging").map(Value::take) {
            Some(Value::Null) | None => Paging::default(),
            Some(paging) => serde_json::from_value(paging)?,
        };

        Ok(Self {
            items,
            next: paging.next.filter(|next| !next.is_empty()),
        })
    }
}

/// Lazy, finite sequence of pages for one collection
///
/// Not resumable: a failed fetch is yielded once and ends the sequence.
/// Empty pages are skipped, only a missing cursor ends iteration.
pub struct Pager<'a, T> {
    client: &'a WorkableClient,
    collection: &'static str,
    next_url: Option<String>,
    pages_fetched: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T: DeserializeOwned> Pager<'a, T> {
    pub(crate) fn new(client: &'a WorkableClient, collection: &'static str, url: String) -> Self {
        Self {
            client,
            collection,
            next_url: Some(url),
            pages_fetched: 0,
            _marker: PhantomData,
        }
    }

    /// Number of physical page requests made so far
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Drain every page into one list, preserving order
    pub fn collect_all(self) -> Result<Vec<T>, ApiError> {
        let mut all = Vec::new();
        for page in self {
            all.extend(page?.items);
        }
        Ok(all)
    }

    fn fetch(&mut self, url: &str) -> Result<Page<T>, ApiError> {
        self.pages_fetched += 1;
        let body: Value = self.client.fetch(url)?.json()?;
        Page::parse(body, self.collection)
    }
}

impl<T: DeserializeOwned> Iterator for Pager<'_, T> {
    type Item = Result<Page<T>, ApiError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let url = self.next_url.take()?;
            let page = match self.fetch(&url) {
                Ok(page) => page,
                Err(e) => return Some(Err(e)),
            };

            self.next_url = page.next.clone();
            if !page.items.is_empty() {
                return Some(Ok(page));
            }
        }
    }
}
