//! Mock source implementation for testing
//!
//! Serves a scripted set of pages keyed by URL and records every URL it was
//! asked for, so tests can check exactly which pages the paginator requested
//! without network access.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::FetchError;
use crate::source::MediaSource;
use crate::types::{PageResponse, PostRecord};

#[derive(Debug, Clone, Default)]
pub struct MockSource {
    responses: HashMap<String, Result<PageResponse, FetchError>>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `page` for `url`
    pub fn with_page(mut self, url: &str, page: PageResponse) -> Self {
        self.responses.insert(url.to_string(), Ok(page));
        self
    }

    /// Fail requests for `url` with `error`
    pub fn with_error(mut self, url: &str, error: FetchError) -> Self {
        self.responses.insert(url.to_string(), Err(error));
        self
    }

    /// Build a linked chain of pages at `mock://page/1`, `mock://page/2`, ...
    ///
    /// Each page links to the next; the last page has no `paging.next`.
    pub fn chain(pages: Vec<Vec<PostRecord>>) -> Self {
        let count = pages.len();
        let mut source = Self::new();
        for (index, records) in pages.into_iter().enumerate() {
            let number = index + 1;
            let next = (number < count).then(|| Self::page_url(number + 1));
            source = source.with_page(&Self::page_url(number), PageResponse::new(records, next));
        }
        source
    }

    /// URL used by [`MockSource::chain`] for page `number` (1-based)
    pub fn page_url(number: usize) -> String {
        format!("mock://page/{}", number)
    }

    /// URLs requested so far, in order
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaSource for MockSource {
    async fn fetch_page(&self, url: &str) -> Result<PageResponse, FetchError> {
        self.requested.lock().unwrap().push(url.to_string());

        match self.responses.get(url) {
            Some(response) => response.clone(),
            None => Err(FetchError::Status {
                status: 404,
                body: format!("no scripted page for {}", url),
            }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
