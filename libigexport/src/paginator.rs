//! Paginated fetching of the media listing
//!
//! [`Paginator`] is a lazy, finite, non-restartable sequence of pages. It
//! starts at a seed URL and follows `paging.next` until the server stops
//! supplying one or a fetch fails. Between pages it sleeps for a fixed delay.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use libigexport::paginator::Paginator;
//! use libigexport::source::mock::MockSource;
//!
//! # async fn example() {
//! let source = MockSource::chain(vec![vec![], vec![]]);
//! let mut pages = Paginator::new(&source, MockSource::page_url(1), Duration::from_secs(1));
//!
//! while let Some(page) = pages.next_page().await {
//!     match page {
//!         Ok(page) => println!("{} records", page.records.len()),
//!         Err(e) => eprintln!("stopped: {}", e),
//!     }
//! }
//! # }
//! ```

use std::time::Duration;

use tracing::{debug, info};

use crate::error::FetchError;
use crate::source::MediaSource;
use crate::types::PageResponse;

pub struct Paginator<'a, S: MediaSource + ?Sized> {
    source: &'a S,
    next_url: Option<String>,
    delay: Duration,
    pages_fetched: usize,
}

impl<'a, S: MediaSource + ?Sized> Paginator<'a, S> {
    pub fn new(source: &'a S, seed_url: String, delay: Duration) -> Self {
        Self {
            source,
            next_url: Some(seed_url),
            delay,
            pages_fetched: 0,
        }
    }

    /// Fetch the next page
    ///
    /// Returns `None` once the listing is exhausted or after an error has
    /// been returned. An error is returned at most once.
    pub async fn next_page(&mut self) -> Option<Result<PageResponse, FetchError>> {
        // Taking the URL makes any early return below terminal
        let url = self.next_url.take()?;

        if self.pages_fetched > 0 && !self.delay.is_zero() {
            debug!(delay_ms = self.delay.as_millis() as u64, "Waiting before next page");
            tokio::time::sleep(self.delay).await;
        }

        let page = match self.source.fetch_page(&url).await {
            Ok(page) => page,
            Err(e) => return Some(Err(e)),
        };

        self.pages_fetched += 1;
        self.next_url = page.next_page_url().map(str::to_string);

        info!(
            source = self.source.name(),
            page = self.pages_fetched,
            records = page.records.len(),
            has_next = self.next_url.is_some(),
            "Fetched page"
        );

        Some(Ok(page))
    }

    /// Number of pages successfully fetched so far
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// True once no further page will be requested
    pub fn is_finished(&self) -> bool {
        self.next_url.is_none()
    }
}
