//! Media listing sources
//!
//! A [`MediaSource`] fetches one page of the media listing from a URL. The
//! [`Paginator`](crate::paginator::Paginator) owns the loop and decides which
//! URL to ask for next; sources never follow `paging.next` on their own.
//!
//! - [`graph::GraphClient`]: the Instagram Graph API over HTTP
//! - [`mock::MockSource`]: scripted pages for tests

use async_trait::async_trait;

use crate::error::FetchError;
use crate::types::PageResponse;

pub mod graph;

// Mock source is available for all builds (not just tests) to support integration tests
pub mod mock;

/// A source of paginated media listings
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Fetch and decode the page at `url`
    ///
    /// # Errors
    ///
    /// - `FetchError::Network` if the request could not be completed
    /// - `FetchError::Status` if the server answered with anything but 200
    /// - `FetchError::Decode` if the body is not a valid page
    async fn fetch_page(&self, url: &str) -> Result<PageResponse, FetchError>;

    /// Short lowercase name used in log fields
    fn name(&self) -> &str;
}
