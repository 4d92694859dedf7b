//! Cursor-driven pagination
//!
//! Drains multi-page result sets from the remote logging service. Two stop rules exist:
//!
//! - [`Paginator`] stops when the service returns no continuation token. This is the
//!   contract of DescribeLogGroups and FilterLogEvents.
//! - [`StreamCursor`] stops when the service echoes back the token it was just sent.
//!   GetLogEvents never returns a null token, so reaching the end of a stream looks like a
//!   page whose forward token did not advance.
//!
//! Both loops issue one request at a time, check for cancellation between pages, and can
//! optionally cap the number of pages, time out or retry a single page fetch. A retry
//! always re-sends the cursor that produced the failure, so no page is skipped or
//! fetched twice.

#![warn(clippy::all, rust_2018_idioms)]

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::error::RetrievalError;
use super::types::{Cursor, Page};

/// Bounded retry with exponential backoff around a single page fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Surface the first error immediately
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff: Duration::ZERO,
        }
    }

    pub fn new(max_retries: u32, backoff: Duration) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    /// Delay before retry number `attempt` (zero-based): backoff, 2x, 4x, ...
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(2u32.saturating_pow(attempt))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

/// Everything a pagination loop collected, plus the error that ended it early.
///
/// Only the `*_partial` retrieval paths hand this to callers; the default paths convert
/// it with [`PartialDrain::into_result`], which discards the items on failure.
#[derive(Debug)]
pub struct PartialDrain<T> {
    pub items: Vec<T>,
    pub pages: usize,
    pub error: Option<RetrievalError>,
}

impl<T> PartialDrain<T> {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_result(self) -> Result<Vec<T>, RetrievalError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.items),
        }
    }
}

/// What to do with a freshly fetched page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Keep the items and follow the page's cursor
    Append,
    /// Keep the items, then stop
    AppendAndStop,
    /// Drop the page and stop
    Stop,
}

/// Null-terminated pagination loop
#[derive(Debug, Clone, Default)]
pub struct Paginator {
    cancel: CancellationToken,
    retry: RetryPolicy,
    page_timeout: Option<Duration>,
    max_pages: Option<usize>,
}

impl Paginator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort between pages once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_page_timeout(mut self, page_timeout: Option<Duration>) -> Self {
        self.page_timeout = page_timeout;
        self
    }

    /// Fail with [`RetrievalError::PageLimit`] instead of fetching more than
    /// `max_pages` pages. Guards against a service that never ends a listing.
    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Fetch `fetch(None)`, then every returned cursor until one is `None`, and
    /// concatenate the pages in call order. The first error ends the loop and is
    /// returned; items gathered so far are dropped.
    pub async fn drain<T, F, Fut>(&self, fetch: F) -> Result<Vec<T>, RetrievalError>
    where
        F: FnMut(Cursor) -> Fut,
        Fut: Future<Output = anyhow::Result<Page<T>>>,
    {
        self.drain_partial(fetch).await.into_result()
    }

    /// Same loop as [`Paginator::drain`], but keeps whatever was collected before a
    /// failure.
    pub async fn drain_partial<T, F, Fut>(&self, fetch: F) -> PartialDrain<T>
    where
        F: FnMut(Cursor) -> Fut,
        Fut: Future<Output = anyhow::Result<Page<T>>>,
    {
        self.drive(fetch, |_sent, next| match next {
            Some(_) => Step::Append,
            None => Step::AppendAndStop,
        })
        .await
    }

    async fn drive<T, F, Fut, S>(&self, mut fetch: F, mut step: S) -> PartialDrain<T>
    where
        F: FnMut(Cursor) -> Fut,
        Fut: Future<Output = anyhow::Result<Page<T>>>,
        S: FnMut(Option<&str>, Option<&str>) -> Step,
    {
        let mut items = Vec::new();
        let mut pages = 0;
        let mut cursor: Cursor = None;

        loop {
            if self.max_pages.is_some_and(|max| pages >= max) {
                trace_warn!("Pagination stopped at the {}-page limit", pages);
                return PartialDrain {
                    items,
                    pages,
                    error: Some(RetrievalError::PageLimit(pages)),
                };
            }

            let page = match self.fetch_page(&mut fetch, &cursor, pages).await {
                Ok(page) => page,
                Err(error) => {
                    trace_debug!("Pagination stopped after {} page(s): {}", pages, error);
                    return PartialDrain {
                        items,
                        pages,
                        error: Some(error),
                    };
                }
            };
            pages += 1;

            match step(cursor.as_deref(), page.next.as_deref()) {
                Step::Append => {
                    items.extend(page.items);
                    cursor = page.next;
                }
                Step::AppendAndStop => {
                    items.extend(page.items);
                    break;
                }
                Step::Stop => break,
            }
        }

        trace_debug!("Drained {} item(s) across {} page(s)", items.len(), pages);
        PartialDrain {
            items,
            pages,
            error: None,
        }
    }

    /// One page, with cancellation, timeout and retry applied
    async fn fetch_page<T, F, Fut>(
        &self,
        fetch: &mut F,
        cursor: &Cursor,
        pages: usize,
    ) -> Result<Page<T>, RetrievalError>
    where
        F: FnMut(Cursor) -> Fut,
        Fut: Future<Output = anyhow::Result<Page<T>>>,
    {
        let mut attempt = 0;

        loop {
            if self.cancel.is_cancelled() {
                return Err(RetrievalError::Cancelled { pages });
            }

            let result = match self.page_timeout {
                Some(limit) => match tokio::time::timeout(limit, fetch(cursor.clone())).await {
                    Ok(result) => result.map_err(RetrievalError::Remote),
                    Err(_) => Err(RetrievalError::Timeout(limit)),
                },
                None => fetch(cursor.clone()).await.map_err(RetrievalError::Remote),
            };

            match result {
                Ok(page) => return Ok(page),
                Err(error) if attempt < self.retry.max_retries => {
                    let delay = self.retry.delay_for(attempt);
                    attempt += 1;
                    trace_warn!(
                        "Page {} failed ({}), retry {}/{} in {:?}",
                        pages + 1,
                        error,
                        attempt,
                        self.retry.max_retries,
                        delay
                    );
                    tokio::select! {
                        _ = self.cancel.cancelled() => {
                            return Err(RetrievalError::Cancelled { pages });
                        }
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                Err(error) => return Err(error),
            }
        }
    }
}

/// Pagination for event retrieval, where end-of-data is a repeated cursor
#[derive(Debug, Clone, Default)]
pub struct StreamCursor {
    paginator: Paginator,
}

impl StreamCursor {
    pub fn new(paginator: Paginator) -> Self {
        Self { paginator }
    }

    /// Drain a stream: stop, without keeping the page, as soon as the service returns
    /// the same cursor it was sent. The first request carries no cursor, so it can
    /// never count as a repeat.
    pub async fn drain<T, F, Fut>(&self, fetch: F) -> Result<Vec<T>, RetrievalError>
    where
        F: FnMut(Cursor) -> Fut,
        Fut: Future<Output = anyhow::Result<Page<T>>>,
    {
        self.drain_partial(fetch).await.into_result()
    }

    pub async fn drain_partial<T, F, Fut>(&self, fetch: F) -> PartialDrain<T>
    where
        F: FnMut(Cursor) -> Fut,
        Fut: Future<Output = anyhow::Result<Page<T>>>,
    {
        self.paginator
            .drive(fetch, |sent, next| match (sent, next) {
                (Some(sent), Some(next)) if sent == next => Step::Stop,
                (_, Some(_)) => Step::Append,
                (_, None) => Step::AppendAndStop,
            })
            .await
    }
}
