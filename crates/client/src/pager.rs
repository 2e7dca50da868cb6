use std::sync::Arc;

use api_types::envelope::{EnvelopeSearchItem, SearchEnvelopeQuery};
use tokio::sync::Mutex;

use crate::{result::ApiResult, services::EnvelopesService};

pub const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Default)]
struct Cursor {
    next_page: u32,
    finished: bool,
}

/// Loads consecutive pages of an envelope search.
///
/// Concurrent `next_page` calls are serialized: the cursor lock is held for
/// the duration of the request, so two triggers never fetch the same page.
/// A failed request leaves the cursor where it was.
#[derive(Clone, Debug)]
pub struct EnvelopePager {
    service: EnvelopesService,
    query: SearchEnvelopeQuery,
    first_page: u32,
    cursor: Arc<Mutex<Cursor>>,
}

impl EnvelopePager {
    pub(crate) fn new(service: EnvelopesService, mut query: SearchEnvelopeQuery) -> Self {
        let first_page = query.page.unwrap_or(0);
        query.size.get_or_insert(DEFAULT_PAGE_SIZE);
        Self {
            service,
            query,
            first_page,
            cursor: Arc::new(Mutex::new(Cursor {
                next_page: first_page,
                finished: false,
            })),
        }
    }

    /// Fetches the next page. Once the last page was returned this yields
    /// empty successes without touching the network.
    pub async fn next_page(&self) -> ApiResult<Vec<EnvelopeSearchItem>> {
        let mut cursor = self.cursor.lock().await;
        if cursor.finished {
            return ApiResult::success_of(Vec::new());
        }

        let query = SearchEnvelopeQuery {
            page: Some(cursor.next_page),
            ..self.query.clone()
        };
        tracing::debug!(page = cursor.next_page, "loading envelope page");

        self.service.search(&query).await.map(|page| {
            match page.page.checked_add(1) {
                Some(next_page) => {
                    cursor.finished = !page.has_next();
                    cursor.next_page = next_page;
                }
                None => cursor.finished = true,
            }
            page.data
        })
    }

    pub async fn is_finished(&self) -> bool {
        self.cursor.lock().await.finished
    }

    /// Starts over from the first page.
    pub async fn reset(&self) {
        let mut cursor = self.cursor.lock().await;
        cursor.next_page = self.first_page;
        cursor.finished = false;
    }
}
