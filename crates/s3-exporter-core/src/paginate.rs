//! Continuation-token pagination over an `ObjectLister`

use crate::{CoreError, Result};
use s3_exporter_store::{ListPage, ListingQuery, ObjectLister};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Walks a listing page by page until the store stops returning a
/// continuation token.
///
/// There is no page limit. The first error (store failure or cancellation)
/// ends the walk and every later call returns `None`.
pub struct Paginator<'a> {
    lister: &'a dyn ObjectLister,
    query: ListingQuery,
    cancel: CancellationToken,
    pages: usize,
    done: bool,
}

impl<'a> Paginator<'a> {
    pub fn new(lister: &'a dyn ObjectLister, query: ListingQuery, cancel: CancellationToken) -> Self {
        Self {
            lister,
            query,
            cancel,
            pages: 0,
            done: false,
        }
    }

    /// Fetch the next page, or `None` once the listing is exhausted
    pub async fn next_page(&mut self) -> Option<Result<ListPage>> {
        if self.done {
            return None;
        }

        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(CoreError::Cancelled),
            page = self.lister.list_page(&self.query) => page.map_err(CoreError::from),
        };

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };

        self.pages += 1;
        match page.next_continuation_token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => self.query.continuation_token = Some(token.to_string()),
            None => self.done = true,
        }

        debug!(
            bucket = %self.query.bucket,
            page = self.pages,
            objects = page.objects.len(),
            last = self.done,
            "Fetched listing page"
        );

        Some(Ok(page))
    }

    /// Pages fetched successfully so far
    pub fn pages_fetched(&self) -> usize {
        self.pages
    }

    /// Whether the walk has ended
    pub fn is_done(&self) -> bool {
        self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use s3_exporter_store::{MemoryStore, ObjectRecord, StoreError};
    use std::sync::Mutex;

    /// Replays fixed responses and records the tokens it was asked for
    struct Scripted {
        responses: Mutex<Vec<s3_exporter_store::Result<ListPage>>>,
        tokens: Mutex<Vec<Option<String>>>,
    }

    impl Scripted {
        fn new(mut responses: Vec<s3_exporter_store::Result<ListPage>>) -> Self {
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                tokens: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ObjectLister for Scripted {
        async fn list_page(&self, query: &ListingQuery) -> s3_exporter_store::Result<ListPage> {
            self.tokens.lock().unwrap().push(query.continuation_token.clone());
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(StoreError::Request("script exhausted".into())))
        }
    }

    fn page(n: usize, token: Option<&str>) -> ListPage {
        ListPage {
            objects: vec![ObjectRecord { size: 1, last_modified: None }; n],
            common_prefix_count: 0,
            next_continuation_token: token.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_follows_tokens() {
        let lister = Scripted::new(vec![
            Ok(page(2, Some("t1"))),
            Ok(page(2, Some("t2"))),
            Ok(page(1, None)),
        ]);
        let mut pages = Paginator::new(&lister, ListingQuery::new("b"), CancellationToken::new());

        let mut sizes = Vec::new();
        while let Some(page) = pages.next_page().await {
            sizes.push(page.unwrap().objects.len());
        }

        assert_eq!(sizes, vec![2, 2, 1]);
        assert_eq!(pages.pages_fetched(), 3);
        assert_eq!(
            *lister.tokens.lock().unwrap(),
            vec![None, Some("t1".to_string()), Some("t2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_empty_token_ends_listing() {
        let lister = Scripted::new(vec![Ok(page(1, Some("")))]);
        let mut pages = Paginator::new(&lister, ListingQuery::new("b"), CancellationToken::new());

        assert!(pages.next_page().await.unwrap().is_ok());
        assert!(pages.next_page().await.is_none());
        assert_eq!(lister.tokens.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_error_stops_walk() {
        let lister = Scripted::new(vec![
            Ok(page(2, Some("t1"))),
            Err(StoreError::Request("boom".into())),
            Ok(page(1, None)),
        ]);
        let mut pages = Paginator::new(&lister, ListingQuery::new("b"), CancellationToken::new());

        assert!(pages.next_page().await.unwrap().is_ok());
        assert!(matches!(pages.next_page().await, Some(Err(CoreError::Store(_)))));
        assert!(pages.next_page().await.is_none());
        assert!(pages.is_done());
        assert_eq!(lister.tokens.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_cancelled_before_first_page() {
        let store = MemoryStore::new().with_bucket("b");
        let cancel = CancellationToken::new();
        cancel.cancel();

        let mut pages = Paginator::new(&store, ListingQuery::new("b"), cancel);

        assert!(matches!(pages.next_page().await, Some(Err(CoreError::Cancelled))));
        assert!(pages.next_page().await.is_none());
    }
}
