//! Pagination aggregation
//!
//! Provider list APIs hand back one page at a time plus an opaque
//! continuation token. [`drain`] walks such an endpoint to exhaustion,
//! concatenating every page's items in page order. The aggregator itself
//! is provider-agnostic; per-provider clients translate the token variant
//! back into the next request's path and query.

use std::future::Future;

use crate::error::{Error, Result};

/// Hard cap on pages followed per listing. A provider that keeps
/// returning tokens past this is treated as non-terminating.
pub const MAX_PAGES: usize = 100;

/// Continuation token as handed back by a provider.
///
/// The two providers disagree on shape: GCP returns a bare token to echo
/// back as a query parameter, Azure returns a complete absolute URL that
/// must be decomposed before reuse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageToken {
    /// Bare token echoed back verbatim (GCP `pageToken`).
    Opaque(String),
    /// Absolute URL of the next page (Azure `nextLink`).
    NextLink(String),
}

/// One page of normalized results.
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<PageToken>,
}

impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self { items, next: None }
    }
}

/// Drive a single-scope list primitive to exhaustion.
///
/// `fetch_page` is invoked first with no token, then with each returned
/// continuation token; absence of a token on a page marks it as the last.
/// Returns the concatenation of every page's items, in page order, or
/// [`Error::PaginationOverflow`] if the endpoint never terminates.
pub async fn drain<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(Option<PageToken>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut all = Vec::new();
    let mut token = None;

    for _ in 0..MAX_PAGES {
        let page = fetch_page(token.take()).await?;
        all.extend(page.items);

        match page.next {
            Some(next) => token = Some(next),
            None => return Ok(all),
        }
    }

    Err(Error::PaginationOverflow(MAX_PAGES))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Serve `pages` one at a time, chaining opaque tokens between them.
    async fn fetch_scripted(
        pages: &[Vec<u32>],
        calls: &std::cell::RefCell<usize>,
        token: Option<PageToken>,
    ) -> Result<Page<u32>> {
        let idx = match token {
            None => 0,
            Some(PageToken::Opaque(t)) => t.parse::<usize>().unwrap(),
            Some(PageToken::NextLink(_)) => panic!("scripted pages use opaque tokens"),
        };
        *calls.borrow_mut() += 1;

        let next = if idx + 1 < pages.len() {
            Some(PageToken::Opaque((idx + 1).to_string()))
        } else {
            None
        };
        Ok(Page { items: pages[idx].clone(), next })
    }

    #[tokio::test]
    async fn drains_all_pages_in_order() {
        let pages = vec![vec![1, 2], vec![], vec![3]];
        let calls = std::cell::RefCell::new(0);

        let all = drain(|token| fetch_scripted(&pages, &calls, token)).await.unwrap();

        assert_eq!(all, vec![1, 2, 3]);
        // one request per page, including the terminating one
        assert_eq!(*calls.borrow(), 3);
    }

    #[tokio::test]
    async fn single_page_makes_single_request() {
        let pages = vec![vec![7]];
        let calls = std::cell::RefCell::new(0);

        let all = drain(|token| fetch_scripted(&pages, &calls, token)).await.unwrap();

        assert_eq!(all, vec![7]);
        assert_eq!(*calls.borrow(), 1);
    }

    #[tokio::test]
    async fn non_terminating_endpoint_overflows() {
        let result: Result<Vec<u32>> = drain(|_| async {
            Ok(Page { items: vec![0], next: Some(PageToken::Opaque("again".into())) })
        })
        .await;

        assert!(matches!(result, Err(Error::PaginationOverflow(MAX_PAGES))));
    }

    #[tokio::test]
    async fn first_page_error_propagates() {
        let result: Result<Vec<u32>> =
            drain(|_| async { Err(Error::Contract("boom".into())) }).await;
        assert!(matches!(result, Err(Error::Contract(_))));
    }
}
