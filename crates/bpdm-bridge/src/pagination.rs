//! Generic helpers that drain paginated Gate endpoints.
//!
//! No retry on transient failure: any error from the page-fetch function
//! propagates to the caller uncaught.

use std::future::Future;

use bpdm_gate_api::model::{PageDto, PageStartAfterDto};

/// Drain an offset-paginated endpoint.
///
/// Calls `fetch_page(0)`, then keeps incrementing the page index while it is
/// below `total_pages` as reported by the most recent response.  For a stable
/// paging window this issues exactly `total_pages` requests (at least one,
/// since `total_pages` is only known after the first call) and returns the
/// concatenation of all pages' content in page order.
pub async fn fetch_all_pages<T, E, F, Fut>(mut fetch_page: F) -> Result<Vec<T>, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<PageDto<T>, E>>,
{
    let mut page = 0;
    let mut content = Vec::new();
    loop {
        let response = fetch_page(page).await?;
        page += 1;
        let total_pages = response.total_pages;
        content.extend(response.content);
        if page >= total_pages {
            break;
        }
    }
    Ok(content)
}

/// Everything a cursor-paginated drain produced.
#[derive(Debug)]
pub struct CursorDrain<T> {
    /// Concatenated content of all pages, in page order.
    pub content: Vec<T>,

    /// Sum of the `invalid_entries` counts across pages.
    pub invalid_entries: u32,
}

/// Drain a cursor-paginated endpoint.
///
/// Calls `fetch_page(None)` first, then feeds each response's
/// `next_start_after` cursor into the next call until it is `None`.
pub async fn fetch_all_cursor_pages<T, E, F, Fut>(mut fetch_page: F) -> Result<CursorDrain<T>, E>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<PageStartAfterDto<T>, E>>,
{
    let mut start_after: Option<String> = None;
    let mut content = Vec::new();
    let mut invalid_entries = 0;
    loop {
        let response = fetch_page(start_after.take()).await?;
        content.extend(response.content);
        invalid_entries += response.invalid_entries;
        match response.next_start_after {
            Some(cursor) => start_after = Some(cursor),
            None => break,
        }
    }
    Ok(CursorDrain {
        content,
        invalid_entries,
    })
}
