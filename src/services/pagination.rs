use axum::http::{HeaderMap, HeaderValue};
use tracing::warn;

use crate::dao::rating_store::{Page, SortOrder};

pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// Build `X-Total-Count` and RFC 5988 `Link` headers for a page served at `base_path`.
///
/// Links are emitted in the order next, prev, last, first; `next` and `prev` only when
/// such a page exists.
pub fn generate_pagination_headers<T>(
    base_path: &str,
    page: &Page<T>,
    sort: &[SortOrder],
) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(TOTAL_COUNT_HEADER, HeaderValue::from(page.total_elements));

    let sort_suffix: String = sort.iter().map(|order| format!("&sort={order}")).collect();
    let link = |index: u64, rel: &str| {
        format!(
            "<{base_path}?page={index}&size={}{sort_suffix}>; rel=\"{rel}\"",
            page.size
        )
    };

    let mut links = Vec::with_capacity(4);
    if page.has_next() {
        links.push(link(page.page + 1, "next"));
    }
    if page.has_previous() {
        links.push(link(page.page - 1, "prev"));
    }
    links.push(link(page.total_pages().saturating_sub(1), "last"));
    links.push(link(0, "first"));

    match HeaderValue::from_str(&links.join(",")) {
        Ok(value) => {
            headers.insert(axum::http::header::LINK, value);
        }
        Err(err) => warn!(error = %err, base_path, "could not encode pagination link header"),
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::rating_store::{PageRequest, SortField};

    fn page(index: u64, size: u64, total: u64) -> Page<()> {
        Page::new(Vec::new(), &PageRequest::new(index, size), total)
    }

    #[test]
    fn first_page_links_to_next() {
        let headers = generate_pagination_headers("/api/game-ratings", &page(0, 2, 5), &[]);
        assert_eq!(headers[TOTAL_COUNT_HEADER], "5");
        assert_eq!(
            headers[axum::http::header::LINK],
            "</api/game-ratings?page=1&size=2>; rel=\"next\",\
             </api/game-ratings?page=2&size=2>; rel=\"last\",\
             </api/game-ratings?page=0&size=2>; rel=\"first\""
        );
    }

    #[test]
    fn last_page_has_prev_but_no_next() {
        let headers = generate_pagination_headers("/api/game-ratings", &page(2, 2, 5), &[]);
        let link = headers[axum::http::header::LINK].to_str().unwrap();
        assert!(!link.contains("rel=\"next\""));
        assert!(link.contains("</api/game-ratings?page=1&size=2>; rel=\"prev\""));
    }

    #[test]
    fn empty_result_points_last_at_first_page() {
        let headers = generate_pagination_headers("/r", &page(0, 20, 0), &[]);
        assert_eq!(
            headers[axum::http::header::LINK],
            "</r?page=0&size=20>; rel=\"last\",</r?page=0&size=20>; rel=\"first\""
        );
    }

    #[test]
    fn sort_is_preserved_in_links() {
        let headers = generate_pagination_headers(
            "/r",
            &page(0, 1, 1),
            &[SortOrder::desc(SortField::Score)],
        );
        let link = headers[axum::http::header::LINK].to_str().unwrap();
        assert!(link.starts_with("</r?page=0&size=1&sort=score,desc>; rel=\"last\""));
    }
}
