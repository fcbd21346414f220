use thiserror::Error;

use crate::data_models::Results;

/// Articles requested per page. The upstream accepts up to 100.
pub const PAGE_SIZE: i64 = 20;

/// Last reachable page: the free upstream tier stops at 100 results,
/// which is 5 pages of `PAGE_SIZE`.
pub const LAST_REACHABLE_PAGE: i64 = 5;

#[derive(Debug, Error, PartialEq)]
#[error("invalid page number: {0:?}")]
pub struct InvalidPage(pub String);

/// Parse the `page` query parameter. Absent or empty means page 1.
pub fn parse_page(raw: Option<&str>) -> Result<i64, InvalidPage> {
    let raw = match raw {
        None | Some("") => return Ok(1),
        Some(raw) => raw,
    };
    match raw.parse::<i64>() {
        Ok(page) if page >= 1 => Ok(page),
        _ => Err(InvalidPage(raw.to_string())),
    }
}

/// Page count for a search. Divides before anything else, so partial pages
/// are dropped: 47 results at 20 per page gives 2 pages.
pub fn total_pages(total_results: i64, page_size: i64) -> i64 {
    total_results / page_size
}

/// Which feed a `Search` was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Query,
    Headlines,
}

/// Per-request search context handed to the renderer.
///
/// `next_page` points at the page the *next* fetch would ask for, so after a
/// successful fetch it sits one ahead of the page being shown.
#[derive(Debug, Clone, PartialEq)]
pub struct Search {
    pub kind: SearchKind,
    pub search_key: String,
    pub next_page: i64,
    pub total_pages: i64,
    pub results: Results,
}

impl Search {
    pub fn new(search_key: impl Into<String>, next_page: i64) -> Search {
        Search {
            kind: SearchKind::Query,
            search_key: search_key.into(),
            next_page: next_page.max(1),
            total_pages: 0,
            results: Results::default(),
        }
    }

    /// Search state for the headlines feed: no query, first page.
    pub fn headlines() -> Search {
        Search {
            kind: SearchKind::Headlines,
            ..Search::new("", 1)
        }
    }

    pub fn is_headlines(&self) -> bool {
        self.kind == SearchKind::Headlines
    }

    /// Store a freshly fetched search page and move the counter forward
    /// unless this was already the last page.
    pub fn apply_results(&mut self, results: Results, page_size: i64) {
        self.total_pages = total_pages(results.total_results, page_size);
        self.results = results;
        if !self.is_last_page() {
            self.next_page += 1;
        }
    }

    /// Store the headlines feed. The feed is not paginated upstream, so the
    /// page count is the raw result count.
    pub fn apply_headlines(&mut self, results: Results) {
        self.total_pages = results.total_results;
        self.results = results;
    }

    pub fn is_last_page(&self) -> bool {
        self.next_page >= self.total_pages
    }

    pub fn current_page(&self) -> i64 {
        if self.next_page == 1 {
            return self.next_page;
        }
        self.next_page - 1
    }

    /// Not clamped: on page 1 this is 0.
    pub fn previous_page(&self) -> i64 {
        self.current_page() - 1
    }

    pub fn go_to_end(&self) -> i64 {
        let remaining = LAST_REACHABLE_PAGE - self.current_page();
        self.current_page() + remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results_with_total(total_results: i64) -> Results {
        Results {
            status: "ok".to_string(),
            total_results,
            articles: vec![],
        }
    }

    fn search_at(next_page: i64, total_pages: i64) -> Search {
        let mut search = Search::new("rust", next_page);
        search.total_pages = total_pages;
        search
    }

    #[test]
    fn test_parse_page() {
        assert_eq!(parse_page(None), Ok(1));
        assert_eq!(parse_page(Some("")), Ok(1));
        assert_eq!(parse_page(Some("3")), Ok(3));
        assert_eq!(parse_page(Some("abc")), Err(InvalidPage("abc".to_string())));
        assert_eq!(parse_page(Some("0")), Err(InvalidPage("0".to_string())));
        assert_eq!(parse_page(Some("-2")), Err(InvalidPage("-2".to_string())));
        assert_eq!(parse_page(Some("1.5")), Err(InvalidPage("1.5".to_string())));
    }

    #[test]
    fn test_total_pages_truncates() {
        assert_eq!(total_pages(47, PAGE_SIZE), 2);
        assert_eq!(total_pages(40, PAGE_SIZE), 2);
        assert_eq!(total_pages(19, PAGE_SIZE), 0);
        assert_eq!(total_pages(0, PAGE_SIZE), 0);
        assert_eq!(total_pages(100, PAGE_SIZE), 5);
    }

    #[test]
    fn test_current_page() {
        assert_eq!(search_at(1, 10).current_page(), 1);
        for next in 2..20 {
            assert_eq!(search_at(next, 10).current_page(), next - 1);
        }
    }

    #[test]
    fn test_previous_page_is_unclamped() {
        assert_eq!(search_at(1, 10).previous_page(), 0);
        assert_eq!(search_at(2, 10).previous_page(), 0);
        assert_eq!(search_at(4, 10).previous_page(), 2);
    }

    #[test]
    fn test_go_to_end_is_constant() {
        for next in 1..50 {
            assert_eq!(search_at(next, 10).go_to_end(), LAST_REACHABLE_PAGE);
        }
    }

    #[test]
    fn test_is_last_page() {
        assert!(!search_at(1, 2).is_last_page());
        assert!(search_at(2, 2).is_last_page());
        assert!(search_at(3, 2).is_last_page());
        assert!(search_at(1, 0).is_last_page());
        assert!(search_at(1, 1).is_last_page());
    }

    #[test]
    fn test_new_never_below_one() {
        assert_eq!(Search::new("x", 0).next_page, 1);
        assert_eq!(Search::new("x", -7).next_page, 1);
    }

    #[test]
    fn test_apply_results_advances() {
        let mut search = Search::new("golang", 1);
        search.apply_results(results_with_total(40), PAGE_SIZE);
        assert_eq!(search.total_pages, 2);
        assert_eq!(search.next_page, 2);
        assert_eq!(search.current_page(), 1);
    }

    #[test]
    fn test_apply_results_stays_on_last_page() {
        let mut search = Search::new("golang", 2);
        search.apply_results(results_with_total(47), PAGE_SIZE);
        assert_eq!(search.total_pages, 2);
        assert_eq!(search.next_page, 2);
        assert_eq!(search.current_page(), 1);
    }

    #[test]
    fn test_apply_headlines_uses_raw_count() {
        let mut search = Search::headlines();
        search.apply_headlines(results_with_total(10));
        assert_eq!(search.total_pages, 10);
        assert_eq!(search.next_page, 1);
        assert!(search.is_headlines());
    }

    #[test]
    fn test_empty_query_is_not_headlines() {
        let search = Search::new("", 1);
        assert_eq!(search.kind, SearchKind::Query);
        assert!(!search.is_headlines());
    }
}
