// Tests for catalog browsing and pagination

mod common;

use common::{FakeCatalog, page};
use holomap_client::FetchError;
use holomap_core::browser::CatalogBrowser;
use proptest::collection::vec;
use proptest::prelude::*;
use std::collections::HashSet;

// ============================================================================
// Pagination
// ============================================================================

#[tokio::test]
async fn test_full_page_then_empty_page_stops_fetching() {
    let catalog = FakeCatalog::new().with_page(page(1..=10)).with_page(page([]));
    let mut browser = CatalogBrowser::new(10);

    assert_eq!(browser.load_next_page(&catalog).await, 10);
    assert!(browser.state().has_more());
    assert_eq!(browser.state().cursor(), 2);

    assert_eq!(browser.load_next_page(&catalog).await, 0);
    assert!(!browser.state().has_more());
    assert_eq!(browser.state().cursor(), 2);

    assert_eq!(browser.load_next_page(&catalog).await, 0);
    assert_eq!(catalog.list_calls(), 2);
}

#[tokio::test]
async fn test_load_after_exhaustion_leaves_state_unchanged() {
    let catalog = FakeCatalog::new().with_page(page([1, 2])).with_page(page([]));
    let mut browser = CatalogBrowser::new(2);

    browser.load_next_page(&catalog).await;
    browser.load_next_page(&catalog).await;
    let exhausted = browser.state().clone();

    browser.load_next_page(&catalog).await;
    browser.load_next_page(&catalog).await;

    assert_eq!(browser.state(), &exhausted);
    assert_eq!(catalog.list_calls(), 2);
}

#[tokio::test]
async fn test_second_load_while_loading_is_noop() {
    let catalog = FakeCatalog::new().with_page(page([1]));
    let mut browser = CatalogBrowser::new(10);

    let request = browser.begin_load().unwrap();
    assert!(browser.state().is_loading());

    // A load triggered while the first is in flight issues no fetch
    assert_eq!(browser.load_next_page(&catalog).await, 0);
    assert_eq!(catalog.list_calls(), 0);

    browser.complete_load(request, Ok(vec![common::summary(1)]));
    assert!(!browser.state().is_loading());
    assert_eq!(browser.state().entries().len(), 1);
}

// ============================================================================
// Failure policy
// ============================================================================

#[tokio::test]
async fn test_transport_failure_marks_exhausted() {
    let catalog = FakeCatalog::new()
        .with_page(page([1, 2, 3]))
        .with_page(Err(FetchError::Status {
            status: 502,
            url: "fake://people".to_string(),
        }))
        .with_page(page([4, 5]));
    let mut browser = CatalogBrowser::new(3);

    browser.load_next_page(&catalog).await;
    browser.load_next_page(&catalog).await;

    let ids: Vec<u32> = browser.state().entries().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert!(browser.state().is_exhausted());
    assert!(!browser.state().is_loading());

    // No retry once a page has failed
    browser.load_next_page(&catalog).await;
    assert_eq!(catalog.list_calls(), 2);
}

#[tokio::test]
async fn test_malformed_payload_stops_pagination() {
    let catalog = FakeCatalog::new().with_page(Err(FetchError::MalformedResponse(
        "expected results to be an array, got object".to_string(),
    )));
    let mut browser = CatalogBrowser::new(10);

    assert_eq!(browser.load_next_page(&catalog).await, 0);
    assert!(browser.state().entries().is_empty());
    assert!(!browser.state().has_more());
}

// ============================================================================
// Deduplication
// ============================================================================

#[tokio::test]
async fn test_overlapping_pages_keep_first_occurrence() {
    let catalog = FakeCatalog::new()
        .with_page(page([1, 2, 3]))
        .with_page(page([3, 4, 2]))
        .with_page(page([5]));
    let mut browser = CatalogBrowser::new(3);

    browser.load_next_page(&catalog).await;
    browser.load_next_page(&catalog).await;
    browser.load_next_page(&catalog).await;

    let ids: Vec<u32> = browser.state().entries().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_page_of_only_duplicates_still_advances() {
    let catalog = FakeCatalog::new().with_page(page([1, 2])).with_page(page([2, 1]));
    let mut browser = CatalogBrowser::new(2);

    browser.load_next_page(&catalog).await;
    assert_eq!(browser.load_next_page(&catalog).await, 0);

    assert_eq!(browser.state().entries().len(), 2);
    assert_eq!(browser.state().cursor(), 3);
    assert!(browser.state().has_more());
}

proptest! {
    #[test]
    fn test_accumulated_ids_are_unique_for_arbitrary_pages(
        pages in vec(vec(0u32..20, 1..8), 1..6)
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let mut catalog = FakeCatalog::new();
        for ids in &pages {
            catalog = catalog.with_page(page(ids.iter().copied()));
        }

        let mut browser = CatalogBrowser::new(8);
        runtime.block_on(async {
            while browser.state().has_more() {
                browser.load_next_page(&catalog).await;
            }
        });

        let entries: Vec<u32> = browser.state().entries().iter().map(|e| e.id).collect();
        let unique: HashSet<u32> = entries.iter().copied().collect();
        prop_assert_eq!(unique.len(), entries.len());

        // First occurrence wins, in page order
        let mut seen = HashSet::new();
        let expected: Vec<u32> = pages
            .iter()
            .flatten()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();
        prop_assert_eq!(entries, expected);
        prop_assert_eq!(browser.state().cursor(), pages.len() as u32 + 1);
    }
}
