// Paged, deduplicated catalog of people

use holomap_client::{CatalogService, FetchError, PersonSummary};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Snapshot of the catalog browser.
///
/// Transitions build a new value instead of mutating in place, so two
/// snapshots can be compared with `==` to detect change.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogState {
    entries: Vec<PersonSummary>,
    cursor: u32,
    loading: bool,
    exhausted: bool,
    selected: Option<u32>,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            cursor: 1,
            loading: false,
            exhausted: false,
            selected: None,
        }
    }
}

impl CatalogState {
    pub fn entries(&self) -> &[PersonSummary] {
        &self.entries
    }

    /// Page number the next load will request
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn has_more(&self) -> bool {
        !self.exhausted
    }

    pub fn selected(&self) -> Option<u32> {
        self.selected
    }

    fn loading(&self) -> Self {
        Self {
            loading: true,
            ..self.clone()
        }
    }

    /// Merge a page: first occurrence of an id wins
    fn with_page(&self, rows: Vec<PersonSummary>) -> Self {
        if rows.is_empty() {
            return Self {
                loading: false,
                exhausted: true,
                ..self.clone()
            };
        }

        let mut seen: HashSet<u32> = self.entries.iter().map(|e| e.id).collect();
        let mut entries = self.entries.clone();
        for row in rows {
            if seen.insert(row.id) {
                entries.push(row);
            }
        }

        Self {
            entries,
            cursor: self.cursor + 1,
            loading: false,
            ..self.clone()
        }
    }

    fn failed(&self) -> Self {
        Self {
            loading: false,
            exhausted: true,
            ..self.clone()
        }
    }

    fn with_selection(&self, selected: Option<u32>) -> Self {
        Self {
            selected,
            ..self.clone()
        }
    }
}

/// A page fetch handed out by [`CatalogBrowser::begin_load`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: usize,
}

pub struct CatalogBrowser {
    state: CatalogState,
    page_size: usize,
}

impl CatalogBrowser {
    pub fn new(page_size: usize) -> Self {
        Self {
            state: CatalogState::default(),
            page_size,
        }
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Claim the next page fetch.
    ///
    /// Returns `None` while another fetch is in flight or once the catalog
    /// is exhausted.
    pub fn begin_load(&mut self) -> Option<PageRequest> {
        if self.state.loading || self.state.exhausted {
            debug!(
                "Skipping page load (loading: {}, exhausted: {})",
                self.state.loading, self.state.exhausted
            );
            return None;
        }

        self.state = self.state.loading();
        Some(PageRequest {
            page: self.state.cursor,
            page_size: self.page_size,
        })
    }

    /// Apply the outcome of a fetch claimed with `begin_load`.
    ///
    /// Failures are absorbed: the catalog is marked exhausted so the
    /// caller does not retry in a loop. Returns how many new entries were
    /// added.
    pub fn complete_load(
        &mut self,
        request: PageRequest,
        outcome: Result<Vec<PersonSummary>, FetchError>,
    ) -> usize {
        if !self.state.loading || request.page != self.state.cursor {
            debug!("Ignoring completion for page {}", request.page);
            return 0;
        }

        let before = self.state.entries.len();
        self.state = match outcome {
            Ok(rows) if rows.is_empty() => {
                info!("Catalog exhausted at page {}", request.page);
                self.state.with_page(rows)
            }
            Ok(rows) => self.state.with_page(rows),
            Err(e) => {
                warn!("Failed to load catalog page {}: {}", request.page, e);
                self.state.failed()
            }
        };

        let added = self.state.entries.len() - before;
        if added > 0 {
            info!(
                "Loaded page {}: {} new entries ({} total)",
                request.page,
                added,
                self.state.entries.len()
            );
        }
        added
    }

    /// Fetch and merge the next page. No fetch is issued while loading or
    /// after exhaustion.
    pub async fn load_next_page<S: CatalogService>(&mut self, service: &S) -> usize {
        let Some(request) = self.begin_load() else {
            return 0;
        };
        let outcome = service.list_people(request.page, request.page_size).await;
        self.complete_load(request, outcome)
    }

    pub fn select_entity(&mut self, id: Option<u32>) {
        self.state = self.state.with_selection(id);
    }
}
