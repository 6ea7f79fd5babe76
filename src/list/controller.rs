//! List state for one resource type: raw items, filtered view, pagination and
//! request sequencing.

use std::fmt;
use std::sync::Arc;

use log::debug;

use super::pagination::PaginationWindow;

/// Filter predicate applied to every item
pub type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Fetch state of a list.
///
/// `Idle → Loading → Loaded | Error`, and `Error → Loading` on retry. Previously
/// loaded items stay visible in every state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error(String),
}

/// Monotonic sequence number handed out per fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// What a completed load does to the current page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageReset {
    /// Back to page 1 (filter or query changed)
    Reset,
    /// Keep the page (plain refresh, background polling)
    Preserve,
}

/// Hands out request tickets and remembers the newest one applied.
///
/// Used directly by views that load a single value rather than a list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestSequence {
    issued: u64,
    applied: u64,
}

impl RequestSequence {
    pub fn issue(&mut self) -> RequestTicket {
        self.issued += 1;
        RequestTicket(self.issued)
    }

    /// Record `ticket` as applied; `false` when an equal or newer one already was,
    /// or when this sequence never issued it
    pub fn accept(&mut self, ticket: RequestTicket) -> bool {
        if ticket.0 > self.issued {
            debug!("Discarding response #{} never issued here (last issued #{})", ticket.0, self.issued);
            return false;
        }
        if ticket.0 <= self.applied {
            debug!(
                "Discarding stale response #{} (last applied #{})",
                ticket.0, self.applied
            );
            return false;
        }
        self.applied = ticket.0;
        true
    }

    /// No request newer than `ticket` has been issued
    pub fn is_latest(&self, ticket: RequestTicket) -> bool {
        ticket.0 >= self.issued
    }

    pub fn has_applied(&self) -> bool {
        self.applied > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// An equal or newer response was already applied; nothing changed
    Stale,
}

pub struct ListController<T> {
    all: Vec<T>,
    filtered: Vec<T>,
    predicate: Option<Predicate<T>>,
    pagination: PaginationWindow,
    state: LoadState,
    sequence: RequestSequence,
}

impl<T: fmt::Debug> fmt::Debug for ListController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListController")
            .field("all", &self.all.len())
            .field("filtered", &self.filtered.len())
            .field("filtered_by_predicate", &self.predicate.is_some())
            .field("pagination", &self.pagination)
            .field("state", &self.state)
            .finish()
    }
}

impl<T: Clone> Default for ListController<T> {
    fn default() -> Self {
        Self::new(PaginationWindow::default().page_size())
    }
}

impl<T: Clone> ListController<T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            all: Vec::new(),
            filtered: Vec::new(),
            predicate: None,
            pagination: PaginationWindow::new(page_size),
            state: LoadState::Idle,
            sequence: RequestSequence::default(),
        }
    }

    /// Start a fetch: hands out the next ticket and enters `Loading`
    pub fn begin_load(&mut self) -> RequestTicket {
        self.state = LoadState::Loading;
        self.sequence.issue()
    }

    /// Apply the result of the fetch identified by `ticket`.
    ///
    /// Results older than the last applied one are discarded. The state only
    /// settles to `Loaded`/`Error` once the newest issued request has answered;
    /// on error the previous items stay in place.
    pub fn complete_load<E: fmt::Display>(
        &mut self,
        ticket: RequestTicket,
        result: Result<Vec<T>, E>,
        reset: PageReset,
    ) -> LoadOutcome {
        if !self.sequence.accept(ticket) {
            return LoadOutcome::Stale;
        }
        let latest = self.sequence.is_latest(ticket);

        match result {
            Ok(items) => {
                self.all = items;
                self.refilter(reset);
                if latest {
                    self.state = LoadState::Loaded;
                }
            }
            Err(e) => {
                if latest {
                    self.state = LoadState::Error(e.to_string());
                }
            }
        }
        LoadOutcome::Applied
    }

    /// Replace the items outright (a fetch that completed synchronously)
    pub fn load(&mut self, items: Vec<T>, reset: PageReset) {
        let ticket = self.begin_load();
        self.complete_load::<std::convert::Infallible>(ticket, Ok(items), reset);
    }

    /// Filter with `predicate` and return to page 1
    pub fn apply_filter<F>(&mut self, predicate: F)
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(predicate));
        self.refilter(PageReset::Reset);
    }

    /// Drop the filter and return to page 1
    pub fn clear_filter(&mut self) {
        self.predicate = None;
        self.refilter(PageReset::Reset);
    }

    pub fn set_page(&mut self, n: usize) {
        self.pagination.set_page(n);
    }

    pub fn set_page_size(&mut self, n: usize) {
        self.pagination.set_page_size(n);
    }

    pub fn next_page(&mut self) {
        self.pagination.next_page();
    }

    pub fn prev_page(&mut self) {
        self.pagination.prev_page();
    }

    pub fn first_page(&mut self) {
        self.pagination.first_page();
    }

    pub fn last_page(&mut self) {
        self.pagination.last_page();
    }

    /// The rendered window: `filtered[(page-1)*size .. page*size]`
    pub fn visible(&self) -> &[T] {
        self.pagination.slice(&self.filtered)
    }

    pub fn all(&self) -> &[T] {
        &self.all
    }

    pub fn filtered(&self) -> &[T] {
        &self.filtered
    }

    pub fn pagination(&self) -> &PaginationWindow {
        &self.pagination
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn has_loaded(&self) -> bool {
        self.sequence.has_applied()
    }

    fn refilter(&mut self, reset: PageReset) {
        self.filtered = match &self.predicate {
            Some(predicate) => self.all.iter().filter(|item| predicate(item)).cloned().collect(),
            None => self.all.clone(),
        };
        self.pagination.set_total_items(self.filtered.len());
        if reset == PageReset::Reset {
            self.pagination.reset();
        }
    }
}
