//! Client-side list state: filtering, pagination and stale-response handling.

pub mod controller;
pub mod filters;
pub mod pagination;

pub use controller::{ListController, LoadOutcome, LoadState, PageReset, Predicate, RequestSequence, RequestTicket};
pub use filters::{AlertFilter, PenaltyFilter, VehicleFilter};
pub use pagination::PaginationWindow;
