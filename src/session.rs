//! Search session state
//!
//! A session moves Idle -> Searching -> Results. Each search gets a ticket
//! and only the newest ticket may publish results, so a slow earlier search
//! can never overwrite a later one.

use tracing::debug;

use crate::finder::SearchResults;
use crate::models::HotelRecord;

/// Identifies one search started on a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchTicket(u64);

#[derive(Debug, Clone, Default)]
pub enum SearchState {
    #[default]
    Idle,
    /// Idle again after a failed search, with the notice to show
    Failed {
        query: String,
        notice: String,
    },
    Searching {
        ticket: SearchTicket,
        query: String,
    },
    Results(SearchResults),
}

#[derive(Debug, Default)]
pub struct SearchSession {
    state: SearchState,
    issued: u64,
}

impl SearchSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a search; any previous results are cleared immediately
    pub fn begin(&mut self, query: impl Into<String>) -> SearchTicket {
        self.issued += 1;
        let ticket = SearchTicket(self.issued);
        self.state = SearchState::Searching {
            ticket,
            query: query.into(),
        };
        ticket
    }

    /// Publish results; returns false and drops them if `ticket` is stale
    pub fn complete(&mut self, ticket: SearchTicket, results: SearchResults) -> bool {
        if !self.is_current(ticket) {
            debug!("Discarding results of superseded search {:?}", ticket);
            return false;
        }
        self.state = SearchState::Results(results);
        true
    }

    /// Record a failed search; returns false if `ticket` is stale
    pub fn fail(&mut self, ticket: SearchTicket, notice: impl Into<String>) -> bool {
        let SearchState::Searching { ticket: current, query } = &self.state else {
            return false;
        };
        if *current != ticket {
            debug!("Discarding failure of superseded search {:?}", ticket);
            return false;
        }
        self.state = SearchState::Failed {
            query: query.clone(),
            notice: notice.into(),
        };
        true
    }

    pub fn reset(&mut self) {
        self.state = SearchState::Idle;
    }

    #[must_use]
    pub fn state(&self) -> &SearchState {
        &self.state
    }

    #[must_use]
    pub fn is_searching(&self) -> bool {
        matches!(self.state, SearchState::Searching { .. })
    }

    /// Hotels currently on display
    #[must_use]
    pub fn hotels(&self) -> &[HotelRecord] {
        match &self.state {
            SearchState::Results(results) => &results.hotels,
            _ => &[],
        }
    }

    #[must_use]
    pub fn results(&self) -> Option<&SearchResults> {
        match &self.state {
            SearchState::Results(results) => Some(results),
            _ => None,
        }
    }

    /// Notice to show the user, from a failure or a fallback result
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        match &self.state {
            SearchState::Failed { notice, .. } => Some(notice),
            SearchState::Results(results) => results.notice.as_deref(),
            _ => None,
        }
    }

    fn is_current(&self, ticket: SearchTicket) -> bool {
        matches!(self.state, SearchState::Searching { ticket: current, .. } if current == ticket)
    }
}
