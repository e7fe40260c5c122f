//! Harvest state tracking
//!
//! The harvester's position in the listing and the reason it stopped.

use crate::registry::PageCursor;
use std::fmt;

/// Why a harvest stopped
///
/// Only schema violations abort a harvest; every variant here is a normal
/// way for it to finish with whatever rows were collected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    // ===== Complete =====
    /// The registry returned no `next` cursor
    EndOfData,

    /// The caller's page cap was reached
    MaxPagesReached { max_pages: u32 },

    // ===== Truncated =====
    /// The registry answered with a non-2xx status
    NonSuccessStatus { status: u16 },

    /// A page request timed out
    Timeout,

    /// A page request failed at the transport level
    TransportError { message: String },
}

impl StopReason {
    /// True when the listing was consumed as far as the caller asked
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::EndOfData | Self::MaxPagesReached { .. })
    }

    /// True when a failed page cut the harvest short
    pub fn is_truncated(&self) -> bool {
        !self.is_complete()
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndOfData => write!(f, "end of data"),
            Self::MaxPagesReached { max_pages } => write!(f, "reached max pages ({})", max_pages),
            Self::NonSuccessStatus { status } => write!(f, "HTTP {}", status),
            Self::Timeout => write!(f, "timeout"),
            Self::TransportError { message } => write!(f, "transport error: {}", message),
        }
    }
}

/// Position within a paginated listing
#[derive(Debug, Clone)]
pub struct HarvestState {
    /// Cursor for the next request; `None` once the registry stops sending one
    pub cursor: Option<PageCursor>,

    /// Number of page requests issued so far
    pub pages_requested: u32,

    /// Set once the harvest is over
    pub stopped: Option<StopReason>,
}

impl HarvestState {
    pub fn new() -> Self {
        Self {
            cursor: Some(PageCursor::first()),
            pages_requested: 0,
            stopped: None,
        }
    }

    /// Decides whether another page may be requested
    ///
    /// Evaluated before every pull. Records and returns the stop reason when
    /// the answer is no.
    pub fn check_termination(&mut self, max_pages: Option<u32>) -> Option<&StopReason> {
        if self.stopped.is_none() {
            if self.cursor.is_none() {
                self.stopped = Some(StopReason::EndOfData);
            } else if let Some(max_pages) = max_pages.filter(|max| self.pages_requested >= *max) {
                self.stopped = Some(StopReason::MaxPagesReached { max_pages });
            }
        }
        self.stopped.as_ref()
    }

    /// Records the next cursor from a successful page
    pub fn advance(&mut self, next: Option<String>) {
        self.cursor = next.map(PageCursor::from_next);
    }

    /// Ends the harvest with the given reason
    pub fn stop(&mut self, reason: StopReason) {
        self.cursor = None;
        self.stopped = Some(reason);
    }
}

impl Default for HarvestState {
    fn default() -> Self {
        Self::new()
    }
}
