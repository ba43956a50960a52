//! Observable events
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events in query processing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Configuration loaded
    ConfigLoaded,

    /// Query text received
    QueryReceived,
    /// Query text parsed into a descriptor
    QueryParsed,
    /// A table was loaded from its source
    TableLoaded,
    /// Join evaluated
    JoinApplied,
    /// Grouping pass evaluated
    GroupingApplied,
    /// WHERE filtering evaluated
    FilterApplied,
    /// Query produced its result set
    QueryExecuted,
    /// Query failed
    QueryRejected,
}

impl Event {
    /// Returns the event name
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::QueryReceived => "QUERY_RECEIVED",
            Event::QueryParsed => "QUERY_PARSED",
            Event::TableLoaded => "TABLE_LOADED",
            Event::JoinApplied => "JOIN_APPLIED",
            Event::GroupingApplied => "GROUPING_APPLIED",
            Event::FilterApplied => "FILTER_APPLIED",
            Event::QueryExecuted => "QUERY_EXECUTED",
            Event::QueryRejected => "QUERY_REJECTED",
        }
    }

    /// Per-stage events are only interesting when tracing
    pub fn is_stage(&self) -> bool {
        matches!(
            self,
            Event::QueryParsed
                | Event::TableLoaded
                | Event::JoinApplied
                | Event::GroupingApplied
                | Event::FilterApplied
        )
    }

    /// Returns true for failure events
    pub fn is_failure(&self) -> bool {
        matches!(self, Event::QueryRejected)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
