//! Storage seam between the HTTP handlers and the relational store.
//!
//! Handlers only talk to [`EnvironmentalStore`]; production wires in
//! [`crate::services::PgStore`] and tests an in-memory implementation.

use chrono::{DateTime, Utc};

use envtrack_shared::errors::AppResult;

use crate::models::{
    CategorySummary, EnvironmentalData, ImpactLimit, LimitWrite, NewEnvironmentalData,
    NewImpactLimit,
};

/// Filters for listing entries. Bounds are inclusive on `date_recorded`.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryFilter {
    pub user_id: i32,
    pub data_type: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl EntryFilter {
    pub fn matches(&self, entry: &EnvironmentalData) -> bool {
        entry.user_id == self.user_id
            && self.data_type.as_deref().map_or(true, |t| entry.data_type == t)
            && self.start.map_or(true, |start| entry.date_recorded >= start)
            && self.end.map_or(true, |end| entry.date_recorded <= end)
    }
}

pub trait EnvironmentalStore: Send + Sync {
    /// Persist one entry atomically and return the stored row.
    fn insert_entry(&self, entry: NewEnvironmentalData) -> AppResult<EnvironmentalData>;

    /// Matching entries, most recently observed first.
    fn list_entries(&self, filter: &EntryFilter) -> AppResult<Vec<EnvironmentalData>>;

    /// Sum, mean and count per category for `user_id` within `[start, end]`.
    /// Categories with no entries in the window are absent from the result.
    fn summarize(
        &self,
        user_id: i32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<CategorySummary>>;

    /// Insert the limit, or overwrite the value of the one already stored for
    /// the same (user, category, period).
    fn upsert_limit(&self, limit: NewImpactLimit) -> AppResult<(ImpactLimit, LimitWrite)>;

    fn list_limits(&self, user_id: i32) -> AppResult<Vec<ImpactLimit>>;

    /// Cheap round trip used by the health check.
    fn ping(&self) -> AppResult<()>;
}
