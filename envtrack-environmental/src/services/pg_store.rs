use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::Connection;

use envtrack_shared::clients::db::DbPool;
use envtrack_shared::errors::AppResult;

use crate::models::{
    upsert_impact_limit, CategorySummary, EnvironmentalData, ImpactLimit, LimitWrite,
    NewEnvironmentalData, NewImpactLimit,
};
use crate::services::queries;
use crate::services::store::{EntryFilter, EnvironmentalStore};

/// PostgreSQL-backed store. Every write runs in its own transaction, so a
/// failure rolls back before the error reaches the handler.
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> AppResult<PooledConnection<ConnectionManager<PgConnection>>> {
        Ok(self.pool.get()?)
    }
}

impl EnvironmentalStore for PgStore {
    fn insert_entry(&self, entry: NewEnvironmentalData) -> AppResult<EnvironmentalData> {
        let mut pooled = self.conn()?;
        let conn: &mut PgConnection = &mut pooled;
        let saved = conn.transaction(|conn| queries::insert_entry(conn, &entry))?;
        Ok(saved)
    }

    fn list_entries(&self, filter: &EntryFilter) -> AppResult<Vec<EnvironmentalData>> {
        let mut pooled = self.conn()?;
        Ok(queries::list_entries(&mut pooled, filter)?)
    }

    fn summarize(
        &self,
        user_id: i32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<CategorySummary>> {
        let mut pooled = self.conn()?;
        Ok(queries::summarize(&mut pooled, user_id, start, end)?)
    }

    fn upsert_limit(&self, limit: NewImpactLimit) -> AppResult<(ImpactLimit, LimitWrite)> {
        let mut pooled = self.conn()?;
        let conn: &mut PgConnection = &mut pooled;
        let written = conn.transaction(|conn| upsert_impact_limit(conn, &limit))?;
        Ok(written)
    }

    fn list_limits(&self, user_id: i32) -> AppResult<Vec<ImpactLimit>> {
        let mut pooled = self.conn()?;
        Ok(queries::list_limits(&mut pooled, user_id)?)
    }

    fn ping(&self) -> AppResult<()> {
        let mut pooled = self.conn()?;
        Ok(queries::ping(&mut pooled)?)
    }
}
