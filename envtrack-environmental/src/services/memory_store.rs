use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use envtrack_shared::errors::{AppError, AppResult};

use crate::models::{
    CategorySummary, EnvironmentalData, ImpactLimit, LimitWrite, NewEnvironmentalData,
    NewImpactLimit,
};
use crate::services::store::{EntryFilter, EnvironmentalStore};

#[derive(Default)]
struct Tables {
    users: BTreeSet<i32>,
    entries: Vec<EnvironmentalData>,
    limits: Vec<ImpactLimit>,
    next_entry_id: i32,
    next_limit_id: i32,
}

/// User seeded by the initial migration.
const SEEDED_USER: i32 = 1;

/// In-process stand-in for PostgreSQL with the same ordering and upsert rules.
/// Writes for an owner missing from `users` fail like the foreign key does.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    unavailable: bool,
}

impl MemoryStore {
    /// Only the seeded user exists, as after a fresh migration.
    pub fn new() -> Self {
        Self::with_users([SEEDED_USER])
    }

    pub fn with_users(users: impl IntoIterator<Item = i32>) -> Self {
        Self {
            tables: Mutex::new(Tables {
                users: users.into_iter().collect(),
                ..Tables::default()
            }),
            unavailable: false,
        }
    }

    /// A store whose every call fails, for exercising storage error paths.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    fn tables(&self) -> AppResult<std::sync::MutexGuard<'_, Tables>> {
        if self.unavailable {
            return Err(AppError::storage("connection refused"));
        }
        self.tables
            .lock()
            .map_err(|_| AppError::storage("memory store poisoned"))
    }
}

impl Tables {
    fn require_user(&self, user_id: i32) -> AppResult<()> {
        if self.users.contains(&user_id) {
            Ok(())
        } else {
            Err(AppError::storage(format!(
                "violação de chave estrangeira: user_id {user_id} não existe"
            )))
        }
    }
}

impl EnvironmentalStore for MemoryStore {
    fn insert_entry(&self, entry: NewEnvironmentalData) -> AppResult<EnvironmentalData> {
        let mut tables = self.tables()?;
        tables.require_user(entry.user_id)?;
        tables.next_entry_id += 1;
        let saved = EnvironmentalData {
            id: tables.next_entry_id,
            user_id: entry.user_id,
            data_type: entry.data_type,
            value: entry.value,
            unit: entry.unit,
            description: entry.description,
            date_recorded: entry.date_recorded,
            created_at: Utc::now(),
        };
        tables.entries.push(saved.clone());
        Ok(saved)
    }

    fn list_entries(&self, filter: &EntryFilter) -> AppResult<Vec<EnvironmentalData>> {
        let tables = self.tables()?;
        let mut found: Vec<EnvironmentalData> = tables
            .entries
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            b.date_recorded
                .cmp(&a.date_recorded)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(found)
    }

    fn summarize(
        &self,
        user_id: i32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<CategorySummary>> {
        let filter = EntryFilter {
            user_id,
            data_type: None,
            start: Some(start),
            end: Some(end),
        };
        let tables = self.tables()?;

        let mut groups: BTreeMap<&str, (f64, i64)> = BTreeMap::new();
        for entry in tables.entries.iter().filter(|e| filter.matches(e)) {
            let group = groups.entry(entry.data_type.as_str()).or_insert((0.0, 0));
            group.0 += entry.value;
            group.1 += 1;
        }

        Ok(groups
            .into_iter()
            .map(|(data_type, (total, count))| CategorySummary {
                data_type: data_type.to_string(),
                total,
                average: total / count as f64,
                count,
            })
            .collect())
    }

    fn upsert_limit(&self, limit: NewImpactLimit) -> AppResult<(ImpactLimit, LimitWrite)> {
        let mut tables = self.tables()?;
        tables.require_user(limit.user_id)?;

        if let Some(existing) = tables.limits.iter_mut().find(|l| {
            l.user_id == limit.user_id && l.data_type == limit.data_type && l.period == limit.period
        }) {
            existing.limit_value = limit.limit_value;
            return Ok((existing.clone(), LimitWrite::Updated));
        }

        tables.next_limit_id += 1;
        let created = ImpactLimit {
            id: tables.next_limit_id,
            user_id: limit.user_id,
            data_type: limit.data_type,
            limit_value: limit.limit_value,
            period: limit.period,
            created_at: Utc::now(),
        };
        tables.limits.push(created.clone());
        Ok((created, LimitWrite::Created))
    }

    fn list_limits(&self, user_id: i32) -> AppResult<Vec<ImpactLimit>> {
        let tables = self.tables()?;
        Ok(tables
            .limits
            .iter()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect())
    }

    fn ping(&self) -> AppResult<()> {
        self.tables().map(|_| ())
    }
}
