use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{Bool, Float8, Int4, VarChar};
use serde::Serialize;

use crate::schema::{environmental_data, impact_limits};

// --- Environmental Data ---

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = environmental_data)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EnvironmentalData {
    pub id: i32,
    pub user_id: i32,
    pub data_type: String,
    pub value: f64,
    pub unit: String,
    pub description: Option<String>,
    pub date_recorded: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = environmental_data)]
pub struct NewEnvironmentalData {
    pub user_id: i32,
    pub data_type: String,
    pub value: f64,
    pub unit: String,
    pub description: Option<String>,
    pub date_recorded: DateTime<Utc>,
}

/// One row of the per-category summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub data_type: String,
    pub total: f64,
    pub average: f64,
    pub count: i64,
}

// --- Impact Limits ---

#[derive(Debug, Clone, PartialEq, Queryable, QueryableByName, Selectable, Identifiable, Serialize)]
#[diesel(table_name = impact_limits)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ImpactLimit {
    pub id: i32,
    pub user_id: i32,
    pub data_type: String,
    pub limit_value: f64,
    pub period: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = impact_limits)]
pub struct NewImpactLimit {
    pub user_id: i32,
    pub data_type: String,
    pub limit_value: f64,
    pub period: String,
}

/// Whether an upsert created the limit or overwrote an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitWrite {
    Created,
    Updated,
}

#[derive(QueryableByName)]
struct UpsertedLimit {
    #[diesel(embed)]
    limit: ImpactLimit,
    #[diesel(sql_type = Bool)]
    inserted: bool,
}

/// Upsert a limit using ON CONFLICT (user_id, data_type, period) DO UPDATE SET limit_value.
///
/// `xmax = 0` holds only for a freshly inserted tuple, which tells the caller
/// which branch the statement took without a second round trip.
pub fn upsert_impact_limit(
    conn: &mut diesel::pg::PgConnection,
    limit: &NewImpactLimit,
) -> Result<(ImpactLimit, LimitWrite), diesel::result::Error> {
    let row = diesel::sql_query(
        "INSERT INTO impact_limits (user_id, data_type, limit_value, period) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (user_id, data_type, period) DO UPDATE SET limit_value = EXCLUDED.limit_value \
         RETURNING id, user_id, data_type, limit_value, period, created_at, (xmax = 0) AS inserted"
    )
    .bind::<Int4, _>(limit.user_id)
    .bind::<VarChar, _>(&limit.data_type)
    .bind::<Float8, _>(limit.limit_value)
    .bind::<VarChar, _>(&limit.period)
    .get_result::<UpsertedLimit>(conn)?;

    let write = if row.inserted { LimitWrite::Created } else { LimitWrite::Updated };
    Ok((row.limit, write))
}

// --- Periods ---

/// Aggregation and limit window granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Monthly,
    Quarterly,
    Yearly,
}

impl Period {
    /// Resolve a summary period token. Unknown tokens fall back to a yearly window.
    pub fn from_token(token: &str) -> Self {
        match token {
            "monthly" => Self::Monthly,
            "quarterly" => Self::Quarterly,
            _ => Self::Yearly,
        }
    }

    pub fn window_days(self) -> i64 {
        match self {
            Self::Monthly => 30,
            Self::Quarterly => 90,
            Self::Yearly => 365,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }

    /// The trailing window ending at `end`.
    pub fn window_ending_at(self, end: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        (end - chrono::Duration::days(self.window_days()), end)
    }
}
