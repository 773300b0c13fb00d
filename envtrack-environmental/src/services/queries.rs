use chrono::{DateTime, Utc};
use diesel::dsl::{avg, count, sum};
use diesel::pg::PgConnection;
use diesel::prelude::*;

use crate::models::{CategorySummary, EnvironmentalData, ImpactLimit, NewEnvironmentalData};
use crate::schema::{environmental_data, impact_limits};
use crate::services::store::EntryFilter;

pub fn insert_entry(
    conn: &mut PgConnection,
    entry: &NewEnvironmentalData,
) -> QueryResult<EnvironmentalData> {
    diesel::insert_into(environmental_data::table)
        .values(entry)
        .returning(EnvironmentalData::as_returning())
        .get_result(conn)
}

pub fn list_entries(
    conn: &mut PgConnection,
    filter: &EntryFilter,
) -> QueryResult<Vec<EnvironmentalData>> {
    let mut query = environmental_data::table
        .filter(environmental_data::user_id.eq(filter.user_id))
        .select(EnvironmentalData::as_select())
        .into_boxed();

    if let Some(data_type) = filter.data_type.as_deref() {
        query = query.filter(environmental_data::data_type.eq(data_type));
    }
    if let Some(start) = filter.start {
        query = query.filter(environmental_data::date_recorded.ge(start));
    }
    if let Some(end) = filter.end {
        query = query.filter(environmental_data::date_recorded.le(end));
    }

    query
        .order((
            environmental_data::date_recorded.desc(),
            environmental_data::id.desc(),
        ))
        .load(conn)
}

pub fn summarize(
    conn: &mut PgConnection,
    user_id: i32,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> QueryResult<Vec<CategorySummary>> {
    let rows: Vec<(String, Option<f64>, Option<f64>, i64)> = environmental_data::table
        .filter(environmental_data::user_id.eq(user_id))
        .filter(environmental_data::date_recorded.ge(start))
        .filter(environmental_data::date_recorded.le(end))
        .group_by(environmental_data::data_type)
        .select((
            environmental_data::data_type,
            sum(environmental_data::value),
            avg(environmental_data::value),
            count(environmental_data::id),
        ))
        .order(environmental_data::data_type.asc())
        .load(conn)?;

    // SUM/AVG are only NULL for an empty group, which GROUP BY never yields.
    Ok(rows
        .into_iter()
        .map(|(data_type, total, average, count)| CategorySummary {
            data_type,
            total: total.unwrap_or(0.0),
            average: average.unwrap_or(0.0),
            count,
        })
        .collect())
}

pub fn list_limits(conn: &mut PgConnection, user_id: i32) -> QueryResult<Vec<ImpactLimit>> {
    impact_limits::table
        .filter(impact_limits::user_id.eq(user_id))
        .order(impact_limits::id.asc())
        .select(ImpactLimit::as_select())
        .load(conn)
}

pub fn ping(conn: &mut PgConnection) -> QueryResult<()> {
    diesel::sql_query("SELECT 1").execute(conn).map(|_| ())
}
