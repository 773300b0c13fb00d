use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use envtrack_shared::errors::{AppError, AppResult};
use envtrack_shared::types::ApiResponse;

use crate::models::{CategorySummary, EnvironmentalData, NewEnvironmentalData, Period};
use crate::routes::params;
use crate::services::EntryFilter;
use crate::AppState;

const ADD_FAILED: &str = "Erro ao adicionar dados";
const LIST_FAILED: &str = "Erro ao buscar dados";
const SUMMARY_FAILED: &str = "Erro ao gerar resumo";

// --- Ingestion ---

#[derive(Debug, Deserialize, Validate)]
pub struct AddEnvironmentalDataRequest {
    /// Integer or integer string.
    pub user_id: Option<serde_json::Value>,
    #[validate(required(message = "campo obrigatório"))]
    pub data_type: Option<String>,
    /// Number or numeric string.
    #[validate(required(message = "campo obrigatório"))]
    pub value: Option<serde_json::Value>,
    #[validate(required(message = "campo obrigatório"))]
    pub unit: Option<String>,
    /// Absent becomes `""`; an explicit `null` is stored as NULL.
    #[serde(default, deserialize_with = "params::explicit_null")]
    pub description: Option<Option<String>>,
    pub date_recorded: Option<String>,
}

impl AddEnvironmentalDataRequest {
    fn into_new_entry(self, default_user_id: i32) -> AppResult<NewEnvironmentalData> {
        self.validate()?;

        let Self {
            user_id,
            data_type: Some(data_type),
            value: Some(value),
            unit: Some(unit),
            description,
            date_recorded,
        } = self
        else {
            return Err(AppError::validation("campos obrigatórios ausentes"));
        };

        let user_id = params::coerce_user_id(user_id.as_ref(), default_user_id)?;
        let value = params::coerce_number("value", &value)?;
        let date_recorded = params::parse_optional_timestamp("date_recorded", date_recorded.as_deref())?
            .unwrap_or_else(Utc::now);

        Ok(NewEnvironmentalData {
            user_id,
            data_type,
            value,
            unit,
            description: description.unwrap_or_else(|| Some(String::new())),
            date_recorded,
        })
    }
}

/// POST /environmental-data
/// Records one measurement. Responds 201 with the stored entry.
pub async fn add_environmental_data(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AddEnvironmentalDataRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<EnvironmentalData>>)> {
    let entry = payload
        .map_err(AppError::from)
        .and_then(|Json(req)| req.into_new_entry(state.config.default_user_id))
        .and_then(|new_entry| state.store.insert_entry(new_entry))
        .map_err(|e| e.context(ADD_FAILED))?;

    tracing::info!(
        entry_id = entry.id,
        user_id = entry.user_id,
        data_type = %entry.data_type,
        "environmental data recorded"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(
            entry,
            "Dados ambientais adicionados com sucesso",
        )),
    ))
}

// --- Listing ---

#[derive(Debug, Deserialize)]
pub struct ListEnvironmentalDataQuery {
    pub user_id: Option<String>,
    pub data_type: Option<String>,
    /// Inclusive lower bound on `date_recorded`.
    pub start_date: Option<String>,
    /// Inclusive upper bound on `date_recorded`.
    pub end_date: Option<String>,
}

impl ListEnvironmentalDataQuery {
    fn into_filter(self, default_user_id: i32) -> AppResult<EntryFilter> {
        Ok(EntryFilter {
            user_id: params::resolve_user_id(self.user_id.as_deref(), default_user_id)?,
            data_type: params::non_blank(self.data_type.as_deref()).map(str::to_string),
            start: params::parse_optional_timestamp("start_date", self.start_date.as_deref())?,
            end: params::parse_optional_timestamp("end_date", self.end_date.as_deref())?,
        })
    }
}

/// GET /environmental-data?user_id=1&data_type=co2&start_date=2024-01-01&end_date=2024-01-31
/// Most recently observed first.
pub async fn list_environmental_data(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListEnvironmentalDataQuery>, QueryRejection>,
) -> AppResult<Json<ApiResponse<Vec<EnvironmentalData>>>> {
    let entries = query
        .map_err(AppError::from)
        .and_then(|Query(q)| q.into_filter(state.config.default_user_id))
        .and_then(|filter| state.store.list_entries(&filter))
        .map_err(|e| e.context(LIST_FAILED))?;

    tracing::debug!(count = entries.len(), "environmental data listed");

    Ok(Json(ApiResponse::ok(entries)))
}

// --- Summary ---

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub user_id: Option<String>,
    /// monthly, quarterly or yearly (the fallback for anything else).
    pub period: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub success: bool,
    pub period: &'static str,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub summary: Vec<CategorySummary>,
}

/// GET /environmental-data/summary?user_id=1&period=monthly
/// Totals, means and counts per category over the trailing period window.
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> AppResult<Json<SummaryResponse>> {
    let summarize = |Query(q): Query<SummaryQuery>| -> AppResult<SummaryResponse> {
        let user_id = params::resolve_user_id(q.user_id.as_deref(), state.config.default_user_id)?;
        let period = Period::from_token(q.period.as_deref().unwrap_or("monthly"));
        let (start_date, end_date) = period.window_ending_at(Utc::now());

        let summary = state.store.summarize(user_id, start_date, end_date)?;

        Ok(SummaryResponse {
            success: true,
            period: period.as_str(),
            start_date,
            end_date,
            summary,
        })
    };

    let response = query
        .map_err(AppError::from)
        .and_then(summarize)
        .map_err(|e| e.context(SUMMARY_FAILED))?;

    Ok(Json(response))
}
