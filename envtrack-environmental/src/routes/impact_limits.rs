use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use envtrack_shared::errors::{AppError, AppResult};
use envtrack_shared::types::ApiResponse;

use crate::models::{ImpactLimit, LimitWrite, NewImpactLimit};
use crate::routes::params;
use crate::AppState;

const SET_FAILED: &str = "Erro ao definir limite";
const LIST_FAILED: &str = "Erro ao buscar limites";

#[derive(Debug, Deserialize, Validate)]
pub struct SetImpactLimitRequest {
    /// Integer or integer string.
    pub user_id: Option<serde_json::Value>,
    #[validate(required(message = "campo obrigatório"))]
    pub data_type: Option<String>,
    /// Number or numeric string.
    #[validate(required(message = "campo obrigatório"))]
    pub limit_value: Option<serde_json::Value>,
    #[validate(required(message = "campo obrigatório"))]
    pub period: Option<String>,
}

impl SetImpactLimitRequest {
    fn into_new_limit(self, default_user_id: i32) -> AppResult<NewImpactLimit> {
        self.validate()?;

        let Self {
            user_id,
            data_type: Some(data_type),
            limit_value: Some(limit_value),
            period: Some(period),
        } = self
        else {
            return Err(AppError::validation("campos obrigatórios ausentes"));
        };

        Ok(NewImpactLimit {
            user_id: params::coerce_user_id(user_id.as_ref(), default_user_id)?,
            data_type,
            limit_value: params::coerce_number("limit_value", &limit_value)?,
            period,
        })
    }
}

/// POST /impact-limits
/// 201 when the (user, data_type, period) limit is new, 200 when its value was replaced.
pub async fn set_impact_limit(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SetImpactLimitRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<ImpactLimit>>)> {
    let (limit, write) = payload
        .map_err(AppError::from)
        .and_then(|Json(req)| req.into_new_limit(state.config.default_user_id))
        .and_then(|new_limit| state.store.upsert_limit(new_limit))
        .map_err(|e| e.context(SET_FAILED))?;

    tracing::info!(
        limit_id = limit.id,
        user_id = limit.user_id,
        data_type = %limit.data_type,
        period = %limit.period,
        write = ?write,
        "impact limit saved"
    );

    let (status, message) = match write {
        LimitWrite::Created => (StatusCode::CREATED, "Limite definido com sucesso"),
        LimitWrite::Updated => (StatusCode::OK, "Limite atualizado com sucesso"),
    };

    Ok((status, Json(ApiResponse::ok_with_message(limit, message))))
}

#[derive(Debug, Deserialize)]
pub struct ListImpactLimitsQuery {
    pub user_id: Option<String>,
}

/// GET /impact-limits?user_id=1
pub async fn list_impact_limits(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListImpactLimitsQuery>, QueryRejection>,
) -> AppResult<Json<ApiResponse<Vec<ImpactLimit>>>> {
    let limits = query
        .map_err(AppError::from)
        .and_then(|Query(q)| params::resolve_user_id(q.user_id.as_deref(), state.config.default_user_id))
        .and_then(|user_id| state.store.list_limits(user_id))
        .map_err(|e| e.context(LIST_FAILED))?;

    Ok(Json(ApiResponse::ok(limits)))
}
