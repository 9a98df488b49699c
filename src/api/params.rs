use axum::{
    extract::{Query, State},
    response::Json,
};
use glint_fx::Rgb;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{settle, WaitQuery};
use crate::error::ApiError;
use crate::models::EffectParameters;
use crate::server::AppState;
use crate::services::RenderEvent;

/// Partial update of the effect parameters
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ParamsPatch {
    /// Effect strength, clamped to 0..=1
    pub intensity: Option<f32>,
    /// Grain amount, clamped to 0..=1
    pub grain: Option<f32>,
    /// Gradient tint as `#rgb` or `#rrggbb`
    #[schema(example = "#ff4fd8")]
    pub tint: Option<String>,
}

/// Response from PUT /api/params
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ParamsResponse {
    pub params: EffectParameters,
    pub render: Option<RenderEvent>,
}

/// Response from POST /api/refresh
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshResponse {
    /// New animation seed
    pub seed: u64,
    pub render: Option<RenderEvent>,
}

/// Current effect parameters
#[utoipa::path(
    get,
    path = "/api/params",
    responses(
        (status = 200, description = "Current parameters", body = EffectParameters),
    ),
    tag = "Effects"
)]
pub async fn handle_get_params(State(state): State<AppState>) -> Json<EffectParameters> {
    Json(state.session.params().await)
}

/// Change effect parameters
///
/// Omitted fields keep their value. Numeric values outside 0..=1 are
/// clamped; non-finite numbers and malformed tints are rejected.
#[utoipa::path(
    put,
    path = "/api/params",
    request_body = ParamsPatch,
    responses(
        (status = 200, description = "Parameters updated", body = ParamsResponse),
        (status = 400, description = "Invalid value"),
    ),
    params(WaitQuery),
    tag = "Effects"
)]
pub async fn handle_update_params(
    State(state): State<AppState>,
    Query(query): Query<WaitQuery>,
    Json(patch): Json<ParamsPatch>,
) -> Result<Json<ParamsResponse>, ApiError> {
    let intensity = patch.intensity.map(|v| finite("intensity", v)).transpose()?;
    let grain = patch.grain.map(|v| finite("grain", v)).transpose()?;
    let tint = patch
        .tint
        .as_deref()
        .map(|s| {
            s.parse::<Rgb>()
                .map_err(|e| ApiError::BadRequest(format!("tint '{s}': {e}")))
        })
        .transpose()?;

    let (params, render) = state
        .session
        .update_params(|params| {
            if let Some(v) = intensity {
                params.set_intensity(v);
            }
            if let Some(v) = grain {
                params.set_grain(v);
            }
            if let Some(tint) = tint {
                params.set_tint(tint);
            }
        })
        .await;
    let render = settle(render, query.wait).await;

    Ok(Json(ParamsResponse { params, render }))
}

/// Re-roll the sparkle pattern
///
/// Advances the animation seed; always schedules a render.
#[utoipa::path(
    post,
    path = "/api/refresh",
    responses(
        (status = 200, description = "Seed advanced", body = RefreshResponse),
    ),
    params(WaitQuery),
    tag = "Effects"
)]
pub async fn handle_refresh(
    State(state): State<AppState>,
    Query(query): Query<WaitQuery>,
) -> Json<RefreshResponse> {
    let (seed, render) = state.session.refresh().await;
    let render = settle(render, query.wait).await;
    Json(RefreshResponse { seed, render })
}

fn finite(field: &str, value: f32) -> Result<f32, ApiError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ApiError::BadRequest(format!("{field} must be a finite number")))
    }
}
