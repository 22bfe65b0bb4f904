use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::OfficeMapError;
use crate::dashboard::{Dashboard, DisplayState, QuerySelection};
use crate::models::DisplayObject;

#[derive(Serialize, Deserialize)]
pub struct OptionsResponse {
    pub name: String,
    pub options: Vec<String>,
    pub value: String,
    pub revision: u64,
}

#[derive(Serialize, Deserialize)]
pub struct SelectionRequest {
    pub place: String,
}

#[derive(Serialize, Deserialize)]
pub struct RenderQuery {
    pub place: String,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub detail: String,
}

/// HTTP status for a pipeline or input failure
#[must_use]
pub fn status_for(error: &OfficeMapError) -> StatusCode {
    match error {
        OfficeMapError::Validation { .. } => StatusCode::BAD_REQUEST,
        OfficeMapError::EmptyResult { .. } => StatusCode::NOT_FOUND,
        OfficeMapError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        OfficeMapError::Connectivity { .. }
        | OfficeMapError::Protocol { .. }
        | OfficeMapError::Decode { .. } => StatusCode::BAD_GATEWAY,
        OfficeMapError::Config { .. } | OfficeMapError::Io { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub struct ApiError(OfficeMapError);

impl From<OfficeMapError> for ApiError {
    fn from(error: OfficeMapError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.0.user_message(),
            detail: self.0.to_string(),
        };
        (status_for(&self.0), Json(body)).into_response()
    }
}

/// Display state with the status of its failure, if any
fn state_response(state: DisplayState) -> Response {
    let status = match &state {
        DisplayState::Failed { error, .. } => status_for(error),
        _ => StatusCode::OK,
    };
    (status, Json(state)).into_response()
}

pub fn router() -> Router<Arc<Dashboard>> {
    Router::new()
        .route("/options", get(get_options))
        .route("/display", get(get_display))
        .route("/selection", post(post_selection))
        .route("/render", get(get_render))
}

async fn get_options(State(dashboard): State<Arc<Dashboard>>) -> Json<OptionsResponse> {
    let control = dashboard.control();
    let QuerySelection { value, revision } = control.selection();
    Json(OptionsResponse {
        name: control.name().to_string(),
        options: control.options().to_vec(),
        value,
        revision,
    })
}

async fn get_display(State(dashboard): State<Arc<Dashboard>>) -> Response {
    state_response(dashboard.surface().current())
}

async fn post_selection(
    State(dashboard): State<Arc<Dashboard>>,
    Json(request): Json<SelectionRequest>,
) -> Result<Response, ApiError> {
    let state = dashboard.select(&request.place).await?;
    Ok(state_response(state))
}

async fn get_render(
    State(dashboard): State<Arc<Dashboard>>,
    Query(query): Query<RenderQuery>,
) -> Result<Json<DisplayObject>, ApiError> {
    let object = dashboard.render(&query.place).await?;
    Ok(Json(object))
}
