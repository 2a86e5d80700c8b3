use axum::{
	Json, Router,
	body::Body,
	extract::{
		Query, State,
		rejection::{JsonRejection, QueryRejection},
	},
	http::{
		HeaderValue, Method, StatusCode,
		header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE},
	},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, CorsLayer};

use remedy_service::{
	Error as ServiceError, PredictRequest, PredictResponse, RecommendationRequest,
	RecommendationResponse,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	let cors = cors_layer(&state.service.cfg.service.cors_allowed_origins);

	Router::new()
		.route("/health", get(health))
		.route("/predict", post(predict))
		.route("/api/recommendations/stream", get(stream_recommendations))
		.route("/v1/recommendations", get(recommendations))
		.layer(cors)
		.with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
	let allow_origin = if origins.iter().any(|origin| origin == "*") {
		AllowOrigin::any()
	} else {
		let origins = origins
			.iter()
			.filter_map(|origin| match HeaderValue::from_str(origin) {
				Ok(value) => Some(value),
				Err(err) => {
					tracing::warn!(%origin, error = %err, "Skipping unusable CORS origin.");

					None
				},
			})
			.collect::<Vec<_>>();

		AllowOrigin::list(origins)
	};

	CorsLayer::new()
		.allow_origin(allow_origin)
		.allow_methods([Method::GET, Method::POST])
		.allow_headers([CONTENT_TYPE, ACCEPT])
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn predict(
	State(state): State<AppState>,
	payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
	let Json(payload) = payload.map_err(|err| {
		json_error(StatusCode::BAD_REQUEST, "invalid_request", err.body_text(), None)
	})?;
	let response = state.service.predict(&payload)?;

	Ok(Json(response))
}

async fn recommendations(
	State(state): State<AppState>,
	query: Result<Query<RecommendationRequest>, QueryRejection>,
) -> Result<Json<RecommendationResponse>, ApiError> {
	let Query(query) = query.map_err(|err| {
		json_error(StatusCode::BAD_REQUEST, "invalid_request", err.body_text(), None)
	})?;
	let response = state.service.recommendations(&query)?;

	Ok(Json(response))
}

/// Relays the upstream feed. Failures arrive in-band, so the status is always 200.
async fn stream_recommendations(State(state): State<AppState>) -> Response {
	let body = Body::from_stream(state.service.stream_recommendations());

	([(CONTENT_TYPE, "text/event-stream"), (CACHE_CONTROL, "no-cache")], body).into_response()
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	field: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	field: Option<String>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		field: Option<String>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), field }
	}
}
impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		let message = err.to_string();

		match err {
			ServiceError::InvalidRequest { .. } =>
				json_error(StatusCode::BAD_REQUEST, "invalid_request", message, None),
			ServiceError::Encoding(inner) => json_error(
				StatusCode::UNPROCESSABLE_ENTITY,
				"encoding_error",
				message,
				Some(inner.field().to_string()),
			),
			ServiceError::Prediction(_) => {
				tracing::error!(error = %message, "Prediction failed.");

				json_error(StatusCode::INTERNAL_SERVER_ERROR, "prediction_error", message, None)
			},
			ServiceError::Provider { .. } =>
				json_error(StatusCode::BAD_GATEWAY, "provider_error", message, None),
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, field: self.field };

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	field: Option<String>,
) -> ApiError {
	ApiError::new(status, code, message, field)
}
