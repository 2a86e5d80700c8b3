use std::time::Duration;

use axum::{
	Router,
	body::{self, Body},
	http::{
		Request, StatusCode,
		header::{
			ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
			ACCESS_CONTROL_REQUEST_HEADERS, ACCESS_CONTROL_REQUEST_METHOD, CONTENT_TYPE, ORIGIN,
		},
	},
};
use serde_json::{Value, json};
use tower::util::ServiceExt;

use remedy_api::{routes, state::AppState};
use remedy_testkit::{ArtifactFixture, UpstreamServer, UpstreamStep};

fn app(fixture: &ArtifactFixture, upstream_url: &str) -> Router {
	let config = remedy_testkit::service_config(fixture.config(), upstream_url);
	let state = AppState::new(config).expect("Failed to initialize app state.");

	routes::router(state)
}

fn fixture() -> ArtifactFixture {
	ArtifactFixture::write().expect("Failed to write fixture artifacts.")
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
	let response = app.oneshot(request).await.expect("Failed to call router.");
	let status = response.status();
	let bytes =
		body::to_bytes(response.into_body(), usize::MAX).await.expect("Failed to read body.");

	(status, bytes.to_vec())
}

fn post_json(uri: &str, payload: &Value) -> Request<Body> {
	Request::builder()
		.method("POST")
		.uri(uri)
		.header(CONTENT_TYPE, "application/json")
		.body(Body::from(payload.to_string()))
		.expect("Failed to build request.")
}

fn get(uri: &str) -> Request<Body> {
	Request::builder().uri(uri).body(Body::empty()).expect("Failed to build request.")
}

fn json_body(bytes: &[u8]) -> Value {
	serde_json::from_slice(bytes).expect("Failed to parse JSON body.")
}

#[tokio::test]
async fn health_ok() {
	let fixture = fixture();
	let (status, _) = send(app(&fixture, "http://127.0.0.1:1/stream"), get("/health")).await;

	assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn predict_returns_ranked_classes() {
	let fixture = fixture();
	let payload = json!({
		"symptoms": "fever, cough, glowing skin",
		"ageGroup": "adult",
		"severity": "moderate",
		"healthFactors": "smoker"
	});
	let (status, bytes) =
		send(app(&fixture, "http://127.0.0.1:1/stream"), post_json("/predict", &payload)).await;
	let body = json_body(&bytes);

	assert_eq!(status, StatusCode::OK);
	assert!(body["predicted_disease"].is_string());

	let top = body["top_classes"].as_array().expect("top_classes must be an array.");

	assert_eq!(top.len(), 3);
	assert_eq!(top[0][0], body["predicted_disease"]);
	assert_eq!(top[0][1], body["confidence"]);
	assert_eq!(
		body["unrecognized_tokens"],
		json!([{ "kind": "symptom", "token": "glowing_skin" }])
	);
}

#[tokio::test]
async fn predict_without_health_factors_is_accepted() {
	let fixture = fixture();
	let payload = json!({ "symptoms": "headache", "ageGroup": "child", "severity": "mild" });
	let (status, bytes) =
		send(app(&fixture, "http://127.0.0.1:1/stream"), post_json("/predict", &payload)).await;
	let body = json_body(&bytes);

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["predicted_disease"], "Migraine");
}

#[tokio::test]
async fn unseen_severity_is_unprocessable() {
	let fixture = fixture();
	let payload = json!({ "symptoms": "fever", "ageGroup": "adult", "severity": "catastrophic" });
	let (status, bytes) =
		send(app(&fixture, "http://127.0.0.1:1/stream"), post_json("/predict", &payload)).await;
	let body = json_body(&bytes);

	assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
	assert_eq!(body["error_code"], "encoding_error");
	assert_eq!(body["field"], "severity");
}

#[tokio::test]
async fn malformed_predict_body_is_a_bad_request() {
	let fixture = fixture();
	let payload = json!({ "symptoms": "fever" });
	let (status, bytes) =
		send(app(&fixture, "http://127.0.0.1:1/stream"), post_json("/predict", &payload)).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json_body(&bytes)["error_code"], "invalid_request");
}

#[tokio::test]
async fn recommendations_found_and_not_found() {
	let fixture = fixture();
	let (status, bytes) = send(
		app(&fixture, "http://127.0.0.1:1/stream"),
		get("/v1/recommendations?disease=Migraine&preference=pharmaceutical"),
	)
	.await;
	let found = json_body(&bytes);

	assert_eq!(status, StatusCode::OK);
	assert_eq!(found["status"], "found");
	assert_eq!(found["recommendations"], json!([{ "medicine": "Sumatriptan", "rating": 4.4 }]));

	let (status, bytes) = send(
		app(&fixture, "http://127.0.0.1:1/stream"),
		get("/v1/recommendations?disease=Bronchitis&preference=alternative"),
	)
	.await;
	let missing = json_body(&bytes);

	assert_eq!(status, StatusCode::OK);
	assert_eq!(missing, json!({
		"status": "not_found",
		"disease": "Bronchitis",
		"message": "No medicine recommendations found for this disease."
	}));
}

#[tokio::test]
async fn recommendations_without_disease_are_rejected() {
	let fixture = fixture();
	let (status, bytes) =
		send(app(&fixture, "http://127.0.0.1:1/stream"), get("/v1/recommendations")).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json_body(&bytes)["error_code"], "invalid_request");
}

#[tokio::test]
async fn stream_relays_upstream_events() {
	let server = UpstreamServer::spawn(vec![
		UpstreamStep::chunk("data: first\n\n"),
		UpstreamStep::Pause(Duration::from_millis(10)),
		UpstreamStep::chunk("data: second\n\n"),
	])
	.await
	.expect("Failed to start upstream server.");
	let fixture = fixture();
	let response = app(&fixture, &server.url())
		.oneshot(get("/api/recommendations/stream"))
		.await
		.expect("Failed to call stream endpoint.");

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(response.headers()[CONTENT_TYPE], "text/event-stream");
	assert_eq!(response.headers()["cache-control"], "no-cache");

	let bytes =
		body::to_bytes(response.into_body(), usize::MAX).await.expect("Failed to read body.");

	assert_eq!(&bytes[..], b"data: first\n\ndata: second\n\n");
}

#[tokio::test]
async fn stream_failure_mid_flight_ends_with_error_event() {
	let server = UpstreamServer::spawn(vec![
		UpstreamStep::chunk("data: first\n\n"),
		UpstreamStep::Pause(Duration::from_millis(10)),
		UpstreamStep::Fail("backend crashed".to_string()),
	])
	.await
	.expect("Failed to start upstream server.");
	let fixture = fixture();
	let (status, bytes) =
		send(app(&fixture, &server.url()), get("/api/recommendations/stream")).await;
	let text = String::from_utf8(bytes).expect("Stream body must be UTF-8.");

	assert_eq!(status, StatusCode::OK);
	assert!(text.starts_with("data: first\n\ndata: Error: "));
	assert!(text.ends_with("\n\n"));
	assert_eq!(text.matches("data: Error: ").count(), 1);
}

#[tokio::test]
async fn stream_with_unreachable_upstream_reports_error_in_band() {
	let fixture = fixture();
	let (status, bytes) = send(
		app(&fixture, "http://127.0.0.1:1/api/recommendations/stream"),
		get("/api/recommendations/stream"),
	)
	.await;
	let text = String::from_utf8(bytes).expect("Stream body must be UTF-8.");

	assert_eq!(status, StatusCode::OK);
	assert!(text.starts_with("data: Error: "));
	assert_eq!(text.matches("data: ").count(), 1);
}

fn preflight(uri: &str, origin: &str) -> Request<Body> {
	Request::builder()
		.method("OPTIONS")
		.uri(uri)
		.header(ORIGIN, origin)
		.header(ACCESS_CONTROL_REQUEST_METHOD, "POST")
		.header(ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
		.body(Body::empty())
		.expect("Failed to build request.")
}

#[tokio::test]
async fn preflight_from_allowed_origin_is_accepted() {
	let fixture = fixture();
	let response = app(&fixture, "http://127.0.0.1:1/stream")
		.oneshot(preflight("/predict", "http://localhost:3000"))
		.await
		.expect("Failed to call router.");
	let allow_methods = response.headers()[ACCESS_CONTROL_ALLOW_METHODS]
		.to_str()
		.expect("Allowed methods must be ASCII.")
		.to_string();

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "http://localhost:3000");
	assert!(allow_methods.contains("POST"), "Unexpected methods: {allow_methods}");
}

#[tokio::test]
async fn preflight_from_unknown_origin_gets_no_allow_origin() {
	let fixture = fixture();
	let response = app(&fixture, "http://127.0.0.1:1/stream")
		.oneshot(preflight("/predict", "http://evil.test"))
		.await
		.expect("Failed to call router.");

	assert!(response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn simple_request_from_allowed_origin_carries_allow_origin() {
	let fixture = fixture();
	let request = Request::builder()
		.uri("/health")
		.header(ORIGIN, "http://localhost:3000")
		.body(Body::empty())
		.expect("Failed to build request.");
	let response = app(&fixture, "http://127.0.0.1:1/stream")
		.oneshot(request)
		.await
		.expect("Failed to call router.");

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "http://localhost:3000");
}
