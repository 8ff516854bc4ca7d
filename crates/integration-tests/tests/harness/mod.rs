//! Test application: a book service whose handlers fail with RPC statuses

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use bytes::Bytes;
use http::request::Parts;
use http::{HeaderMap, Request, StatusCode};
use http_body_util::BodyExt;
use rpcgate_config::Config;
use rpcgate_core::details::{BadRequest, FieldViolation};
use rpcgate_core::{Code, Detail, ServerMetadata, Status};
use rpcgate_runtime::Gateway;
use rpcgate_server::Server;
use tower::ServiceExt;

/// Router for the test book service wrapped by the gateway
pub fn app(config: &Config) -> Router {
    let gateway = Arc::new(rpcgate_server::build_gateway(&config.gateway));
    app_with_gateway(config, gateway)
}

pub fn app_with_gateway(config: &Config, gateway: Arc<Gateway>) -> Router {
    let routes = Router::new()
        .route("/v1/books/{id}", get(get_book))
        .with_state(Arc::clone(&gateway));

    Server::new(config, &gateway, routes).into_router()
}

/// Fails according to the requested id:
///
/// - `missing-*`: NOT_FOUND with header and trailer metadata derived from the id
/// - `invalid`: INVALID_ARGUMENT with a bad request detail
/// - `panic`: a plain error with no RPC status
/// - `tonic`: a `tonic::Status` wrapped in `anyhow`
/// - anything else succeeds
async fn get_book(State(gateway): State<Arc<Gateway>>, Path(id): Path<String>, mut parts: Parts) -> Response {
    if id.starts_with("missing") {
        parts.extensions.insert(
            ServerMetadata::new()
                .with_header("book-id", id.clone())
                .with_trailer("lookup", id.clone()),
        );
        return gateway.error_response(&parts, &Status::new(Code::NotFound, format!("book {id} not found")));
    }

    match id.as_str() {
        "invalid" => {
            let detail = Detail::pack(&BadRequest {
                field_violations: vec![FieldViolation {
                    field: "id".to_owned(),
                    description: "must be numeric".to_owned(),
                }],
            })
            .unwrap();
            let status = Status::new(Code::InvalidArgument, "bad id").with_detail(detail);
            gateway.error_response(&parts, &status)
        }
        "panic" => gateway.error_response(&parts, &anyhow::anyhow!("boom")),
        "tonic" => {
            let err = anyhow::Error::new(tonic::Status::unauthenticated("who are you"));
            gateway.error_response(&parts, &err)
        }
        _ => (StatusCode::OK, format!("{{\"id\":\"{id}\"}}")).into_response(),
    }
}

/// Collected response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub trailers: Option<HeaderMap>,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.to_vec()).unwrap()
    }
}

/// Send a request through the router and collect the full response
pub async fn send(router: Router, method: &str, uri: &str) -> TestResponse {
    let request = Request::builder().method(method).uri(uri).body(Body::empty()).unwrap();
    let response = router.oneshot(request).await.unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let collected = response.into_body().collect().await.unwrap();
    let trailers = collected.trailers().cloned();

    TestResponse {
        status,
        headers,
        trailers,
        body: collected.to_bytes(),
    }
}
