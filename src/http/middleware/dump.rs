//! Verbose request dumping.
//!
//! Logs the request line and every header at debug level before the request
//! reaches its handler. Enabled by `observability.dump_requests`.

use axum::{body::Body, http::Request, middleware::Next, response::Response};

use crate::http::request::request_id;

pub async fn dump_request(request: Request<Body>, next: Next) -> Response {
    let request_id = request_id(request.headers()).to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %request.method(),
        uri = %request.uri(),
        version = ?request.version(),
        "Request received"
    );
    for (name, value) in request.headers() {
        tracing::debug!(
            request_id = %request_id,
            header = %name,
            value = %String::from_utf8_lossy(value.as_bytes()),
            "Request header"
        );
    }

    let response = next.run(request).await;
    tracing::debug!(request_id = %request_id, status = %response.status(), "Response sent");
    response
}
