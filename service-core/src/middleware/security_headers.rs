use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::IntoResponse,
};

/// Which Content-Security-Policy a service serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentPolicy {
    /// JSON-only API: nothing may load or frame it.
    Api,
    /// Browser UI served from the same origin.
    WebApp,
}

impl ContentPolicy {
    fn csp(self) -> &'static str {
        match self {
            ContentPolicy::Api => "default-src 'none'; frame-ancestors 'none'",
            ContentPolicy::WebApp => {
                "default-src 'self'; \
                 script-src 'self'; \
                 style-src 'self' 'unsafe-inline'; \
                 img-src 'self' data:; \
                 connect-src 'self'; \
                 frame-ancestors 'none'"
            }
        }
    }
}

pub async fn security_headers_middleware(
    State(policy): State<ContentPolicy>,
    req: Request,
    next: Next,
) -> impl IntoResponse {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        header::HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        header::HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    headers.insert(
        header::REFERRER_POLICY,
        header::HeaderValue::from_static("no-referrer"),
    );
    headers.insert(
        header::X_FRAME_OPTIONS,
        header::HeaderValue::from_static("DENY"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        header::HeaderValue::from_static(policy.csp()),
    );

    response
}
