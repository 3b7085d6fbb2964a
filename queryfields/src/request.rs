//! Request views consumed by field selection.
//!
//! Hosts expose requests in different shapes. Each shape gets its own
//! [`QueryParamSource`] implementation rather than being detected at runtime:
//!
//! - [`ApiRequest`] carries already-parsed query parameters.
//! - [`http::Request`] carries a raw URI whose query string is parsed on demand.

use std::sync::Arc;

use crate::params::QueryParams;

/// Anything that can hand out its query parameters as a multimap.
pub trait QueryParamSource {
    fn query_params(&self) -> QueryParams;
}

/// Read-only request view: the HTTP method plus query parameters.
pub trait RequestContext: QueryParamSource + Send + Sync {
    /// The request method, `None` if the request shape has no method.
    fn method(&self) -> Option<&str>;
}

/// A request whose query string has already been parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiRequest {
    method: Option<String>,
    query_params: QueryParams,
}

impl ApiRequest {
    pub fn new(method: impl Into<String>, query_params: QueryParams) -> Self {
        Self {
            method: Some(method.into()),
            query_params,
        }
    }

    /// Shorthand for a `GET` request.
    pub fn get(query_params: QueryParams) -> Self {
        Self::new("GET", query_params)
    }

    /// A request with no method attribute.
    pub fn without_method(query_params: QueryParams) -> Self {
        Self {
            method: None,
            query_params,
        }
    }
}

impl QueryParamSource for ApiRequest {
    fn query_params(&self) -> QueryParams {
        self.query_params.clone()
    }
}

impl RequestContext for ApiRequest {
    fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }
}

impl<B> QueryParamSource for http::Request<B> {
    fn query_params(&self) -> QueryParams {
        self.uri().query().map(QueryParams::parse).unwrap_or_default()
    }
}

impl<B: Send + Sync> RequestContext for http::Request<B> {
    fn method(&self) -> Option<&str> {
        Some(self.method().as_str())
    }
}

/// Construction context handed to a serializer.
///
/// Holds the request the serializer is rendering for, if any.
#[derive(Clone, Default)]
pub struct SerializerContext {
    request: Option<Arc<dyn RequestContext>>,
}

impl SerializerContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request<R: RequestContext + 'static>(request: R) -> Self {
        Self::with_shared_request(Arc::new(request))
    }

    pub fn with_shared_request(request: Arc<dyn RequestContext>) -> Self {
        Self {
            request: Some(request),
        }
    }

    pub fn request(&self) -> Option<&Arc<dyn RequestContext>> {
        self.request.as_ref()
    }
}

impl std::fmt::Debug for SerializerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerializerContext")
            .field("has_request", &self.request.is_some())
            .finish()
    }
}
