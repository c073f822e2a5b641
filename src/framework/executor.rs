//! # Request Executor
//!
//! The single funnel for outbound calls. The executor runs its interceptors,
//! hands the request to the [`Transport`], and turns whatever happens into an
//! [`ApiResult`]. It never panics and never mutates any store.
//!
//! ## Interceptors
//!
//! Cross-cutting request decoration is registered at construction time, in the
//! composition root, instead of being reached for from inside the request path:
//!
//! ```rust,ignore
//! let executor = RequestExecutor::builder(transport)
//!     .with_interceptor(SessionInterceptor::new(session.clone()))
//!     .build();
//! ```

use super::error::{normalize, ApiResult, TransportFailure};
use super::transport::{Method, Transport, TransportRequest};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Decorates a request immediately before it is dispatched.
///
/// Called on every attempt, so implementations must read their inputs fresh
/// rather than caching them.
pub trait RequestInterceptor: Send + Sync {
    fn before_request(&self, request: &mut TransportRequest);
}

/// Stateless request funnel. Cheap to clone.
#[derive(Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
    interceptors: Arc<[Arc<dyn RequestInterceptor>]>,
}

/// Builder for [`RequestExecutor`].
pub struct RequestExecutorBuilder {
    transport: Arc<dyn Transport>,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
}

impl RequestExecutorBuilder {
    pub fn with_interceptor(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn build(self) -> RequestExecutor {
        RequestExecutor {
            transport: self.transport,
            interceptors: self.interceptors.into(),
        }
    }
}

impl RequestExecutor {
    pub fn builder(transport: Arc<dyn Transport>) -> RequestExecutorBuilder {
        RequestExecutorBuilder {
            transport,
            interceptors: Vec::new(),
        }
    }

    /// An executor with no interceptors.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::builder(transport).build()
    }

    /// Performs one call and decodes a 2xx body as `T`.
    pub async fn execute<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut request = TransportRequest::new(method, path);
        if let Some(body) = body {
            let value = serde_json::to_value(body).map_err(|e| {
                let detail = format!("failed to encode request body: {e}");
                normalize(TransportFailure::Other(detail))
            })?;
            request = request.with_body(value);
        }
        for interceptor in self.interceptors.iter() {
            interceptor.before_request(&mut request);
        }

        debug!(%method, path, "Sending request");
        let result = self.dispatch(request).await;
        if let Err(e) = &result {
            warn!(%method, path, kind = %e.kind(), code = e.code(), error = %e, "Request failed");
        }
        result
    }

    async fn dispatch<T: DeserializeOwned>(&self, request: TransportRequest) -> ApiResult<T> {
        let response = self.transport.send(request).await.map_err(normalize)?;
        if !response.is_success() {
            return Err(normalize(TransportFailure::Status {
                status: response.status,
                status_text: response.status_text,
                body: response.body,
            }));
        }
        serde_json::from_slice(&response.body)
            .map_err(|e| normalize(TransportFailure::Decode(e.to_string())))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.execute::<T, ()>(Method::Get, path, None).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(Method::Post, path, Some(body)).await
    }

    /// POST without a request body.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.execute::<T, ()>(Method::Post, path, None).await
    }
}
