//! # Load Controller
//!
//! The reusable `{data, loading, error, execute, reset}` contract every
//! consumer uses to drive one call.
//!
//! ## State rules
//!
//! - `execute` sets `loading`, clears `error`, then awaits the call.
//! - `Ok` stores `data` and clears `error`; `Err` stores `error` and clears
//!   `data`. A stale success never sits next to a reported error.
//! - `loading` always ends `false`, even if the call panics. The panic is
//!   caught and reported as an `Unknown` error.
//! - Each completion is applied under one lock, so readers never see a
//!   half-updated state.
//!
//! ## Eager vs. lazy
//!
//! With `immediate` (the default), [`LoadController::attach`] runs the call
//! on the first attach and again whenever the dependency value changes. Lazy
//! controllers (submit-style calls such as creating a post) only run when
//! `execute` is called.
//!
//! ## Overlapping calls
//!
//! Calls are not deduplicated or sequenced. If two `execute`s overlap, the
//! one that *resolves* last owns the final state.

use crate::framework::error::UNEXPECTED_ERROR_MESSAGE;
use crate::framework::{ApiError, ApiResult};
use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::Mutex;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, warn};

type LoadFn<T, V> = Arc<dyn Fn(Option<V>) -> BoxFuture<'static, ApiResult<T>> + Send + Sync>;

/// Observable state of a controller.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<ApiError>,
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

/// Controller configuration.
#[derive(Debug, Clone)]
pub struct LoadOptions<V> {
    /// Run on attach and on dependency changes. Defaults to `true`.
    pub immediate: bool,
    /// Variables used when `execute` is called without any.
    pub variables: Option<V>,
}

impl<V> Default for LoadOptions<V> {
    fn default() -> Self {
        Self {
            immediate: true,
            variables: None,
        }
    }
}

/// Drives one call and exposes its load state.
///
/// `T` is the success value, `V` the call's variables and `D` the dependency
/// value compared by [`attach`](Self::attach). Clones share state.
pub struct LoadController<T, V = (), D = ()> {
    call: LoadFn<T, V>,
    options: LoadOptions<V>,
    state: Arc<Mutex<LoadState<T>>>,
    deps: Arc<Mutex<Option<D>>>,
}

impl<T, V: Clone, D> Clone for LoadController<T, V, D> {
    fn clone(&self) -> Self {
        Self {
            call: self.call.clone(),
            options: self.options.clone(),
            state: self.state.clone(),
            deps: self.deps.clone(),
        }
    }
}

impl<T, V, D> LoadController<T, V, D>
where
    T: Clone + Send + 'static,
    V: Clone + Send + Sync + 'static,
    D: PartialEq + Send + 'static,
{
    /// An eager controller with default options.
    pub fn new<F, Fut>(call: F) -> Self
    where
        F: Fn(Option<V>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ApiResult<T>> + Send + 'static,
    {
        Self::with_options(call, LoadOptions::default())
    }

    /// A controller that never runs on its own.
    pub fn lazy<F, Fut>(call: F) -> Self
    where
        F: Fn(Option<V>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ApiResult<T>> + Send + 'static,
    {
        Self::with_options(
            call,
            LoadOptions {
                immediate: false,
                variables: None,
            },
        )
    }

    pub fn with_options<F, Fut>(call: F, options: LoadOptions<V>) -> Self
    where
        F: Fn(Option<V>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ApiResult<T>> + Send + 'static,
    {
        Self {
            call: Arc::new(move |variables| call(variables).boxed()),
            options,
            state: Arc::new(Mutex::new(LoadState::default())),
            deps: Arc::new(Mutex::new(None)),
        }
    }

    /// Runs the call. Falls back to the configured variables when `variables`
    /// is `None`. Never panics.
    pub async fn execute(&self, variables: Option<V>) -> ApiResult<T> {
        {
            let mut state = self.state.lock();
            state.loading = true;
            state.error = None;
        }

        let variables = variables.or_else(|| self.options.variables.clone());
        let call = self.call.clone();
        // The call is made inside the future so a panic while building it is
        // caught too.
        let attempt = async move { call(variables).await };
        let result = match AssertUnwindSafe(attempt).catch_unwind().await {
            Ok(result) => result,
            Err(_) => {
                warn!("Load call panicked");
                Err(ApiError::unknown(UNEXPECTED_ERROR_MESSAGE))
            }
        };

        {
            let mut state = self.state.lock();
            match &result {
                Ok(data) => {
                    state.data = Some(data.clone());
                    state.error = None;
                }
                Err(e) => {
                    state.error = Some(e.clone());
                    state.data = None;
                }
            }
            state.loading = false;
        }
        debug!(ok = result.is_ok(), "Load finished");
        result
    }

    /// Records `deps`; for an eager controller, runs the call if this is the
    /// first attach or `deps` changed. Returns the result when it ran.
    pub async fn attach(&self, deps: D) -> Option<ApiResult<T>> {
        let changed = {
            let mut last = self.deps.lock();
            let changed = last.as_ref() != Some(&deps);
            *last = Some(deps);
            changed
        };
        if self.options.immediate && changed {
            Some(self.execute(None).await)
        } else {
            None
        }
    }

    /// Back to the initial empty state.
    pub fn reset(&self) {
        *self.state.lock() = LoadState::default();
    }

    pub fn state(&self) -> LoadState<T> {
        self.state.lock().clone()
    }

    pub fn data(&self) -> Option<T> {
        self.state.lock().data.clone()
    }

    pub fn error(&self) -> Option<ApiError> {
        self.state.lock().error.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    pub fn is_immediate(&self) -> bool {
        self.options.immediate
    }
}
