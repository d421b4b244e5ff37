//! Task-local trace id for the request being served.
//!
//! Set by `RequestTrace`; read by `AppError` when rendering problem details.

use tokio::task_local;

task_local! {
    static TRACE_ID: String;
}

/// The current trace id, or `"unknown"` outside a request scope.
pub fn trace_id() -> String {
    TRACE_ID
        .try_with(Clone::clone)
        .unwrap_or_else(|_| "unknown".to_string())
}

pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: std::future::Future<Output = R>,
{
    TRACE_ID.scope(trace_id, future).await
}
