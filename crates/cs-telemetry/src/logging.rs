//! Structured log helpers.
//!
//! Every line carries the same leading fields so log pipelines can group
//! by `component` and `guid`:
//! - `component`: emitting component (policy, management, membership, ...)
//! - `guid`: change set guid, when there is one
//! - additional context fields

/// Emit a structured event with a `component` field.
///
/// ```rust,ignore
/// log_event!(info, "management", "State changed", guid = %guid, to = %state);
/// ```
#[macro_export]
macro_rules! log_event {
    (info, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (warn, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::warn!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (error, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::error!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (debug, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::debug!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };
}

/// Emit a change-set-scoped event with the standard `guid` field.
#[macro_export]
macro_rules! log_change_set_event {
    ($level:ident, $component:expr, $msg:expr, $guid:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = $component,
            guid = %$guid,
            $($($field)*,)?
            $msg
        )
    };
}
