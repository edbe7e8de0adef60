//! Helpers shared across use cases.

use tokio_util::sync::CancellationToken;

/// Whether the caller has asked this run to stop.
pub(crate) fn cancellation_requested(token: &Option<CancellationToken>) -> bool {
    token.as_ref().map(|t| t.is_cancelled()).unwrap_or(false)
}
