use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{FulfillmentGateway, VerificationRequest};

#[derive(Debug, thiserror::Error)]
pub enum DetachedTaskError {
    #[error("no async runtime is available to run background work")]
    NoRuntime,
    #[error("background task did not complete: {0}")]
    Aborted(String),
}

/// Handle to background work whose outcome only reaches the logs. Dropping it
/// does not cancel the work.
#[derive(Debug)]
pub struct DetachedTask {
    handle: JoinHandle<()>,
}

impl DetachedTask {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the task; only tests and shutdown paths need this.
    pub async fn join(self) -> Result<(), DetachedTaskError> {
        self.handle
            .await
            .map_err(|err| DetachedTaskError::Aborted(err.to_string()))
    }
}

/// Sends the verification code in the background. Failures are logged and
/// never reported back to the caller.
pub fn spawn_verification(
    gateway: Arc<dyn FulfillmentGateway>,
    request: VerificationRequest,
) -> Result<DetachedTask, DetachedTaskError> {
    let runtime = Handle::try_current().map_err(|_| DetachedTaskError::NoRuntime)?;

    let handle = runtime.spawn(async move {
        match gateway.send_verification_code(&request).await {
            Ok(()) => debug!(session_id = %request.session_id, "verification code dispatched"),
            Err(failure) => warn!(
                session_id = %request.session_id,
                code = failure.code.as_deref().unwrap_or("unknown"),
                error = %failure,
                "background verification dispatch failed"
            ),
        }
    });

    Ok(DetachedTask { handle })
}
