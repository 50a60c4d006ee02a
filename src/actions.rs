// SPDX-License-Identifier: MPL-2.0
//! Download and share collaborators, run off the gesture thread.
//!
//! The viewer only ever asks for an action through an effect. The host hands
//! the request to a [`Dispatcher`], which runs it on a tokio runtime and
//! reports the outcome back over a channel so the viewer can raise a
//! notification. A slow or failing collaborator never blocks gestures.

use futures_util::future::BoxFuture;
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Host-side action on the current image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Download,
    Share,
}

impl ActionKind {
    /// Notification key shown when the action fails.
    #[must_use]
    pub fn failure_key(self) -> &'static str {
        match self {
            ActionKind::Download => "notification-download-error",
            ActionKind::Share => "notification-share-error",
        }
    }
}

/// Failure reported by a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("permission denied")]
    PermissionDenied,

    /// The user backed out (closed the share sheet). Not an error to report.
    #[error("cancelled by user")]
    Cancelled,

    #[error("{0}")]
    Failed(String),
}

/// Result of one dispatched action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub kind: ActionKind,
    pub uri: String,
    pub result: Result<(), ActionError>,
}

/// The host's implementation of the download and share collaborators.
pub trait MediaActions: Send + Sync {
    /// Saves the image at `uri` to the device media library.
    fn download(&self, uri: String) -> BoxFuture<'static, Result<(), ActionError>>;

    /// Opens the platform share sheet for the image at `uri`.
    fn share(&self, uri: String) -> BoxFuture<'static, Result<(), ActionError>>;
}

/// Runs [`MediaActions`] on a tokio runtime and reports outcomes.
#[derive(Clone)]
pub struct Dispatcher {
    runtime: Handle,
    actions: Arc<dyn MediaActions>,
    outcomes: mpsc::UnboundedSender<ActionOutcome>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Creates a dispatcher and the receiving end of its outcome channel.
    #[must_use]
    pub fn new(
        runtime: Handle,
        actions: Arc<dyn MediaActions>,
    ) -> (Self, mpsc::UnboundedReceiver<ActionOutcome>) {
        let (outcomes, receiver) = mpsc::unbounded_channel();
        (
            Self {
                runtime,
                actions,
                outcomes,
            },
            receiver,
        )
    }

    /// Starts `kind` for `uri` and returns immediately.
    pub fn dispatch(&self, kind: ActionKind, uri: impl Into<String>) -> JoinHandle<()> {
        let uri = uri.into();
        let future = match kind {
            ActionKind::Download => self.actions.download(uri.clone()),
            ActionKind::Share => self.actions.share(uri.clone()),
        };
        let outcomes = self.outcomes.clone();

        tracing::debug!(?kind, %uri, "dispatching media action");
        self.runtime.spawn(async move {
            let result = future.await;
            if let Err(err) = &result {
                tracing::debug!(?kind, %uri, %err, "media action failed");
            }
            // The viewer may already be closed; nobody left to tell.
            let _ = outcomes.send(ActionOutcome { kind, uri, result });
        })
    }
}
