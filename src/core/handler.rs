//! Completion handlers fired when a state reports it is done.

use super::BoxError;
use std::fmt;
use std::sync::Arc;

type Callback<C> = Arc<dyn Fn(&mut C) -> Result<(), BoxError> + Send + Sync>;

/// Callback invoked with the shared context when a Real node's behaviour
/// returns [`Status::Complete`](super::Status::Complete).
///
/// Handlers run before transitions are evaluated in the same tick, so any
/// value they write to the context is visible to those transitions.
pub struct CompletionHandler<C> {
    callback: Callback<C>,
    label: Option<String>,
}

impl<C> CompletionHandler<C> {
    /// Create a handler from an infallible callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&mut C) + Send + Sync + 'static,
    {
        Self::try_new(move |ctx: &mut C| {
            callback(ctx);
            Ok(())
        })
    }

    /// Create a handler whose callback may fail.
    pub fn try_new<F>(callback: F) -> Self
    where
        F: Fn(&mut C) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
            label: None,
        }
    }

    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Run the handler against the context.
    pub fn invoke(&self, ctx: &mut C) -> Result<(), BoxError> {
        (self.callback)(ctx)
    }
}

impl<C> Clone for CompletionHandler<C> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
            label: self.label.clone(),
        }
    }
}

impl<C> fmt::Debug for CompletionHandler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionHandler")
            .field("label", &self.label)
            .finish()
    }
}
