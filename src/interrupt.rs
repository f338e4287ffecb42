//! Cooperative interruption of a sampling run.
//!
//! An [`Interrupt`] is a cloneable handle around a shared flag. The sampling
//! loop checks it at each iteration boundary, and the runner races it against
//! the child wait so a stuck invocation can be stopped mid-iteration. A
//! triggered interrupt stops the loop but keeps everything collected so far.

use std::pin::pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;
use tracing::warn;

/// Cloneable stop handle: triggered once, observed by every clone.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    flag: AtomicBool,
    notify: Notify,
}

impl Interrupt {
    /// Creates an untriggered handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a stop and wakes every pending [`Interrupt::cancelled`] wait.
    pub fn trigger(&self) {
        self.inner.flag.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    /// Whether a stop has been requested.
    pub fn is_set(&self) -> bool {
        self.inner.flag.load(Ordering::SeqCst)
    }

    /// Resolves once the interrupt has been triggered.
    pub async fn cancelled(&self) {
        let mut notified = pin!(self.inner.notify.notified());
        // Register with the notifier before checking the flag so a trigger
        // landing between the check and the await cannot be missed.
        notified.as_mut().enable();
        if self.is_set() {
            return;
        }
        notified.await;
    }

    /// Spawns a background task that triggers this handle on Ctrl-C.
    pub fn listen_for_ctrl_c(&self) {
        let handle = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupt received, stopping after the current iteration");
                handle.trigger();
            }
        });
    }
}
