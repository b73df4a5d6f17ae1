// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Operator interrupts shared between the runner and the sequencer.
//!
//! One listener counts every Ctrl-C for the life of the process. The runner
//! waits for the count to move past the value it saw when a command started;
//! the sequencer checks whether any interrupt happened at all, so one that
//! arrives between two steps is still seen.

use tokio::sync::watch;

/// Read side of the interrupt counter. Cheap to clone.
#[derive(Clone, Debug)]
pub struct Interrupt {
    count: watch::Receiver<u64>,
}

/// Write side, for embedders and tests that raise interrupts themselves.
#[derive(Debug)]
pub struct InterruptHandle {
    count: watch::Sender<u64>,
}

impl InterruptHandle {
    pub fn trigger(&self) {
        self.count.send_modify(|count| *count += 1);
    }
}

impl Interrupt {
    /// Listen for Ctrl-C on a background task. Must be called inside a
    /// tokio runtime.
    ///
    /// If the signal handler cannot be installed the failure is logged and
    /// the interrupt simply never fires.
    pub fn ctrl_c() -> Self {
        let (handle, interrupt) = Self::manual();
        tokio::spawn(async move {
            loop {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => handle.trigger(),
                    Err(error) => {
                        tracing::error!(error = %error, "cannot listen for Ctrl-C; interrupts disabled");
                        return;
                    }
                }
            }
        });
        interrupt
    }

    pub fn manual() -> (InterruptHandle, Self) {
        let (tx, rx) = watch::channel(0);
        (InterruptHandle { count: tx }, Self { count: rx })
    }

    /// An interrupt that never fires.
    pub fn never() -> Self {
        Self::manual().1
    }

    /// Interrupts seen so far.
    pub fn count(&self) -> u64 {
        *self.count.borrow()
    }

    pub fn is_set(&self) -> bool {
        self.count() > 0
    }

    /// Resolve once more than `seen` interrupts have arrived. Pending forever
    /// if the listener is gone.
    pub async fn after(&self, seen: u64) {
        let mut count = self.count.clone();
        loop {
            if *count.borrow_and_update() > seen {
                return;
            }
            if count.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

impl Default for Interrupt {
    fn default() -> Self {
        Self::never()
    }
}
