//! # Write trigger.
//!
//! A single-slot boolean signal set by the external control-logic stage
//! ("setpoints are computed, proceed to write") and consumed once per cycle
//! by the engine. No queueing: triggering twice before consumption has no
//! additional effect.
//!
//! The engine checks the slot in its write-wait poll loop, runs all write
//! tasks, and clears the slot only after the pass completes. A pass that
//! fails mid-way leaves the slot set, so the next cycle's write-wait fires
//! immediately with the setpoints still pending.

use std::sync::atomic::{AtomicBool, Ordering};

/// Single-slot write signal.
pub(crate) struct WriteTrigger {
    flag: AtomicBool,
}

impl WriteTrigger {
    pub(crate) fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
        }
    }

    /// Sets the slot. Callable from any thread; idempotent.
    pub(crate) fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Returns `true` if the slot is set.
    pub(crate) fn is_set(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Clears the slot, after the write pass completed.
    pub(crate) fn clear(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
