//! One run in flight at a time

use crate::log_warning;
use crate::logging::codes;
use std::sync::atomic::{AtomicBool, Ordering};

/// Admits one run at a time; requests arriving while a run is active are
/// dropped, not queued.
#[derive(Debug, Default)]
pub struct ProcessingGate {
    busy: AtomicBool,
}

/// Holds the gate until dropped
#[derive(Debug)]
pub struct GateGuard<'a> {
    gate: &'a ProcessingGate,
}

impl ProcessingGate {
    pub const fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn try_enter(&self) -> Option<GateGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| GateGuard { gate: self })
    }

    /// Run `f` unless another run holds the gate. The gate is released on
    /// every exit path, unwinding included.
    pub fn try_process<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce() -> R,
    {
        match self.try_enter() {
            Some(_guard) => Some(f()),
            None => {
                log_warning!(code = codes::pipeline::REQUEST_DROPPED,
                    "Processing request dropped; a run is already active");
                None
            }
        }
    }
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reentrant_request_is_dropped() {
        let gate = ProcessingGate::new();

        let outer = gate.try_process(|| {
            assert!(gate.is_busy());
            gate.try_process(|| "inner")
        });

        assert_eq!(outer, Some(None));
        assert!(!gate.is_busy());
    }

    #[test]
    fn test_sequential_runs_are_admitted() {
        let gate = ProcessingGate::new();
        assert_eq!(gate.try_process(|| 1), Some(1));
        assert_eq!(gate.try_process(|| 2), Some(2));
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let gate = ProcessingGate::new();
        {
            let _guard = gate.try_enter().unwrap();
            assert!(gate.try_enter().is_none());
        }
        assert!(gate.try_enter().is_some());
    }

    #[test]
    fn test_released_after_panic() {
        let gate = ProcessingGate::new();
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            gate.try_process(|| panic!("run failed"))
        }));

        assert!(outcome.is_err());
        assert!(!gate.is_busy());
    }

    #[test]
    fn test_gate_across_threads() {
        let gate = ProcessingGate::new();
        let guard = gate.try_enter().unwrap();

        std::thread::scope(|scope| {
            let handle = scope.spawn(|| gate.try_process(|| ()));
            assert_eq!(handle.join().unwrap(), None);
        });

        drop(guard);
        assert!(!gate.is_busy());
    }
}
