//! Handle-probe behaviour against a scripted runtime, plus smoke checks of the
//! real cuBLAS path (which must behave on machines with or without a GPU).

use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};

use serial_test::serial;
use synapse_accel::util::{CUBLAS_LIB_ENV, DISABLE_ENV};
use synapse_accel::{
    initializeGPUMatrixAcceleration, probe_acceleration, probe_report, probe_with, BlasRuntime,
    HandleGuard, ProbeOutcome, StatusCode,
};

/// Runtime whose create call returns a fixed status and which tracks every
/// handle it hands out.
struct ScriptedRuntime {
    status: StatusCode,
    next_id: Cell<u32>,
    created: Cell<u32>,
    destroyed: RefCell<Vec<u32>>,
}

impl ScriptedRuntime {
    fn returning(status: StatusCode) -> Self {
        Self {
            status,
            next_id: Cell::new(1),
            created: Cell::new(0),
            destroyed: RefCell::new(Vec::new()),
        }
    }

    fn live_handles(&self) -> u32 {
        self.created.get() - self.destroyed.borrow().len() as u32
    }
}

impl BlasRuntime for ScriptedRuntime {
    type Handle = u32;

    fn create_handle(&self) -> (u32, StatusCode) {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.created.set(self.created.get() + 1);
        (id, self.status)
    }

    fn destroy_handle(&self, handle: u32) {
        self.destroyed.borrow_mut().push(handle);
    }
}

// ── mocked runtime ───────────────────────────────────────────────────────────

#[test]
fn success_status_is_available_and_destroys_once() {
    let rt = ScriptedRuntime::returning(StatusCode::SUCCESS);

    assert_eq!(probe_with(&rt), ProbeOutcome::Available);
    assert_eq!(rt.created.get(), 1);
    assert_eq!(*rt.destroyed.borrow(), vec![1]);
}

#[test]
fn failure_status_is_unavailable_and_still_destroys_once() {
    for code in [
        StatusCode::NOT_INITIALIZED,
        StatusCode::ALLOC_FAILED,
        StatusCode::ARCH_MISMATCH,
        StatusCode::INTERNAL_ERROR,
        StatusCode(-3),
    ] {
        let rt = ScriptedRuntime::returning(code);
        assert_eq!(probe_with(&rt), ProbeOutcome::Unavailable, "{code}");
        assert_eq!(rt.destroyed.borrow().len(), 1, "{code}");
        assert_eq!(rt.live_handles(), 0, "{code}");
    }
}

#[test]
fn repeated_probes_are_stable_and_leak_nothing() {
    for status in [StatusCode::SUCCESS, StatusCode::NOT_INITIALIZED] {
        let rt = ScriptedRuntime::returning(status);
        let first = probe_with(&rt);
        for _ in 1..1000 {
            assert_eq!(probe_with(&rt), first);
        }
        assert_eq!(rt.created.get(), 1000);
        assert_eq!(rt.live_handles(), 0);

        // every handle released is the one that was created, in order
        let destroyed = rt.destroyed.borrow();
        assert!(destroyed.iter().copied().eq(1..=1000));
    }
}

#[test]
fn guard_only_exposes_handle_after_success() {
    let ok = ScriptedRuntime::returning(StatusCode::SUCCESS);
    {
        let guard = HandleGuard::acquire(&ok);
        assert!(guard.is_acquired());
        assert_eq!(guard.handle(), Some(&1));
        assert_eq!(ok.live_handles(), 1);
    }
    assert_eq!(ok.live_handles(), 0);

    let bad = ScriptedRuntime::returning(StatusCode::ALLOC_FAILED);
    {
        let guard = HandleGuard::acquire(&bad);
        assert!(!guard.is_acquired());
        assert_eq!(guard.handle(), None);
        assert_eq!(guard.status(), StatusCode::ALLOC_FAILED);
    }
    assert_eq!(bad.live_handles(), 0);
}

#[test]
fn guard_releases_when_unwinding() {
    let rt = ScriptedRuntime::returning(StatusCode::SUCCESS);
    let res = panic::catch_unwind(AssertUnwindSafe(|| {
        let _guard = HandleGuard::acquire(&rt);
        panic!("caller blew up while holding the handle");
    }));
    assert!(res.is_err());
    assert_eq!(rt.live_handles(), 0);
}

// ── real runtime ─────────────────────────────────────────────────────────────

#[test]
#[serial(accel_env)]
fn real_probe_does_not_panic_and_is_repeatable() {
    temp_env::with_var_unset(DISABLE_ENV, || {
        let first = probe_acceleration();
        for _ in 0..25 {
            assert_eq!(probe_acceleration(), first);
        }
        assert_eq!(initializeGPUMatrixAcceleration(), first.is_available());
    });
}

#[test]
#[serial(accel_env)]
fn disabled_env_forces_unavailable() {
    temp_env::with_var(DISABLE_ENV, Some("1"), || {
        assert_eq!(probe_acceleration(), ProbeOutcome::Unavailable);
        assert!(!initializeGPUMatrixAcceleration());

        let report = probe_report();
        assert_eq!(report.outcome, ProbeOutcome::Unavailable);
        assert_eq!(report.reason.as_deref(), Some("disabled_env"));
        assert!(report.library.is_none());
    });
}

#[test]
#[serial(accel_env)]
fn report_agrees_with_outcome() {
    temp_env::with_vars(
        [(DISABLE_ENV, None::<&str>), (CUBLAS_LIB_ENV, None)],
        || {
            let outcome = probe_acceleration();
            let report = probe_report();
            assert_eq!(report.outcome, outcome);
            match report.outcome {
                ProbeOutcome::Available => {
                    assert!(report.library.is_some());
                    assert_eq!(report.status, Some(StatusCode::SUCCESS));
                    assert!(report.reason.is_none());
                }
                ProbeOutcome::Unavailable => assert!(report.reason.is_some()),
            }
        },
    );
}
