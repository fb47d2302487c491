// The two calls the probe makes into a linear-algebra runtime, plus the
// guard that pairs them.

use crate::types::StatusCode;

/// A runtime that can hand out and take back session handles.
///
/// `create_handle` always returns a handle slot, even on failure; the slot
/// may be invalid in that case. `destroy_handle` must accept whatever
/// `create_handle` returned.
pub trait BlasRuntime {
    type Handle;

    fn create_handle(&self) -> (Self::Handle, StatusCode);
    fn destroy_handle(&self, handle: Self::Handle);
}

/// Scoped acquisition: the handle is released exactly once when the guard
/// drops, on every exit path.
pub struct HandleGuard<'r, R: BlasRuntime> {
    runtime: &'r R,
    handle: Option<R::Handle>,
    status: StatusCode,
}

impl<'r, R: BlasRuntime> HandleGuard<'r, R> {
    pub fn acquire(runtime: &'r R) -> Self {
        let (handle, status) = runtime.create_handle();
        Self {
            runtime,
            handle: Some(handle),
            status,
        }
    }

    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[inline]
    pub fn is_acquired(&self) -> bool {
        self.status.is_success()
    }

    /// The live handle, only when acquisition succeeded.
    pub fn handle(&self) -> Option<&R::Handle> {
        if self.is_acquired() {
            self.handle.as_ref()
        } else {
            None
        }
    }
}

impl<R: BlasRuntime> Drop for HandleGuard<'_, R> {
    fn drop(&mut self) {
        if let Some(h) = self.handle.take() {
            self.runtime.destroy_handle(h);
        }
    }
}
