//! Apartment-affined executor — one dedicated worker thread per operation.
//!
//! The clipboard and OLE data-object calls must run on a thread that has
//! entered a single-threaded apartment. Apartment state is per thread and
//! cannot be changed on a pooled thread, so every call spawns a fresh
//! background thread, enters the apartment there, runs the work, and
//! reports back through a one-shot channel.
//!
//! A panic in the work is caught on the worker and returned as
//! [`ClipboardError::Worker`]. The worker starts on the first poll of the
//! returned future. Dropping the future after that does not stop the
//! worker; it runs to completion and its result is discarded.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread;

use tokio::sync::oneshot;

use crate::error::ClipboardError;

const WORKER_NAME: &str = "clipboard-sta";

/// Run `work` on a new apartment-affined thread and await its result.
pub async fn run_affined_async<T, F>(work: F) -> Result<T, ClipboardError>
where
    F: FnOnce() -> Result<T, ClipboardError> + Send + 'static,
    T: Send + 'static,
{
    let (tx, rx) = oneshot::channel();

    thread::Builder::new()
        .name(WORKER_NAME.into())
        .spawn(move || {
            let outcome = {
                let _apartment = Apartment::enter();
                panic::catch_unwind(AssertUnwindSafe(work))
            };
            let result = outcome.unwrap_or_else(|payload| {
                let message = panic_message(payload.as_ref());
                tracing::error!(%message, "clipboard worker panicked");
                Err(ClipboardError::Worker(format!("panicked: {message}")))
            });
            // Receiver gone means the caller stopped waiting.
            let _ = tx.send(result);
        })
        .map_err(|e| ClipboardError::Worker(format!("failed to spawn {WORKER_NAME}: {e}")))?;

    rx.await
        .unwrap_or_else(|_| Err(ClipboardError::Worker("exited without a result".into())))
}

/// Blocking form of [`run_affined_async`].
///
/// Drives the async form to completion on the calling thread; no runtime
/// is required.
pub fn run_affined<T, F>(work: F) -> Result<T, ClipboardError>
where
    F: FnOnce() -> Result<T, ClipboardError> + Send + 'static,
    T: Send + 'static,
{
    futures::executor::block_on(run_affined_async(work))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Single-threaded apartment membership for the current thread.
///
/// Left on drop if entering succeeded.
struct Apartment {
    #[cfg_attr(not(windows), allow(dead_code))]
    entered: bool,
}

#[cfg(windows)]
impl Apartment {
    fn enter() -> Self {
        use windows_sys::Win32::System::Com::{COINIT_APARTMENTTHREADED, CoInitializeEx};

        // SAFETY: reserved pointer must be null; called once per fresh thread.
        let hr = unsafe { CoInitializeEx(std::ptr::null(), COINIT_APARTMENTTHREADED as _) };
        if hr < 0 {
            tracing::warn!(hr, "CoInitializeEx failed; continuing without apartment");
        }
        Self { entered: hr >= 0 }
    }
}

#[cfg(windows)]
impl Drop for Apartment {
    fn drop(&mut self) {
        if self.entered {
            // SAFETY: balances the successful CoInitializeEx on this thread.
            unsafe { windows_sys::Win32::System::Com::CoUninitialize() };
        }
    }
}

#[cfg(not(windows))]
impl Apartment {
    fn enter() -> Self {
        Self { entered: false }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use super::*;

    #[test]
    fn work_runs_on_dedicated_named_thread() {
        let caller = thread::current().id();
        let (id, name) = run_affined(|| {
            let me = thread::current();
            Ok((me.id(), me.name().map(str::to_string)))
        })
        .unwrap();

        assert_ne!(id, caller);
        assert_eq!(name.as_deref(), Some(WORKER_NAME));
    }

    #[test]
    fn every_call_gets_a_fresh_thread() {
        let first = run_affined(|| Ok(thread::current().id())).unwrap();
        let second = run_affined(|| Ok(thread::current().id())).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn errors_cross_back_to_caller() {
        let err = run_affined::<(), _>(|| Err(ClipboardError::NativeOperationFailed { code: 5 }))
            .unwrap_err();
        assert!(matches!(err, ClipboardError::NativeOperationFailed { code: 5 }));
    }

    #[test]
    fn panics_are_captured() {
        let err = run_affined::<(), _>(|| panic!("boom")).unwrap_err();
        match err {
            ClipboardError::Worker(message) => assert!(message.contains("boom")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn formatted_panics_are_captured() {
        let code = 42;
        let err = run_affined::<(), _>(move || panic!("failed with {code}")).unwrap_err();
        assert!(err.to_string().contains("failed with 42"));
    }

    #[tokio::test]
    async fn dropped_future_lets_worker_finish() {
        let finished = Arc::new(AtomicBool::new(false));
        let (done_tx, done_rx) = std::sync::mpsc::channel();

        let flag = Arc::clone(&finished);
        let work = run_affined_async(move || {
            thread::sleep(Duration::from_millis(50));
            flag.store(true, Ordering::SeqCst);
            let _ = done_tx.send(());
            Ok(())
        });

        // Polls once, which spawns the worker, then drops the future.
        let waited = tokio::time::timeout(Duration::from_millis(5), work).await;
        assert!(waited.is_err());

        done_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn async_form_does_not_block_runtime() {
        let (a, b) = tokio::join!(
            run_affined_async(|| {
                thread::sleep(Duration::from_millis(20));
                Ok(1)
            }),
            run_affined_async(|| Ok(2)),
        );
        assert_eq!(a.unwrap() + b.unwrap(), 3);
    }
}
