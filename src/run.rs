//! The top-level driver

use super::context::{set_task_context, Context};
use super::{Computation, Error, Result};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task;
use std::thread::{self, Thread};

use futures::task::{waker, ArcWake};
use futures::FutureExt;
use log::{debug, error};

/// Unparks the thread blocked in `run` when the computation can make progress
#[derive(Debug)]
struct ThreadNotify {
    thread: Thread,
    woken: AtomicBool,
}

impl ThreadNotify {
    fn current() -> Self {
        ThreadNotify {
            thread: thread::current(),
            woken: AtomicBool::new(false),
        }
    }

    fn park(&self) {
        while !self.woken.swap(false, Ordering::AcqRel) {
            thread::park();
        }
    }
}

impl ArcWake for ThreadNotify {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        arc_self.woken.store(true, Ordering::Release);
        arc_self.thread.unpark();
    }
}

/// Run a computation whose effects are all handled
///
/// Returns the value of the computation or the error it propagated.
/// If the computation performs an effect that no handler claimed, it is not driven any further
/// and [`Error::Unhandled`](enum.Error.html#variant.Unhandled) reports the kind of the effect.
///
/// A computation waiting for something other than an effect (a plain future awaited in its
/// body) blocks the current thread until it is woken up.
pub fn run<T: 'static>(mut comp: Computation<T>) -> Result<T> {
    let notify = Arc::new(ThreadNotify::current());
    let waker = waker(Arc::clone(&notify));
    let mut cx = task::Context::from_waker(&waker);
    let task_cx = Context::new();

    loop {
        match set_task_context(task_cx.clone(), || comp.poll_unpin(&mut cx)) {
            task::Poll::Ready(result) => return result,
            task::Poll::Pending => {
                if let Some(request) = task_cx.take_request() {
                    let kind = request.kind();
                    error!("run: unhandled effect {}", kind);
                    return Err(Error::Unhandled(kind));
                }
                debug!("run: waiting for a wake-up");
                notify.park();
            }
        }
    }
}
