use super::context::task_context;
use super::{Effect, Error, Result};

use std::any::type_name;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task;

use log::trace;

/// A future created by [`perform`](fn.perform.html)
///
/// The first poll publishes the request to the running task and suspends.
/// The next poll after a handler answered resolves to the answer.
#[must_use = "effects do nothing unless awaited"]
pub struct Perform<E: Effect> {
    request: Option<E>,
}

// Safe because we never create Pin<&mut E>
impl<E: Effect> Unpin for Perform<E> {}

impl<E: Effect> fmt::Debug for Perform<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Perform")
            .field("effect", &type_name::<E>())
            .field("suspended", &self.request.is_none())
            .finish()
    }
}

/// Perform an effect
///
/// The returned future resolves to the value the claiming handler resumed with,
/// or to the error it discontinued with.
pub fn perform<E: Effect>(request: E) -> Perform<E> {
    Perform {
        request: Some(request),
    }
}

impl<E: Effect> Future for Perform<E> {
    type Output = Result<E::Output>;

    fn poll(self: Pin<&mut Self>, _cx: &mut task::Context<'_>) -> task::Poll<Self::Output> {
        let this = self.get_mut();
        let cx = match task_context() {
            Some(cx) => cx,
            None => return task::Poll::Ready(Err(Error::NoContext)),
        };

        if let Some(request) = this.request.take() {
            cx.suspend(Box::new(request));
            return task::Poll::Pending;
        }

        match cx.take_answer() {
            Some(Ok(value)) => task::Poll::Ready(value.downcast::<E::Output>().map(|v| *v).map_err(
                |_| Error::AnswerType {
                    expected: type_name::<E::Output>(),
                },
            )),
            Some(Err(e)) => task::Poll::Ready(Err(e)),
            None => {
                trace!("Perform::poll: no answer for {} yet", type_name::<E>());
                task::Poll::Pending
            }
        }
    }
}
