//! Waiting for externally settled futures
//!
//! A computation waits for a future with [`wait_for`](fn.wait_for.html).
//! [`run`](fn.run.html) turns the computation into a future that suspends whenever the
//! computation waits, and resumes it once the awaited future settles, so the calling thread
//! is not blocked. The runner must be the outermost one.

use crate::{Computation, Continuation, Effect, Error, Handler, Result};

use std::any::{type_name, Any};
use std::fmt;
use std::future::Future;

use futures::future::{FutureExt, LocalBoxFuture};
use log::debug;

/// Wait for a future to settle
pub struct WaitFor {
    future: LocalBoxFuture<'static, Result<Box<dyn Any>>>,
}

impl fmt::Debug for WaitFor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("WaitFor").finish_non_exhaustive()
    }
}

impl Effect for WaitFor {
    type Output = Box<dyn Any>;
}

/// Wait for `future` and return its value, or raise its error
pub async fn wait_for<T, F>(future: F) -> Result<T>
where
    T: 'static,
    F: Future<Output = Result<T>> + 'static,
{
    let future = async move { future.await.map(|v| Box::new(v) as Box<dyn Any>) }.boxed_local();
    let value = crate::perform(WaitFor { future }).await?;
    value.downcast::<T>().map(|v| *v).map_err(|_| Error::AnswerType {
        expected: type_name::<T>(),
    })
}

enum Status<T> {
    Done(T),
    Waiting(WaitFor, Continuation<Box<dyn Any>, Status<T>>),
}

/// Run `comp` until it finishes or waits for a future
fn step<T: 'static>(comp: Computation<T>) -> Computation<Status<T>> {
    comp.match_with(
        Handler::new(|v| Ok(Status::Done(v)), Err)
            .on::<WaitFor, _>(|wait, k| crate::pure(Status::Waiting(wait, k))),
    )
}

/// Turn `comp` into a future, handling its waits for other futures
///
/// Every other effect of `comp` must be handled inside it.
pub async fn run<T: 'static>(comp: Computation<T>) -> Result<T> {
    let mut status = crate::run(step(comp))?;
    loop {
        match status {
            Status::Done(v) => return Ok(v),
            Status::Waiting(WaitFor { future }, k) => {
                debug!("future: suspending until the awaited future settles");
                let next = match future.await {
                    Ok(v) => k.resume(v),
                    Err(e) => k.discontinue(e),
                };
                status = crate::run(next)?;
            }
        }
    }
}
