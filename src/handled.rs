//! An effectful computation with some effects handled

use super::computation::Driver;
use super::context::{task_context, Answer};
use super::continuation::tail;
use super::kind::Request;
use super::{Computation, Error, Handler, Interceptions, Result};

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::mem;
use std::pin::Pin;
use std::rc::Rc;
use std::task;

use futures::FutureExt;
use log::{debug, trace};

enum ActiveComputation<T, S> {
    /// The handled computation is about to be resumed with an answer
    Resuming(Answer, Computation<T>),
    /// The handled computation is running
    Source(Computation<T>),
    /// An interception function is running
    Handler(Computation<S>),
    Finished,
}

impl<T, S> fmt::Debug for ActiveComputation<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            ActiveComputation::Resuming(..) => "Resuming",
            ActiveComputation::Source(_) => "Source",
            ActiveComputation::Handler(_) => "Handler",
            ActiveComputation::Finished => "Finished",
        })
    }
}

/// A computation with a handler attached
///
/// Every resumption of a continuation captured by this driver creates a new driver
/// with the same handler, so effects performed after the resumption are handled too.
/// When an interception function returns such a driver as is, this driver takes its state
/// over, so tail resumptions run in constant stack space.
struct Handled<T, S> {
    state: ActiveComputation<T, S>,
    handler: Rc<Handler<T, S>>,
}

impl<T, S> fmt::Debug for Handled<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Handled")
            .field("state", &self.state)
            .field("handler", &self.handler)
            .finish()
    }
}

impl<T: 'static, S: 'static> Handled<T, S> {
    fn new(source: Computation<T>, handler: Rc<Handler<T, S>>) -> Self {
        Handled {
            state: ActiveComputation::Source(source),
            handler,
        }
    }

    fn resuming(source: Computation<T>, answer: Answer, handler: Rc<Handler<T, S>>) -> Self {
        Handled {
            state: ActiveComputation::Resuming(answer, source),
            handler,
        }
    }

    /// Take the outstanding request if this handler claims it
    ///
    /// Requests of other kinds stay in the task context, so that returning `Pending`
    /// forwards them to the enclosing handler.
    fn claim(&self) -> Option<(usize, Box<dyn Request>)> {
        let cx = task_context()?;
        let kind = cx.pending_kind()?;
        match self.handler.interceptions.position(&kind) {
            Some(index) => {
                trace!("Handled::claim: {}", kind);
                Some((index, cx.take_request()?))
            }
            None => {
                trace!("Handled::claim: forwarding {}", kind);
                None
            }
        }
    }

    /// Hand `request` and the rest of `source` to the interception function at `index`
    fn intercept(
        &self,
        index: usize,
        request: Box<dyn Request>,
        source: Computation<T>,
    ) -> Computation<S> {
        let handler = Rc::clone(&self.handler);
        let kind = request.kind();
        debug!("Handled::intercept: capturing continuation for {}", kind);
        let tail = tail(Box::new(move |answer: Answer| {
            Computation::from_driver(Handled::resuming(source, answer, handler))
        }));
        self.handler.interceptions.dispatch(index, request, tail)
    }
}

impl<T: 'static, S: 'static> Future for Handled<T, S> {
    type Output = Result<S>;

    fn poll(self: Pin<&mut Self>, cx: &mut task::Context<'_>) -> task::Poll<Self::Output> {
        use task::Poll::*;

        let this = self.get_mut();
        loop {
            match mem::replace(&mut this.state, ActiveComputation::Finished) {
                ActiveComputation::Resuming(answer, source) => {
                    match task_context() {
                        Some(task_cx) => task_cx.answer(answer),
                        None => return Ready(Err(Error::NoContext)),
                    }
                    this.state = ActiveComputation::Source(source);
                }
                ActiveComputation::Source(mut source) => match source.poll_unpin(cx) {
                    Ready(Ok(v)) => return Ready((this.handler.on_complete)(v)),
                    Ready(Err(e)) => {
                        debug!("Handled::poll: handling error: {}", e);
                        return Ready((this.handler.on_error)(e));
                    }
                    Pending => match this.claim() {
                        Some((index, request)) => {
                            let comp = this.intercept(index, request, source);
                            this.state = ActiveComputation::Handler(comp);
                        }
                        None => {
                            this.state = ActiveComputation::Source(source);
                            return Pending;
                        }
                    },
                },
                ActiveComputation::Handler(mut comp) => {
                    if let Some(next) = comp.driver_mut::<Handled<T, S>>() {
                        trace!("Handled::poll: continuing as {:?}", next.state);
                        this.state = mem::replace(&mut next.state, ActiveComputation::Finished);
                        this.handler = Rc::clone(&next.handler);
                        continue;
                    }
                    let poll = comp.poll_unpin(cx);
                    if poll.is_pending() {
                        this.state = ActiveComputation::Handler(comp);
                    }
                    return poll;
                }
                ActiveComputation::Finished => return Ready(Err(Error::PolledAfterCompletion)),
            }
        }
    }
}

impl<T: 'static, S: 'static> Driver<S> for Handled<T, S> {
    fn poll_driver(&mut self, cx: &mut task::Context<'_>) -> task::Poll<Result<S>> {
        Pin::new(self).poll(cx)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Attach `handler` to `comp`
///
/// The returned computation runs `comp`. Its result is processed by the completion function of
/// the handler, its error by the error function. Effects claimed by the interception table are
/// passed to the matching interception function together with the continuation of `comp`,
/// and the computation returned by that function takes over. Other effects are forwarded to
/// the enclosing handler and their answers fed back to `comp`.
pub fn match_with<T, S>(comp: Computation<T>, handler: Handler<T, S>) -> Computation<S>
where
    T: 'static,
    S: 'static,
{
    Computation::from_driver(Handled::new(comp, Rc::new(handler)))
}

/// Attach an interception table to `comp`, passing its result and errors through unchanged
pub fn try_with<T: 'static>(comp: Computation<T>, interceptions: Interceptions<T>) -> Computation<T> {
    match_with(comp, Handler::identity(interceptions))
}
