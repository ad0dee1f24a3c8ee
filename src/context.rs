use super::kind::{Kind, Request};
use super::Error;

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use log::{trace, warn};

thread_local! {
    static TLS_CX: RefCell<Option<Context>> = RefCell::new(None);
}

/// The value a suspended computation is resumed with
pub(crate) type Answer = Result<Box<dyn Any>, Error>;

enum Slot {
    Empty,
    Request(Box<dyn Request>),
    Answer(Answer),
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Slot::Empty => f.write_str("Empty"),
            Slot::Request(request) => write!(f, "Request({})", request.kind()),
            Slot::Answer(Ok(_)) => f.write_str("Answer(Ok(..))"),
            Slot::Answer(Err(e)) => write!(f, "Answer(Err({}))", e),
        }
    }
}

/// The task context shared by `perform` and the drivers of one `run`
///
/// The context holds at most one message: either the request of the computation that has just
/// suspended, or the answer for the computation that is about to be resumed.
#[derive(Clone, Debug)]
pub(crate) struct Context {
    slot: Rc<RefCell<Slot>>,
}

impl Context {
    pub(crate) fn new() -> Self {
        Context {
            slot: Rc::new(RefCell::new(Slot::Empty)),
        }
    }

    /// Publish the request of a suspending computation
    pub(crate) fn suspend(&self, request: Box<dyn Request>) {
        trace!("Context::suspend: {}", request.kind());
        let old = self.slot.replace(Slot::Request(request));
        if !matches!(old, Slot::Empty) {
            warn!("Context::suspend: discarding {:?}", old);
        }
    }

    /// The kind of the outstanding request, if any
    pub(crate) fn pending_kind(&self) -> Option<Kind> {
        match &*self.slot.borrow() {
            Slot::Request(request) => Some(request.kind()),
            _ => None,
        }
    }

    /// Take the outstanding request out of the context
    pub(crate) fn take_request(&self) -> Option<Box<dyn Request>> {
        let mut slot = self.slot.borrow_mut();
        match std::mem::replace(&mut *slot, Slot::Empty) {
            Slot::Request(request) => Some(request),
            other => {
                *slot = other;
                None
            }
        }
    }

    /// Hand an answer to the computation that is resumed next
    pub(crate) fn answer(&self, answer: Answer) {
        let old = self.slot.replace(Slot::Answer(answer));
        if !matches!(old, Slot::Empty) {
            warn!("Context::answer: discarding {:?}", old);
        }
    }

    /// Take the answer for the resumed computation
    pub(crate) fn take_answer(&self) -> Option<Answer> {
        let mut slot = self.slot.borrow_mut();
        match std::mem::replace(&mut *slot, Slot::Empty) {
            Slot::Answer(answer) => Some(answer),
            other => {
                *slot = other;
                None
            }
        }
    }
}

struct SetOnDrop(Option<Context>);

impl Drop for SetOnDrop {
    fn drop(&mut self) {
        TLS_CX.with(|tls_cx| {
            *tls_cx.borrow_mut() = self.0.take();
        })
    }
}

/// Set the thread-local task context while `f` runs
///
/// The previous context is restored afterwards, so runs may nest.
pub(crate) fn set_task_context<F, R>(cx: Context, f: F) -> R
where
    F: FnOnce() -> R,
{
    let old_cx = TLS_CX.with(|tls_cx| tls_cx.replace(Some(cx)));
    let _reset = SetOnDrop(old_cx);
    f()
}

/// Get the thread-local task context, if a computation is being run on this thread
pub(crate) fn task_context() -> Option<Context> {
    TLS_CX.with(|tls_cx| tls_cx.borrow().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Effect;

    struct Ping;
    impl Effect for Ping {
        type Output = u32;
    }

    #[test]
    fn request_then_answer() {
        let cx = Context::new();
        assert!(cx.pending_kind().is_none());

        cx.suspend(Box::new(Ping));
        assert_eq!(cx.pending_kind(), Some(Kind::of::<Ping>()));
        assert!(cx.take_answer().is_none());
        assert!(cx.take_request().is_some());
        assert!(cx.take_request().is_none());

        cx.answer(Ok(Box::new(7_u32)));
        assert!(cx.take_request().is_none());
        let answer = cx.take_answer().unwrap().unwrap();
        assert_eq!(*answer.downcast::<u32>().unwrap(), 7);
    }

    #[test]
    fn nested_contexts_are_restored() {
        assert!(task_context().is_none());

        let outer = Context::new();
        set_task_context(outer.clone(), || {
            let inner = Context::new();
            set_task_context(inner, || {
                task_context().unwrap().suspend(Box::new(Ping));
            });
            assert!(task_context().unwrap().pending_kind().is_none());
        });

        assert!(outer.pending_kind().is_none());
        assert!(task_context().is_none());
    }
}
