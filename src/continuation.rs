use super::context::Answer;
use super::{Computation, Error, Kind};

use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use log::{debug, warn};

pub(crate) type Resume<S> = Box<dyn FnOnce(Answer) -> Computation<S>>;

/// The shared one-shot slot holding the rest of a suspended computation
pub(crate) type Tail<S> = Rc<Cell<Option<Resume<S>>>>;

pub(crate) fn tail<S>(resume: Resume<S>) -> Tail<S> {
    Rc::new(Cell::new(Some(resume)))
}

/// The rest of a computation suspended at an effect, expecting a `T` value
/// and eventually returning an `S` value under the handler that captured it
///
/// A continuation can be resumed only once. Clones refer to the same suspended computation,
/// so resuming a clone of an already resumed continuation fails with
/// [`Error::AlreadyResumed`](enum.Error.html#variant.AlreadyResumed).
pub struct Continuation<T, S> {
    tail: Tail<S>,
    kind: Kind,
    phantom: PhantomData<fn(T)>,
}

impl<T, S> Clone for Continuation<T, S> {
    fn clone(&self) -> Self {
        Continuation {
            tail: Rc::clone(&self.tail),
            kind: self.kind,
            phantom: PhantomData,
        }
    }
}

impl<T, S> fmt::Debug for Continuation<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Continuation")
            .field("kind", &self.kind)
            .field("resumed", &self.is_resumed())
            .finish()
    }
}

impl<T: 'static, S: 'static> Continuation<T, S> {
    pub(crate) fn new(tail: Tail<S>, kind: Kind) -> Self {
        Continuation {
            tail,
            kind,
            phantom: PhantomData,
        }
    }

    /// Resume the suspended computation, making the effect return `value`
    pub fn resume(self, value: T) -> Computation<S> {
        self.feed(Ok(Box::new(value)))
    }

    /// Resume the suspended computation, making the effect fail with `error`
    ///
    /// Error recovery around the performed effect inside the suspended computation still runs.
    pub fn discontinue(self, error: Error) -> Computation<S> {
        self.feed(Err(error))
    }

    /// The kind of the effect this continuation is waiting on
    pub fn kind(&self) -> Kind {
        self.kind
    }

    fn feed(self, answer: Answer) -> Computation<S> {
        match self.tail.take() {
            Some(resume) => {
                debug!("Continuation: resuming {}", self.kind);
                resume(answer)
            }
            None => {
                warn!("Continuation: {} resumed twice", self.kind);
                Computation::fail(Error::AlreadyResumed(self.kind))
            }
        }
    }
}

impl<T, S> Continuation<T, S> {
    /// Returns true if this continuation (or a clone of it) has been resumed
    pub fn is_resumed(&self) -> bool {
        let resume = self.tail.take();
        let resumed = resume.is_none();
        self.tail.set(resume);
        resumed
    }
}
