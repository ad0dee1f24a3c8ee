//! Handlers: what to do on completion, on error, and on each claimed effect

use super::continuation::Tail;
use super::kind::Request;
use super::{Computation, Continuation, Effect, Error, Kind, Label, Result};

use std::any::type_name;
use std::fmt;

type Intercept<S> = Box<dyn Fn(Box<dyn Request>, Tail<S>) -> Computation<S>>;

struct Interception<S> {
    kind: Kind,
    intercept: Intercept<S>,
}

/// An ordered table of effect kinds and the functions handling them
///
/// When a request is matched against the table, the first entry registered for its kind wins.
pub struct Interceptions<S> {
    entries: Vec<Interception<S>>,
}

impl<S> fmt::Debug for Interceptions<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|entry| entry.kind))
            .finish()
    }
}

impl<S: 'static> Default for Interceptions<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: 'static> Interceptions<S> {
    /// An empty table
    pub fn new() -> Self {
        Interceptions { entries: vec![] }
    }

    /// Handle unlabeled effects of type `E` with `f`
    pub fn on<E, F>(self, f: F) -> Self
    where
        E: Effect,
        F: Fn(E, Continuation<E::Output, S>) -> Computation<S> + 'static,
    {
        self.register::<E, F>(Kind::of::<E>(), f)
    }

    /// Handle effects of type `E` carrying `label` with `f`
    pub fn on_labeled<E, F>(self, label: Label, f: F) -> Self
    where
        E: Effect,
        F: Fn(E, Continuation<E::Output, S>) -> Computation<S> + 'static,
    {
        self.register::<E, F>(Kind::labeled::<E>(label), f)
    }

    fn register<E, F>(mut self, kind: Kind, f: F) -> Self
    where
        E: Effect,
        F: Fn(E, Continuation<E::Output, S>) -> Computation<S> + 'static,
    {
        let intercept = move |request: Box<dyn Request>, tail: Tail<S>| {
            match request.into_any().downcast::<E>() {
                Ok(effect) => f(*effect, Continuation::new(tail, kind)),
                // kinds are matched by type id, so this is unreachable in practice
                Err(_) => Computation::fail(Error::AnswerType {
                    expected: type_name::<E>(),
                }),
            }
        };
        self.entries.push(Interception {
            kind,
            intercept: Box::new(intercept),
        });
        self
    }

    /// Returns true if the table has an entry for `kind`
    pub fn claims(&self, kind: &Kind) -> bool {
        self.position(kind).is_some()
    }

    pub(crate) fn position(&self, kind: &Kind) -> Option<usize> {
        self.entries.iter().position(|entry| entry.kind == *kind)
    }

    pub(crate) fn dispatch(
        &self,
        index: usize,
        request: Box<dyn Request>,
        tail: Tail<S>,
    ) -> Computation<S> {
        (self.entries[index].intercept)(request, tail)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A handler turning a computation returning `T` into one returning `S`
pub struct Handler<T, S> {
    pub(crate) on_complete: Box<dyn Fn(T) -> Result<S>>,
    pub(crate) on_error: Box<dyn Fn(Error) -> Result<S>>,
    pub(crate) interceptions: Interceptions<S>,
}

impl<T, S> fmt::Debug for Handler<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Handler")
            .field("interceptions", &self.interceptions)
            .finish_non_exhaustive()
    }
}

impl<T: 'static, S: 'static> Handler<T, S> {
    /// A handler with an empty interception table
    ///
    /// `on_complete` processes the return value of the handled computation.
    /// `on_error` processes an error raised by it; return `Err` to rethrow.
    pub fn new<C, R>(on_complete: C, on_error: R) -> Self
    where
        C: Fn(T) -> Result<S> + 'static,
        R: Fn(Error) -> Result<S> + 'static,
    {
        Handler {
            on_complete: Box::new(on_complete),
            on_error: Box::new(on_error),
            interceptions: Interceptions::new(),
        }
    }

    /// Replace the interception table
    pub fn with_interceptions(mut self, interceptions: Interceptions<S>) -> Self {
        self.interceptions = interceptions;
        self
    }

    /// Handle unlabeled effects of type `Eff` with `f`
    pub fn on<Eff, F>(mut self, f: F) -> Self
    where
        Eff: Effect,
        F: Fn(Eff, Continuation<Eff::Output, S>) -> Computation<S> + 'static,
    {
        self.interceptions = self.interceptions.on::<Eff, F>(f);
        self
    }

    /// Handle effects of type `Eff` carrying `label` with `f`
    pub fn on_labeled<Eff, F>(mut self, label: Label, f: F) -> Self
    where
        Eff: Effect,
        F: Fn(Eff, Continuation<Eff::Output, S>) -> Computation<S> + 'static,
    {
        self.interceptions = self.interceptions.on_labeled::<Eff, F>(label, f);
        self
    }
}

impl<T: 'static> Handler<T, T> {
    /// A handler passing the result and errors through unchanged
    pub fn identity(interceptions: Interceptions<T>) -> Self {
        Handler::new(Ok, Err).with_interceptions(interceptions)
    }
}
