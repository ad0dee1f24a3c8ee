//! Effectful computations
//!
//! This module provides [lazy](fn.lazy.html) and [pure](fn.pure.html) function.
//! `lazy` creates a computation with no effects that just executes the passed function.
//! `pure` converts the given value into a pure computation.

use super::handled::{match_with, try_with};
use super::{run, Error, Handler, Interceptions, Result};

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task;

use futures::future::{self, FutureExt, LocalBoxFuture};

/// A suspendable computation that eventually returns a `T` value or fails,
/// performing effects along the way
///
/// A computation is consumed by driving it; a suspension point is never advanced twice.
/// Computations are usually written as `async` blocks (see [`effectful!`](macro.effectful.html))
/// and handled with [`match_with`](fn.match_with.html), [`try_with`](fn.try_with.html) and
/// [`run`](fn.run.html).
#[must_use = "computations do nothing unless run"]
pub struct Computation<T> {
    inner: Inner<T>,
}

enum Inner<T> {
    Future(LocalBoxFuture<'static, Result<T>>),
    Driver(Box<dyn Driver<T>>),
}

/// A handler driver kept apart from plain futures, so that an enclosing driver of the
/// same type can take its state over instead of polling through it
pub(crate) trait Driver<T> {
    fn poll_driver(&mut self, cx: &mut task::Context<'_>) -> task::Poll<Result<T>>;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T> fmt::Debug for Computation<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Computation").finish_non_exhaustive()
    }
}

impl<T: 'static> Computation<T> {
    /// Create a computation from a future
    ///
    /// Effects are performed inside the future by awaiting [`perform`](fn.perform.html).
    pub fn new<F>(body: F) -> Self
    where
        F: Future<Output = Result<T>> + 'static,
    {
        Computation {
            inner: Inner::Future(body.boxed_local()),
        }
    }

    pub(crate) fn from_driver<D: Driver<T> + 'static>(driver: D) -> Self {
        Computation {
            inner: Inner::Driver(Box::new(driver)),
        }
    }

    /// The driver behind this computation, if it is a `D`
    pub(crate) fn driver_mut<D: 'static>(&mut self) -> Option<&mut D> {
        match &mut self.inner {
            Inner::Driver(driver) => driver.as_any_mut().downcast_mut::<D>(),
            Inner::Future(_) => None,
        }
    }

    /// A computation that fails immediately with `error`
    pub fn fail(error: Error) -> Self {
        Computation::new(future::ready(Err(error)))
    }

    /// Apply `f` to the result
    pub fn map<U, F>(self, f: F) -> Computation<U>
    where
        U: 'static,
        F: FnOnce(T) -> U + 'static,
    {
        Computation::new(async move { self.await.map(f) })
    }

    /// Run `f` on the result, continuing with the computation it returns
    pub fn and_then<U, F>(self, f: F) -> Computation<U>
    where
        U: 'static,
        F: FnOnce(T) -> Computation<U> + 'static,
    {
        Computation::new(async move { f(self.await?).await })
    }

    /// Recover from an error raised inside this computation
    ///
    /// An error injected by discontinuing one of its effects is observed here too.
    pub fn recover<F>(self, f: F) -> Computation<T>
    where
        F: FnOnce(Error) -> Computation<T> + 'static,
    {
        Computation::new(async move {
            match self.await {
                Ok(v) => Ok(v),
                Err(e) => f(e).await,
            }
        })
    }

    /// Attach a handler to this computation
    pub fn match_with<S: 'static>(self, handler: Handler<T, S>) -> Computation<S> {
        match_with(self, handler)
    }

    /// Attach an interception table to this computation
    pub fn try_with(self, interceptions: Interceptions<T>) -> Computation<T> {
        try_with(self, interceptions)
    }

    /// Run this computation to completion
    pub fn run(self) -> Result<T> {
        run(self)
    }
}

impl<T> Future for Computation<T> {
    type Output = Result<T>;

    #[inline]
    fn poll(mut self: Pin<&mut Self>, cx: &mut task::Context<'_>) -> task::Poll<Self::Output> {
        match &mut self.inner {
            Inner::Future(future) => future.as_mut().poll(cx),
            Inner::Driver(driver) => driver.poll_driver(cx),
        }
    }
}

/// Converts a thunk into a one-shot computation with no effects
#[inline]
pub fn lazy<T, F>(f: F) -> Computation<T>
where
    T: 'static,
    F: FnOnce() -> T + 'static,
{
    Computation::new(future::lazy(move |_| Ok(f())))
}

/// Converts a value into a computation that immediately resolves to said value
pub fn pure<T: 'static>(v: T) -> Computation<T> {
    Computation::new(future::ready(Ok(v)))
}
