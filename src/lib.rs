//! One-shot algebraic effect handlers
//!
//! An effectful computation performs effects: requests that something be done on its behalf,
//! such as reading a state or waiting for a future. Handlers attached around the computation
//! intercept those requests and answer them by resuming the continuation of the computation,
//! or decide not to resume it at all.
//!
//! ```
//! use eff::*;
//!
//! struct Double(u32);
//! impl Effect for Double {
//!     type Output = u32;
//! }
//!
//! let comp = effectful! {
//!     let x = perform!(Double(21));
//!     Ok(x + 1)
//! };
//!
//! let handled = comp.try_with(
//!     Interceptions::new().on::<Double, _>(|Double(n), k| k.resume(n * 2)),
//! );
//! assert_eq!(run(handled).unwrap(), 43);
//! ```
//!
//! Handlers are deep: effects performed after a continuation is resumed are handled by the same
//! handler. Effects a handler does not claim are forwarded to the enclosing one, and `run`
//! reports effects that nobody claimed.

pub mod effects;

mod computation;
mod context;
mod continuation;
mod error;
mod handled;
mod handler;
mod kind;
mod perform;
mod run;

pub use computation::{lazy, pure, Computation};
pub use continuation::Continuation;
pub use eff_attr::eff;
pub use error::{Error, Result};
pub use handled::{match_with, try_with};
pub use handler::{Handler, Interceptions};
pub use kind::{Kind, Label};
pub use perform::{perform, Perform};
pub use run::run;

/// A request for something to be done on behalf of a computation
///
/// `Output` is the type of the value the request is answered with.
pub trait Effect: 'static {
    type Output: 'static;

    /// The label distinguishing this request from requests of the same type
    ///
    /// Unlabeled requests return `None`.
    fn label(&self) -> Option<Label> {
        None
    }
}

/// Perform an effect and return its answer, propagating an injected error with `?`
#[macro_export]
macro_rules! perform {
    ($eff:expr) => {
        $crate::perform($eff).await?
    };
}

/// Create a computation from a block
///
/// The block may use [`perform!`](macro.perform.html) and `?`, and evaluates to a
/// [`Result`](type.Result.html).
#[macro_export]
macro_rules! effectful {
    ($($body:tt)*) => {
        $crate::Computation::new(async move { $($body)* })
    };
}
