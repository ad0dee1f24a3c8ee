//! Mutable state
//!
//! ```
//! use eff::effects::state::State;
//! use eff::*;
//!
//! let counter = State::<u32>::new();
//! let comp = effectful! {
//!     counter.put(41).await?;
//!     counter.modify(|n| n + 1).await?;
//!     counter.get().await
//! };
//! assert_eq!(run(counter.run(0, comp)).unwrap(), 42);
//! ```

use crate::{Computation, Effect, Interceptions, Label, Perform};

use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use log::trace;

/// Read the current state
pub struct Get<S> {
    label: Label,
    phantom: PhantomData<fn() -> S>,
}

impl<S: 'static> Effect for Get<S> {
    type Output = S;

    fn label(&self) -> Option<Label> {
        Some(self.label)
    }
}

/// Replace the current state
pub struct Put<S> {
    label: Label,
    state: S,
}

impl<S: 'static> Effect for Put<S> {
    type Output = ();

    fn label(&self) -> Option<Label> {
        Some(self.label)
    }
}

/// One instance of the state effect
///
/// Each `State` has its own label, so several states of the same type can be handled
/// independently.
pub struct State<S> {
    label: Label,
    phantom: PhantomData<fn() -> S>,
}

impl<S> Clone for State<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for State<S> {}

impl<S> fmt::Debug for State<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("State").field(&self.label).finish()
    }
}

impl<S: Clone + 'static> Default for State<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Clone + 'static> State<S> {
    pub fn new() -> Self {
        State {
            label: Label::fresh(),
            phantom: PhantomData,
        }
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn get(&self) -> Perform<Get<S>> {
        crate::perform(Get {
            label: self.label,
            phantom: PhantomData,
        })
    }

    pub fn put(&self, state: S) -> Perform<Put<S>> {
        crate::perform(Put {
            label: self.label,
            state,
        })
    }

    /// Replace the state with `f` applied to it
    pub fn modify<F>(&self, f: F) -> Computation<()>
    where
        F: FnOnce(S) -> S + 'static,
    {
        let this = *self;
        Computation::new(async move {
            let state = this.get().await?;
            this.put(f(state)).await
        })
    }

    /// Handle the requests of this state in `comp`, starting from `init`
    pub fn run<T: 'static>(&self, init: S, comp: Computation<T>) -> Computation<T> {
        let state = Rc::new(RefCell::new(init));
        let label = self.label;
        comp.try_with(
            Interceptions::new()
                .on_labeled::<Get<S>, _>(label, {
                    let state = Rc::clone(&state);
                    move |_, k| {
                        trace!("State::get {}", label);
                        k.resume(state.borrow().clone())
                    }
                })
                .on_labeled::<Put<S>, _>(label, move |Put { state: new, .. }, k| {
                    trace!("State::put {}", label);
                    *state.borrow_mut() = new;
                    k.resume(())
                }),
        )
    }
}
