//! Read-only environment

use crate::{Computation, Effect, Interceptions, Label, Perform};

use std::fmt;
use std::marker::PhantomData;

/// Ask for the environment
pub struct Ask<E> {
    label: Label,
    phantom: PhantomData<fn() -> E>,
}

impl<E: 'static> Effect for Ask<E> {
    type Output = E;

    fn label(&self) -> Option<Label> {
        Some(self.label)
    }
}

/// One instance of the reader effect
pub struct Reader<E> {
    label: Label,
    phantom: PhantomData<fn() -> E>,
}

impl<E> Clone for Reader<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Reader<E> {}

impl<E> fmt::Debug for Reader<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Reader").field(&self.label).finish()
    }
}

impl<E: Clone + 'static> Default for Reader<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone + 'static> Reader<E> {
    pub fn new() -> Self {
        Reader {
            label: Label::fresh(),
            phantom: PhantomData,
        }
    }

    pub fn ask(&self) -> Perform<Ask<E>> {
        crate::perform(Ask {
            label: self.label,
            phantom: PhantomData,
        })
    }

    /// Answer every `ask` of this reader in `comp` with `env`
    pub fn run<T: 'static>(&self, env: E, comp: Computation<T>) -> Computation<T> {
        comp.try_with(
            Interceptions::new().on_labeled::<Ask<E>, _>(self.label, move |_, k| k.resume(env.clone())),
        )
    }
}
