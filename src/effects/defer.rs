//! Deferred cleanup
//!
//! Thunks registered with [`defer`](fn.defer.html) run when the computation finishes, whether
//! it returns or fails, the last registered first.

use crate::{Computation, Effect, Handler, Perform};

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use log::trace;

type Thunk = Box<dyn FnOnce()>;

/// Register a thunk
pub struct Defer(Thunk);

impl fmt::Debug for Defer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Defer(..)")
    }
}

impl Effect for Defer {
    type Output = ();
}

pub fn defer<F>(thunk: F) -> Perform<Defer>
where
    F: FnOnce() + 'static,
{
    crate::perform(Defer(Box::new(thunk)))
}

fn run_thunks(thunks: &RefCell<Vec<Thunk>>) {
    loop {
        let thunk = thunks.borrow_mut().pop();
        match thunk {
            Some(thunk) => thunk(),
            None => break,
        }
    }
}

/// Handle the defers of `comp`
pub fn run<T: 'static>(comp: Computation<T>) -> Computation<T> {
    let thunks: Rc<RefCell<Vec<Thunk>>> = Rc::new(RefCell::new(vec![]));

    let handler = Handler::new(
        {
            let thunks = Rc::clone(&thunks);
            move |v| {
                run_thunks(&thunks);
                Ok(v)
            }
        },
        {
            let thunks = Rc::clone(&thunks);
            move |e| {
                run_thunks(&thunks);
                Err(e)
            }
        },
    )
    .on::<Defer, _>(move |Defer(thunk), k| {
        let mut thunks = thunks.borrow_mut();
        thunks.push(thunk);
        trace!("defer: {} thunks", thunks.len());
        k.resume(())
    });

    comp.match_with(handler)
}
