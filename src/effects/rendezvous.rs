//! Synchronous message exchange between two computations
//!
//! Both parties call [`exchange`](fn.exchange.html) with their message and receive the
//! message of the other party. [`run_both`](fn.run_both.html) drives them in lock step.

use crate::{Computation, Continuation, Effect, Error, Handler, Perform};

use std::fmt;

use log::debug;

/// Send a message and receive the message of the other party
#[derive(Debug)]
pub struct Exchange<M>(pub M);

impl<M: 'static> Effect for Exchange<M> {
    type Output = M;
}

pub fn exchange<M: 'static>(msg: M) -> Perform<Exchange<M>> {
    crate::perform(Exchange(msg))
}

enum Status<M> {
    Done,
    Exchanging(M, Continuation<M, Status<M>>),
}

impl<M> fmt::Debug for Status<M> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Status::Done => f.write_str("Done"),
            Status::Exchanging(..) => f.write_str("Exchanging"),
        }
    }
}

/// Run `task` until it finishes or offers a message
fn step<M: 'static>(task: Computation<()>) -> Computation<Status<M>> {
    task.match_with(
        Handler::new(|()| Ok(Status::Done), Err).on::<Exchange<M>, _>(|Exchange(msg), k| {
            crate::pure(Status::Exchanging(msg, k))
        }),
    )
}

/// Run two parties exchanging messages of type `M` and return the number of exchanges
///
/// Both parties must finish in the same round, otherwise the result is
/// [`Error::ImproperSynchronization`](../../enum.Error.html#variant.ImproperSynchronization).
pub fn run_both<M: 'static>(first: Computation<()>, second: Computation<()>) -> Computation<usize> {
    Computation::new(async move {
        let mut steps = (step::<M>(first), step::<M>(second));
        let mut round = 0;
        loop {
            let first = steps.0.await?;
            let second = steps.1.await?;
            match (first, second) {
                (Status::Done, Status::Done) => return Ok(round),
                (Status::Exchanging(m1, k1), Status::Exchanging(m2, k2)) => {
                    round += 1;
                    debug!("rendezvous: round {}", round);
                    steps = (k1.resume(m2), k2.resume(m1));
                }
                (first, second) => {
                    debug!("rendezvous: {:?} meets {:?}", first, second);
                    return Err(Error::ImproperSynchronization { round: round + 1 });
                }
            }
        }
    })
}
