//! Nondeterministic booleans

use crate::{Computation, Effect, Error, Interceptions, Perform, Result};

use rand::distributions::{Bernoulli, Distribution};

use log::warn;

/// Ask for a boolean
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flip;

impl Effect for Flip {
    type Output = bool;
}

pub fn flip() -> Perform<Flip> {
    crate::perform(Flip)
}

/// How flips are answered
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Policy {
    /// A fair coin
    Random,
    AlwaysTrue,
    AlwaysFalse,
    /// `true` with the given probability, which must lie in `[0, 1]`
    Probability(f64),
}

impl Policy {
    /// A policy answering `true` with probability `p`
    ///
    /// Fails if `p` is not a probability.
    pub fn probability(p: f64) -> Result<Self> {
        Bernoulli::new(p).map_err(Error::custom)?;
        Ok(Policy::Probability(p))
    }

    fn decide(self) -> Result<bool> {
        let p = match self {
            Policy::AlwaysTrue => return Ok(true),
            Policy::AlwaysFalse => return Ok(false),
            Policy::Random => 0.5,
            Policy::Probability(p) => p,
        };
        let coin = Bernoulli::new(p).map_err(Error::custom)?;
        Ok(coin.sample(&mut rand::thread_rng()))
    }
}

/// Answer every flip in `comp` according to `policy`
///
/// A `Probability` outside `[0, 1]` makes every flip fail with the error of the distribution.
pub fn run<T: 'static>(policy: Policy, comp: Computation<T>) -> Computation<T> {
    comp.try_with(
        Interceptions::new().on::<Flip, _>(move |Flip, k| match policy.decide() {
            Ok(answer) => k.resume(answer),
            Err(e) => {
                warn!("flip: {:?}: {}", policy, e);
                k.discontinue(e)
            }
        }),
    )
}
