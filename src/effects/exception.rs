//! Exceptions turned into `Result` values
//!
//! [`run`](fn.run.html) abandons the computation at the raising point.
//! [`run_with_cleanup`](fn.run_with_cleanup.html) discontinues it with the raised error first,
//! so error handling scoped around the raise (see
//! [`Computation::recover`](../../struct.Computation.html#method.recover)) still runs.

use crate::{Computation, Effect, Error, Handler, Result};

use std::convert::Infallible;

use log::{debug, warn};

/// Raise an error
#[derive(Debug)]
pub struct Raise(pub Error);

impl Effect for Raise {
    type Output = Infallible;
}

/// Raise `error`; the computation never continues normally after this
pub async fn raise<T>(error: Error) -> Result<T> {
    match crate::perform(Raise(error)).await? {}
}

/// Handle raises in `comp`, returning `Err` with the raised error without resuming
///
/// Errors propagated by `comp` itself are reported as `Err` too.
pub fn run<T: 'static>(comp: Computation<T>) -> Computation<Result<T>> {
    comp.match_with(
        Handler::new(|v| Ok(Ok(v)), |e| Ok(Err(e))).on::<Raise, _>(|Raise(error), _k| {
            debug!("exception: abandoning computation: {}", error);
            crate::pure(Err(error))
        }),
    )
}

/// Handle raises in `comp` by discontinuing it with the raised error, then returning `Err`
/// with that error
///
/// If the discontinued computation fails with an error other than the raised one, the result
/// is [`Error::Cleanup`](../../enum.Error.html#variant.Cleanup) carrying both.
pub fn run_with_cleanup<T: 'static>(comp: Computation<T>) -> Computation<Result<T>> {
    comp.match_with(
        Handler::new(|v| Ok(Ok(v)), |e| Ok(Err(e))).on::<Raise, _>(|Raise(error), k| {
            debug!("exception: discontinuing computation: {}", error);
            Computation::new(async move {
                match k.discontinue(error.clone()).await? {
                    Err(cleanup) if cleanup.to_string() != error.to_string() => {
                        warn!("exception: cleanup after {} failed: {}", error, cleanup);
                        Ok(Err(Error::Cleanup {
                            raised: Box::new(error),
                            cleanup: Box::new(cleanup),
                        }))
                    }
                    _ => Ok(Err(error)),
                }
            })
        }),
    )
}
