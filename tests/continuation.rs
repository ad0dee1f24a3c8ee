use eff::*;
use pretty_assertions::assert_eq;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug)]
struct Ask;
impl Effect for Ask {
    type Output = u32;
}

#[test]
fn test_resume_twice() {
    let _ = env_logger::builder().is_test(true).try_init();

    let after = Rc::new(Cell::new(0));
    let saved: Rc<RefCell<Option<Continuation<u32, u32>>>> = Rc::new(RefCell::new(None));

    let comp = {
        let after = Rc::clone(&after);
        effectful! {
            let n = perform!(Ask);
            after.set(after.get() + 1);
            Ok(n)
        }
    };
    let handled = comp.try_with(Interceptions::new().on::<Ask, _>({
        let saved = Rc::clone(&saved);
        move |Ask, k| {
            *saved.borrow_mut() = Some(k.clone());
            k.resume(1)
        }
    }));

    assert_eq!(run(handled).unwrap(), 1);
    assert_eq!(after.get(), 1);

    let k = saved.borrow_mut().take().unwrap();
    assert!(k.is_resumed());
    match run(k.resume(2)) {
        Err(Error::AlreadyResumed(kind)) => assert_eq!(kind, Kind::of::<Ask>()),
        other => panic!("expected a second resumption to fail, got {:?}", other),
    }
    assert_eq!(after.get(), 1);
}

#[test]
fn test_discontinue_is_observed() {
    let comp = effectful! {
        let n = perform!(Ask);
        Ok(n * 2)
    }
    .recover(|e| pure(e.to_string().len() as u32));

    let handled = comp.try_with(
        Interceptions::new().on::<Ask, _>(|Ask, k| k.discontinue(Error::msg("four"))),
    );
    assert_eq!(run(handled).unwrap(), 4);
}

#[test]
fn test_discontinue_reaches_error_function() {
    let comp = effectful! { Ok(perform!(Ask)) };
    let handled = comp.match_with(
        Handler::new(|n: u32| Ok(format!("ok {}", n)), |e| Ok(format!("error {}", e)))
            .on::<Ask, _>(|Ask, k| k.discontinue(Error::msg("denied"))),
    );
    assert_eq!(run(handled).unwrap(), "error denied");
}

#[test]
fn test_completion_runs_once() {
    let completed = Rc::new(Cell::new(0));
    let failed = Rc::new(Cell::new(0));

    let comp = effectful! {
        let a = perform!(Ask);
        let b = perform!(Ask);
        Ok(a + b)
    };
    let handled = comp.match_with(
        Handler::new(
            {
                let completed = Rc::clone(&completed);
                move |n: u32| {
                    completed.set(completed.get() + 1);
                    Ok(n)
                }
            },
            {
                let failed = Rc::clone(&failed);
                move |e| {
                    failed.set(failed.get() + 1);
                    Err(e)
                }
            },
        )
        .on::<Ask, _>(|Ask, k| k.resume(5)),
    );

    assert_eq!(run(handled).unwrap(), 10);
    assert_eq!(completed.get(), 1);
    assert_eq!(failed.get(), 0);
}

#[test]
fn test_error_runs_once() {
    let completed = Rc::new(Cell::new(0));
    let failed = Rc::new(Cell::new(0));

    let comp: Computation<u32> = effectful! {
        perform!(Ask);
        Err(Error::msg("late failure"))
    };
    let handled = comp.match_with(
        Handler::new(
            {
                let completed = Rc::clone(&completed);
                move |n: u32| {
                    completed.set(completed.get() + 1);
                    Ok(n)
                }
            },
            {
                let failed = Rc::clone(&failed);
                move |e| {
                    failed.set(failed.get() + 1);
                    Err(e)
                }
            },
        )
        .on::<Ask, _>(|Ask, k| k.resume(5)),
    );

    assert_eq!(run(handled).unwrap_err().to_string(), "late failure");
    assert_eq!(completed.get(), 0);
    assert_eq!(failed.get(), 1);
}

#[test]
fn test_code_after_resume() {
    let trace = Rc::new(RefCell::new(vec![]));

    let comp = {
        let trace = Rc::clone(&trace);
        effectful! {
            trace.borrow_mut().push("body before");
            let n = perform!(Ask);
            trace.borrow_mut().push("body after");
            Ok(n)
        }
    };
    let handled = comp.try_with(Interceptions::new().on::<Ask, _>({
        let trace = Rc::clone(&trace);
        move |Ask, k| {
            let trace = Rc::clone(&trace);
            Computation::new(async move {
                trace.borrow_mut().push("handler before");
                let n = k.resume(9).await?;
                trace.borrow_mut().push("handler after");
                Ok(n + 1)
            })
        }
    }));

    assert_eq!(run(handled).unwrap(), 10);
    assert_eq!(
        *trace.borrow(),
        vec!["body before", "handler before", "body after", "handler after"]
    );
}
