use eff::*;
use pretty_assertions::assert_eq;

use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug)]
struct Greet(String);
impl Effect for Greet {
    type Output = String;
}

#[derive(Debug)]
struct Count;
impl Effect for Count {
    type Output = usize;
}

#[derive(Debug)]
struct Base;
impl Effect for Base {
    type Output = u32;
}

#[derive(Debug)]
struct Scaled(u32);
impl Effect for Scaled {
    type Output = u32;
}

#[test]
fn test_forwarded_effect_keeps_payload() {
    let comp = effectful! {
        let greeting = perform!(Greet("Alice".into()));
        let count = perform!(Count);
        Ok(format!("{} ({})", greeting, count))
    };

    // the inner handler only knows Count
    let inner = comp.try_with(Interceptions::new().on::<Count, _>(|Count, k| k.resume(7)));
    let outer = inner.try_with(
        Interceptions::new().on::<Greet, _>(|Greet(name), k| k.resume(format!("Hello, {}", name))),
    );

    assert_eq!(run(outer).unwrap(), "Hello, Alice (7)");
}

#[test]
fn test_inner_handler_shadows_outer() {
    let comp = effectful! { Ok(perform!(Base)) };
    let inner = comp.try_with(Interceptions::new().on::<Base, _>(|Base, k| k.resume(1)));
    let outer = inner.try_with(Interceptions::new().on::<Base, _>(|Base, k| k.resume(2)));
    assert_eq!(run(outer).unwrap(), 1);
}

#[test]
fn test_interception_performs_outward() {
    let comp = effectful! {
        let a = perform!(Scaled(2));
        let b = perform!(Scaled(5));
        Ok(a + b)
    };

    let scaled = comp.try_with(Interceptions::new().on::<Scaled, _>(|Scaled(n), k| {
        Computation::new(async move {
            let base = perform!(Base);
            k.resume(base * n).await
        })
    }));
    let based = scaled.try_with(Interceptions::new().on::<Base, _>(|Base, k| k.resume(10)));

    assert_eq!(run(based).unwrap(), 70);
}

#[test]
fn test_logging_handler_reperforms() {
    let log = Rc::new(RefCell::new(vec![]));

    let comp = effectful! {
        let a = perform!(Greet("a".into()));
        let b = perform!(Greet("b".into()));
        Ok(vec![a, b])
    };

    let logged = comp.try_with(Interceptions::new().on::<Greet, _>({
        let log = Rc::clone(&log);
        move |Greet(name), k| {
            let log = Rc::clone(&log);
            Computation::new(async move {
                log.borrow_mut().push(format!("before {}", name));
                let answer = perform!(Greet(name.clone()));
                log.borrow_mut().push(format!("after {}", name));
                k.resume(answer).await
            })
        }
    }));
    let answered =
        logged.try_with(Interceptions::new().on::<Greet, _>(|Greet(name), k| k.resume(name.to_uppercase())));

    assert_eq!(run(answered).unwrap(), vec!["A".to_string(), "B".to_string()]);
    assert_eq!(
        *log.borrow(),
        vec!["before a", "after a", "before b", "after b"]
    );
}

#[test]
fn test_completion_of_nested_handlers() {
    let comp = effectful! { Ok(perform!(Count)) };
    let inner = comp.match_with(Handler::new(|n: usize| Ok(n + 1), Err));
    let outer = inner.match_with(
        Handler::new(|n: usize| Ok(n.to_string()), Err).on::<Count, _>(|Count, k| k.resume(41)),
    );
    assert_eq!(run(outer).unwrap(), "42");
}

#[test]
fn test_error_through_handlers() {
    let comp: Computation<u32> = effectful! {
        let n = perform!(Base);
        Err(Error::msg(format!("failed at {}", n)))
    };
    let handled = comp.match_with(
        Handler::new(|n: u32| Ok(n.to_string()), |e| Ok(format!("recovered: {}", e)))
            .on::<Base, _>(|Base, k| k.resume(3)),
    );
    assert_eq!(run(handled).unwrap(), "recovered: failed at 3");
}
