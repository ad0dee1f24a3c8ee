//! All the effect libraries composed around one computation

use eff::effects::defer::{self, defer};
use eff::effects::exception::{self, raise};
use eff::effects::flip::{self, flip, Policy};
use eff::effects::reader::Reader;
use eff::effects::state::State;
use eff::*;
use pretty_assertions::assert_eq;

use std::cell::RefCell;
use std::rc::Rc;

struct Zoo {
    limit: Reader<u32>,
    greeting: State<String>,
    counter: State<u32>,
    log: Rc<RefCell<Vec<String>>>,
}

impl Zoo {
    fn new() -> Self {
        Zoo {
            limit: Reader::new(),
            greeting: State::new(),
            counter: State::new(),
            log: Rc::new(RefCell::new(vec![])),
        }
    }

    fn main(&self) -> Computation<String> {
        let (limit, greeting, counter) = (self.limit, self.greeting, self.counter);
        let log = Rc::clone(&self.log);
        effectful! {
            let cleanup = Rc::clone(&log);
            defer(move || cleanup.borrow_mut().push("cleanup".into())).await?;

            let limit = limit.ask().await?;
            while counter.get().await? < limit {
                if flip().await? {
                    greeting.modify(|s| s + "!").await?;
                }
                counter.modify(|n| n + 1).await?;
            }
            if counter.get().await? > 10 {
                return raise(Error::msg("too many")).await;
            }

            let result = format!("{} {}", greeting.get().await?, counter.get().await?);
            log.borrow_mut().push(result.clone());
            Ok(result)
        }
    }

    fn run(&self, policy: Policy, limit: u32) -> Result<Result<String>> {
        let comp = self.counter.run(0, self.main());
        let comp = self.greeting.run("Hello".into(), comp);
        let comp = self.limit.run(limit, comp);
        let comp = flip::run(policy, comp);
        let comp = exception::run(comp);
        run(defer::run(comp))
    }
}

#[test]
fn test_zoo_always_true() {
    let _ = env_logger::builder().is_test(true).try_init();

    let zoo = Zoo::new();
    assert_eq!(zoo.run(Policy::AlwaysTrue, 3).unwrap().unwrap(), "Hello!!! 3");
    assert_eq!(*zoo.log.borrow(), vec!["Hello!!! 3", "cleanup"]);
}

#[test]
fn test_zoo_always_false() {
    let zoo = Zoo::new();
    assert_eq!(zoo.run(Policy::AlwaysFalse, 5).unwrap().unwrap(), "Hello 5");
}

#[test]
fn test_zoo_raises() {
    let zoo = Zoo::new();
    let result = zoo.run(Policy::AlwaysFalse, 11).unwrap();
    assert_eq!(result.unwrap_err().to_string(), "too many");
    assert_eq!(*zoo.log.borrow(), vec!["cleanup"]);
}
