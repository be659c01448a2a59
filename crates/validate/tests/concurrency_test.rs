//! One validator definition shared by many threads.

use nebula_validate::prelude::*;
use serde_json::json;
use std::sync::Arc;
use std::thread;

#[derive(Debug)]
struct Ticket {
    seat: u32,
    holder: String,
}

impl Record for Ticket {
    fn rules() -> RuleSet<Self> {
        RuleSet::new()
            .chain("seat", "required|between:1,500")
            .chain("holder", "required|length:2,32")
    }

    fn scenes() -> Scenes {
        Scenes::new().scene("transfer", ["holder"])
    }

    fn fields() -> FieldTable<Self> {
        bind_fields!(Self; "seat" => seat, "holder" => holder)
    }
}

#[test]
fn sessions_do_not_leak_between_threads() {
    let validator = Arc::new(Validator::<Ticket>::new(Arc::new(
        RuleRegistry::with_builtins(),
    )));

    let handles: Vec<_> = (0..8u32)
        .map(|worker| {
            let validator = Arc::clone(&validator);
            thread::spawn(move || {
                let mut failures = 0;
                for round in 0..200u32 {
                    // Every third ticket has an invalid seat.
                    let seat = if round % 3 == 0 { 900 } else { worker * 10 + 1 };
                    let mut ticket = validator
                        .bind(Ticket {
                            seat,
                            holder: format!("worker-{worker}"),
                        })
                        .unwrap();

                    assert!(ticket.check_scene("transfer").is_ok());

                    match ticket.check() {
                        Ok(()) => assert_ne!(seat, 900),
                        Err(err) => {
                            assert_eq!(seat, 900);
                            assert_eq!(err.as_violation().map(|v| v.code.as_ref()), Some("between"));
                            failures += 1;
                        }
                    }
                }
                failures
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 67);
    }
}

#[test]
fn scoped_threads_share_a_borrowed_validator() {
    let validator = Validator::<Ticket>::new(Arc::new(RuleRegistry::with_builtins()));

    thread::scope(|scope| {
        for holder in ["a", "bo", "cy"] {
            let validator = &validator;
            scope.spawn(move || {
                let mut ticket = validator
                    .bind(Ticket {
                        seat: 10,
                        holder: holder.into(),
                    })
                    .unwrap();
                ticket.set_data("seat", json!(11)).unwrap();

                let result = ticket.check();
                assert_eq!(result.is_ok(), holder.len() >= 2);
                assert_eq!(ticket.record().seat, 11);
            });
        }
    });
}
