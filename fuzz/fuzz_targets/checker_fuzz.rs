//! Fuzz test for the checkers
//!
//! Runs arbitrary UTF-8 through parse, validate and the policy listener.
//! A check must never panic, must give the same verdict twice, and any
//! context it reports must point into the source.
//!
//! Run with: cargo +nightly fuzz run checker_fuzz -- -max_total_time=60

#![no_main]

use libfuzzer_sys::fuzz_target;
use scriptguard_checker::{Checker, SingleExpressionChecker, StatementListChecker};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let checkers: [Box<dyn Checker>; 2] = [
            Box::new(SingleExpressionChecker::new()),
            Box::new(StatementListChecker::new()),
        ];

        for checker in &checkers {
            let first = checker.validate_source(Some(input));
            let second = checker.validate_source(Some(input));
            assert_eq!(first, second, "Verdict should be deterministic");

            if let Err(error) = first {
                assert!(!error.to_string().is_empty(), "Error message should not be empty");
                if let Some(context) = error.context() {
                    assert!(context.positions.0 <= context.positions.1);
                    assert!(context.positions.1 <= input.len());
                    assert!(context.lines.0 >= 1, "Error line should be >= 1");
                }
            }
        }
    }
});
