//! Fuzz test for the JavaScript parser front end
//!
//! Feeds arbitrary UTF-8 to both parse goals looking for panics, stack
//! overflows and error spans that fall outside the source.
//!
//! Run with: cargo +nightly fuzz run parser_fuzz -- -max_total_time=60

#![no_main]

use libfuzzer_sys::fuzz_target;
use scriptguard_syntax::{parse_program, parse_single_expression, ParseError};

fn check_error(input: &str, error: &ParseError) {
    let span = error.span;
    assert!(span.start <= span.end, "Span start should be <= end");
    assert!(span.end <= input.len(), "Span should stay inside the source");
    assert!(span.line >= 1 && span.line <= span.end_line, "Lines should be 1-based and ordered");
    assert!(input.is_char_boundary(span.start) && input.is_char_boundary(span.end));
    assert!(!error.to_string().is_empty());
}

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Err(error) = parse_program(input) {
            check_error(input, &error);
        }
        if let Err(error) = parse_single_expression(input) {
            check_error(input, &error);
        }
    }
});
