use criterion::{criterion_group, criterion_main, Criterion};
use scriptguard_core::{matches, SanitizerListener, SanitizerOptions};
use scriptguard_syntax::{parse_program, walk_program};
use std::hint::black_box;

const PROGRAM: &str = r#"
const limits = { min: 1, max: 10 };
function clamp(value) {
  if (value < limits.min) return limits.min;
  if (value > limits.max) return limits.max;
  return Math.round(value);
}
function main(items) {
  let total = 0;
  for (const item of items) {
    total += clamp(item);
  }
  return JSON.stringify({ total, at: new Date().toISOString() });
}
"#;

fn bench_matcher(c: &mut Criterion) {
    let options = SanitizerOptions::default_options();

    c.bench_function("matcher/mixed_names", |b| {
        b.iter(|| {
            for name in ["JSON", "eval", "main", "total", "constructor", "Math"] {
                black_box(matches(&options, black_box(name)));
            }
        });
    });
}

fn bench_listener(c: &mut Criterion) {
    let options = SanitizerOptions::default_options();
    let program = parse_program(PROGRAM).expect("parse program");

    c.bench_function("listener/walk_program", |b| {
        b.iter(|| {
            let mut listener = SanitizerListener::new(&options);
            walk_program(&mut listener, black_box(&program)).expect("program is allowed");
        });
    });
}

criterion_group!(benches, bench_matcher, bench_listener);
criterion_main!(benches);
