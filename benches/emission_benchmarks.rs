//! Criterion benchmarks for observe

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use observe::prelude::*;
use observe::{Destination, Formatter, Record};
use serde_json::json;
use std::sync::Arc;

/// Formats and discards every line
struct Discard;

impl Destination for Discard {
    fn write(&mut self, _record: &Record, line: &str) -> observe::Result<()> {
        black_box(line);
        Ok(())
    }

    fn flush(&mut self) -> observe::Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "discard"
    }
}

fn observer() -> Observer {
    let observer = Observer::new();
    observer.update_global_config(&json!({ "GLOBAL_LOGGER_CAPTURE_WARNINGS": false }));
    observer.create_global(Some(vec![Sink::new(Discard)]), Some(vec![Sink::new(Discard)]), None);
    observer
}

// ============================================================================
// Emission Benchmarks
// ============================================================================

fn bench_emission(c: &mut Criterion) {
    let mut group = c.benchmark_group("emission");
    group.throughput(Throughput::Elements(1));

    let observer = observer();
    let log = observer.create_global_log(vec![]);
    let nested = observer.create_log("api.v1.users", None);
    let filtered = observer.create_log("quiet", Some(Level::ERROR));

    group.bench_function("global_info", |b| {
        b.iter(|| log.info(black_box("Info message")));
    });

    group.bench_function("nested_info", |b| {
        b.iter(|| nested.info(black_box("Info message")));
    });

    group.bench_function("below_threshold", |b| {
        b.iter(|| filtered.debug(black_box("Dropped message")));
    });

    group.finish();
}

fn bench_spans(c: &mut Criterion) {
    let mut group = c.benchmark_group("spans");
    group.throughput(Throughput::Elements(1));

    let observer = observer();
    let job = observer.create_trace("job", None);

    group.bench_function("trace", |b| {
        b.iter(|| job.trace(black_box("step")));
    });

    group.bench_function("span_and_trace", |b| {
        b.iter(|| job.span(black_box("step")).trace("entered"));
    });

    group.finish();
}

fn bench_concurrent_emission(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_emission");
    let observer = Arc::new(observer());

    group.bench_function("multi_thread_4", |b| {
        b.iter(|| {
            let handles: Vec<_> = (0..4)
                .map(|t| {
                    let observer = Arc::clone(&observer);
                    std::thread::spawn(move || {
                        let log = observer.create_log(&format!("worker{}", t), None);
                        for _ in 0..100 {
                            log.info(black_box("Concurrent message"));
                        }
                    })
                })
                .collect();

            for handle in handles {
                handle.join().unwrap();
            }
        });
    });

    group.finish();
}

// ============================================================================
// Formatting Benchmarks
// ============================================================================

fn bench_formatting(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatting");
    group.throughput(Throughput::Elements(1));

    let record = Record::new(Level::INFO, "global.api", "Formatted message");
    let styles = [
        ("brace", Format::CUSTOM_TRACING, Style::Brace),
        (
            "percent",
            "%(asctime)s :: %(levelname)s :: %(name)s :: %(message)s",
            Style::Percent,
        ),
        ("dollar", "$asctime :: $levelname :: $name :: $message", Style::Dollar),
    ];
    for (label, template, style) in styles {
        let formatter = Formatter::new(template, style, Some(DateFormat::RFC_2822));
        group.bench_function(label, |b| {
            b.iter(|| black_box(formatter.format(black_box(&record))));
        });
    }

    group.bench_function("record_new", |b| {
        b.iter(|| Record::new(black_box(Level::INFO), "global", black_box("a\tb\nc")));
    });

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(
    benches,
    bench_emission,
    bench_spans,
    bench_concurrent_emission,
    bench_formatting
);

criterion_main!(benches);
