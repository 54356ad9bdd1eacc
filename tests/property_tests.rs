//! Property-based tests for observe using proptest

use observe::prelude::*;
use observe::{Destination, Formatter, Record};
use parking_lot::Mutex;
use proptest::prelude::*;
use serde_json::json;
use std::sync::Arc;

struct Counter(Arc<Mutex<usize>>);

impl Destination for Counter {
    fn write(&mut self, _record: &Record, _line: &str) -> observe::Result<()> {
        *self.0.lock() += 1;
        Ok(())
    }

    fn flush(&mut self) -> observe::Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "counter"
    }
}

fn standard_level() -> impl Strategy<Value = Level> {
    prop_oneof![
        Just(Level::DEBUG),
        Just(Level::INFO),
        Just(Level::TRACE),
        Just(Level::WARN),
        Just(Level::ERROR),
        Just(Level::CRITICAL),
    ]
}

// ============================================================================
// Level Tests
// ============================================================================

proptest! {
    /// Level ordering follows the numeric value
    #[test]
    fn test_level_ordering_is_numeric(a in 0u32..100, b in 0u32..100) {
        let (l1, l2) = (Level::new(a), Level::new(b));
        prop_assert_eq!(l1 < l2, a < b);
        prop_assert_eq!(l1 == l2, a == b);
    }

    /// Named levels parse back from their display names
    #[test]
    fn test_level_name_parses_back(level in standard_level()) {
        observe::register_trace_level();
        let parsed: Level = level.name().parse().unwrap();
        prop_assert_eq!(parsed, level);
    }
}

// ============================================================================
// Emission Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A record reaches a sink iff it passes both the channel threshold and
    /// the sink's own level
    #[test]
    fn test_threshold_and_sink_level(
        threshold in standard_level(),
        sink_level in standard_level(),
        emitted in standard_level(),
    ) {
        let observer = Observer::new();
        observer.update_global_config(&json!({ "GLOBAL_LOGGER_CAPTURE_WARNINGS": false }));
        let count = Arc::new(Mutex::new(0));
        let sink = Sink::new(Counter(Arc::clone(&count))).with_level(sink_level);
        observer.create_global_log(vec![sink]);

        let log = observer.create_log("prop", Some(threshold));
        log.log(emitted, "m");

        let expected = usize::from(emitted >= threshold && emitted >= sink_level);
        prop_assert_eq!(*count.lock(), expected);
    }

    /// Spans extend the dotted name one leaf at a time
    #[test]
    fn test_span_names(leaves in prop::collection::vec("[a-z][a-z0-9_]{0,8}", 1..6)) {
        let observer = Observer::new();
        let mut trace = observer.create_trace("job", None);
        let mut expected = trace.name().to_string();
        for leaf in &leaves {
            trace = trace.span(leaf);
            expected = format!("{}.{}", expected, leaf);
            prop_assert_eq!(trace.name(), expected.as_str());
            prop_assert_eq!(trace.level(), Level::TRACE);
        }
    }
}

// ============================================================================
// Record & Template Tests
// ============================================================================

proptest! {
    /// Any message renders on exactly one line
    #[test]
    fn test_messages_stay_on_one_line(message in ".*") {
        let record = Record::new(Level::INFO, "global", &message);
        let formatter = Formatter::new(Format::CUSTOM, Style::Brace, Some(DateFormat::ISO_8601));
        let line = formatter.format(&record);
        prop_assert!(!line.contains('\n'));
        prop_assert!(!line.contains('\r'));
    }

    /// Text without placeholders passes through every style unchanged
    #[test]
    fn test_literal_templates(text in "[a-zA-Z0-9 :,.-]{0,40}") {
        let record = Record::new(Level::INFO, "global", "m");
        for style in [Style::Brace, Style::Percent, Style::Dollar] {
            let formatter = Formatter::new(&text, style, None);
            prop_assert_eq!(formatter.format(&record), text.clone());
        }
    }
}
