//! Property-based tests for line batch rendering
//!
//! Whatever the bridge sends, every line yields exactly one entry in the
//! order it arrived, empty lines become blank markers, and the prompt
//! comes last.

use proptest::prelude::*;
use sage_relay::ansi::{AnsiHtmlConverter, MarkupConverter};
use sage_relay::config::UiConfig;
use sage_relay::models::{EntryKind, LineBatch};
use sage_relay::ui::{BufferedLog, LineRenderer};

fn line_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-zA-Z0-9 .,!]{1,40}",
        "[a-z ]{1,10}".prop_map(|s| format!("\x1b[31m{}\x1b[0m", s)),
    ]
}

proptest! {
    #[test]
    fn test_one_entry_per_line_plus_prompt(
        lines in prop::collection::vec(line_strategy(), 0..30),
        prompt in "[a-zA-Z0-9>: ]{0,20}",
    ) {
        let mut batch = LineBatch::new(prompt);
        for line in &lines {
            batch.push_line(line.clone());
        }

        let mut log = BufferedLog::new();
        let appended = LineRenderer::new(&UiConfig::default()).render(&batch, &mut log);

        prop_assert_eq!(appended, lines.len() + 1);
        prop_assert_eq!(log.len(), lines.len() + 1);
        prop_assert_eq!(log.entries().last().map(|e| e.kind), Some(EntryKind::Prompt));

        for (line, entry) in lines.iter().zip(log.entries()) {
            if line.is_empty() {
                prop_assert_eq!(entry.kind, EntryKind::BlankLine);
                prop_assert_eq!(entry.markup.as_str(), "&nbsp;");
            } else {
                prop_assert_eq!(entry.kind, EntryKind::Line);
                prop_assert!(!entry.markup.is_empty());
            }
        }
    }

    #[test]
    fn test_wire_order_survives_decoding(keys in prop::collection::vec(0u32..10_000, 0..20)) {
        let mut lines = serde_json::Map::new();
        let mut expected = Vec::new();
        for key in keys {
            let key = key.to_string();
            if lines.contains_key(&key) {
                continue;
            }
            lines.insert(key.clone(), serde_json::Value::String(format!("line {}", key)));
            expected.push(key);
        }

        let batch = LineBatch::from_value(serde_json::json!({"lines": lines, "prompt": ""})).unwrap();
        let decoded: Vec<String> = batch.lines().map(|(k, _)| k.to_string()).collect();
        prop_assert_eq!(decoded, expected);
    }

    #[test]
    fn test_converter_never_panics(s in "\\PC*") {
        let mut converter = AnsiHtmlConverter::new();
        let _ = converter.convert(&s);
    }

    #[test]
    fn test_converter_output_has_no_raw_markup(s in "[a-z<>&\"' ]{0,50}") {
        let mut converter = AnsiHtmlConverter::new();
        let html = converter.convert(&s);
        prop_assert!(!html.contains('<'));
        prop_assert!(!html.contains('>'));
    }
}
