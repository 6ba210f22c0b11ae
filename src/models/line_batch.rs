//! Line Batch Model
//!
//! One server-pushed unit of terminal output: zero or more lines followed
//! by a prompt. The bridge sends the lines as a JSON object keyed by
//! sequence number; the order the keys arrive in is the display order.

use crate::error::{Error, Result};
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Lines plus trailing prompt, in display order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBatch {
    /// `(sequence key, raw line text)` in arrival order
    lines: Vec<(String, String)>,
    /// Prompt appended after every line
    prompt: String,
}

impl LineBatch {
    /// Create an empty batch with the given prompt
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            lines: Vec::new(),
            prompt: prompt.into(),
        }
    }

    /// Builder-style line append; the key is the next sequence number
    pub fn with_line(mut self, text: impl Into<String>) -> Self {
        self.push_line(text);
        self
    }

    /// Append a line keyed by its position
    pub fn push_line(&mut self, text: impl Into<String>) {
        let key = self.lines.len().to_string();
        self.lines.push((key, text.into()));
    }

    /// Append a line under an explicit key
    pub fn push_keyed(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.lines.push((key.into(), text.into()));
    }

    /// Decode a pushed payload
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| Error::RenderInputInvalid {
            reason: e.to_string(),
        })
    }

    /// Lines in display order
    pub fn lines(&self) -> impl Iterator<Item = (&str, &str)> {
        self.lines.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[derive(Deserialize)]
struct RawBatch {
    #[serde(default, deserialize_with = "ordered_lines")]
    lines: Vec<(String, String)>,
    prompt: String,
}

impl<'de> Deserialize<'de> for LineBatch {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawBatch::deserialize(deserializer)?;
        Ok(Self {
            lines: raw.lines,
            prompt: raw.prompt,
        })
    }
}

impl Serialize for LineBatch {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut lines = serde_json::Map::new();
        for (key, text) in &self.lines {
            lines.insert(key.clone(), serde_json::Value::String(text.clone()));
        }
        serde_json::json!({ "lines": lines, "prompt": self.prompt }).serialize(serializer)
    }
}

/// Accepts `{key: text}` in arrival order, or a plain array keyed by index
fn ordered_lines<'de, D>(deserializer: D) -> std::result::Result<Vec<(String, String)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct LinesVisitor;

    impl<'de> Visitor<'de> for LinesVisitor {
        type Value = Vec<(String, String)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of sequence keys to line strings, or an array of strings")
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut lines = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, text)) = map.next_entry::<String, String>()? {
                lines.push((key, text));
            }
            Ok(lines)
        }

        fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut lines = Vec::with_capacity(seq.size_hint().unwrap_or(0));
            while let Some(text) = seq.next_element::<String>()? {
                lines.push((lines.len().to_string(), text));
            }
            Ok(lines)
        }

        fn visit_unit<E>(self) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(LinesVisitor)
}
