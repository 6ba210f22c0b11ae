//! Compact URI expansion
//!
//! `event:instream` with `event` registered as `http://sage/event#` expands
//! to `http://sage/event#instream`. Anything already carrying a scheme
//! separator is taken as a full URI.

use crate::error::{Error, Result};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct PrefixMap {
    prefixes: HashMap<String, String>,
}

impl PrefixMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace an alias
    pub fn insert(&mut self, alias: &str, uri: &str) {
        self.prefixes.insert(alias.to_string(), uri.to_string());
    }

    /// Expand a compact URI, or return a full URI unchanged
    pub fn resolve(&self, curie_or_uri: &str) -> Result<String> {
        if curie_or_uri.contains("://") {
            return Ok(curie_or_uri.to_string());
        }

        let (alias, rest) = curie_or_uri
            .split_once(':')
            .ok_or_else(|| Error::UnknownPrefix {
                prefix: curie_or_uri.to_string(),
            })?;

        self.prefixes
            .get(alias)
            .map(|uri| format!("{}{}", uri, rest))
            .ok_or_else(|| Error::UnknownPrefix {
                prefix: alias.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}
