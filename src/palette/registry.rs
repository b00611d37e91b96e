//! Color assignment: fixed colors first, then a cycling categorical palette.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Matplotlib's `tab10` categorical palette
pub const TAB10: [&str; 10] = [
    "#1F77B4", "#FF7F0E", "#2CA02C", "#D62728", "#9467BD",
    "#8C564B", "#E377C2", "#7F7F7F", "#BCBD22", "#17BECF",
];

/// Color for a group the registry has never seen
pub const FALLBACK_COLOR: &str = "#BBBBBB";

/// Group name -> `#RRGGBB`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorRegistry {
    colors: BTreeMap<String, String>,
}

impl ColorRegistry {
    /// Assign a color to every key
    ///
    /// **Public** - call once per session with the union of all panel keys
    ///
    /// # Arguments
    /// * `keys` - Every group name that may be drawn
    /// * `fixed` - Lowercase group name -> color; matched case-insensitively
    ///
    /// Keys without a fixed color are sorted and take `TAB10` entries in turn,
    /// wrapping around after ten.
    pub fn build<I, S>(keys: I, fixed: &BTreeMap<String, String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys: BTreeSet<String> = keys.into_iter().map(|k| k.as_ref().to_string()).collect();
        let mut colors = BTreeMap::new();

        for key in &keys {
            if let Some(color) = fixed.get(&key.to_lowercase()) {
                colors.insert(key.clone(), color.clone());
            }
        }

        let remaining: Vec<&String> = keys.iter().filter(|k| !colors.contains_key(*k)).collect();
        for (idx, key) in remaining.into_iter().enumerate() {
            colors.insert(key.clone(), TAB10[idx % TAB10.len()].to_string());
        }

        debug!("Assigned colors to {} groups", colors.len());

        Self { colors }
    }

    /// Color of `key`, or `FALLBACK_COLOR`
    pub fn get(&self, key: &str) -> &str {
        self.colors
            .get(key)
            .map(String::as_str)
            .unwrap_or(FALLBACK_COLOR)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// `#RRGGBB`
pub fn is_hex_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}
