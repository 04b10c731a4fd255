//! Input contract of the comparison backend.

use crate::error::{ReportError, Result};
use crate::report::markup::{has_blocks, strip_markers};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Key of the row label in every [`FeatureRow`].
pub const FEATURE_KEY: &str = "feature";

/// Rendered for null, empty and missing cells alike.
pub const NO_VALUE: &str = "-";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,
    #[serde(alias = "nombre")]
    pub name: String,
    #[serde(alias = "marca", default)]
    pub brand: String,
    #[serde(alias = "imagen", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSection {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl TechnicalSection {
    /// Blank title and a body with no renderable block.
    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty() && !has_blocks(&self.content)
    }
}

/// One line of the comparison table: column key to display value, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRow {
    cells: Vec<(String, String)>,
}

impl FeatureRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`, replacing an earlier value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(k, _)| *k == key) {
            Some(cell) => cell.1 = value,
            None => self.cells.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Display text for `key`; absent and blank cells become [`NO_VALUE`].
    pub fn cell(&self, key: &str) -> &str {
        match self.get(key).map(str::trim) {
            Some(value) if !value.is_empty() => value,
            _ => NO_VALUE,
        }
    }

    /// The row label.
    pub fn feature(&self) -> &str {
        self.cell(FEATURE_KEY)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(k, _)| k.as_str())
    }

    /// Keys other than the label, in row order.
    pub fn value_keys(&self) -> impl Iterator<Item = &str> {
        self.keys().filter(|k| *k != FEATURE_KEY)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FeatureRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = FeatureRow::new();
        for (key, value) in iter {
            row.insert(key, value);
        }
        row
    }
}

impl Serialize for FeatureRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (key, value) in &self.cells {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FeatureRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(FeatureRowVisitor)
    }
}

struct FeatureRowVisitor;

impl<'de> Visitor<'de> for FeatureRowVisitor {
    type Value = FeatureRow;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an object of column key to display value")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<FeatureRow, A::Error> {
        let mut row = FeatureRow::new();
        while let Some((key, value)) = access.next_entry::<String, serde_json::Value>()? {
            row.insert(key, display_value(value));
        }
        Ok(row)
    }
}

fn display_value(value: serde_json::Value) -> String {
    use serde_json::Value;

    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Bool(true) => "Yes".to_string(),
        Value::Bool(false) => "No".to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .into_iter()
            .map(display_value)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        other @ Value::Object(_) => other.to_string(),
    }
}

/// A complete comparison as produced by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonDocument {
    #[serde(alias = "rackets")]
    pub items: Vec<Product>,
    #[serde(default)]
    pub executive_summary: String,
    #[serde(default)]
    pub comparison_table: Vec<FeatureRow>,
    #[serde(default)]
    pub technical_analysis: Vec<TechnicalSection>,
    #[serde(default)]
    pub recommended_profiles: Option<String>,
    #[serde(default)]
    pub biomechanical_considerations: Option<String>,
    #[serde(default)]
    pub conclusion: Option<String>,
}

impl ComparisonDocument {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks the preconditions rendering relies on.
    pub fn validate(&self) -> Result<()> {
        let count = self.items.len();
        if !(2..=3).contains(&count) {
            return Err(ReportError::InvalidDocument(format!(
                "need 2 or 3 items, got {count}"
            )));
        }
        if let Some(product) = self.items.iter().find(|p| p.name.trim().is_empty()) {
            return Err(ReportError::InvalidDocument(format!(
                "item {} has no name",
                product.id
            )));
        }
        Ok(())
    }

    /// Data columns of the table, taken from the first row.
    pub fn table_columns(&self) -> Vec<&str> {
        self.comparison_table
            .first()
            .map(|row| row.value_keys().collect())
            .unwrap_or_default()
    }

    /// Names of the sections that will be rendered, in document order.
    pub fn present_sections(&self) -> Vec<&'static str> {
        let has_text = |text: &Option<String>| text.as_deref().is_some_and(has_blocks);

        let mut sections = vec!["cover"];
        if has_blocks(&self.executive_summary) {
            sections.push("executive summary");
        }
        if !self.comparison_table.is_empty() {
            sections.push("comparison table");
        }
        if self.technical_analysis.iter().any(|s| !s.is_empty()) {
            sections.push("technical analysis");
        }
        if has_text(&self.recommended_profiles) {
            sections.push("recommended profiles");
        }
        if has_text(&self.biomechanical_considerations) {
            sections.push("biomechanical considerations");
        }
        if has_text(&self.conclusion) {
            sections.push("conclusion");
        }
        sections
    }

    /// Builds a document from the older free-text comparison format.
    ///
    /// The first pipe table becomes the comparison table, the numbered
    /// "2." section that used to carry that table is dropped and the rest of
    /// the text becomes the executive summary.
    pub fn from_legacy_markdown(items: Vec<Product>, markdown: &str) -> Self {
        let comparison_table = extract_table(markdown);
        let executive_summary = strip_table_section(markdown);

        Self {
            items,
            executive_summary,
            comparison_table,
            ..Self::default()
        }
    }
}

fn is_table_line(line: &str) -> bool {
    line.starts_with('|')
}

fn is_rule(line: &str) -> bool {
    line.len() >= 3 && line.chars().all(|c| c == '-')
}

fn split_cells(line: &str) -> Vec<String> {
    line.split('|')
        .map(|cell| strip_markers(cell).trim().to_string())
        .filter(|cell| !cell.is_empty())
        .collect()
}

fn extract_table(markdown: &str) -> Vec<FeatureRow> {
    let mut header: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for line in markdown.lines().map(str::trim) {
        if !is_table_line(line) {
            if header.is_some() {
                break;
            }
            continue;
        }
        if line.contains("---") {
            continue;
        }

        let cells = split_cells(line);
        let Some(keys) = &header else {
            header = Some(cells);
            continue;
        };
        rows.push(
            keys.iter()
                .enumerate()
                .map(|(i, key)| {
                    let key = if i == 0 { FEATURE_KEY } else { key.as_str() };
                    (key.to_string(), cells.get(i).cloned().unwrap_or_default())
                })
                .collect(),
        );
    }

    rows
}

fn strip_table_section(markdown: &str) -> String {
    let mut kept = Vec::new();
    let mut in_section_two = false;

    for line in markdown.lines().map(str::trim) {
        if line.starts_with('#') {
            let title = line.trim_start_matches('#').trim_start();
            in_section_two = title.starts_with("2.");
        }
        if in_section_two || line.is_empty() || is_table_line(line) || is_rule(line) {
            continue;
        }
        kept.push(line);
    }

    kept.join("\n")
}
