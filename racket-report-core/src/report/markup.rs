//! The constrained rich-text format of the backend: lines of plain text with
//! `**bold**` spans, `#` headings and `-`/`*` bullets.

use crate::text::split_into_words;

const BOLD_MARKER: &str = "**";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Plain,
    Bold,
}

/// A maximal span of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledRun {
    pub text: String,
    pub kind: RunKind,
}

impl StyledRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: RunKind::Plain,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: RunKind::Bold,
        }
    }

    pub fn is_bold(&self) -> bool {
        self.kind == RunKind::Bold
    }

    /// Word and whitespace pieces; whitespace stays as its own chunk.
    pub fn chunks(&self) -> Vec<&str> {
        split_into_words(&self.text)
    }
}

/// Splits `source` into plain and bold runs.
///
/// Empty spans are dropped and neighbouring runs of the same kind are merged.
/// An unterminated marker is discarded and its tail stays plain.
pub fn tokenize(source: &str) -> Vec<StyledRun> {
    let mut runs = Vec::new();
    let mut rest = source;
    let mut kind = RunKind::Plain;

    while let Some(at) = rest.find(BOLD_MARKER) {
        push_run(&mut runs, &rest[..at], kind);
        rest = &rest[at + BOLD_MARKER.len()..];
        kind = match kind {
            RunKind::Plain => RunKind::Bold,
            RunKind::Bold => RunKind::Plain,
        };
    }
    push_run(&mut runs, rest, RunKind::Plain);

    runs
}

fn push_run(runs: &mut Vec<StyledRun>, text: &str, kind: RunKind) {
    if text.is_empty() {
        return;
    }
    match runs.last_mut() {
        Some(last) if last.kind == kind => last.text.push_str(text),
        _ => runs.push(StyledRun {
            text: text.to_string(),
            kind,
        }),
    }
}

/// Removes every bold marker.
pub fn strip_markers(text: &str) -> String {
    text.replace(BOLD_MARKER, "")
}

/// Concatenated run text.
pub fn plain_text(runs: &[StyledRun]) -> String {
    runs.iter().map(|run| run.text.as_str()).collect()
}

/// A line-level unit of a rich-text body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: usize, text: String },
    Bullet(Vec<StyledRun>),
    Paragraph(Vec<StyledRun>),
}

/// Splits a multi-line body into headings, bullets and paragraphs.
///
/// Pipe-table rows and horizontal rules are dropped; tabular data has its own
/// renderer.
pub fn parse_blocks(source: &str) -> Vec<Block> {
    source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            if line.starts_with('|') || (line.len() >= 3 && line.chars().all(|c| c == '-')) {
                return None;
            }
            if line.starts_with('#') {
                let level = line.chars().take_while(|c| *c == '#').count();
                let text = strip_markers(line[level..].trim());
                return (!text.is_empty()).then_some(Block::Heading { level, text });
            }
            if let Some(item) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
                return Some(Block::Bullet(tokenize(item.trim_start())));
            }
            Some(Block::Paragraph(tokenize(line)))
        })
        .collect()
}

/// True when `source` yields at least one block, i.e. something would be drawn.
pub fn has_blocks(source: &str) -> bool {
    !parse_blocks(source).is_empty()
}
