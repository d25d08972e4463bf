//! Category-based modpack config parser
//!
//! The modpack file is a small INI-like format:
//!
//! ```text
//! # comment
//! [mods]
//! jei
//! projecte
//!
//! [metadata]
//! game_version: 1.12.2
//! ```
//!
//! Parsing never stops at the first defect. Every structural problem in the
//! document is collected and reported together once the scan is finished.

use indexmap::IndexMap;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

/// Lines starting with this character are ignored
pub const COMMENT_MARKER: char = '#';

/// Category name to ordered list of entries, in order of first appearance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedConfig {
    categories: IndexMap<String, Vec<String>>,
}

impl ParsedConfig {
    /// Entries of a category, or `None` if its header never appeared
    pub fn get(&self, category: &str) -> Option<&[String]> {
        self.categories.get(category).map(Vec::as_slice)
    }

    /// Entries of a category, empty if its header never appeared
    pub fn entries(&self, category: &str) -> &[String] {
        self.get(category).unwrap_or(&[])
    }

    pub fn contains(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    /// Category names in order of first appearance
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// A single structural defect found while scanning a config document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigProblem {
    /// A header named a category outside the permitted set
    UnknownCategory { category: String, line: usize },
    /// A header with nothing between the brackets
    EmptyCategoryName { line: usize },
    /// An entry appeared before any category header
    OrphanLine { content: String, line: usize },
    /// A required category never appeared
    MissingCategory { category: String },
}

impl fmt::Display for ConfigProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigProblem::UnknownCategory { category, line } => {
                write!(f, "line {}: category \"{}\" is not a permitted category", line, category)
            }
            ConfigProblem::EmptyCategoryName { line } => {
                write!(f, "line {}: category header has an empty name", line)
            }
            ConfigProblem::OrphanLine { content, line } => write!(
                f,
                "line {}: \"{}\" does not belong to any category (add a [category] header above it)",
                line, content
            ),
            ConfigProblem::MissingCategory { category } => {
                write!(f, "required category \"{}\" is missing", category)
            }
        }
    }
}

/// Every problem found in a config document
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("config has {} problem(s):\n{}", .problems.len(), render_problems(.problems))]
pub struct ConfigError {
    pub problems: Vec<ConfigProblem>,
}

impl ConfigError {
    /// Names of required categories that never appeared
    pub fn missing_categories(&self) -> Vec<&str> {
        self.problems
            .iter()
            .filter_map(|problem| match problem {
                ConfigProblem::MissingCategory { category } => Some(category.as_str()),
                _ => None,
            })
            .collect()
    }
}

fn render_problems(problems: &[ConfigProblem]) -> String {
    problems
        .iter()
        .map(|problem| format!("  - {}", problem))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Scanner state: either no header seen yet, or entries go to `name`
#[derive(Debug, Clone, PartialEq, Eq)]
enum ScanState {
    NoCategoryOpen,
    CategoryOpen(String),
}

/// Parser for the category-based config format
#[derive(Debug, Clone, Default)]
pub struct ConfigParser {
    required: Vec<String>,
    permitted: HashSet<String>,
}

impl ConfigParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Categories that must appear at least once
    pub fn require<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for category in categories {
            let category = category.into();
            if !self.required.contains(&category) {
                self.required.push(category);
            }
        }
        self
    }

    /// Restrict headers to these categories. An empty set permits anything.
    pub fn permit<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permitted.extend(categories.into_iter().map(Into::into));
        self
    }

    /// Scan the whole document and report every problem at once
    pub fn parse(&self, text: &str) -> Result<ParsedConfig, ConfigError> {
        let mut categories: IndexMap<String, Vec<String>> = IndexMap::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut problems = Vec::new();
        let mut state = ScanState::NoCategoryOpen;

        for (index, raw_line) in text.lines().enumerate() {
            let line_number = index + 1;
            let line = raw_line.trim();

            if line.is_empty() || line.starts_with(COMMENT_MARKER) {
                continue;
            }

            if let Some(name) = header_name(line) {
                if name.is_empty() {
                    problems.push(ConfigProblem::EmptyCategoryName { line: line_number });
                    state = ScanState::NoCategoryOpen;
                    continue;
                }

                if !self.permitted.is_empty() && !self.permitted.contains(name) {
                    problems.push(ConfigProblem::UnknownCategory {
                        category: name.to_string(),
                        line: line_number,
                    });
                }

                if categories.insert(name.to_string(), Vec::new()).is_some() {
                    warn!(
                        "Category [{}] reopened on line {}, earlier entries are discarded",
                        name, line_number
                    );
                }
                seen.insert(name.to_string());
                debug!("Opened category [{}] on line {}", name, line_number);
                state = ScanState::CategoryOpen(name.to_string());
                continue;
            }

            match &state {
                ScanState::NoCategoryOpen => problems.push(ConfigProblem::OrphanLine {
                    content: line.to_string(),
                    line: line_number,
                }),
                ScanState::CategoryOpen(name) => {
                    if let Some(entries) = categories.get_mut(name) {
                        entries.push(line.to_string());
                    }
                }
            }
        }

        problems.extend(
            self.required
                .iter()
                .filter(|category| !seen.contains(*category))
                .map(|category| ConfigProblem::MissingCategory {
                    category: category.clone(),
                }),
        );

        if problems.is_empty() {
            Ok(ParsedConfig { categories })
        } else {
            Err(ConfigError { problems })
        }
    }
}

/// `[name]` -> `Some("name")`. The name is taken verbatim, so `[ mods ]` is not `[mods]`.
fn header_name(line: &str) -> Option<&str> {
    line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']'))
}

/// Parse with the given required and permitted categories
pub fn parse(
    text: &str,
    required: &[&str],
    permitted: &[&str],
) -> Result<ParsedConfig, ConfigError> {
    ConfigParser::new()
        .require(required.iter().copied())
        .permit(permitted.iter().copied())
        .parse(text)
}
