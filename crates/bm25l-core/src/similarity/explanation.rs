//! Score explanation trees.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A node in a score breakdown: a value, what it means, and what it was
/// computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    value: f32,
    description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    details: Vec<Explanation>,
}

impl Explanation {
    /// Create a leaf explanation.
    pub fn new(value: f32, description: impl Into<String>) -> Self {
        Self {
            value,
            description: description.into(),
            details: Vec::new(),
        }
    }

    /// Create an explanation with its contributing details.
    pub fn with_details(
        value: f32,
        description: impl Into<String>,
        details: Vec<Explanation>,
    ) -> Self {
        Self {
            value,
            description: description.into(),
            details,
        }
    }

    /// The computed value.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Human-readable description of the value.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Sub-explanations this value was computed from.
    pub fn details(&self) -> &[Explanation] {
        &self.details
    }

    /// Append a sub-explanation.
    pub fn add_detail(&mut self, detail: Explanation) {
        self.details.push(detail);
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        writeln!(f, "{:indent$}{} = {}", "", self.value, self.description, indent = depth * 2)?;
        for detail in &self.details {
            detail.write_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

/// Renders the tree with two spaces of indentation per level.
impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}
