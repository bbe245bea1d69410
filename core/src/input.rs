use std::collections::HashMap;

use crate::error::{Result, TaskError};

/// Metadata keys understood by `add`/`edit`; prefixes are expanded by [`expand_key`].
pub const TASK_KEYS: &[&str] = &["due", "priority"];

#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub name: String,
    pub metadata: HashMap<String, String>,
}

pub fn parse_args(args: &[String]) -> ParsedInput {
    let mut name_parts = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() {
                metadata.insert(key.to_string(), value.to_string());
                continue;
            }
        }
        name_parts.push(arg.as_str());
    }

    ParsedInput {
        name: name_parts.join(" "),
        metadata,
    }
}

pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    // 1. Exact match
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    // 2. Prefix match
    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(TaskError::InvalidInput(format!("Unknown key: '{}'", key))),
        _ => Err(TaskError::InvalidInput(format!(
            "Ambiguous key: '{}' matches {:?}",
            key, matches
        ))),
    }
}

/// Accepts `h`/`m`/`l` shorthands or a number in `[0, 1]`.
pub fn parse_priority(input: &str) -> Result<f32> {
    match input.trim().to_lowercase().as_str() {
        "h" | "high" => Ok(1.0),
        "m" | "medium" | "med" => Ok(0.5),
        "l" | "low" => Ok(0.0),
        other => {
            let value: f32 = other
                .parse()
                .map_err(|_| TaskError::InvalidInput(format!("Invalid priority: '{}'", input)))?;
            if value.is_finite() && (0.0..=1.0).contains(&value) {
                Ok(value)
            } else {
                Err(TaskError::InvalidInput(format!(
                    "Priority must be between 0 and 1, got {}",
                    input
                )))
            }
        }
    }
}
