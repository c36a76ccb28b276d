//! Field naming policy for projected envelopes.
//!
//! Envelope keys are written in camelCase internally (`totalItems`) and
//! converted on output.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::options::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NamingPolicy {
    #[default]
    #[serde(rename = "camelCase")]
    CamelCase,
    #[serde(rename = "snake_case")]
    SnakeCase,
    #[serde(rename = "PascalCase")]
    PascalCase,
    #[serde(rename = "kebab-case")]
    KebabCase,
    /// Keys are written exactly as the envelope defines them.
    #[serde(rename = "as-is")]
    AsIs,
}

impl NamingPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CamelCase => "camelCase",
            Self::SnakeCase => "snake_case",
            Self::PascalCase => "PascalCase",
            Self::KebabCase => "kebab-case",
            Self::AsIs => "as-is",
        }
    }

    pub fn convert(self, key: &str) -> String {
        if self == Self::AsIs {
            return key.to_string();
        }
        let words = split_words(key);
        match self {
            Self::CamelCase => {
                let mut out = String::with_capacity(key.len());
                for (i, word) in words.iter().enumerate() {
                    if i == 0 {
                        out.push_str(word);
                    } else {
                        out.push_str(&capitalize(word));
                    }
                }
                out
            }
            Self::PascalCase => words.iter().map(|w| capitalize(w)).collect(),
            Self::SnakeCase => words.join("_"),
            Self::KebabCase => words.join("-"),
            Self::AsIs => key.to_string(),
        }
    }
}

impl fmt::Display for NamingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NamingPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "camel" | "camelcase" => Ok(Self::CamelCase),
            "snake" | "snakecase" => Ok(Self::SnakeCase),
            "pascal" | "pascalcase" => Ok(Self::PascalCase),
            "kebab" | "kebabcase" => Ok(Self::KebabCase),
            "asis" | "none" | "verbatim" => Ok(Self::AsIs),
            _ => Err(ConfigError::UnknownNaming(s.to_string())),
        }
    }
}

/// Lowercased words of an identifier in any of the supported casings.
fn split_words(key: &str) -> Vec<String> {
    let chars: Vec<char> = key.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if matches!(c, '_' | '-' | ' ') {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            // "totalItems" and the "S" in "HTTPStatus" both start a word
            if prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
