use cucumber_expressions::Expression;
use regex::Regex;

use super::StepId;
use crate::error::StepRegistryError;

/// A phrase bound to a step id, compiled once at registration
#[derive(Debug, Clone)]
pub struct StepDefinition {
    pub id: StepId,
    pub phrase: &'static str,
    pattern: Regex,
}

/// A feature step matched to its definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStep {
    pub id: StepId,
    pub phrase: &'static str,
    /// Parameter values in order of appearance, `{string}` quotes removed
    pub args: Vec<String>,
}

/// Phrase -> step id table
///
/// Phrases are Cucumber expressions. Resolution ignores the Given/When/Then
/// keyword, so a phrase may only be registered once across all keywords.
#[derive(Debug, Default)]
pub struct StepRegistry {
    definitions: Vec<StepDefinition>,
}

impl StepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, phrase: &'static str, id: StepId) -> Result<(), StepRegistryError> {
        if self.definitions.iter().any(|d| d.phrase == phrase) {
            return Err(StepRegistryError::DuplicatePhrase(phrase.to_string()));
        }

        let pattern = Expression::regex(phrase).map_err(|e| StepRegistryError::InvalidPattern {
            phrase: phrase.to_string(),
            message: e.to_string(),
        })?;

        self.definitions.push(StepDefinition { id, phrase, pattern });
        Ok(())
    }

    /// Match step text against every definition; exactly one must match
    pub fn resolve(&self, text: &str) -> Result<ResolvedStep, StepRegistryError> {
        let text = text.trim();
        let mut matches = self.definitions.iter().filter_map(|def| {
            def.pattern.captures(text).map(|caps| ResolvedStep {
                id: def.id,
                phrase: def.phrase,
                args: parameter_values(&caps),
            })
        });

        let first = matches
            .next()
            .ok_or_else(|| StepRegistryError::Undefined(text.to_string()))?;

        let rest: Vec<ResolvedStep> = matches.collect();
        if rest.is_empty() {
            return Ok(first);
        }

        let candidates = std::iter::once(&first)
            .chain(rest.iter())
            .map(|r| r.phrase.to_string())
            .collect();
        Err(StepRegistryError::Ambiguous {
            text: text.to_string(),
            candidates,
        })
    }

    pub fn definitions(&self) -> &[StepDefinition] {
        &self.definitions
    }
}

/// One value per parameter
///
/// Parameter regexes may carry groups of their own; those sit inside the
/// parameter's group and are skipped.
fn parameter_values(caps: &regex::Captures<'_>) -> Vec<String> {
    let mut values = Vec::new();
    let mut outer: Option<(usize, usize)> = None;
    for m in caps.iter().skip(1).flatten() {
        if let Some((start, end)) = outer {
            if m.start() >= start && m.end() <= end {
                continue;
            }
        }
        outer = Some((m.start(), m.end()));
        values.push(unquote(m.as_str()).to_string());
    }
    values
}

fn unquote(value: &str) -> &str {
    ['"', '\'']
        .iter()
        .find_map(|&quote| value.strip_prefix(quote)?.strip_suffix(quote))
        .unwrap_or(value)
}
