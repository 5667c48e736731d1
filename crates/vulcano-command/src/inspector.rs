//! Signature and source collaborators
//!
//! A [`Command`](crate::Command) never looks inside a function by itself. It asks a
//! [`SignatureInspector`] for the name, descriptions and arguments, and a
//! [`SourceRetriever`] for the source text. The defaults work from the metadata
//! carried by [`CommandFunction`]:
//!
//! - [`DocstringInspector`] reads reST-style documentation (`:param name: text`,
//!   `:type name: kind`)
//! - [`EmbeddedSource`] returns the source attached with
//!   [`CommandFunction::with_source`]

use crate::error::{CommandError, Result};
use crate::types::{ArgumentInfo, CommandFunction};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;
use tracing::trace;

/// Metadata extracted from a command function
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FuncInspection {
    pub name: String,
    pub short_description: String,
    pub long_description: String,
    pub arguments: Vec<ArgumentInfo>,
}

/// Extracts structured metadata from a command function
pub trait SignatureInspector: Send + Sync {
    /// Inspect a function, failing if it cannot be described
    fn inspect(&self, func: &CommandFunction) -> Result<FuncInspection>;
}

/// Retrieves the source text of a command function
pub trait SourceRetriever: Send + Sync {
    /// Get the source text, failing if it is not available
    fn source(&self, func: &CommandFunction) -> Result<String>;
}

/// Default inspector: declared parameters plus reST documentation
#[derive(Debug, Clone, Copy, Default)]
pub struct DocstringInspector;

/// Default source retriever: the source attached to the function
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedSource;

#[derive(Debug, Default)]
struct ParsedDoc {
    short_description: String,
    long_description: String,
    descriptions: HashMap<String, String>,
    kinds: HashMap<String, String>,
}

impl SignatureInspector for DocstringInspector {
    fn inspect(&self, func: &CommandFunction) -> Result<FuncInspection> {
        if func.name.trim().is_empty() {
            return Err(CommandError::Inspection(
                "Function name cannot be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for param in &func.parameters {
            if !seen.insert(param.name.as_str()) {
                return Err(CommandError::Inspection(format!(
                    "Duplicate parameter '{}' in function '{}'",
                    param.name, func.name
                )));
            }
        }

        let doc = func.doc.as_deref().map(parse_doc).unwrap_or_default();

        let arguments = func
            .parameters
            .iter()
            .map(|param| ArgumentInfo {
                name: param.name.clone(),
                kind: param
                    .kind
                    .clone()
                    .or_else(|| doc.kinds.get(&param.name).cloned()),
                is_mandatory: !param.keyword,
                is_kwarg: param.keyword,
                default: param.default.clone(),
                description: doc
                    .descriptions
                    .get(&param.name)
                    .cloned()
                    .unwrap_or_default(),
            })
            .collect();

        trace!(function = %func.name, "Inspected command function");

        Ok(FuncInspection {
            name: func.name.clone(),
            short_description: doc.short_description,
            long_description: doc.long_description,
            arguments,
        })
    }
}

impl SourceRetriever for EmbeddedSource {
    fn source(&self, func: &CommandFunction) -> Result<String> {
        func.source
            .clone()
            .ok_or_else(|| CommandError::SourceUnavailable(func.name.clone()))
    }
}

fn param_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        // :param name: text  or  :param kind name: text
        Regex::new(r"^:param\s+(?:(?P<kind>[^:\s]+)\s+)?(?P<name>\w+)\s*:\s*(?P<desc>.*)$")
            .expect("Invalid regex")
    })
}

fn type_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^:type\s+(?P<name>\w+)\s*:\s*(?P<kind>.*)$").expect("Invalid regex")
    })
}

/// Which field a continuation line belongs to
enum Field {
    Description(String),
    Kind(String),
    Other,
}

fn parse_doc(doc: &str) -> ParsedDoc {
    let mut parsed = ParsedDoc::default();
    let mut paragraphs: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut field: Option<Field> = None;

    for line in doc.lines().map(str::trim) {
        if line.starts_with(':') {
            field = Some(parse_field(line, &mut parsed));
            continue;
        }

        match &field {
            // Free text ends at the first field line
            None => {
                if line.is_empty() {
                    if !current.is_empty() {
                        paragraphs.push(std::mem::take(&mut current));
                    }
                } else {
                    current.push(line);
                }
            }
            Some(_) if line.is_empty() => {}
            Some(Field::Description(name)) => append(&mut parsed.descriptions, name, line),
            Some(Field::Kind(name)) => append(&mut parsed.kinds, name, line),
            Some(Field::Other) => {}
        }
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }

    let mut paragraphs = paragraphs.into_iter().map(|p| p.join(" "));
    parsed.short_description = paragraphs.next().unwrap_or_default();
    parsed.long_description = paragraphs.collect::<Vec<_>>().join("\n");
    parsed
}

fn parse_field(line: &str, parsed: &mut ParsedDoc) -> Field {
    if let Some(caps) = param_regex().captures(line) {
        let name = caps["name"].to_string();
        if let Some(kind) = caps.name("kind") {
            parsed.kinds.insert(name.clone(), kind.as_str().to_string());
        }
        parsed
            .descriptions
            .insert(name.clone(), caps["desc"].trim().to_string());
        return Field::Description(name);
    }

    if let Some(caps) = type_regex().captures(line) {
        let name = caps["name"].to_string();
        parsed
            .kinds
            .insert(name.clone(), caps["kind"].trim().to_string());
        return Field::Kind(name);
    }

    Field::Other
}

fn append(map: &mut HashMap<String, String>, key: &str, line: &str) {
    let entry = map.entry(key.to_string()).or_default();
    if !entry.is_empty() {
        entry.push(' ');
    }
    entry.push_str(line);
}
