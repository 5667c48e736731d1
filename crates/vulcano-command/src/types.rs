use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Callable invoked when a command runs: positional values, then keyword values
pub type Handler = Arc<dyn Fn(&[Value], &Map<String, Value>) -> anyhow::Result<Value> + Send + Sync>;

/// Zero-argument producer of candidate values for one argument
pub type OptionProducer = Arc<dyn Fn() -> anyhow::Result<Vec<Value>> + Send + Sync>;

/// Zero-argument predicate deciding whether a command is shown
pub type Predicate = Arc<dyn Fn() -> anyhow::Result<bool> + Send + Sync>;

/// A parameter as declared by a command function
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Parameter {
    /// Parameter name
    pub name: String,

    /// Type annotation, if any
    pub kind: Option<String>,

    /// Default value (keyword parameters only)
    pub default: Option<Value>,

    /// Whether the parameter is passed by keyword
    pub keyword: bool,
}

impl Parameter {
    /// Create a positional parameter
    pub fn positional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            default: None,
            keyword: false,
        }
    }

    /// Create a keyword parameter with a default value
    pub fn keyword(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            default: Some(default.into()),
            keyword: true,
        }
    }

    /// Set the type annotation
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

/// A function that can be registered as a command.
///
/// Carries the declared signature and documentation alongside the handler,
/// since closures cannot be introspected at runtime.
#[derive(Clone)]
pub struct CommandFunction {
    /// Function name
    pub name: String,

    /// Documentation text (reST field lists are understood by the default inspector)
    pub doc: Option<String>,

    /// Declared parameters, in order
    pub parameters: Vec<Parameter>,

    /// Source text of the function, if known
    pub source: Option<String>,

    handler: Handler,
}

impl CommandFunction {
    /// Create a new command function
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&[Value], &Map<String, Value>) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            doc: None,
            parameters: Vec::new(),
            source: None,
            handler: Arc::new(handler),
        }
    }

    /// Set the documentation text
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Add a parameter
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Set the source text
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Invoke the handler
    pub fn call(&self, args: &[Value], kwargs: &Map<String, Value>) -> anyhow::Result<Value> {
        (self.handler)(args, kwargs)
    }
}

impl fmt::Debug for CommandFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandFunction")
            .field("name", &self.name)
            .field("doc", &self.doc)
            .field("parameters", &self.parameters)
            .field("source", &self.source.as_ref().map(|s| s.len()))
            .finish_non_exhaustive()
    }
}

/// Structured description of one argument of a command
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArgumentInfo {
    /// Argument name, unique within the command
    pub name: String,

    /// Type label
    pub kind: Option<String>,

    /// Whether the argument must be supplied
    pub is_mandatory: bool,

    /// Whether the argument is passed by keyword
    pub is_kwarg: bool,

    /// Default value, meaningful only for keyword arguments
    pub default: Option<Value>,

    /// Argument description
    pub description: String,
}

/// A completion entry offered to a REPL
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CompletionCandidate {
    /// Text inserted on completion
    pub label: String,

    /// Meta text shown next to the label
    pub description: Option<String>,
}

impl CompletionCandidate {
    /// Create a candidate with an optional description
    pub fn new(label: impl Into<String>, description: Option<String>) -> Self {
        Self {
            label: label.into(),
            description,
        }
    }

    /// Candidate for an enumerated option value (no description)
    pub fn option(label: impl Into<String>) -> Self {
        Self::new(label, None)
    }

    /// Candidate carrying a description
    pub fn described(label: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(label, Some(description.into()))
    }
}

/// Where the candidate values for an argument come from
#[derive(Clone)]
pub enum OptionSource {
    /// A fixed list of values
    Static(Vec<Value>),

    /// Values produced on demand
    Dynamic(OptionProducer),
}

impl OptionSource {
    /// Build a static source from anything convertible to JSON values
    pub fn from_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::Static(values.into_iter().map(Into::into).collect())
    }

    /// Build a dynamic source from a producer
    pub fn from_fn<F>(producer: F) -> Self
    where
        F: Fn() -> anyhow::Result<Vec<Value>> + Send + Sync + 'static,
    {
        Self::Dynamic(Arc::new(producer))
    }

    /// Whether values are produced on demand
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic(_))
    }

    /// Get the candidate values, invoking the producer for dynamic sources
    pub fn resolve(&self) -> anyhow::Result<Vec<Value>> {
        match self {
            Self::Static(values) => Ok(values.clone()),
            Self::Dynamic(producer) => producer(),
        }
    }
}

impl fmt::Debug for OptionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(values) => f.debug_tuple("Static").field(values).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl From<Vec<Value>> for OptionSource {
    fn from(values: Vec<Value>) -> Self {
        Self::Static(values)
    }
}

/// Visibility rule for a command
#[derive(Clone)]
pub enum ShowIf {
    /// Fixed visibility
    Always(bool),

    /// Visibility decided by a predicate on every check
    When(Predicate),
}

impl ShowIf {
    /// Build a predicate-based rule
    pub fn when<F>(predicate: F) -> Self
    where
        F: Fn() -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        Self::When(Arc::new(predicate))
    }

    /// Evaluate the rule
    pub fn evaluate(&self) -> anyhow::Result<bool> {
        match self {
            Self::Always(visible) => Ok(*visible),
            Self::When(predicate) => predicate(),
        }
    }
}

impl Default for ShowIf {
    fn default() -> Self {
        Self::Always(true)
    }
}

impl From<bool> for ShowIf {
    fn from(visible: bool) -> Self {
        Self::Always(visible)
    }
}

impl fmt::Debug for ShowIf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always(visible) => f.debug_tuple("Always").field(visible).finish(),
            Self::When(_) => f.write_str("When(..)"),
        }
    }
}

/// Convert a JSON value to its display form
///
/// Strings are returned as-is. Booleans and null read `True`, `False` and
/// `None`; lists and maps use bracketed literals with quoted strings, e.g.
/// `['red', 'blue']` or `{'size': 3}`.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => literal(other),
    }
}

fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => quote(s),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Null => "None".to_string(),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(literal).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(key, value)| format!("{}: {}", quote(key), literal(value)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

// Single quotes unless the text holds a single quote and no double quote
fn quote(s: &str) -> String {
    if s.contains('\'') && !s.contains('"') {
        format!("\"{}\"", s.replace('\\', "\\\\"))
    } else {
        format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
    }
}
