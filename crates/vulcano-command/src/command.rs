use crate::completion::{argument_candidates, command_candidates};
use crate::error::{CommandError, Result};
use crate::help::render_help;
use crate::inspector::{DocstringInspector, EmbeddedSource, SignatureInspector, SourceRetriever};
use crate::types::{ArgumentInfo, CommandFunction, CompletionCandidate, OptionSource, ShowIf};
use once_cell::sync::OnceCell;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Caller-supplied overrides used when building a [`Command`]
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Name to register under instead of the function name
    pub name: Option<String>,

    /// Short description to use instead of the documented one
    pub description: Option<String>,

    /// Visibility rule
    pub show_if: ShowIf,

    /// Option sources keyed by argument name
    pub args_opts: HashMap<String, OptionSource>,
}

impl CommandOptions {
    /// Create empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the command name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the short description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the visibility rule
    pub fn with_show_if(mut self, show_if: impl Into<ShowIf>) -> Self {
        self.show_if = show_if.into();
        self
    }

    /// Attach an option source to an argument
    pub fn with_arg_options(mut self, argument: impl Into<String>, source: OptionSource) -> Self {
        self.args_opts.insert(argument.into(), source);
        self
    }
}

/// A function registered as a command, with the metadata a REPL needs
///
/// Name, descriptions and arguments are fixed at construction. Visibility is
/// re-evaluated on every check, while the completion lists are computed on
/// first use and kept for the lifetime of the command.
pub struct Command {
    func: CommandFunction,
    name: String,
    short_description: String,
    long_description: String,
    args: Vec<ArgumentInfo>,
    args_opts: HashMap<String, OptionSource>,
    show_if: ShowIf,
    sources: Arc<dyn SourceRetriever>,
    command_completer: OnceCell<Vec<CompletionCandidate>>,
    args_completion: OnceCell<Vec<Vec<CompletionCandidate>>>,
}

impl Command {
    /// Build a command using the default inspector and source retriever
    pub fn new(func: CommandFunction, options: CommandOptions) -> Result<Self> {
        Self::with_collaborators(
            func,
            options,
            &DocstringInspector,
            Arc::new(EmbeddedSource),
        )
    }

    /// Build a command with a custom inspector and source retriever
    pub fn with_collaborators(
        func: CommandFunction,
        options: CommandOptions,
        inspector: &dyn SignatureInspector,
        sources: Arc<dyn SourceRetriever>,
    ) -> Result<Self> {
        let inspection = inspector.inspect(&func)?;

        let name = options
            .name
            .filter(|name| !name.is_empty())
            .unwrap_or(inspection.name);
        let short_description = options
            .description
            .filter(|description| !description.is_empty())
            .unwrap_or(inspection.short_description);

        for key in options.args_opts.keys() {
            if !inspection.arguments.iter().any(|arg| &arg.name == key) {
                warn!(command = %name, argument = %key, "Option source for unknown argument is ignored");
            }
        }

        debug!(
            command = %name,
            arguments = inspection.arguments.len(),
            "Built command"
        );

        Ok(Self {
            func,
            name,
            short_description,
            long_description: inspection.long_description,
            args: inspection.arguments,
            args_opts: options.args_opts,
            show_if: options.show_if,
            sources,
            command_completer: OnceCell::new(),
            args_completion: OnceCell::new(),
        })
    }

    /// The wrapped function
    pub fn func(&self) -> &CommandFunction {
        &self.func
    }

    /// Command name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One-line description
    pub fn short_description(&self) -> &str {
        &self.short_description
    }

    /// Extended description, empty if none
    pub fn long_description(&self) -> &str {
        &self.long_description
    }

    /// Arguments in declaration order
    pub fn args(&self) -> &[ArgumentInfo] {
        &self.args
    }

    /// Option sources keyed by argument name
    pub fn args_opts(&self) -> &HashMap<String, OptionSource> {
        &self.args_opts
    }

    /// Whether the command should currently be shown
    pub fn visible(&self) -> Result<bool> {
        self.show_if
            .evaluate()
            .map_err(CommandError::VisibilityEvaluation)
    }

    /// Source text of the wrapped function
    pub fn source_code(&self) -> Result<String> {
        self.sources.source(&self.func)
    }

    /// Help text for this command
    pub fn help(&self) -> String {
        render_help(
            &self.name,
            &self.short_description,
            &self.long_description,
            &self.args,
            &self.args_opts,
        )
    }

    /// Candidate used when completing the command name
    pub fn command_completer(&self) -> &[CompletionCandidate] {
        self.command_completer.get_or_init(|| {
            debug!(command = %self.name, "Computing command completer");
            command_candidates(&self.name, &self.short_description)
        })
    }

    /// Candidates for each argument, in argument order
    ///
    /// Dynamic option sources are invoked on the first successful call only.
    pub fn args_completion(&self) -> Result<&[Vec<CompletionCandidate>]> {
        self.args_completion
            .get_or_try_init(|| {
                debug!(command = %self.name, "Computing argument completion");
                argument_candidates(&self.args, &self.args_opts)
            })
            .map(Vec::as_slice)
    }

    /// Execute the wrapped function and return its result as-is
    pub fn run(&self, args: &[Value], kwargs: &Map<String, Value>) -> anyhow::Result<Value> {
        self.func.call(args, kwargs)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("short_description", &self.short_description)
            .field("long_description", &self.long_description)
            .field("args", &self.args)
            .field("args_opts", &self.args_opts)
            .field("show_if", &self.show_if)
            .finish_non_exhaustive()
    }
}
