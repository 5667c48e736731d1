//! Vulcano Commands
//!
//! This crate models a single registered command: a function wrapped with the
//! metadata a command line or REPL front end needs. From a [`CommandFunction`]
//! it derives the name, descriptions and arguments, and renders them as help
//! text and completion candidates.
//!
//! # Examples
//!
//! ```
//! use serde_json::{json, Map};
//! use vulcano_command::{Command, CommandFunction, CommandOptions, OptionSource, Parameter};
//!
//! let func = CommandFunction::new("greet", |args, _| {
//!     Ok(json!(format!("Hello {}", args[0].as_str().unwrap_or("stranger"))))
//! })
//! .with_doc("Greets\n\n:param name: who to greet")
//! .with_parameter(Parameter::positional("name"));
//!
//! let options = CommandOptions::new()
//!     .with_arg_options("name", OptionSource::from_values(["Alice", "Bob"]));
//! let cmd = Command::new(func, options)?;
//!
//! assert_eq!(cmd.help(), "greet: \tGreets\n\t Args:\n\t\t*name: ['Alice', 'Bob']\n");
//! assert_eq!(cmd.run(&[json!("Alice")], &Map::new())?, json!("Hello Alice"));
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod command;
pub mod completion;
pub mod config;
pub mod error;
pub mod help;
pub mod inspector;
pub mod types;

pub use command::{Command, CommandOptions};
pub use config::{CommandOverrides, CommandsConfig, ConfigManager};
pub use error::{CommandError, Result};
pub use inspector::{
    DocstringInspector, EmbeddedSource, FuncInspection, SignatureInspector, SourceRetriever,
};
pub use types::{
    render_value, ArgumentInfo, CommandFunction, CompletionCandidate, Handler, OptionProducer,
    OptionSource, Parameter, Predicate, ShowIf,
};
