use crate::types::{render_value, ArgumentInfo, OptionSource};
use serde_json::Value;
use std::collections::HashMap;

/// Render the help text of a command
///
/// Layout:
/// ```text
/// <name>: \t<short description>
/// <long description>
/// \t Args:
/// \t\t*<arg>(<kind>)(default: <default>): <options or description>
/// ```
/// Dynamic option sources are never invoked here; they show as `from_function`.
pub fn render_help(
    name: &str,
    short_description: &str,
    long_description: &str,
    args: &[ArgumentInfo],
    args_opts: &HashMap<String, OptionSource>,
) -> String {
    let mut help = format!("{}: \t{}", name, short_description);

    if !long_description.is_empty() {
        help.push('\n');
        help.push_str(long_description);
    }

    if !args.is_empty() {
        help.push_str("\n\t Args:");
        for arg in args {
            help.push_str(&render_argument(arg, args_opts.get(&arg.name)));
        }
    }

    help.push('\n');
    help
}

fn render_argument(arg: &ArgumentInfo, source: Option<&OptionSource>) -> String {
    let mut line = String::from("\n\t\t");

    if arg.is_mandatory {
        line.push('*');
    }
    line.push_str(&arg.name);

    if let Some(kind) = &arg.kind {
        line.push_str(&format!("({})", kind));
    }

    if arg.is_kwarg {
        if let Some(default) = arg.default.as_ref().filter(|d| !d.is_null()) {
            line.push_str(&format!("(default: {})", render_value(default)));
        }
    }

    let detail = match source {
        Some(OptionSource::Dynamic(_)) => "from_function".to_string(),
        Some(OptionSource::Static(values)) => render_value(&Value::Array(values.clone())),
        None => arg.description.clone(),
    };
    line.push_str(": ");
    line.push_str(&detail);

    line
}
