use crate::error::{CommandError, Result};
use crate::types::{render_value, ArgumentInfo, CompletionCandidate, OptionSource};
use std::collections::HashMap;

/// Candidates for completing the command name itself
pub fn command_candidates(name: &str, short_description: &str) -> Vec<CompletionCandidate> {
    vec![CompletionCandidate::described(name, short_description)]
}

/// Candidates for every argument, in argument order
///
/// Arguments with an option source list its values without descriptions;
/// the others get a single hint built from their name and description.
pub fn argument_candidates(
    args: &[ArgumentInfo],
    args_opts: &HashMap<String, OptionSource>,
) -> Result<Vec<Vec<CompletionCandidate>>> {
    args.iter()
        .map(|arg| match args_opts.get(&arg.name) {
            Some(options) => {
                let values = options
                    .resolve()
                    .map_err(|source| CommandError::OptionResolution {
                        argument: arg.name.clone(),
                        source,
                    })?;
                Ok(values
                    .iter()
                    .map(|value| CompletionCandidate::option(render_value(value)))
                    .collect())
            }
            None => Ok(vec![CompletionCandidate::described(
                &arg.name,
                &arg.description,
            )]),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn arg(name: &str, description: &str) -> ArgumentInfo {
        ArgumentInfo {
            name: name.to_string(),
            kind: None,
            is_mandatory: true,
            is_kwarg: false,
            default: None,
            description: description.to_string(),
        }
    }

    #[test]
    fn test_command_candidates() {
        assert_eq!(
            command_candidates("greet", ""),
            vec![CompletionCandidate::described("greet", "")]
        );
    }

    #[test]
    fn test_values_are_stringified() {
        let mut opts = HashMap::new();
        opts.insert("n".to_string(), OptionSource::from_values([json!(1), json!("two")]));
        let result = argument_candidates(&[arg("n", "number")], &opts).unwrap();
        assert_eq!(
            result,
            vec![vec![
                CompletionCandidate::option("1"),
                CompletionCandidate::option("two")
            ]]
        );
    }

    #[test]
    fn test_boolean_labels() {
        let mut opts = HashMap::new();
        opts.insert("glossy".to_string(), OptionSource::from_values([true, false]));
        let result = argument_candidates(&[arg("glossy", "finish")], &opts).unwrap();
        assert_eq!(
            result,
            vec![vec![
                CompletionCandidate::option("True"),
                CompletionCandidate::option("False")
            ]]
        );
    }

    #[test]
    fn test_empty_option_list_gives_empty_slot() {
        let mut opts = HashMap::new();
        opts.insert("n".to_string(), OptionSource::Static(vec![]));
        let result = argument_candidates(&[arg("n", "number")], &opts).unwrap();
        assert_eq!(result, vec![Vec::<CompletionCandidate>::new()]);
    }

    #[test]
    fn test_producer_error_names_argument() {
        let mut opts = HashMap::new();
        opts.insert(
            "host".to_string(),
            OptionSource::from_fn(|| Err(anyhow::anyhow!("inventory offline"))),
        );
        let err = argument_candidates(&[arg("host", "")], &opts).unwrap_err();
        match err {
            CommandError::OptionResolution { argument, source } => {
                assert_eq!(argument, "host");
                assert_eq!(source.to_string(), "inventory offline");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
