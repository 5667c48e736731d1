use proptest::prelude::*;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use vulcano_command::{
    Command, CommandFunction, CommandOptions, OptionSource, Parameter, ShowIf,
};

fn build_function(name: &str, params: &[(String, bool)]) -> CommandFunction {
    let mut doc = String::from("Generated command\n");
    let mut func = CommandFunction::new(name, |_, _| Ok(Value::Null));
    for (param, keyword) in params {
        doc.push_str(&format!(":param {}: about {}\n", param, param));
        func = func.with_parameter(if *keyword {
            Parameter::keyword(param.as_str(), 0)
        } else {
            Parameter::positional(param.as_str())
        });
    }
    func.with_doc(doc)
}

fn unique_params() -> impl Strategy<Value = Vec<(String, bool)>> {
    prop::collection::btree_map("[a-z][a-z0-9_]{0,8}", any::<bool>(), 0..8)
        .prop_map(|params| params.into_iter().collect::<Vec<_>>())
        .prop_shuffle()
}

// Property 1: Argument derivation preserves count and declaration order
proptest! {
    #[test]
    fn prop_args_match_declaration(
        name in "[a-z][a-z0-9_]{0,15}",
        params in unique_params(),
    ) {
        let cmd = Command::new(build_function(&name, &params), CommandOptions::new()).unwrap();

        prop_assert_eq!(cmd.args().len(), params.len());
        for (arg, (param, keyword)) in cmd.args().iter().zip(&params) {
            prop_assert_eq!(&arg.name, param);
            prop_assert_eq!(arg.is_kwarg, *keyword);
            prop_assert_eq!(arg.is_mandatory, !*keyword);
            prop_assert_eq!(&arg.description, &format!("about {}", param));
        }

        let completion = cmd.args_completion().unwrap();
        prop_assert_eq!(completion.len(), params.len());
    }
}

// Property 2: Derivation is idempotent
// Building the same command twice gives the same help and completions
proptest! {
    #[test]
    fn prop_derivation_idempotent(
        name in "[a-z][a-z0-9_]{0,15}",
        params in unique_params(),
        options in prop::collection::vec("[a-z]{1,6}", 0..5),
    ) {
        let build = || {
            let mut cmd_options = CommandOptions::new().with_description("Pinned");
            if let Some((first, _)) = params.first() {
                cmd_options = cmd_options
                    .with_arg_options(first.clone(), OptionSource::from_values(options.clone()));
            }
            Command::new(build_function(&name, &params), cmd_options).unwrap()
        };

        let first = build();
        let second = build();

        prop_assert_eq!(first.help(), second.help());
        prop_assert_eq!(first.help(), first.help());
        prop_assert_eq!(first.command_completer(), second.command_completer());
        prop_assert_eq!(first.args_completion().unwrap(), second.args_completion().unwrap());
    }
}

// Property 3: Help always starts with the name line and ends with a newline
proptest! {
    #[test]
    fn prop_help_shape(
        name in "[a-z][a-z0-9_]{0,15}",
        params in unique_params(),
    ) {
        let cmd = Command::new(build_function(&name, &params), CommandOptions::new()).unwrap();
        let help = cmd.help();
        let header = format!("{}: \tGenerated command", name);

        prop_assert!(help.starts_with(&header));
        prop_assert!(help.ends_with('\n'));
        prop_assert_eq!(help.contains("\n\t Args:"), !params.is_empty());
        prop_assert_eq!(help.matches("\n\t\t").count(), params.len());
    }
}

// Property 4: Visibility follows external state on every check
proptest! {
    #[test]
    fn prop_visibility_tracks_state(states in prop::collection::vec(any::<bool>(), 1..20)) {
        let flag = Arc::new(AtomicBool::new(false));
        let shared = flag.clone();
        let options = CommandOptions::new()
            .with_show_if(ShowIf::when(move || Ok(shared.load(Ordering::SeqCst))));
        let cmd = Command::new(build_function("toggle", &[]), options).unwrap();

        for state in states {
            flag.store(state, Ordering::SeqCst);
            prop_assert_eq!(cmd.visible().unwrap(), state);
        }
    }
}

// Property 5: Static option values complete in order, without descriptions
proptest! {
    #[test]
    fn prop_static_options_complete_in_order(values in prop::collection::vec(any::<i32>(), 0..10)) {
        let params = vec![("n".to_string(), false)];
        let options = CommandOptions::new()
            .with_arg_options("n", OptionSource::from_values(values.iter().map(|v| json!(v))));
        let cmd = Command::new(build_function("pick", &params), options).unwrap();

        let completion = cmd.args_completion().unwrap();
        let labels: Vec<String> = completion[0].iter().map(|c| c.label.clone()).collect();
        let expected: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        prop_assert_eq!(labels, expected);
        prop_assert!(completion[0].iter().all(|c| c.description.is_none()));
    }
}
