//! Command builder: validates a tool call's arguments against the catalog
//! and renders them into the ordered token vector passed to west.
//!
//! Validation happens entirely before any subprocess is spawned: unknown
//! parameter names, missing required parameters, wrong JSON types, values
//! outside an enum's closed set, and conflicting flag pairs are all rejected
//! here with a descriptive message.

use serde_json::{Map, Value};

use super::catalog::{ParamKind, ParamSpec, ToolSpec};

/// Build the token vector for one tool call.
///
/// The result never includes the executable name; the runner prepends that.
pub fn build_tokens(spec: &ToolSpec, arguments: &Map<String, Value>) -> Result<Vec<String>, String> {
    for key in arguments.keys() {
        if !spec.params.iter().any(|p| p.name == key) {
            return Err(format!("Unknown parameter '{}' for tool '{}'.", key, spec.name));
        }
    }

    check_conflicts(spec, arguments)?;

    if let Some(builder) = spec.builder {
        return builder(spec, arguments);
    }

    render(spec, arguments)
}

/// Generic rendering pass: walk the parameter table in declaration order and
/// emit tokens per each parameter's kind.
fn render(spec: &ToolSpec, arguments: &Map<String, Value>) -> Result<Vec<String>, String> {
    let mut tokens: Vec<String> = spec.subcommand.iter().map(|s| s.to_string()).collect();

    for p in spec.params {
        match p.kind {
            ParamKind::Flag { flag } => {
                if bool_arg(spec, arguments, p)? {
                    tokens.push(flag.to_string());
                }
            }
            ParamKind::Value { flag } => {
                if let Some(value) = str_arg(spec, arguments, p)? {
                    tokens.push(flag.to_string());
                    tokens.push(value);
                }
            }
            ParamKind::Repeated { flag } => {
                for value in list_arg(spec, arguments, p)? {
                    tokens.push(flag.to_string());
                    tokens.push(value);
                }
            }
            ParamKind::Positional => {
                if let Some(value) = str_arg(spec, arguments, p)? {
                    tokens.push(value);
                }
            }
            ParamKind::Trailing => {
                let values = list_arg(spec, arguments, p)?;
                if !values.is_empty() {
                    tokens.push("--".to_string());
                    tokens.extend(values);
                }
            }
            ParamKind::Rest => {
                tokens.extend(list_arg(spec, arguments, p)?);
            }
        }
    }

    Ok(tokens)
}

/// Reject argument sets where both halves of a declared conflict pair are set.
fn check_conflicts(spec: &ToolSpec, arguments: &Map<String, Value>) -> Result<(), String> {
    for p in spec.params {
        let Some(other) = p.conflicts_with else { continue };
        if is_set(arguments, p.name) && is_set(arguments, other) {
            return Err(format!(
                "Parameters '{}' and '{}' of '{}' cannot both be set.",
                p.name, other, spec.name
            ));
        }
    }
    Ok(())
}

/// A parameter counts as set when it is present and not null; a boolean
/// additionally has to be `true`.
fn is_set(arguments: &Map<String, Value>, name: &str) -> bool {
    match arguments.get(name) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(_) => true,
    }
}

fn missing(spec: &ToolSpec, p: &ParamSpec) -> String {
    format!("Missing required parameter '{}' for tool '{}'.", p.name, spec.name)
}

fn bool_arg(spec: &ToolSpec, arguments: &Map<String, Value>, p: &ParamSpec) -> Result<bool, String> {
    match arguments.get(p.name) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(format!(
            "Parameter '{}' of '{}' must be a boolean.",
            p.name, spec.name
        )),
    }
}

fn str_arg(
    spec: &ToolSpec,
    arguments: &Map<String, Value>,
    p: &ParamSpec,
) -> Result<Option<String>, String> {
    let value = match arguments.get(p.name) {
        None | Some(Value::Null) => {
            if p.required {
                return Err(missing(spec, p));
            }
            return Ok(None);
        }
        Some(Value::String(s)) => s.clone(),
        Some(_) => {
            return Err(format!(
                "Parameter '{}' of '{}' must be a string.",
                p.name, spec.name
            ))
        }
    };

    if let Some(allowed) = p.allowed {
        if !allowed.contains(&value.as_str()) {
            return Err(format!(
                "Invalid value '{}' for parameter '{}'. Must be one of: {}.",
                value,
                p.name,
                allowed.join(", ")
            ));
        }
    }

    Ok(Some(value))
}

fn list_arg(
    spec: &ToolSpec,
    arguments: &Map<String, Value>,
    p: &ParamSpec,
) -> Result<Vec<String>, String> {
    let items = match arguments.get(p.name) {
        None | Some(Value::Null) => {
            if p.required {
                return Err(missing(spec, p));
            }
            return Ok(Vec::new());
        }
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(format!(
                "Parameter '{}' of '{}' must be an array of strings.",
                p.name, spec.name
            ))
        }
    };

    items
        .iter()
        .map(|item| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                format!(
                    "Parameter '{}' of '{}' must contain only strings.",
                    p.name, spec.name
                )
            })
        })
        .collect()
}

fn find_param<'a>(spec: &'a ToolSpec, name: &str) -> Result<&'a ParamSpec, String> {
    spec.params
        .iter()
        .find(|p| p.name == name)
        .ok_or_else(|| format!("Tool '{}' has no parameter '{}'.", spec.name, name))
}

// By-name accessors for custom builders. These go through the same
// extraction and validation paths as the generic rendering pass.

pub(crate) fn required_str(
    spec: &ToolSpec,
    arguments: &Map<String, Value>,
    name: &str,
) -> Result<String, String> {
    let p = find_param(spec, name)?;
    str_arg(spec, arguments, p)?.ok_or_else(|| missing(spec, p))
}

pub(crate) fn optional_str(
    spec: &ToolSpec,
    arguments: &Map<String, Value>,
    name: &str,
) -> Result<Option<String>, String> {
    str_arg(spec, arguments, find_param(spec, name)?)
}

pub(crate) fn optional_bool(
    spec: &ToolSpec,
    arguments: &Map<String, Value>,
    name: &str,
) -> Result<bool, String> {
    bool_arg(spec, arguments, find_param(spec, name)?)
}

pub(crate) fn optional_str_list(
    spec: &ToolSpec,
    arguments: &Map<String, Value>,
    name: &str,
) -> Result<Vec<String>, String> {
    list_arg(spec, arguments, find_param(spec, name)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::west::catalog;
    use serde_json::json;

    fn arguments(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test arguments must be an object"),
        }
    }

    fn build(tool: &str, value: Value) -> Result<Vec<String>, String> {
        let spec = catalog::find(tool).expect("tool in catalog");
        build_tokens(spec, &arguments(value))
    }

    #[test]
    fn test_build_all_defaults_has_only_required_tokens() {
        let tokens = build(
            "build_zephyr_project",
            json!({"board": "nrf52840dk/nrf52840", "source_dir": "apps/blinky"}),
        )
        .unwrap();
        assert_eq!(
            tokens,
            vec!["build", "-b", "nrf52840dk/nrf52840", "apps/blinky"]
        );
    }

    #[test]
    fn test_boolean_true_renders_flag_once_at_declared_position() {
        let tokens = build(
            "build_zephyr_project",
            json!({"board": "b", "source_dir": "src", "force": true}),
        )
        .unwrap();
        assert_eq!(tokens, vec!["build", "-b", "b", "-f", "src"]);
        assert_eq!(tokens.iter().filter(|t| *t == "-f").count(), 1);
    }

    #[test]
    fn test_boolean_false_or_omitted_renders_nothing() {
        let with_false = build(
            "build_zephyr_project",
            json!({"board": "b", "source_dir": "src", "force": false}),
        )
        .unwrap();
        let omitted = build(
            "build_zephyr_project",
            json!({"board": "b", "source_dir": "src"}),
        )
        .unwrap();
        assert_eq!(with_false, omitted);
        assert!(!with_false.contains(&"-f".to_string()));
    }

    #[test]
    fn test_repeated_preserves_input_order() {
        let tokens = build(
            "build_zephyr_project",
            json!({"board": "b", "source_dir": "src", "snippet": ["a", "b", "c"]}),
        )
        .unwrap();
        let expected = ["-S", "a", "-S", "b", "-S", "c"];
        let start = tokens.iter().position(|t| t == "-S").unwrap();
        assert_eq!(&tokens[start..start + 6], &expected);
    }

    #[test]
    fn test_empty_sequence_contributes_zero_tokens() {
        let tokens = build(
            "build_zephyr_project",
            json!({"board": "b", "source_dir": "src", "snippet": [], "cmake_opt": []}),
        )
        .unwrap();
        assert_eq!(tokens, vec!["build", "-b", "b", "src"]);
    }

    #[test]
    fn test_trailing_options_follow_separator_after_positional() {
        let tokens = build(
            "build_zephyr_project",
            json!({"board": "b", "source_dir": "src", "cmake_opt": ["-DCONF=1", "-DDEBUG=0"]}),
        )
        .unwrap();
        assert_eq!(
            tokens,
            vec!["build", "-b", "b", "src", "--", "-DCONF=1", "-DDEBUG=0"]
        );
    }

    #[test]
    fn test_unknown_parameter_is_an_error() {
        let err = build(
            "build_zephyr_project",
            json!({"board": "b", "source_dir": "src", "bogus": 1}),
        )
        .unwrap_err();
        assert!(err.contains("Unknown parameter 'bogus'"), "{}", err);
    }

    #[test]
    fn test_missing_required_parameter_is_an_error() {
        let err = build("build_zephyr_project", json!({"board": "b"})).unwrap_err();
        assert!(err.contains("source_dir"), "{}", err);
    }

    #[test]
    fn test_wrong_type_is_an_error() {
        let err = build(
            "build_zephyr_project",
            json!({"board": 7, "source_dir": "src"}),
        )
        .unwrap_err();
        assert!(err.contains("must be a string"), "{}", err);

        let err = build(
            "build_zephyr_project",
            json!({"board": "b", "source_dir": "src", "force": "yes"}),
        )
        .unwrap_err();
        assert!(err.contains("must be a boolean"), "{}", err);

        let err = build(
            "build_zephyr_project",
            json!({"board": "b", "source_dir": "src", "snippet": "one"}),
        )
        .unwrap_err();
        assert!(err.contains("array of strings"), "{}", err);
    }

    #[test]
    fn test_enum_value_outside_allowed_set_is_an_error() {
        let ok = build(
            "build_zephyr_project",
            json!({"board": "b", "source_dir": "src", "pristine": "always"}),
        )
        .unwrap();
        assert!(ok.windows(2).any(|w| w == ["-p", "always"]));

        let err = build(
            "build_zephyr_project",
            json!({"board": "b", "source_dir": "src", "pristine": "sometimes"}),
        )
        .unwrap_err();
        assert!(err.contains("auto, always, never"), "{}", err);
    }

    #[test]
    fn test_opposite_sysbuild_flags_are_rejected() {
        let err = build(
            "build_zephyr_project",
            json!({"board": "b", "source_dir": "src", "sysbuild": true, "no_sysbuild": true}),
        )
        .unwrap_err();
        assert!(err.contains("cannot both be set"), "{}", err);

        // A false half of the pair does not trigger the conflict.
        let tokens = build(
            "build_zephyr_project",
            json!({"board": "b", "source_dir": "src", "sysbuild": true, "no_sysbuild": false}),
        )
        .unwrap();
        assert!(tokens.contains(&"--sysbuild".to_string()));
        assert!(!tokens.contains(&"--no-sysbuild".to_string()));
    }

    #[test]
    fn test_runner_tool_all_defaults_is_bare_subcommand() {
        assert_eq!(build("flash_zephyr_project", json!({})).unwrap(), vec!["flash"]);
        assert_eq!(build("export_zephyr_installation", json!({})).unwrap(), vec!["zephyr-export"]);
    }

    #[test]
    fn test_runner_options_render_in_table_order() {
        let tokens = build(
            "flash_zephyr_project",
            json!({"runner": "jlink", "build_dir": "build", "skip_rebuild": true}),
        )
        .unwrap();
        assert_eq!(
            tokens,
            vec!["flash", "-d", "build", "-r", "jlink", "--skip-rebuild"]
        );
    }

    #[test]
    fn test_completion_shell_is_validated() {
        assert_eq!(
            build("get_completion_script", json!({"shell": "bash"})).unwrap(),
            vec!["completion", "bash"]
        );
        let err = build("get_completion_script", json!({"shell": "ksh"})).unwrap_err();
        assert!(err.contains("bash, fish, powershell, zsh"), "{}", err);
    }

    #[test]
    fn test_boards_repeated_roots() {
        let tokens = build(
            "list_boards",
            json!({"name_re": "nrf", "board_root": ["r1", "r2"]}),
        )
        .unwrap();
        assert_eq!(
            tokens,
            vec!["boards", "-n", "nrf", "--board-root", "r1", "--board-root", "r2"]
        );
    }

    #[test]
    fn test_blobs_list_renders_format_string() {
        let tokens = build(
            "manage_blobs",
            json!({"subcommand": "list", "format_string": "{module}", "module": ["hal_nordic"]}),
        )
        .unwrap();
        assert_eq!(
            tokens,
            vec!["blobs", "list", "--module", "hal_nordic", "-f", "{module}"]
        );
    }

    #[test]
    fn test_blobs_fetch_ignores_format_string_and_renders_auto_accept() {
        let tokens = build(
            "manage_blobs",
            json!({"subcommand": "fetch", "format_string": "{module}", "auto_accept": true}),
        )
        .unwrap();
        assert_eq!(tokens, vec!["blobs", "fetch", "-a"]);
    }

    #[test]
    fn test_blobs_clean_ignores_auto_accept() {
        let tokens = build(
            "manage_blobs",
            json!({"subcommand": "clean", "auto_accept": true}),
        )
        .unwrap();
        assert_eq!(tokens, vec!["blobs", "clean"]);
    }

    #[test]
    fn test_blobs_invalid_subcommand_is_an_error() {
        let err = build("manage_blobs", json!({"subcommand": "steal"})).unwrap_err();
        assert!(err.contains("list, fetch, clean"), "{}", err);
    }

    #[test]
    fn test_patch_positional_precedes_options() {
        let tokens = build(
            "manage_patches",
            json!({"subcommand": "apply", "patch_base": "patches", "dst_module": ["m1", "m2"]}),
        )
        .unwrap();
        assert_eq!(
            tokens,
            vec!["patch", "apply", "-b", "patches", "-dm", "m1", "-dm", "m2"]
        );
    }

    #[test]
    fn test_bindesc_rest_args_pass_through() {
        let tokens = build(
            "manage_binary_descriptors",
            json!({"subcommand": "dump", "args": ["build/zephyr/zephyr.bin"]}),
        )
        .unwrap();
        assert_eq!(tokens, vec!["bindesc", "dump", "build/zephyr/zephyr.bin"]);
    }

    #[test]
    fn test_arbitrary_command_round_trip() {
        let tokens = build(
            "run_arbitrary_west_command",
            json!({"command_name": "update", "args": ["--narrow", "-o=--depth=1"]}),
        )
        .unwrap();
        assert_eq!(tokens, vec!["update", "--narrow", "-o=--depth=1"]);
    }

    #[test]
    fn test_arbitrary_command_without_args() {
        let tokens = build(
            "run_arbitrary_west_command",
            json!({"command_name": "topdir"}),
        )
        .unwrap();
        assert_eq!(tokens, vec!["topdir"]);
    }

    #[test]
    fn test_all_defaults_renders_no_optional_tokens_for_any_tool() {
        for spec in catalog::CATALOG {
            let mut map = Map::new();
            for p in spec.params.iter().filter(|p| p.required) {
                let value = p.allowed.map(|a| a[0]).unwrap_or("value");
                map.insert(p.name.to_string(), Value::String(value.to_string()));
            }

            let tokens = build_tokens(spec, &map).unwrap();

            // Subcommand tokens plus exactly the required parameters' tokens,
            // nothing optional.
            let required_tokens: usize = spec
                .params
                .iter()
                .filter(|p| p.required)
                .map(|p| match p.kind {
                    ParamKind::Value { .. } => 2,
                    _ => 1,
                })
                .sum();
            assert_eq!(
                tokens.len(),
                spec.subcommand.len() + required_tokens,
                "{} rendered unexpected tokens: {:?}",
                spec.name,
                tokens
            );
        }
    }

    #[test]
    fn test_null_values_count_as_absent() {
        let tokens = build(
            "flash_zephyr_project",
            json!({"runner": null, "build_dir": null}),
        )
        .unwrap();
        assert_eq!(tokens, vec!["flash"]);
    }
}
