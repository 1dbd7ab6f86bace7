//! Static catalog of the west subcommands exposed as tools.
//!
//! Each tool is a `ToolSpec`: the west subcommand it maps to plus an ordered
//! parameter table. Token rendering order is the table's declaration order,
//! never the caller's key order, so a given argument set always produces the
//! same command line. Most tools render generically from their table; the few
//! whose flags depend on another parameter's value carry a custom builder.

use serde_json::{Map, Value};

use super::args;

/// How a parameter renders into command-line tokens.
#[derive(Debug, Clone, Copy)]
pub enum ParamKind {
    /// Presence-only flag, included iff the value is `true` (e.g. `-f`).
    Flag { flag: &'static str },
    /// Flag followed by a value token (e.g. `-b <board>`), omitted when absent.
    Value { flag: &'static str },
    /// Flag repeated once per element, each followed by its value
    /// (e.g. `-S snip1 -S snip2`). Element order is preserved.
    Repeated { flag: &'static str },
    /// Bare value token at its declared position in the table.
    Positional,
    /// Literal `--` separator followed by the elements, only when non-empty.
    Trailing,
    /// Raw elements appended unmodified, no flag.
    Rest,
}

/// One parameter of a tool: name, rendering rule, and validation constraints.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    /// Closed set of accepted values, when the underlying option is an enum.
    pub allowed: Option<&'static [&'static str]>,
    /// Name of a parameter that must not be set together with this one.
    pub conflicts_with: Option<&'static str>,
    pub description: &'static str,
}

impl ParamSpec {
    const fn new(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: false,
            allowed: None,
            conflicts_with: None,
            description,
        }
    }

    pub const fn flag(name: &'static str, flag: &'static str, description: &'static str) -> Self {
        Self::new(name, ParamKind::Flag { flag }, description)
    }

    pub const fn value(name: &'static str, flag: &'static str, description: &'static str) -> Self {
        Self::new(name, ParamKind::Value { flag }, description)
    }

    pub const fn repeated(name: &'static str, flag: &'static str, description: &'static str) -> Self {
        Self::new(name, ParamKind::Repeated { flag }, description)
    }

    pub const fn positional(name: &'static str, description: &'static str) -> Self {
        Self::new(name, ParamKind::Positional, description)
    }

    pub const fn trailing(name: &'static str, description: &'static str) -> Self {
        Self::new(name, ParamKind::Trailing, description)
    }

    pub const fn rest(name: &'static str, description: &'static str) -> Self {
        Self::new(name, ParamKind::Rest, description)
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn one_of(mut self, allowed: &'static [&'static str]) -> Self {
        self.allowed = Some(allowed);
        self
    }

    pub const fn conflicts(mut self, other: &'static str) -> Self {
        self.conflicts_with = Some(other);
        self
    }
}

/// Custom token builder for tools whose rendering is conditional on a
/// parameter's value. Receives pre-validated arguments (unknown names and
/// conflicts are rejected before dispatch).
pub type BuildFn = fn(&ToolSpec, &Map<String, Value>) -> Result<Vec<String>, String>;

/// One exposed tool: west subcommand token(s) plus its parameter table.
#[derive(Debug, Clone, Copy)]
pub struct ToolSpec {
    pub name: &'static str,
    /// Leading token(s) of the command line, before any parameter renders.
    /// Empty for the arbitrary-command fallback.
    pub subcommand: &'static [&'static str],
    pub description: &'static str,
    pub params: &'static [ParamSpec],
    pub builder: Option<BuildFn>,
}

/// Runner options shared by `flash`, `debug`, `debugserver`, `attach`,
/// `rtt`, `robot`, and `simulate`.
static RUNNER_PARAMS: &[ParamSpec] = &[
    ParamSpec::value("build_dir", "-d", "Application build directory."),
    ParamSpec::value("runner", "-r", "Override the default runner from --build-dir."),
    ParamSpec::flag(
        "skip_rebuild",
        "--skip-rebuild",
        "Do not refresh cmake dependencies first.",
    ),
    ParamSpec::value("domain", "--domain", "Execute the runner only for the given domain."),
    ParamSpec::value("board_dir", "--board-dir", "Board directory."),
    ParamSpec::value("gdb", "--gdb", "Path to GDB."),
    ParamSpec::value("openocd", "--openocd", "Path to OpenOCD."),
    ParamSpec::value(
        "openocd_search",
        "--openocd-search",
        "Path to add to the OpenOCD search path.",
    ),
];

/// Every tool served by `tools/list`, in presentation order.
pub static CATALOG: &[ToolSpec] = &[
    ToolSpec {
        name: "get_completion_script",
        subcommand: &["completion"],
        description: "Output a shell completion script for west.",
        params: &[ParamSpec::positional("shell", "Shell the completion script is intended for.")
            .required()
            .one_of(&["bash", "fish", "powershell", "zsh"])],
        builder: None,
    },
    ToolSpec {
        name: "list_boards",
        subcommand: &["boards"],
        description: "Display information about supported Zephyr boards.",
        params: &[
            ParamSpec::value("name_re", "-n", "Regular expression filtering board names."),
            ParamSpec::value("format_string", "-f", "Format string used to list each board."),
            ParamSpec::value("board", "--board", "Look up a specific board; fails if not found."),
            ParamSpec::repeated("arch_root", "--arch-root", "Add an architecture root."),
            ParamSpec::repeated("board_root", "--board-root", "Add a board root."),
            ParamSpec::repeated("soc_root", "--soc-root", "Add a SoC root."),
            ParamSpec::value("board_dir", "--board-dir", "Only look for boards at this location."),
        ],
        builder: None,
    },
    ToolSpec {
        name: "list_shields",
        subcommand: &["shields"],
        description: "Display information about supported shields.",
        params: &[
            ParamSpec::value("name_re", "-n", "Regular expression filtering shield names."),
            ParamSpec::value("format_string", "-f", "Format string used to list each shield."),
            ParamSpec::repeated("board_root", "--board-root", "Add a board root."),
        ],
        builder: None,
    },
    ToolSpec {
        name: "build_zephyr_project",
        subcommand: &["build"],
        description: "Build a Zephyr application with `west build`.",
        params: &[
            ParamSpec::value(
                "board",
                "-b",
                "Board to build for, with optional revision (e.g. 'nrf52840dk/nrf52840').",
            )
            .required(),
            ParamSpec::value("build_dir", "-d", "Build directory to create or use."),
            ParamSpec::flag("force", "-f", "Ignore errors and try to proceed."),
            ParamSpec::flag("cmake", "-c", "Force a cmake run."),
            ParamSpec::flag("cmake_only", "--cmake-only", "Just run cmake; don't build."),
            ParamSpec::value("domain", "--domain", "Execute the build tool only for the given domain."),
            ParamSpec::value("target", "-t", "Run this build system target (e.g. 'usage')."),
            ParamSpec::value(
                "test_item",
                "-T",
                "Build based on test data in testcase.yaml or sample.yaml.",
            ),
            ParamSpec::repeated("build_opt", "-o", "Option passed to the build tool (make or ninja)."),
            ParamSpec::flag("just_print", "-n", "Just print build commands; don't run them."),
            ParamSpec::repeated("snippet", "-S", "Add the argument to SNIPPET."),
            ParamSpec::repeated("shield", "--shield", "Add the argument to SHIELD."),
            ParamSpec::repeated("extra_conf", "--extra-conf", "Add the argument to EXTRA_CONF_FILE."),
            ParamSpec::repeated(
                "extra_dtc_overlay",
                "--extra-dtc-overlay",
                "Add the argument to EXTRA_DTC_OVERLAY_FILE.",
            ),
            ParamSpec::value("pristine", "-p", "Pristine build folder setting.")
                .one_of(&["auto", "always", "never"]),
            ParamSpec::flag("sysbuild", "--sysbuild", "Create a multi-domain build system.")
                .conflicts("no_sysbuild"),
            ParamSpec::flag(
                "no_sysbuild",
                "--no-sysbuild",
                "Do not create a multi-domain build system (default).",
            )
            .conflicts("sysbuild"),
            ParamSpec::positional("source_dir", "Application source directory.").required(),
            ParamSpec::trailing("cmake_opt", "Extra options passed to cmake after '--'."),
        ],
        builder: None,
    },
    ToolSpec {
        name: "flash_zephyr_project",
        subcommand: &["flash"],
        description: "Flash a built Zephyr application to the target board.",
        params: RUNNER_PARAMS,
        builder: None,
    },
    ToolSpec {
        name: "debug_zephyr_project",
        subcommand: &["debug"],
        description: "Flash the program and start an interactive debugging session.",
        params: RUNNER_PARAMS,
        builder: None,
    },
    ToolSpec {
        name: "start_debug_server",
        subcommand: &["debugserver"],
        description: "Launch a debug server accepting incoming connections for the board.",
        params: RUNNER_PARAMS,
        builder: None,
    },
    ToolSpec {
        name: "attach_debugger",
        subcommand: &["attach"],
        description: "Attach a debugger to the board without reflashing.",
        params: RUNNER_PARAMS,
        builder: None,
    },
    ToolSpec {
        name: "start_rtt_viewer",
        subcommand: &["rtt"],
        description: "Open an RTT viewer for the connected board.",
        params: RUNNER_PARAMS,
        builder: None,
    },
    ToolSpec {
        name: "run_robot_tests",
        subcommand: &["robot"],
        description: "Run RobotFramework test suites with a chosen runner.",
        params: RUNNER_PARAMS,
        builder: None,
    },
    ToolSpec {
        name: "simulate_board",
        subcommand: &["simulate"],
        description: "Simulate the board on a chosen runner using generated artifacts.",
        params: RUNNER_PARAMS,
        builder: None,
    },
    ToolSpec {
        name: "export_zephyr_installation",
        subcommand: &["zephyr-export"],
        description: "Register the current Zephyr installation in the CMake user package registry.",
        params: &[],
        builder: None,
    },
    ToolSpec {
        name: "manage_blobs",
        subcommand: &["blobs"],
        description: "List, fetch, or clean binary blobs.",
        params: &[
            ParamSpec::positional("subcommand", "The blobs subcommand to execute.")
                .required()
                .one_of(&["list", "fetch", "clean"]),
            ParamSpec::repeated("module", "--module", "Zephyr modules to operate on; all when omitted."),
            ParamSpec::value(
                "format_string",
                "-f",
                "Format string used to list each blob ('list' only).",
            ),
            ParamSpec::flag(
                "auto_accept",
                "-a",
                "Auto-accept click-through licenses when fetching ('fetch' only).",
            ),
        ],
        builder: Some(build_blobs),
    },
    ToolSpec {
        name: "manage_binary_descriptors",
        subcommand: &["bindesc"],
        description: "Work with binary descriptors via `west bindesc`.",
        params: &[
            ParamSpec::positional("subcommand", "The bindesc subcommand to run.")
                .required()
                .one_of(&["dump", "search", "custom_search", "list", "get_offset"]),
            ParamSpec::rest("args", "Additional arguments for the subcommand."),
        ],
        builder: None,
    },
    ToolSpec {
        name: "manage_packages",
        subcommand: &["packages"],
        description: "List and install packages for Zephyr and modules.",
        params: &[
            ParamSpec::positional("manager", "The package manager to use.")
                .required()
                .one_of(&["pip"]),
            ParamSpec::repeated(
                "module",
                "-m",
                "Zephyr module(s) to run the packages command for; 'zephyr' for Zephyr itself.",
            ),
            ParamSpec::rest("args", "Additional arguments for the package manager subcommand."),
        ],
        builder: None,
    },
    ToolSpec {
        name: "manage_patches",
        subcommand: &["patch"],
        description: "Apply, clean, list, or fetch patches in the west workspace.",
        params: &[
            ParamSpec::positional("subcommand", "The patch subcommand to execute.")
                .required()
                .one_of(&["apply", "clean", "gh-fetch", "list"]),
            ParamSpec::value("patch_base", "-b", "Directory containing patch files."),
            ParamSpec::value("patch_yml", "-l", "Path to the patches.yml file."),
            ParamSpec::value("west_workspace", "-w", "West workspace directory."),
            ParamSpec::value("src_module", "-sm", "Zephyr module containing the patch definition."),
            ParamSpec::repeated("dst_module", "-dm", "Zephyr module(s) to run the patch command for."),
            ParamSpec::rest("args", "Additional arguments for the subcommand."),
        ],
        builder: None,
    },
    ToolSpec {
        name: "index_gtags",
        subcommand: &["gtags"],
        description: "Index workspace sources with GNU Global's gtags tool.",
        params: &[ParamSpec::rest(
            "projects",
            "West projects to index, by name or path; 'manifest' for the manifest repository.",
        )],
        builder: None,
    },
    ToolSpec {
        name: "list_west_commands",
        subcommand: &["--help"],
        description: "List all available west commands, built-in and extension, as one flat list.",
        params: &[],
        builder: None,
    },
    ToolSpec {
        name: "run_arbitrary_west_command",
        subcommand: &[],
        description: "Run any west command by name; fallback for commands without a dedicated tool.",
        params: &[
            ParamSpec::positional("command_name", "The west command to execute (e.g. 'init', 'update').")
                .required(),
            ParamSpec::rest("args", "Arguments passed through to the command unmodified."),
        ],
        builder: None,
    },
];

/// Look up a tool descriptor by name.
pub fn find(name: &str) -> Option<&'static ToolSpec> {
    CATALOG.iter().find(|spec| spec.name == name)
}

/// `west blobs` renders `-f` only for the `list` subcommand and `-a` only
/// for `fetch`; west rejects them elsewhere.
fn build_blobs(spec: &ToolSpec, arguments: &Map<String, Value>) -> Result<Vec<String>, String> {
    let subcommand = args::required_str(spec, arguments, "subcommand")?;
    let modules = args::optional_str_list(spec, arguments, "module")?;
    let format_string = args::optional_str(spec, arguments, "format_string")?;
    let auto_accept = args::optional_bool(spec, arguments, "auto_accept")?;

    let mut tokens = vec!["blobs".to_string(), subcommand.clone()];
    for module in modules {
        tokens.push("--module".to_string());
        tokens.push(module);
    }
    if subcommand == "list" {
        if let Some(format_string) = format_string {
            tokens.push("-f".to_string());
            tokens.push(format_string);
        }
    }
    if subcommand == "fetch" && auto_accept {
        tokens.push("-a".to_string());
    }

    Ok(tokens)
}
