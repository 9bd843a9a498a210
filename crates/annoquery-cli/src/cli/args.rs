//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` so `compile` and `check` read their
//! query input the same way.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Query description file (positional, "-" for stdin).
pub fn query_path_arg() -> Arg {
    Arg::new("query_path")
        .value_name("QUERY")
        .value_parser(value_parser!(PathBuf))
        .help("Query description file (JSON, use \"-\" for stdin)")
}

/// Inline query description (-q/--query).
pub fn query_text_arg() -> Arg {
    Arg::new("query_text")
        .short('q')
        .long("query")
        .value_name("JSON")
        .conflicts_with("query_path")
        .help("Inline query description")
}

/// Compile the count statement (--count).
pub fn count_arg() -> Arg {
    Arg::new("count")
        .long("count")
        .action(ArgAction::SetTrue)
        .help("Compile count(*) over the criteria instead of the row read")
}

/// Emit JSON (--json).
pub fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print statement, parameters and columns as JSON")
}

/// Verbosity level (-v, -vv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .action(ArgAction::Count)
        .help("Verbosity level (-v for debug logs, -vv for statement traces)")
}
