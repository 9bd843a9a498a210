//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("annoquery")
        .about("Compile annotation-graph queries to Cypher statements")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(compile_command())
        .subcommand(check_command())
}

/// Compile a query description and print the statement.
pub fn compile_command() -> Command {
    Command::new("compile")
        .about("Compile a query description to statement text and parameters")
        .override_usage(
            "\
  annoquery compile <QUERY>
  annoquery compile -q <JSON> [--count] [--json]",
        )
        .after_help(
            r#"EXAMPLES:
  annoquery compile query.json                 # statement + parameters
  annoquery compile query.json --json          # machine-readable output
  annoquery compile query.json --count         # count(*) over the criteria
  annoquery compile -q '{"hierarchy":["phone","word"],"find":"phone"}'"#,
        )
        .arg(query_path_arg())
        .arg(query_text_arg())
        .arg(count_arg())
        .arg(json_arg())
        .arg(verbose_arg())
}

/// Validate a query description without printing anything on success.
pub fn check_command() -> Command {
    Command::new("check")
        .about("Validate a query description")
        .override_usage(
            "\
  annoquery check <QUERY>
  annoquery check -q <JSON>",
        )
        .after_help(
            r#"EXAMPLES:
  annoquery check query.json
  cat query.json | annoquery check -"#,
        )
        .arg(query_path_arg())
        .arg(query_text_arg())
        .arg(verbose_arg())
}
