use std::path::PathBuf;

use annoquery_compiler::{AccessMode, Params, Statement};
use serde::Serialize;

use super::query_file::Request;
use super::query_loader::load_query_text;

pub struct CompileArgs {
    pub query_path: Option<PathBuf>,
    pub query_text: Option<String>,
    pub count: bool,
    pub json: bool,
}

#[derive(Serialize)]
struct StatementOutput<'a> {
    text: String,
    params: &'a Params,
    columns: Vec<&'a str>,
    mode: &'static str,
    retry_safe: bool,
}

pub fn run(args: CompileArgs) {
    match compile(&args) {
        Ok(output) => println!("{output}"),
        Err(msg) => {
            eprintln!("error: {}", msg);
            std::process::exit(1);
        }
    }
}

pub fn compile(args: &CompileArgs) -> Result<String, String> {
    let text = load_query_text(args.query_path.as_deref(), args.query_text.as_deref())?;
    let request = Request::from_json(&text, args.count).map_err(|e| e.to_string())?;
    let statement = request.statement().map_err(|e| e.to_string())?;
    if args.json {
        render_json(&statement)
    } else {
        Ok(render_text(&statement))
    }
}

/// Statement text, then one `$name = value` line per parameter.
pub fn render_text(statement: &Statement) -> String {
    let mut out = statement.text();
    if !statement.params().is_empty() {
        out.push('\n');
        for (name, value) in statement.params().iter() {
            out.push_str(&format!("\n${name} = {value}"));
        }
    }
    out
}

pub fn render_json(statement: &Statement) -> Result<String, String> {
    let output = StatementOutput {
        text: statement.text(),
        params: statement.params(),
        columns: statement.columns(),
        mode: match statement.access_mode() {
            AccessMode::Read => "read",
            AccessMode::Write => "write",
        },
        retry_safe: statement.retry_safe(),
    };
    serde_json::to_string_pretty(&output).map_err(|e| format!("failed to encode output: {}", e))
}
