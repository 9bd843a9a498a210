use std::path::PathBuf;

use super::query_file::Request;
use super::query_loader::load_query_text;

pub struct CheckArgs {
    pub query_path: Option<PathBuf>,
    pub query_text: Option<String>,
}

pub fn run(args: CheckArgs) {
    if let Err(msg) = check(&args) {
        eprintln!("error: {}", msg);
        std::process::exit(1);
    }

    // Silent on success (like cargo check)
}

pub fn check(args: &CheckArgs) -> Result<(), String> {
    let text = load_query_text(args.query_path.as_deref(), args.query_text.as_deref())?;
    if text.trim().is_empty() {
        return Err("query cannot be empty".to_string());
    }
    let request = Request::from_json(&text, false).map_err(|e| e.to_string())?;
    let statement = request.statement().map_err(|e| e.to_string())?;
    tracing::debug!(
        nodes = statement.pattern_node_count(),
        relationships = statement.relationship_count(),
        filters = statement.filter_count(),
        "query is valid"
    );
    Ok(())
}
