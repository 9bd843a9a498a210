use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Query description text from `-q`, a file, or stdin (`-`).
pub fn load_query_text(query_path: Option<&Path>, query_text: Option<&str>) -> Result<String, String> {
    if let Some(text) = query_text {
        return Ok(text.to_string());
    }

    if let Some(path) = query_path {
        if path.as_os_str() == "-" {
            return load_stdin();
        }
        return fs::read_to_string(path)
            .map_err(|e| format!("failed to read '{}': {}", path.display(), e));
    }

    Err("query is required: use a positional file path or -q/--query".to_string())
}

fn load_stdin() -> Result<String, String> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .map_err(|e| format!("failed to read stdin: {}", e))?;
    Ok(buf)
}
