use serde_json::json;

use super::compile::{CompileArgs, compile};

const LABEL_QUERY: &str =
    r#"{"hierarchy": ["phone", "word"], "find": "phone", "filters": [{"path": "phone.label", "op": "eq", "value": "S"}]}"#;

fn inline(query: &str) -> CompileArgs {
    CompileArgs {
        query_path: None,
        query_text: Some(query.to_string()),
        count: false,
        json: false,
    }
}

#[test]
fn text_output() {
    let output = compile(&inline(LABEL_QUERY)).unwrap();
    insta::assert_snapshot!(output, @r#"
    MATCH (node_phone:phone)
    WITH *
    WHERE node_phone.label = $label_0
    RETURN node_phone.id AS id, node_phone.label AS label

    $label_0 = "S"
    "#);
}

#[test]
fn count_flag() {
    let args = CompileArgs {
        count: true,
        ..inline(LABEL_QUERY)
    };
    let output = compile(&args).unwrap();
    assert!(output.contains("RETURN count(*) AS count_all"));
}

#[test]
fn json_output() {
    let args = CompileArgs {
        json: true,
        ..inline(LABEL_QUERY)
    };
    let output: serde_json::Value = serde_json::from_str(&compile(&args).unwrap()).unwrap();
    assert_eq!(output["mode"], "read");
    assert_eq!(output["retry_safe"], true);
    assert_eq!(output["columns"], json!(["id", "label"]));
    assert_eq!(output["params"], json!({"label_0": "S"}));
    assert!(output["text"].as_str().unwrap().starts_with("MATCH (node_phone:phone)"));
}

#[test]
fn delete_is_not_retry_safe() {
    let query = r#"{"hierarchy": ["phone"], "find": "phone", "delete": true}"#;
    let args = CompileArgs {
        json: true,
        ..inline(query)
    };
    let output: serde_json::Value = serde_json::from_str(&compile(&args).unwrap()).unwrap();
    assert_eq!(output["mode"], "write");
    assert_eq!(output["retry_safe"], false);
    assert_eq!(output["columns"], json!([]));
}

#[test]
fn build_errors_are_reported() {
    let query = r#"{"hierarchy": ["phone"], "find": "phone", "group_by": ["phone.label"]}"#;
    let err = compile(&inline(query)).unwrap_err();
    assert!(err.contains("group"), "{err}");
}

#[test]
fn missing_file() {
    let args = CompileArgs {
        query_path: Some("does/not/exist.json".into()),
        query_text: None,
        count: false,
        json: false,
    };
    let err = compile(&args).unwrap_err();
    assert!(err.starts_with("failed to read 'does/not/exist.json'"), "{err}");
}
