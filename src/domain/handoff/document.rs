//! Summary document generated from a completed interview.

use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;

use crate::domain::survey::ToolDefinition;

pub const DOCUMENT_TOOL: &str = "save_document";
pub const DOCUMENT_FILE_NAME: &str = "summary.html";

#[derive(Debug, Deserialize)]
struct DocumentArguments {
    html: String,
}

pub fn document_tool() -> ToolDefinition {
    ToolDefinition::new(
        DOCUMENT_TOOL,
        "Save the generated summary document",
        json!({
            "type": "object",
            "properties": {
                "html": {"type": "string", "description": "Complete HTML document"}
            },
            "required": ["html"]
        }),
    )
}

pub fn document_prompt(data: &BTreeMap<String, String>, language: &str) -> String {
    let mut prompt = format!(
        "Write a concise one-page summary of the candidate as a complete HTML document \
         in language '{}', then call the save_document tool with it.\n\n",
        language
    );
    for (name, value) in data {
        prompt.push_str(&format!("{}: {}\n", name, value));
    }
    prompt
}

/// Extract the HTML body from `save_document` arguments.
pub fn parse_document_arguments(arguments: &str) -> Result<String, serde_json::Error> {
    let args: DocumentArguments = serde_json::from_str(arguments)?;
    Ok(args.html)
}
