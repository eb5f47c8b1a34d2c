//! The `cogdiag convert` command.
//!
//! Converts a response CSV into a JSON array of response records, the
//! exchange format downstream diagnosis tooling consumes.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use cogdiag_core::parser;

#[derive(Serialize)]
struct ResponseRecord {
    user_id: String,
    item_id: String,
    is_correct: u8,
}

pub fn execute(input: PathBuf, output: PathBuf) -> Result<()> {
    let responses = parser::parse_responses(&input)?;

    let records: Vec<ResponseRecord> = responses
        .into_iter()
        .map(|r| ResponseRecord {
            user_id: r.student_id,
            item_id: r.item_id,
            is_correct: r.correct,
        })
        .collect();

    std::fs::create_dir_all(&output)
        .with_context(|| format!("failed to create output directory: {}", output.display()))?;
    let out_path = output.join("responses.json");
    let json = serde_json::to_string_pretty(&records).context("failed to serialize records")?;
    std::fs::write(&out_path, json)
        .with_context(|| format!("failed to write {}", out_path.display()))?;

    println!("Converted {} records to {}", records.len(), out_path.display());
    Ok(())
}
