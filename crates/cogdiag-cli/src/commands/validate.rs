//! The `cogdiag validate` command.

use std::path::PathBuf;

use anyhow::Result;

use cogdiag_core::parser;

pub fn execute(responses_path: PathBuf, q_matrix_path: PathBuf) -> Result<()> {
    let responses = parser::parse_responses(&responses_path)?;
    let q_matrix = parser::parse_q_matrix(&q_matrix_path)?;

    println!(
        "Responses: {} rows ({})",
        responses.len(),
        responses_path.display()
    );
    println!(
        "Q-matrix: {} items x {} concepts ({})",
        q_matrix.n_items(),
        q_matrix.n_concepts(),
        q_matrix_path.display()
    );

    let warnings = parser::validate_tables(&responses, &q_matrix);
    if warnings.is_empty() {
        println!("All input tables valid");
    } else {
        println!("\n{} warning(s):", warnings.len());
        for w in &warnings {
            match &w.item_id {
                Some(id) => println!("  [{id}] {}", w.message),
                None => println!("  {}", w.message),
            }
        }
    }

    Ok(())
}
