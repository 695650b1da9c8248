//! Process flow: load the package, walk its tables prompting for edits,
//! rebuild the chosen tables, and save once at the end if anything changed.

use crate::document::docx::DocxFile;
use crate::editor::insert_row_and_column;
use crate::error::ResultMessage;
use crate::error::TableditError;
use crate::prompt::Decision;
use crate::prompt::Prompter;
use std::io::BufRead;
use std::io::Write;
use std::path::PathBuf;

/// Process-lifetime configuration, passed explicitly into [`run`]
#[derive(Clone, Debug)]
pub struct Config {
    /// Path of the document to edit
    pub input: PathBuf,
    /// Path the modified document is written to
    pub output: PathBuf,
}

/// Runs one edit pass over every table of the input document.
///
/// For each table the user is asked whether to insert a row and/or a column;
/// chosen tables are rebuilt in place. Quitting aborts the remaining tables
/// but keeps edits already applied. The output file is written once, at the
/// end, and only if at least one table was modified.
///
/// # Arguments
/// * `config` - Input and output paths
/// * `input` - Stream the user's answers are read from
/// * `output` - Stream prompts and progress messages are written to
///
/// # Returns
/// * `Result<bool, TableditError>` - Whether the document was modified
pub fn run<R: BufRead, W: Write>(
    config: &Config,
    input: R,
    output: W,
) -> Result<bool, TableditError> {
    let mut prompter = Prompter::new(input, output);
    let mut docx = DocxFile::open(&config.input)?;
    let mut document = docx.document()
        .with_prefix("Failed to read the main document part")?;

    let summaries: Vec<(usize, usize, usize)> = document
        .tables()
        .map(|(block_index, table)| (block_index, table.rows(), table.cols()))
        .collect();
    if summaries.is_empty() {
        prompter.say("No tables found in the document.")?;
        return Ok(false);
    }
    prompter.say(&format!("The document contains {} table(s).", summaries.len()))?;

    let mut modified = false;
    for (number, (block_index, rows, cols)) in summaries.into_iter().enumerate() {
        prompter.say(&format!("\n[Table {}] Rows: {}, Columns: {}", number + 1, rows, cols))?;
        match prompter.table_decision(rows, cols)? {
            Decision::Quit => {
                prompter.say("Exiting.")?;
                break;
            }
            Decision::Edit(request) if request.is_empty() => {
                prompter.say("Table unchanged.")?;
            }
            Decision::Edit(request) => {
                insert_row_and_column(&mut document, block_index, request)?;
                modified = true;
                prompter.say(&format!("Inserted: row {}, column {}", request.row, request.col))?;
            }
        }
    }

    if modified {
        docx.save_as(&document, &config.output)
            .with_prefix("Failed to save the modified document")?;
        prompter.say(&format!("\nDocument saved to '{}'.", config.output.display()))?;
    } else {
        prompter.say("\nNo changes made.")?;
    }
    Ok(modified)
}
