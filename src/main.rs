use anyhow::Context;
use clap::Parser;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use tabledit::app::run;
use tabledit::app::Config;
use tracing_subscriber::EnvFilter;

/// Insert rows and columns into the tables of a Word document
#[derive(Parser)]
#[command(name = "tabledit", version)]
struct Cli {
    /// Path of the .docx document to edit
    input: PathBuf,

    /// Path the modified document is written to
    /// (defaults to "<input stem>_modified.docx" next to the input)
    #[arg(short, long, verbatim_doc_comment)]
    output: Option<PathBuf>,
}

/// Derives the default output path from the input file name
fn default_output(input: &Path) -> PathBuf {
    let stem = input.file_stem().and_then(|stem| stem.to_str()).unwrap_or("document");
    input.with_file_name(format!("{}_modified.docx", stem))
}

fn try_main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let output = cli.output.unwrap_or_else(|| default_output(&cli.input));
    let config = Config { input: cli.input, output };

    let stdin = io::stdin();
    run(&config, stdin.lock(), io::stdout())
        .with_context(|| format!("Failed to edit '{}'", config.input.display()))?;
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{:#}", error);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_is_derived_from_the_input_stem() {
        assert_eq!(
            default_output(Path::new("reports/tables.docx")),
            PathBuf::from("reports/tables_modified.docx")
        );
        assert_eq!(
            default_output(Path::new("tables.docx")),
            PathBuf::from("tables_modified.docx")
        );
    }
}
