//! Datalog interpreter front end: parse a source file and print its clauses

use anyhow::{bail, Context, Result};
use ariadne::{Color, Label, Report, ReportKind, Source};
use clap::Parser;
use datalog_parser::{parse_program_with, ParseError, ParseOptions, SrcId};
use std::{fs, path::PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "datalog-interpret")]
#[command(about = "Parse a Datalog file and print its clauses", long_about = None)]
struct Cli {
    /// Fail on characters the lexer does not recognise instead of skipping them
    #[arg(short, long)]
    strict: bool,

    /// Datalog source file
    file: PathBuf,
}

fn report(error: &ParseError, src: SrcId, text: &str) -> Result<()> {
    let Some(span) = error.span() else {
        eprintln!("Error: {}", error);
        return Ok(());
    };

    Report::build(ReportKind::Error, src, span.start())
        .with_message("could not parse program")
        .with_label(
            Label::new(span)
                .with_message(error.to_string())
                .with_color(Color::Red),
        )
        .finish()
        .eprint((src, Source::from(text)))
        .context("failed to write the error report")
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    println!("Executing Datalog Interpreter...");

    let text = fs::read_to_string(&cli.file)
        .with_context(|| format!("could not read {}", cli.file.display()))?;
    let src = SrcId::from_path(&cli.file);
    let options = if cli.strict {
        ParseOptions::strict()
    } else {
        ParseOptions::default()
    };

    match parse_program_with(&text, src, options) {
        Ok(program) => {
            for clause in &program.clauses {
                println!("{:?}", clause);
            }
            Ok(())
        }
        Err(error) => {
            report(&error, src, &text)?;
            bail!("{} could not be parsed", cli.file.display())
        }
    }
}
