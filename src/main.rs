//! optinspect: derive command-line options from function descriptors.
//!
//! Two modes:
//!
//! - `optinspect docstring [FILE]` prints the parameter table parsed from
//!   a raw docstring (stdin when FILE is omitted).
//! - `optinspect options [FILES]...` derives option records from JSON
//!   function descriptors (stdin when no FILES are given) and prints them
//!   as JSON or as the `--help` page of the resulting command.

mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use optinspect::{docstring, FunctionDescriptor, Inspector};
use render::Report;
use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "optinspect",
    about = "Derive command-line options from function signatures and docstrings"
)]
struct Cli {
    /// Log debug details to stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a docstring and print its parameter table as JSON
    Docstring {
        /// Docstring file. If omitted, reads from stdin.
        file: Option<PathBuf>,
    },

    /// Derive option records from function descriptors
    Options {
        /// Descriptor files, directories or glob patterns. If omitted,
        /// reads one descriptor from stdin.
        files: Vec<String>,

        /// Output format: json (default) or help
        #[arg(short = 'f', long, default_value = "json")]
        format: String,

        /// Use only these parameters (repeatable)
        #[arg(long)]
        include: Vec<String>,

        /// Skip these parameters (repeatable)
        #[arg(long)]
        exclude: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    match cli.command {
        Commands::Docstring { ref file } => docstring_mode(file.as_deref()),
        Commands::Options {
            ref files,
            ref format,
            ref include,
            ref exclude,
        } => options_mode(files, format, include, exclude),
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .with_ansi(false)
        .init();
}

fn docstring_mode(file: Option<&Path>) -> Result<()> {
    let text = read_input(file)?;
    let table = docstring::parse(&text)?;
    println!("{}", serde_json::to_string_pretty(&table)?);
    Ok(())
}

fn options_mode(files: &[String], format: &str, include: &[String], exclude: &[String]) -> Result<()> {
    let renderer = render::create_renderer(format)?;

    let sources: Vec<(String, String)> = if files.is_empty() {
        vec![("<stdin>".to_string(), read_input(None)?)]
    } else {
        descriptor_paths(files)?
            .into_iter()
            .map(|path| -> Result<(String, String)> {
                let text = fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                Ok((path.display().to_string(), text))
            })
            .collect::<Result<Vec<_>>>()?
    };

    let mut reports = Vec::new();
    for (source, text) in sources {
        let mut descriptor = FunctionDescriptor::from_json(&text)
            .with_context(|| format!("failed to load descriptor {}", source))?;
        descriptor.policy.include.extend(include.iter().cloned());
        descriptor.policy.exclude.extend(exclude.iter().cloned());

        let signature = descriptor
            .signature()
            .with_context(|| format!("invalid signature in {}", source))?;
        let inspection = Inspector::new(&signature)
            .options(&descriptor.policy)
            .with_context(|| format!("failed to derive options for {}", signature.name))?;
        reports.push(Report {
            function: signature.name,
            inspection,
        });
    }

    print!("{}", renderer.render(&reports)?);
    Ok(())
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}

/// Resolve FILES arguments to descriptor paths, sorted and deduplicated.
///
/// A directory contributes its `*.json` entries (one level deep); anything
/// that is neither a file nor a directory is treated as a glob pattern.
fn descriptor_paths(args: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = BTreeSet::new();
    for arg in args {
        let path = Path::new(arg);
        if path.is_file() {
            paths.insert(path.to_path_buf());
        } else if path.is_dir() {
            paths.extend(descriptors_in(path)?);
        } else {
            let mut matched = false;
            for entry in glob::glob(arg).with_context(|| format!("invalid glob pattern: {}", arg))? {
                match entry {
                    Ok(found) if found.is_file() => {
                        matched = true;
                        paths.insert(found);
                    }
                    Ok(_) => {}
                    Err(err) => tracing::debug!(%err, "skipping unreadable glob entry"),
                }
            }
            if !matched {
                tracing::warn!("no descriptors matched: {}", arg);
            }
        }
    }
    Ok(paths.into_iter().collect())
}

fn descriptors_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?;
    Ok(entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect())
}
