//! COLLADA CLI - Tool for inspecting and validating COLLADA documents.
//!
//! # Commands
//!
//! - `collada-cli info <file>` - Version, asset, library counts and warnings
//! - `collada-cli tree <file>` - Indented dump of the decoded document
//! - `collada-cli check <files...>` - Decode files in parallel, fail on errors
//! - `collada-cli json <file.json>` - Decode the JSON form of a document
//!
//! `info`, `tree` and `check` accept the JSON form too when the file ends in `.json`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;

use collada::core::{DecodeOptions, JsonCursor, TracingSink};
use collada::decode::Decoder;
use collada::dom::LibraryKind;
use collada::{DecodeError, Document};

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (built ",
    env!("COLLADA_BUILD_DATE"),
    " ",
    env!("COLLADA_BUILD_TIME"),
    ")"
);

/// COLLADA document toolkit
#[derive(Parser)]
#[command(name = "collada-cli")]
#[command(about = "Inspect and validate COLLADA (.dae) documents")]
#[command(version = VERSION)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Decode options file (JSON); defaults to the user config directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the element nesting limit
    #[arg(long, global = true)]
    max_depth: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version, asset, library counts and warning count
    Info { file: PathBuf },

    /// Show the full decoded document tree
    Tree { file: PathBuf },

    /// Decode every file and report failures (non-zero exit on any)
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Treat unresolved references as errors
        #[arg(long)]
        strict: bool,
    },

    /// Decode a document given in its JSON form and dump it
    Json { file: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut options = match &cli.config {
        Some(path) => DecodeOptions::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => DecodeOptions::load_default(),
    };
    if let Some(depth) = cli.max_depth {
        options.max_depth = depth;
    }

    match cli.command {
        Commands::Info { file } => cmd_info(&file, options),
        Commands::Tree { file } => cmd_tree(&file, options),
        Commands::Check { files, strict } => {
            options.strict |= strict;
            cmd_check(&files, &options)
        }
        Commands::Json { file } => cmd_json(&file, options),
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "collada=debug",
        _ => "collada=trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

/// Decode a document with the CLI's options, forwarding warnings to the
/// log. `.json` files are read as the JSON form, anything else as plain or
/// gzip `.dae`.
fn open(path: &Path, options: DecodeOptions) -> std::result::Result<Document, DecodeError> {
    let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if !is_json {
        return Document::open_with_sink(path, options, TracingSink);
    }
    let text = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DecodeError::new(collada::Error::FileNotFound(path.to_path_buf()))
        } else {
            DecodeError::new(e.into())
        }
    })?;
    Decoder::new(JsonCursor::from_text(&text)?)
        .with_options(options)
        .with_sink(TracingSink)
        .decode()
}

fn cmd_info(path: &Path, options: DecodeOptions) -> Result<()> {
    tracing::info!("Opening document: {}", path.display());
    let doc = open(path, options).with_context(|| format!("failed to decode {}", path.display()))?;

    println!("Document: {}", path.display());
    println!("Version:  {}", doc.version().unwrap_or("unknown"));
    if let Some(asset) = doc.asset() {
        if let Some(tool) = asset.contributors.iter().find_map(|c| c.authoring_tool.as_deref()) {
            println!("Tool:     {tool}");
        }
        println!("Unit:     {} ({} m)", asset.unit.name, asset.unit.meter);
        println!("Up axis:  {}", asset.up_axis.as_str());
    }
    println!();

    println!("Libraries:");
    for kind in LibraryKind::ALL {
        println!("  {:<20} {}", kind.tag(), doc.library_len(kind));
    }
    println!();
    println!("Ids:        {}", doc.registry().len());
    println!("Unresolved: {}", doc.unresolved().len());
    println!("Warnings:   {}", doc.diagnostics().len());
    Ok(())
}

fn cmd_tree(path: &Path, options: DecodeOptions) -> Result<()> {
    let doc = open(path, options).with_context(|| format!("failed to decode {}", path.display()))?;
    println!("Document: {}", path.display());
    println!();
    print!("{}", doc.dump_string());
    Ok(())
}

fn cmd_check(files: &[PathBuf], options: &DecodeOptions) -> Result<()> {
    let results: Vec<_> = files
        .par_iter()
        .map(|path| (path, open(path, options.clone())))
        .collect();

    let mut failed = 0;
    for (path, result) in results {
        match result {
            Ok(doc) => {
                println!("ok    {} ({} warnings)", path.display(), doc.diagnostics().len());
                for warning in doc.diagnostics() {
                    println!("        {warning}");
                }
            }
            Err(e) => {
                failed += 1;
                println!("FAIL  {}: {}", path.display(), e);
                for warning in &e.diagnostics {
                    println!("        {warning}");
                }
            }
        }
    }

    println!();
    println!("{} checked, {} failed", files.len(), failed);
    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_json(path: &Path, options: DecodeOptions) -> Result<()> {
    if !path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
        anyhow::bail!("{} is not a .json document", path.display());
    }
    cmd_tree(path, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NESTED_JSON: &str = r#"{ "COLLADA": { "library_animations": { "animation": { "animation": {} } } } }"#;

    #[test]
    fn test_open_json_honours_options() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested.json");
        std::fs::write(&path, NESTED_JSON).unwrap();

        let doc = open(&path, DecodeOptions::default()).unwrap();
        assert_eq!(doc.library_len(LibraryKind::Animations), 2);

        let shallow = DecodeOptions {
            max_depth: 3,
            ..DecodeOptions::default()
        };
        let err = open(&path, shallow).unwrap_err();
        assert!(matches!(err.error, collada::Error::DepthLimitExceeded { limit: 3 }));
    }

    #[test]
    fn test_open_dae_honours_options() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dangling.dae");
        std::fs::write(
            &path,
            r##"<COLLADA><library_materials><material><instance_effect url="#gone"/></material></library_materials></COLLADA>"##,
        )
        .unwrap();

        assert_eq!(open(&path, DecodeOptions::default()).unwrap().unresolved().len(), 1);
        assert!(open(&path, DecodeOptions::strict()).is_err());
        assert!(matches!(
            open(&dir.path().join("missing.json"), DecodeOptions::default()).unwrap_err().error,
            collada::Error::FileNotFound(_)
        ));
    }
}
