//! CLI tool for building PowerPoint decks from marker scripts.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use deck_core::{split_documents, tokenize, ImageFetcher, Renderer};
use deck_net::{HttpImageFetcher, DEFAULT_FETCH_TIMEOUT};
use deck_pptx::{PptxReader, PptxWriter};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Build PPTX decks from scripts of words and [IMAGE], [MIX] and [VIDEO] markers.
#[derive(Parser, Debug)]
#[command(name = "deck")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a script into one deck per document
    Build {
        /// Script file, or `-` for stdin
        script: PathBuf,

        /// Output directory (default: same as the script)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file stem (default: script name, or `output` for stdin)
        #[arg(short, long)]
        name: Option<String>,

        /// Timeout for each image download, in seconds
        #[arg(long, default_value_t = DEFAULT_FETCH_TIMEOUT.as_secs())]
        timeout_secs: u64,
    },

    /// Print the tokens of a script as JSON
    Tokens {
        /// Script file, or `-` for stdin
        script: PathBuf,
    },

    /// Print the slides and shapes of a PPTX file as JSON
    Inspect {
        /// PPTX file to read
        deck: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    match args.command {
        Command::Build {
            script,
            output,
            name,
            timeout_secs,
        } => {
            let fetcher = HttpImageFetcher::new(Duration::from_secs(timeout_secs.max(1)))
                .context("Failed to create image fetcher")?;
            let source = read_script(&script)?;
            let stem = name.unwrap_or_else(|| default_stem(&script));
            let dir = output_dir(&script, output.as_deref())?;

            for path in build(&fetcher, &source, &dir, &stem)? {
                println!("{}", path.display());
            }
        }
        Command::Tokens { script } => {
            let source = read_script(&script)?;
            let tokens = tokenize(&source);
            println!("{}", serde_json::to_string_pretty(&tokens)?);
        }
        Command::Inspect { deck } => {
            let file =
                File::open(&deck).with_context(|| format!("Failed to open {}", deck.display()))?;
            let summary = PptxReader::new()
                .read(BufReader::new(file))
                .with_context(|| format!("Failed to read {}", deck.display()))?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

/// Render every document of `source` and write one package per document.
///
/// A single document is written as `<stem>.pptx`; several are numbered
/// `<stem>-1.pptx`, `<stem>-2.pptx` and so on.
fn build<F: ImageFetcher>(fetcher: F, source: &str, dir: &Path, stem: &str) -> Result<Vec<PathBuf>> {
    let renderer = Renderer::new(fetcher);
    let writer = PptxWriter::new().with_title(stem);

    let documents = split_documents(source);
    let mut written = Vec::with_capacity(documents.len());

    for (index, document) in documents.iter().enumerate() {
        let deck = renderer
            .render_script(document)
            .with_context(|| format!("Failed to render document {}", index + 1))?;

        let path = if documents.len() == 1 {
            dir.join(format!("{}.pptx", stem))
        } else {
            dir.join(format!("{}-{}.pptx", stem, index + 1))
        };

        let file =
            File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
        writer
            .write(&deck, file)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        log::info!("Wrote {} slides to {}", deck.len(), path.display());
        written.push(path);
    }

    Ok(written)
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Read a script from a file or stdin.
fn read_script(path: &Path) -> Result<String> {
    let mut source = String::new();
    if is_stdin(path) {
        std::io::stdin()
            .read_to_string(&mut source)
            .context("Failed to read script from stdin")?;
    } else {
        File::open(path)
            .and_then(|mut f| f.read_to_string(&mut source))
            .with_context(|| format!("Failed to read {}", path.display()))?;
    }
    Ok(source)
}

fn default_stem(script: &Path) -> String {
    if is_stdin(script) {
        return "output".to_string();
    }
    script
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

/// Determine the output directory for a script.
fn output_dir(script: &Path, output: Option<&Path>) -> Result<PathBuf> {
    match output {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
            Ok(dir.to_path_buf())
        }
        None if is_stdin(script) => Ok(PathBuf::from(".")),
        None => Ok(script
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))),
    }
}
