use std::fs;
use std::io;
use std::process::ExitCode;

use archsketch::diagram::join_issues;
use archsketch::error::ErrorCode;
use archsketch::extract::extract_diagram;
use archsketch::layout::{self, VisualPrimitive};
use archsketch::llm::{LlmClient, LlmError};
use archsketch::{Diagram, DiagramRequest, GenerateError, generate_diagram};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("cannot read {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
}

impl ErrorCode for CliError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Read { .. } => "E_READ_INPUT",
            Self::Json(_) => "E_JSON",
            Self::Llm(e) => e.error_code(),
            Self::Generate(e) => e.error_code(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "archsketch", about = "Turn architecture descriptions into whiteboard diagrams")]
struct Cli {
    /// Log pipeline stages at debug level on stderr.
    #[arg(long, short, global = true, env = "ARCHSKETCH_VERBOSE")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask the configured model for a diagram and lay it out.
    Generate(GenerateArgs),
    /// Recover a diagram from raw completion text, offline.
    Extract(InputArgs),
    /// Lay out an existing diagram JSON.
    Layout(LayoutArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    prompt: String,

    #[arg(long, env = "LLM_MODEL")]
    model: Option<String>,

    #[arg(long, help = "Print a full scene document instead of bare primitives")]
    scene: bool,

    #[arg(long, help = "Print diagram, diagnostics, and primitives together")]
    diagnostics: bool,
}

#[derive(Args, Debug)]
struct InputArgs {
    #[arg(long, default_value = "-", help = "Input file path, or - for stdin")]
    input: String,
}

#[derive(Args, Debug)]
struct LayoutArgs {
    #[command(flatten)]
    input: InputArgs,

    #[arg(long, help = "Print a full scene document instead of bare primitives")]
    scene: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Loaded before parsing so env-backed flags see .env values.
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    if let Err(e) = dotenv {
        debug!(error = %e, "cli: no .env loaded");
    }

    let result = match cli.command {
        Command::Generate(args) => run_generate(args).await,
        Command::Extract(args) => run_extract(&args),
        Command::Layout(args) => run_layout(&args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error[{}]: {e}", e.error_code());
            ExitCode::FAILURE
        }
    }
}

async fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let client = LlmClient::from_env()?;
    let request = DiagramRequest { prompt: args.prompt, model: args.model };
    let generated = generate_diagram(&client, &request).await?;

    if args.diagnostics {
        print_json(&serde_json::to_value(&generated)?)
    } else {
        print_primitives(&generated.primitives, args.scene)
    }
}

fn run_extract(args: &InputArgs) -> Result<(), CliError> {
    let raw = read_input(&args.input)?;
    let extraction = extract_diagram(&raw);
    print_json(&serde_json::json!({
        "diagram": extraction.diagram,
        "diagnostics": extraction.diagnostics,
    }))
}

fn run_layout(args: &LayoutArgs) -> Result<(), CliError> {
    let raw = read_input(&args.input.input)?;
    let diagram: Diagram = serde_json::from_str(&raw)?;
    let issues = diagram.strict_issues();
    if !issues.is_empty() {
        warn!(issues = issues.len(), error = %join_issues(&issues), "cli: diagram exceeds strict limits");
    }
    print_primitives(&layout::synthesize(&diagram), args.scene)
}

fn read_input(path: &str) -> Result<String, CliError> {
    let read = if path == "-" { io::read_to_string(io::stdin()) } else { fs::read_to_string(path) };
    read.map_err(|source| CliError::Read { path: path.to_owned(), source })
}

fn print_primitives(primitives: &[VisualPrimitive], scene: bool) -> Result<(), CliError> {
    if scene {
        print_json(&layout::scene_document(primitives))
    } else {
        print_json(&serde_json::to_value(primitives)?)
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
