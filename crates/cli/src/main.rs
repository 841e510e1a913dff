//! # xlnode-cli
//!
//! Command-line front end for the Excel Writer and Markdown to Word nodes.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde_json::{Map, Value as JsonValue};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use xlnode_core::{
    BinaryData, ExcelWriterNode, Item, MemoryStore, NodeConfig, OperationKind, XLSX_MIME_TYPE,
};
use xlnode_markdown::{convert, MarkdownParams};

/// xlnode - write workflow payloads into Excel workbooks
#[derive(Parser)]
#[command(name = "xlnode")]
#[command(author, version, about = "Write payloads into Excel workbooks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Write a payload into a workbook
    Write(WriteArgs),
    /// Convert a Markdown file to a Word document
    Md2docx {
        /// Markdown file
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        /// Destination .docx file
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
    },
}

#[derive(clap::Args)]
struct WriteArgs {
    /// Source workbook
    #[arg(long, value_name = "FILE")]
    workbook: PathBuf,

    /// Destination workbook
    #[arg(long, value_name = "FILE")]
    output: PathBuf,

    /// What to write
    #[arg(long, value_enum)]
    operation: Option<OperationArg>,

    /// Payload attachment (JSON document, text file or image)
    #[arg(long, value_name = "FILE")]
    payload: Option<PathBuf>,

    /// JSON object used as the item's body
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Target sheet name
    #[arg(long)]
    sheet: Option<String>,

    /// 1-based record index; written to row N + 1
    #[arg(long)]
    serial: Option<u32>,

    /// Column title for text and image writes
    #[arg(long)]
    header: Option<String>,

    /// Node configuration file (JSON); flags override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

/// Operation selected on the command line.
#[derive(Clone, Copy, clap::ValueEnum)]
enum OperationArg {
    /// Write a JSON record, one column per key
    #[value(alias = "json")]
    Record,
    /// Write a text string
    Text,
    /// Insert an image
    Image,
}

impl From<OperationArg> for OperationKind {
    fn from(arg: OperationArg) -> Self {
        match arg {
            OperationArg::Record => OperationKind::Record,
            OperationArg::Text => OperationKind::Text,
            OperationArg::Image => OperationKind::Image,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    }

    let result = match cli.command {
        Command::Write(args) => run_write(args).await,
        Command::Md2docx { input, output } => run_md2docx(&input, &output).await,
    };

    if let Err(e) = &result {
        eprintln!("{} {e:#}", "Error:".red().bold());
    }
    result
}

/// Build the node configuration from the config file and flags.
fn build_config(args: &WriteArgs) -> Result<NodeConfig> {
    let mut config = match &args.config {
        Some(path) => NodeConfig::from_json_file(path)?,
        None => NodeConfig::default(),
    };
    if let Some(operation) = args.operation {
        config.operation = operation.into();
    }
    if let Some(sheet) = &args.sheet {
        config.sheet_name.clone_from(sheet);
    }
    if let Some(serial) = args.serial {
        config.serial_number = serial;
    }
    if let Some(header) = &args.header {
        config.header_title.clone_from(header);
    }
    if let Some(name) = args.output.file_name().and_then(|n| n.to_str()) {
        config.output_file_name = name.to_string();
    }
    Ok(config)
}

async fn attachment(path: &Path, mime_type: &str) -> Result<BinaryData> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("attachment");
    Ok(BinaryData::from_bytes(&bytes, name, mime_type))
}

async fn run_write(args: WriteArgs) -> Result<()> {
    let config = build_config(&args)?;
    tracing::info!(
        workbook = %args.workbook.display(),
        operation = ?config.operation,
        sheet = %config.sheet_name,
        "writing payload"
    );

    let body = match &args.json {
        Some(path) => {
            let source = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read file: {}", path.display()))?;
            let value: JsonValue = serde_json::from_str(&source)
                .with_context(|| format!("Invalid JSON in {}", path.display()))?;
            match value {
                JsonValue::Object(map) => map,
                _ => bail!("{} must contain a JSON object", path.display()),
            }
        }
        None => Map::new(),
    };

    let mut item = Item::from_json(body).with_binary(
        config.spreadsheet_field.as_str(),
        attachment(&args.workbook, XLSX_MIME_TYPE).await?,
    );
    if let Some(path) = &args.payload {
        item = item.with_binary(
            config.payload_field.as_str(),
            attachment(path, "application/octet-stream").await?,
        );
    }

    let node = ExcelWriterNode::new(MemoryStore::new());
    let output = node.execute(&[item], &config).await?;
    let binary = output
        .first()
        .and_then(|item| item.binary.get(&config.output_field))
        .context("node produced no workbook")?;

    let bytes = binary.decode_inline()?;
    tokio::fs::write(&args.output, &bytes)
        .await
        .with_context(|| format!("Failed to write file: {}", args.output.display()))?;

    println!(
        "{} {} ({} bytes)",
        "Wrote".green().bold(),
        args.output.display(),
        bytes.len()
    );
    Ok(())
}

async fn run_md2docx(input: &Path, output: &Path) -> Result<()> {
    let markdown_text = tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("Failed to read file: {}", input.display()))?;
    let file_name = output
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document.docx")
        .to_string();

    let item = convert(&MarkdownParams {
        markdown_text,
        file_name,
    })?;
    let binary = item.binary.get("data").context("node produced no document")?;
    let bytes = binary.decode_inline()?;
    tokio::fs::write(output, &bytes)
        .await
        .with_context(|| format!("Failed to write file: {}", output.display()))?;

    println!(
        "{} {} ({} bytes)",
        "Wrote".green().bold(),
        output.display(),
        bytes.len()
    );
    Ok(())
}
