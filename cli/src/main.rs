//! pdfdata CLI - command-line client for the PDFDATA.io API

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;

use pdfdata::codec::timestamp;
use pdfdata::model::{Document, ProcessedDocument, ResultData};
use pdfdata::{Client, ClientOptions, Operation, Proc, ProcConfig, TextLayout};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "pdfdata")]
#[command(version)]
#[command(about = "Upload PDFs and run extraction procs on PDFDATA.io", long_about = None)]
struct Cli {
    /// API endpoint
    #[arg(long, global = true, env = "PDFDATA_ENDPOINT")]
    endpoint: Option<String>,

    /// API key
    #[arg(long, global = true, env = "PDFDATA_APIKEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Print raw JSON responses instead of summaries
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show API information
    Info,

    /// Upload source documents
    Upload {
        /// Files to upload
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Tag to attach to every uploaded document (repeatable)
        #[arg(short, long = "tag", value_name = "TAG")]
        tags: Vec<String>,
    },

    /// List stored documents
    #[command(alias = "docs")]
    Documents {
        /// Only list documents created before this time (yyyy-MM-ddTHH:mm:ssZ)
        #[arg(long, value_name = "TIMESTAMP")]
        before: Option<String>,
    },

    /// Show one stored document
    Document {
        /// Document ID
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Start or retrieve procs
    #[command(subcommand)]
    Proc(ProcCommands),

    /// Download a resource
    Resource {
        /// Resource ID
        #[arg(value_name = "ID")]
        id: String,

        /// Output file (defaults to the resource ID)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ProcCommands {
    /// Start a new proc
    Start(StartArgs),

    /// Retrieve a proc
    Get {
        /// Proc ID
        #[arg(value_name = "ID")]
        id: String,

        /// Download every resource of the proc into this directory
        #[arg(short, long, value_name = "DIR")]
        download: Option<PathBuf>,
    },
}

#[derive(Args)]
struct StartArgs {
    /// Files to upload and process (repeatable)
    #[arg(short, long = "file", value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Stored documents to process, by ID (repeatable)
    #[arg(short, long = "doc", value_name = "ID")]
    docs: Vec<String>,

    /// Tags selecting stored documents (repeatable)
    #[arg(short, long = "tag", value_name = "TAG")]
    tags: Vec<String>,

    /// Operations to apply, in order (repeatable)
    #[arg(short, long = "op", value_enum, required = true)]
    ops: Vec<OpKind>,

    /// Layout of `text` operations
    #[arg(long, value_enum, default_value = "preserve")]
    layout: LayoutMode,

    /// Seconds to wait for the proc to complete
    #[arg(short, long, value_name = "SECONDS")]
    wait: Option<u32>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OpKind {
    /// Document metadata
    Metadata,
    /// XMP metadata
    XmpMetadata,
    /// Embedded images
    Images,
    /// Page text
    Text,
    /// Embedded file attachments
    Attachments,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum LayoutMode {
    /// Approximate the visual page layout
    Preserve,
    /// Content-stream order
    Decompose,
}

impl From<LayoutMode> for TextLayout {
    fn from(mode: LayoutMode) -> Self {
        match mode {
            LayoutMode::Preserve => TextLayout::Preserve,
            LayoutMode::Decompose => TextLayout::Decompose,
        }
    }
}

impl OpKind {
    fn to_operation(self, layout: LayoutMode) -> Operation {
        match self {
            OpKind::Metadata => Operation::Metadata,
            OpKind::XmpMetadata => Operation::XmpMetadata,
            OpKind::Images => Operation::Images,
            OpKind::Text => Operation::text_with_layout(layout.into()),
            OpKind::Attachments => Operation::Attachments,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = connect(&cli).and_then(|client| match cli.command {
        Commands::Info => cmd_info(&client, cli.json),
        Commands::Upload { files, tags } => cmd_upload(&client, &files, tags, cli.json),
        Commands::Documents { before } => cmd_documents(&client, before.as_deref(), cli.json),
        Commands::Document { id } => cmd_document(&client, &id, cli.json),
        Commands::Proc(ProcCommands::Start(args)) => cmd_proc_start(&client, args, cli.json),
        Commands::Proc(ProcCommands::Get { id, download }) => {
            cmd_proc_get(&client, &id, download.as_deref(), cli.json)
        }
        Commands::Resource { id, output } => cmd_resource(&client, &id, output.as_deref()),
    });

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn connect(cli: &Cli) -> Result<Client, Box<dyn std::error::Error>> {
    let mut options = ClientOptions::new().with_capture_response_bodies(cli.json);
    if let Some(endpoint) = &cli.endpoint {
        options = options.with_endpoint_str(endpoint)?;
    }
    if let Some(key) = &cli.api_key {
        options = options.with_api_key(key.as_str());
    }
    log::debug!("Using endpoint {}", options.endpoint);
    Ok(Client::new(options)?)
}

fn print_raw(body: Option<&serde_json::Value>) -> CliResult {
    if let Some(body) = body {
        println!("{}", serde_json::to_string_pretty(body)?);
    }
    Ok(())
}

fn cmd_info(client: &Client, json: bool) -> CliResult {
    let info = client.info().get()?;
    if json {
        return print_raw(info.response_body());
    }

    println!("{}", "PDFDATA.io".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Endpoint".bold(), client.endpoint());
    println!("{}: {}", "API version".bold(), info.api_version);
    println!("{}: {}", "Build".bold(), info.build);
    if !info.message.is_empty() {
        println!("{}: {}", "Message".bold(), info.message);
    }
    Ok(())
}

fn cmd_upload(client: &Client, files: &[PathBuf], tags: Vec<String>, json: bool) -> CliResult {
    let docs = client.documents().upload_tagged(tags, files)?;
    if json {
        for doc in &docs {
            print_raw(doc.response_body())?;
        }
        return Ok(());
    }

    for doc in &docs {
        println!("{} {}", "Uploaded".green(), doc.filename);
        print_document(doc);
    }
    Ok(())
}

fn cmd_documents(client: &Client, before: Option<&str>, json: bool) -> CliResult {
    let docs = match before {
        Some(ts) => client.documents().list_before(timestamp::parse(ts)?)?,
        None => client.documents().list()?,
    };
    if json {
        for doc in &docs {
            print_raw(doc.response_body())?;
        }
        return Ok(());
    }

    for doc in &docs {
        print_document(doc);
    }
    println!("\n{} {} documents", "Total:".green().bold(), docs.len());
    Ok(())
}

fn cmd_document(client: &Client, id: &str, json: bool) -> CliResult {
    let doc = client.documents().by_id(id)?;
    if json {
        return print_raw(doc.response_body());
    }
    print_document(&doc);
    Ok(())
}

fn cmd_proc_start(client: &Client, args: StartArgs, json: bool) -> CliResult {
    let operations: Vec<Operation> = args
        .ops
        .iter()
        .map(|op| op.to_operation(args.layout))
        .collect();

    let mut config = ProcConfig::new()
        .with_files(args.files)
        .with_document_ids(args.docs)
        .with_tags(args.tags)
        .with_operations(operations);
    if let Some(wait) = args.wait {
        config = config.with_wait(wait);
    }

    let proc = client.procs().start(&config)?;
    if json {
        return print_raw(proc.response_body());
    }
    print_proc(&proc);
    Ok(())
}

fn cmd_proc_get(client: &Client, id: &str, download: Option<&Path>, json: bool) -> CliResult {
    let proc = client.procs().by_id(id)?;
    if json {
        print_raw(proc.response_body())?;
    } else {
        print_proc(&proc);
    }
    match download {
        Some(dir) => download_resources(client, &proc, dir),
        None => Ok(()),
    }
}

fn download_resources(client: &Client, proc: &Proc, dir: &Path) -> CliResult {
    fs::create_dir_all(dir)?;
    let mut count = 0usize;
    for doc in proc.documents() {
        for result in doc.results() {
            for (id, resource) in result.resources() {
                let data = client.fetch(resource)?;
                let path = dir.join(resource.suggested_filename(id));
                fs::write(&path, &data)?;
                log::debug!("Saved {} ({} bytes)", path.display(), data.len());
                count += 1;
            }
        }
    }
    eprintln!("{} {} resources to {}", "Saved".green(), count, dir.display());
    Ok(())
}

fn cmd_resource(client: &Client, id: &str, output: Option<&Path>) -> CliResult {
    let data = client.resources().by_id(id)?;
    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(id));
    fs::write(&path, &data)?;
    println!(
        "{} {} ({} bytes)",
        "Saved to".green(),
        path.display(),
        data.len()
    );
    Ok(())
}

fn print_document(doc: &Document) {
    println!("{} {}", doc.id.cyan(), doc.filename.bold());
    println!("  {} {}", "├─ Pages:".dimmed(), doc.page_count);
    println!("  {} {}", "├─ Created:".dimmed(), timestamp::format(&doc.created));
    if let Some(expires) = &doc.expires {
        println!("  {} {}", "├─ Expires:".dimmed(), timestamp::format(expires));
    }
    let tags: Vec<&str> = doc.tags.iter().map(String::as_str).collect();
    println!("  {} {}", "└─ Tags:".dimmed(), tags.join(", "));
}

fn print_proc(proc: &Proc) {
    println!("{} {}", "Proc".cyan().bold(), proc.id);
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Status".bold(), proc.status);
    println!("{}: {}", "Created".bold(), timestamp::format(&proc.created));
    let ops: Vec<&str> = proc.operations().iter().map(Operation::tag).collect();
    println!("{}: {}", "Operations".bold(), ops.join(", "));

    if let Some(pending) = proc.pending_document_ids() {
        println!("{}: {} documents pending", "Documents".bold(), pending.len());
        for id in pending {
            println!("  {} {}", "•".dimmed(), id);
        }
        return;
    }

    println!();
    for doc in proc.documents() {
        print_processed(doc);
    }
}

fn print_processed(doc: &ProcessedDocument) {
    println!("{} {} ({} pages)", doc.id.cyan(), doc.filename.bold(), doc.page_count);
    for result in doc.results() {
        let summary = if result.is_failure() {
            "failed".red().to_string()
        } else {
            summarize(result.data())
        };
        println!("  {} {}: {}", "├─".dimmed(), result.tag(), summary);
        for (id, resource) in result.resources() {
            println!(
                "  {}   {} {} {}",
                "│".dimmed(),
                id,
                resource.mimetype().dimmed(),
                resource.url()
            );
        }
    }
}

fn summarize(data: &ResultData) -> String {
    match data {
        ResultData::Metadata(fields) | ResultData::XmpMetadata(fields) => {
            let count = fields.as_object().map(|o| o.len()).unwrap_or(0);
            format!("{} fields", count)
        }
        ResultData::Images(pages) => {
            let images: usize = pages.iter().map(|p| p.images.len()).sum();
            format!("{} images on {} pages", images, pages.len())
        }
        ResultData::Text(pages) => {
            let chars: usize = pages.iter().map(|p| p.text.chars().count()).sum();
            format!("{} characters on {} pages", chars, pages.len())
        }
        ResultData::Attachments(attachments) => format!("{} attachments", attachments.len()),
        ResultData::PageTemplates(matches) => format!("{} template matches", matches.len()),
    }
}
