use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use cite_master::citation::{
    batch_generate_citations, describe_rules, export_bibliography, generate_citation,
    RuleDescription,
};
use cite_master::config::{
    find_config_file, get_config, load_config, write_default_config, Config,
};
use cite_master::extract::MetadataExtractor;
use cite_master::mcp::server::McpServer;
use cite_master::models::{
    CitationRequest, CitationResult, ExtractionResult, GeneratedCitation, Style,
};
use is_terminal::IsTerminal;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Cite Master - Extract page metadata and format APA/MLA citations
#[derive(Parser, Debug)]
#[command(name = "cite-master")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract page metadata and format APA/MLA citations", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Fetch timeout in seconds (overrides configuration)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

impl OutputFormat {
    fn resolve(self) -> Self {
        match self {
            OutputFormat::Auto if std::io::stdout().is_terminal() => OutputFormat::Table,
            OutputFormat::Auto => OutputFormat::Json,
            other => other,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract citation metadata from web pages
    #[command(alias = "x")]
    Extract {
        /// Page URLs
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Format a single citation
    #[command(alias = "c")]
    Cite {
        /// Source type: website, book or journal
        source_type: String,

        /// Citation style (default from configuration)
        #[arg(long, short)]
        style: Option<String>,

        /// Read source fields from a JSON file instead of flags
        #[arg(long, conflicts_with_all = ["author", "authors", "title", "date", "publisher", "url", "journal", "volume", "issue", "year", "pages", "doi"])]
        json: Option<PathBuf>,

        /// Website author display name
        #[arg(long)]
        author: Option<String>,

        /// Book or journal author (repeat for several)
        #[arg(long = "authors", short = 'a')]
        authors: Vec<String>,

        #[arg(long)]
        title: Option<String>,

        /// Website publication date
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        publisher: Option<String>,

        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        journal: Option<String>,

        #[arg(long)]
        volume: Option<String>,

        #[arg(long)]
        issue: Option<String>,

        #[arg(long)]
        year: Option<String>,

        #[arg(long)]
        pages: Option<String>,

        #[arg(long)]
        doi: Option<String>,
    },

    /// Format every item in a JSON file
    #[command(alias = "b")]
    Batch {
        /// JSON file with an array of items, or {"style": ..., "items": [...]}
        input: PathBuf,

        /// Citation style (overrides the file and configuration)
        #[arg(long, short)]
        style: Option<String>,

        /// Print a sorted bibliography instead of per-item results
        #[arg(long)]
        bibliography: bool,
    },

    /// Show the field order and guidelines for a style and source type
    Rules {
        /// Citation style
        style: String,

        /// Source type
        source_type: String,
    },

    /// Start the MCP server
    Serve {
        /// Run in stdio mode (for MCP clients)
        #[arg(long, default_value_t = true)]
        stdio: bool,

        /// Run in streamable HTTP mode (overrides --stdio)
        #[arg(long)]
        http: bool,

        /// Port for HTTP mode
        #[arg(long, short, default_value_t = 3000)]
        port: u16,

        /// Host to bind to for HTTP mode
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Write a default configuration file
    InitConfig {
        /// Destination (default: ./cite-master.toml)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },
}

/// Contents of a batch input file
#[derive(Deserialize)]
#[serde(untagged)]
enum BatchFile {
    Items(Vec<CitationRequest>),
    Document {
        #[serde(default)]
        style: Option<String>,
        items: Vec<CitationRequest>,
    },
}

fn init_tracing(cli: &Cli, config: &Config) {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => config.logging.level.as_str(),
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("cite_master={}", level)),
    );
    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries results and the MCP stdio transport
    if config.logging.format.as_deref() == Some("json") {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from file if specified or found in default locations
    let config_path = cli.config.clone().or_else(find_config_file);
    let mut config = match &config_path {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => get_config(),
    };
    if let Some(timeout) = cli.timeout {
        config.extractor.timeout_secs = timeout;
    }

    init_tracing(&cli, &config);
    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    let format = cli.output.resolve();

    match cli.command {
        Some(Commands::Extract { urls }) => {
            let extractor = MetadataExtractor::new(&config.extractor)?;
            let results = extractor.batch_extract(&urls).await;
            output_extractions(&results, format)?;
        }

        Some(Commands::Cite {
            source_type,
            style,
            json,
            author,
            authors,
            title,
            date,
            publisher,
            url,
            journal,
            volume,
            issue,
            year,
            pages,
            doi,
        }) => {
            let style = style.unwrap_or_else(|| config.citation.default_style.clone());
            let fields = match json {
                Some(path) => read_json(&path)?,
                None => {
                    let mut request = CitationRequest::new(source_type.as_str());
                    if !authors.is_empty() {
                        request = request.field("authors", authors);
                    }
                    for (name, value) in [
                        ("author", author),
                        ("title", title),
                        ("date", date),
                        ("publisher", publisher),
                        ("url", url),
                        ("journal", journal),
                        ("volume", volume),
                        ("issue", issue),
                        ("year", year),
                        ("pages", pages),
                        ("doi", doi),
                    ] {
                        if let Some(value) = value {
                            request = request.field(name, value);
                        }
                    }
                    serde_json::Value::Object(request.fields)
                }
            };

            let generated = generate_citation(&source_type, &style, fields)?;
            output_citation(&generated, format)?;
        }

        Some(Commands::Batch {
            input,
            style,
            bibliography,
        }) => {
            let (file_style, items) = match serde_json::from_value(read_json(&input)?)
                .with_context(|| format!("Invalid batch file {}", input.display()))?
            {
                BatchFile::Items(items) => (None, items),
                BatchFile::Document { style, items } => (style, items),
            };
            let style = style
                .or(file_style)
                .unwrap_or_else(|| config.citation.default_style.clone());

            if bibliography {
                println!("{}", export_bibliography(&items, &style));
            } else {
                let results = batch_generate_citations(&items, &style);
                output_batch(&results, format)?;
            }
        }

        Some(Commands::Rules { style, source_type }) => {
            let description = describe_rules(&style, &source_type)?;
            output_rules(&description, format)?;
        }

        Some(Commands::Serve {
            stdio,
            http,
            port,
            host,
        }) => {
            let server = McpServer::from_config(&config)?;

            // Use HTTP mode if --http flag is provided, otherwise use --stdio flag
            if http || !stdio {
                let addr = format!("{}:{}", host, port);
                let (bound_addr, handle) = server.run_http(&addr).await?;
                tracing::info!("MCP server listening on {}", bound_addr);

                handle
                    .await
                    .map_err(|e| anyhow::anyhow!("Server task failed: {}", e))?;
            } else {
                server.run().await?;
            }
        }

        Some(Commands::InitConfig { path, force }) => {
            let path = path.unwrap_or_else(|| PathBuf::from("cite-master.toml"));
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            write_default_config(&path)?;
            if !cli.quiet {
                println!("Wrote default configuration to {}", path.display());
            }
        }

        None => {
            println!("Styles: {}", style_names());
            println!("Source types: website, book, journal");
            println!("Run `cite-master --help` for usage.");
        }
    }

    Ok(())
}

fn style_names() -> String {
    Style::ALL
        .iter()
        .map(Style::name)
        .collect::<Vec<_>>()
        .join(", ")
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn new_table(header: Vec<&str>) -> comfy_table::Table {
    let mut table = comfy_table::Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(header);
    table
}

fn output_extractions(results: &[ExtractionResult], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(results)?),
        OutputFormat::Plain => {
            for result in results {
                println!("{}", result.url);
                match (&result.metadata, &result.error) {
                    (Some(metadata), _) => {
                        println!("  Title: {}", metadata.title);
                        println!("  Author: {}", metadata.author);
                        println!("  Date: {}", metadata.date);
                        println!("  Publisher: {}", metadata.publisher);
                    }
                    (None, error) => {
                        println!("  Error: {}", error.as_deref().unwrap_or_default())
                    }
                }
                println!();
            }
        }
        _ => {
            use comfy_table::{Attribute, Cell};
            let mut table = new_table(vec!["URL", "Title", "Author", "Date", "Publisher"]);
            for result in results {
                let row = match &result.metadata {
                    Some(m) => vec![
                        Cell::new(&result.url),
                        Cell::new(&m.title).add_attribute(Attribute::Bold),
                        Cell::new(&m.author),
                        Cell::new(&m.date),
                        Cell::new(&m.publisher),
                    ],
                    None => vec![
                        Cell::new(&result.url),
                        Cell::new(result.error.as_deref().unwrap_or_default()),
                        Cell::new(""),
                        Cell::new(""),
                        Cell::new(""),
                    ],
                };
                table.add_row(row);
            }
            println!("{table}");
        }
    }
    Ok(())
}

fn output_citation(generated: &GeneratedCitation, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(generated)?),
        _ => println!("{}", generated.citation),
    }
    Ok(())
}

fn output_batch(results: &[CitationResult], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(results)?),
        OutputFormat::Plain => {
            for (i, result) in results.iter().enumerate() {
                match (&result.citation, &result.error) {
                    (Some(citation), _) => println!("{}. {}", i + 1, citation),
                    (None, error) => println!(
                        "{}. [error] {}",
                        i + 1,
                        error.as_deref().unwrap_or_default()
                    ),
                }
            }
        }
        _ => {
            let mut table = new_table(vec!["#", "Status", "Citation"]);
            for (i, result) in results.iter().enumerate() {
                let (status, text) = match (&result.citation, &result.error) {
                    (Some(citation), _) => ("ok", citation.as_str()),
                    (None, error) => ("failed", error.as_deref().unwrap_or_default()),
                };
                table.add_row(vec![(i + 1).to_string(), status.to_string(), text.to_string()]);
            }
            println!("{table}");
        }
    }
    Ok(())
}

fn output_rules(description: &RuleDescription, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(description)?),
        OutputFormat::Plain => {
            println!(
                "{} {}: {}",
                description.style,
                description.source_type,
                description.field_order.join(" -> ")
            );
            for field in &description.fields {
                println!("  {}{}", field.name, if field.required { " (required)" } else { "" });
                for guideline in &field.guidelines {
                    println!("    - {}", guideline);
                }
            }
        }
        _ => {
            let mut table = new_table(vec!["Field", "Required", "Guidelines"]);
            for field in &description.fields {
                table.add_row(vec![
                    field.name.clone(),
                    if field.required { "yes" } else { "no" }.to_string(),
                    field.guidelines.join("\n"),
                ]);
            }
            println!("{table}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["cite-master"]);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert_eq!(cli.output, OutputFormat::Auto);
        assert!(cli.timeout.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::parse_from(["cite-master", "-vv"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_output_format_resolve_keeps_explicit() {
        assert_eq!(OutputFormat::Plain.resolve(), OutputFormat::Plain);
        assert_eq!(OutputFormat::Json.resolve(), OutputFormat::Json);
    }

    #[test]
    fn test_cli_extract_command() {
        let cli = Cli::parse_from(["cite-master", "extract", "https://a.example", "https://b.example"]);
        match cli.command {
            Some(Commands::Extract { urls }) => assert_eq!(urls.len(), 2),
            _ => panic!("Expected Extract command"),
        }
    }

    #[test]
    fn test_cli_cite_command() {
        let cli = Cli::parse_from([
            "cite-master",
            "cite",
            "journal",
            "--style",
            "mla",
            "-a",
            "Ann Lee",
            "-a",
            "Bo Chen",
            "--volume",
            "12",
        ]);
        match cli.command {
            Some(Commands::Cite {
                source_type,
                style,
                authors,
                volume,
                ..
            }) => {
                assert_eq!(source_type, "journal");
                assert_eq!(style.as_deref(), Some("mla"));
                assert_eq!(authors, vec!["Ann Lee", "Bo Chen"]);
                assert_eq!(volume.as_deref(), Some("12"));
            }
            _ => panic!("Expected Cite command"),
        }
    }

    #[test]
    fn test_cli_cite_json_conflicts_with_flags() {
        let result = Cli::try_parse_from([
            "cite-master",
            "cite",
            "book",
            "--json",
            "book.json",
            "--title",
            "X",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_serve_command() {
        let cli = Cli::parse_from(["cite-master", "serve"]);
        match &cli.command {
            Some(Commands::Serve {
                stdio, port, host, ..
            }) => {
                assert!(*stdio);
                assert_eq!(*port, 3000);
                assert_eq!(host, "127.0.0.1");
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_batch_file_shapes() {
        let items: BatchFile =
            serde_json::from_str(r#"[{"sourceType": "book", "title": "T"}]"#).unwrap();
        assert!(matches!(items, BatchFile::Items(ref v) if v.len() == 1));

        let document: BatchFile = serde_json::from_str(
            r#"{"style": "MLA", "items": [{"sourceType": "book"}]}"#,
        )
        .unwrap();
        assert!(matches!(document, BatchFile::Document { style: Some(ref s), .. } if s == "MLA"));
    }
}
