use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use funnelback_search::config::{default_config_path, find_config_file, load_settings, ConfigFile};
use funnelback_search::models::{ResultPage, DEFAULT_LIMIT};
use funnelback_search::{FunnelbackGateway, SearchRequest, SearchService};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Funnelback Search - query a hosted Funnelback collection from the terminal
#[derive(Parser, Debug)]
#[command(name = "funnelback-search")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search a Funnelback collection and show formatted results", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds (overrides config file and environment)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Show all environment variables
    #[arg(long, global = true)]
    env: bool,

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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search the configured collection
    #[command(alias = "s")]
    Search {
        /// Keyword(s) to search for
        keyword: String,

        /// Offset of the first result
        #[arg(long, default_value_t = 0)]
        start: usize,

        /// Number of results per page
        #[arg(long, short, default_value_t = DEFAULT_LIMIT as u64, value_parser = clap::value_parser!(u64).range(1..))]
        limit: u64,

        /// Sort key understood by Funnelback (empty = relevance)
        #[arg(long, default_value = "")]
        sort: String,
    },

    /// Write a template configuration file
    Init {
        /// Where to write the file (default: user config directory)
        #[arg(long, short)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },
}

/// Print all available environment variables
fn print_env_vars() {
    println!("Funnelback Search - Environment Variables");
    println!();
    println!("Connection (required):");
    println!("  FUNNELBACK_URL              Base URL of the Funnelback instance");
    println!("  FUNNELBACK_USERNAME         API username (HTTP basic auth)");
    println!("  FUNNELBACK_PASSWORD         API password (HTTP basic auth)");
    println!("  FUNNELBACK_COLLECTION       Collection to search");
    println!();
    println!("Optional:");
    println!("  FUNNELBACK_TIMEOUT_SECS     Request timeout in seconds (default: 30)");
    println!("  FUNNELBACK_USER_AGENT       User agent sent with each request");
    println!();
    println!("Other Settings:");
    println!("  RUST_LOG                    Rust logging level (e.g., debug, info, warn, error)");
    println!();
    println!("Example:");
    println!("  export FUNNELBACK_URL=\"https://search.example.com\"");
    println!("  export FUNNELBACK_COLLECTION=\"example-web\"");
    std::process::exit(0);
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Show environment variables and exit if requested
    if cli.env {
        print_env_vars();
    }

    let config_path = cli.config.clone().or_else(find_config_file);

    // Initialize tracing based on verbosity, falling back to the config file level
    let file_level = config_path
        .as_deref()
        .and_then(|path| ConfigFile::load(path).ok())
        .map(|file| file.logging.level);

    let log_level = match cli.verbose {
        0 => file_level.unwrap_or_else(|| "info".to_string()),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    let env_filter = if cli.quiet {
        "error".to_string()
    } else {
        log_level
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| format!("funnelback_search={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Some(Commands::Search {
            keyword,
            start,
            limit,
            sort,
        }) => {
            if let Some(path) = &config_path {
                tracing::info!("Using config file: {}", path.display());
            }

            let mut settings = load_settings(config_path.as_deref())?;
            if let Some(timeout) = cli.timeout {
                settings.timeout_secs = Some(timeout);
            }

            let gateway = FunnelbackGateway::from_settings(settings)?;
            let service = SearchService::new(Arc::new(gateway));

            let request = SearchRequest::new(keyword)
                .start(start)
                .limit(limit as usize)
                .sort(sort);
            let page = service.try_search(&request).await?;

            output_page(&page, cli.output)?;
            if !cli.quiet {
                eprintln!("{}", page_summary(&page));
            }
        }
        Some(Commands::Init { path, force }) => {
            let path = path
                .or_else(default_config_path)
                .context("Could not determine a config directory; pass --path")?;

            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }

            ConfigFile::template().save(&path)?;
            if !cli.quiet {
                println!("Wrote configuration template to {}", path.display());
            }
        }
        None => {
            eprintln!("No command given. Run with --help for usage.");
        }
    }

    Ok(())
}

fn page_summary(page: &ResultPage) -> String {
    if page.is_empty() {
        return format!("No results ({} total)", page.total_items);
    }

    format!(
        "Showing {}-{} of {} (page {} of {})",
        page.page_start + 1,
        page.page_start + page.len(),
        page.total_items,
        page.current_page(),
        page.total_pages()
    )
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", cut)
}

fn output_page(page: &ResultPage, format: OutputFormat) -> Result<()> {
    let actual_format = if format == OutputFormat::Auto {
        if std::io::stdout().is_terminal() {
            OutputFormat::Table
        } else {
            OutputFormat::Json
        }
    } else {
        format
    };

    match actual_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(page)?);
        }
        OutputFormat::Plain => {
            for item in &page.items {
                println!("{}", item.title);
                println!("  URL: {}", item.link);
                if !item.summary.is_empty() {
                    println!("  {}", item.summary);
                }
                println!();
            }
        }
        OutputFormat::Table => {
            use comfy_table::{Attribute, Cell, Table};
            let mut table = Table::new();
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.set_header(vec!["#", "Title", "Type", "Link"]);

            for (offset, item) in page.items.iter().enumerate() {
                table.add_row(vec![
                    Cell::new(page.page_start + offset + 1),
                    Cell::new(truncate(&item.title, 60)).add_attribute(Attribute::Bold),
                    Cell::new(&item.file_type),
                    Cell::new(truncate(&item.link, 60)),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Auto => unreachable!(),
    }

    Ok(())
}
