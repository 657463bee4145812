//! ScrapeKit CLI - pull tables and headlines out of web pages

mod chat;
mod mcp;

use clap::{Args, Parser, Subcommand, ValueEnum};
use scrapekit::{ScrapeRequest, ScrapeResponse, Tool, DEFAULT_MAX_LENGTH, TOOL_LLMTXT};
use std::io::{self, Write};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Output format for scrape subcommands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// Rendered text only
    #[default]
    Text,
    /// Full response as JSON
    Json,
}

/// ScrapeKit - fetch a page and reply with its table or headlines
#[derive(Parser, Debug)]
#[command(name = "scrapekit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    tool: ToolArgs,

    /// Print full help with examples (llmtxt)
    #[arg(long)]
    llmtxt: bool,
}

/// Settings shared by every subcommand
#[derive(Args, Debug)]
struct ToolArgs {
    /// Fetch timeout in seconds
    #[arg(long, global = true, default_value_t = 10)]
    timeout: u64,

    /// Maximum reply length in characters
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_LENGTH)]
    max_length: usize,

    /// Custom User-Agent
    #[arg(long, global = true)]
    user_agent: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the rows of the first table on a page
    Table {
        /// URL to fetch
        url: String,

        /// Output format
        #[arg(long, short, default_value = "text")]
        output: OutputFormat,
    },
    /// Print the text of elements matching a selector
    Elements {
        /// URL to fetch
        url: String,

        /// CSS selector
        #[arg(long, short, default_value = "h3")]
        selector: String,

        /// Keep only elements containing this keyword
        #[arg(long, short)]
        keyword: Option<String>,

        /// Keep only the first N elements, numbered
        #[arg(long)]
        top: Option<usize>,

        /// Output format
        #[arg(long, short, default_value = "text")]
        output: OutputFormat,
    },
    /// Answer chat commands read line by line from stdin
    Chat,
    /// Run as MCP (Model Context Protocol) server over stdio
    Mcp,
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    if cli.llmtxt {
        writeln_safe(TOOL_LLMTXT);
        std::process::exit(0);
    }

    let tool = build_tool(&cli.tool);

    match cli.command {
        Some(Commands::Table { url, output }) => {
            run_scrape(&tool, ScrapeRequest::new(url).table(), output).await;
        }
        Some(Commands::Elements {
            url,
            selector,
            keyword,
            top,
            output,
        }) => {
            let mut request = ScrapeRequest::new(url).elements(selector);
            if let Some(keyword) = keyword {
                request = request.keyword(keyword);
            }
            if let Some(top) = top {
                request = request.top(top);
            }
            run_scrape(&tool, request, output).await;
        }
        Some(Commands::Chat) => {
            chat::run_chat(tool).await;
        }
        Some(Commands::Mcp) => {
            mcp::run_server(tool).await;
        }
        None => {
            eprintln!("Usage: scrapekit table <URL>");
            eprintln!("   or: scrapekit elements <URL> [--selector h3] [--keyword K] [--top N]");
            eprintln!("   or: scrapekit chat");
            eprintln!("   or: scrapekit mcp");
            eprintln!("   or: scrapekit --help");
            std::process::exit(1);
        }
    }
}

/// Log to stderr; stdout carries replies and MCP traffic
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn build_tool(args: &ToolArgs) -> Tool {
    let mut builder = Tool::builder()
        .timeout(Duration::from_secs(args.timeout))
        .max_length(args.max_length);

    if let Some(ref ua) = args.user_agent {
        builder = builder.user_agent(ua.clone());
    }

    builder.build()
}

async fn run_scrape(tool: &Tool, request: ScrapeRequest, output: OutputFormat) {
    match tool.execute(request).await {
        Ok(response) => writeln_safe(&format_response(&response, output)),
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            std::process::exit(1);
        }
    }
}

fn format_response(response: &ScrapeResponse, output: OutputFormat) -> String {
    match output {
        OutputFormat::Text => response.text.clone(),
        OutputFormat::Json => serde_json::to_string_pretty(response).unwrap_or_else(|e| {
            eprintln!("Error serializing response: {}", e);
            std::process::exit(1);
        }),
    }
}

/// Write to stdout, exit silently on broken pipe
pub(crate) fn writeln_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", s) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("Error writing to stdout: {}", e);
        std::process::exit(1);
    }
}
