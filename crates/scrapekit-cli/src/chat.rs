//! Line-oriented chat front end
//!
//! Reads one message per line from stdin and writes one reply per message,
//! accepting the same commands a chat bot would.

use scrapekit::{ScrapeRequest, Tool};
use std::io::{self, BufRead};
use tracing::debug;

pub const GREETING: &str = "Hi! Send me a link and I will collect the table from it.";

pub const USAGE: &str = "Commands:
/table <url> - rows of the first table
/headlines <url> - all h3 headlines
/top <n> <url> - first n headlines, numbered
/find <url> <keyword...> - headlines containing the keyword
A bare link works like /table.";

/// A parsed chat message
#[derive(Debug, Clone)]
pub enum ChatCommand {
    Start,
    Help,
    Scrape(ScrapeRequest),
}

/// Parse one chat message
///
/// Returns the reply text on malformed input.
pub fn parse_command(line: &str) -> Result<ChatCommand, String> {
    let line = line.trim();
    let mut parts = line.split_whitespace();
    let Some(first) = parts.next() else {
        return Err(USAGE.to_string());
    };

    if !first.starts_with('/') {
        if parts.next().is_some() {
            return Err(USAGE.to_string());
        }
        return Ok(ChatCommand::Scrape(ScrapeRequest::new(first).table()));
    }

    // "/table@SomeBot" addresses a specific bot in group chats
    let command = first.split('@').next().unwrap_or(first);
    let args: Vec<&str> = parts.collect();

    match (command, args.as_slice()) {
        ("/start", _) => Ok(ChatCommand::Start),
        ("/help", _) => Ok(ChatCommand::Help),
        ("/table", [url]) => Ok(ChatCommand::Scrape(ScrapeRequest::new(*url).table())),
        ("/headlines", [url]) => Ok(ChatCommand::Scrape(
            ScrapeRequest::new(*url).elements("h3"),
        )),
        ("/top", [n, url]) => {
            let n: usize = n
                .parse()
                .map_err(|_| format!("Not a number: {}\n\n{}", n, USAGE))?;
            Ok(ChatCommand::Scrape(
                ScrapeRequest::new(*url).elements("h3").top(n),
            ))
        }
        ("/find", [url, keyword @ ..]) if !keyword.is_empty() => Ok(ChatCommand::Scrape(
            ScrapeRequest::new(*url)
                .elements("h3")
                .keyword(keyword.join(" ")),
        )),
        _ => Err(USAGE.to_string()),
    }
}

/// Reply to a single message
pub async fn respond(tool: &Tool, line: &str) -> String {
    match parse_command(line) {
        Ok(ChatCommand::Start) => GREETING.to_string(),
        Ok(ChatCommand::Help) => USAGE.to_string(),
        Ok(ChatCommand::Scrape(req)) => {
            debug!(url = %req.url, mode = %req.effective_mode(), "Chat request");
            tool.reply(req).await
        }
        Err(usage) => usage,
    }
}

/// Run the chat loop until stdin closes
pub async fn run_chat(tool: Tool) {
    let stdin = io::stdin();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error reading stdin: {}", e);
                continue;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let reply = respond(&tool, &line).await;
        crate::writeln_safe(&reply);
        crate::writeln_safe("");
    }
}
