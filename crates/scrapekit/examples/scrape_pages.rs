//! Example: Scrape a few live pages and display results
//!
//! Run with: cargo run -p scrapekit --example scrape_pages
//!
//! Needs network access. Each case is one independent request.

use scrapekit::{scrape, ScrapeRequest, ScrapeResponse};

/// Test case definition
struct TestCase {
    description: &'static str,
    request: fn() -> ScrapeRequest,
    expect_contains: Option<&'static str>,
}

const TEST_CASES: &[TestCase] = &[
    TestCase {
        description: "Headline of a simple page",
        request: || ScrapeRequest::new("https://example.com").elements("h1"),
        expect_contains: Some("Example Domain"),
    },
    TestCase {
        description: "Headline filtered by keyword",
        request: || {
            ScrapeRequest::new("https://httpbin.org/html")
                .elements("h1")
                .keyword("melville")
        },
        expect_contains: Some("Herman Melville"),
    },
    TestCase {
        description: "First table of a Wikipedia article",
        request: || {
            ScrapeRequest::new("https://en.wikipedia.org/wiki/List_of_sovereign_states")
                .table()
                .max_length(800)
        },
        expect_contains: Some(" | "),
    },
    TestCase {
        description: "Page without tables",
        request: || ScrapeRequest::new("https://example.com").table(),
        expect_contains: Some("Nothing found."),
    },
];

#[tokio::main]
async fn main() {
    println!("ScrapeKit Examples");
    println!("==================\n");

    let mut passed = 0;
    let mut failed = 0;

    for (i, case) in TEST_CASES.iter().enumerate() {
        let request = (case.request)();
        println!("{}. {}", i + 1, case.description);
        println!("   URL: {}", request.url);

        match scrape(request).await {
            Ok(response) => {
                print_response_summary(&response);

                if check_expectations(case, &response) {
                    println!("   ✓ PASS\n");
                    passed += 1;
                } else {
                    println!("   ✗ FAIL (expectations not met)\n");
                    failed += 1;
                }
            }
            Err(e) => {
                println!("   Error: {}", e.user_message());
                println!("   ✗ FAIL\n");
                failed += 1;
            }
        }
    }

    println!("==================");
    println!("Results: {} passed, {} failed", passed, failed);

    if failed > 0 {
        std::process::exit(1);
    }
}

fn print_response_summary(response: &ScrapeResponse) {
    println!("   Status: {}", response.status_code);
    println!("   Items: {}", response.item_count);

    let preview = response.text.chars().take(100).collect::<String>();
    println!(
        "   Preview: {}{}",
        preview.replace('\n', " / "),
        if response.truncated { " (truncated)" } else { "" }
    );
}

fn check_expectations(case: &TestCase, response: &ScrapeResponse) -> bool {
    if let Some(expected_text) = case.expect_contains {
        if !response.text.contains(expected_text) {
            println!("   Expected text to contain '{}'", expected_text);
            return false;
        }
    }

    true
}
