use std::sync::Arc;

use counter_app::{render, Config, CounterPage, UreqTransport};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

const HELP: &str = "Enter or '+': increment, 'r': refresh, 'q': quit";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the page.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    info!(base_url = %config.base_url, "starting counter page");
    let page = Arc::new(CounterPage::new(&config, UreqTransport::new()));

    let mut updates = page.subscribe();
    println!("{}\n", render(&updates.borrow_and_update()));
    tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let text = render(&updates.borrow_and_update());
            println!("{text}\n");
        }
    });

    page.activate().await;
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" | "+" | "i" => {
                let _ = page.press_increment();
            }
            "r" => {
                let page = Arc::clone(&page);
                tokio::spawn(async move { page.refresh().await });
            }
            "q" => break,
            other => warn!(input = other, "unknown command; {HELP}"),
        }
    }
    Ok(())
}
