use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::app::App;

pub async fn run(app: &App, yes: bool) -> Result<()> {
    if !yes && !confirm("Erase all stored flashcards? [y/N] ").await? {
        println!("Aborted.");
        return Ok(());
    }

    app.store.reset().await.context("Failed to clear storage")?;
    println!("All flashcard data erased.");

    Ok(())
}

async fn confirm(prompt: &str) -> Result<bool> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(prompt.as_bytes()).await?;
    stdout.flush().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let answer = lines.next_line().await?.unwrap_or_default();
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
