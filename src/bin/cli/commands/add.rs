use anyhow::{Context, Result};

use crate::app::App;
use crate::render::terminal;
use crate::OutputFormat;

pub async fn run(
    app: &App,
    question: &str,
    answer: &str,
    pronunciation: Option<&str>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let card = app
        .store
        .add(question, answer, pronunciation)
        .await
        .context("Failed to add flashcard")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&terminal::card_json(&card))?);
        }
        OutputFormat::Plain => {
            println!("Added flashcard \"{}\"", terminal::truncate(&card.question, 60));
            println!("  ID: {}", card.id);
            println!(
                "  {}",
                terminal::paint(
                    &format!("{} flashcards total", app.store.snapshot().len()),
                    terminal::Color::DIM,
                    use_color,
                )
            );
        }
    }

    Ok(())
}
