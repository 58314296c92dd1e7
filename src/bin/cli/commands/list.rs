use anyhow::Result;

use crate::app::App;
use crate::render::terminal::{self, Color};
use crate::OutputFormat;

pub async fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let cards = app.load_cards().await?;

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = cards.iter().map(terminal::card_json).collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if cards.is_empty() {
                println!("No flashcards yet. Add one with `flashdeck-cli add <question> <answer>`.");
                return Ok(());
            }

            let id_width = cards.iter().map(|c| c.id.to_string().len()).max().unwrap_or(2).max(2);
            let question_width = 36;

            println!(
                "{}",
                terminal::paint(
                    &format!("{:<iw$}  {:<qw$}  {}", "ID", "Question", "Answer", iw = id_width, qw = question_width),
                    Color::BOLD,
                    use_color,
                )
            );

            for card in &cards {
                println!(
                    "{:<iw$}  {:<qw$}  {}",
                    card.id.0,
                    terminal::truncate(&card.question, question_width),
                    terminal::truncate(&card.answer, 36),
                    iw = id_width,
                    qw = question_width,
                );
            }

            println!();
            println!("{} flashcard{}", cards.len(), if cards.len() == 1 { "" } else { "s" });
        }
    }

    Ok(())
}
