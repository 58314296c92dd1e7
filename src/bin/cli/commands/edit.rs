use anyhow::{bail, Context, Result};

use flashdeck_lib::flashcards::{FlashcardId, FlashcardUpdate};

use crate::app::App;
use crate::render::terminal;
use crate::OutputFormat;

pub async fn run(
    app: &App,
    id: u64,
    question: Option<String>,
    answer: Option<String>,
    pronunciation: Option<String>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let update = FlashcardUpdate {
        question,
        answer,
        pronunciation,
    };
    if update.is_empty() {
        bail!("Nothing to change. Pass --question, --answer or --pronunciation.");
    }

    let card = app
        .store
        .update(FlashcardId(id), update)
        .await
        .with_context(|| format!("Failed to update flashcard {}", id))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&terminal::card_json(&card))?);
        }
        OutputFormat::Plain => {
            println!("Updated flashcard {}", card.id);
            for line in terminal::render_card(&card, use_color).into_iter().skip(1) {
                println!("{}", line);
            }
        }
    }

    Ok(())
}
