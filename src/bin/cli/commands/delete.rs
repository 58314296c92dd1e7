use anyhow::{Context, Result};

use flashdeck_lib::flashcards::FlashcardId;

use crate::app::App;
use crate::OutputFormat;

pub async fn run(app: &App, id: u64, format: &OutputFormat) -> Result<()> {
    let existed = app.load_cards().await?.contains(FlashcardId(id));

    app.store
        .delete(FlashcardId(id))
        .await
        .with_context(|| format!("Failed to delete flashcard {}", id))?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": id,
                "deleted": existed,
                "remaining": app.store.snapshot().len(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if existed {
                println!("Deleted flashcard {}", id);
            } else {
                println!("No flashcard with id {}; nothing deleted", id);
            }
        }
    }

    Ok(())
}
