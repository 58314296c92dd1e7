use anyhow::Result;

use crate::app::App;
use crate::render::terminal;
use crate::OutputFormat;

pub async fn run(app: &App, id: u64, format: &OutputFormat, use_color: bool) -> Result<()> {
    let card = app.find_card(id).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&terminal::card_json(&card))?);
        }
        OutputFormat::Plain => {
            for line in terminal::render_card(&card, use_color) {
                println!("{}", line);
            }
        }
    }

    Ok(())
}
