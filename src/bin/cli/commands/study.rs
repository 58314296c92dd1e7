use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use flashdeck_lib::flashcards::{StudyError, StudySession, StudyState};

use crate::app::App;
use crate::render::terminal::{self, Color};

/// What a line of user input asks the session to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Reveal,
    Advance,
    Restart,
    Exit,
    Unknown,
}

fn parse_action(input: &str, state: StudyState) -> Action {
    match (input.trim().to_lowercase().as_str(), state) {
        ("q" | "quit" | "exit", _) => Action::Exit,
        ("r" | "restart", _) => Action::Restart,
        ("" | "s" | "show", StudyState::Browsing { revealed: false, .. }) => Action::Reveal,
        ("" | "n" | "next", StudyState::Browsing { revealed: true, .. }) => Action::Advance,
        ("n" | "next", StudyState::Browsing { revealed: false, .. }) => Action::Advance,
        ("", StudyState::Finished) => Action::Exit,
        _ => Action::Unknown,
    }
}

fn prompt_for(state: StudyState) -> &'static str {
    match state {
        StudyState::Browsing { revealed: false, .. } => "[Enter] show answer  [n] skip  [r] restart  [q] exit > ",
        StudyState::Browsing { revealed: true, .. } => "[Enter] next card  [r] restart  [q] exit > ",
        StudyState::Finished => "[r] restart  [Enter/q] exit > ",
    }
}

pub async fn run(app: &App, use_color: bool) -> Result<()> {
    let cards = app.load_cards().await?;

    let mut session = match StudySession::enter(cards) {
        Ok(session) => session,
        Err(StudyError::EmptyCollection) => {
            println!("No cards. Add some cards before studying.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut show_card = true;

    loop {
        if show_card {
            render_state(&session, use_color);
        }

        let state = session.state();
        stdout.write_all(prompt_for(state).as_bytes()).await?;
        stdout.flush().await?;

        let Some(input) = lines.next_line().await? else {
            println!();
            break;
        };

        show_card = true;
        match parse_action(&input, state) {
            Action::Reveal => session.reveal()?,
            Action::Advance => {
                session.advance()?;
            }
            Action::Restart => session.restart(),
            Action::Exit => break,
            Action::Unknown => {
                println!("{}", terminal::paint("Unrecognised input", Color::YELLOW, use_color));
                show_card = false;
            }
        }
    }

    session.exit();
    Ok(())
}

fn render_state(session: &StudySession, use_color: bool) {
    match (session.current(), session.progress()) {
        (Some(card), Some(progress)) => {
            println!();
            for line in terminal::render_question(card, progress, use_color) {
                println!("{}", line);
            }
            if let Some(answer) = session.answer() {
                println!();
                for line in terminal::render_answer(answer, use_color) {
                    println!("{}", line);
                }
            }
            println!();
        }
        _ => {
            println!();
            println!("{}", terminal::paint("End of Cards", Color::BOLD, use_color));
            println!("You have reached the end of your flashcards.");
            println!();
        }
    }
}
