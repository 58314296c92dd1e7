use flashdeck_lib::flashcards::{Flashcard, Progress};

/// ANSI color codes
#[allow(dead_code)]
pub struct Color;

#[allow(dead_code)]
impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const ITALIC: &str = "\x1b[3m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

/// Wrap `text` in `color` when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Render a card as labelled, wrapped lines
pub fn render_card(card: &Flashcard, use_color: bool) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(paint(&format!("#{}", card.id), Color::GRAY, use_color));
    lines.extend(render_field("Question", &card.question, Color::BOLD, use_color));
    if !card.pronunciation.is_empty() {
        lines.extend(render_field("Pronunciation", &card.pronunciation, Color::ITALIC, use_color));
    }
    lines.extend(render_field("Answer", &card.answer, Color::GREEN, use_color));

    lines
}

/// Render the question side shown during study
pub fn render_question(card: &Flashcard, progress: Progress, use_color: bool) -> Vec<String> {
    let header = format!("Studying: Card {} of {}", progress.current, progress.total);
    let mut lines = vec![paint(&header, Color::CYAN, use_color), String::new()];

    lines.extend(wrap_lines(&card.question, "  ", 80).into_iter().map(|l| paint(&l, Color::BOLD, use_color)));
    if !card.pronunciation.is_empty() {
        lines.push(paint(&format!("  [{}]", card.pronunciation), Color::DIM, use_color));
    }

    lines
}

/// Render the answer side shown after a reveal
pub fn render_answer(answer: &str, use_color: bool) -> Vec<String> {
    wrap_lines(answer, "  ", 80)
        .into_iter()
        .map(|l| paint(&l, Color::GREEN, use_color))
        .collect()
}

/// JSON shape used by every command with `--format json`
pub fn card_json(card: &Flashcard) -> serde_json::Value {
    serde_json::json!({
        "id": card.id.0,
        "question": card.question,
        "answer": card.answer,
        "pronunciation": card.pronunciation,
    })
}

/// Truncate to `max` characters, marking the cut with an ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() <= max {
        single_line
    } else {
        let cut: String = single_line.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

fn render_field(label: &str, value: &str, color: &str, use_color: bool) -> Vec<String> {
    let mut lines = vec![paint(&format!("{}:", label), Color::DIM, use_color)];
    lines.extend(
        wrap_lines(value, "  ", 80)
            .into_iter()
            .map(|l| paint(&l, color, use_color)),
    );
    lines
}

fn wrap_lines(text: &str, prefix: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let effective_width = max_width.saturating_sub(prefix.len());

    for line in text.lines() {
        if line.chars().count() <= effective_width {
            lines.push(format!("{}{}", prefix, line));
        } else {
            // Simple word wrap
            let mut current_line = String::new();
            for word in line.split_whitespace() {
                if current_line.is_empty() {
                    current_line = word.to_string();
                } else if current_line.chars().count() + 1 + word.chars().count() <= effective_width {
                    current_line.push(' ');
                    current_line.push_str(word);
                } else {
                    lines.push(format!("{}{}", prefix, current_line));
                    current_line = word.to_string();
                }
            }
            if !current_line.is_empty() {
                lines.push(format!("{}{}", prefix, current_line));
            }
        }
    }

    if lines.is_empty() && !text.is_empty() {
        lines.push(format!("{}{}", prefix, text));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashdeck_lib::flashcards::FlashcardId;

    #[test]
    fn test_wrap_long_line() {
        let text = "word ".repeat(30);
        let lines = wrap_lines(text.trim(), "  ", 20);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= 20));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a fairly long question", 8), "a fairl…");
        assert_eq!(truncate("two\nlines", 20), "two lines");
    }

    #[test]
    fn test_render_card_without_color() {
        let card = Flashcard::new(FlashcardId(3), "犬".to_string(), "dog".to_string())
            .with_pronunciation("inu".to_string());
        let lines = render_card(&card, false);
        assert_eq!(
            lines,
            vec!["#3", "Question:", "  犬", "Pronunciation:", "  inu", "Answer:", "  dog"]
        );
    }
}
