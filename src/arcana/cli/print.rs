use arcana::commands::{CmdMessage, IndexedReading, MessageLevel};
use arcana::model::{Card, DrawnCard, Language};
use arcana::spread::{Spread, SpreadInfo};
use chrono::{DateTime, Local};
use colored::Colorize;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const LABEL_WIDTH: usize = 22;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_spreads(spreads: &[SpreadInfo]) {
    for info in spreads {
        let count = match info.count {
            Some(n) => format!("{} card(s)", n),
            None => "1-78 cards (-n COUNT)".to_string(),
        };
        println!(
            "  {:<14} {:<12} {}",
            info.key.yellow(),
            info.name.bold(),
            count.dimmed()
        );
        if !info.positions.is_empty() {
            println!("  {:<14} {}", "", info.positions.join(", ").dimmed());
        }
    }
}

pub(super) fn print_cards(cards: &[Card], language: Language) {
    for card in cards {
        println!(
            "  {:>2}  {}",
            card.id.to_string().dimmed(),
            card.name_in(language)
        );
    }
}

pub(super) fn print_spread_header(spread: &Spread) {
    println!("{} ({} card(s))", spread.name.bold(), spread.count());
}

/// One line per drawn card: position label, then card name.
pub(super) fn print_drawn(cards: &[DrawnCard], language: Language) {
    for drawn in cards {
        println!(
            "  {} {}",
            pad_to_width(&drawn.position, LABEL_WIDTH).cyan(),
            drawn.card.name_in(language).bold()
        );
    }
}

pub(super) fn print_readings(readings: &[IndexedReading]) {
    for reading in readings {
        let idx_str = format!("{}. ", reading.index);
        let time_ago = reading
            .record
            .parsed_date()
            .map(format_time_ago)
            .unwrap_or_else(|| format!("{:>width$}", reading.record.date, width = TIME_WIDTH));

        let cards: Vec<&str> = reading
            .record
            .cards
            .iter()
            .map(|c| c.card.as_str())
            .collect();
        let mut summary = format!("{}: {}", reading.record.spread, cards.join(", "));
        if !reading.record.note.is_empty() {
            summary.push_str(&format!(" ({})", reading.record.note));
        }

        let fixed_width = 4 + idx_str.width() + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed_width);
        let summary_display = truncate_to_width(&summary, available);
        let padding = available.saturating_sub(summary_display.width());

        println!(
            "    {}{}{}{}",
            idx_str,
            summary_display,
            " ".repeat(padding),
            time_ago.dimmed()
        );
    }
}

pub(super) fn print_full_reading(reading: &IndexedReading) {
    let record = &reading.record;
    println!(
        "{} {}",
        format!("{}.", reading.index).yellow(),
        record.spread.bold()
    );
    println!("{}", record.date.dimmed());
    if let Some(question) = &record.question {
        println!("Question: {}", question);
    }
    println!("--------------------------------");
    for card in &record.cards {
        println!(
            "  {} {}",
            pad_to_width(&card.position, LABEL_WIDTH).cyan(),
            card.card.bold()
        );
    }
    if !record.note.is_empty() {
        println!();
        println!("Note: {}", record.note);
    }
}

pub(super) fn print_interpretation(text: &str) {
    println!();
    println!("{}", "Interpretation".bold().underline());
    println!();
    println!("{}", text);
}

fn pad_to_width(s: &str, width: usize) -> String {
    let current = s.width();
    if current >= width {
        return s.to_string();
    }
    format!("{}{}", s, " ".repeat(width - current))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Local>) -> String {
    let duration = Local::now().signed_duration_since(timestamp);

    let formatter = Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());

    let time_str = time_str
        .replace("hour ago", "hour  ago")
        .replace("minute ago", "minute  ago")
        .replace("second ago", "second  ago")
        .replace("day ago", "day  ago")
        .replace("week ago", "week  ago")
        .replace("month ago", "month  ago")
        .replace("year ago", "year  ago");

    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
