use chrono::{DateTime, Utc};
use colored::Colorize;
use notezy::api::{CmdMessage, MessageLevel};
use notezy::config::{NotezyConfig, CONFIG_KEYS};
use notezy::index::DisplayNote;
use notezy::model::UserProfile;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const TIME_WIDTH: usize = 14;
const PENDING_MARKER: &str = "*";

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

pub(super) fn print_notes(notes: &[DisplayNote], line_width: usize) {
    for dn in notes {
        println!("{}", note_line(dn, line_width));
    }
}

pub(super) fn print_full_note(dn: &DisplayNote) {
    let created = dn
        .note
        .created_at
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "Unknown".to_string());
    println!("{} {}", dn.index.to_string().yellow(), created.dimmed());
    println!("--------------------------------");
    println!("{}", dn.note.text);
}

pub(super) fn print_profile(profile: &UserProfile) {
    println!("{} {}", "email".dimmed(), profile.email);
    println!("{} {}", "id   ".dimmed(), profile.id);
}

pub(super) fn print_config(config: &NotezyConfig) {
    for key in CONFIG_KEYS {
        if let Some(value) = config.get(key) {
            println!("{} = {}", key, value);
        }
    }
}

fn note_line(dn: &DisplayNote, line_width: usize) -> String {
    let idx_str = format!("{}. ", dn.index);
    let prefix = if dn.pending {
        format!("  {} ", PENDING_MARKER)
    } else {
        "    ".to_string()
    };

    let text: String = dn
        .note
        .text
        .chars()
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect();

    let fixed_width = prefix.width() + idx_str.width() + TIME_WIDTH + 2;
    let available = line_width.saturating_sub(fixed_width);
    let text_display = truncate_to_width(&text, available);
    let padding = available.saturating_sub(text_display.width());

    format!(
        "{}{}{}{}  {}",
        prefix,
        idx_str.yellow(),
        text_display,
        " ".repeat(padding),
        format_time_ago(dn.note.created_at).dimmed()
    )
}

pub(super) fn truncate_to_width(s: &str, max_width: usize) -> String {
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

pub(super) fn format_time_ago(timestamp: Option<DateTime<Utc>>) -> String {
    let time_str = match timestamp {
        Some(t) => {
            let duration = Utc::now().signed_duration_since(t);
            Formatter::new().convert(duration.to_std().unwrap_or_default())
        }
        None => "Unknown".to_string(),
    };
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
