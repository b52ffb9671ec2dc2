//! Terminal rendering for the list view, event cards and notifications.

use std::fmt::Write as _;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use client_core::{ListSnapshot, ListView, Notification, Severity};
use owo_colors::OwoColorize;
use shared::{
    domain::Event,
    style::{category_style, filter_style, Accent},
};

fn accent(text: &str, accent: Accent) -> String {
    match accent {
        Accent::Blue => text.blue().to_string(),
        Accent::Green => text.green().to_string(),
        Accent::Magenta => text.magenta().to_string(),
        Accent::Neutral => text.bold().to_string(),
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%a, %b %-d, %Y").to_string()
}

pub fn format_time(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

pub fn render_card(event: &Event, now: NaiveDateTime, inline_error: Option<&str>) -> String {
    let style = category_style(event.category);
    let mut out = String::new();

    let _ = writeln!(out, "{}", accent(&"━".repeat(48), style.accent));
    if let Some(error) = inline_error {
        let _ = writeln!(out, "{}", format!("⚠️  {error}").red());
    }

    let title = if event.archived {
        event.title.dimmed().strikethrough().to_string()
    } else {
        event.title.bold().to_string()
    };
    let badge = if event.archived {
        format!("  {}", "📦 Archived".yellow())
    } else if event.is_upcoming(now) {
        format!("  {}", "⏰ Upcoming".green())
    } else {
        String::new()
    };
    let _ = writeln!(out, "{title}{badge}");
    let _ = writeln!(
        out,
        "{}  {}",
        accent(&format!("{} {}", style.icon, style.label), style.accent),
        format!("id {}", event.id).dimmed()
    );
    let _ = writeln!(
        out,
        "📅 {}   🕒 {}",
        format_date(event.date),
        format_time(event.time)
    );
    if let Some(notes) = &event.notes {
        let _ = writeln!(out, "   {}", notes.italic());
    }
    out
}

pub fn render_filter_bar(snapshot: &ListSnapshot) -> String {
    let entries: Vec<String> = snapshot
        .counts()
        .into_iter()
        .map(|(filter, count)| {
            let style = filter_style(filter);
            let label = format!("{} {} ({count})", style.icon, style.label);
            if filter == snapshot.filter {
                format!("[{}]", label.bold())
            } else {
                label
            }
        })
        .collect();
    format!("🏷️  Filter by Category: {}", entries.join("  "))
}

pub fn render_list(snapshot: &ListSnapshot, now: NaiveDateTime) -> String {
    match snapshot.view() {
        ListView::Loading => "Loading your events...".to_string(),
        ListView::Failed { message } => format!(
            "⚠️  {}\n{}\nChoose \"Try again\" or rerun the command to retry.",
            "Oops! Something went wrong".bold(),
            message.red()
        ),
        ListView::Empty(empty) => format!(
            "{}\n\n{}\n{}",
            render_filter_bar(snapshot),
            empty.title().bold(),
            empty.message()
        ),
        ListView::Events(events) => {
            let mut out = render_filter_bar(snapshot);
            out.push('\n');
            for event in &events {
                out.push('\n');
                out.push_str(&render_card(event, now, None));
            }
            out
        }
    }
}

fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Success => "✅",
        Severity::Error => "❌",
        Severity::Warning => "⚠️",
        Severity::Info => "ℹ️",
    }
}

pub fn render_notifications(notifications: &[Notification]) -> String {
    notifications
        .iter()
        .map(|notification| {
            let text = match notification.severity {
                Severity::Success => notification.message.green().to_string(),
                Severity::Error => notification.message.red().to_string(),
                Severity::Warning => notification.message.yellow().to_string(),
                Severity::Info => notification.message.blue().to_string(),
            };
            format!("{} {text}", severity_icon(notification.severity))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
