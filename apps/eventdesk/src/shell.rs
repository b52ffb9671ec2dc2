//! Interactive mode: the list view with filter and card actions, plus the
//! create-event form. Leaving the form after a successful submit returns to
//! the list and refetches it.

use std::sync::Arc;

use anyhow::Result;
use chrono::Local;
use client_core::{
    ActionOutcome, EventCardController, EventFormController, EventListController, ListHandle,
    ListSnapshot, ListStatus,
};
use shared::{
    domain::{CategoryFilter, Event},
    style::filter_style,
};
use tracing::debug;

use crate::{
    commands::AppContext,
    prompt::{self, TerminalConfirm},
    render::{render_card, render_list, render_notifications},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Filter,
    AddEvent,
    Archive,
    Delete,
    Refresh,
    TryAgain,
    Quit,
}

impl MenuAction {
    fn label(self) -> &'static str {
        match self {
            MenuAction::Filter => "🏷️  Filter by category",
            MenuAction::AddEvent => "➕ Add new event",
            MenuAction::Archive => "📦 Archive an event",
            MenuAction::Delete => "🗑️  Delete an event",
            MenuAction::Refresh => "🔄 Refresh",
            MenuAction::TryAgain => "🔄 Try again",
            MenuAction::Quit => "Quit",
        }
    }
}

fn available_actions(snapshot: &ListSnapshot) -> Vec<MenuAction> {
    match snapshot.status {
        ListStatus::Loading => vec![MenuAction::Refresh, MenuAction::Quit],
        ListStatus::Failed(_) => vec![MenuAction::TryAgain, MenuAction::AddEvent, MenuAction::Quit],
        ListStatus::Ready => {
            let visible = snapshot.visible();
            let mut actions = vec![MenuAction::Filter, MenuAction::AddEvent];
            if visible.iter().any(|event| !event.archived) {
                actions.push(MenuAction::Archive);
            }
            if !visible.is_empty() {
                actions.push(MenuAction::Delete);
            }
            actions.extend([MenuAction::Refresh, MenuAction::Quit]);
            actions
        }
    }
}

pub async fn run(ctx: &AppContext) -> Result<()> {
    let list = EventListController::new(Arc::clone(&ctx.api));
    let mut form = EventFormController::new(Arc::clone(&ctx.api), ctx.notifications.clone());
    list.mount().await;

    loop {
        let snapshot = list.snapshot().await;
        draw(ctx, &snapshot);

        let actions = available_actions(&snapshot);
        let labels: Vec<String> = actions.iter().map(|a| a.label().to_string()).collect();
        let action = actions[prompt::select("What would you like to do?", &labels, 0)?];
        debug!(?action, "shell action selected");

        match action {
            MenuAction::Filter => choose_filter(&list, &snapshot).await?,
            MenuAction::AddEvent => {
                if create_view(&mut form).await? {
                    list.refresh().await;
                }
            }
            MenuAction::Archive => {
                let candidates: Vec<Event> = snapshot
                    .visible()
                    .into_iter()
                    .filter(|event| !event.archived)
                    .collect();
                if let Some(event) = pick_event("Archive which event?", candidates)? {
                    let card = card_for(ctx, &list, event);
                    report(&card, card.archive().await);
                }
            }
            MenuAction::Delete => {
                if let Some(event) = pick_event("Delete which event?", snapshot.visible())? {
                    let card = card_for(ctx, &list, event);
                    report(&card, card.delete(&TerminalConfirm).await);
                }
            }
            MenuAction::Refresh | MenuAction::TryAgain => list.refresh().await,
            MenuAction::Quit => break,
        }
    }

    list.unmount();
    Ok(())
}

fn draw(ctx: &AppContext, snapshot: &ListSnapshot) {
    println!("\n{}", "═".repeat(56));
    println!("📅 Event Manager: manage your work, personal, and other events\n");
    let toasts = ctx.notifications.active();
    if !toasts.is_empty() {
        println!("{}\n", render_notifications(&toasts));
    }
    println!("{}", render_list(snapshot, Local::now().naive_local()));
}

async fn choose_filter(list: &EventListController, snapshot: &ListSnapshot) -> Result<()> {
    let counts = snapshot.counts();
    let labels: Vec<String> = counts
        .iter()
        .map(|(filter, count)| {
            let style = filter_style(*filter);
            format!("{} {} ({count})", style.icon, style.label)
        })
        .collect();
    let current = CategoryFilter::CHOICES
        .iter()
        .position(|filter| *filter == snapshot.filter)
        .unwrap_or(0);
    let index = prompt::select("Filter by category", &labels, current)?;
    list.set_filter(counts[index].0).await;
    Ok(())
}

fn pick_event(prompt_text: &str, events: Vec<Event>) -> Result<Option<Event>> {
    if events.is_empty() {
        return Ok(None);
    }
    let mut labels: Vec<String> = events
        .iter()
        .map(|event| format!("{} ({} {})", event.title, event.date, event.time.format("%H:%M")))
        .collect();
    labels.push("Cancel".to_string());
    let index = prompt::select(prompt_text, &labels, 0)?;
    Ok(events.into_iter().nth(index))
}

fn card_for(ctx: &AppContext, list: &Arc<EventListController>, event: Event) -> EventCardController {
    EventCardController::new(
        event,
        Arc::clone(&ctx.api),
        Arc::clone(list) as Arc<dyn ListHandle>,
        ctx.notifications.clone(),
    )
}

fn report(card: &EventCardController, outcome: ActionOutcome) {
    match outcome {
        ActionOutcome::Failed(_) => {
            let error = card.inline_error();
            println!(
                "{}",
                render_card(card.event(), Local::now().naive_local(), error.as_deref())
            );
        }
        ActionOutcome::Cancelled => println!("Delete cancelled."),
        ActionOutcome::Completed | ActionOutcome::Busy | ActionOutcome::NotOffered => {}
    }
}

/// Returns true once an event was created; false when the user backs out.
async fn create_view(form: &mut EventFormController) -> Result<bool> {
    println!("\n📅 Create New Event");
    loop {
        let draft = form.draft().clone();
        form.set_title(prompt::text("Title*", &draft.title, true)?);
        form.set_date(prompt::text("Date* (YYYY-MM-DD)", &draft.date, true)?);
        form.set_time(prompt::text("Time* (HH:mm)", &draft.time, true)?);
        form.set_notes(prompt::text("Notes (optional)", &draft.notes, true)?);

        match form.submit().await {
            Ok(created) => {
                println!("Created \"{}\".", created.title);
                return Ok(true);
            }
            Err(err) => {
                println!("⚠️  {err}");
                let choices = vec![
                    "Edit and resubmit".to_string(),
                    "Back to events".to_string(),
                ];
                if prompt::select("What next?", &choices, 0)? == 1 {
                    return Ok(false);
                }
            }
        }
    }
}
