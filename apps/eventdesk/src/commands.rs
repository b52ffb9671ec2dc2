//! One-shot subcommands. Each builds the same controllers the shell uses.

use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use chrono::Local;
use client_core::{
    ActionOutcome, ConfirmDelete, EventApi, EventCardController, EventFormController,
    EventListController, ListHandle, ListStatus, NotificationDispatcher,
};
use shared::domain::{CategoryFilter, EventId};

use crate::render::{render_card, render_list, render_notifications};

pub struct AppContext {
    pub api: Arc<dyn EventApi>,
    pub notifications: NotificationDispatcher,
}

impl AppContext {
    fn print_notifications(&self) {
        let toasts = self.notifications.active();
        if !toasts.is_empty() {
            println!("{}", render_notifications(&toasts));
        }
    }

    async fn mounted_list(&self) -> Result<Arc<EventListController>> {
        let list = EventListController::new(Arc::clone(&self.api));
        list.mount().await;
        if let ListStatus::Failed(message) = list.snapshot().await.status {
            bail!(message);
        }
        Ok(list)
    }

    async fn card(&self, id: &str) -> Result<(Arc<EventListController>, EventCardController)> {
        let list = self.mounted_list().await?;
        let event = list
            .find(&EventId::new(id))
            .await
            .ok_or_else(|| anyhow!("no event with id '{id}'"))?;
        let card = EventCardController::new(
            event,
            Arc::clone(&self.api),
            Arc::clone(&list) as Arc<dyn ListHandle>,
            self.notifications.clone(),
        );
        Ok((list, card))
    }
}

pub async fn list(ctx: &AppContext, filter: CategoryFilter) -> Result<()> {
    let list = ctx.mounted_list().await?;
    list.set_filter(filter).await;
    println!("{}", render_list(&list.snapshot().await, Local::now().naive_local()));
    Ok(())
}

pub async fn create(
    ctx: &AppContext,
    title: String,
    date: String,
    time: String,
    notes: Option<String>,
) -> Result<()> {
    let mut form = EventFormController::new(Arc::clone(&ctx.api), ctx.notifications.clone());
    form.set_title(title);
    form.set_date(date);
    form.set_time(time);
    form.set_notes(notes.unwrap_or_default());

    let created = form.submit().await?;
    ctx.print_notifications();
    println!("{}", render_card(&created, Local::now().naive_local(), None));
    Ok(())
}

pub async fn archive(ctx: &AppContext, id: &str) -> Result<()> {
    let (list, card) = ctx.card(id).await?;
    let outcome = card.archive().await;
    finish(ctx, &list, id, outcome).await
}

pub async fn delete(ctx: &AppContext, id: &str, confirm: &dyn ConfirmDelete) -> Result<()> {
    let (list, card) = ctx.card(id).await?;
    let outcome = card.delete(confirm).await;
    finish(ctx, &list, id, outcome).await
}

async fn finish(
    ctx: &AppContext,
    list: &EventListController,
    id: &str,
    outcome: ActionOutcome,
) -> Result<()> {
    match outcome {
        ActionOutcome::Completed => {
            ctx.print_notifications();
            println!("{}", render_list(&list.snapshot().await, Local::now().naive_local()));
            Ok(())
        }
        ActionOutcome::Cancelled => {
            println!("Delete cancelled; event {id} kept.");
            Ok(())
        }
        ActionOutcome::NotOffered => bail!("event {id} is already archived"),
        ActionOutcome::Busy => bail!("another action on event {id} is still running"),
        ActionOutcome::Failed(message) => bail!(message),
    }
}
