//! Interactive prompts. dialoguer blocks, so every call is moved off the
//! async worker with `block_in_place`.

use anyhow::Context;
use client_core::{ConfirmDelete, DELETE_PROMPT};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use shared::domain::Event;
use tracing::warn;

fn blocking<T>(prompt: impl FnOnce() -> T) -> T {
    tokio::task::block_in_place(prompt)
}

pub fn select(prompt: &str, items: &[String], default: usize) -> anyhow::Result<usize> {
    blocking(|| {
        Select::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact()
    })
    .with_context(|| format!("failed to read selection for '{prompt}'"))
}

pub fn text(prompt: &str, initial: &str, allow_empty: bool) -> anyhow::Result<String> {
    blocking(|| {
        Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .with_initial_text(initial)
            .allow_empty(allow_empty)
            .interact_text()
    })
    .with_context(|| format!("failed to read input for '{prompt}'"))
}

/// Asks on the terminal; an unreadable terminal counts as "no".
pub struct TerminalConfirm;

impl ConfirmDelete for TerminalConfirm {
    fn confirm_delete(&self, event: &Event) -> bool {
        let prompt = format!("{DELETE_PROMPT} ({})", event.title);
        let answer = blocking(|| {
            Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt)
                .default(false)
                .interact()
        });
        match answer {
            Ok(answer) => answer,
            Err(err) => {
                warn!(error = %err, "delete confirmation could not be read");
                false
            }
        }
    }
}

/// Confirmation already given on the command line (`--yes`).
pub struct PreConfirmed;

impl ConfirmDelete for PreConfirmed {
    fn confirm_delete(&self, _event: &Event) -> bool {
        true
    }
}
