// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use offq_core::QueueStore;

use super::{open_workspace, Workspace};
use crate::cli::OutputFormat;
use crate::config::get_db_path;
use crate::display::format_item_line;
use crate::error::Result;

pub fn run(all: bool, output: OutputFormat) -> Result<()> {
    let ws = open_workspace()?;
    println!("{}", render(&ws, all, output)?);
    Ok(())
}

pub(crate) fn render(ws: &Workspace, all: bool, output: OutputFormat) -> Result<String> {
    let store = QueueStore::open(&get_db_path(&ws.work_dir))?;
    let items = store.list(all)?;

    match output {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&items)?),
        OutputFormat::Text if items.is_empty() => Ok(if all {
            "No queued actions".to_string()
        } else {
            "No pending actions".to_string()
        }),
        OutputFormat::Text => Ok(items
            .iter()
            .map(format_item_line)
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
