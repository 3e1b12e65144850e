// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use offq_core::QueueStore;

use super::{open_workspace, Workspace};
use crate::cli::OutputFormat;
use crate::config::get_db_path;
use crate::display::format_item_details;
use crate::error::{Error, Result};

pub fn run(key: &str, output: OutputFormat) -> Result<()> {
    let ws = open_workspace()?;
    println!("{}", render(&ws, key, output)?);
    Ok(())
}

pub(crate) fn render(ws: &Workspace, key: &str, output: OutputFormat) -> Result<String> {
    let store = QueueStore::open(&get_db_path(&ws.work_dir))?;
    let item = store
        .get(key)?
        .ok_or_else(|| Error::ItemNotFound(key.to_string()))?;

    match output {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&item)?),
        OutputFormat::Text => Ok(format_item_details(&item)),
    }
}

#[cfg(test)]
#[path = "show_tests.rs"]
mod tests;
