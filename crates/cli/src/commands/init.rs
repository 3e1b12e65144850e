// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Path, PathBuf};

use offq_core::QueueStore;

use crate::config::{get_db_path, init_work_dir, Config};
use crate::error::Result;

pub fn run(url: Option<String>, path: Option<String>) -> Result<()> {
    let target_path = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir()?,
    };
    let work_dir = run_impl(&target_path, url.as_deref())?;
    let config = Config::load(&work_dir)?;

    println!("Initialized offline queue at {}", work_dir.display());
    println!("Remote: {}", config.remote.url);
    Ok(())
}

/// Create the `.offq/` directory and an empty queue database.
pub(crate) fn run_impl(target_path: &Path, url: Option<&str>) -> Result<PathBuf> {
    let work_dir = init_work_dir(target_path, url)?;
    QueueStore::open(&get_db_path(&work_dir))?;
    Ok(work_dir)
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
