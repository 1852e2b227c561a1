// SPDX-FileCopyrightText: © 2024 Hugues Bruant <hugues.bruant@gmail.com>

//! Error taxonomy (by kind, not by type). Only `EntryMissing` aborts a run;
//! every other kind (`ModuleNotFound`, `ParseFailure`, `NonParsableOrigin`,
//! `CacheLoadFailure`, `CacheSaveFailure`, `KnownPathologicalFile`) is
//! absorbed at module granularity by the orchestrator via `log::warn!`/
//! `log::debug!` call sites, never by unwinding the BFS loop. `CoreError`
//! exists so that call sites besides the CLI (tests, a future library
//! consumer) can still match on `EntryMissing` without parsing a formatted
//! string.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("entry file does not exist: {0}")]
    EntryMissing(PathBuf),
}
