// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Error taxonomy for the ledger core. The CLI layer wraps these in anyhow
/// with extra context; nothing is retried automatically.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("no active profile; run 'pocketledger profile use <name>' first")]
    Auth,

    #[error("{0}")]
    Validation(String),

    #[error("{what} {id} not found")]
    NotFound { what: &'static str, id: i64 },

    #[error("invalid stored amount '{0}'")]
    BadAmount(String),

    #[error("store operation failed: {0}")]
    Store(#[from] rusqlite::Error),
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        LedgerError::Validation(msg.into())
    }

    pub fn not_found(what: &'static str, id: i64) -> Self {
        LedgerError::NotFound { what, id }
    }
}
