// SPDX-FileCopyrightText: 2026 Prompt Journal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication adapter trait gating mutating operations.

use async_trait::async_trait;

use crate::error::JournalError;
use crate::traits::adapter::PluginAdapter;

/// Adapter that verifies the credential carried by a mutating call.
#[async_trait]
pub trait AuthAdapter: PluginAdapter {
    /// Returns `Ok(())` when the credential is accepted and
    /// [`JournalError::Unauthorized`] otherwise.
    async fn verify(&self, credential: &str) -> Result<(), JournalError>;
}
