// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored note the user can attach to an outgoing message via `@@`.
///
/// Notes live in an external store keyed by workspace scope; the composer
/// only ever reads them through [`crate::MemorySearch`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryNote {
    /// Stable identity; all selection/dedup logic keys on this.
    pub id: String,
    /// Workspace scope the note belongs to.
    pub scope: String,
    /// Short display title.
    pub title: String,
    /// Full note text injected into the outgoing message.
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MemoryNote {
    pub fn new(scope: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            scope: scope.into(),
            title: title.into(),
            body: body.into(),
            created_at: now,
            updated_at: now,
        }
    }
}
