use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::ids::{OwnerId, RecordId};
use crate::record::{Record, require_text, whole_number};

/// A position held, shown on the timeline
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(rename = "userId")]
    pub owner: OwnerId,
    pub title: String,
    pub company: String,
    /// Free text, e.g. "2021 - Present"
    pub period: String,
    pub description: String,
    #[serde(default)]
    pub current: bool,
    /// Manual sort key; higher shows first
    #[serde(default, deserialize_with = "whole_number")]
    pub order: i64,
    pub created_at: DateTime<Utc>,
}

impl Record for Experience {
    const COLLECTION: &'static str = "experience";
    const LABEL: &'static str = "Experience";
    const TRACKS_CREATED: bool = true;
    const TRACKS_UPDATED: bool = false;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn owner(&self) -> &OwnerId {
        &self.owner
    }

    fn normalize(&mut self) -> StoreResult<()> {
        require_text(Self::LABEL, "title", &self.title)?;
        require_text(Self::LABEL, "company", &self.company)?;
        require_text(Self::LABEL, "period", &self.period)?;
        require_text(Self::LABEL, "description", &self.description)
    }

    /// Highest `order` first, then newest
    fn display_order(a: &Self, b: &Self) -> Ordering {
        b.order
            .cmp(&a.order)
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| a.id.cmp(&b.id))
    }
}
