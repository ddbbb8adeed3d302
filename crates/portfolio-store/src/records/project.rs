use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::ids::{OwnerId, RecordId};
use crate::record::{Record, require_text};

/// A showcased project
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(rename = "userId")]
    pub owner: OwnerId,
    pub title: String,
    pub description: String,
    /// Technology tags, in the order given
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_demo: Option<String>,
    /// Source repository URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Project {
    const COLLECTION: &'static str = "projects";
    const LABEL: &'static str = "Project";
    const TRACKS_CREATED: bool = true;
    const TRACKS_UPDATED: bool = true;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn owner(&self) -> &OwnerId {
        &self.owner
    }

    fn normalize(&mut self) -> StoreResult<()> {
        require_text(Self::LABEL, "title", &self.title)?;
        require_text(Self::LABEL, "description", &self.description)
    }

    /// Newest first
    fn display_order(a: &Self, b: &Self) -> Ordering {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    }
}
