use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::ids::{OwnerId, RecordId};
use crate::record::{Record, SingletonRecord, require_text};

/// Name, headline and contact details; one per account
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(rename = "userId")]
    pub owner: OwnerId,
    pub name: String,
    pub title: String,
    pub bio: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Record for PersonalInfo {
    const COLLECTION: &'static str = "personal_info";
    const LABEL: &'static str = "Personal info";
    const TRACKS_CREATED: bool = false;
    const TRACKS_UPDATED: bool = true;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn owner(&self) -> &OwnerId {
        &self.owner
    }

    fn normalize(&mut self) -> StoreResult<()> {
        require_text(Self::LABEL, "name", &self.name)?;
        require_text(Self::LABEL, "title", &self.title)?;
        require_text(Self::LABEL, "bio", &self.bio)?;
        require_text(Self::LABEL, "email", &self.email)
    }

    fn display_order(a: &Self, b: &Self) -> Ordering {
        b.updated_at.cmp(&a.updated_at)
    }
}

impl SingletonRecord for PersonalInfo {}
