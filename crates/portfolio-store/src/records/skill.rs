use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::ids::{OwnerId, RecordId};
use crate::record::{Record, require_text, whole_number};

pub const MIN_PROFICIENCY: i64 = 1;
pub const MAX_PROFICIENCY: i64 = 10;
pub const DEFAULT_PROFICIENCY: i64 = 5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Frontend,
    Backend,
    Database,
    Tools,
    #[default]
    Other,
}

impl SkillCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::Frontend => "frontend",
            SkillCategory::Backend => "backend",
            SkillCategory::Database => "database",
            SkillCategory::Tools => "tools",
            SkillCategory::Other => "other",
        }
    }
}

/// A named skill with a 1-10 proficiency
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(rename = "userId")]
    pub owner: OwnerId,
    pub name: String,
    #[serde(default)]
    pub category: SkillCategory,
    #[serde(default = "default_proficiency", deserialize_with = "whole_number")]
    pub proficiency: i64,
}

fn default_proficiency() -> i64 {
    DEFAULT_PROFICIENCY
}

impl Record for Skill {
    const COLLECTION: &'static str = "skills";
    const LABEL: &'static str = "Skill";
    const TRACKS_CREATED: bool = false;
    const TRACKS_UPDATED: bool = false;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn owner(&self) -> &OwnerId {
        &self.owner
    }

    fn normalize(&mut self) -> StoreResult<()> {
        require_text(Self::LABEL, "name", &self.name)?;
        self.proficiency = self.proficiency.clamp(MIN_PROFICIENCY, MAX_PROFICIENCY);
        Ok(())
    }

    /// Category name, then skill name, both lexicographic
    fn display_order(a: &Self, b: &Self) -> Ordering {
        a.category
            .as_str()
            .cmp(b.category.as_str())
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn skill(name: &str, category: SkillCategory) -> Skill {
        Skill {
            id: RecordId::generate(),
            owner: OwnerId::from("o"),
            name: name.into(),
            category,
            proficiency: DEFAULT_PROFICIENCY,
        }
    }

    #[test]
    fn test_defaults() {
        let s: Skill = serde_json::from_value(json!({
            "_id": "s1", "userId": "o", "name": "Rust"
        }))
        .unwrap();
        assert_eq!(s.category, SkillCategory::Other);
        assert_eq!(s.proficiency, DEFAULT_PROFICIENCY);
    }

    #[test]
    fn test_unknown_category_rejected() {
        let result = serde_json::from_value::<Skill>(json!({
            "_id": "s1", "userId": "o", "name": "Rust", "category": "cooking"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_float_proficiency_clamped() {
        let mut s: Skill = serde_json::from_value(json!({
            "_id": "s1", "userId": "o", "name": "Rust", "proficiency": 1e20
        }))
        .unwrap();
        s.normalize().unwrap();
        assert_eq!(s.proficiency, MAX_PROFICIENCY);

        let s: Skill = serde_json::from_value(json!({
            "_id": "s1", "userId": "o", "name": "Rust", "proficiency": 7.0
        }))
        .unwrap();
        assert_eq!(s.proficiency, 7);
    }

    #[test]
    fn test_proficiency_clamped() {
        let mut s = skill("Rust", SkillCategory::Backend);
        s.proficiency = 42;
        s.normalize().unwrap();
        assert_eq!(s.proficiency, MAX_PROFICIENCY);

        s.proficiency = -3;
        s.normalize().unwrap();
        assert_eq!(s.proficiency, MIN_PROFICIENCY);
    }

    #[test]
    fn test_order_by_category_name_then_name() {
        let mut skills = vec![
            skill("Vim", SkillCategory::Tools),
            skill("React", SkillCategory::Frontend),
            skill("Axum", SkillCategory::Backend),
            skill("Angular", SkillCategory::Frontend),
            skill("Postgres", SkillCategory::Database),
            skill("Cooking", SkillCategory::Other),
        ];
        skills.sort_by(Skill::display_order);

        let names: Vec<&str> = skills.iter().map(|s| s.name.as_str()).collect();
        // backend < database < frontend < other < tools
        assert_eq!(
            names,
            vec!["Axum", "Postgres", "Angular", "React", "Cooking", "Vim"]
        );
    }
}
