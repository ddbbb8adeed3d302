//! Concrete record kinds

mod experience;
mod personal_info;
mod project;
mod skill;

pub use experience::Experience;
pub use personal_info::PersonalInfo;
pub use project::Project;
pub use skill::{Skill, SkillCategory};
