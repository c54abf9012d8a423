//! Portfolio domain model
//!
//! The complete user-entered content (personal info plus five content
//! sequences) and the application settings persisted alongside it.
//! Field names serialize in camelCase so a snapshot written by one build
//! loads in the next.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Singleton personal details embedded in the portfolio record.
/// Mutated only via partial-field merge, never created or destroyed
/// independently of the record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub github: String,
    /// Inline-encoded image (`data:image/png;base64,...`) or empty
    pub profile_picture: String,
    pub summary: String,
}

/// Partial update for [`PersonalInfo`]; `None` fields are left untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PersonalInfoPatch {
    pub full_name: Option<String>,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub profile_picture: Option<String>,
    pub summary: Option<String>,
}

impl PersonalInfo {
    /// Shallow-merge a patch into this info, returning the merged value
    pub fn merged(&self, patch: PersonalInfoPatch) -> Self {
        let mut info = self.clone();
        macro_rules! apply {
            ($($field:ident),*) => {
                $(if let Some(value) = patch.$field { info.$field = value; })*
            };
        }
        apply!(
            full_name, title, email, phone, location, linkedin, github, profile_picture, summary
        );
        info
    }
}

/// Proficiency levels, ordered weakest to strongest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    pub const ALL: [SkillLevel; 4] = [
        SkillLevel::Beginner,
        SkillLevel::Intermediate,
        SkillLevel::Advanced,
        SkillLevel::Expert,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "Beginner",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::Advanced => "Advanced",
            SkillLevel::Expert => "Expert",
        }
    }

    /// Star rating shown in the preview (1-4)
    pub fn star_count(&self) -> usize {
        match self {
            SkillLevel::Beginner => 1,
            SkillLevel::Intermediate => 2,
            SkillLevel::Advanced => 3,
            SkillLevel::Expert => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: Uuid,
    pub name: String,
    pub level: SkillLevel,
}

impl Skill {
    /// Create a skill with a fresh unique id
    pub fn new(name: impl Into<String>, level: SkillLevel) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            level,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: Uuid,
    pub role: String,
    pub company: String,
    /// Free text, e.g. "Jan 2022 - Present"
    pub duration: String,
    pub description: String,
    /// Set when this is the current position
    pub current: bool,
}

impl Experience {
    pub fn new(
        role: impl Into<String>,
        company: impl Into<String>,
        duration: impl Into<String>,
        description: impl Into<String>,
        current: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: role.into(),
            company: company.into(),
            duration: duration.into(),
            description: description.into(),
            current,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Ordered, duplicates suppressed case-sensitively on insert
    pub tech_stack: Vec<String>,
    pub github_link: String,
    pub live_link: String,
    pub featured: bool,
}

impl Project {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            tech_stack: Vec::new(),
            github_link: String::new(),
            live_link: String::new(),
            featured: false,
        }
    }

    /// Append a technology name unless an exact match is already present
    pub fn add_tech(&mut self, tech: impl Into<String>) {
        let tech = tech.into();
        if !self.tech_stack.contains(&tech) {
            self.tech_stack.push(tech);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: Uuid,
    pub degree: String,
    pub institute: String,
    pub duration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Education {
    pub fn new(
        degree: impl Into<String>,
        institute: impl Into<String>,
        duration: impl Into<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            degree: degree.into(),
            institute: institute.into(),
            duration: duration.into(),
            description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: Uuid,
    pub title: String,
    pub issuer: String,
    /// Free text date
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Achievement {
    pub fn new(
        title: impl Into<String>,
        issuer: impl Into<String>,
        date: impl Into<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            issuer: issuer.into(),
            date: date.into(),
            description,
        }
    }
}

/// Root aggregate: the only unit ever persisted or loaded as a whole.
/// Every entity id is unique within its own sequence (fresh v4 ids on add).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PortfolioRecord {
    pub personal_info: PersonalInfo,
    pub skills: Vec<Skill>,
    pub experience: Vec<Experience>,
    pub projects: Vec<Project>,
    pub education: Vec<Education>,
    pub achievements: Vec<Achievement>,
}

/// Document template identifier (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    Modern,
    Classic,
    Creative,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 3] = [
        TemplateKind::Modern,
        TemplateKind::Classic,
        TemplateKind::Creative,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TemplateKind::Modern => "Modern",
            TemplateKind::Classic => "Classic",
            TemplateKind::Creative => "Creative",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewMode {
    /// Side-by-side form and preview
    Split,
    /// Full-width preview only
    Full,
}

/// Session settings persisted alongside the portfolio content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    /// Active form step. The store accepts out-of-range values verbatim;
    /// no form resolves for them.
    pub current_step: usize,
    pub selected_template: TemplateKind,
    pub theme: Theme,
    pub preview_mode: PreviewMode,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            current_step: 0,
            selected_template: TemplateKind::Modern,
            theme: Theme::Light,
            preview_mode: PreviewMode::Split,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_personal_info_merge_partial() {
        let info = PersonalInfo {
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            ..Default::default()
        };

        let merged = info.merged(PersonalInfoPatch {
            title: Some("Analyst".to_string()),
            email: Some("ada@babbage.org".to_string()),
            ..Default::default()
        });

        // Patched fields replaced, untouched fields preserved
        assert_eq!(merged.full_name, "Ada Lovelace");
        assert_eq!(merged.title, "Analyst");
        assert_eq!(merged.email, "ada@babbage.org");
    }

    #[test]
    fn test_skill_ids_pairwise_distinct() {
        let skills: Vec<Skill> = (0..50)
            .map(|i| Skill::new(format!("skill-{i}"), SkillLevel::Intermediate))
            .collect();

        for (i, a) in skills.iter().enumerate() {
            for b in &skills[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_tech_stack_dedup_case_sensitive() {
        let mut project = Project::new("Folio", "A portfolio builder");
        project.add_tech("Rust");
        project.add_tech("egui");
        project.add_tech("Rust");
        assert_eq!(project.tech_stack, vec!["Rust", "egui"]);

        // Case-sensitive exact match: different case is a different entry
        project.add_tech("rust");
        assert_eq!(project.tech_stack, vec!["Rust", "egui", "rust"]);
    }

    #[test]
    fn test_skill_level_ordering_and_stars() {
        assert!(SkillLevel::Beginner < SkillLevel::Expert);
        assert!(SkillLevel::Intermediate < SkillLevel::Advanced);
        assert_eq!(SkillLevel::Beginner.star_count(), 1);
        assert_eq!(SkillLevel::Expert.star_count(), 4);
    }

    #[test]
    fn test_record_serde_uses_camel_case() {
        let mut record = PortfolioRecord::default();
        record.personal_info.full_name = "Grace Hopper".to_string();
        record.skills.push(Skill::new("COBOL", SkillLevel::Expert));

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("personalInfo"));
        assert!(json.contains("fullName"));
        assert!(json.contains("techStack") || !json.contains("tech_stack"));

        let back: PortfolioRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_settings_default_values() {
        let settings = AppSettings::default();
        assert_eq!(settings.current_step, 0);
        assert_eq!(settings.selected_template, TemplateKind::Modern);
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.preview_mode, PreviewMode::Split);
    }
}
