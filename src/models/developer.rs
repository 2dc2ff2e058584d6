use serde::{Deserialize, Serialize};

use super::Record;
use crate::store::Collection;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Developer {
    #[serde(skip)]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub employee_id: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub technical_skills: Vec<String>,
}

impl Developer {
    pub fn is_new(&self) -> bool {
        self.id.is_empty()
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Appends a skill unless it is blank or already listed. Returns whether the list changed.
    pub fn add_skill(&mut self, skill: &str) -> bool {
        let skill = skill.trim();
        if skill.is_empty() || self.technical_skills.iter().any(|s| s == skill) {
            return false;
        }
        self.technical_skills.push(skill.to_string());
        true
    }

    /// Removes the skill with exactly this label. Returns whether the list changed.
    pub fn remove_skill(&mut self, skill: &str) -> bool {
        let before = self.technical_skills.len();
        self.technical_skills.retain(|s| s != skill);
        self.technical_skills.len() != before
    }
}

impl Record for Developer {
    const COLLECTION: Collection = Collection::Developers;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adding_a_skill_twice_keeps_one_occurrence() {
        let mut developer = Developer::default();
        assert!(developer.add_skill("Go"));
        assert!(!developer.add_skill("Go"));
        assert_eq!(developer.technical_skills, vec!["Go".to_string()]);
    }

    #[test]
    fn empty_skill_is_ignored() {
        let mut developer = Developer::default();
        assert!(!developer.add_skill(""));
        assert!(!developer.add_skill("   "));
        assert!(developer.technical_skills.is_empty());
    }

    #[test]
    fn skills_keep_insertion_order() {
        let mut developer = Developer::default();
        developer.add_skill("Rust");
        developer.add_skill("SQL");
        developer.add_skill("Go");
        assert_eq!(developer.technical_skills, vec!["Rust", "SQL", "Go"]);
    }

    #[test]
    fn removing_an_absent_skill_is_a_no_op() {
        let mut developer = Developer::default();
        developer.add_skill("Rust");
        assert!(!developer.remove_skill("rust"));
        assert_eq!(developer.technical_skills, vec!["Rust".to_string()]);
        assert!(developer.remove_skill("Rust"));
        assert!(developer.technical_skills.is_empty());
    }

    #[test]
    fn encodes_camel_case_fields() {
        let developer = Developer {
            id: "d1".into(),
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            employee_id: "E-042".into(),
            position: "Lead".into(),
            technical_skills: vec!["COBOL".into()],
        };
        let value = serde_json::to_value(&developer).unwrap();
        assert_eq!(value["firstName"], "Grace");
        assert_eq!(value["employeeId"], "E-042");
        assert_eq!(value["technicalSkills"][0], "COBOL");
        assert!(value.get("id").is_none());
    }
}
