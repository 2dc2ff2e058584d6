use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Record;
use crate::store::Collection;

pub const FULL_ALLOCATION: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    #[serde(skip)]
    pub id: String,
    #[serde(default)]
    pub developer_id: String,
    #[serde(default)]
    pub project_id: String,
    /// Percentage of the developer's time, 0 to 100.
    #[serde(default)]
    pub time_allocation: u32,
    pub start_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_indefinite: bool,
}

impl Assignment {
    /// Blank assignment as presented by the creation dialog.
    pub fn new(start_date: DateTime<Utc>) -> Self {
        Self {
            id: String::new(),
            developer_id: String::new(),
            project_id: String::new(),
            time_allocation: FULL_ALLOCATION,
            start_date,
            end_date: None,
            is_indefinite: false,
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_empty()
    }

    /// Indefinite, or ending strictly after `as_of`.
    pub fn is_active(&self, as_of: DateTime<Utc>) -> bool {
        self.is_indefinite || self.end_date.is_some_and(|end| end > as_of)
    }
}

impl Record for Assignment {
    const COLLECTION: Collection = Collection::Assignments;
    const CLEARABLE: &'static [&'static str] = &["endDate"];

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
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn indefinite_assignment_is_always_active() {
        let mut assignment = Assignment::new(now() - Duration::days(30));
        assignment.is_indefinite = true;
        assignment.end_date = Some(now() - Duration::days(1));
        assert!(assignment.is_active(now()));
    }

    #[test]
    fn end_date_must_be_strictly_after_reference() {
        let mut assignment = Assignment::new(now() - Duration::days(30));
        assignment.end_date = Some(now());
        assert!(!assignment.is_active(now()));

        assignment.end_date = Some(now() + Duration::seconds(1));
        assert!(assignment.is_active(now()));
    }

    #[test]
    fn open_ended_but_not_indefinite_is_inactive() {
        let assignment = Assignment::new(now() - Duration::days(30));
        assert!(!assignment.is_active(now()));
    }
}
