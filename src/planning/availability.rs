use chrono::{DateTime, Utc};

use crate::models::{Assignment, Developer, FULL_ALLOCATION};

/// A developer with spare capacity and how much of it is left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Availability<'a> {
    pub developer: &'a Developer,
    pub remaining: i64,
}

/// Sum of the allocations of `developer_id` over the assignments active at `as_of`.
pub fn active_allocation(developer_id: &str, assignments: &[Assignment], as_of: DateTime<Utc>) -> i64 {
    assignments
        .iter()
        .filter(|a| a.developer_id == developer_id && a.is_active(as_of))
        .map(|a| i64::from(a.time_allocation))
        .sum()
}

/// Remaining capacity per developer, in developer order.
///
/// Developers left with nothing (or over-allocated) are dropped from the result.
pub fn availability<'a>(
    developers: &'a [Developer],
    assignments: &[Assignment],
    as_of: DateTime<Utc>,
) -> Vec<Availability<'a>> {
    developers
        .iter()
        .map(|developer| Availability {
            developer,
            remaining: i64::from(FULL_ALLOCATION) - active_allocation(&developer.id, assignments, as_of),
        })
        .filter(|a| a.remaining > 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 9, 30, 0).unwrap()
    }

    fn developer(id: &str) -> Developer {
        Developer {
            id: id.into(),
            first_name: id.to_uppercase(),
            ..Developer::default()
        }
    }

    fn assignment(developer_id: &str, allocation: u32, end: Option<DateTime<Utc>>, indefinite: bool) -> Assignment {
        let mut a = Assignment::new(now() - Duration::days(60));
        a.developer_id = developer_id.into();
        a.project_id = "p1".into();
        a.time_allocation = allocation;
        a.end_date = end;
        a.is_indefinite = indefinite;
        a
    }

    #[test]
    fn expired_assignments_do_not_count() {
        let developers = vec![developer("x")];
        let assignments = vec![
            assignment("x", 40, None, true),
            assignment("x", 30, Some(now() - Duration::days(1)), false),
        ];

        let result = availability(&developers, &assignments, now());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].developer.id, "x");
        assert_eq!(result[0].remaining, 60);
    }

    #[test]
    fn fully_allocated_developer_is_excluded() {
        let developers = vec![developer("x")];
        let assignments = vec![assignment("x", 100, None, true)];
        assert!(availability(&developers, &assignments, now()).is_empty());
    }

    #[test]
    fn over_allocation_is_excluded_not_floored() {
        let developers = vec![developer("x"), developer("y")];
        let assignments = vec![
            assignment("x", 80, None, true),
            assignment("x", 50, Some(now() + Duration::days(3)), false),
        ];

        assert_eq!(active_allocation("x", &assignments, now()), 130);
        let result = availability(&developers, &assignments, now());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].developer.id, "y");
        assert_eq!(result[0].remaining, 100);
    }

    #[test]
    fn output_follows_developer_order() {
        let developers = vec![developer("c"), developer("a"), developer("b")];
        let assignments = vec![assignment("a", 20, None, true), assignment("ghost", 50, None, true)];

        let ids: Vec<_> = availability(&developers, &assignments, now())
            .iter()
            .map(|a| (a.developer.id.as_str(), a.remaining))
            .collect();
        assert_eq!(ids, vec![("c", 100), ("a", 80), ("b", 100)]);
    }

    #[test]
    fn end_date_equal_to_reference_is_inactive() {
        let developers = vec![developer("x")];
        let assignments = vec![assignment("x", 70, Some(now()), false)];
        assert_eq!(availability(&developers, &assignments, now())[0].remaining, 100);
    }
}
