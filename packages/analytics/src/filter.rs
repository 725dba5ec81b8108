//! Record filtering.

use retrofit_map_analytics_models::FilterCriteria;
use retrofit_map_building_models::BuildingRecord;

/// Whether a single record passes every active axis of `criteria`.
///
/// Axes are checked cheapest first: tier equality, then property type
/// equality, then the energy range. The range requires a score to be
/// present, unless the range is the full 0-100 sentinel, in which case it
/// is not checked at all.
#[must_use]
pub fn matches(record: &BuildingRecord, criteria: &FilterCriteria) -> bool {
    if let Some(priority) = criteria.priority
        && record.retrofit_priority != Some(priority)
    {
        return false;
    }

    if let Some(property_type) = criteria.active_property_type()
        && record.primary_property_type.as_deref() != Some(property_type)
    {
        return false;
    }

    if criteria.is_full_range() {
        return true;
    }

    record
        .energy_star_score
        .is_some_and(|score| (criteria.energy_min..=criteria.energy_max).contains(&score))
}

/// Returns the records that pass `criteria`, in input order.
#[must_use]
pub fn apply(records: &[BuildingRecord], criteria: &FilterCriteria) -> Vec<BuildingRecord> {
    let filtered: Vec<BuildingRecord> = records
        .iter()
        .filter(|record| matches(record, criteria))
        .cloned()
        .collect();

    log::debug!(
        "Filtered {} buildings down to {} ({:?})",
        records.len(),
        filtered.len(),
        criteria.applied_filters()
    );

    filtered
}

/// Returns the `Critical` and `High` tier records, in input order.
#[must_use]
pub fn retrofit_candidates(records: &[BuildingRecord]) -> Vec<BuildingRecord> {
    let candidates: Vec<BuildingRecord> = records
        .iter()
        .filter(|record| record.is_retrofit_candidate())
        .cloned()
        .collect();

    log::debug!(
        "Showing {} retrofit candidates out of {} buildings",
        candidates.len(),
        records.len()
    );

    candidates
}

#[cfg(test)]
mod tests {
    use retrofit_map_building_models::RetrofitPriority;

    use super::*;

    fn building(
        id: i64,
        priority: Option<RetrofitPriority>,
        property_type: Option<&str>,
        score: Option<i64>,
    ) -> BuildingRecord {
        BuildingRecord {
            id,
            retrofit_priority: priority,
            primary_property_type: property_type.map(str::to_string),
            energy_star_score: score,
            ..BuildingRecord::default()
        }
    }

    fn fixture() -> Vec<BuildingRecord> {
        vec![
            building(1, Some(RetrofitPriority::Critical), Some("Office"), Some(90)),
            building(2, Some(RetrofitPriority::High), Some("School"), Some(40)),
            building(3, Some(RetrofitPriority::Low), Some("Office"), Some(0)),
            building(4, Some(RetrofitPriority::Unknown), None, None),
            building(5, None, Some("Retail"), Some(75)),
            building(6, Some(RetrofitPriority::High), Some("Office"), None),
        ]
    }

    fn ids(records: &[BuildingRecord]) -> Vec<i64> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn default_criteria_keeps_everything() {
        let records = fixture();
        assert_eq!(apply(&records, &FilterCriteria::default()), records);
    }

    #[test]
    fn apply_is_idempotent() {
        let records = fixture();
        let criteria = FilterCriteria::default()
            .with_property_type("Office")
            .with_energy_range(10, 95);

        let once = apply(&records, &criteria);
        let twice = apply(&once, &criteria);

        assert_eq!(once, twice);
        assert_eq!(ids(&once), vec![1]);
    }

    #[test]
    fn partial_range_excludes_missing_scores() {
        let records = fixture();

        let ranged = apply(&records, &FilterCriteria::default().with_energy_range(50, 100));
        assert_eq!(ids(&ranged), vec![1, 5]);

        let full = apply(&records, &FilterCriteria::default().with_energy_range(0, 100));
        assert!(ids(&full).contains(&4));
        assert!(ids(&full).contains(&6));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let records = fixture();
        let filtered = apply(&records, &FilterCriteria::default().with_energy_range(0, 40));
        assert_eq!(ids(&filtered), vec![2, 3]);
    }

    #[test]
    fn priority_and_type_are_anded() {
        let records = fixture();
        let criteria = FilterCriteria::default()
            .with_priority(RetrofitPriority::High)
            .with_property_type("Office");
        assert_eq!(ids(&apply(&records, &criteria)), vec![6]);
    }

    #[test]
    fn empty_property_type_is_ignored() {
        let records = fixture();
        let criteria = FilterCriteria::default().with_property_type("");
        assert_eq!(apply(&records, &criteria).len(), records.len());
    }

    #[test]
    fn candidates_are_critical_and_high_only() {
        let records = fixture();
        assert_eq!(ids(&retrofit_candidates(&records)), vec![1, 2, 6]);
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(apply(&[], &FilterCriteria::default().with_energy_range(1, 2)).is_empty());
        assert!(retrofit_candidates(&[]).is_empty());
    }
}
