//! Summary statistics over record subsets.

use retrofit_map_analytics_models::{
    FilterCriteria, FilterInsights, HeadlineStats, PriorityCount, PropertyTypeCount,
    SummaryStatistics, round_one_decimal,
};
use retrofit_map_building_models::{BuildingRecord, RetrofitPriority};

/// Running sum and qualifying count for one average.
#[derive(Debug, Default, Clone, Copy)]
struct Mean {
    sum: f64,
    count: u64,
}

impl Mean {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    #[allow(clippy::cast_precision_loss)]
    fn value(self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some(self.sum / self.count as f64)
    }
}

/// Computes summary statistics in a single pass.
///
/// Records with an unrecognized or missing tier count toward `total` but
/// toward no tier bucket. Records without a property type land in the
/// `"Unknown"` bucket. Only scores strictly greater than zero are averaged.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize(records: &[BuildingRecord]) -> SummaryStatistics {
    let tiers = RetrofitPriority::all();
    let mut tier_counts = vec![0_u64; tiers.len()];
    let mut by_property_type: Vec<PropertyTypeCount> = Vec::new();
    let mut energy = Mean::default();
    let mut retrofit = Mean::default();
    let mut needs_retrofit = 0;

    for record in records {
        if let Some(tier) = record.tier()
            && let Some(index) = tiers.iter().position(|t| *t == tier)
        {
            tier_counts[index] += 1;
        }

        let property_type = record.property_type_or_unknown();
        match by_property_type
            .iter_mut()
            .find(|c| c.property_type == property_type)
        {
            Some(bucket) => bucket.count += 1,
            None => by_property_type.push(PropertyTypeCount {
                property_type: property_type.to_string(),
                count: 1,
            }),
        }

        if let Some(score) = record.qualifying_energy_score() {
            energy.add(score as f64);
        }
        if let Some(score) = record.qualifying_retrofit_score() {
            retrofit.add(score);
        }
        if record.is_flagged_for_retrofit() {
            needs_retrofit += 1;
        }
    }

    SummaryStatistics {
        total: records.len() as u64,
        by_priority: tiers
            .iter()
            .zip(tier_counts)
            .map(|(priority, count)| PriorityCount {
                priority: *priority,
                count,
            })
            .collect(),
        by_property_type,
        average_energy_score: energy.value(),
        average_retrofit_score: retrofit.value(),
        needs_retrofit,
    }
}

/// The `n` most common property types, most frequent first.
///
/// Ties keep the order in which the types were first encountered.
#[must_use]
pub fn top_property_types(stats: &SummaryStatistics, n: usize) -> Vec<PropertyTypeCount> {
    let mut sorted = stats.by_property_type.clone();
    sorted.sort_by(|a, b| b.count.cmp(&a.count));
    sorted.truncate(n);
    sorted
}

/// Builds the insights overlay content for a filtered subset.
///
/// `total_original` is the size of the full dataset the subset was drawn
/// from. `view_label` names a preset view (e.g. `"Retrofit Candidates"`)
/// and is listed after the criteria labels. At most `top_n` property types
/// are ranked.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn insights(
    filtered: &[BuildingRecord],
    total_original: usize,
    criteria: &FilterCriteria,
    view_label: Option<&str>,
    top_n: usize,
) -> FilterInsights {
    let stats = summarize(filtered);
    let top_property_types = top_property_types(&stats, top_n);

    let percentage = if total_original == 0 {
        0.0
    } else {
        round_one_decimal(filtered.len() as f64 / total_original as f64 * 100.0)
    };

    let mut applied_filters = criteria.applied_filters();
    if let Some(view) = view_label {
        applied_filters.push(format!("View: {view}"));
    }

    FilterInsights {
        filtered_count: stats.total,
        total_count: total_original as u64,
        percentage,
        applied_filters,
        stats,
        top_property_types,
    }
}

/// Computes the page-level stat widgets over the full dataset.
#[must_use]
pub fn headline(records: &[BuildingRecord]) -> HeadlineStats {
    let stats = summarize(records);

    HeadlineStats {
        total: stats.total,
        critical: stats.priority_count(RetrofitPriority::Critical),
        high: stats.priority_count(RetrofitPriority::High),
        needs_retrofit: stats.needs_retrofit,
        average_energy_score: stats.average_energy_score.map(round_whole),
        average_retrofit_score: stats.average_retrofit_score.map(round_whole),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn round_whole(value: f64) -> i64 {
    value.round() as i64
}

#[cfg(test)]
mod tests {
    use retrofit_map_analytics_models::{TOP_PROPERTY_TYPES, format_average};

    use super::*;
    use crate::filter::{apply, retrofit_candidates};

    fn building(
        priority: Option<RetrofitPriority>,
        property_type: Option<&str>,
        score: Option<i64>,
    ) -> BuildingRecord {
        BuildingRecord {
            retrofit_priority: priority,
            primary_property_type: property_type.map(str::to_string),
            energy_star_score: score,
            ..BuildingRecord::default()
        }
    }

    #[test]
    fn empty_subset_has_unavailable_averages() {
        let stats = summarize(&[]);

        assert_eq!(stats.total, 0);
        assert_eq!(stats.average_energy_score, None);
        assert_eq!(stats.average_retrofit_score, None);
        assert_eq!(format_average(stats.average_energy_score), "N/A");
        assert_eq!(stats.by_priority.len(), 5);
        assert_eq!(stats.tier_total(), 0);
    }

    #[test]
    fn candidates_average_ignores_excluded_zero_score() {
        let records = vec![
            building(Some(RetrofitPriority::Critical), None, Some(90)),
            building(Some(RetrofitPriority::High), None, Some(40)),
            building(Some(RetrofitPriority::Low), None, Some(0)),
        ];

        let candidates = retrofit_candidates(&records);
        assert_eq!(candidates, records[..2].to_vec());

        let stats = summarize(&candidates);
        assert_eq!(stats.average_energy_score, Some(65.0));
        assert_eq!(format_average(stats.average_energy_score), "65.0");
    }

    #[test]
    fn zero_scores_do_not_qualify() {
        let mut zero = building(None, None, Some(0));
        zero.retrofit_score = Some(0.0);
        let mut scored = building(None, None, Some(80));
        scored.retrofit_score = Some(42.5);

        let stats = summarize(&[zero.clone()]);
        assert_eq!(stats.average_energy_score, None);
        assert_eq!(stats.average_retrofit_score, None);

        let stats = summarize(&[zero, scored]);
        assert_eq!(stats.average_energy_score, Some(80.0));
        assert_eq!(stats.average_retrofit_score, Some(42.5));
    }

    #[test]
    fn unrecognized_tiers_count_toward_total_only() {
        let records = vec![
            building(Some(RetrofitPriority::Critical), None, None),
            building(Some(RetrofitPriority::Unknown), None, None),
            building(None, None, None),
            building(Some(RetrofitPriority::Minimal), None, None),
        ];

        let stats = summarize(&records);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.tier_total(), 2);
        assert_eq!(stats.priority_count(RetrofitPriority::Critical), 1);
        assert_eq!(stats.priority_count(RetrofitPriority::Minimal), 1);
        assert_eq!(stats.priority_count(RetrofitPriority::High), 0);
        assert_eq!(
            stats
                .by_priority
                .iter()
                .map(|c| c.priority)
                .collect::<Vec<_>>(),
            RetrofitPriority::all()
        );
    }

    #[test]
    fn tier_total_equals_total_when_all_recognized() {
        let records: Vec<BuildingRecord> = RetrofitPriority::all()
            .iter()
            .map(|p| building(Some(*p), None, None))
            .collect();
        let stats = summarize(&records);
        assert_eq!(stats.tier_total(), stats.total);
    }

    #[test]
    fn missing_type_lands_in_unknown_bucket() {
        let records = vec![
            building(None, Some("Office"), None),
            building(None, None, None),
            building(None, None, None),
        ];
        let stats = summarize(&records);
        assert_eq!(stats.property_type_count("Office"), 1);
        assert_eq!(stats.property_type_count("Unknown"), 2);
        assert_eq!(stats.by_property_type[0].property_type, "Office");
    }

    #[test]
    fn top_types_break_ties_by_discovery_order() {
        let records = vec![
            building(None, Some("A"), None),
            building(None, Some("B"), None),
            building(None, Some("C"), None),
            building(None, Some("B"), None),
            building(None, Some("A"), None),
        ];
        let stats = summarize(&records);

        let top = top_property_types(&stats, 2);

        assert_eq!(
            top,
            vec![
                PropertyTypeCount {
                    property_type: "A".to_string(),
                    count: 2,
                },
                PropertyTypeCount {
                    property_type: "B".to_string(),
                    count: 2,
                },
            ]
        );
    }

    #[test]
    fn top_types_sort_by_count() {
        let records = vec![
            building(None, Some("A"), None),
            building(None, Some("B"), None),
            building(None, Some("B"), None),
        ];
        let top = top_property_types(&summarize(&records), 3);
        assert_eq!(top[0].property_type, "B");
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn insights_report_share_and_labels() {
        let records = vec![
            building(Some(RetrofitPriority::Critical), Some("Office"), Some(90)),
            building(Some(RetrofitPriority::High), Some("School"), Some(40)),
            building(Some(RetrofitPriority::Low), Some("Office"), Some(10)),
        ];
        let criteria = FilterCriteria::default().with_property_type("Office");
        let filtered = apply(&records, &criteria);

        let insights = insights(&filtered, records.len(), &criteria, None, TOP_PROPERTY_TYPES);

        assert_eq!(insights.filtered_count, 2);
        assert_eq!(insights.total_count, 3);
        assert!((insights.percentage - 66.7).abs() < 1e-9);
        assert_eq!(insights.applied_filters, vec!["Type: Office"]);
        assert_eq!(insights.stats.average_energy_score, Some(50.0));
        assert_eq!(insights.top_property_types.len(), 1);
    }

    #[test]
    fn insights_rank_requested_number_of_types() {
        let records = vec![
            building(None, Some("Office"), None),
            building(None, Some("School"), None),
            building(None, Some("Office"), None),
            building(None, Some("Retail"), None),
            building(None, Some("Hotel"), None),
        ];

        let insights = insights(&records, records.len(), &FilterCriteria::default(), None, 2);

        let names: Vec<_> = insights
            .top_property_types
            .iter()
            .map(|t| t.property_type.as_str())
            .collect();
        assert_eq!(names, vec!["Office", "School"]);
        assert_eq!(insights.stats.by_property_type.len(), 4);
    }

    #[test]
    fn insights_append_view_label() {
        let insights = insights(
            &[],
            10,
            &FilterCriteria::default(),
            Some("Retrofit Candidates"),
            TOP_PROPERTY_TYPES,
        );
        assert_eq!(insights.applied_filters, vec!["View: Retrofit Candidates"]);
        assert!(insights.percentage.abs() < f64::EPSILON);
    }

    #[test]
    fn insights_over_empty_dataset_report_zero_percent() {
        let insights = insights(&[], 0, &FilterCriteria::default(), None, TOP_PROPERTY_TYPES);
        assert!(insights.percentage.abs() < f64::EPSILON);
        assert!(!insights.percentage.is_nan());
    }

    #[test]
    fn headline_rounds_averages() {
        let mut first = building(Some(RetrofitPriority::Critical), None, Some(61));
        first.needs_retrofit = Some(true);
        first.retrofit_score = Some(70.4);
        let second = building(Some(RetrofitPriority::High), None, Some(62));
        let third = building(Some(RetrofitPriority::High), None, None);

        let stats = headline(&[first, second, third]);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.critical, 1);
        assert_eq!(stats.high, 2);
        assert_eq!(stats.needs_retrofit, 1);
        assert_eq!(stats.average_energy_score, Some(62));
        assert_eq!(stats.average_retrofit_score, Some(70));
    }

    #[test]
    fn headline_over_empty_dataset() {
        let stats = headline(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.average_energy_score, None);
    }
}
