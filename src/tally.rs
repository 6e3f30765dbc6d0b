use crate::condition::{ConditionLabel, resolve_condition};
use crate::finding::Finding;

/// Derived KPI counts for the title page.
///
/// `rust` and `attention` findings are not counted here; they surface in the
/// photo sections and in the caller-supplied tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConditionCounts {
    pub fire_hazard: usize,
    pub trip_fall: usize,
    pub none: usize,
}

impl ConditionCounts {
    pub fn record(&mut self, label: &ConditionLabel) {
        match label {
            ConditionLabel::FireHazard => self.fire_hazard += 1,
            ConditionLabel::TripFall => self.trip_fall += 1,
            ConditionLabel::None => self.none += 1,
            ConditionLabel::Rust | ConditionLabel::Attention | ConditionLabel::Other(_) => {}
        }
    }

    pub fn total(&self) -> usize {
        self.fire_hazard + self.trip_fall + self.none
    }
}

pub fn count_conditions<'a, I>(findings: I) -> ConditionCounts
where
    I: IntoIterator<Item = &'a Finding>,
{
    let mut counts = ConditionCounts::default();
    for finding in findings {
        counts.record(&resolve_condition(finding));
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn findings(value: serde_json::Value) -> Vec<Finding> {
        serde_json::from_value(value).expect("findings fixture")
    }

    #[test]
    fn empty_input_counts_nothing() {
        assert_eq!(count_conditions(&Vec::<Finding>::new()), ConditionCounts::default());
    }

    #[test]
    fn rust_and_attention_are_excluded() {
        let list = findings(json!([
            { "condition": "fire_hazard" },
            { "condition": "fire_hazard" },
            { "condition_type": "trip_fall" },
            { "tags": { "rust_stains": true } },
            { "severity": "high" },
            {},
        ]));
        let counts = count_conditions(&list);
        assert_eq!(
            counts,
            ConditionCounts {
                fire_hazard: 2,
                trip_fall: 1,
                none: 1,
            }
        );
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn counts_do_not_depend_on_order() {
        let mut list = findings(json!([
            { "condition": "trip_fall" },
            { "condition": "fire_hazard" },
            { "condition": "none" },
            { "priority": "critical" },
            { "condition": "fire_hazard" },
        ]));
        let forward = count_conditions(&list);
        list.reverse();
        assert_eq!(count_conditions(&list), forward);
        list.rotate_left(2);
        assert_eq!(count_conditions(&list), forward);
    }
}
