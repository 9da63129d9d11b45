use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::adapter::Detection;

/// Outcome of filtering one frame's detections against the allow-list.
/// `species` is set iff `present` is true.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct FilterResult {
    pub present: bool,
    pub species: Option<String>,
}

impl FilterResult {
    pub fn absent() -> FilterResult {
        FilterResult {
            present: false,
            species: None,
        }
    }
}

/// Reduces a frame's detections to a single "wild animal present" signal.
///
/// A detection qualifies iff its label is allow-listed and its confidence is
/// at least `threshold`. The first qualifying detection in input order names
/// the species; when several distinct species qualify in the same frame the
/// classifier's iteration order decides. Confidences outside [0, 1]
/// (including NaN) never qualify.
pub fn filter(
    detections: &[Detection],
    allow_list: &HashSet<String>,
    threshold: f32,
) -> FilterResult {
    for detection in detections {
        if !(0.0..=1.0).contains(&detection.confidence) {
            continue;
        }
        if detection.confidence >= threshold && allow_list.contains(&detection.label) {
            return FilterResult {
                present: true,
                species: Some(detection.label.clone()),
            };
        }
    }
    FilterResult::absent()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::detect::adapter::BoundingBox;

    fn det(label: &str, confidence: f32) -> Detection {
        Detection::new(
            label,
            confidence,
            BoundingBox {
                x1: 10,
                y1: 20,
                x2: 110,
                y2: 220,
            },
        )
    }

    fn allow(labels: &[&str]) -> HashSet<String> {
        labels.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_no_detections() {
        let result = filter(&[], &allow(&["tiger"]), 0.6);
        assert_eq!(result, FilterResult::absent());
    }

    #[test]
    fn test_allow_listed_species_wins_over_ignored_label() {
        let detections = vec![det("tiger", 0.9), det("dog", 0.95)];
        let result = filter(&detections, &allow(&["tiger", "elephant"]), 0.6);
        assert_eq!(
            result,
            FilterResult {
                present: true,
                species: Some("tiger".to_string()),
            }
        );
    }

    #[test]
    fn test_below_threshold_is_absent() {
        let detections = vec![det("tiger", 0.4)];
        let result = filter(&detections, &allow(&["tiger"]), 0.6);
        assert_eq!(result, FilterResult::absent());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let detections = vec![det("tiger", 0.6)];
        let result = filter(&detections, &allow(&["tiger"]), 0.6);
        assert!(result.present);
    }

    #[test]
    fn test_first_qualifying_species_in_input_order() {
        let detections = vec![
            det("dog", 0.99),
            det("elephant", 0.7),
            det("tiger", 0.95),
        ];
        let result = filter(&detections, &allow(&["tiger", "elephant"]), 0.6);
        assert_eq!(result.species.as_deref(), Some("elephant"));
    }

    #[test]
    fn test_malformed_confidence_ignored() {
        let detections = vec![det("tiger", f32::NAN), det("tiger", 1.7)];
        let result = filter(&detections, &allow(&["tiger"]), 0.6);
        assert_eq!(result, FilterResult::absent());
    }
}
