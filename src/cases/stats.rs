//! Area aggregates over stored cases

use super::record::StoredCase;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Historical figures for one (district, area)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaStatistics {
    pub area: String,
    pub district: String,
    pub total_cases: usize,
    pub avg_risk_score: f64,
    pub positive_cases: usize,
    pub positive_rate: f64,
}

/// An area whose average risk meets a threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaRisk {
    pub district: String,
    pub area: String,
    pub avg_risk_score: f64,
    pub case_count: usize,
}

/// Statistics over cases matching both district and area; `None` if none match
pub fn area_statistics<'a, I>(cases: I, district: &str, area: &str) -> Option<AreaStatistics>
where
    I: IntoIterator<Item = &'a StoredCase>,
{
    let (total, risk_sum, positives) = cases
        .into_iter()
        .filter(|c| c.district == district && c.area == area)
        .fold((0usize, 0.0f64, 0usize), |(n, sum, pos), c| {
            (n + 1, sum + c.risk_score, pos + usize::from(c.outcome))
        });

    if total == 0 {
        return None;
    }

    Some(AreaStatistics {
        area: area.to_string(),
        district: district.to_string(),
        total_cases: total,
        avg_risk_score: risk_sum / total as f64,
        positive_cases: positives,
        positive_rate: positives as f64 / total as f64,
    })
}

/// Areas with average risk at or above `threshold`, highest first
pub fn high_risk_areas<'a, I>(cases: I, threshold: f64) -> Vec<AreaRisk>
where
    I: IntoIterator<Item = &'a StoredCase>,
{
    let mut groups: BTreeMap<(&str, &str), (usize, f64)> = BTreeMap::new();
    for case in cases {
        let entry = groups
            .entry((case.district.as_str(), case.area.as_str()))
            .or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += case.risk_score;
    }

    let mut areas: Vec<AreaRisk> = groups
        .into_iter()
        .map(|((district, area), (count, sum))| AreaRisk {
            district: district.to_string(),
            area: area.to_string(),
            avg_risk_score: sum / count as f64,
            case_count: count,
        })
        .filter(|a| a.avg_risk_score >= threshold)
        .collect();

    areas.sort_by(|a, b| {
        b.avg_risk_score
            .partial_cmp(&a.avg_risk_score)
            .unwrap_or(Ordering::Equal)
    });
    areas
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(district: &str, area: &str, risk: f64, outcome: bool) -> StoredCase {
        StoredCase {
            id: String::new(),
            district: district.to_string(),
            area: area.to_string(),
            risk_score: risk,
            outcome,
            age: 30,
            ns1: false,
            igm: false,
            timestamp: String::new(),
            description: String::new(),
        }
    }

    fn sample() -> Vec<StoredCase> {
        vec![
            case("Dhaka", "Mirpur", 0.9, true),
            case("Dhaka", "Mirpur", 0.7, false),
            case("Dhaka", "Badda", 0.2, false),
            case("Dhaka", "Gulshan", 0.75, true),
            case("Chittagong", "Mirpur", 0.1, false),
        ]
    }

    #[test]
    fn test_area_statistics() {
        let cases = sample();
        let stats = area_statistics(&cases, "Dhaka", "Mirpur").unwrap();
        assert_eq!(stats.total_cases, 2);
        assert!((stats.avg_risk_score - 0.8).abs() < 1e-12);
        assert_eq!(stats.positive_cases, 1);
        assert!((stats.positive_rate - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_area_statistics_requires_both_keys() {
        let cases = sample();
        assert!(area_statistics(&cases, "Dhaka", "Uttara").is_none());
        assert!(area_statistics(&cases, "Sylhet", "Mirpur").is_none());
        assert!(area_statistics(&Vec::new(), "Dhaka", "Mirpur").is_none());
    }

    #[test]
    fn test_high_risk_areas_sorted_and_filtered() {
        let cases = sample();
        let areas = high_risk_areas(&cases, 0.7);
        let names: Vec<&str> = areas.iter().map(|a| a.area.as_str()).collect();
        assert_eq!(names, ["Mirpur", "Gulshan"]);
        assert_eq!(areas[0].case_count, 2);
        assert_eq!(areas[0].district, "Dhaka");

        assert!(high_risk_areas(&cases, 0.95).is_empty());
        assert_eq!(high_risk_areas(&cases, 0.0).len(), 4);
    }
}
