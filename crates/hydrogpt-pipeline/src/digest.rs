//! Context digest builder
//!
//! Formats current database aggregates into the plain-text block injected
//! into the model prompt. Pure function over fetched rows: same rows produce
//! a byte-identical digest.

use hydrogpt_core::{AccessibilityCategory, AreaStats, SubcountySummary};
use std::fmt::Write;

/// Build the full data digest from per-area rows (sorted by ascending
/// accessibility) and subcounty-wide aggregates.
pub fn build_digest(areas: &[AreaStats], summary: &SubcountySummary) -> String {
    let mut out = String::new();

    out.push_str("REAL-TIME DATABASE CONTEXT (Mbeere South Subcounty):\n\n");
    out.push_str("OVERVIEW STATISTICS:\n");
    let _ = writeln!(out, "- Total sublocations: {}", summary.total_areas);
    let _ = writeln!(
        out,
        "- Total population: {} people",
        group_thousands(summary.total_population.unwrap_or(0))
    );
    let _ = writeln!(
        out,
        "- Total water points: {}",
        summary.total_water_points.unwrap_or(0)
    );
    let _ = writeln!(
        out,
        "- Average accessibility score: {}",
        fmt_score(summary.avg_accessibility)
    );
    let _ = writeln!(
        out,
        "- Accessibility range: {} to {}",
        fmt_score(summary.min_accessibility),
        fmt_score(summary.max_accessibility)
    );

    out.push_str("\nCATEGORY DISTRIBUTION:\n");
    for category in AccessibilityCategory::ALL {
        let members: Vec<&AreaStats> = areas
            .iter()
            .filter(|a| a.category() == category)
            .collect();
        if members.is_empty() {
            continue;
        }
        let population: i64 = members.iter().map(|a| a.population).sum();
        let _ = writeln!(
            out,
            "- {}: {} areas, {} people",
            category,
            members.len(),
            group_thousands(population)
        );
    }

    out.push_str("\nDETAILED SUBLOCATION DATA:\n");
    for area in areas {
        let _ = writeln!(
            out,
            "- {}: {} ({}) | Pop: {} | Water points: {}",
            area.name,
            fmt_score(area.accessibility),
            area.category(),
            group_thousands(area.population),
            area.water_points
        );
    }

    out.push_str("\nPRIORITY INTERVENTION AREAS (Worst 3):\n");
    for area in priority_areas(areas) {
        let _ = writeln!(
            out,
            "- {}: {} ({}) - {} people affected",
            area.name,
            fmt_score(area.accessibility),
            area.category(),
            group_thousands(area.population)
        );
    }

    out.push_str("\nTOP PERFORMING AREAS (Best 3):\n");
    for area in top_performing_areas(areas) {
        let _ = writeln!(
            out,
            "- {}: {} ({}) - {} people well-served",
            area.name,
            fmt_score(area.accessibility),
            area.category(),
            group_thousands(area.population)
        );
    }

    out
}

/// The first three areas classified Very Weak or Weak, in ascending order
fn priority_areas(areas: &[AreaStats]) -> Vec<&AreaStats> {
    areas
        .iter()
        .filter(|a| {
            matches!(
                a.category(),
                AccessibilityCategory::VeryWeak | AccessibilityCategory::Weak
            )
        })
        .take(3)
        .collect()
}

/// The last three areas classified Very Good, i.e. the highest scorers
fn top_performing_areas(areas: &[AreaStats]) -> Vec<&AreaStats> {
    let very_good: Vec<&AreaStats> = areas
        .iter()
        .filter(|a| a.category() == AccessibilityCategory::VeryGood)
        .collect();
    let skip = very_good.len().saturating_sub(3);
    very_good.into_iter().skip(skip).collect()
}

fn fmt_score(score: Option<f64>) -> String {
    match score {
        Some(x) => format!("{x:.3}"),
        None => "n/a".to_string(),
    }
}

/// Format an integer with comma thousands separators
fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if n < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(name: &str, score: f64, population: i64, water_points: i64) -> AreaStats {
        AreaStats {
            name: name.to_string(),
            accessibility: Some(score),
            population,
            water_points,
            high_capacity: 0,
            medium_capacity: 0,
            low_capacity: water_points,
        }
    }

    fn fixture() -> (Vec<AreaStats>, SubcountySummary) {
        let areas = vec![
            area("MAKIMA", 0.968, 3245, 3),
            area("GATEGI", 1.05, 2100, 4),
            area("MBITA", 1.12, 1800, 2),
            area("KIAMBERE", 1.34, 4120, 5),
            area("KARABA", 1.45, 2890, 6),
            area("MWEA", 1.62, 3300, 7),
            area("NYANGWA", 1.71, 2500, 8),
        ];
        let summary = SubcountySummary {
            total_areas: 7,
            avg_accessibility: Some(1.322714),
            min_accessibility: Some(0.968),
            max_accessibility: Some(1.71),
            total_population: Some(19955),
            total_water_points: Some(35),
        };
        (areas, summary)
    }

    #[test]
    fn test_digest_is_deterministic() {
        let (areas, summary) = fixture();
        let a = build_digest(&areas, &summary);
        let b = build_digest(&areas, &summary);
        assert_eq!(a, b);
    }

    #[test]
    fn test_digest_overview_section() {
        let (areas, summary) = fixture();
        let digest = build_digest(&areas, &summary);

        assert!(digest.contains("- Total sublocations: 7"));
        assert!(digest.contains("- Total population: 19,955 people"));
        assert!(digest.contains("- Total water points: 35"));
        assert!(digest.contains("- Average accessibility score: 1.323"));
        assert!(digest.contains("- Accessibility range: 0.968 to 1.710"));
    }

    #[test]
    fn test_digest_category_distribution() {
        let (areas, summary) = fixture();
        let digest = build_digest(&areas, &summary);

        assert!(digest.contains("- Very Weak: 1 areas, 3,245 people"));
        assert!(digest.contains("- Weak: 2 areas, 3,900 people"));
        assert!(digest.contains("- Good: 2 areas, 7,010 people"));
        assert!(digest.contains("- Very Good: 2 areas, 5,800 people"));
        assert!(!digest.contains("- Unknown:"));
    }

    #[test]
    fn test_digest_area_listing() {
        let (areas, summary) = fixture();
        let digest = build_digest(&areas, &summary);

        assert!(digest.contains("- MAKIMA: 0.968 (Very Weak) | Pop: 3,245 | Water points: 3"));
        assert!(digest.contains("- KARABA: 1.450 (Good) | Pop: 2,890 | Water points: 6"));
    }

    #[test]
    fn test_priority_and_top_lists() {
        let (areas, summary) = fixture();
        let digest = build_digest(&areas, &summary);

        let priority = digest
            .split("PRIORITY INTERVENTION AREAS (Worst 3):\n")
            .nth(1)
            .unwrap()
            .split("\nTOP PERFORMING")
            .next()
            .unwrap();
        assert!(priority.contains("MAKIMA"));
        assert!(priority.contains("GATEGI"));
        assert!(priority.contains("MBITA"));
        assert!(!priority.contains("KIAMBERE"));

        let top = digest.split("TOP PERFORMING AREAS (Best 3):\n").nth(1).unwrap();
        assert!(top.contains("MWEA"));
        assert!(top.contains("NYANGWA"));
        assert!(top.contains("people well-served"));
        assert!(!top.contains("KARABA"));
    }

    #[test]
    fn test_empty_table_digest() {
        let digest = build_digest(&[], &SubcountySummary::default());
        assert!(digest.contains("- Total sublocations: 0"));
        assert!(digest.contains("- Total population: 0 people"));
        assert!(digest.contains("- Average accessibility score: n/a"));
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
        assert_eq!(group_thousands(-4500), "-4,500");
    }
}
