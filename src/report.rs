use std::collections::HashMap;
use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::{AssessmentRecord, CategorySummary, RiskCategory, RiskResult};

/// Markdown rendering of a single assessment.
pub fn render_assessment(result: &RiskResult, respondent: Option<&str>) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Cervical Cancer Risk Assessment");
    if let Some(name) = respondent {
        let _ = writeln!(output, "Prepared for {name}");
    }
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "**Risk score:** {:.1}% ({})",
        result.score, result.category
    );
    let _ = writeln!(output, "**Scenario:** {}", result.scenario_label);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Contributing Factors");

    if result.scenario_explanation.is_empty() {
        let _ = writeln!(output, "No additional risk factors applied.");
    } else {
        for factor in result.scenario_explanation.iter() {
            let _ = writeln!(output, "- {factor}");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recommendation");
    let _ = writeln!(output, "{}", result.general_recommendation);

    if !result.personalized_recommendations.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Personalized Advice");
        for advice in result.personalized_recommendations.iter() {
            let _ = writeln!(output, "- {advice}");
        }
    }

    output
}

/// Count and mean score per category, highest category first.
pub fn summarize_by_category(records: &[AssessmentRecord]) -> Vec<CategorySummary> {
    let mut map: HashMap<RiskCategory, (usize, f64)> = HashMap::new();

    for record in records {
        let entry = map.entry(record.result.category).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += record.result.score;
    }

    let mut summaries: Vec<CategorySummary> = map
        .into_iter()
        .map(|(category, (count, total_score))| CategorySummary {
            category,
            count,
            avg_score: if count == 0 {
                0.0
            } else {
                total_score / count as f64
            },
        })
        .collect();

    summaries.sort_by(|a, b| b.category.cmp(&a.category));
    summaries
}

/// How often each modifier fired, most frequent first. Labels are grouped
/// without their point suffix so variable HIV increments count together.
pub fn modifier_frequency(records: &[AssessmentRecord]) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for record in records {
        for label in record.result.scenario_explanation.iter() {
            let name = label
                .split_once(" (+")
                .map_or(label.as_str(), |(name, _)| name);
            *counts.entry(name.to_string()).or_insert(0) += 1;
        }
    }

    let mut frequency: Vec<(String, usize)> = counts.into_iter().collect();
    frequency.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    frequency
}

pub fn build_report(
    source: Option<&str>,
    assessed_on: NaiveDate,
    records: &[AssessmentRecord],
    limit: usize,
) -> String {
    let summaries = summarize_by_category(records);
    let frequency = modifier_frequency(records);

    let mut output = String::new();
    let source_label = source.unwrap_or("all submissions");

    let _ = writeln!(output, "# Cervical Cancer Screening Batch Report");
    let _ = writeln!(
        output,
        "Generated for {} ({} submissions assessed on {})",
        source_label,
        records.len(),
        assessed_on
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Category Mix");

    if summaries.is_empty() {
        let _ = writeln!(output, "No submissions in this batch.");
    } else {
        for summary in summaries.iter() {
            let _ = writeln!(
                output,
                "- {}: {} submissions (avg score {:.1})",
                summary.category, summary.count, summary.avg_score
            );
        }
    }

    let mut ranked: Vec<&AssessmentRecord> = records.iter().collect();
    ranked.sort_by(|a, b| {
        b.result
            .score
            .partial_cmp(&a.result.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let _ = writeln!(output);
    let _ = writeln!(output, "## Highest Risk Submissions");

    if ranked.is_empty() {
        let _ = writeln!(output, "No submissions in this batch.");
    } else {
        for record in ranked.iter().take(limit) {
            let _ = writeln!(
                output,
                "- {} score {:.1} ({}): {}",
                record.respondent.as_deref().unwrap_or("anonymous"),
                record.result.score,
                record.result.category,
                record.result.scenario_label
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Most Frequent Modifiers");

    if frequency.is_empty() {
        let _ = writeln!(output, "No modifiers applied in this batch.");
    } else {
        for (name, count) in frequency.iter().take(limit) {
            let _ = writeln!(output, "- {name}: {count}");
        }
    }

    output
}
