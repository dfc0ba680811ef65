use chrono::{Local, NaiveDate};

use crate::models::{NormalizedPatient, PatientInput, RiskResult};
use crate::normalize::Normalizer;
use crate::{modifiers, recommend, scenario};

/// Assesses a submission, resolving dates of birth against the local date.
pub fn assess(input: &PatientInput) -> RiskResult {
    assess_on(input, Local::now().date_naive())
}

/// Assesses a submission as of `today`. Deterministic for a fixed date.
pub fn assess_on(input: &PatientInput, today: NaiveDate) -> RiskResult {
    let patient = Normalizer::new(today).normalize(input);
    evaluate(&patient)
}

/// Runs classification, the modifier chain and the recommender over an
/// already normalized patient.
pub fn evaluate(patient: &NormalizedPatient) -> RiskResult {
    let classification = scenario::classify(patient);
    let trace = modifiers::score(patient, classification.scenario, classification.base_risk);
    let category = recommend::categorize(trace.score);

    tracing::debug!(
        scenario = classification.scenario.id(),
        base_risk = classification.base_risk,
        modifiers = trace.applied.len(),
        score = trace.score,
        category = category.as_str(),
        "assessment scored"
    );

    let mut scenario_label = classification.scenario.label();
    if trace.young_age_restricted {
        scenario_label.push_str(" (modified for young age)");
    }

    RiskResult {
        score: trace.score,
        category,
        scenario_label,
        scenario_explanation: trace.applied,
        general_recommendation: recommend::general_recommendation(category),
        personalized_recommendations: recommend::personalized_recommendations(patient),
    }
}
