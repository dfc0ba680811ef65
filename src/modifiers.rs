use crate::models::{
    ContraceptiveYears, FirstIntercourseAge, MaritalStatus, NormalizedPatient, SexualPartners,
    SmokingLevel,
};
use crate::scenario::Scenario;

pub const MAX_SCORE: f64 = 99.0;
pub const YOUNG_AGE: u32 = 20;
pub const YOUNG_BASE_RISK: f64 = 10.0;
pub const YOUNG_SCORE_CAP: f64 = 30.0;

/// A single additive adjustment and the label recorded for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Adjustment {
    pub points: f64,
    pub label: String,
}

impl Adjustment {
    fn new(points: f64, label: impl Into<String>) -> Self {
        Self {
            points,
            label: label.into(),
        }
    }
}

type Modifier = fn(&NormalizedPatient) -> Option<Adjustment>;

/// Additive modifiers in firing order. The HIV modifier is not listed here
/// because it depends on the running score and always runs after these.
const ADDITIVE_MODIFIERS: [Modifier; 12] = [
    changed_periods,
    dyspareunia,
    weight_loss_and_fatigue,
    weight_loss_alone,
    fatigue_alone,
    sexual_partners,
    smoking,
    marital_status,
    contraceptive_use,
    first_intercourse,
    abnormal_pap_smear,
    high_parity,
];

/// Final score plus the audit trail of everything that moved it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTrace {
    pub score: f64,
    /// Whether the young-patient override and cap were in force.
    pub young_age_restricted: bool,
    pub applied: Vec<String>,
}

/// Under-20s get the flat young-age base and the 30 cap unless they present
/// with all three symptoms or with post-coital/post-menopausal bleeding.
pub fn young_age_restricted(patient: &NormalizedPatient, scenario: Scenario) -> bool {
    let exempt = scenario == Scenario::AllThree
        || (patient.has_bleeding && patient.is_post_coital_or_menopausal);
    patient.age < YOUNG_AGE && !exempt
}

pub fn score(patient: &NormalizedPatient, scenario: Scenario, base_risk: f64) -> ScoreTrace {
    let restricted = young_age_restricted(patient, scenario);
    let mut score = if restricted { YOUNG_BASE_RISK } else { base_risk };
    let mut applied = Vec::new();

    for modifier in ADDITIVE_MODIFIERS {
        if let Some(adjustment) = modifier(patient) {
            score += adjustment.points;
            applied.push(adjustment.label);
        }
    }

    if patient.hiv_positive {
        let increment = hiv_increment(score);
        score += increment;
        applied.push(format!("HIV positive (+{increment:.1}%)"));
    }

    score = score.clamp(0.0, MAX_SCORE);

    if restricted && score > YOUNG_SCORE_CAP {
        score = YOUNG_SCORE_CAP;
        applied.push(format!("Risk capped at {YOUNG_SCORE_CAP}% for young patients"));
    }

    ScoreTrace {
        score: round_one_decimal(score),
        young_age_restricted: restricted,
        applied,
    }
}

/// Half the running score, limited to the headroom left under [`MAX_SCORE`].
pub fn hiv_increment(running: f64) -> f64 {
    (running * 0.5).min(MAX_SCORE - running).max(0.0)
}

pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn changed_periods(patient: &NormalizedPatient) -> Option<Adjustment> {
    patient
        .changed_periods
        .then(|| Adjustment::new(2.0, "Change in periods (+2%)"))
}

fn dyspareunia(patient: &NormalizedPatient) -> Option<Adjustment> {
    patient
        .dyspareunia
        .then(|| Adjustment::new(5.0, "Painful intercourse (+5%)"))
}

fn weight_loss_and_fatigue(patient: &NormalizedPatient) -> Option<Adjustment> {
    (patient.weight_loss && patient.unusual_fatigue)
        .then(|| Adjustment::new(20.0, "Weight loss and fatigue (+20%)"))
}

fn weight_loss_alone(patient: &NormalizedPatient) -> Option<Adjustment> {
    (patient.weight_loss && !patient.unusual_fatigue)
        .then(|| Adjustment::new(5.0, "Weight loss (+5%)"))
}

fn fatigue_alone(patient: &NormalizedPatient) -> Option<Adjustment> {
    (patient.unusual_fatigue && !patient.weight_loss)
        .then(|| Adjustment::new(5.0, "Unusual fatigue (+5%)"))
}

fn sexual_partners(patient: &NormalizedPatient) -> Option<Adjustment> {
    match patient.sexual_partners {
        SexualPartners::None => None,
        SexualPartners::OneToThree => Some(Adjustment::new(2.0, "1-3 sexual partners (+2%)")),
        SexualPartners::FourToSeven => Some(Adjustment::new(5.0, "4-7 sexual partners (+5%)")),
        SexualPartners::EightPlus => Some(Adjustment::new(10.0, "8+ sexual partners (+10%)")),
    }
}

fn smoking(patient: &NormalizedPatient) -> Option<Adjustment> {
    match patient.smoking {
        SmokingLevel::None => None,
        SmokingLevel::OneToNinePerDay => Some(Adjustment::new(5.0, "Smoking 1-9/day (+5%)")),
        SmokingLevel::TenToNineteenPerDay => {
            Some(Adjustment::new(10.0, "Smoking 10-19/day (+10%)"))
        }
        SmokingLevel::TwentyPlusPerDay => Some(Adjustment::new(15.0, "Smoking 20+/day (+15%)")),
    }
}

fn marital_status(patient: &NormalizedPatient) -> Option<Adjustment> {
    match patient.marital_status {
        status @ (MaritalStatus::Single | MaritalStatus::Divorced) => Some(Adjustment::new(
            2.0,
            format!("Marital status: {} (+2%)", status.as_str()),
        )),
        MaritalStatus::Married | MaritalStatus::Other => None,
    }
}

fn contraceptive_use(patient: &NormalizedPatient) -> Option<Adjustment> {
    match patient.contraceptive_years {
        ContraceptiveYears::None | ContraceptiveYears::UnderFive => None,
        ContraceptiveYears::FiveToNine => Some(Adjustment::new(
            5.0,
            "Oral contraceptive use 5-9 years (+5%)",
        )),
        ContraceptiveYears::TenPlus => Some(Adjustment::new(
            10.0,
            "Oral contraceptive use 10+ years (+10%)",
        )),
    }
}

fn first_intercourse(patient: &NormalizedPatient) -> Option<Adjustment> {
    match patient.age_first_intercourse {
        FirstIntercourseAge::Under16 => {
            Some(Adjustment::new(10.0, "First intercourse <16 years (+10%)"))
        }
        FirstIntercourseAge::SeventeenToTwenty => {
            Some(Adjustment::new(5.0, "First intercourse 17-20 years (+5%)"))
        }
        FirstIntercourseAge::TwentyOnePlus => {
            Some(Adjustment::new(2.0, "First intercourse 21+ years (+2%)"))
        }
        FirstIntercourseAge::Unknown => None,
    }
}

fn abnormal_pap_smear(patient: &NormalizedPatient) -> Option<Adjustment> {
    patient
        .abnormal_pap_smear
        .then(|| Adjustment::new(50.0, "Abnormal pap smear history (+50%)"))
}

fn high_parity(patient: &NormalizedPatient) -> Option<Adjustment> {
    patient
        .high_parity
        .then(|| Adjustment::new(5.0, "High parity (5+ births) (+5%)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adult() -> NormalizedPatient {
        NormalizedPatient {
            age: 35,
            ..NormalizedPatient::default()
        }
    }

    fn total_for(patient: &NormalizedPatient) -> f64 {
        score(patient, Scenario::NoPrimarySymptoms, 0.0).score
    }

    #[test]
    fn weight_loss_and_fatigue_bonus_is_exclusive() {
        let cases = [
            ((true, true), 20.0),
            ((true, false), 5.0),
            ((false, true), 5.0),
            ((false, false), 0.0),
        ];
        for ((weight_loss, unusual_fatigue), expected) in cases {
            let patient = NormalizedPatient {
                weight_loss,
                unusual_fatigue,
                ..adult()
            };
            assert_eq!(total_for(&patient), expected, "{weight_loss}/{unusual_fatigue}");
        }
    }

    #[test]
    fn hiv_increment_respects_headroom() {
        assert_eq!(hiv_increment(90.0), 9.0);
        assert_eq!(hiv_increment(40.0), 20.0);
        assert_eq!(hiv_increment(0.0), 0.0);
        assert_eq!(hiv_increment(120.0), 0.0);
    }

    #[test]
    fn hiv_runs_after_every_additive_modifier() {
        let patient = NormalizedPatient {
            changed_periods: true,
            dyspareunia: true,
            hiv_positive: true,
            ..adult()
        };
        let trace = score(&patient, Scenario::PainOnly, 30.0);
        assert_eq!(trace.score, 55.5);
        assert_eq!(
            trace.applied.last().map(String::as_str),
            Some("HIV positive (+18.5%)")
        );
    }

    #[test]
    fn score_never_exceeds_maximum() {
        let patient = NormalizedPatient {
            abnormal_pap_smear: true,
            smoking: SmokingLevel::TwentyPlusPerDay,
            sexual_partners: SexualPartners::EightPlus,
            hiv_positive: true,
            ..adult()
        };
        let trace = score(&patient, Scenario::AllThree, 95.0);
        assert_eq!(trace.score, MAX_SCORE);
    }

    #[test]
    fn young_patient_without_exemption_gets_flat_base_and_cap() {
        let patient = NormalizedPatient {
            age: 15,
            abnormal_pap_smear: true,
            smoking: SmokingLevel::TwentyPlusPerDay,
            ..NormalizedPatient::default()
        };
        let trace = score(&patient, Scenario::NoPrimarySymptoms, 0.0);
        assert!(trace.young_age_restricted);
        assert_eq!(trace.score, YOUNG_SCORE_CAP);
        assert_eq!(
            trace.applied.last().map(String::as_str),
            Some("Risk capped at 30% for young patients")
        );
    }

    #[test]
    fn young_patient_override_replaces_base_risk() {
        let patient = NormalizedPatient {
            age: 19,
            has_pain: true,
            ..NormalizedPatient::default()
        };
        let trace = score(&patient, Scenario::PainOnly, 30.0);
        assert_eq!(trace.score, YOUNG_BASE_RISK);
        assert!(trace.applied.is_empty());
    }

    #[test]
    fn young_patient_exemptions() {
        let all_three = NormalizedPatient {
            age: 16,
            has_bleeding: true,
            has_discharge: true,
            has_pain: true,
            ..NormalizedPatient::default()
        };
        assert!(!young_age_restricted(&all_three, Scenario::AllThree));

        let post_coital = NormalizedPatient {
            age: 16,
            has_bleeding: true,
            is_post_coital_or_menopausal: true,
            ..NormalizedPatient::default()
        };
        assert!(!young_age_restricted(&post_coital, Scenario::BleedingOnly));
        assert_eq!(score(&post_coital, Scenario::BleedingOnly, 76.0).score, 76.0);

        let flag_without_bleeding = NormalizedPatient {
            age: 16,
            has_discharge: true,
            is_post_coital_or_menopausal: true,
            ..NormalizedPatient::default()
        };
        assert!(young_age_restricted(&flag_without_bleeding, Scenario::DischargeOnly));
    }

    #[test]
    fn twenty_is_not_young() {
        let patient = NormalizedPatient {
            age: YOUNG_AGE,
            ..NormalizedPatient::default()
        };
        assert!(!young_age_restricted(&patient, Scenario::PainOnly));
    }

    #[test]
    fn modifier_labels_follow_firing_order() {
        let patient = NormalizedPatient {
            marital_status: MaritalStatus::Divorced,
            sexual_partners: SexualPartners::FourToSeven,
            changed_periods: true,
            high_parity: true,
            ..adult()
        };
        let trace = score(&patient, Scenario::NoPrimarySymptoms, 0.0);
        assert_eq!(
            trace.applied,
            vec![
                "Change in periods (+2%)",
                "4-7 sexual partners (+5%)",
                "Marital status: divorced (+2%)",
                "High parity (5+ births) (+5%)",
            ]
        );
        assert_eq!(trace.score, 14.0);
    }

    #[test]
    fn rounding_keeps_one_decimal() {
        assert_eq!(round_one_decimal(12.345), 12.3);
        assert_eq!(round_one_decimal(12.35000001), 12.4);
        assert_eq!(round_one_decimal(99.0), 99.0);
    }
}
