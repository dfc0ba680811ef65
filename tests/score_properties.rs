use chrono::NaiveDate;
use proptest::prelude::*;
use proptest::sample::select;

use cervical_risk_screen::models::{fields, PatientInput};
use cervical_risk_screen::modifiers::{hiv_increment, MAX_SCORE, YOUNG_SCORE_CAP};
use cervical_risk_screen::scenario::Scenario;
use cervical_risk_screen::{assess_on, RiskCategory};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 19).unwrap()
}

fn flag(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

prop_compose! {
    fn symptoms()(
        bleeding in any::<bool>(),
        discharge in any::<bool>(),
        pain in any::<bool>(),
        bleeding_type in select(vec!["", "intermenstrual", "post-coital", "Post-Menopausal", "heavier periods", "spotting"]),
    ) -> (bool, bool, bool, &'static str) {
        (bleeding, discharge, pain, bleeding_type)
    }
}

prop_compose! {
    fn questionnaire()(
        age in 10u32..90,
        (bleeding, discharge, pain, bleeding_type) in symptoms(),
        checklist in any::<[bool; 4]>(),
        history in any::<[bool; 3]>(),
        partners in select(vec!["none", "1-3", "4-7", ">8", "8+", "lots"]),
        smoking in select(vec!["non-smoker", "1-9/day", "10-19/day", ">20/day", "yes"]),
        marital in select(vec!["single", "married", "divorced", "widowed"]),
        contraceptive in select(vec!["none", "<5 years", "5-9 years", ">10 years"]),
        first_intercourse in select(vec!["<16 years", "17-20 years", ">21 years", "unknown"]),
    ) -> PatientInput {
        PatientInput::new()
            .with(fields::AGE, age)
            .with(fields::BLEEDING, flag(bleeding))
            .with(fields::DISCHARGE, flag(discharge))
            .with(fields::PAIN, flag(pain))
            .with(fields::BLEEDING_TYPE, bleeding_type)
            .with(fields::CHANGED_PERIODS, flag(checklist[0]))
            .with(fields::DYSPAREUNIA, flag(checklist[1]))
            .with(fields::WEIGHT_LOSS, flag(checklist[2]))
            .with(fields::UNUSUAL_FATIGUE, flag(checklist[3]))
            .with(fields::ABNORMAL_PAP_SMEAR, flag(history[0]))
            .with(fields::HIGH_PARITY, flag(history[1]))
            .with(fields::HIV_POSITIVE, flag(history[2]))
            .with(fields::SEXUAL_PARTNERS, partners)
            .with(fields::SMOKING, smoking)
            .with(fields::MARITAL_STATUS, marital)
            .with(fields::CONTRACEPTIVE_USE, contraceptive)
            .with(fields::AGE_FIRST_INTERCOURSE, first_intercourse)
    }
}

proptest! {
    #[test]
    fn score_stays_within_bounds(input in questionnaire()) {
        let result = assess_on(&input, today());
        prop_assert!((0.0..=MAX_SCORE).contains(&result.score), "score {}", result.score);
        prop_assert_eq!(result.category, RiskCategory::from_score(result.score));
    }

    #[test]
    fn scores_have_at_most_one_decimal(input in questionnaire()) {
        let result = assess_on(&input, today());
        let scaled = result.score * 10.0;
        prop_assert!((scaled - scaled.round()).abs() < 1e-9);
    }

    #[test]
    fn young_patients_without_alarm_symptoms_stay_under_cap(
        input in questionnaire(),
        age in 0u32..20,
    ) {
        let input = input
            .with(fields::AGE, age)
            .with(fields::BLEEDING, "no");
        let result = assess_on(&input, today());
        let all_three = result.scenario_label.starts_with("Scenario 1:");
        prop_assert!(!all_three);
        prop_assert!(result.score <= YOUNG_SCORE_CAP);
    }

    #[test]
    fn scenario_depends_only_on_primary_symptoms(
        first in questionnaire(),
        second in questionnaire(),
        (bleeding, discharge, pain, _) in symptoms(),
    ) {
        let pin = |input: PatientInput| {
            input
                .with(fields::AGE, 40_u32)
                .with(fields::BLEEDING, flag(bleeding))
                .with(fields::DISCHARGE, flag(discharge))
                .with(fields::PAIN, flag(pain))
        };
        let expected = Scenario::classify(bleeding, discharge, pain).label();
        prop_assert_eq!(assess_on(&pin(first), today()).scenario_label, expected.clone());
        prop_assert_eq!(assess_on(&pin(second), today()).scenario_label, expected);
    }

    #[test]
    fn hiv_increment_never_crosses_maximum(running in 0.0f64..200.0) {
        let increment = hiv_increment(running);
        prop_assert!(increment >= 0.0);
        prop_assert!(increment <= running * 0.5 + 1e-9);
        if running <= MAX_SCORE {
            prop_assert!(running + increment <= MAX_SCORE + 1e-9);
        }
    }
}
