use serde::{Deserialize, Serialize};

use crate::models::NormalizedPatient;

/// The eight combinations of bleeding, discharge and pain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scenario {
    AllThree,
    BleedingAndDischarge,
    BleedingOnly,
    DischargeOnly,
    DischargeAndPain,
    BleedingAndPain,
    PainOnly,
    NoPrimarySymptoms,
}

impl Scenario {
    pub const ALL: [Scenario; 8] = [
        Scenario::AllThree,
        Scenario::BleedingAndDischarge,
        Scenario::BleedingOnly,
        Scenario::DischargeOnly,
        Scenario::DischargeAndPain,
        Scenario::BleedingAndPain,
        Scenario::PainOnly,
        Scenario::NoPrimarySymptoms,
    ];

    pub fn classify(bleeding: bool, discharge: bool, pain: bool) -> Self {
        match (bleeding, discharge, pain) {
            (true, true, true) => Scenario::AllThree,
            (true, true, false) => Scenario::BleedingAndDischarge,
            (true, false, false) => Scenario::BleedingOnly,
            (false, true, false) => Scenario::DischargeOnly,
            (false, true, true) => Scenario::DischargeAndPain,
            (true, false, true) => Scenario::BleedingAndPain,
            (false, false, true) => Scenario::PainOnly,
            (false, false, false) => Scenario::NoPrimarySymptoms,
        }
    }

    pub fn id(self) -> u8 {
        match self {
            Scenario::AllThree => 1,
            Scenario::BleedingAndDischarge => 2,
            Scenario::BleedingOnly => 3,
            Scenario::DischargeOnly => 4,
            Scenario::DischargeAndPain => 5,
            Scenario::BleedingAndPain => 6,
            Scenario::PainOnly => 7,
            Scenario::NoPrimarySymptoms => 8,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Scenario::AllThree => "All three primary symptoms present",
            Scenario::BleedingAndDischarge => "Bleeding and discharge without pain",
            Scenario::BleedingOnly => "Bleeding only",
            Scenario::DischargeOnly => "Discharge only",
            Scenario::DischargeAndPain => "Discharge and pain without bleeding",
            Scenario::BleedingAndPain => "Bleeding and pain without discharge",
            Scenario::PainOnly => "Pain only",
            Scenario::NoPrimarySymptoms => "No primary symptoms",
        }
    }

    pub fn label(self) -> String {
        format!("Scenario {}: {}", self.id(), self.description())
    }

    /// Risk before any modifier. Only the bleeding scenarios short of all
    /// three symptoms react to post-coital/post-menopausal bleeding.
    pub fn base_risk(self, post_coital_or_menopausal: bool) -> f64 {
        match self {
            Scenario::AllThree => 95.0,
            Scenario::BleedingAndDischarge | Scenario::BleedingOnly => {
                if post_coital_or_menopausal {
                    76.0
                } else {
                    50.0
                }
            }
            Scenario::BleedingAndPain => {
                if post_coital_or_menopausal {
                    70.0
                } else {
                    50.0
                }
            }
            Scenario::DischargeOnly => 40.0,
            Scenario::DischargeAndPain => 45.0,
            Scenario::PainOnly => 30.0,
            Scenario::NoPrimarySymptoms => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub scenario: Scenario,
    pub base_risk: f64,
}

pub fn classify(patient: &NormalizedPatient) -> Classification {
    let scenario = Scenario::classify(patient.has_bleeding, patient.has_discharge, patient.has_pain);
    Classification {
        scenario,
        base_risk: scenario.base_risk(patient.is_post_coital_or_menopausal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn truth_table_matches_scenarios() {
        let table = [
            ((true, true, true), 1, 95.0, 95.0),
            ((true, true, false), 2, 50.0, 76.0),
            ((true, false, false), 3, 50.0, 76.0),
            ((false, true, false), 4, 40.0, 40.0),
            ((false, true, true), 5, 45.0, 45.0),
            ((true, false, true), 6, 50.0, 70.0),
            ((false, false, true), 7, 30.0, 30.0),
            ((false, false, false), 8, 0.0, 0.0),
        ];

        for ((bleeding, discharge, pain), id, plain, post_coital) in table {
            let scenario = Scenario::classify(bleeding, discharge, pain);
            assert_eq!(scenario.id(), id);
            assert_eq!(scenario.base_risk(false), plain);
            assert_eq!(scenario.base_risk(true), post_coital);
        }
    }

    #[test]
    fn every_combination_maps_to_a_distinct_scenario() {
        let mut seen = HashSet::new();
        for bits in 0..8u8 {
            let scenario = Scenario::classify(bits & 4 != 0, bits & 2 != 0, bits & 1 != 0);
            assert!(seen.insert(scenario), "{scenario:?} reached twice");
        }
        assert_eq!(seen.len(), Scenario::ALL.len());
    }

    #[test]
    fn classification_ignores_secondary_fields() {
        let patient = NormalizedPatient {
            has_discharge: true,
            abnormal_pap_smear: true,
            hiv_positive: true,
            is_post_coital_or_menopausal: true,
            ..NormalizedPatient::default()
        };
        let classification = classify(&patient);
        assert_eq!(classification.scenario, Scenario::DischargeOnly);
        assert_eq!(classification.base_risk, 40.0);
    }

    #[test]
    fn labels_carry_the_scenario_number() {
        assert_eq!(Scenario::PainOnly.label(), "Scenario 7: Pain only");
    }
}
