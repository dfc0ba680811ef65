use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::InputError;

/// Questionnaire field names accepted in a [`PatientInput`].
pub mod fields {
    pub const AGE: &str = "age";
    pub const DOB: &str = "dob";
    pub const BLEEDING: &str = "abnormal_vaginal_bleeding";
    pub const DISCHARGE: &str = "abnormal_vaginal_discharge";
    pub const PAIN: &str = "lower_abdominal_pain";
    pub const BLEEDING_TYPE: &str = "bleeding_type";
    pub const POST_COITAL_OR_MENOPAUSAL: &str = "is_post_coital_or_post_menopausal";
    pub const CHANGED_PERIODS: &str = "change_in_periods";
    pub const DYSPAREUNIA: &str = "dyspareunia";
    pub const WEIGHT_LOSS: &str = "weight_loss";
    pub const UNUSUAL_FATIGUE: &str = "unusual_fatigue";
    pub const SEXUAL_PARTNERS: &str = "sexual_partners";
    pub const SMOKING: &str = "smoking";
    pub const MARITAL_STATUS: &str = "marital_status";
    pub const CONTRACEPTIVE_USE: &str = "oral_contraceptive_use";
    /// Alias of [`CONTRACEPTIVE_USE`], read only when that field is absent.
    pub const CONTRACEPTIVE_YEARS: &str = "contraceptive_years";
    pub const AGE_FIRST_INTERCOURSE: &str = "age_first_intercourse";
    pub const ABNORMAL_PAP_SMEAR: &str = "abnormal_pap_smear";
    pub const PARITY: &str = "parity";
    pub const HIGH_PARITY: &str = "high_parity";
    pub const HIV_POSITIVE: &str = "hiv_positive";
}

/// A single raw questionnaire value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Textual form used by the permissive coercions: booleans become
    /// `true`/`false` and whole numbers drop their fractional part.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Bool(value) => Cow::Borrowed(if *value { "true" } else { "false" }),
            FieldValue::Number(value) if value.is_finite() && value.fract() == 0.0 => {
                Cow::Owned(format!("{}", *value as i64))
            }
            FieldValue::Number(value) => Cow::Owned(value.to_string()),
            FieldValue::Text(value) => Cow::Borrowed(value.as_str()),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Number(f64::from(value))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// One questionnaire submission: any subset of named fields.
///
/// Null JSON values and empty CSV cells are dropped, so an absent field and
/// an explicitly empty one look the same to the normalizer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, Option<FieldValue>>",
    into = "BTreeMap<String, FieldValue>"
)]
pub struct PatientInput(BTreeMap<String, FieldValue>);

impl PatientInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for assembling inputs in code.
    pub fn with(mut self, key: &str, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<FieldValue>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    /// Textual value of a field, if present.
    pub fn text(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).map(FieldValue::as_text)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn from_json_str(raw: &str) -> Result<Self, InputError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        if !value.is_object() {
            return Err(InputError::NotAnObject);
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Builds an input from string cells, skipping blank ones.
    pub fn from_text_fields<I, K, V>(cells: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let fields: BTreeMap<String, FieldValue> = cells
            .into_iter()
            .filter_map(|(key, value)| {
                let value = value.as_ref().trim();
                (!value.is_empty()).then(|| (key.into(), FieldValue::Text(value.to_string())))
            })
            .collect();
        PatientInput(fields)
    }
}

impl From<BTreeMap<String, Option<FieldValue>>> for PatientInput {
    fn from(raw: BTreeMap<String, Option<FieldValue>>) -> Self {
        PatientInput(
            raw.into_iter()
                .filter_map(|(key, value)| value.map(|value| (key, value)))
                .collect(),
        )
    }
}

impl From<PatientInput> for BTreeMap<String, FieldValue> {
    fn from(input: PatientInput) -> Self {
        input.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BleedingType {
    #[default]
    None,
    Intermenstrual,
    PostCoital,
    PostMenopausal,
    HeavierPeriods,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SexualPartners {
    #[default]
    None,
    OneToThree,
    FourToSeven,
    EightPlus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmokingLevel {
    #[default]
    None,
    OneToNinePerDay,
    TenToNineteenPerDay,
    TwentyPlusPerDay,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaritalStatus {
    Single,
    Married,
    Divorced,
    #[default]
    Other,
}

impl MaritalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaritalStatus::Single => "single",
            MaritalStatus::Married => "married",
            MaritalStatus::Divorced => "divorced",
            MaritalStatus::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContraceptiveYears {
    #[default]
    None,
    UnderFive,
    FiveToNine,
    TenPlus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FirstIntercourseAge {
    Under16,
    SeventeenToTwenty,
    TwentyOnePlus,
    #[default]
    Unknown,
}

/// Canonical, strictly typed view of a submission. Built once per call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedPatient {
    pub age: u32,
    pub has_bleeding: bool,
    pub has_discharge: bool,
    pub has_pain: bool,
    pub bleeding_type: BleedingType,
    pub is_post_coital_or_menopausal: bool,
    pub changed_periods: bool,
    pub dyspareunia: bool,
    pub weight_loss: bool,
    pub unusual_fatigue: bool,
    pub sexual_partners: SexualPartners,
    pub smoking: SmokingLevel,
    /// Free-text smoking answer affirms smoking (`yes`, `smoker`, ...).
    /// Per-day tiers alone do not set this.
    pub reports_smoking: bool,
    pub marital_status: MaritalStatus,
    pub contraceptive_years: ContraceptiveYears,
    pub age_first_intercourse: FirstIntercourseAge,
    pub abnormal_pap_smear: bool,
    pub high_parity: bool,
    pub hiv_positive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskCategory {
    Low,
    Medium,
    High,
}

impl RiskCategory {
    pub const MEDIUM_THRESHOLD: f64 = 40.0;
    pub const HIGH_THRESHOLD: f64 = 65.0;

    /// Lower bounds are inclusive: 40.0 is Medium and 65.0 is High.
    pub fn from_score(score: f64) -> Self {
        if score < Self::MEDIUM_THRESHOLD {
            RiskCategory::Low
        } else if score < Self::HIGH_THRESHOLD {
            RiskCategory::Medium
        } else {
            RiskCategory::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::Low => "Low",
            RiskCategory::Medium => "Medium",
            RiskCategory::High => "High",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} risk", self.as_str())
    }
}

impl FromStr for RiskCategory {
    type Err = InputError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.trim_end_matches(" risk") {
            "low" => Ok(RiskCategory::Low),
            "medium" => Ok(RiskCategory::Medium),
            "high" => Ok(RiskCategory::High),
            _ => Err(InputError::UnknownCategory(raw.to_string())),
        }
    }
}

/// Outcome of one assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskResult {
    pub score: f64,
    pub category: RiskCategory,
    pub scenario_label: String,
    /// Labels of every modifier that fired, in firing order.
    pub scenario_explanation: Vec<String>,
    pub general_recommendation: String,
    pub personalized_recommendations: Vec<String>,
}

impl RiskResult {
    /// One-line audit string: the scenario label followed by the modifiers.
    pub fn summary(&self) -> String {
        if self.scenario_explanation.is_empty() {
            self.scenario_label.clone()
        } else {
            format!(
                "{} | Modifiers: {}",
                self.scenario_label,
                self.scenario_explanation.join(", ")
            )
        }
    }
}

/// An assessment together with the submission it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentRecord {
    pub id: Uuid,
    pub respondent: Option<String>,
    pub assessed_at: DateTime<Utc>,
    pub input: PatientInput,
    pub result: RiskResult,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub category: RiskCategory,
    pub count: usize,
    pub avg_score: f64,
}
