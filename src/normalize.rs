use chrono::{Datelike, NaiveDate};

use crate::models::{
    fields, BleedingType, ContraceptiveYears, FieldValue, FirstIntercourseAge, MaritalStatus,
    NormalizedPatient, PatientInput, SexualPartners, SmokingLevel,
};

pub const DEFAULT_AGE: u32 = 35;
pub const HIGH_PARITY_BIRTHS: u32 = 5;

const TRUE_WORDS: [&str; 4] = ["yes", "true", "1", "y"];
const POST_COITAL_MARKERS: [&str; 4] = [
    "post-coital",
    "post-menopausal",
    "postcoital",
    "postmenopausal",
];
const SMOKING_NEGATIONS: [&str; 5] = ["", "no", "non-smoker", "never", "none"];
const SMOKING_AFFIRMATIONS: [&str; 5] = ["yes", "smoke", "smoker", "cigarette", "tobacco"];

/// Turns a raw submission into a [`NormalizedPatient`]. Never fails: anything
/// missing or unreadable falls back to its baseline value.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    today: NaiveDate,
}

impl Normalizer {
    /// `today` anchors date-of-birth arithmetic.
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn normalize(&self, input: &PatientInput) -> NormalizedPatient {
        let flag = |key: &str| input.get(key).is_some_and(parse_flag);
        let label = |key: &str| {
            input
                .text(key)
                .map(|text| text.trim().to_ascii_lowercase())
                .unwrap_or_default()
        };

        let bleeding_label = label(fields::BLEEDING_TYPE);
        let smoking_label = label(fields::SMOKING);
        let contraceptive_label = if input.get(fields::CONTRACEPTIVE_USE).is_some() {
            label(fields::CONTRACEPTIVE_USE)
        } else {
            label(fields::CONTRACEPTIVE_YEARS)
        };
        let smoking = smoking_level(&smoking_label);

        NormalizedPatient {
            age: self.age(input),
            has_bleeding: flag(fields::BLEEDING),
            has_discharge: flag(fields::DISCHARGE),
            has_pain: flag(fields::PAIN),
            bleeding_type: bleeding_type(&bleeding_label),
            is_post_coital_or_menopausal: flag(fields::POST_COITAL_OR_MENOPAUSAL)
                || mentions_post_coital(&bleeding_label),
            changed_periods: flag(fields::CHANGED_PERIODS),
            dyspareunia: flag(fields::DYSPAREUNIA),
            weight_loss: flag(fields::WEIGHT_LOSS),
            unusual_fatigue: flag(fields::UNUSUAL_FATIGUE),
            sexual_partners: sexual_partners(&label(fields::SEXUAL_PARTNERS)),
            smoking,
            reports_smoking: affirms_smoking(&smoking_label),
            marital_status: marital_status(&label(fields::MARITAL_STATUS)),
            contraceptive_years: contraceptive_years(&contraceptive_label),
            age_first_intercourse: first_intercourse_age(&label(fields::AGE_FIRST_INTERCOURSE)),
            abnormal_pap_smear: flag(fields::ABNORMAL_PAP_SMEAR),
            high_parity: flag(fields::HIGH_PARITY)
                || input.get(fields::PARITY).map_or(0, parse_parity) >= HIGH_PARITY_BIRTHS,
            hiv_positive: flag(fields::HIV_POSITIVE),
        }
    }

    /// Explicit age wins, then date of birth, then [`DEFAULT_AGE`].
    pub fn age(&self, input: &PatientInput) -> u32 {
        input
            .get(fields::AGE)
            .and_then(parse_age)
            .or_else(|| {
                input
                    .text(fields::DOB)
                    .and_then(|dob| age_on(&dob, self.today))
            })
            .unwrap_or(DEFAULT_AGE)
    }
}

pub fn parse_flag(value: &FieldValue) -> bool {
    let text = value.as_text().trim().to_ascii_lowercase();
    TRUE_WORDS.contains(&text.as_str())
}

fn parse_age(value: &FieldValue) -> Option<u32> {
    let years = match value {
        FieldValue::Number(years) => *years,
        FieldValue::Text(text) => text.trim().parse::<f64>().ok()?,
        FieldValue::Bool(_) => return None,
    };
    (years.is_finite() && years >= 0.0).then(|| years.trunc() as u32)
}

/// Age at last birthday for a `YYYY-MM-DD` date of birth. Births after
/// `today` are rejected.
pub fn age_on(dob: &str, today: NaiveDate) -> Option<u32> {
    let born = NaiveDate::parse_from_str(dob.trim(), "%Y-%m-%d").ok()?;
    if born > today {
        return None;
    }
    let before_birthday = (today.month(), today.day()) < (born.month(), born.day());
    let years = today.year() - born.year() - i32::from(before_birthday);
    u32::try_from(years).ok()
}

fn parse_parity(value: &FieldValue) -> u32 {
    match value {
        FieldValue::Number(births) if births.is_finite() && *births >= 0.0 => births.trunc() as u32,
        FieldValue::Text(text) => match text.trim().parse::<u32>() {
            Ok(births) => births,
            Err(_) if text.contains(">=5") => HIGH_PARITY_BIRTHS,
            Err(_) => 0,
        },
        _ => 0,
    }
}

fn mentions_post_coital(label: &str) -> bool {
    POST_COITAL_MARKERS.iter().any(|marker| label.contains(marker))
}

fn bleeding_type(label: &str) -> BleedingType {
    if label.is_empty() || label == "none" || label == "no" {
        BleedingType::None
    } else if label.contains("intermenstrual") {
        BleedingType::Intermenstrual
    } else if label.contains("post-coital") || label.contains("postcoital") {
        BleedingType::PostCoital
    } else if label.contains("post-menopausal") || label.contains("postmenopausal") {
        BleedingType::PostMenopausal
    } else if label.contains("heav") || label.contains("longer") {
        BleedingType::HeavierPeriods
    } else {
        BleedingType::Other
    }
}

fn sexual_partners(label: &str) -> SexualPartners {
    if label.contains("1-3") {
        SexualPartners::OneToThree
    } else if label.contains("4-7") {
        SexualPartners::FourToSeven
    } else if label.contains(">8") || label.contains("8+") {
        SexualPartners::EightPlus
    } else {
        SexualPartners::None
    }
}

fn smoking_level(label: &str) -> SmokingLevel {
    if label.contains("10-19/day") {
        SmokingLevel::TenToNineteenPerDay
    } else if label.contains("1-9/day") {
        SmokingLevel::OneToNinePerDay
    } else if label.contains(">20/day") || label.contains("20+") {
        SmokingLevel::TwentyPlusPerDay
    } else {
        SmokingLevel::None
    }
}

fn affirms_smoking(label: &str) -> bool {
    let negated = SMOKING_NEGATIONS.contains(&label)
        || label.starts_with("non")
        || label.starts_with("never");
    !negated && SMOKING_AFFIRMATIONS.iter().any(|word| label.contains(word))
}

fn marital_status(label: &str) -> MaritalStatus {
    if label.contains("single") {
        MaritalStatus::Single
    } else if label.contains("divorced") {
        MaritalStatus::Divorced
    } else if label.contains("married") {
        MaritalStatus::Married
    } else {
        MaritalStatus::Other
    }
}

fn contraceptive_years(label: &str) -> ContraceptiveYears {
    if label.contains("5-9") {
        ContraceptiveYears::FiveToNine
    } else if label.contains(">10") || label.contains("10+") {
        ContraceptiveYears::TenPlus
    } else if label.contains("<5") {
        ContraceptiveYears::UnderFive
    } else {
        ContraceptiveYears::None
    }
}

fn first_intercourse_age(label: &str) -> FirstIntercourseAge {
    if label.contains("<16") {
        FirstIntercourseAge::Under16
    } else if label.contains("17-20") {
        FirstIntercourseAge::SeventeenToTwenty
    } else if label.contains(">21") || label.contains("21+") {
        FirstIntercourseAge::TwentyOnePlus
    } else {
        FirstIntercourseAge::Unknown
    }
}
