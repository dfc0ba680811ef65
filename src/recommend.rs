use crate::models::{NormalizedPatient, RiskCategory};

pub const HPV_VACCINE_AGE_LIMIT: u32 = 45;

const PREVENTION_AND_SCREENING: &str = "\
Over 99% of cervical cancer cases are caused by the human papillomavirus (HPV). The good news is that HPV is preventable.

To protect yourself:
• Get the HPV vaccine if you haven't already and you are under 45
• Use condoms every time you have sex to lower your risk of infection
• Keep healthy habits: exercise, don't smoke, eat well, treat STIs early
• If you notice unusual vaginal bleeding, discharge, or pain, see your doctor right away

If you're aged 21 to 65 and haven't been screened for cervical cancer, it's time to take that step. Screening options include:
• HPV DNA test
• Pap test
• VIA (Visual Inspection with Acetic Acid)

If it's been over 3 years since your last Pap test or over 5 years since your last VIA or HPV DNA test, you're due for another one.

Next step: Please book a check-up with your doctor to review your symptoms and get screened if needed. It's quick, and it will make a big difference in your health.

Small prevention dey save big wahala.";

const LOW_OPENING: &str = "Based on your responses, your risk of cervical cancer is low.";

const MEDIUM_OPENING: &str = "\
Based on your responses, your risk of cervical cancer is medium.

We recommend that you schedule an appointment with your healthcare provider within the next 2-4 weeks. Discuss your symptoms and risk factors with your doctor.
• You may need further testing such as a pelvic exam, HPV test, or colposcopy";

const HIGH_RISK: &str = "\
Based on your responses, your risk for cervical cancer is high.

While other causes of your symptoms are possible, we strongly recommend that you contact your healthcare provider immediately (within the next week) for a full evaluation. A referral to a gynecologist may be necessary, and diagnostic testing such as a VIA, pap, colposcopy or biopsy is recommended.

Taking action now helps you get answers faster and gives you the best chance at staying healthy. Early diagnosis can significantly improve outcomes.";

pub fn categorize(score: f64) -> RiskCategory {
    RiskCategory::from_score(score)
}

/// Static advice block for a category. Low and Medium share the prevention
/// and screening body; High is a short urgent-action message.
pub fn general_recommendation(category: RiskCategory) -> String {
    match category {
        RiskCategory::Low => format!("{LOW_OPENING}\n\n{PREVENTION_AND_SCREENING}"),
        RiskCategory::Medium => format!("{MEDIUM_OPENING}\n\n{PREVENTION_AND_SCREENING}"),
        RiskCategory::High => HIGH_RISK.to_string(),
    }
}

/// One advisory line per matching condition, in a fixed priority order.
pub fn personalized_recommendations(patient: &NormalizedPatient) -> Vec<String> {
    let rules: [(bool, &str); 6] = [
        (
            patient.abnormal_pap_smear,
            "Follow up on your abnormal Pap test results with your healthcare provider",
        ),
        (
            patient.hiv_positive,
            "As an HIV-positive individual, you should receive more frequent cervical screening. Consult your HIV care provider",
        ),
        (
            patient.reports_smoking,
            "Consider smoking cessation as smoking increases cervical cancer risk",
        ),
        (
            patient.age < HPV_VACCINE_AGE_LIMIT,
            "If you haven't received the HPV vaccine, discuss this option with your healthcare provider",
        ),
        (
            patient.has_bleeding && patient.is_post_coital_or_menopausal,
            "Post-coital or post-menopausal bleeding requires prompt medical evaluation",
        ),
        (
            patient.weight_loss && patient.unusual_fatigue,
            "Your weight loss and fatigue should be evaluated by a healthcare provider",
        ),
    ];

    rules
        .into_iter()
        .filter(|(applies, _)| *applies)
        .map(|(_, advice)| advice.to_string())
        .collect()
}

/// Age-banded screening schedule. `None` means the age could not be determined.
pub fn screening_guidelines(age: Option<u32>) -> Vec<String> {
    let mut details: Vec<&str> = match age {
        Some(age) if age < 21 => vec![
            "Cervical cancer screening is not yet recommended for your age group.",
            "Focus on HPV prevention through vaccination and safe practices.",
        ],
        Some(21..=29) => vec![
            "Get a Pap test every 3 years.",
            "HPV testing alone is not recommended for this age group.",
        ],
        Some(30..=65) => vec![
            "Recommended options:",
            "• HPV test every 5 years (preferred), OR",
            "• Pap test every 3 years, OR",
            "• HPV test with Pap test (co-testing) every 5 years",
        ],
        Some(_) => vec![
            "Screening may no longer be needed if you have had adequate prior screening.",
            "Consult your healthcare provider about whether to continue screening.",
        ],
        None => vec![
            "Age information not available. Please update your profile for personalized screening recommendations.",
        ],
    };
    details.push(
        "Note: These are general guidelines. Your healthcare provider may recommend a different schedule based on your individual risk factors.",
    );
    details.into_iter().map(str::to_string).collect()
}
