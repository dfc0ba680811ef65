//! Rule-based cervical cancer risk screening.
//!
//! A questionnaire submission ([`PatientInput`]) flows through four pure stages:
//! - `normalize`: raw fields to a typed [`models::NormalizedPatient`]
//! - `scenario`: the three primary symptoms to one of eight scenarios and a base risk
//! - `modifiers`: young-age handling, the additive risk-factor chain, HIV, caps
//! - `recommend`: risk category plus general and personalized advice
//!
//! [`assess`] and [`assess_on`] compose them. The remaining modules (`batch`,
//! `report`, `db`, `config`) serve the command-line tool.

pub mod batch;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod models;
pub mod modifiers;
pub mod normalize;
pub mod recommend;
pub mod report;
pub mod scenario;

pub use engine::{assess, assess_on};
pub use error::InputError;
pub use models::{PatientInput, RiskCategory, RiskResult};
