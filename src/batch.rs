use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::engine;
use crate::error::InputError;
use crate::models::{AssessmentRecord, PatientInput};

/// Optional CSV column naming the person a row belongs to. It is a label
/// only and never reaches the engine.
pub const RESPONDENT_COLUMN: &str = "respondent";

#[derive(Debug, Clone, PartialEq)]
pub struct BatchRow {
    pub respondent: Option<String>,
    pub input: PatientInput,
}

/// Reads questionnaire rows from CSV. Every header except
/// [`RESPONDENT_COLUMN`] is treated as a questionnaire field.
///
/// An unreadable header fails the whole file. A malformed row is logged and
/// skipped so the rest of the export is still assessed.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<BatchRow>, InputError> {
    let mut reader = csv::Reader::from_reader(reader);
    reader.headers()?;
    let mut rows = Vec::new();

    for (index, result) in reader.deserialize::<HashMap<String, String>>().enumerate() {
        let mut cells = match result {
            Ok(cells) => cells,
            Err(err) => {
                tracing::warn!(row = index + 1, error = %err, "skipping malformed questionnaire row");
                continue;
            }
        };
        let respondent = cells
            .remove(RESPONDENT_COLUMN)
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());
        rows.push(BatchRow {
            respondent,
            input: PatientInput::from_text_fields(cells),
        });
    }

    Ok(rows)
}

pub fn read_rows_from_path(path: &Path) -> anyhow::Result<Vec<BatchRow>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let rows = read_rows(file).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(rows)
}

/// Assesses every row as of `today`, stamping each with a fresh id.
pub fn assess_rows(rows: Vec<BatchRow>, today: NaiveDate) -> Vec<AssessmentRecord> {
    rows.into_iter()
        .map(|row| {
            let result = engine::assess_on(&row.input, today);
            AssessmentRecord {
                id: Uuid::new_v4(),
                respondent: row.respondent,
                assessed_at: Utc::now(),
                input: row.input,
                result,
            }
        })
        .collect()
}
