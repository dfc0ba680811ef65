use anyhow::Context;
use sqlx::postgres::{PgExecutor, PgPool, PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::Row;
use uuid::Uuid;

use crate::config::Settings;
use crate::models::{AssessmentRecord, PatientInput, RiskCategory, RiskResult};

pub async fn connect(settings: &Settings) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(settings.database_url()?)
        .await
        .context("failed to connect to Postgres")
}

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

const INSERT_ASSESSMENT: &str = r#"
    INSERT INTO cervical_screening.assessments
    (id, respondent, assessed_at, input, risk_score, risk_category, scenario,
     scenario_explanation, general_recommendation, personalized_recommendations)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
    ON CONFLICT (id) DO NOTHING
"#;

async fn insert_assessment<'e, E>(executor: E, record: &AssessmentRecord) -> sqlx::Result<bool>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(INSERT_ASSESSMENT)
        .bind(record.id)
        .bind(record.respondent.as_deref())
        .bind(record.assessed_at)
        .bind(Json(&record.input))
        .bind(record.result.score)
        .bind(record.result.category.as_str())
        .bind(&record.result.scenario_label)
        .bind(Json(&record.result.scenario_explanation))
        .bind(&record.result.general_recommendation)
        .bind(Json(&record.result.personalized_recommendations))
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Stores an assessment next to the submission it was computed from.
pub async fn save_assessment(pool: &PgPool, record: &AssessmentRecord) -> anyhow::Result<()> {
    insert_assessment(pool, record)
        .await
        .with_context(|| format!("failed to store assessment {}", record.id))?;
    Ok(())
}

/// Stores a batch in one transaction; returns how many rows were new.
pub async fn save_assessments(
    pool: &PgPool,
    records: &[AssessmentRecord],
) -> anyhow::Result<usize> {
    let mut tx = pool.begin().await?;
    let mut inserted = 0usize;

    for record in records {
        if insert_assessment(&mut *tx, record)
            .await
            .with_context(|| format!("failed to store assessment {}", record.id))?
        {
            inserted += 1;
        }
    }

    tx.commit().await?;
    Ok(inserted)
}

pub async fn fetch_history(
    pool: &PgPool,
    category: Option<RiskCategory>,
    limit: usize,
) -> anyhow::Result<Vec<AssessmentRecord>> {
    let mut query = String::from(
        "SELECT id, respondent, assessed_at, input, risk_score, risk_category, scenario, \
         scenario_explanation, general_recommendation, personalized_recommendations \
         FROM cervical_screening.assessments",
    );

    if category.is_some() {
        query.push_str(" WHERE risk_category = $2");
    }
    query.push_str(" ORDER BY assessed_at DESC LIMIT $1");

    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let mut rows = sqlx::query(&query).bind(limit);

    if let Some(value) = category {
        rows = rows.bind(value.as_str());
    }

    let records = rows.fetch_all(pool).await?;
    records.iter().map(record_from_row).collect()
}

fn record_from_row(row: &PgRow) -> anyhow::Result<AssessmentRecord> {
    let category: String = row.try_get("risk_category")?;
    let Json(input): Json<PatientInput> = row.try_get("input")?;
    let Json(scenario_explanation): Json<Vec<String>> = row.try_get("scenario_explanation")?;
    let Json(personalized_recommendations): Json<Vec<String>> =
        row.try_get("personalized_recommendations")?;
    let id: Uuid = row.try_get("id")?;

    Ok(AssessmentRecord {
        id,
        respondent: row.try_get("respondent")?,
        assessed_at: row.try_get("assessed_at")?,
        input,
        result: RiskResult {
            score: row.try_get("risk_score")?,
            category: category
                .parse()
                .with_context(|| format!("assessment {id} has a corrupt category"))?,
            scenario_label: row.try_get("scenario")?,
            scenario_explanation,
            general_recommendation: row.try_get("general_recommendation")?,
            personalized_recommendations,
        },
    })
}
