use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::aggregate::{aggregate, AggregateBundle};
use crate::error::StoreError;
use crate::intake::{NewSurveyRecord, SubmissionForm};
use crate::models::{decode_option, decode_skills, ImportanceRating, SurveyOption, SurveyRecord};

/// Persistence port for survey responses.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every stored response, oldest first.
    async fn fetch_all(&self) -> Result<Vec<SurveyRecord>, StoreError>;

    async fn create(&self, record: &NewSurveyRecord) -> Result<Uuid, StoreError>;

    /// Clears the whole collection and returns how many rows went away.
    async fn delete_all(&self) -> Result<u64, StoreError>;
}

/// Fetches every response and aggregates it. A failed fetch is returned as
/// is and nothing is aggregated.
pub async fn load_bundle<S: RecordStore + ?Sized>(
    store: &S,
) -> Result<(Vec<SurveyRecord>, AggregateBundle), StoreError> {
    let records = store.fetch_all().await?;
    let bundle = aggregate(&records);
    debug!(records = records.len(), "aggregated survey responses");
    Ok((records, bundle))
}

pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn fetch_all(&self) -> Result<Vec<SurveyRecord>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, full_name, email, governorate, current_status, education_gap,
                   used_platforms, certificates_value, desired_skills,
                   certification_importance, job_opportunities_importance,
                   preferred_price, points_motivation, try_platform, created_at
            FROM skillbridge.responses
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let records = rows
            .iter()
            .map(decode_row)
            .collect::<Result<Vec<_>, sqlx::Error>>()?;
        info!(count = records.len(), "fetched survey responses");
        Ok(records)
    }

    async fn create(&self, record: &NewSurveyRecord) -> Result<Uuid, StoreError> {
        let id = insert(&self.pool, record, None)
            .await?
            .ok_or(StoreError::StoreUnavailable(sqlx::Error::RowNotFound))?;
        info!(%id, "stored survey response");
        Ok(id)
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM skillbridge.responses")
            .execute(&self.pool)
            .await?;
        warn!(removed = result.rows_affected(), "cleared all survey responses");
        Ok(result.rows_affected())
    }
}

fn decode_row(row: &PgRow) -> Result<SurveyRecord, sqlx::Error> {
    let text = |column: &str| row.try_get::<Option<String>, _>(column);
    let skills: Option<Vec<String>> = row.try_get("desired_skills")?;
    let rating: Option<i32> = row.try_get("certification_importance")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    Ok(SurveyRecord {
        id: row.try_get("id")?,
        full_name: text("full_name")?,
        email: text("email")?,
        governorate: decode_option(text("governorate")?.as_deref()),
        current_status: decode_option(text("current_status")?.as_deref()),
        education_gap: decode_option(text("education_gap")?.as_deref()),
        used_platforms: decode_option(text("used_platforms")?.as_deref()),
        certificates_value: decode_option(text("certificates_value")?.as_deref()),
        desired_skills: decode_skills(skills.unwrap_or_default()),
        certification_importance: rating.and_then(ImportanceRating::from_score),
        job_opportunities_importance: decode_option(
            text("job_opportunities_importance")?.as_deref(),
        ),
        preferred_price: decode_option(text("preferred_price")?.as_deref()),
        points_motivation: decode_option(text("points_motivation")?.as_deref()),
        try_platform: decode_option(text("try_platform")?.as_deref()),
        created_at,
    })
}

/// Inserts one response. Returns `None` when `source_key` was already taken.
async fn insert(
    pool: &PgPool,
    record: &NewSurveyRecord,
    source_key: Option<&str>,
) -> Result<Option<Uuid>, sqlx::Error> {
    let skills: Vec<String> = record
        .desired_skills
        .iter()
        .map(|skill| skill.value().to_string())
        .collect();

    let row = sqlx::query(
        r#"
        INSERT INTO skillbridge.responses
        (id, full_name, email, governorate, current_status, education_gap, used_platforms,
         certificates_value, desired_skills, certification_importance,
         job_opportunities_importance, preferred_price, points_motivation, try_platform,
         source_key)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        ON CONFLICT (source_key) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&record.full_name)
    .bind(&record.email)
    .bind(record.governorate.value())
    .bind(record.current_status.value())
    .bind(record.education_gap.value())
    .bind(record.used_platforms.value())
    .bind(record.certificates_value.map(|value| value.value()))
    .bind(skills)
    .bind(i32::from(record.certification_importance.score()))
    .bind(record.job_opportunities_importance.value())
    .bind(record.preferred_price.value())
    .bind(record.points_motivation.value())
    .bind(record.try_platform.value())
    .bind(source_key)
    .fetch_optional(pool)
    .await?;

    row.map(|row| row.try_get("id")).transpose()
}

pub async fn init_db(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<usize> {
    let responses = [
        (
            "seed-001",
            "Zainab Karim",
            "zainab.karim@skillbridge.iq",
            "baghdad",
            "student",
            "yes",
            "yes",
            Some("yes-not-useful"),
            "programming;design",
            5,
            "very-important",
            "free",
            "yes",
            "definitely",
        ),
        (
            "seed-002",
            "Omar Saleh",
            "omar.saleh@skillbridge.iq",
            "basra",
            "graduate",
            "yes",
            "no",
            None,
            "marketing;soft-skills",
            4,
            "very-important",
            "less-than-10",
            "yes",
            "maybe",
        ),
        (
            "seed-003",
            "Huda Ali",
            "huda.ali@skillbridge.iq",
            "erbil",
            "employed",
            "no",
            "yes",
            Some("yes-useful"),
            "management",
            3,
            "somewhat",
            "10-20",
            "no",
            "definitely",
        ),
        (
            "seed-004",
            "Mustafa Jaber",
            "mustafa.jaber@skillbridge.iq",
            "mosul",
            "unemployed",
            "yes",
            "no",
            None,
            "programming",
            5,
            "very-important",
            "free",
            "yes",
            "definitely",
        ),
        (
            "seed-005",
            "Sara Nabil",
            "sara.nabil@skillbridge.iq",
            "karbala",
            "freelancer",
            "no",
            "yes",
            Some("no"),
            "design;other",
            2,
            "not-important",
            "more-than-20",
            "no",
            "no",
        ),
    ];

    let mut inserted = 0usize;
    for (
        source_key,
        full_name,
        email,
        governorate,
        status,
        education_gap,
        used_platforms,
        certificates_value,
        skills,
        rating,
        job,
        price,
        points,
        try_platform,
    ) in responses
    {
        let record = SubmissionForm {
            full_name: Some(full_name.to_string()),
            email: Some(email.to_string()),
            governorate: Some(governorate.to_string()),
            current_status: Some(status.to_string()),
            education_gap: Some(education_gap.to_string()),
            used_platforms: Some(used_platforms.to_string()),
            certificates_value: certificates_value.map(str::to_string),
            desired_skills: Some(skills.to_string()),
            certification_importance: Some(rating),
            job_opportunities_importance: Some(job.to_string()),
            preferred_price: Some(price.to_string()),
            points_motivation: Some(points.to_string()),
            try_platform: Some(try_platform.to_string()),
        }
        .validate()
        .with_context(|| format!("seed row {source_key} is invalid"))?;

        if insert(pool, &record, Some(source_key)).await?.is_some() {
            inserted += 1;
        }
    }

    Ok(inserted)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub duplicates: usize,
    pub rejected: usize,
}

#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    full_name: Option<String>,
    email: Option<String>,
    governorate: Option<String>,
    current_status: Option<String>,
    education_gap: Option<String>,
    used_platforms: Option<String>,
    certificates_value: Option<String>,
    desired_skills: Option<String>,
    certification_importance: Option<i32>,
    job_opportunities_importance: Option<String>,
    preferred_price: Option<String>,
    points_motivation: Option<String>,
    try_platform: Option<String>,
    source_key: Option<String>,
}

impl CsvRow {
    fn into_parts(self) -> (SubmissionForm, Option<String>) {
        (
            SubmissionForm {
                full_name: self.full_name,
                email: self.email,
                governorate: self.governorate,
                current_status: self.current_status,
                education_gap: self.education_gap,
                used_platforms: self.used_platforms,
                certificates_value: self.certificates_value,
                desired_skills: self.desired_skills,
                certification_importance: self.certification_importance,
                job_opportunities_importance: self.job_opportunities_importance,
                preferred_price: self.preferred_price,
                points_motivation: self.points_motivation,
                try_platform: self.try_platform,
            },
            self.source_key,
        )
    }
}

/// Loads responses from a CSV file. Rows failing validation are logged and
/// skipped; rows whose `source_key` already exists are counted as duplicates.
pub async fn import_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<ImportSummary> {
    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let mut summary = ImportSummary::default();

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        let line = index + 2;
        let (form, source_key) = result
            .with_context(|| format!("malformed CSV row at line {line}"))?
            .into_parts();

        let record = match form.validate() {
            Ok(record) => record,
            Err(err) => {
                warn!(line, error = %err, "skipping invalid survey row");
                summary.rejected += 1;
                continue;
            }
        };

        let source_key = source_key.unwrap_or_else(|| format!("import-{}", Uuid::new_v4()));
        match insert(pool, &record, Some(&source_key)).await? {
            Some(_) => summary.inserted += 1,
            None => summary.duplicates += 1,
        }
    }

    info!(
        inserted = summary.inserted,
        duplicates = summary.duplicates,
        rejected = summary.rejected,
        "csv import finished"
    );
    Ok(summary)
}
