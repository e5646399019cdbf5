use std::collections::BTreeSet;

use clap::Args;

use crate::error::IntakeError;
use crate::models::{
    CertificateValue, Governorate, ImportanceRating, JobImportance, PriceTier, Skill, Status,
    SurveyOption, TryPlatform, YesNo,
};

/// Raw answers as they arrive from the command line or a CSV row.
#[derive(Debug, Clone, Default, Args)]
pub struct SubmissionForm {
    #[arg(long)]
    pub full_name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub governorate: Option<String>,
    #[arg(long)]
    pub current_status: Option<String>,
    #[arg(long)]
    pub education_gap: Option<String>,
    #[arg(long)]
    pub used_platforms: Option<String>,
    #[arg(long)]
    pub certificates_value: Option<String>,
    /// Comma or semicolon separated skill tags
    #[arg(long)]
    pub desired_skills: Option<String>,
    #[arg(long)]
    pub certification_importance: Option<i32>,
    #[arg(long)]
    pub job_opportunities_importance: Option<String>,
    #[arg(long)]
    pub preferred_price: Option<String>,
    #[arg(long)]
    pub points_motivation: Option<String>,
    #[arg(long)]
    pub try_platform: Option<String>,
}

/// A validated submission, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSurveyRecord {
    pub full_name: String,
    pub email: String,
    pub governorate: Governorate,
    pub current_status: Status,
    pub education_gap: YesNo,
    pub used_platforms: YesNo,
    pub certificates_value: Option<CertificateValue>,
    pub desired_skills: BTreeSet<Skill>,
    pub certification_importance: ImportanceRating,
    pub job_opportunities_importance: JobImportance,
    pub preferred_price: PriceTier,
    pub points_motivation: YesNo,
    pub try_platform: TryPlatform,
}

fn required_text(value: Option<String>, field: &'static str) -> Result<String, IntakeError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(IntakeError::Missing(field))
}

fn optional_choice<T: SurveyOption>(
    value: Option<&str>,
    field: &'static str,
) -> Result<Option<T>, IntakeError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => T::parse(raw).map(Some).ok_or_else(|| IntakeError::Unrecognised {
            field,
            value: raw.to_string(),
        }),
    }
}

fn required_choice<T: SurveyOption>(
    value: Option<&str>,
    field: &'static str,
) -> Result<T, IntakeError> {
    optional_choice(value, field)?.ok_or(IntakeError::Missing(field))
}

impl SubmissionForm {
    pub fn validate(self) -> Result<NewSurveyRecord, IntakeError> {
        let full_name = required_text(self.full_name, "full_name")?;
        let email = required_text(self.email, "email")?;
        if !email.contains('@') {
            return Err(IntakeError::InvalidEmail(email));
        }

        let used_platforms: YesNo =
            required_choice(self.used_platforms.as_deref(), "used_platforms")?;
        let certificates_value: Option<CertificateValue> =
            optional_choice(self.certificates_value.as_deref(), "certificates_value")?;
        if certificates_value.is_some() && used_platforms != YesNo::Yes {
            return Err(IntakeError::UnexpectedCertificateValue);
        }

        let certification_importance = match self.certification_importance {
            None => ImportanceRating::DEFAULT,
            Some(score) => ImportanceRating::from_score(score)
                .ok_or(IntakeError::RatingOutOfRange(score))?,
        };

        let mut desired_skills = BTreeSet::new();
        for raw in self
            .desired_skills
            .as_deref()
            .unwrap_or_default()
            .split([',', ';'])
        {
            if let Some(skill) = optional_choice::<Skill>(Some(raw), "desired_skills")? {
                desired_skills.insert(skill);
            }
        }

        Ok(NewSurveyRecord {
            full_name,
            email,
            governorate: required_choice(self.governorate.as_deref(), "governorate")?,
            current_status: required_choice(self.current_status.as_deref(), "current_status")?,
            education_gap: required_choice(self.education_gap.as_deref(), "education_gap")?,
            used_platforms,
            certificates_value,
            desired_skills,
            certification_importance,
            job_opportunities_importance: required_choice(
                self.job_opportunities_importance.as_deref(),
                "job_opportunities_importance",
            )?,
            preferred_price: required_choice(self.preferred_price.as_deref(), "preferred_price")?,
            points_motivation: required_choice(
                self.points_motivation.as_deref(),
                "points_motivation",
            )?,
            try_platform: required_choice(self.try_platform.as_deref(), "try_platform")?,
        })
    }
}

#[cfg(test)]
pub(crate) fn sample_form() -> SubmissionForm {
    SubmissionForm {
        full_name: Some("Noor Hassan".to_string()),
        email: Some("noor@example.com".to_string()),
        governorate: Some("basra".to_string()),
        current_status: Some("student".to_string()),
        education_gap: Some("yes".to_string()),
        used_platforms: Some("yes".to_string()),
        certificates_value: Some("yes-useful".to_string()),
        desired_skills: Some("programming, design;programming".to_string()),
        certification_importance: Some(4),
        job_opportunities_importance: Some("very-important".to_string()),
        preferred_price: Some("less-than-10".to_string()),
        points_motivation: Some("yes".to_string()),
        try_platform: Some("definitely".to_string()),
    }
}
