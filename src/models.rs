use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::labels::{self, Field, Language};

/// A fixed answer option of one survey question.
///
/// `ALL` is the canonical option order; every table, series and tie-break
/// follows it.
pub trait SurveyOption: Copy + Eq + Ord + 'static {
    const FIELD: Field;
    const ALL: &'static [Self];

    /// Wire value as stored and submitted.
    fn value(self) -> &'static str;

    fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.iter().copied().find(|option| option.value() == value)
    }

    fn label(self, lang: Language) -> &'static str {
        labels::label(Self::FIELD, self.value(), lang)
    }
}

macro_rules! survey_option {
    ($name:ident, $field:expr, { $($variant:ident => $value:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        pub enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl SurveyOption for $name {
            const FIELD: Field = $field;
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn value(self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }
    };
}

survey_option!(Governorate, Field::Governorate, {
    Baghdad => "baghdad",
    Basra => "basra",
    Mosul => "mosul",
    Erbil => "erbil",
    Karbala => "karbala",
    Other => "other",
});

survey_option!(Status, Field::Status, {
    Student => "student",
    Graduate => "graduate",
    Employed => "employed",
    Unemployed => "unemployed",
    Freelancer => "freelancer",
});

survey_option!(YesNo, Field::YesNo, {
    Yes => "yes",
    No => "no",
});

survey_option!(CertificateValue, Field::CertificateValue, {
    YesUseful => "yes-useful",
    YesNotUseful => "yes-not-useful",
    No => "no",
});

survey_option!(Skill, Field::Skill, {
    Programming => "programming",
    Design => "design",
    Marketing => "marketing",
    Management => "management",
    SoftSkills => "soft-skills",
    Other => "other",
});

survey_option!(ImportanceRating, Field::ImportanceRating, {
    One => "1",
    Two => "2",
    Three => "3",
    Four => "4",
    Five => "5",
});

survey_option!(JobImportance, Field::JobImportance, {
    VeryImportant => "very-important",
    Somewhat => "somewhat",
    NotImportant => "not-important",
});

survey_option!(PriceTier, Field::PriceTier, {
    Free => "free",
    LessThan10 => "less-than-10",
    From10To20 => "10-20",
    MoreThan20 => "more-than-20",
});

survey_option!(TryPlatform, Field::TryPlatform, {
    Definitely => "definitely",
    Maybe => "maybe",
    No => "no",
});

impl ImportanceRating {
    pub const DEFAULT: ImportanceRating = ImportanceRating::Three;

    pub fn from_score(score: i32) -> Option<Self> {
        match score {
            1 => Some(ImportanceRating::One),
            2 => Some(ImportanceRating::Two),
            3 => Some(ImportanceRating::Three),
            4 => Some(ImportanceRating::Four),
            5 => Some(ImportanceRating::Five),
            _ => None,
        }
    }

    pub fn score(self) -> u8 {
        match self {
            ImportanceRating::One => 1,
            ImportanceRating::Two => 2,
            ImportanceRating::Three => 3,
            ImportanceRating::Four => 4,
            ImportanceRating::Five => 5,
        }
    }
}

impl PriceTier {
    pub fn is_paid(self) -> bool {
        self != PriceTier::Free
    }
}

/// Decodes an optional stored value, treating anything unrecognised as
/// unspecified.
pub fn decode_option<T: SurveyOption>(raw: Option<&str>) -> Option<T> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    let parsed = T::parse(raw);
    if parsed.is_none() {
        tracing::debug!(field = ?T::FIELD, value = raw, "unrecognised survey value");
    }
    parsed
}

/// Decodes a multi-select answer into a set, dropping unknown tags.
pub fn decode_skills<I, S>(raw: I) -> BTreeSet<Skill>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .filter_map(|value| decode_option::<Skill>(Some(value.as_ref())))
        .collect()
}

/// One respondent's stored submission.
#[derive(Debug, Clone, Serialize)]
pub struct SurveyRecord {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub governorate: Option<Governorate>,
    pub current_status: Option<Status>,
    pub education_gap: Option<YesNo>,
    pub used_platforms: Option<YesNo>,
    pub certificates_value: Option<CertificateValue>,
    pub desired_skills: BTreeSet<Skill>,
    pub certification_importance: Option<ImportanceRating>,
    pub job_opportunities_importance: Option<JobImportance>,
    pub preferred_price: Option<PriceTier>,
    pub points_motivation: Option<YesNo>,
    pub try_platform: Option<TryPlatform>,
    pub created_at: DateTime<Utc>,
}

impl SurveyRecord {
    /// Certificate value only counts when the respondent used platforms.
    pub fn effective_certificates_value(&self) -> Option<CertificateValue> {
        match self.used_platforms {
            Some(YesNo::Yes) => self.certificates_value,
            _ => None,
        }
    }
}

#[cfg(test)]
pub(crate) fn blank_record() -> SurveyRecord {
    SurveyRecord {
        id: Uuid::new_v4(),
        full_name: None,
        email: None,
        governorate: None,
        current_status: None,
        education_gap: None,
        used_platforms: None,
        certificates_value: None,
        desired_skills: BTreeSet::new(),
        certification_importance: None,
        job_opportunities_importance: None,
        preferred_price: None,
        points_motivation: None,
        try_platform: None,
        created_at: Utc::now(),
    }
}
