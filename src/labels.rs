use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

/// Display language for every rendered label.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Language {
    #[default]
    #[value(name = "ar")]
    Arabic,
    #[value(name = "en")]
    English,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Arabic => "ar",
            Language::English => "en",
        }
    }

    /// Chooses between an Arabic and an English literal.
    pub fn pick(&self, arabic: &'static str, english: &'static str) -> &'static str {
        match self {
            Language::Arabic => arabic,
            Language::English => english,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ar" | "arabic" => Ok(Language::Arabic),
            "en" | "english" => Ok(Language::English),
            other => Err(format!("unsupported language: {other}")),
        }
    }
}

/// Label namespaces. Yes/no answers share one namespace across questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Common,
    Question,
    Governorate,
    Status,
    YesNo,
    CertificateValue,
    Skill,
    ImportanceRating,
    JobImportance,
    PriceTier,
    TryPlatform,
}

struct Label {
    field: Field,
    value: &'static str,
    arabic: &'static str,
    english: &'static str,
}

const fn entry(
    field: Field,
    value: &'static str,
    arabic: &'static str,
    english: &'static str,
) -> Label {
    Label {
        field,
        value,
        arabic,
        english,
    }
}

static LABELS: &[Label] = &[
    entry(Field::Common, "unspecified", "غير محدد", "Unspecified"),
    entry(Field::Common, "n/a", "غير متاح", "n/a"),
    entry(Field::Question, "governorate", "محافظة السكن", "Residence governorate"),
    entry(Field::Question, "current-status", "الوضع الحالي", "Current status"),
    entry(
        Field::Question,
        "education-gap",
        "صعوبة ربط الدراسة بسوق العمل",
        "Difficulty linking studies to the labor market",
    ),
    entry(
        Field::Question,
        "used-platforms",
        "استخدام منصات تعليمية سابقاً",
        "Used educational platforms before",
    ),
    entry(
        Field::Question,
        "certificates-value",
        "قيمة الشهادات في التوظيف",
        "Value of certificates for employment",
    ),
    entry(Field::Question, "desired-skills", "المهارات المطلوبة", "Desired skills"),
    entry(
        Field::Question,
        "certification-importance",
        "أهمية الشهادة المعتمدة",
        "Importance of recognized certification",
    ),
    entry(
        Field::Question,
        "job-opportunities",
        "أهمية فرص العمل",
        "Importance of job opportunities",
    ),
    entry(Field::Question, "preferred-price", "السعر الشهري المناسب", "Preferred monthly price"),
    entry(
        Field::Question,
        "points-motivation",
        "التحفيز بنظام النقاط",
        "Motivated by a points system",
    ),
    entry(Field::Question, "try-platform", "تجربة المنصة", "Would try the platform"),
    entry(Field::Governorate, "baghdad", "بغداد", "Baghdad"),
    entry(Field::Governorate, "basra", "البصرة", "Basra"),
    entry(Field::Governorate, "mosul", "الموصل", "Mosul"),
    entry(Field::Governorate, "erbil", "أربيل", "Erbil"),
    entry(Field::Governorate, "karbala", "كربلاء", "Karbala"),
    entry(Field::Governorate, "other", "غير محافظة", "Other"),
    entry(Field::Status, "student", "طالب", "Student"),
    entry(Field::Status, "graduate", "خريج", "Recent graduate"),
    entry(Field::Status, "employed", "موظف", "Employed"),
    entry(Field::Status, "unemployed", "عاطل عن العمل", "Unemployed"),
    entry(Field::Status, "freelancer", "فريلانسر", "Freelancer"),
    entry(Field::YesNo, "yes", "نعم", "Yes"),
    entry(Field::YesNo, "no", "لا", "No"),
    entry(Field::CertificateValue, "yes-useful", "نعم، مفيدة", "Yes, and it was useful"),
    entry(
        Field::CertificateValue,
        "yes-not-useful",
        "نعم، غير مفيدة",
        "Yes, but it did not help",
    ),
    entry(Field::CertificateValue, "no", "لا", "No"),
    entry(Field::Skill, "programming", "برمجة", "Programming"),
    entry(Field::Skill, "design", "تصميم", "Design"),
    entry(Field::Skill, "marketing", "تسويق رقمي", "Digital marketing"),
    entry(Field::Skill, "management", "إدارة مشاريع", "Project management"),
    entry(Field::Skill, "soft-skills", "مهارات شخصية", "Soft skills"),
    entry(Field::Skill, "other", "أخرى", "Other"),
    entry(Field::ImportanceRating, "1", "1", "1"),
    entry(Field::ImportanceRating, "2", "2", "2"),
    entry(Field::ImportanceRating, "3", "3", "3"),
    entry(Field::ImportanceRating, "4", "4", "4"),
    entry(Field::ImportanceRating, "5", "5", "5"),
    entry(Field::JobImportance, "very-important", "مهم جداً", "Very important"),
    entry(Field::JobImportance, "somewhat", "نوعاً ما", "Somewhat"),
    entry(Field::JobImportance, "not-important", "غير مهم", "Not important"),
    entry(Field::PriceTier, "free", "مجاني فقط", "Free only"),
    entry(Field::PriceTier, "less-than-10", "أقل من $10", "Less than $10"),
    entry(Field::PriceTier, "10-20", "$10-20", "$10-20"),
    entry(Field::PriceTier, "more-than-20", "أكثر من $20", "More than $20"),
    entry(Field::TryPlatform, "definitely", "بالتأكيد", "Definitely"),
    entry(Field::TryPlatform, "maybe", "ربما", "Maybe"),
    entry(Field::TryPlatform, "no", "لا", "No"),
];

/// Looks up the display label for `value` within `field`.
///
/// Unknown pairs fall back to the "unspecified" label so a stray value can
/// never break a rendering site.
pub fn label(field: Field, value: &str, lang: Language) -> &'static str {
    LABELS
        .iter()
        .find(|entry| entry.field == field && entry.value == value)
        .or_else(|| {
            LABELS
                .iter()
                .find(|entry| entry.field == Field::Common && entry.value == "unspecified")
        })
        .map(|entry| match lang {
            Language::Arabic => entry.arabic,
            Language::English => entry.english,
        })
        .unwrap_or("?")
}

pub fn unspecified(lang: Language) -> &'static str {
    label(Field::Common, "unspecified", lang)
}

pub fn not_available(lang: Language) -> &'static str {
    label(Field::Common, "n/a", lang)
}
