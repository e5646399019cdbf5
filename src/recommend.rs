use crate::aggregate::{percent, AggregateBundle, AggregateTable};
use crate::labels::Language;
use crate::models::{Skill, Status, SurveyOption};

#[derive(Debug, Clone, PartialEq)]
pub struct AudienceVerdict {
    pub status: Status,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillVerdict {
    pub skill: Skill,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingModel {
    Freemium,
    CompetitivePaid,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricingVerdict {
    pub free: usize,
    pub paid: usize,
    pub model: PricingModel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Messaging {
    JobPlacement,
    EducationalQuality,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobFocusVerdict {
    pub very_important: usize,
    pub percent: f64,
    pub messaging: Messaging,
}

/// Output of the four strategy rules.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationSummary {
    pub target_audience: AudienceVerdict,
    pub top_skill: SkillVerdict,
    pub pricing: PricingVerdict,
    pub job_focus: JobFocusVerdict,
}

/// Highest count wins; on a tie, all-zero included, the option declared
/// first is kept.
fn leading_option<T: SurveyOption>(table: &AggregateTable, first: T) -> (T, usize) {
    T::ALL
        .iter()
        .fold((first, table.count(first)), |(best, best_count), &option| {
            let count = table.count(option);
            if count > best_count {
                (option, count)
            } else {
                (best, best_count)
            }
        })
}

pub fn target_audience(bundle: &AggregateBundle) -> AudienceVerdict {
    let (status, count) = leading_option(&bundle.status, Status::Student);
    AudienceVerdict {
        status,
        count,
        percent: bundle.status.share(status),
    }
}

pub fn top_skill(bundle: &AggregateBundle) -> SkillVerdict {
    let (skill, count) = leading_option(&bundle.desired_skills, Skill::Programming);
    SkillVerdict {
        skill,
        count,
        percent: bundle.desired_skills.share(skill),
    }
}

/// Free against all paid tiers together; a tie favours freemium.
pub fn pricing_strategy(bundle: &AggregateBundle) -> PricingVerdict {
    let free = bundle.free_count();
    let paid = bundle.paid_count();
    PricingVerdict {
        free,
        paid,
        model: if free >= paid {
            PricingModel::Freemium
        } else {
            PricingModel::CompetitivePaid
        },
    }
}

/// Job placement leads only when strictly more than half rate it very
/// important.
pub fn job_focus(bundle: &AggregateBundle) -> JobFocusVerdict {
    let very_important = bundle.very_important_count();
    JobFocusVerdict {
        very_important,
        percent: percent(very_important, bundle.total),
        messaging: if very_important * 2 > bundle.total {
            Messaging::JobPlacement
        } else {
            Messaging::EducationalQuality
        },
    }
}

pub fn recommend(bundle: &AggregateBundle) -> Option<RecommendationSummary> {
    if bundle.total == 0 {
        return None;
    }
    Some(RecommendationSummary {
        target_audience: target_audience(bundle),
        top_skill: top_skill(bundle),
        pricing: pricing_strategy(bundle),
        job_focus: job_focus(bundle),
    })
}

impl AudienceVerdict {
    pub fn sentence(&self, lang: Language) -> String {
        let label = self.status.label(lang);
        match lang {
            Language::Arabic => format!(
                "الفئة المستهدفة الأساسية: {label}، حيث تمثل النسبة الأكبر من المستخدمين بنسبة {:.0}% ({} مشارك).",
                self.percent, self.count
            ),
            Language::English => format!(
                "Primary target audience: {label}, the largest group of respondents at {:.0}% ({} respondents).",
                self.percent, self.count
            ),
        }
    }
}

impl SkillVerdict {
    pub fn sentence(&self, lang: Language) -> String {
        let label = self.skill.label(lang);
        match lang {
            Language::Arabic => format!(
                "نوصي بالتركيز على {label} حيث أنها المهارة الأكثر طلباً بين جميع الفئات ({} مشارك، {:.0}%).",
                self.count, self.percent
            ),
            Language::English => format!(
                "Lead with {label}, the most requested skill across all groups ({} respondents, {:.0}%).",
                self.count, self.percent
            ),
        }
    }
}

impl PricingVerdict {
    pub fn sentence(&self, lang: Language) -> String {
        let advice = match (self.model, lang) {
            (PricingModel::Freemium, Language::Arabic) => {
                "نوصي بنموذج Freemium مع مميزات مدفوعة إضافية حيث أن الغالبية تفضل النسخة المجانية."
            }
            (PricingModel::Freemium, Language::English) => {
                "Offer a freemium model with paid add-ons; most respondents prefer the free tier."
            }
            (PricingModel::CompetitivePaid, Language::Arabic) => {
                "نوصي بباقات مدفوعة بأسعار تنافسية حيث أن نسبة كبيرة من المستخدمين مستعدون للدفع."
            }
            (PricingModel::CompetitivePaid, Language::English) => {
                "Offer competitively priced paid plans; a large share of respondents are willing to pay."
            }
        };
        match lang {
            Language::Arabic => format!("{advice} (مجاني: {}، مدفوع: {})", self.free, self.paid),
            Language::English => format!("{advice} (free: {}, paid: {})", self.free, self.paid),
        }
    }
}

impl JobFocusVerdict {
    pub fn sentence(&self, lang: Language) -> String {
        let advice = match (self.messaging, lang) {
            (Messaging::JobPlacement, Language::Arabic) => {
                "يجب التركيز على توفير فرص توظيف كعامل جذب رئيسي حيث أن الغالبية تعتبره مهم جداً."
            }
            (Messaging::JobPlacement, Language::English) => {
                "Lead with job placement; most respondents consider it very important."
            }
            (Messaging::EducationalQuality, Language::Arabic) => {
                "يمكن التركيز على الجودة التعليمية كعامل جذب رئيسي مع توفير فرص توظيف كقيمة مضافة."
            }
            (Messaging::EducationalQuality, Language::English) => {
                "Lead with educational quality and offer job opportunities as added value."
            }
        };
        match lang {
            Language::Arabic => format!(
                "{advice} (مهم جداً: {}، {:.0}%)",
                self.very_important, self.percent
            ),
            Language::English => format!(
                "{advice} (very important: {}, {:.0}%)",
                self.very_important, self.percent
            ),
        }
    }
}

impl RecommendationSummary {
    /// Rendered sentences in rule order.
    pub fn sentences(&self, lang: Language) -> Vec<String> {
        vec![
            self.target_audience.sentence(lang),
            self.top_skill.sentence(lang),
            self.pricing.sentence(lang),
            self.job_focus.sentence(lang),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::models::{blank_record, JobImportance, PriceTier, SurveyRecord};

    fn with_status(status: Status) -> SurveyRecord {
        let mut record = blank_record();
        record.current_status = Some(status);
        record
    }

    #[test]
    fn empty_bundle_has_no_summary() {
        assert!(recommend(&aggregate(&[])).is_none());
    }

    #[test]
    fn three_record_scenario_favours_freemium_and_students() {
        let mut records = vec![
            with_status(Status::Student),
            with_status(Status::Student),
            with_status(Status::Employed),
        ];
        records[0].preferred_price = Some(PriceTier::Free);
        records[1].preferred_price = Some(PriceTier::From10To20);
        records[2].preferred_price = Some(PriceTier::Free);

        let summary = recommend(&aggregate(&records)).unwrap();
        let audience = summary.target_audience;
        assert_eq!(audience.status, Status::Student);
        assert_eq!(audience.count, 2);
        assert!((audience.percent - 66.67).abs() < 0.01);
        assert_eq!(summary.pricing.free, 2);
        assert_eq!(summary.pricing.paid, 1);
        assert_eq!(summary.pricing.model, PricingModel::Freemium);
    }

    #[test]
    fn status_ties_go_to_the_earlier_status() {
        let records = vec![
            with_status(Status::Freelancer),
            with_status(Status::Graduate),
            with_status(Status::Freelancer),
            with_status(Status::Graduate),
        ];
        let audience = target_audience(&aggregate(&records));
        assert_eq!(audience.status, Status::Graduate);
        assert!((audience.percent - 50.0).abs() < 1e-9);
    }

    #[test]
    fn skill_ties_go_to_the_earlier_tag() {
        let mut a = blank_record();
        a.desired_skills.extend([Skill::SoftSkills, Skill::Marketing]);
        let mut b = blank_record();
        b.desired_skills.extend([Skill::SoftSkills, Skill::Marketing, Skill::Other]);
        let skill = top_skill(&aggregate(&[a, b]));
        assert_eq!(skill.skill, Skill::Marketing);
        assert_eq!(skill.count, 2);
    }

    #[test]
    fn all_zero_tables_fall_back_to_the_first_option() {
        let summary = recommend(&aggregate(&[blank_record()])).unwrap();
        assert_eq!(summary.target_audience.status, Status::Student);
        assert_eq!(summary.target_audience.count, 0);
        assert_eq!(summary.target_audience.percent, 0.0);
        assert_eq!(summary.top_skill.skill, Skill::Programming);
        assert_eq!(summary.top_skill.count, 0);
        assert_eq!(summary.top_skill.percent, 0.0);
        // 0 free vs 0 paid is a tie
        assert_eq!(summary.pricing.model, PricingModel::Freemium);
        assert_eq!(summary.sentences(Language::English).len(), 4);
    }

    #[test]
    fn paid_majority_recommends_competitive_pricing() {
        let tiers = [
            PriceTier::Free,
            PriceTier::LessThan10,
            PriceTier::MoreThan20,
        ];
        let records: Vec<SurveyRecord> = tiers
            .into_iter()
            .map(|tier| {
                let mut record = blank_record();
                record.preferred_price = Some(tier);
                record
            })
            .collect();
        let verdict = pricing_strategy(&aggregate(&records));
        assert_eq!(verdict.model, PricingModel::CompetitivePaid);
        assert!(verdict.sentence(Language::English).contains("paid plans"));
    }

    #[test]
    fn exactly_half_very_important_is_not_a_majority() {
        let mut records: Vec<SurveyRecord> = (0..4).map(|_| blank_record()).collect();
        records[0].job_opportunities_importance = Some(JobImportance::VeryImportant);
        records[1].job_opportunities_importance = Some(JobImportance::VeryImportant);
        records[2].job_opportunities_importance = Some(JobImportance::Somewhat);
        assert_eq!(
            job_focus(&aggregate(&records)).messaging,
            Messaging::EducationalQuality
        );

        records[2].job_opportunities_importance = Some(JobImportance::VeryImportant);
        let verdict = job_focus(&aggregate(&records));
        assert_eq!(verdict.messaging, Messaging::JobPlacement);
        assert!((verdict.percent - 75.0).abs() < 1e-9);
    }

    #[test]
    fn sentences_use_the_label_table() {
        let verdict = AudienceVerdict {
            status: Status::Freelancer,
            count: 3,
            percent: 60.0,
        };
        assert!(verdict.sentence(Language::English).contains("Freelancer"));
        assert!(verdict.sentence(Language::English).contains("60%"));
        assert!(verdict.sentence(Language::Arabic).contains("فريلانسر"));
    }
}
