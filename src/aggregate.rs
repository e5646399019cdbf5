use std::collections::BTreeMap;

use clap::ValueEnum;

use crate::labels::Field;
use crate::models::{
    Governorate, JobImportance, PriceTier, Skill, Status, SurveyOption, SurveyRecord,
};

/// Questions that can be charted on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Question {
    Governorate,
    CurrentStatus,
    EducationGap,
    UsedPlatforms,
    CertificatesValue,
    DesiredSkills,
    CertificationImportance,
    JobOpportunities,
    PreferredPrice,
    PointsMotivation,
    TryPlatform,
}

impl Question {
    pub const ALL: &'static [Question] = &[
        Question::CurrentStatus,
        Question::EducationGap,
        Question::UsedPlatforms,
        Question::CertificatesValue,
        Question::DesiredSkills,
        Question::CertificationImportance,
        Question::JobOpportunities,
        Question::PreferredPrice,
        Question::PointsMotivation,
        Question::TryPlatform,
        Question::Governorate,
    ];

    /// Key into the question namespace of the label table.
    pub fn key(self) -> &'static str {
        match self {
            Question::Governorate => "governorate",
            Question::CurrentStatus => "current-status",
            Question::EducationGap => "education-gap",
            Question::UsedPlatforms => "used-platforms",
            Question::CertificatesValue => "certificates-value",
            Question::DesiredSkills => "desired-skills",
            Question::CertificationImportance => "certification-importance",
            Question::JobOpportunities => "job-opportunities",
            Question::PreferredPrice => "preferred-price",
            Question::PointsMotivation => "points-motivation",
            Question::TryPlatform => "try-platform",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableEntry {
    pub key: &'static str,
    pub count: usize,
    /// Full precision; rounding happens when formatting.
    pub percent: f64,
}

/// Counts and shares for one question over one denominator.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateTable {
    pub field: Field,
    pub denominator: usize,
    pub entries: Vec<TableEntry>,
}

pub fn percent(count: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        100.0 * count as f64 / denominator as f64
    }
}

impl AggregateTable {
    fn from_counts<I>(field: Field, counts: I, denominator: usize) -> Self
    where
        I: IntoIterator<Item = (&'static str, usize)>,
    {
        let entries = counts
            .into_iter()
            .map(|(key, count)| TableEntry {
                key,
                count,
                percent: percent(count, denominator),
            })
            .collect();
        Self {
            field,
            denominator,
            entries,
        }
    }

    pub fn count<T: SurveyOption>(&self, option: T) -> usize {
        self.entries
            .iter()
            .find(|entry| entry.key == option.value())
            .map(|entry| entry.count)
            .unwrap_or(0)
    }

    pub fn share<T: SurveyOption>(&self, option: T) -> f64 {
        percent(self.count(option), self.denominator)
    }

    #[cfg(test)]
    pub fn total_count(&self) -> usize {
        self.entries.iter().map(|entry| entry.count).sum()
    }
}

/// Counts every option `pick` yields per record, at most once per option.
fn tally<'a, T, V, R, F>(records: R, pick: F) -> AggregateTable
where
    T: SurveyOption,
    V: IntoIterator<Item = T>,
    R: IntoIterator<Item = &'a SurveyRecord>,
    F: Fn(&SurveyRecord) -> V,
{
    let mut counts = vec![0usize; T::ALL.len()];
    let mut seen = vec![false; T::ALL.len()];
    let mut denominator = 0usize;

    for record in records {
        denominator += 1;
        seen.iter_mut().for_each(|flag| *flag = false);
        for value in pick(record) {
            if let Some(index) = T::ALL.iter().position(|option| *option == value) {
                if !seen[index] {
                    seen[index] = true;
                    counts[index] += 1;
                }
            }
        }
    }

    AggregateTable::from_counts(
        T::FIELD,
        T::ALL.iter().map(|option| option.value()).zip(counts),
        denominator,
    )
}

/// One entry per option of a single-choice question, in option order.
pub fn frequency<T, F>(records: &[SurveyRecord], pick: F) -> AggregateTable
where
    T: SurveyOption,
    F: Fn(&SurveyRecord) -> Option<T>,
{
    tally(records, pick)
}

/// One entry per tag of a multi-select question; a record counts toward
/// every tag it holds.
pub fn multi_frequency<T, V, F>(records: &[SurveyRecord], pick: F) -> AggregateTable
where
    T: SurveyOption,
    V: IntoIterator<Item = T>,
    F: Fn(&SurveyRecord) -> V,
{
    tally(records, pick)
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusSlice {
    pub status: Status,
    pub group_size: usize,
    pub table: AggregateTable,
}

/// A question's answers split by respondent status.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossTab {
    pub field: Field,
    pub slices: Vec<StatusSlice>,
}

impl CrossTab {
    #[cfg(test)]
    pub fn slice(&self, status: Status) -> Option<&StatusSlice> {
        self.slices.iter().find(|slice| slice.status == status)
    }
}

/// Percentages inside each slice use the status group as denominator.
pub fn cross_tab_by_status<T, V, F>(records: &[SurveyRecord], pick: F) -> CrossTab
where
    T: SurveyOption,
    V: IntoIterator<Item = T>,
    F: Fn(&SurveyRecord) -> V,
{
    let slices = Status::ALL
        .iter()
        .map(|&status| {
            let group = records
                .iter()
                .filter(|record| record.current_status == Some(status));
            let table = tally(group, &pick);
            StatusSlice {
                status,
                group_size: table.denominator,
                table,
            }
        })
        .collect();

    CrossTab {
        field: T::FIELD,
        slices,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusAverage {
    pub status: Status,
    pub group_size: usize,
    pub answered: usize,
    /// `None` when nobody in the group rated.
    pub average: Option<f64>,
}

pub fn certification_average_by_status(records: &[SurveyRecord]) -> Vec<StatusAverage> {
    Status::ALL
        .iter()
        .map(|&status| {
            let mut group_size = 0usize;
            let mut answered = 0usize;
            let mut sum = 0u64;
            for record in records
                .iter()
                .filter(|record| record.current_status == Some(status))
            {
                group_size += 1;
                if let Some(rating) = record.certification_importance {
                    answered += 1;
                    sum += u64::from(rating.score());
                }
            }
            StatusAverage {
                status,
                group_size,
                answered,
                average: (answered > 0).then(|| sum as f64 / answered as f64),
            }
        })
        .collect()
}

/// Sparse: governorates nobody chose are absent.
pub fn governorate_distribution(records: &[SurveyRecord]) -> BTreeMap<Governorate, usize> {
    let mut map = BTreeMap::new();
    for governorate in records.iter().filter_map(|record| record.governorate) {
        *map.entry(governorate).or_insert(0) += 1;
    }
    map
}

/// Every table the dashboard and the rules read, computed in one call.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateBundle {
    pub total: usize,
    pub status: AggregateTable,
    pub education_gap: AggregateTable,
    pub used_platforms: AggregateTable,
    pub certificates_value: AggregateTable,
    pub desired_skills: AggregateTable,
    pub certification_importance: AggregateTable,
    pub job_opportunities: AggregateTable,
    pub preferred_price: AggregateTable,
    pub points_motivation: AggregateTable,
    pub try_platform: AggregateTable,
    pub skills_by_status: CrossTab,
    pub pricing_by_status: CrossTab,
    pub job_by_status: CrossTab,
    pub certification_by_status: Vec<StatusAverage>,
    pub governorates: BTreeMap<Governorate, usize>,
}

pub fn aggregate(records: &[SurveyRecord]) -> AggregateBundle {
    AggregateBundle {
        total: records.len(),
        status: frequency(records, |r| r.current_status),
        education_gap: frequency(records, |r| r.education_gap),
        used_platforms: frequency(records, |r| r.used_platforms),
        certificates_value: frequency(records, |r| r.effective_certificates_value()),
        desired_skills: multi_frequency(records, |r| {
            r.desired_skills.iter().copied().collect::<Vec<Skill>>()
        }),
        certification_importance: frequency(records, |r| r.certification_importance),
        job_opportunities: frequency(records, |r| r.job_opportunities_importance),
        preferred_price: frequency(records, |r| r.preferred_price),
        points_motivation: frequency(records, |r| r.points_motivation),
        try_platform: frequency(records, |r| r.try_platform),
        skills_by_status: cross_tab_by_status(records, |r| {
            r.desired_skills.iter().copied().collect::<Vec<Skill>>()
        }),
        pricing_by_status: cross_tab_by_status(records, |r| r.preferred_price),
        job_by_status: cross_tab_by_status(records, |r| r.job_opportunities_importance),
        certification_by_status: certification_average_by_status(records),
        governorates: governorate_distribution(records),
    }
}

impl AggregateBundle {
    /// The governorate distribution as a table, zero rows left out.
    pub fn governorate_table(&self) -> AggregateTable {
        AggregateTable::from_counts(
            Field::Governorate,
            self.governorates
                .iter()
                .map(|(governorate, count)| (governorate.value(), *count)),
            self.total,
        )
    }

    pub fn table(&self, question: Question) -> AggregateTable {
        match question {
            Question::Governorate => self.governorate_table(),
            Question::CurrentStatus => self.status.clone(),
            Question::EducationGap => self.education_gap.clone(),
            Question::UsedPlatforms => self.used_platforms.clone(),
            Question::CertificatesValue => self.certificates_value.clone(),
            Question::DesiredSkills => self.desired_skills.clone(),
            Question::CertificationImportance => self.certification_importance.clone(),
            Question::JobOpportunities => self.job_opportunities.clone(),
            Question::PreferredPrice => self.preferred_price.clone(),
            Question::PointsMotivation => self.points_motivation.clone(),
            Question::TryPlatform => self.try_platform.clone(),
        }
    }

    pub fn free_count(&self) -> usize {
        self.preferred_price.count(PriceTier::Free)
    }

    pub fn paid_count(&self) -> usize {
        PriceTier::ALL
            .iter()
            .filter(|tier| tier.is_paid())
            .map(|tier| self.preferred_price.count(*tier))
            .sum()
    }

    pub fn very_important_count(&self) -> usize {
        self.job_opportunities.count(JobImportance::VeryImportant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{blank_record, ImportanceRating, YesNo};

    fn record(status: Option<Status>, price: Option<PriceTier>) -> SurveyRecord {
        let mut record = blank_record();
        record.current_status = status;
        record.preferred_price = price;
        record
    }

    fn three_records() -> Vec<SurveyRecord> {
        vec![
            record(Some(Status::Student), Some(PriceTier::Free)),
            record(Some(Status::Student), Some(PriceTier::From10To20)),
            record(Some(Status::Employed), Some(PriceTier::Free)),
        ]
    }

    #[test]
    fn status_distribution_for_three_records() {
        let bundle = aggregate(&three_records());
        assert_eq!(bundle.total, 3);
        assert_eq!(bundle.status.count(Status::Student), 2);
        assert_eq!(bundle.status.count(Status::Employed), 1);
        assert_eq!(bundle.status.count(Status::Graduate), 0);
        assert_eq!(bundle.status.count(Status::Unemployed), 0);
        assert_eq!(bundle.status.count(Status::Freelancer), 0);
        assert!((bundle.status.share(Status::Student) - 66.666).abs() < 0.01);
        assert!((bundle.status.share(Status::Employed) - 33.333).abs() < 0.01);
        assert_eq!(bundle.free_count(), 2);
        assert_eq!(bundle.paid_count(), 1);
    }

    #[test]
    fn entries_follow_option_order_not_count_order() {
        let records = vec![
            record(Some(Status::Freelancer), None),
            record(Some(Status::Freelancer), None),
            record(Some(Status::Student), None),
        ];
        let bundle = aggregate(&records);
        let keys: Vec<&str> = bundle.status.entries.iter().map(|e| e.key).collect();
        assert_eq!(
            keys,
            vec!["student", "graduate", "employed", "unemployed", "freelancer"]
        );
    }

    #[test]
    fn complete_partitions_sum_to_hundred() {
        let records: Vec<SurveyRecord> = (0..7)
            .map(|i| {
                let mut r = record(
                    Some(Status::ALL[i % Status::ALL.len()]),
                    Some(PriceTier::ALL[i % PriceTier::ALL.len()]),
                );
                r.education_gap = Some(if i % 3 == 0 { YesNo::Yes } else { YesNo::No });
                r
            })
            .collect();
        let bundle = aggregate(&records);
        for table in [&bundle.status, &bundle.preferred_price, &bundle.education_gap] {
            assert_eq!(table.total_count(), records.len());
            let sum: f64 = table.entries.iter().map(|e| e.percent).sum();
            assert!((sum - 100.0).abs() < 0.1);
        }
    }

    #[test]
    fn empty_input_yields_zeroes_without_nan() {
        let bundle = aggregate(&[]);
        assert_eq!(bundle.total, 0);
        for question in Question::ALL {
            let table = bundle.table(*question);
            assert!(table.entries.iter().all(|e| e.count == 0 && e.percent == 0.0));
        }
        for slice in &bundle.skills_by_status.slices {
            assert!(slice.table.entries.iter().all(|e| e.percent == 0.0));
        }
        assert!(bundle.certification_by_status.iter().all(|a| a.average.is_none()));
        assert!(bundle.governorates.is_empty());
    }

    #[test]
    fn aggregation_is_deterministic() {
        let records = three_records();
        assert_eq!(aggregate(&records), aggregate(&records));
    }

    #[test]
    fn unknown_status_only_drops_out_of_status_tallies() {
        // "retired" decodes to an unspecified status
        let mut retired = record(None, Some(PriceTier::MoreThan20));
        retired.desired_skills.insert(Skill::Design);
        let bundle = aggregate(&[retired]);

        assert_eq!(bundle.status.total_count(), 0);
        assert!(bundle.skills_by_status.slices.iter().all(|s| s.group_size == 0));
        assert_eq!(bundle.desired_skills.count(Skill::Design), 1);
        assert_eq!(bundle.preferred_price.count(PriceTier::MoreThan20), 1);
    }

    #[test]
    fn multi_select_counts_each_tag_once_per_record() {
        let mut a = record(Some(Status::Student), None);
        a.desired_skills.extend([Skill::Programming, Skill::Design]);
        let mut b = record(Some(Status::Student), None);
        b.desired_skills.insert(Skill::Programming);
        let bundle = aggregate(&[a, b]);

        assert_eq!(bundle.desired_skills.count(Skill::Programming), 2);
        assert_eq!(bundle.desired_skills.count(Skill::Design), 1);
        assert_eq!(bundle.desired_skills.count(Skill::Other), 0);
        assert!((bundle.desired_skills.share(Skill::Design) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn cross_tab_counts_never_exceed_group_size() {
        let mut records = Vec::new();
        for (i, status) in [Status::Student, Status::Student, Status::Graduate]
            .into_iter()
            .enumerate()
        {
            let mut r = record(Some(status), None);
            r.desired_skills.insert(Skill::Programming);
            if i == 0 {
                r.desired_skills.insert(Skill::Marketing);
            }
            records.push(r);
        }
        let bundle = aggregate(&records);
        for slice in &bundle.skills_by_status.slices {
            for entry in &slice.table.entries {
                assert!(entry.count <= slice.group_size);
            }
        }
        let students = bundle.skills_by_status.slice(Status::Student).unwrap();
        assert_eq!(students.group_size, 2);
        assert_eq!(students.table.count(Skill::Programming), 2);
        assert!((students.table.share(Skill::Marketing) - 50.0).abs() < 1e-9);
        let employed = bundle.skills_by_status.slice(Status::Employed).unwrap();
        assert_eq!(employed.table.share(Skill::Programming), 0.0);
    }

    #[test]
    fn pricing_cross_tab_splits_by_status() {
        let bundle = aggregate(&three_records());
        let students = bundle.pricing_by_status.slice(Status::Student).unwrap();
        assert_eq!(students.table.count(PriceTier::Free), 1);
        assert_eq!(students.table.count(PriceTier::From10To20), 1);
        let employed = bundle.pricing_by_status.slice(Status::Employed).unwrap();
        assert_eq!(employed.table.count(PriceTier::Free), 1);
        assert!((employed.table.share(PriceTier::Free) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn certification_average_guards_empty_groups() {
        let mut a = record(Some(Status::Student), None);
        a.certification_importance = Some(ImportanceRating::Five);
        let mut b = record(Some(Status::Student), None);
        b.certification_importance = Some(ImportanceRating::Two);
        let c = record(Some(Status::Employed), None);
        let averages = certification_average_by_status(&[a, b, c]);

        assert_eq!(averages[0].status, Status::Student);
        assert_eq!(averages[0].average, Some(3.5));
        let employed = averages.iter().find(|a| a.status == Status::Employed).unwrap();
        assert_eq!(employed.group_size, 1);
        assert_eq!(employed.average, None);
        let graduate = averages.iter().find(|a| a.status == Status::Graduate).unwrap();
        assert_eq!(graduate.group_size, 0);
        assert_eq!(graduate.average, None);
    }

    #[test]
    fn average_divides_by_rated_members_only() {
        let mut rated = record(Some(Status::Freelancer), None);
        rated.certification_importance = Some(ImportanceRating::Four);
        let unrated = record(Some(Status::Freelancer), None);
        let averages = certification_average_by_status(&[rated, unrated]);

        let freelancer = averages
            .iter()
            .find(|a| a.status == Status::Freelancer)
            .unwrap();
        assert_eq!(freelancer.group_size, 2);
        assert_eq!(freelancer.answered, 1);
        assert_eq!(freelancer.average, Some(4.0));
    }

    #[test]
    fn governorate_distribution_is_sparse() {
        let mut a = blank_record();
        a.governorate = Some(Governorate::Erbil);
        let mut b = blank_record();
        b.governorate = Some(Governorate::Erbil);
        let mut c = blank_record();
        c.governorate = Some(Governorate::Baghdad);
        let bundle = aggregate(&[a, b, c, blank_record()]);

        assert_eq!(bundle.governorates.len(), 2);
        assert_eq!(bundle.governorates.get(&Governorate::Erbil), Some(&2));
        assert_eq!(bundle.governorates.get(&Governorate::Mosul), None);
        let table = bundle.governorate_table();
        let keys: Vec<&str> = table.entries.iter().map(|e| e.key).collect();
        assert_eq!(keys, vec!["baghdad", "erbil"]);
        assert!((table.entries[1].percent - 50.0).abs() < 1e-9);
    }
}
