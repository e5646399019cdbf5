use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::aggregate::{AggregateBundle, CrossTab, Question};
use crate::labels::{self, Field, Language};
use crate::models::{Status, SurveyOption, SurveyRecord};
use crate::recommend::RecommendationSummary;
use crate::series::{round1, to_series};

pub fn progress_line(total: usize, target: usize, lang: Language) -> String {
    let share = if target == 0 {
        0.0
    } else {
        (100.0 * total as f64 / target as f64).min(100.0)
    };
    match lang {
        Language::Arabic => format!("عدد المشاركين: {total} من {target} ({share:.0}%)"),
        Language::English => format!("Participants: {total} of {target} ({share:.0}%)"),
    }
}

fn question_title(question: Question, lang: Language) -> &'static str {
    labels::label(Field::Question, question.key(), lang)
}

fn write_table(output: &mut String, bundle: &AggregateBundle, question: Question, lang: Language) {
    let table = bundle.table(question);
    let _ = writeln!(output, "### {}", question_title(question, lang));

    if table.entries.is_empty() {
        let _ = writeln!(
            output,
            "{}",
            lang.pick("لا توجد بيانات.", "No answers recorded.")
        );
        let _ = writeln!(output);
        return;
    }

    let _ = writeln!(
        output,
        "| {} | {} | % |",
        lang.pick("الخيار", "Option"),
        lang.pick("العدد", "Count")
    );
    let _ = writeln!(output, "|---|---:|---:|");
    for point in to_series(&table, lang) {
        let _ = writeln!(
            output,
            "| {} | {} | {:.1} |",
            point.label, point.value, point.percent
        );
    }
    let _ = writeln!(output);
}

fn write_cross_tab(output: &mut String, title: &str, cross_tab: &CrossTab, lang: Language) {
    let _ = writeln!(output, "### {title}");

    let mut header = format!("| {} |", lang.pick("الخيار", "Option"));
    let mut rule = String::from("|---|");
    for slice in &cross_tab.slices {
        let _ = write!(header, " {} ({}) |", slice.status.label(lang), slice.group_size);
        rule.push_str("---:|");
    }
    let _ = writeln!(output, "{header}");
    let _ = writeln!(output, "{rule}");

    let Some(first) = cross_tab.slices.first() else {
        let _ = writeln!(output);
        return;
    };
    for (row, entry) in first.table.entries.iter().enumerate() {
        let mut line = format!("| {} |", labels::label(cross_tab.field, entry.key, lang));
        for slice in &cross_tab.slices {
            let cell = &slice.table.entries[row];
            if slice.group_size == 0 {
                let _ = write!(line, " 0 ({}) |", labels::not_available(lang));
            } else {
                let _ = write!(line, " {} ({:.0}%) |", cell.count, cell.percent);
            }
        }
        let _ = writeln!(output, "{line}");
    }
    let _ = writeln!(output);
}

pub fn build_report(
    bundle: &AggregateBundle,
    summary: Option<&RecommendationSummary>,
    target_participants: usize,
    generated_at: DateTime<Utc>,
    lang: Language,
) -> String {
    let mut output = String::new();

    let _ = writeln!(
        output,
        "# {}",
        lang.pick("تقرير استبيان SkillBridge", "SkillBridge Survey Report")
    );
    let _ = writeln!(
        output,
        "{} {}",
        lang.pick("تاريخ الإنشاء:", "Generated at"),
        generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "{}", progress_line(bundle.total, target_participants, lang));
    let _ = writeln!(output);

    if bundle.total == 0 {
        let _ = writeln!(
            output,
            "{}",
            lang.pick("لا توجد ردود مسجلة بعد.", "No survey responses recorded yet.")
        );
        return output;
    }

    let _ = writeln!(output, "## {}", lang.pick("الرسوم البيانية", "Charts"));
    let _ = writeln!(output);
    for question in Question::ALL {
        write_table(&mut output, bundle, *question, lang);
    }

    let _ = writeln!(output, "## {}", lang.pick("تحليل السوق", "Market Analysis"));
    let _ = writeln!(output);
    write_cross_tab(
        &mut output,
        lang.pick("المهارات المطلوبة حسب التصنيف", "Desired skills by status"),
        &bundle.skills_by_status,
        lang,
    );
    write_cross_tab(
        &mut output,
        lang.pick("استعداد الدفع حسب التصنيف", "Willingness to pay by status"),
        &bundle.pricing_by_status,
        lang,
    );
    write_cross_tab(
        &mut output,
        lang.pick("أهمية فرص العمل حسب التصنيف", "Job opportunity importance by status"),
        &bundle.job_by_status,
        lang,
    );

    let _ = writeln!(
        output,
        "### {}",
        lang.pick("متوسط أهمية الشهادات (من 5)", "Average certification importance (out of 5)")
    );
    for average in &bundle.certification_by_status {
        let value = match average.average {
            Some(value) => format!(
                "{:.1} ({}/{})",
                round1(value),
                average.answered,
                average.group_size
            ),
            None => labels::not_available(lang).to_string(),
        };
        let _ = writeln!(output, "- {}: {}", average.status.label(lang), value);
    }
    let _ = writeln!(output);

    let _ = writeln!(
        output,
        "## {}",
        lang.pick("التوصيات الاستراتيجية", "Strategic Recommendations")
    );
    match summary {
        Some(summary) => {
            for sentence in summary.sentences(lang) {
                let _ = writeln!(output, "- {sentence}");
            }
        }
        None => {
            let _ = writeln!(
                output,
                "{}",
                lang.pick("لا توجد توصيات.", "No recommendations available.")
            );
        }
    }

    output
}

fn option_label<T: SurveyOption>(value: Option<T>, lang: Language) -> &'static str {
    value
        .map(|option| option.label(lang))
        .unwrap_or_else(|| labels::unspecified(lang))
}

/// One line per registrant, in stored order.
pub fn participant_lines(records: &[SurveyRecord], lang: Language) -> Vec<String> {
    let separator = lang.pick("، ", ", ");
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let skills = if record.desired_skills.is_empty() {
                labels::unspecified(lang).to_string()
            } else {
                record
                    .desired_skills
                    .iter()
                    .map(|skill| skill.label(lang))
                    .collect::<Vec<_>>()
                    .join(separator)
            };
            format!(
                "{}. {} <{}> | {} | {} | {}",
                index + 1,
                record.full_name.as_deref().unwrap_or(labels::unspecified(lang)),
                record.email.as_deref().unwrap_or(labels::unspecified(lang)),
                option_label(record.governorate, lang),
                option_label::<Status>(record.current_status, lang),
                skills
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::models::{blank_record, Governorate, PriceTier, Skill};
    use crate::recommend::recommend;

    fn sample() -> Vec<SurveyRecord> {
        let mut a = blank_record();
        a.full_name = Some("Zainab Karim".to_string());
        a.email = Some("zainab@example.com".to_string());
        a.governorate = Some(Governorate::Baghdad);
        a.current_status = Some(Status::Student);
        a.preferred_price = Some(PriceTier::Free);
        a.desired_skills.extend([Skill::Programming, Skill::Design]);
        a.certification_importance = Some(crate::models::ImportanceRating::Four);
        let mut b = blank_record();
        b.current_status = Some(Status::Employed);
        b.preferred_price = Some(PriceTier::From10To20);
        vec![a, b]
    }

    #[test]
    fn report_covers_every_section() {
        let records = sample();
        let bundle = aggregate(&records);
        let summary = recommend(&bundle);
        let report = build_report(&bundle, summary.as_ref(), 150, Utc::now(), Language::English);

        assert!(report.starts_with("# SkillBridge Survey Report"));
        assert!(report.contains("Participants: 2 of 150 (1%)"));
        assert!(report.contains("### Current status"));
        assert!(report.contains("| Student | 1 | 50.0 |"));
        assert!(report.contains("### Desired skills by status"));
        assert!(report.contains("| Programming | 1 (100%) | 0 (n/a) |"));
        assert!(report.contains("- Student: 4.0 (1/1)"));
        assert!(report.contains("- Unemployed: n/a"));
        assert!(report.contains("## Strategic Recommendations"));
        assert!(report.contains("freemium"));
    }

    #[test]
    fn empty_report_has_placeholder() {
        let bundle = aggregate(&[]);
        let report = build_report(&bundle, None, 150, Utc::now(), Language::Arabic);
        assert!(report.contains("لا توجد ردود مسجلة بعد."));
        assert!(!report.contains("##"));
    }

    #[test]
    fn participants_use_unspecified_for_missing_values() {
        let lines = participant_lines(&sample(), Language::English);
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "1. Zainab Karim <zainab@example.com> | Baghdad | Student | Programming, Design"
        );
        assert_eq!(
            lines[1],
            "2. Unspecified <Unspecified> | Unspecified | Employed | Unspecified"
        );
    }

    #[test]
    fn progress_is_capped() {
        assert_eq!(progress_line(300, 150, Language::English), "Participants: 300 of 150 (100%)");
        assert_eq!(progress_line(3, 0, Language::English), "Participants: 3 of 0 (0%)");
    }
}
