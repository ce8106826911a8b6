//! Response aggregation by skill.
//!
//! This module groups question text by skill, separately for correct
//! and incorrect answers, and collects the distinct titles, categories
//! and skills seen in the input.

use crate::models::{ResponseRecord, SkillSummary};

/// Aggregate response records into a per-skill summary.
///
/// Question order within each skill follows input order and repeated
/// questions are kept.
pub fn aggregate_responses(records: &[ResponseRecord]) -> SkillSummary {
    let mut summary = SkillSummary::default();

    for record in records {
        summary.job_titles.insert(record.job_title.clone());
        summary
            .categories
            .extend(record.categories.iter().cloned());
        summary.skills.extend(record.skills.iter().cloned());

        let target = if record.is_correct_answer {
            &mut summary.correct_responses
        } else {
            &mut summary.incorrect_responses
        };

        for skill in &record.skills {
            target
                .entry(skill.clone())
                .or_default()
                .push(record.content.clone());
        }
    }

    summary
}
