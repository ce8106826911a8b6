//! Data models for the assessment analyzer.
//!
//! This module contains the core data structures used throughout
//! the application for representing responses, summaries, and reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A single candidate answer to one assessment question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRecord {
    /// Job title the assessment was taken for.
    pub job_title: String,
    /// Skill categories the question belongs to (may be empty).
    pub categories: Vec<String>,
    /// Skill tags on the question.
    pub skills: Vec<String>,
    /// The question text.
    pub content: String,
    /// Whether the candidate answered correctly.
    pub is_correct_answer: bool,
}

/// Skill name mapped to question texts, in input order.
pub type SkillQuestions = BTreeMap<String, Vec<String>>;

/// Per-skill grouping of correct and incorrect questions, plus the
/// distinct titles, categories and skills seen in the input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SkillSummary {
    /// Distinct job titles.
    pub job_titles: BTreeSet<String>,
    /// Distinct skill categories.
    pub categories: BTreeSet<String>,
    /// Distinct skills.
    pub skills: BTreeSet<String>,
    /// Questions answered correctly, keyed by skill.
    pub correct_responses: SkillQuestions,
    /// Questions answered incorrectly, keyed by skill.
    pub incorrect_responses: SkillQuestions,
}

impl SkillSummary {
    /// Returns per-skill tallies for every skill in the skill set.
    pub fn tallies(&self) -> Vec<SkillTally> {
        self.skills
            .iter()
            .map(|skill| SkillTally {
                skill: skill.clone(),
                correct: self.correct_responses.get(skill).map_or(0, Vec::len),
                incorrect: self.incorrect_responses.get(skill).map_or(0, Vec::len),
            })
            .collect()
    }
}

/// Correct/incorrect counts for one skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillTally {
    pub skill: String,
    pub correct: usize,
    pub incorrect: usize,
}

impl SkillTally {
    /// Share of correct answers.
    ///
    /// `None` only for a hand-built summary whose skill set lists a skill with
    /// no answers; `aggregate_responses` never produces one.
    pub fn accuracy(&self) -> Option<f64> {
        let total = self.correct + self.incorrect;
        if total == 0 {
            None
        } else {
            Some(self.correct as f64 / total as f64)
        }
    }
}

/// Metadata about an analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Path of the response file that was analyzed.
    pub input_path: String,
    /// Date and time of the analysis.
    pub analysis_date: DateTime<Utc>,
    /// Host of the chat-completion endpoint.
    pub endpoint_host: String,
    /// Number of response records read.
    pub records: usize,
    /// Whether the prompt was supplied from a file instead of generated.
    pub custom_prompt: bool,
}

/// The complete analysis report, written when JSON output is selected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Metadata about the run.
    pub metadata: ReportMetadata,
    /// Distinct job titles.
    pub job_titles: Vec<String>,
    /// Distinct skill categories.
    pub categories: Vec<String>,
    /// Per-skill answer counts.
    pub skills: Vec<SkillTally>,
    /// Free-text strengths/gaps summary returned by the model.
    pub analysis: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_uses_camel_case_keys() {
        let json = r#"{
            "jobTitle": "Engineer",
            "categories": ["Backend"],
            "skills": ["SQL"],
            "content": "Q1",
            "isCorrectAnswer": true
        }"#;

        let record: ResponseRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.job_title, "Engineer");
        assert_eq!(record.skills, vec!["SQL"]);
        assert!(record.is_correct_answer);
    }

    #[test]
    fn test_tallies_cover_every_skill() {
        let mut summary = SkillSummary::default();
        summary.skills.insert("SQL".to_string());
        summary.skills.insert("Go".to_string());
        summary
            .correct_responses
            .insert("SQL".to_string(), vec!["Q1".to_string(), "Q2".to_string()]);
        summary
            .incorrect_responses
            .insert("SQL".to_string(), vec!["Q3".to_string()]);

        let tallies = summary.tallies();
        assert_eq!(tallies.len(), 2);
        assert_eq!(tallies[0].skill, "Go");
        assert_eq!(tallies[0].accuracy(), None);
        assert_eq!(tallies[1].correct, 2);
        assert_eq!(tallies[1].incorrect, 1);
    }

    #[test]
    fn test_accuracy() {
        let tally = SkillTally {
            skill: "SQL".to_string(),
            correct: 3,
            incorrect: 1,
        };
        assert_eq!(tally.accuracy(), Some(0.75));
    }
}
