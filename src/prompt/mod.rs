//! Prompt construction for the strengths/gaps analysis.
//!
//! The rendered prompt is only a suggested default: callers may edit it
//! (see `--save-prompt` / `--prompt-file`) before it is submitted.

use crate::models::{SkillQuestions, SkillSummary};
use std::collections::BTreeSet;

/// System role message sent with every analysis request.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are an AI assistant analyzing a candidate's skill assessment.";

const LEAD_IN: &str =
    "Based on the candidate's responses, analyze their overall strengths and gaps.";

const INSTRUCTIONS: &str = r#"### **Instructions for AI:**
- Summarize the candidate’s **Strengths**: areas where they performed well.
- Summarize the candidate’s **Gaps**: areas where improvement is needed.
- Focus on skill-level insights, **do NOT** generate a separate strength/gap for each individual question.
"#;

const EXPECTED_OUTPUT: &str = r#"### **Expected Output Format (markdown):**
**Strengths:**
- Well-versed in [Skill A]
- Strong understanding of [Skill B]
- Proficient in applying [Skill C]

**Gaps:**
- Needs improvement in [Skill X]
- Struggles with [Skill Y]
- Requires more practice in [Skill Z]
"#;

/// Render the analysis prompt for an aggregated summary.
pub fn build_prompt(summary: &SkillSummary) -> String {
    let mut prompt = String::new();

    prompt.push_str(LEAD_IN);
    prompt.push_str("\n\n");

    prompt.push_str(&format!("**Job Titles:** {}  \n", join_set(&summary.job_titles)));
    prompt.push_str(&format!(
        "**Skill Categories:** {}  \n",
        join_set(&summary.categories)
    ));
    prompt.push_str(&format!("**Skills Assessed:** {}\n\n", join_set(&summary.skills)));

    prompt.push_str(INSTRUCTIONS);
    prompt.push('\n');

    prompt.push_str("### **Questions Candidate Answered Correctly:**  \n");
    prompt.push_str(&render_questions(&summary.correct_responses));
    prompt.push_str("\n\n");

    prompt.push_str("### **Questions Candidate Answered Incorrectly:**  \n");
    prompt.push_str(&render_questions(&summary.incorrect_responses));
    prompt.push_str("\n\n");

    prompt.push_str(EXPECTED_OUTPUT);

    prompt
}

fn join_set(values: &BTreeSet<String>) -> String {
    values.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// Serialize a skill-to-questions mapping as indented JSON.
fn render_questions(questions: &SkillQuestions) -> String {
    serde_json::to_string_pretty(questions).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::aggregate_responses;
    use crate::models::ResponseRecord;

    fn record(
        title: &str,
        category: &str,
        skill: &str,
        content: &str,
        correct: bool,
    ) -> ResponseRecord {
        ResponseRecord {
            job_title: title.to_string(),
            categories: vec![category.to_string()],
            skills: vec![skill.to_string()],
            content: content.to_string(),
            is_correct_answer: correct,
        }
    }

    fn sample_summary() -> SkillSummary {
        aggregate_responses(&[
            record("Engineer", "Backend", "SQL", "Q1", true),
            record("Engineer", "Backend", "SQL", "Q2", false),
            record("Analyst", "Data", "Excel", "Q3", true),
        ])
    }

    #[test]
    fn test_sections_in_order() {
        let prompt = build_prompt(&sample_summary());

        let markers = [
            "Based on the candidate's responses",
            "**Job Titles:**",
            "**Skill Categories:**",
            "**Skills Assessed:**",
            "### **Instructions for AI:**",
            "### **Questions Candidate Answered Correctly:**",
            "### **Questions Candidate Answered Incorrectly:**",
            "### **Expected Output Format (markdown):**",
        ];

        let positions: Vec<usize> = markers
            .iter()
            .map(|m| prompt.find(m).unwrap_or_else(|| panic!("missing {}", m)))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_sets_are_sorted_and_comma_joined() {
        let prompt = build_prompt(&sample_summary());

        assert!(prompt.contains("**Job Titles:** Analyst, Engineer  \n"));
        assert!(prompt.contains("**Skill Categories:** Backend, Data  \n"));
        assert!(prompt.contains("**Skills Assessed:** Excel, SQL\n"));
    }

    #[test]
    fn test_groupings_are_nested_json() {
        let prompt = build_prompt(&sample_summary());

        let correct = "{\n  \"Excel\": [\n    \"Q3\"\n  ],\n  \"SQL\": [\n    \"Q1\"\n  ]\n}";
        let incorrect = "{\n  \"SQL\": [\n    \"Q2\"\n  ]\n}";
        assert!(prompt.contains(correct), "prompt was:\n{}", prompt);
        assert!(prompt.contains(incorrect), "prompt was:\n{}", prompt);
    }

    #[test]
    fn test_empty_grouping_renders_empty_object() {
        let summary = aggregate_responses(&[record("Engineer", "Backend", "SQL", "Q1", true)]);

        let prompt = build_prompt(&summary);

        assert!(prompt.contains("Answered Incorrectly:**  \n{}\n"));
    }

    #[test]
    fn test_non_ascii_is_not_escaped() {
        let summary = aggregate_responses(&[record(
            "Ingénieur",
            "Données",
            "SQL",
            "Qu’est-ce?",
            true,
        )]);

        let prompt = build_prompt(&summary);

        assert!(prompt.contains("Ingénieur"));
        assert!(prompt.contains("\"Qu’est-ce?\""));
    }
}
