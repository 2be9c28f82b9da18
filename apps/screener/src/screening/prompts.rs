// LLM prompt templates for the screening pipeline.
// `{resume_text}`, `{job_description}` and `{n}` are filled in a single pass.

use crate::models::resume::truncate_chars;

/// Characters of resume and job description included in each prompt.
pub const PROMPT_EXCERPT_CHARS: usize = 1200;

pub const SUMMARY_MAX_TOKENS: u32 = 250;
pub const QUESTIONS_MAX_TOKENS: u32 = 400;
pub const DEFAULT_QUESTION_COUNT: usize = 5;

pub const SUMMARY_PROMPT_TEMPLATE: &str = "\
You are a concise recruiter assistant. Given the resume excerpt and the job description, produce:
1) a 2-3 sentence summary of the candidate highlighting top skills and fit.
2) a fit score out of 100 with a one-line rationale.

Resume excerpt:
{resume_text}

Job description:
{job_description}

Return the summary and score in plain text.";

pub const QUESTIONS_PROMPT_TEMPLATE: &str = "\
Given the resume excerpt and job description, generate {n} targeted interview questions to evaluate the candidate for the role. \
For each question add a short note 'What to listen for'.

Resume excerpt:
{resume_text}

Job description:
{job_description}

Return as numbered items with a short 'what to listen for' note.";

pub fn build_summary_prompt(resume_text: &str, job_description: &str) -> String {
    fill_template(
        SUMMARY_PROMPT_TEMPLATE,
        &[
            ("{resume_text}", truncate_chars(resume_text, PROMPT_EXCERPT_CHARS)),
            (
                "{job_description}",
                truncate_chars(job_description, PROMPT_EXCERPT_CHARS),
            ),
        ],
    )
}

pub fn build_questions_prompt(resume_text: &str, job_description: &str, n: usize) -> String {
    let n = n.to_string();
    fill_template(
        QUESTIONS_PROMPT_TEMPLATE,
        &[
            ("{n}", n.as_str()),
            ("{resume_text}", truncate_chars(resume_text, PROMPT_EXCERPT_CHARS)),
            (
                "{job_description}",
                truncate_chars(job_description, PROMPT_EXCERPT_CHARS),
            ),
        ],
    )
}

/// Substitutes placeholders in one pass over the template; inserted values are
/// never scanned again.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match values.iter().find(|(key, _)| tail.starts_with(key)) {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}
