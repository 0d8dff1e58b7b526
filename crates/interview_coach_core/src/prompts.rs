//! crates/interview_coach_core/src/prompts.rs
//!
//! Prompt templates for the four completion tasks. Every builder is a pure
//! template substitution; sending the request is the `CompletionService`'s job.

const JOB_TITLE_TEMPLATE: &str = r#"You are a professional career analyst.

Given the following resume, guess the most likely job title this candidate is applying for.
Be specific but realistic. Return only the job title.

--- Resume ---
{resume_text}"#;

const QUESTION_TEMPLATE: &str = r#"You are a professional recruiter conducting a mock interview for the position of {job_title}.

Use the candidate's resume to ask only one specific, realistic, and job-relevant interview question.

Do NOT list multiple questions or give examples. Only return a single interview question.

Avoid repeating these previous questions:
{previous_questions}

--- Resume ---
{resume_text}"#;

const FEEDBACK_TEMPLATE: &str = r#"You are an expert interview coach.

The candidate is interviewing for the role of {job_title}.

The candidate was asked these question(s):
{questions}

They answered with:
"{answer}"

Strictly analyze their response.

If the answer is irrelevant, empty, nonsensical, or clearly a placeholder like "1234", "asdf", or "n/a", explicitly state this and give direct feedback on why that is unacceptable in a professional interview.

If the answer was valid, give constructive feedback on how to improve it further.

Focus only on the quality of their answer. Do not comment on their resume unless it directly relates to the quality of the answer.

Return your feedback using clear bullet points.

--- Resume (for reference only) ---
{resume_text}"#;

const SCORE_TEMPLATE: &str = r#"You are a professional recruiter evaluating a candidate's interview performance for the role of {job_title}.

Here are the interview questions asked:
{questions}

Here is the candidate's full response, including both the initial and follow-up answers:
{answer}

Here is their resume:
{resume_text}

First, if the answer is empty, irrelevant, or contains placeholders like "1234", "asdf", or "n/a", assign a very low score between 1-3 and explain why.

Otherwise, score the response from 1 (very poor) to 10 (excellent) based on the following categories:

1. Clarity
2. Professionalism
3. Relevance to the question
4. Technical/Role-Specific Accuracy
5. Problem-Solving & Critical Thinking
6. Experience & Resume Alignment

Format your response like this:

Score: X
Breakdown:
- Clarity: ...
- Professionalism: ...
- Relevance: ...
- Technical/Role-Specific Accuracy: ...
- Problem-Solving & Critical Thinking: ...
- Experience & Resume Alignment: ..."#;

pub const JOB_TITLE_TEMPERATURE: f32 = 0.5;
pub const QUESTION_TEMPERATURE: f32 = 0.7;
pub const FEEDBACK_TEMPERATURE: f32 = 0.7;
pub const SCORE_TEMPERATURE: f32 = 0.7;

/// Which of the four prompt shapes a request carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptTask {
    JobTitle,
    Question,
    Feedback,
    Score,
}

/// A fully rendered prompt plus the sampling temperature to send it with.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub task: PromptTask,
    pub prompt: String,
    pub temperature: f32,
}

// The resume is substituted last so text inside it is never re-expanded.
pub fn guess_job_title(resume_text: &str) -> CompletionRequest {
    CompletionRequest {
        task: PromptTask::JobTitle,
        prompt: JOB_TITLE_TEMPLATE.replace("{resume_text}", resume_text),
        temperature: JOB_TITLE_TEMPERATURE,
    }
}

pub fn ask_interview_question(
    resume_text: &str,
    job_title: &str,
    previous_questions: &[String],
) -> CompletionRequest {
    let prompt = QUESTION_TEMPLATE
        .replace("{job_title}", job_title)
        .replace("{previous_questions}", &previous_questions.join("\n"))
        .replace("{resume_text}", resume_text);

    CompletionRequest {
        task: PromptTask::Question,
        prompt,
        temperature: QUESTION_TEMPERATURE,
    }
}

pub fn get_feedback(
    questions: &str,
    answer: &str,
    resume_text: &str,
    job_title: &str,
) -> CompletionRequest {
    let prompt = FEEDBACK_TEMPLATE
        .replace("{job_title}", job_title)
        .replace("{questions}", questions)
        .replace("{answer}", answer)
        .replace("{resume_text}", resume_text);

    CompletionRequest {
        task: PromptTask::Feedback,
        prompt,
        temperature: FEEDBACK_TEMPERATURE,
    }
}

pub fn score_answer(
    questions: &str,
    answer: &str,
    resume_text: &str,
    job_title: &str,
) -> CompletionRequest {
    let prompt = SCORE_TEMPLATE
        .replace("{job_title}", job_title)
        .replace("{questions}", questions)
        .replace("{answer}", answer)
        .replace("{resume_text}", resume_text);

    CompletionRequest {
        task: PromptTask::Score,
        prompt,
        temperature: SCORE_TEMPERATURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_title_prompt_embeds_resume() {
        let request = guess_job_title("Ten years of Rust.");
        assert_eq!(request.task, PromptTask::JobTitle);
        assert_eq!(request.temperature, 0.5);
        assert!(request.prompt.contains("Return only the job title"));
        assert!(request.prompt.ends_with("Ten years of Rust."));
    }

    #[test]
    fn test_question_prompt_lists_previous_questions_one_per_line() {
        let previous = vec![
            "Tell me about yourself.".to_string(),
            "Why Rust?".to_string(),
        ];
        let request = ask_interview_question("resume", "Backend Engineer", &previous);

        assert_eq!(request.task, PromptTask::Question);
        assert_eq!(request.temperature, 0.7);
        assert!(request.prompt.contains("position of Backend Engineer"));
        let history = "Tell me about yourself.\nWhy Rust?\n";
        let expected = format!("Avoid repeating these previous questions:\n{history}");
        assert!(request.prompt.contains(&expected));
        assert!(request.prompt.contains("Only return a single interview question"));
    }

    #[test]
    fn test_question_prompt_with_no_history() {
        let request = ask_interview_question("resume", "Chef", &[]);
        assert!(request
            .prompt
            .contains("Avoid repeating these previous questions:\n\n\n--- Resume ---"));
    }

    #[test]
    fn test_feedback_prompt_calls_out_placeholder_answers() {
        let request = get_feedback("Q1\nQ2", "asdf", "resume", "Nurse");
        assert_eq!(request.task, PromptTask::Feedback);
        assert!(request.prompt.contains("They answered with:\n\"asdf\""));
        assert!(request.prompt.contains("\"1234\", \"asdf\", or \"n/a\""));
        assert!(request.prompt.contains("bullet points"));
        assert!(request.prompt.contains("Q1\nQ2"));
    }

    #[test]
    fn test_score_prompt_names_all_six_categories() {
        let request = score_answer("Q1", "answer", "resume", "Nurse");
        assert_eq!(request.task, PromptTask::Score);
        for category in [
            "Clarity",
            "Professionalism",
            "Relevance",
            "Technical/Role-Specific Accuracy",
            "Problem-Solving & Critical Thinking",
            "Experience & Resume Alignment",
        ] {
            assert!(request.prompt.contains(category), "missing {category}");
        }
        assert!(request.prompt.contains("Score: X\nBreakdown:"));
        assert!(request.prompt.contains("between 1-3"));
    }

    #[test]
    fn test_placeholders_inside_resume_are_left_alone() {
        let request = score_answer("Q1", "answer", "I wrote {job_title} templates", "Nurse");
        assert!(request.prompt.contains("I wrote {job_title} templates"));
    }
}
