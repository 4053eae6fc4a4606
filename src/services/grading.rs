// src/services/grading.rs

use crate::{
    models::result::{EvaluatedAnswer, SubmittedAnswer},
    services::ai::{ChatModel, ChatRequest},
};

/// Fixed feedback for correct answers. No upstream call is made for these.
pub const CORRECT_FEEDBACK: &str = "Correct! Well done.";

/// Generic remediation used when the upstream feedback call fails.
pub const FALLBACK_FEEDBACK: &str =
    "Your answer was incorrect. Review the correct answer and related material.";

/// Grades every submitted answer and attaches feedback.
///
/// Correctness is exact string equality of `selected` and `correct`, no
/// normalization. Each wrong answer gets its own upstream feedback call; a
/// failure there substitutes the generic fallback and must not affect the
/// grading of sibling answers. Returns the evaluated list and the number of
/// correct answers.
pub async fn evaluate_answers(
    model: &dyn ChatModel,
    answers: &[SubmittedAnswer],
) -> (Vec<EvaluatedAnswer>, usize) {
    let mut evaluated = Vec::with_capacity(answers.len());
    let mut correct_count = 0;

    for answer in answers {
        let is_correct = answer.selected == answer.correct;
        if is_correct {
            correct_count += 1;
        }

        let feedback = if is_correct {
            CORRECT_FEEDBACK.to_string()
        } else {
            generate_feedback(model, answer).await
        };

        evaluated.push(EvaluatedAnswer {
            question: answer.question.clone(),
            selected: answer.selected.clone(),
            correct: answer.correct.clone(),
            is_correct,
            feedback,
        });
    }

    (evaluated, correct_count)
}

/// Percentage score rounded to the nearest integer (ties to even, matching
/// the source system), defined as 0 for an empty submission.
pub fn score_percent(correct_count: usize, total_answered: usize) -> u32 {
    if total_answered == 0 {
        return 0;
    }
    ((correct_count as f64 / total_answered as f64) * 100.0).round_ties_even() as u32
}

async fn generate_feedback(model: &dyn ChatModel, answer: &SubmittedAnswer) -> String {
    let req = ChatRequest {
        system: "You are an educational assistant providing helpful feedback to students \
                 on their test answers."
            .to_string(),
        user: format!(
            "Question: {}\n\
             Student's answer: {}\n\
             Correct answer: {}\n\
             Provide a brief, helpful feedback (2-3 sentences) explaining why the student's \
             answer is incorrect and why the correct answer is better. Be encouraging and \
             educational.",
            answer.question, answer.selected, answer.correct
        ),
        temperature: 0.3,
        max_tokens: Some(100),
    };

    match model.complete(req).await {
        Ok(feedback) if !feedback.is_empty() => feedback,
        Ok(_) => FALLBACK_FEEDBACK.to_string(),
        Err(e) => {
            tracing::warn!("Feedback generation failed: {}", e);
            FALLBACK_FEEDBACK.to_string()
        }
    }
}
