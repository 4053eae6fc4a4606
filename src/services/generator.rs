// src/services/generator.rs

use std::sync::LazyLock;

use rand::seq::SliceRandom;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    models::test::Question,
    services::ai::{ChatModel, ChatRequest},
};

/// Character budget for the source text sent upstream.
const MAX_SOURCE_CHARS: usize = 16_000;

/// Matches the first array-of-objects block in a chatty model reply.
static JSON_ARRAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[\s*\{.*\}\s*\]").expect("valid regex"));

/// The shape the prompt asks the model to emit.
#[derive(Debug, Deserialize)]
struct RawMcq {
    #[serde(default)]
    question: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    correct_answer: String,
}

/// A named random subset of a question pool.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSet {
    pub name: String,
    pub questions: Vec<Question>,
}

/// Generates multiple-choice questions from extracted document text.
///
/// One upstream call, no retry. Any failure on the way - network, non-2xx,
/// unparseable reply, no usable items - degrades to the fixed fallback set.
/// Callers treat a fallback result as a degraded outcome, not an error.
pub async fn generate_mcqs(
    model: &dyn ChatModel,
    source_text: &str,
    desired_count: u32,
    difficulty: &str,
    options_per_question: u32,
) -> Vec<Question> {
    let truncated = truncate_chars(source_text, MAX_SOURCE_CHARS);

    let req = ChatRequest {
        system: "You are an expert in generating high-quality multiple choice questions \
                 with plausible distractors. You always format your responses as properly \
                 structured JSON."
            .to_string(),
        user: build_prompt(truncated, desired_count, difficulty, options_per_question),
        temperature: 0.2,
        max_tokens: None,
    };

    match model.complete(req).await {
        Ok(reply) => parse_questions(&reply).unwrap_or_else(|| {
            tracing::warn!("Could not parse questions from model reply, using fallback set");
            fallback_questions()
        }),
        Err(e) => {
            tracing::warn!("Question generation failed: {}, using fallback set", e);
            fallback_questions()
        }
    }
}

fn build_prompt(text: &str, count: u32, difficulty: &str, options: u32) -> String {
    format!(
        "Based on the following text, generate {count} multiple-choice questions with \
         {options} options each.\n\
         The complexity level should be {difficulty}.\n\
         For each question:\n\
         1. Create a clear, concise question\n\
         2. Provide {options} options (including one correct answer and {distractors} distractors)\n\
         3. Mark the correct answer\n\
         4. Ensure distractors are plausible but clearly incorrect\n\
         5. Make sure options don't overlap in meaning\n\n\
         TEXT:\n{text}\n\n\
         FORMAT YOUR RESPONSE AS A JSON ARRAY of objects with the following structure:\n\n\
         {{\n\
             \"question\": \"Question text here?\",\n\
             \"options\": [\"Option A\", \"Option B\", \"Option C\", \"Option D\"],\n\
             \"correct_answer\": \"Option A\"\n\
         }}\n\n\
         Only provide the JSON array, no additional text.",
        count = count,
        options = options,
        distractors = options.saturating_sub(1),
        difficulty = difficulty,
        text = text,
    )
}

/// Pulls the first JSON array out of the raw reply and converts each item
/// into a `Question` with an explicit answer index.
///
/// Items whose `correct_answer` does not appear among their options are
/// dropped. Returns `None` when nothing usable survives.
fn parse_questions(reply: &str) -> Option<Vec<Question>> {
    let block = JSON_ARRAY.find(reply)?.as_str();
    let raw: Vec<RawMcq> = serde_json::from_str(block).ok()?;

    let questions: Vec<Question> = raw
        .into_iter()
        .filter_map(|mcq| {
            let correct_index = mcq
                .options
                .iter()
                .position(|option| *option == mcq.correct_answer)?;
            if mcq.question.is_empty() {
                return None;
            }
            Some(Question {
                question: mcq.question,
                options: mcq.options,
                correct_index,
            })
        })
        .collect();

    if questions.is_empty() {
        None
    } else {
        Some(questions)
    }
}

/// Fixed substitute payload used whenever generation or parsing fails.
pub fn fallback_questions() -> Vec<Question> {
    vec![
        Question {
            question: "What is the main topic discussed in the document?".to_string(),
            options: vec![
                "Option A".to_string(),
                "Option B".to_string(),
                "Option C".to_string(),
                "Option D".to_string(),
            ],
            correct_index: 0,
        },
        Question {
            question: "True or False: The document mentions important concepts.".to_string(),
            options: vec!["True".to_string(), "False".to_string()],
            correct_index: 0,
        },
    ]
}

/// Builds `num_sets` named sets, each a fresh shuffle of the pool trimmed to
/// `min(total, max(3, total / 2))` questions. An empty pool yields no sets.
pub fn build_question_sets(mcqs: &[Question], num_sets: u32) -> Vec<QuestionSet> {
    if mcqs.is_empty() {
        return Vec::new();
    }

    let total = mcqs.len();
    let per_set = total.min(std::cmp::max(3, total / 2));
    let mut rng = rand::thread_rng();

    (1..=num_sets)
        .map(|i| {
            let mut pool = mcqs.to_vec();
            pool.shuffle(&mut rng);
            pool.truncate(per_set);
            QuestionSet {
                name: format!("Set {}", i),
                questions: pool,
            }
        })
        .collect()
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}
