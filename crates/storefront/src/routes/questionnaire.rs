//! Skin questionnaire route handlers.
//!
//! The questionnaire is 12 fixed questions. Submission sends the answers
//! through the AI relay in analysis mode; the returned one-line summary is
//! cleaned into a tag list and stored on the user row.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use tracing::instrument;

use crate::db::UserRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireUser;
use crate::models::StoredSkinProfile;
use crate::services::skin_ai::SkinAiService;
use crate::state::AppState;

/// One questionnaire question.
pub struct Question {
    pub key: &'static str,
    pub label: &'static str,
    /// Multi-select questions render as checkboxes.
    pub multiple: bool,
    pub options: &'static [&'static str],
}

/// The fixed question list. Q1-Q11 are single-choice and feed the scoring
/// prompt; Q12 is a multi-select concern picker.
pub const QUESTIONS: &[Question] = &[
    // A. Sebum level
    Question {
        key: "q1_sebum_after_wash",
        label: "How does your skin feel 2-3 hours after washing your face, without any skincare?",
        multiple: false,
        options: &[
            "Very dry or tight",
            "Comfortable and not oily",
            "Slightly oily around the nose and forehead",
            "Shiny and oily across most of the face",
        ],
    },
    Question {
        key: "q2_sebum_morning",
        label: "When you wake up, your skin usually looks...",
        multiple: false,
        options: &[
            "Dull, dry, or flaky",
            "Fresh and normal",
            "Oily only in the T-zone (forehead, nose, chin)",
            "Very oily and shiny",
        ],
    },
    Question {
        key: "q3_sebum_blot",
        label: "How often do you feel the need to blot oil from your face?",
        multiple: false,
        options: &[
            "Almost never",
            "Occasionally",
            "Often, in certain areas only",
            "Very often, across the whole face",
        ],
    },
    // B. Hydration & barrier
    Question {
        key: "q4_hydration_wash",
        label: "After washing your face, your skin feels...",
        multiple: false,
        options: &[
            "Tight and uncomfortable",
            "Slightly dry but recovers quickly",
            "Comfortable",
            "Oily",
        ],
    },
    Question {
        key: "q5_hydration_look",
        label: "Does your skin look...",
        multiple: false,
        options: &[
            "Flaky or peeling easily",
            "Dull and lacking freshness",
            "Soft and smooth",
            "Oily yet still feeling dry",
        ],
    },
    // C. Sensitivity
    Question {
        key: "q6_sensitivity_product",
        label: "When trying a new product, your skin usually...",
        multiple: false,
        options: &[
            "Often stings, itches, or turns red",
            "Sometimes feels uncomfortable",
            "Almost never reacts",
            "Never has a problem",
        ],
    },
    Question {
        key: "q7_sensitivity_redness",
        label: "Does your skin often look red for no clear reason?",
        multiple: false,
        options: &["Often", "Sometimes", "Rarely", "Never"],
    },
    // D. Acne & pores
    Question {
        key: "q8_acne_frequency",
        label: "How often do you get breakouts or comedones?",
        multiple: false,
        options: &[
            "Almost never",
            "Occasionally, with hormones or stress",
            "Fairly often in certain areas",
            "Very often in many areas",
        ],
    },
    Question {
        key: "q9_acne_pores",
        label: "The pores on your face look...",
        multiple: false,
        options: &[
            "Barely visible",
            "Normal",
            "Large in certain areas",
            "Large across most of the face",
        ],
    },
    // E. Pigmentation
    Question {
        key: "q10_pigmentation_scars",
        label: "After a breakout heals, it usually...",
        multiple: false,
        options: &[
            "Leaves no mark",
            "Leaves a mark that fades quickly",
            "Leaves a dark mark that lasts a long time",
            "Often turns into lasting dark spots",
        ],
    },
    // F. Aging
    Question {
        key: "q11_aging_signs",
        label: "Are fine lines or sagging starting to show?",
        multiple: false,
        options: &["Not at all", "A little", "Clearly visible", "Quite a lot"],
    },
    // G. Current concerns
    Question {
        key: "q12_skin_concerns",
        label: "Which skin concerns are you currently dealing with? (Pick any that apply)",
        multiple: true,
        options: &[
            "Acne or bumps",
            "Comedones (blackheads/whiteheads)",
            "Dark acne marks (PIH)",
            "Red acne marks (PIE)",
            "Dullness or uneven tone",
            "Redness or sensitive skin",
            "Fine lines or wrinkles",
            "Large pores",
        ],
    },
];

/// Questionnaire page template.
#[derive(Template, WebTemplate)]
#[template(path = "questionnaire/show.html")]
pub struct QuestionnaireTemplate {
    pub questions: &'static [Question],
    pub error: Option<String>,
}

/// Message query for redirect-back errors.
#[derive(Debug, serde::Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

/// Display the questionnaire.
#[instrument(skip(_current))]
pub async fn show(
    RequireUser(_current): RequireUser,
    axum::extract::Query(query): axum::extract::Query<MessageQuery>,
) -> QuestionnaireTemplate {
    QuestionnaireTemplate {
        questions: QUESTIONS,
        error: query.error,
    }
}

/// Handle a questionnaire submission.
///
/// The form posts one field per question key (multi-select keys repeat), so
/// the body deserializes as a raw pair list.
#[instrument(skip(state, current, form))]
pub async fn submit(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Form(form): Form<Vec<(String, String)>>,
) -> Result<Response> {
    let Some(groq) = state.groq() else {
        return Ok(Redirect::to("/questionnaire?error=analysis_unavailable").into_response());
    };

    let answers = collect_answers(&form);
    if answers.len() < QUESTIONS.len() {
        return Ok(Redirect::to("/questionnaire?error=incomplete").into_response());
    }

    // Pair each question label with the submitted answer for the prompt
    let labeled: Vec<(String, String)> = QUESTIONS
        .iter()
        .filter_map(|q| {
            answers
                .iter()
                .find(|(key, _)| key == q.key)
                .map(|(_, answer)| (q.label.to_string(), answer.clone()))
        })
        .collect();

    let service = SkinAiService::new(state.pool(), groq);
    let (summary, tags) = service.analyze_questionnaire(&labeled).await?;

    let stored = StoredSkinProfile {
        answers: answers.into_iter().collect(),
        summary,
        updated_at: Utc::now(),
    };
    let profile_json = serde_json::to_value(&stored)
        .map_err(|e| crate::error::AppError::Internal(e.to_string()))?;

    UserRepository::new(state.pool())
        .save_skin_profile(current.id, &profile_json, &tags)
        .await?;

    Ok(Redirect::to("/dashboard").into_response())
}

/// Collapse the raw form pairs: repeated keys (multi-select) join with
/// ", ", unknown keys are dropped, answers are length-capped.
fn collect_answers(form: &[(String, String)]) -> Vec<(String, String)> {
    const MAX_ANSWER_LENGTH: usize = 200;

    let mut answers: Vec<(String, String)> = Vec::new();

    for (key, value) in form {
        let value = value.trim();
        if value.is_empty() || value.len() > MAX_ANSWER_LENGTH {
            continue;
        }
        if !QUESTIONS.iter().any(|q| q.key == key) {
            continue;
        }

        match answers.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => {
                existing.push_str(", ");
                existing.push_str(value);
            }
            None => answers.push((key.clone(), value.to_string())),
        }
    }

    answers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_question_list_shape() {
        assert_eq!(QUESTIONS.len(), 12);
        assert_eq!(QUESTIONS.iter().filter(|q| q.multiple).count(), 1);
        // Scored questions all offer exactly four options
        for q in QUESTIONS.iter().filter(|q| !q.multiple) {
            assert_eq!(q.options.len(), 4, "{} must have 4 options", q.key);
        }
    }

    #[test]
    fn test_collect_answers_joins_multiselect() {
        let form = pairs(&[
            ("q1_sebum_after_wash", "Comfortable and not oily"),
            ("q12_skin_concerns", "Acne or bumps"),
            ("q12_skin_concerns", "Large pores"),
        ]);

        let answers = collect_answers(&form);
        assert_eq!(answers.len(), 2);
        assert_eq!(answers[1].1, "Acne or bumps, Large pores");
    }

    #[test]
    fn test_collect_answers_drops_unknown_keys_and_noise() {
        let form = pairs(&[
            ("q1_sebum_after_wash", "Comfortable and not oily"),
            ("csrf_token", "abc123"),
            ("q2_sebum_morning", ""),
        ]);

        let answers = collect_answers(&form);
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].0, "q1_sebum_after_wash");
    }
}
