//! Skin AI relay: the two-stage vision → reasoning pipeline.
//!
//! Stage 1 (only when the latest message carries an image): the vision
//! model turns the photo into a textual skin-condition description. Stage 2
//! splices that description into the user turn and asks the reasoning model
//! for the actual reply under a mode-specific system prompt.
//!
//! In chat mode the reply is scanned for a `[SEARCH: keyword]` directive;
//! when present, the marker is stripped from the displayed text and the
//! keyword drives a bounded product lookup returning up to 3 matches.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{instrument, warn};

use beaulytics_core::ProductId;

use crate::ai::{AiError, ContentPart, GroqClient, ImageUrl, Message, MessageContent, Role};
use crate::content::render_reply_html;
use crate::db::{ProductRepository, RepositoryError};
use crate::models::Product;

/// Vision-stage sampling temperature and token budget.
const VISION_TEMPERATURE: f32 = 0.1;
const VISION_MAX_TOKENS: u32 = 512;

/// Reasoning-stage temperatures.
const ANALYSIS_TEMPERATURE: f32 = 0.3;
const CHAT_TEMPERATURE: f32 = 0.6;

/// Most products a single reply may recommend.
const MAX_RECOMMENDATIONS: usize = 3;

/// Tags shorter than this are cleanup noise, not skin conditions.
const MIN_TAG_LENGTH: usize = 3;

const VISION_SYSTEM_PROMPT: &str = "You are a technical dermatology analyst. Describe the skin \
     condition in this photo in GREAT DETAIL (texture, color, acne type, problem areas). Do not \
     give advice, ONLY visual facts.";

const CHAT_PROMPT: &str = "You are a friendly and personal skincare and body care bestie. You \
     speak in a warm, engaging, and casual tone.\n\
     Your Goal: Provide a consultative dermatology experience.\n\n\
     STRICT RESPONSE FLOW:\n\
     1. ANALYSIS: Analyze the user's skin condition based on their description or image.\n\
     2. TIPS: Give immediate behavioral/lifestyle advice.\n\
     3. PERMISSION: Ask the user if they want product recommendations.\n\n\
     MAGIC SEARCH RULE:\n\
     - If the user EXPLICITLY asks for product recommendations, provide your advice, and AT THE \
     VERY END of your message, you MUST output a search trigger like this: `[SEARCH: keyword]`.\n\
     - Example 1: `[SEARCH: salicylic acid]`\n\
     - Example 2: `[SEARCH: sunscreen]`\n\
     - Example 3: `[SEARCH: acne]`\n\
     - ONLY use ONE main keyword. Do NOT use the [SEARCH] tag if they haven't asked for products \
     yet.";

const ANALYSIS_PROMPT: &str = "You are a professional Dermatologist AI and Skin Analyzer.\n\
     You will receive a list of 11 questions and the user's selected answers.\n\
     Your task is to analyze their skin profile using the following strict scoring system.\n\n\
     Note that the user's answers are provided as full text, which correspond sequentially to \
     Option 1 (A), Option 2 (B), Option 3 (C), and Option 4 (D) for each question.\n\n\
     SCORING RULES:\n\
     1. SEBUM INDEX (Q1, Q2, Q3):\n\
     Scores: Opt 1 (-2), Opt 2 (-1), Opt 3 (+1), Opt 4 (+2).\n\
     Sum the scores.\n\
     Result: -6 to -3 (Dry Skin), -2 to +1 (Normal Skin), +2 to +4 (Combination Skin), \
     +5 to +6 (Oily Skin).\n\n\
     2. HYDRATION & BARRIER (Q4, Q5):\n\
     Scores: Opt 1 (-2), Opt 2 (-1), Opt 3 (+1), Opt 4 (0).\n\
     Sum the scores.\n\
     Result: -4 to -2 (Severely Dehydrated & Barrier Damage), -1 (Mild Dehydration), \
     0 (Oily but Dehydrated), +1 to +2 (Healthy Hydration).\n\n\
     3. SENSITIVITY (Q6, Q7):\n\
     Scores: Opt 1 (+2), Opt 2 (+1), Opt 3 (-1), Opt 4 (-2).\n\
     Sum the scores.\n\
     Result: +3 to +4 (Highly Sensitive Skin), +1 to +2 (Mild Sensitive), -1 to -2 \
     (Resistant Skin), -3 to -4 (Highly Resistant).\n\n\
     4. ACNE INDEX (Q8, Q9):\n\
     Scores: Opt 1 (-2), Opt 2 (-1), Opt 3 (+1), Opt 4 (+2).\n\
     Sum the scores.\n\
     Result: +3 to +4 (Highly Acne Prone), +1 to +2 (Acne Prone), -1 to -2 (Low Risk), \
     -3 to -4 (Very Low Risk).\n\n\
     5. PIGMENTATION (Q10):\n\
     Scores: Opt 1 (-2), Opt 2 (-1), Opt 3 (+1), Opt 4 (+2).\n\
     Result: +2 (High Hyperpigmentation Risk), +1 (Moderate Risk), -1 (Low Risk), -2 (Even Tone).\n\n\
     6. AGING (Q11):\n\
     Scores: Opt 1 (-2), Opt 2 (-1), Opt 3 (+1), Opt 4 (+2).\n\
     Result: +2 (Advanced Aging), +1 (Early Aging), -1 (Preventive Stage), -2 (Youthful Skin).\n\n\
     OUTPUT FORMAT:\n\
     Return ONLY a single line containing a comma-separated list of the resulting conditions \
     (max 6 items).\n\
     Example: Combination Skin, Mild Dehydration, Mild Sensitive, Acne Prone, Moderate Risk, \
     Preventive Stage\n\n\
     IMPORTANT RULES:\n\
     1. Output MUST be a SINGLE LINE.\n\
     2. DO NOT include any introductions, explanations, or labels like \"Result:\".\n\
     3. JUST the keywords separated by commas.\n\
     4. If uncertain, default to \"Normal Skin\".";

const DIAGNOSIS_PROMPT: &str = "You are a professional Dermatologist AI. Your task is to generate \
     a structured Medical Report based on the patient's skin analysis.\n\
     Format your response EXACTLY as a structured plain-text report with these sections:\n\n\
     **MEDICAL REPORT**\n\
     TARGET: [Patient Name/User]\n\
     DATE: [Current Date]\n\n\
     ---\n\
     **1. DETECTED CONDITIONS**\n\
     - [Condition 1] (e.g., Acne Vulgaris)\n\
     - [Condition 2] (e.g., Post-Inflammatory Hyperpigmentation)\n\
     - [Condition 3] (e.g., Oversized Pores)\n\n\
     **2. ANALYSIS**\n\
     [Detailed technical analysis of the visual evidence. Explain severity, distribution, and \
     probable causes.]\n\n\
     **3. CLINICAL RECOMMENDATIONS**\n\
     - [Treatment 1]\n\
     - [Treatment 2]\n\n\
     **4. NEXT STEPS**\n\
     Please consult with our AI Assistant for a personalized product routine.\n\
     ---";

static SEARCH_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // literal pattern, checked by tests
    Regex::new(r"(?i)\[SEARCH:\s*([^\]]+)\]").unwrap()
});

/// Relay mode: which system prompt and sampling parameters apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    #[default]
    Chat,
    Analysis,
    Diagnosis,
}

impl ChatMode {
    const fn system_prompt(self) -> &'static str {
        match self {
            Self::Chat => CHAT_PROMPT,
            Self::Analysis => ANALYSIS_PROMPT,
            Self::Diagnosis => DIAGNOSIS_PROMPT,
        }
    }

    const fn temperature(self) -> f32 {
        match self {
            Self::Analysis => ANALYSIS_TEMPERATURE,
            Self::Chat | Self::Diagnosis => CHAT_TEMPERATURE,
        }
    }
}

/// Errors that can occur in the relay.
#[derive(Debug, thiserror::Error)]
pub enum SkinAiError {
    /// Database error while looking up recommendations.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),

    /// Groq API error.
    #[error("AI API error: {0}")]
    Ai(#[from] AiError),

    /// The conversation contained no messages.
    #[error("empty conversation")]
    EmptyConversation,
}

/// A recommended product attached to a chat reply.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendedProduct {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub category: Option<String>,
}

impl From<&Product> for RecommendedProduct {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            category: product.category.clone(),
        }
    }
}

/// The relay's answer for one turn.
#[derive(Debug, Clone, Serialize)]
pub struct RelayReply {
    /// Reply text with any search directive stripped.
    pub text: String,
    /// The same reply rendered as HTML for the chat UI.
    pub html: String,
    /// Up to three recommended products (chat mode only).
    pub products: Vec<RecommendedProduct>,
}

/// Skin AI relay service.
pub struct SkinAiService<'a> {
    pool: &'a PgPool,
    groq: &'a GroqClient,
}

impl<'a> SkinAiService<'a> {
    /// Create a new relay service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, groq: &'a GroqClient) -> Self {
        Self { pool, groq }
    }

    /// Run one relay turn over the conversation history.
    ///
    /// # Errors
    ///
    /// Returns `SkinAiError::EmptyConversation` for an empty history and
    /// `SkinAiError::Ai` when the reasoning call fails. A vision-stage
    /// failure does not fail the turn; a recommendation-lookup failure
    /// degrades to an empty product list.
    #[instrument(skip(self, messages), fields(mode = ?mode, turns = messages.len()))]
    pub async fn relay(
        &self,
        messages: Vec<Message>,
        mode: ChatMode,
    ) -> Result<RelayReply, SkinAiError> {
        let Some(last) = messages.last() else {
            return Err(SkinAiError::EmptyConversation);
        };

        let user_text = last.text_content();

        // Stage 1: vision, only when the latest turn carries an image
        let final_user_content = match last.image_url() {
            Some(image_url) => match self.describe_image(image_url).await {
                Ok(description) => format!(
                    "This is the visual analysis of my face from the scanner tool: \
                     [{description}].\n\nMy question: \"{user_text}\""
                ),
                Err(e) => {
                    warn!("vision stage failed: {e}");
                    format!(
                        "The user tried to send a photo but the visual analysis failed. \
                         User question: \"{user_text}\""
                    )
                }
            },
            None => user_text,
        };

        // Stage 2: reasoning over the flattened history
        let mut brain_messages = Vec::with_capacity(messages.len() + 1);
        brain_messages.push(Message::text(Role::System, mode.system_prompt()));
        for message in &messages[..messages.len() - 1] {
            brain_messages.push(Message::text(message.role, message.text_content()));
        }
        brain_messages.push(Message::text(Role::User, final_user_content));

        let max_tokens = if mode == ChatMode::Analysis {
            self.groq.analysis_max_tokens()
        } else {
            self.groq.max_tokens()
        };

        let completion = self
            .groq
            .complete(brain_messages, mode.temperature(), max_tokens)
            .await?;
        let reply = completion
            .reply_text()
            .ok_or(AiError::EmptyCompletion)?
            .to_string();

        // Chat mode only: turn a search directive into recommendations
        let (text, products) = if mode == ChatMode::Chat {
            match extract_search_directive(&reply) {
                Some((keyword, stripped)) => {
                    let products = self.recommend(&keyword).await;
                    (stripped, products)
                }
                None => (reply, Vec::new()),
            }
        } else {
            (reply, Vec::new())
        };

        let html = render_reply_html(&text);

        Ok(RelayReply {
            text,
            html,
            products,
        })
    }

    /// Score questionnaire answers into a summary line and cleaned tags.
    ///
    /// # Errors
    ///
    /// Returns `SkinAiError::Ai` when the analysis call fails.
    pub async fn analyze_questionnaire(
        &self,
        answers: &[(String, String)],
    ) -> Result<(String, Vec<String>), SkinAiError> {
        let body = answers
            .iter()
            .map(|(question, answer)| format!("{question}\nAnswer: {answer}"))
            .collect::<Vec<_>>()
            .join("\n\n");

        let reply = self
            .relay(vec![Message::text(Role::User, body)], ChatMode::Analysis)
            .await?;

        let summary = clean_summary(&reply.text);
        let tags = summary_tags(&summary);
        Ok((summary, tags))
    }

    async fn describe_image(&self, image_url: &str) -> Result<String, AiError> {
        let messages = vec![
            Message::text(Role::System, VISION_SYSTEM_PROMPT),
            Message {
                role: Role::User,
                content: MessageContent::Parts(vec![
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: image_url.to_string(),
                        },
                    },
                    ContentPart::Text {
                        text: "Describe the skin condition in this image.".to_string(),
                    },
                ]),
            },
        ];

        let completion = self
            .groq
            .complete_vision(messages, VISION_TEMPERATURE, VISION_MAX_TOKENS)
            .await?;

        completion
            .reply_text()
            .map(String::from)
            .ok_or(AiError::EmptyCompletion)
    }

    /// Keyword → up to three products. Lookup failures degrade to nothing.
    async fn recommend(&self, keyword: &str) -> Vec<RecommendedProduct> {
        let repo = ProductRepository::new(self.pool);
        match repo.search_pool().await {
            Ok(products) => recommend_from(&products, keyword),
            Err(e) => {
                warn!("recommendation lookup failed: {e}");
                Vec::new()
            }
        }
    }
}

/// Extract a `[SEARCH: keyword]` directive from a reply.
///
/// Returns the lowercased keyword and the reply with the directive removed,
/// or `None` when no directive is present.
#[must_use]
pub fn extract_search_directive(reply: &str) -> Option<(String, String)> {
    let captures = SEARCH_DIRECTIVE.captures(reply)?;
    let full_match = captures.get(0)?;
    let keyword = captures.get(1)?.as_str().trim().to_lowercase();

    let mut stripped = String::with_capacity(reply.len());
    stripped.push_str(&reply[..full_match.start()]);
    stripped.push_str(&reply[full_match.end()..]);

    Some((keyword, stripped.trim().to_string()))
}

/// Filter a bounded product pool by keyword, keeping at most three.
#[must_use]
pub fn recommend_from(products: &[Product], keyword: &str) -> Vec<RecommendedProduct> {
    products
        .iter()
        .filter(|p| p.matches_keyword(keyword))
        .take(MAX_RECOMMENDATIONS)
        .map(RecommendedProduct::from)
        .collect()
}

/// Strip report labels and collapse line breaks from an analysis summary.
#[must_use]
pub fn clean_summary(raw: &str) -> String {
    static LEADING_LABEL: LazyLock<Regex> = LazyLock::new(|| {
        #[allow(clippy::unwrap_used)] // literal pattern, checked by tests
        Regex::new(r"(?i)^(Medical Report|Analysis|Result|Detected Conditions):").unwrap()
    });

    LEADING_LABEL
        .replace(raw.trim(), "")
        .replace("\r\n", ",")
        .replace('\n', ",")
        .trim()
        .to_string()
}

/// Split a cleaned summary into tags: trim, drop bullet prefixes, and
/// discard fragments too short to be a condition name.
#[must_use]
pub fn summary_tags(summary: &str) -> Vec<String> {
    summary
        .split(',')
        .map(|tag| {
            tag.trim()
                .trim_start_matches(['-', '*', '•'])
                .trim()
                .to_string()
        })
        .filter(|tag| tag.len() > MIN_TAG_LENGTH - 1)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(name: &str, category: Option<&str>, ingredients: &[&str], concerns: &[&str]) -> Product {
        Product {
            id: ProductId::generate(),
            name: name.to_string(),
            description: None,
            price: Decimal::new(2500, 2),
            image: None,
            category: category.map(String::from),
            size: None,
            ingredients: ingredients.iter().map(|s| (*s).to_string()).collect(),
            concerns: concerns.iter().map(|s| (*s).to_string()).collect(),
            rating: None,
            review_count: 0,
            click_count: 0,
            shopee_url: None,
            tokopedia_url: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_extract_search_directive() {
        let (keyword, stripped) =
            extract_search_directive("Try a gentle exfoliant. [SEARCH: salicylic acid]")
                .expect("directive");

        assert_eq!(keyword, "salicylic acid");
        assert_eq!(stripped, "Try a gentle exfoliant.");
    }

    #[test]
    fn test_extract_is_case_insensitive() {
        let (keyword, _) = extract_search_directive("ok [search:  Sunscreen ]").expect("directive");
        assert_eq!(keyword, "sunscreen");
    }

    #[test]
    fn test_extract_none_without_directive() {
        assert!(extract_search_directive("No products needed yet.").is_none());
    }

    #[test]
    fn test_extract_mid_text_directive() {
        let (keyword, stripped) =
            extract_search_directive("Before [SEARCH: acne] after").expect("directive");
        assert_eq!(keyword, "acne");
        assert_eq!(stripped, "Before  after");
    }

    #[test]
    fn test_recommend_from_caps_at_three() {
        let products = vec![
            product("Acne Wash", None, &[], &["Acne"]),
            product("Acne Toner", None, &[], &["Acne"]),
            product("Acne Serum", None, &[], &["Acne"]),
            product("Acne Cream", None, &[], &["Acne"]),
        ];

        let picks = recommend_from(&products, "acne");
        assert_eq!(picks.len(), 3);
    }

    #[test]
    fn test_recommend_from_matches_all_fields() {
        let products = vec![
            product("Foam Cleanser", Some("Cleanser"), &[], &[]),
            product("Glow Serum", Some("Serum"), &["Niacinamide"], &[]),
            product("Spot Gel", None, &[], &["Acne"]),
        ];

        assert_eq!(recommend_from(&products, "cleanser").len(), 1);
        assert_eq!(recommend_from(&products, "niacinamide").len(), 1);
        assert_eq!(recommend_from(&products, "acne").len(), 1);
        assert!(recommend_from(&products, "retinol").is_empty());
    }

    #[test]
    fn test_clean_summary_strips_labels_and_newlines() {
        let cleaned = clean_summary("Result: Oily Skin\nAcne Prone\r\nLarge Pores");
        assert_eq!(cleaned, "Oily Skin,Acne Prone,Large Pores");
    }

    #[test]
    fn test_summary_tags_strip_bullets_and_short_noise() {
        let tags = summary_tags("- Oily Skin, * Acne Prone, •Dull, ok, , Early Aging");
        assert_eq!(
            tags,
            vec!["Oily Skin", "Acne Prone", "Dull", "Early Aging"]
        );
    }

    #[test]
    fn test_mode_parameters() {
        assert!((ChatMode::Analysis.temperature() - 0.3).abs() < f32::EPSILON);
        assert!((ChatMode::Chat.temperature() - 0.6).abs() < f32::EPSILON);
        assert!(ChatMode::Chat.system_prompt().contains("[SEARCH:"));
        assert!(ChatMode::Analysis.system_prompt().contains("SCORING RULES"));
        assert!(ChatMode::Diagnosis.system_prompt().contains("MEDICAL REPORT"));
    }

    #[test]
    fn test_mode_deserializes_lowercase() {
        assert_eq!(
            serde_json::from_str::<ChatMode>("\"analysis\"").expect("mode"),
            ChatMode::Analysis
        );
        assert_eq!(
            serde_json::from_str::<ChatMode>("\"chat\"").expect("mode"),
            ChatMode::Chat
        );
    }
}
