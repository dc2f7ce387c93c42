//! AI chat page route handler.
//!
//! The page itself is a thin shell; the conversation happens between
//! `static/js/chat.js` and `POST /api/skin-ai`.

use askama::Template;
use askama_web::WebTemplate;
use tracing::instrument;

use crate::filters;
use crate::middleware::OptionalUser;

/// Greeting shown before the first message.
const GREETING: &str = "Hi! I'm your virtual dermatology assistant. Tell me about your skin or \
     the products you use and I'll help with suggestions. This is not a substitute for a doctor - \
     for anything urgent, please see a professional!";

/// AI chat page template.
#[derive(Template, WebTemplate)]
#[template(path = "ai/chat.html")]
pub struct ChatPageTemplate {
    pub greeting: &'static str,
    pub logged_in: bool,
}

/// Display the AI chat page.
#[instrument(skip(user))]
pub async fn show(OptionalUser(user): OptionalUser) -> ChatPageTemplate {
    ChatPageTemplate {
        greeting: GREETING,
        logged_in: user.is_some(),
    }
}
