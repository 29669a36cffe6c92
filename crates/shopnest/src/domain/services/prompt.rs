//! Grounding prompt construction
//!
//! Embeds the static platform facts ahead of the user's question so the
//! completion provider answers with platform-accurate information.

use std::sync::Arc;

use crate::domain::entities::PlatformInfo;

/// Caps on the variable-length parts of a prompt (in characters)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptLimits {
    pub max_message_chars: usize,
    pub max_features_chars: usize,
}

impl Default for PromptLimits {
    fn default() -> Self {
        Self {
            max_message_chars: 2000,
            max_features_chars: 2000,
        }
    }
}

/// Builds grounding prompts from one shared set of platform facts
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    info: Arc<PlatformInfo>,
    limits: PromptLimits,
}

impl PromptBuilder {
    pub fn new(info: Arc<PlatformInfo>, limits: PromptLimits) -> Self {
        Self { info, limits }
    }

    pub fn build(&self, user_message: &str) -> String {
        build_prompt(&self.info, user_message, &self.limits)
    }
}

/// Assemble the grounding prompt. Pure and deterministic.
pub fn build_prompt(info: &PlatformInfo, user_message: &str, limits: &PromptLimits) -> String {
    let features = join_features(&info.features, limits.max_features_chars);
    let question = truncate_chars(user_message, limits.max_message_chars);

    format!(
        r#"
You are a chatbot representing "{name}", an e-commerce platform. Use the following information to answer the question accurately:

Name: {name}
Description: {description}
Features: {features}
Return Policy: {return_policy}
Payment Methods: {payment_methods}
Customer Support: {customer_support}

User Question: "{question}"
Answer:
"#,
        name = info.name,
        description = info.description,
        features = features,
        return_policy = info.return_policy,
        payment_methods = info.payment_methods,
        customer_support = info.customer_support,
        question = question,
    )
}

/// Join features in order, stopping before the joined text would exceed `max_chars`.
fn join_features(features: &[String], max_chars: usize) -> String {
    let mut joined = String::new();
    let mut len = 0;

    for feature in features {
        let sep = if joined.is_empty() { 0 } else { 2 };
        let feature_len = feature.chars().count();
        if len + sep + feature_len > max_chars {
            break;
        }
        if sep > 0 {
            joined.push_str(", ");
        }
        joined.push_str(feature);
        len += sep + feature_len;
    }

    joined
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
