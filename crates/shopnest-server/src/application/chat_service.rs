//! Chat Application Service (Use Case)
//!
//! Answers a customer question from the knowledge base when possible,
//! otherwise from the completion provider, and logs every answered exchange.

use std::sync::Arc;

use shopnest::{
    normalize_message, require_message, AnswerSource, CompletionProvider, ConversationRecord,
    ConversationRepository, DomainError, FaqRepository, PromptBuilder,
};

/// System instruction sent ahead of every grounding prompt
pub const SYSTEM_INSTRUCTION: &str = "Provide short and concise answers within 2 sentences.";

/// Answer used when the provider fails or returns nothing
pub const FALLBACK_ANSWER: &str = "Sorry, I couldn't understand that.";

/// Outcome of one handled chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub faq_response: Option<String>,
    pub ai_response: Option<String>,
    pub source: AnswerSource,
}

impl ChatReply {
    /// The resolved answer, whichever source produced it
    pub fn answer(&self) -> &str {
        self.faq_response
            .as_deref()
            .or(self.ai_response.as_deref())
            .unwrap_or_default()
    }
}

/// Application service for chat messages
pub struct ChatService {
    faqs: Arc<dyn FaqRepository>,
    conversations: Arc<dyn ConversationRepository>,
    provider: Arc<dyn CompletionProvider>,
    prompts: PromptBuilder,
}

impl ChatService {
    pub fn new(
        faqs: Arc<dyn FaqRepository>,
        conversations: Arc<dyn ConversationRepository>,
        provider: Arc<dyn CompletionProvider>,
        prompts: PromptBuilder,
    ) -> Self {
        Self {
            faqs,
            conversations,
            provider,
            prompts,
        }
    }

    /// Handle one inbound message.
    ///
    /// Provider failures degrade to [`FALLBACK_ANSWER`]; knowledge-base and
    /// persistence failures are returned to the caller. A record is written
    /// only when an answer was resolved.
    pub async fn handle(&self, message: Option<&str>) -> Result<ChatReply, DomainError> {
        let message = require_message(message)?;
        let query = normalize_message(message);

        let faq = if query.is_empty() {
            None
        } else {
            self.faqs.find_matching(&query).await?
        };

        let reply = match faq {
            Some(entry) => {
                tracing::debug!(faq_id = %entry.id, "Answered from knowledge base");
                ChatReply {
                    faq_response: Some(entry.answer),
                    ai_response: None,
                    source: AnswerSource::KnowledgeBase,
                }
            }
            None => {
                let (answer, source) = self.ask_provider(message).await;
                ChatReply {
                    faq_response: None,
                    ai_response: Some(answer),
                    source,
                }
            }
        };

        let record = ConversationRecord::new(message, reply.answer(), reply.source);
        self.conversations.record(&record).await?;

        tracing::info!(source = %reply.source, "Chat message handled");

        Ok(reply)
    }

    async fn ask_provider(&self, message: &str) -> (String, AnswerSource) {
        let prompt = self.prompts.build(message);

        match self.provider.ask(SYSTEM_INSTRUCTION, &prompt).await {
            Ok(response) if !response.content.trim().is_empty() => {
                tracing::debug!(
                    model = %response.model,
                    finish_reason = response.finish_reason.as_deref().unwrap_or("unknown"),
                    prompt_tokens = response.usage.prompt_tokens,
                    completion_tokens = response.usage.completion_tokens,
                    total_tokens = response.usage.total_tokens,
                    "Provider answered"
                );
                (response.content, AnswerSource::Provider)
            }
            Ok(_) => {
                tracing::warn!(
                    provider = self.provider.provider_name(),
                    model = self.provider.model_id(),
                    "Provider returned an empty answer, using fallback"
                );
                (FALLBACK_ANSWER.to_string(), AnswerSource::Fallback)
            }
            Err(e) => {
                tracing::warn!(
                    provider = self.provider.provider_name(),
                    model = self.provider.model_id(),
                    "Provider call failed, using fallback: {}",
                    e
                );
                (FALLBACK_ANSWER.to_string(), AnswerSource::Fallback)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        FakeFaqRepository, Harness, RecordingConversationRepository, Script, ScriptedProvider,
    };
    use shopnest::{FaqEntry, MessageRole};

    #[tokio::test]
    async fn test_blank_message_rejected_without_side_effects() {
        let harness = Harness::standard();
        let service = harness.service();

        for input in [None, Some(""), Some("   ")] {
            let err = service.handle(input).await.unwrap_err();
            assert!(matches!(err, DomainError::InvalidInput(ref m) if m == "Message is required!"));
        }

        assert!(harness.faqs.lookups().is_empty());
        assert!(harness.provider.calls().is_empty());
        assert!(harness.conversations.records().is_empty());
    }

    #[tokio::test]
    async fn test_knowledge_base_match_skips_provider() {
        let harness = Harness::standard();

        let reply = harness
            .service()
            .handle(Some("What is your return policy?"))
            .await
            .unwrap();

        assert_eq!(
            reply.faq_response.as_deref(),
            Some("30 days, unused items only.")
        );
        assert_eq!(reply.ai_response, None);
        assert_eq!(reply.source, AnswerSource::KnowledgeBase);
        assert!(harness.provider.calls().is_empty());

        let records = harness.conversations.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_message, "What is your return policy?");
        assert_eq!(records[0].bot_response, "30 days, unused items only.");
        assert_eq!(records[0].answer_source, AnswerSource::KnowledgeBase);
    }

    #[tokio::test]
    async fn test_lookup_uses_normalized_text() {
        let harness = Harness::standard();

        harness
            .service()
            .handle(Some(r#"  "Return Policy"  "#))
            .await
            .unwrap();

        assert_eq!(harness.faqs.lookups(), vec!["Return Policy".to_string()]);
    }

    #[tokio::test]
    async fn test_no_match_calls_provider_once_with_grounding_prompt() {
        let harness = Harness::standard();
        let message = "  Do you deliver to \"Pune\"?";

        let reply = harness.service().handle(Some(message)).await.unwrap();

        assert_eq!(reply.faq_response, None);
        assert_eq!(reply.ai_response.as_deref(), Some("We deliver within 3 days."));
        assert_eq!(reply.source, AnswerSource::Provider);

        let calls = harness.provider.calls();
        assert_eq!(calls.len(), 1);
        let messages = &calls[0];
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::System);
        assert_eq!(messages[0].content, SYSTEM_INSTRUCTION);
        assert_eq!(messages[1].role, MessageRole::User);

        let prompt = &messages[1].content;
        // raw message, quotes and leading whitespace intact
        assert!(prompt.contains(&format!("User Question: \"{message}\"")));
        assert!(prompt.contains("Name: ShopNest"));
        assert!(prompt.contains("Description: Multi-vendor marketplace"));
        assert!(prompt.contains("Features: Order tracking, Seller chat"));
        assert!(prompt.contains("Return Policy: 30 days, unused items only."));
        assert!(prompt.contains("Payment Methods: Cards, PayPal"));
        assert!(prompt.contains("Customer Support: support@shopnest.example"));

        let records = harness.conversations.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_message, message);
        assert_eq!(records[0].bot_response, "We deliver within 3 days.");
    }

    #[tokio::test]
    async fn test_provider_failure_degrades_to_fallback() {
        for script in [Script::Fail, Script::Empty] {
            let harness = Harness::new(
                FakeFaqRepository::default(),
                RecordingConversationRepository::default(),
                ScriptedProvider::new(script),
            );

            let reply = harness
                .service()
                .handle(Some("Can I pay in bitcoin?"))
                .await
                .unwrap();

            assert_eq!(reply.ai_response.as_deref(), Some(FALLBACK_ANSWER));
            assert_eq!(reply.source, AnswerSource::Fallback);

            let records = harness.conversations.records();
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].bot_response, FALLBACK_ANSWER);
            assert_eq!(records[0].answer_source, AnswerSource::Fallback);
        }
    }

    #[tokio::test]
    async fn test_persistence_failure_is_surfaced() {
        let harness = Harness::new(
            FakeFaqRepository::new(vec![FaqEntry::new("return policy", "30 days")]),
            RecordingConversationRepository::failing(),
            ScriptedProvider::answering("unused"),
        );

        let err = harness
            .service()
            .handle(Some("return policy"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Persistence(_)));
    }

    #[tokio::test]
    async fn test_lookup_failure_is_surfaced_without_record() {
        let harness = Harness::new(
            FakeFaqRepository::failing(),
            RecordingConversationRepository::default(),
            ScriptedProvider::answering("unused"),
        );

        let err = harness
            .service()
            .handle(Some("hello"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Repository(_)));
        assert!(harness.provider.calls().is_empty());
        assert!(harness.conversations.records().is_empty());
    }

    #[tokio::test]
    async fn test_nul_characters_never_reach_storage() {
        let harness = Harness::standard();

        let reply = harness
            .service()
            .handle(Some("return\u{0} policy"))
            .await
            .unwrap();

        assert_eq!(reply.source, AnswerSource::KnowledgeBase);
        assert_eq!(harness.faqs.lookups(), vec!["return policy".to_string()]);
        let records = harness.conversations.records();
        assert_eq!(records[0].user_message, "return\u{FFFD} policy");
    }

    #[tokio::test]
    async fn test_quotes_only_message_goes_to_provider() {
        let harness = Harness::standard();

        let reply = harness.service().handle(Some(r#""""#)).await.unwrap();

        assert!(harness.faqs.lookups().is_empty());
        assert_eq!(harness.provider.calls().len(), 1);
        assert_eq!(reply.source, AnswerSource::Provider);
    }
}
