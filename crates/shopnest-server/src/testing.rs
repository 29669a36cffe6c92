//! In-memory fakes for the domain ports

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use shopnest::{
    ChatMessage, CompletionOptions, CompletionProvider, CompletionResponse, ConversationRecord,
    ConversationRepository, DomainError, FaqEntry, FaqRepository, PlatformInfo, PromptBuilder,
    PromptLimits, TokenUsage,
};

use crate::application::ChatService;

#[derive(Default)]
pub struct FakeFaqRepository {
    entries: Vec<FaqEntry>,
    fail: bool,
    panic: bool,
    lookups: Mutex<Vec<String>>,
}

impl FakeFaqRepository {
    pub fn new(entries: Vec<FaqEntry>) -> Self {
        Self {
            entries,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn panicking() -> Self {
        Self {
            panic: true,
            ..Self::default()
        }
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl FaqRepository for FakeFaqRepository {
    async fn find_matching(&self, query: &str) -> Result<Option<FaqEntry>, DomainError> {
        self.lookups.lock().unwrap().push(query.to_string());
        if self.panic {
            panic!("knowledge base lookup panicked");
        }
        if self.fail {
            return Err(DomainError::Repository("connection reset".to_string()));
        }
        Ok(self.entries.iter().find(|e| e.matches(query)).cloned())
    }
}

#[derive(Default)]
pub struct RecordingConversationRepository {
    fail: bool,
    records: Mutex<Vec<ConversationRecord>>,
}

impl RecordingConversationRepository {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn records(&self) -> Vec<ConversationRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConversationRepository for RecordingConversationRepository {
    async fn record(&self, record: &ConversationRecord) -> Result<ConversationRecord, DomainError> {
        if self.fail {
            return Err(DomainError::Persistence("insert failed".to_string()));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(record.clone())
    }
}

#[derive(Clone)]
pub enum Script {
    Answer(String),
    Empty,
    Fail,
}

pub struct ScriptedProvider {
    script: Script,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedProvider {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn answering(answer: &str) -> Self {
        Self::new(Script::Answer(answer.to_string()))
    }

    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        _options: &CompletionOptions,
    ) -> Result<CompletionResponse, DomainError> {
        self.calls.lock().unwrap().push(messages.to_vec());
        let content = match &self.script {
            Script::Answer(answer) => answer.clone(),
            Script::Empty => String::new(),
            Script::Fail => return Err(DomainError::provider_status(503, "overloaded")),
        };
        Ok(CompletionResponse {
            content,
            model: "scripted".to_string(),
            usage: TokenUsage::default(),
            finish_reason: Some("stop".to_string()),
        })
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn model_id(&self) -> &str {
        "scripted"
    }
}

pub fn platform_info() -> PlatformInfo {
    PlatformInfo {
        name: "ShopNest".to_string(),
        description: "Multi-vendor marketplace".to_string(),
        features: vec!["Order tracking".to_string(), "Seller chat".to_string()],
        return_policy: "30 days, unused items only.".to_string(),
        payment_methods: "Cards, PayPal".to_string(),
        customer_support: "support@shopnest.example".to_string(),
    }
}

/// Fakes wired into a ChatService, kept for later inspection
pub struct Harness {
    pub faqs: Arc<FakeFaqRepository>,
    pub conversations: Arc<RecordingConversationRepository>,
    pub provider: Arc<ScriptedProvider>,
}

impl Harness {
    pub fn new(
        faqs: FakeFaqRepository,
        conversations: RecordingConversationRepository,
        provider: ScriptedProvider,
    ) -> Self {
        Self {
            faqs: Arc::new(faqs),
            conversations: Arc::new(conversations),
            provider: Arc::new(provider),
        }
    }

    /// Knowledge base with a single "return policy" entry and an answering provider
    pub fn standard() -> Self {
        Self::new(
            FakeFaqRepository::new(vec![FaqEntry::new(
                "return policy",
                "30 days, unused items only.",
            )]),
            RecordingConversationRepository::default(),
            ScriptedProvider::answering("We deliver within 3 days."),
        )
    }

    pub fn service(&self) -> ChatService {
        ChatService::new(
            self.faqs.clone(),
            self.conversations.clone(),
            self.provider.clone(),
            PromptBuilder::new(Arc::new(platform_info()), PromptLimits::default()),
        )
    }
}
