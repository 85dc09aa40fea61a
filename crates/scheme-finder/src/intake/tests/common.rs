use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::config::IntakeConfig;
use crate::eligibility::{Condition, EligibilityEngine, Scheme};
use crate::intake::{
    ConversationSession, InMemorySessionStore, IntakeService, PromptCatalog, SessionStore,
    StoreError, TurnContext,
};
use crate::knowledge_base::KnowledgeBase;

pub(super) const FARMER_SCRIPT: [&str; 5] = ["1", "farmer", "yes", "40,000", "yes"];

pub(super) fn catalogue() -> Vec<Scheme> {
    vec![
        Scheme::new("land-grant", "Landholder Grant")
            .with_condition(Condition::new("occupation", "eq", "farmer"))
            .with_condition(Condition::new("land_owned", "eq", true)),
        Scheme::new("ration", "Ration Support")
            .with_condition(Condition::new("has_ration_card", "eq", true)),
        Scheme::new("student-aid", "Student Aid")
            .with_condition(Condition::new("occupation", "eq", "student"))
            .with_condition(Condition::new("annual_income", "lte", 250_000_i64)),
        Scheme::new("wb-crop", "West Bengal Crop Support")
            .with_states(["WB"])
            .with_condition(Condition::new("occupation", "eq", "farmer")),
    ]
}

pub(super) fn engine() -> EligibilityEngine {
    let knowledge_base = KnowledgeBase::new(catalogue()).expect("unique scheme ids");
    EligibilityEngine::new(Arc::new(knowledge_base))
}

pub(super) fn context<'a>(
    engine: &'a EligibilityEngine,
    prompts: &'a PromptCatalog,
) -> TurnContext<'a> {
    TurnContext {
        engine,
        prompts,
        default_region: None,
        results_limit: IntakeConfig::DEFAULT_RESULTS_LIMIT,
    }
}

/// Feeds each message in order and returns the replies.
pub(super) fn converse(
    session: &mut ConversationSession,
    context: &TurnContext<'_>,
    messages: &[&str],
) -> Vec<String> {
    messages
        .iter()
        .map(|message| session.handle_turn(message, context))
        .collect()
}

pub(super) fn service() -> (
    IntakeService<InMemorySessionStore>,
    Arc<InMemorySessionStore>,
) {
    let store = Arc::new(InMemorySessionStore::new());
    let service = IntakeService::new(store.clone(), Arc::new(engine()), IntakeConfig::default());
    (service, store)
}

pub(super) struct UnavailableStore;

impl SessionStore for UnavailableStore {
    fn get_or_create(&self, _identity: &str) -> Result<ConversationSession, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn save(&self, _session: ConversationSession) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _identity: &str) -> Result<Option<ConversationSession>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = read_body(response).await;
    serde_json::from_slice(&body).expect("json payload")
}
