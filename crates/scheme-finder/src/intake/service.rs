use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tracing::info;

use super::prompts::PromptCatalog;
use super::session::{ConversationSession, TurnContext};
use super::stage::IntakeStage;
use super::store::{SessionStore, StoreError};
use crate::config::IntakeConfig;
use crate::eligibility::EligibilityEngine;
use crate::guide::{GuideArtifact, GuideError, GuideRenderer, PlainTextGuide};

/// Reply produced for one inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnReply {
    pub identity: String,
    pub reply: String,
    pub stage: IntakeStage,
}

/// Service composing the session store, the eligibility engine and the prompt catalogue.
///
/// Turns for the same identity are applied one at a time; different identities
/// proceed in parallel.
pub struct IntakeService<S> {
    store: Arc<S>,
    engine: Arc<EligibilityEngine>,
    prompts: PromptCatalog,
    renderer: Arc<dyn GuideRenderer>,
    config: IntakeConfig,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<S> IntakeService<S>
where
    S: SessionStore + 'static,
{
    pub fn new(store: Arc<S>, engine: Arc<EligibilityEngine>, config: IntakeConfig) -> Self {
        Self {
            store,
            engine,
            prompts: PromptCatalog::default(),
            renderer: Arc::new(PlainTextGuide::new()),
            config,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_prompts(mut self, prompts: PromptCatalog) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn GuideRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn engine(&self) -> &EligibilityEngine {
        &self.engine
    }

    /// Load (or create) the caller's session, advance it by one message and persist it.
    pub fn handle_turn(
        &self,
        identity: &str,
        body: &str,
    ) -> Result<TurnReply, IntakeServiceError> {
        let identity = identity.trim();
        if identity.is_empty() {
            return Err(IntakeServiceError::MissingIdentity);
        }

        let lock = self.identity_lock(identity);
        let _turn = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut session = self.store.get_or_create(identity)?;
        let context = TurnContext {
            engine: &self.engine,
            prompts: &self.prompts,
            default_region: self.config.default_region.as_deref(),
            results_limit: self.config.results_limit,
        };
        let previous = session.stage;
        let reply = session.handle_turn(body, &context);
        let stage = session.stage;

        if previous == IntakeStage::Results {
            info!(identity, episode = session.episode - 1, "intake episode finished");
        }
        self.store.save(session)?;

        Ok(TurnReply {
            identity: identity.to_string(),
            reply,
            stage,
        })
    }

    /// Snapshot of the stored session, if the identity has written before.
    pub fn session(&self, identity: &str) -> Result<Option<ConversationSession>, IntakeServiceError> {
        Ok(self.store.fetch(identity.trim())?)
    }

    /// Renders the guide for the identity's most recent evaluation.
    pub fn guide(&self, identity: &str) -> Result<GuideArtifact, IntakeServiceError> {
        let session = self
            .store
            .fetch(identity.trim())?
            .ok_or(IntakeServiceError::UnknownIdentity)?;
        let outcome = session
            .last_outcome
            .as_ref()
            .ok_or(IntakeServiceError::NoOutcome)?;

        let artifact = self.renderer.render(
            &outcome.profile,
            &outcome.matches,
            outcome.language.code(),
        )?;
        Ok(artifact)
    }

    fn identity_lock(&self, identity: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(identity.to_string()).or_default())
    }
}

/// Error raised by the intake service.
#[derive(Debug, thiserror::Error)]
pub enum IntakeServiceError {
    #[error("sender identity is required")]
    MissingIdentity,
    #[error("no session for this identity")]
    UnknownIdentity,
    #[error("no eligibility results for this identity yet")]
    NoOutcome,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Guide(#[from] GuideError),
}
