//! Conversational intake: a per-identity state machine that collects a profile one
//! question at a time and hands it to the eligibility engine.

pub mod prompts;
pub mod router;
pub mod service;
pub mod session;
pub mod stage;
pub mod store;

#[cfg(test)]
mod tests;

pub use prompts::{Language, PromptCatalog, PromptKey};
pub use router::{intake_router, twiml, InboundMessage, TurnRequest};
pub use service::{IntakeService, IntakeServiceError, TurnReply};
pub use session::{is_affirmative, parse_income, ConversationSession, IntakeOutcome, TurnContext};
pub use stage::{transition, InputClass, IntakeStage};
pub use store::{InMemorySessionStore, SessionStore, StoreError};
