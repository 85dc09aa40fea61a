//! Welfare scheme eligibility matching and conversational profile intake.
//!
//! The [`eligibility`] module evaluates a citizen [`eligibility::Profile`] against the
//! schemes held in a [`knowledge_base::KnowledgeBase`] and ranks the matches. The
//! [`intake`] module collects that profile turn by turn over a messaging channel and
//! feeds the engine once enough fields are known.

pub mod config;
pub mod eligibility;
pub mod error;
pub mod guide;
pub mod intake;
pub mod knowledge_base;
pub mod telemetry;
