use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::eligibility::{Condition, EligibilityEngine, Profile, Scheme};
use crate::knowledge_base::KnowledgeBase;

pub(super) fn farmer_profile() -> Profile {
    Profile::new()
        .with("occupation", "farmer")
        .with("land_owned", true)
        .with("annual_income", 40_000_i64)
        .with("has_ration_card", true)
        .with("state", "WB")
}

pub(super) fn small_farmer_scheme() -> Scheme {
    Scheme::new("small-farmer", "Small Farmer Support")
        .with_condition(Condition::new("occupation", "eq", "farmer"))
        .with_condition(Condition::new("annual_income", "lte", 50_000_i64))
}

pub(super) fn student_scheme() -> Scheme {
    Scheme::new("student-aid", "Student Aid")
        .with_condition(Condition::new("occupation", "eq", "student"))
        .with_condition(Condition::new("annual_income", "lte", 250_000_i64))
}

pub(super) fn ration_scheme() -> Scheme {
    Scheme::new("ration", "Ration Support")
        .with_condition(Condition::new("has_ration_card", "eq", true))
}

pub(super) fn west_bengal_scheme() -> Scheme {
    Scheme::new("wb-farmer", "West Bengal Farmer Grant")
        .with_states(["WB"])
        .with_condition(Condition::new("occupation", "eq", "farmer"))
        .with_condition(Condition::new("land_owned", "eq", true))
        .with_condition(Condition::new("annual_income", "lt", 100_000_i64))
}

pub(super) fn catalogue() -> Vec<Scheme> {
    vec![
        ration_scheme(),
        student_scheme(),
        small_farmer_scheme(),
        west_bengal_scheme(),
    ]
}

pub(super) fn engine() -> EligibilityEngine {
    let knowledge_base = KnowledgeBase::new(catalogue()).expect("unique scheme ids");
    EligibilityEngine::new(Arc::new(knowledge_base))
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
