mod common;
mod conditions;
mod engine;
