//! CheapShark deals voice skill: deal retrieval, ranking, narration, and
//! request dispatch.

pub mod config;
pub mod deals;
pub mod error;
pub mod skill;
pub mod telemetry;
