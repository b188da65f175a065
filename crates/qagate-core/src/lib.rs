//! Core of qagate: grade question/answer pairs with an LLM, classify the
//! verdicts against fixed quality bars, and partition the corpus.
//!
//! The pipeline is `QaRecord` → [`judge::Grader`] → [`model::QualityVerdict`]
//! → [`gate::QualityGate`] → [`engine::runner::BatchOutcome`].

pub mod config;
pub mod engine;
pub mod errors;
pub mod gate;
pub mod io;
pub mod judge;
pub mod model;
pub mod providers;
pub mod report;
