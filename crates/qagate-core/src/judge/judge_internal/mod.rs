//! Grading internals.
//!
//! - run.rs: attempt loop, backoff, fallback
//! - prompt.rs: rubric prompt construction
//! - client.rs: one model call with timeout, classified outcome
//! - extract.rs: model text to verdict

pub(crate) mod client;
pub(crate) mod extract;
pub(crate) mod prompt;
pub(crate) mod run;
