//! Core data model and sampler kernel for the theme/role LDA variant.
//!
//! This crate owns the three count structures (`TopicWordMatrix`, book
//! theme counts, character role counts), the single-token sampler kernel,
//! and the audit that reconciles them. It has no notion of parallelism,
//! sharding, or I/O — those live in `duet-worker` and `duet-io`
//! respectively, consuming the types defined here.

pub mod audit;
pub mod counts;
pub mod error;
pub mod hyper;
pub mod kernel;
pub mod model;

pub use audit::audit as run_audit;
pub use counts::{DeltaMatrix, TopicWordMatrix};
pub use error::{CoreError, CoreResult};
pub use hyper::Hyperparameters;
pub use kernel::{sample_token, KernelStep};
pub use model::{Book, Character, MAX_CHARACTER_WORDS, MAX_TOPICS, MIN_CHARACTER_WORDS};
