//! Mundart Common - Dialect attestation lookup pipeline
//!
//! Queries the BDO corpus (Bayerns Dialekte Online) for attested Franconian
//! dialect forms of a Standard German word, restricted to a geographic scope
//! around Ansbach. Results are ground-truth corpus evidence, never generated.

pub mod aggregator;
pub mod assemble;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod geography;
pub mod response;
pub mod service;
pub mod validation;

pub use client::{BdoClient, CorpusClient, FetchStatus, RawResponse};
pub use config::MundartConfig;
pub use domain::{Attestation, LocationId, SearchScope, TranslationResult};
pub use error::{ApiError, LookupError, ValidationError};
pub use service::TranslationService;
pub use validation::{TranslationRequest, ValidatedQuery};
