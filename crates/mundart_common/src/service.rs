//! The single pipeline entry point.
//!
//! validate -> resolve -> aggregate -> assemble. Validation and scope
//! resolution fail fast, before any network activity.

use crate::aggregator;
use crate::assemble;
use crate::client::CorpusClient;
use crate::domain::TranslationResult;
use crate::error::LookupError;
use crate::geography;
use crate::validation::{TranslationRequest, ValidatedQuery};
use std::sync::Arc;
use tracing::debug;

pub struct TranslationService<C: CorpusClient + ?Sized> {
    client: Arc<C>,
}

impl<C: CorpusClient + 'static> TranslationService<C> {
    pub fn new(client: C) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

impl<C: CorpusClient + ?Sized + 'static> TranslationService<C> {
    pub fn from_arc(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Run one lookup. The raw request crosses the validation boundary here
    /// and nowhere else.
    pub async fn lookup(
        &self,
        raw: &TranslationRequest,
    ) -> Result<TranslationResult, LookupError> {
        let query = ValidatedQuery::validate(raw)?;
        let locations = geography::resolve(query.scope())?;
        debug!(
            "Looking up '{}' across {} locations ({})",
            query.word(),
            locations.len(),
            query.scope()
        );

        let aggregated = aggregator::aggregate(
            Arc::clone(&self.client),
            query.word(),
            &locations,
            query.limit(),
        )
        .await?;

        Ok(assemble::assemble(
            query.word(),
            query.scope().clone(),
            aggregated.attestations,
            aggregated.total_before_limit,
            query.exact_match(),
        ))
    }
}
