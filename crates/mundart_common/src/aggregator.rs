//! Concurrent per-location fan-out and attestation aggregation.
//!
//! One fetch+validate task per resolved location, bounded by a fixed-width
//! semaphore. Per-location failures are tagged outcomes folded after the
//! join, not exceptions: a failed location is excluded from the merge unless
//! every location failed. Dropping the returned future aborts all in-flight
//! fetches (`JoinSet` aborts its tasks on drop).

use crate::client::{CorpusClient, FetchStatus, RawResponse};
use crate::domain::{Attestation, LocationId};
use crate::error::ApiError;
use crate::response;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Fixed fan-out width: at most this many location fetches in flight.
pub const MAX_CONCURRENT_FETCHES: usize = 4;

/// Merged, ranked, truncated attestations for one query.
#[derive(Debug, Clone)]
pub struct Aggregated {
    pub attestations: Vec<Attestation>,
    pub total_before_limit: usize,
}

/// Fan out over `locations`, merge validated attestations, rank and truncate.
pub async fn aggregate<C>(
    client: Arc<C>,
    word: &str,
    locations: &[LocationId],
    limit: usize,
) -> Result<Aggregated, ApiError>
where
    C: CorpusClient + ?Sized + 'static,
{
    let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_FETCHES));
    let mut join_set = JoinSet::new();

    for (index, location) in locations.iter().enumerate() {
        let client = Arc::clone(&client);
        let semaphore = Arc::clone(&semaphore);
        let word = word.to_string();
        let location = location.clone();

        join_set.spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    return (
                        index,
                        Err(ApiError::Transport {
                            location,
                            reason: "aggregation cancelled".to_string(),
                        }),
                    )
                }
            };
            let raw = client.fetch(&word, &location).await;
            (index, classify(raw))
        });
    }

    // Slots keyed by location index so the later fold runs in resolved
    // order, independent of completion order.
    let mut outcomes: Vec<Option<Result<Vec<Attestation>, ApiError>>> =
        vec![None; locations.len()];
    while let Some(joined) = join_set.join_next().await {
        if let Ok((index, outcome)) = joined {
            outcomes[index] = Some(outcome);
        }
    }

    let mut merged: Vec<Attestation> = Vec::new();
    // normalized form -> (index into merged, highest single-contributor frequency)
    let mut by_form: HashMap<String, (usize, u64)> = HashMap::new();
    let mut failures: Vec<(LocationId, String)> = Vec::new();
    let mut any_succeeded = false;

    for (index, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Some(Ok(attestations)) => {
                any_succeeded = true;
                debug!(
                    "{}: {} validated attestations",
                    locations[index],
                    attestations.len()
                );
                for attestation in attestations {
                    merge(&mut merged, &mut by_form, attestation);
                }
            }
            Some(Err(error)) => {
                warn!("Excluding {}: {}", locations[index], error);
                failures.push((locations[index].clone(), error.to_string()));
            }
            None => {
                warn!("Excluding {}: fetch task aborted", locations[index]);
                failures.push((
                    locations[index].clone(),
                    "fetch task aborted".to_string(),
                ));
            }
        }
    }

    if !any_succeeded {
        return Err(ApiError::AllLocationsFailed { failures });
    }

    rank(&mut merged);
    let total_before_limit = merged.len();
    merged.truncate(limit);

    Ok(Aggregated {
        attestations: merged,
        total_before_limit,
    })
}

fn classify(raw: RawResponse) -> Result<Vec<Attestation>, ApiError> {
    match raw.status {
        FetchStatus::Body(xml) => response::parse_attestations(&raw.location, &xml),
        FetchStatus::HttpError(status) => Err(ApiError::HttpStatus {
            location: raw.location,
            status,
        }),
        FetchStatus::TimedOut => Err(ApiError::Timeout {
            location: raw.location,
        }),
        FetchStatus::ConnectionFailed(reason) => Err(ApiError::Transport {
            location: raw.location,
            reason,
        }),
        FetchStatus::EmptyBody => Err(ApiError::EmptyBody {
            location: raw.location,
        }),
    }
}

/// Deduplicate by normalized form: sum frequencies, keep the first non-empty
/// example sentence, display form and location follow the highest-frequency
/// contributor.
fn merge(
    merged: &mut Vec<Attestation>,
    by_form: &mut HashMap<String, (usize, u64)>,
    incoming: Attestation,
) {
    match by_form.get_mut(&incoming.normalized_form) {
        None => {
            by_form.insert(
                incoming.normalized_form.clone(),
                (merged.len(), incoming.frequency),
            );
            merged.push(incoming);
        }
        Some((index, top_contribution)) => {
            let existing = &mut merged[*index];
            existing.frequency += incoming.frequency;
            if existing.example_sentence.is_none() {
                existing.example_sentence = incoming.example_sentence;
            }
            if incoming.frequency > *top_contribution {
                *top_contribution = incoming.frequency;
                existing.dialect_form = incoming.dialect_form;
                existing.location = incoming.location;
            }
            existing.confidence = match (existing.confidence, incoming.confidence) {
                (Some(a), Some(b)) => Some(a.max(b)),
                (a, b) => a.or(b),
            };
        }
    }
}

/// Frequency descending, dialect form ascending. The tie-break is a total
/// order, so the ranking is reproducible for any arrival order.
fn rank(attestations: &mut [Attestation]) {
    attestations.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then_with(|| a.dialect_form.cmp(&b.dialect_form))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn att(form: &str, frequency: u64, location: &str) -> Attestation {
        Attestation::new(form, frequency, None, location, None)
    }

    #[test]
    fn rank_orders_by_frequency_then_form() {
        let mut attestations = vec![
            att("Ebiere", 12, "a"),
            att("Äbirn", 493, "b"),
            att("Ebbern", 210, "c"),
            att("Aal", 210, "d"),
        ];
        rank(&mut attestations);
        let forms: Vec<_> = attestations
            .iter()
            .map(|a| a.dialect_form.as_str())
            .collect();
        assert_eq!(forms, vec!["Äbirn", "Aal", "Ebbern", "Ebiere"]);
    }

    #[test]
    fn merge_sums_frequencies_and_keeps_first_example() {
        let mut merged = Vec::new();
        let mut by_form = HashMap::new();
        merge(
            &mut merged,
            &mut by_form,
            Attestation::new("Kimmerli", 4, None, "Windsbach", None),
        );
        merge(
            &mut merged,
            &mut by_form,
            Attestation::new(
                "Kimmerli",
                9,
                Some("a Kimmerli im Goadn".to_string()),
                "Merkendorf",
                Some(0.8),
            ),
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].frequency, 13);
        assert_eq!(
            merged[0].example_sentence.as_deref(),
            Some("a Kimmerli im Goadn")
        );
        // Display location follows the highest single contributor.
        assert_eq!(merged[0].location, "Merkendorf");
        assert_eq!(merged[0].confidence, Some(0.8));
    }
}
