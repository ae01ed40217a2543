//! In-memory nearest-neighbor index over course embeddings
//!
//! The index holds fixed-dimension vectors keyed by course identifier,
//! supporting bulk load and k-nearest-neighbor queries by Euclidean
//! distance. Loads are non-incremental rebuilds: a new snapshot is built
//! off to the side and published with a single reference swap, so readers
//! observe either the fully-old or fully-new index, never a partial one.

use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use crate::models::Course;

/// Error type for index operations
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// A query vector's length did not match the index dimension
    #[error("Query vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Result type for index operations
pub type Result<T> = std::result::Result<T, IndexError>;

/// One course's entry in the index: identifier, embedding, and the course
/// metadata the post-filter ranks on
#[derive(Debug, Clone)]
pub struct IndexEntry {
    /// Course identifier
    pub id: String,

    /// Embedding vector; must match the index dimension to be loaded
    pub vector: Vec<f32>,

    /// Course metadata returned with query results
    pub course: Course,
}

/// A neighbor returned by a query
#[derive(Debug, Clone)]
pub struct Neighbor {
    /// Course identifier
    pub id: String,

    /// Euclidean distance to the query vector (smaller = more similar)
    pub distance: f32,

    /// Course metadata
    pub course: Course,
}

/// Immutable index state, swapped wholesale on load
#[derive(Debug, Default)]
struct IndexSnapshot {
    entries: Vec<IndexEntry>,
}

/// Nearest-neighbor index over course embeddings.
///
/// Readers clone the current snapshot `Arc` and query it without holding
/// the lock, so a concurrent `load` never blocks or tears a query.
#[derive(Debug)]
pub struct EmbeddingIndex {
    dimension: usize,
    snapshot: RwLock<Arc<IndexSnapshot>>,
}

impl EmbeddingIndex {
    /// Create an empty index for vectors of the given dimension
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            snapshot: RwLock::new(Arc::new(IndexSnapshot::default())),
        }
    }

    /// The dimension every stored and queried vector must have
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Bulk-load the index, replacing its previous contents.
    ///
    /// Entries whose vector length does not match the index dimension are
    /// skipped with a warning, not silently dropped. If no valid entries
    /// remain the index is left empty and queries return empty results.
    ///
    /// Returns the number of entries loaded.
    pub fn load(&self, entries: Vec<IndexEntry>) -> usize {
        let total = entries.len();
        let mut valid = Vec::with_capacity(total);

        for entry in entries {
            if entry.vector.len() != self.dimension {
                warn!(
                    id = %entry.id,
                    expected = self.dimension,
                    actual = entry.vector.len(),
                    "skipping index entry with mismatched embedding dimension"
                );
                continue;
            }
            valid.push(entry);
        }

        if valid.is_empty() {
            warn!("no valid embeddings to load; index left empty");
        } else {
            debug!(loaded = valid.len(), skipped = total - valid.len(), "index rebuilt");
        }

        let count = valid.len();
        let next = Arc::new(IndexSnapshot { entries: valid });

        let mut guard = self
            .snapshot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = next;

        count
    }

    /// Query the `k` nearest neighbors of `vector` by ascending Euclidean
    /// distance, ties broken by insertion order.
    ///
    /// Fails with [`IndexError::DimensionMismatch`] when the query vector
    /// has the wrong length; the index is left unmodified. An empty index
    /// yields an empty result, never an error.
    pub fn query(&self, vector: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if vector.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }

        let snapshot = self.current();
        if snapshot.entries.is_empty() {
            warn!("embedding index is empty; returning no neighbors");
            return Ok(Vec::new());
        }

        let mut scored: Vec<(usize, f32)> = snapshot
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (i, euclidean_distance(vector, &entry.vector)))
            .collect();

        // Stable sort keeps insertion order among equal distances
        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(i, distance)| {
                let entry = &snapshot.entries[i];
                Neighbor {
                    id: entry.id.clone(),
                    distance,
                    course: entry.course.clone(),
                }
            })
            .collect())
    }

    /// Number of vectors currently held
    pub fn len(&self) -> usize {
        self.current().entries.len()
    }

    /// Whether the index holds no vectors
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn current(&self) -> Arc<IndexSnapshot> {
        self.snapshot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

/// Euclidean (L2) distance between two equal-length vectors
fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}
