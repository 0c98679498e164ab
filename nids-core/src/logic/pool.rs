//! Sample Pool - fixed set of pre-encoded feature rows
//!
//! Rows come from the preprocessing side already label-encoded, so the pool
//! only checks shape. It is loaded once and never mutated.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rand::Rng;
use serde::Deserialize;

use crate::error::{NidsError, NidsResult};

/// On-disk layout of the pool artifact
#[derive(Debug, Clone, Deserialize)]
pub struct PoolArtifact {
    #[serde(default)]
    pub feature_names: Vec<String>,
    pub rows: Vec<Vec<f32>>,
    /// Ground truth (0 = normal, 1 = attack), only needed for evaluation
    #[serde(default)]
    pub labels: Option<Vec<u8>>,
}

#[derive(Debug, Clone)]
pub struct SamplePool {
    feature_names: Vec<String>,
    rows: Vec<Vec<f32>>,
    labels: Option<Vec<u8>>,
    width: usize,
}

impl SamplePool {
    /// Build a pool, checking every row against the expected width.
    ///
    /// The width comes from `feature_names` when present, otherwise from the
    /// first row. An empty row set is accepted here; the simulator refuses it.
    pub fn from_rows(
        feature_names: Vec<String>,
        rows: Vec<Vec<f32>>,
        labels: Option<Vec<u8>>,
    ) -> NidsResult<Self> {
        let width = if feature_names.is_empty() {
            rows.first().map(Vec::len).unwrap_or(0)
        } else {
            feature_names.len()
        };

        for (index, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(NidsError::RowWidth {
                    index,
                    found: row.len(),
                    expected: width,
                });
            }
        }

        if let Some(labels) = &labels {
            if labels.len() != rows.len() {
                return Err(NidsError::LabelCount {
                    rows: rows.len(),
                    labels: labels.len(),
                });
            }
            if let Some((index, &value)) = labels.iter().enumerate().find(|&(_, &v)| v > 1) {
                return Err(NidsError::InvalidLabel { index, value });
            }
        }

        Ok(Self {
            feature_names,
            rows,
            labels,
            width,
        })
    }

    /// Load the JSON pool artifact
    pub fn load(path: impl AsRef<Path>) -> NidsResult<Self> {
        let path = path.as_ref();
        log::info!("Loading sample pool from: {}", path.display());

        let reader = BufReader::new(File::open(path)?);
        let artifact: PoolArtifact = serde_json::from_reader(reader)?;
        let pool = Self::from_rows(artifact.feature_names, artifact.rows, artifact.labels)?;

        log::info!(
            "Sample pool loaded: {} rows x {} features (labeled: {})",
            pool.len(),
            pool.width(),
            pool.is_labeled()
        );
        Ok(pool)
    }

    /// Draw one row uniformly at random
    pub fn sample<R: Rng>(&self, rng: &mut R) -> NidsResult<(usize, &[f32])> {
        if self.rows.is_empty() {
            return Err(NidsError::EmptyPool);
        }
        let index = rng.gen_range(0..self.rows.len());
        Ok((index, &self.rows[index]))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn labels(&self) -> Option<&[u8]> {
        self.labels.as_deref()
    }

    pub fn is_labeled(&self) -> bool {
        self.labels.is_some()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.rows.iter().map(Vec::as_slice)
    }
}
