use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::core::error::StoreError;

/// Links that have already been notified, mirrored to a JSON array on disk.
///
/// Every `add` rewrites the whole file. There is no temp-file rename, so a crash
/// mid-write can leave a truncated file; `load` then starts from an empty set.
#[derive(Debug)]
pub struct SeenStore {
    path: PathBuf,
    links: HashSet<String>,
}

impl SeenStore {
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let links = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<Vec<String>>(&bytes) {
                Ok(list) => list.into_iter().collect(),
                Err(e) => {
                    tracing::warn!(
                        "Seen store {} is corrupt ({}), starting empty",
                        path.display(),
                        e
                    );
                    HashSet::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No seen store at {}, starting empty", path.display());
                HashSet::new()
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to read seen store {} ({}), starting empty",
                    path.display(),
                    e
                );
                HashSet::new()
            }
        };

        tracing::info!("Loaded {} seen links from {}", links.len(), path.display());
        Self { path, links }
    }

    pub fn contains(&self, link: &str) -> bool {
        self.links.contains(link)
    }

    /// Inserts `link` and persists the full set. Returns whether the link was new.
    ///
    /// The in-memory set keeps the link even if the write fails.
    pub async fn add(&mut self, link: &str) -> Result<bool, StoreError> {
        let inserted = self.links.insert(link.to_string());
        if inserted {
            self.save().await?;
        }
        Ok(inserted)
    }

    pub async fn save(&self) -> Result<(), StoreError> {
        let mut list: Vec<&String> = self.links.iter().collect();
        list.sort();
        let json = serde_json::to_vec(&list)?;

        tokio::fs::write(&self.path, json)
            .await
            .map_err(|source| StoreError::Write {
                path: self.path.display().to_string(),
                source,
            })
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
