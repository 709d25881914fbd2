//! Titles the blog has already covered, and the filter that keeps them out of
//! the next selection.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::models::NewsCandidate;

pub const MAX_USED_TITLES: usize = 50;

/// Most-recent-last list of covered titles, capped at [`MAX_USED_TITLES`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsedTitles {
    titles: Vec<String>,
}

impl UsedTitles {
    /// A missing file is an empty history. An unreadable one is logged and
    /// also treated as empty so a corrupt state file never blocks a run.
    pub fn load(path: &Path) -> Self {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No used-titles file yet - path={}", path.display());
                return Self::default();
            }
            Err(e) => {
                warn!("Could not read used-titles file - path={}, error={}", path.display(), e);
                return Self::default();
            }
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(titles) => {
                let mut log = Self { titles };
                log.truncate();
                debug!("Loaded used titles - count={}", log.titles.len());
                log
            }
            Err(e) => {
                warn!("Ignoring malformed used-titles file - path={}, error={}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn contains(&self, title: &str) -> bool {
        self.titles.iter().any(|t| t == title)
    }

    pub fn push(&mut self, title: impl Into<String>) {
        self.titles.push(title.into());
        self.truncate();
    }

    fn truncate(&mut self) {
        if self.titles.len() > MAX_USED_TITLES {
            let excess = self.titles.len() - MAX_USED_TITLES;
            self.titles.drain(..excess);
        }
    }

    /// Up to `n` titles, newest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &str> {
        self.titles.iter().rev().take(n).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    /// Writes through a sibling temp file and renames it into place.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(&self.titles)?;
        write_atomic(path, &json)
            .with_context(|| format!("persisting used titles to {}", path.display()))?;
        info!("Used titles persisted - count={}, path={}", self.titles.len(), path.display());
        Ok(())
    }

    /// Candidates whose title was never used. Exact, case-sensitive match.
    pub fn filter_unused(&self, candidates: Vec<NewsCandidate>) -> Vec<NewsCandidate> {
        let before = candidates.len();
        let kept: Vec<_> = candidates
            .into_iter()
            .filter(|c| !self.contains(&c.title))
            .collect();
        let removed = before - kept.len();
        if removed > 0 {
            info!("Deduplication - removed={} used titles, retained={}", removed, kept.len());
        } else {
            debug!("Deduplication - nothing removed, retained={}", kept.len());
        }
        kept
    }
}

pub fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(format!(".tmp{}", std::process::id()));
    let tmp = path.with_file_name(tmp_name);
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)
}
