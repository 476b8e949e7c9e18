//! Known public images: the set the CDN rewriter is allowed to touch.
//!
//! Populated once per build by walking `<public_dir>/images`, then
//! read-only. Each file is recorded twice: `/images/a.png` and
//! `images/a.png`, so either reference style matches.

use std::collections::BTreeSet;
use std::path::{Component, Path};

pub const IMAGES_DIR: &str = "images";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageIndex {
    paths: BTreeSet<String>,
}

impl ImageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk `<public_dir>/images` and record every regular file.
    /// Directories that cannot be read (missing, permissions) are skipped.
    pub fn collect_from(public_dir: &Path) -> Self {
        let mut index = Self::new();
        let mut stack = vec![public_dir.join(IMAGES_DIR)];

        while let Some(dir) = stack.pop() {
            let entries = match std::fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) => {
                    log::debug!("images: skipping {}: {e}", dir.display());
                    continue;
                }
            };

            for entry in entries.flatten() {
                let Ok(file_type) = entry.file_type() else {
                    continue;
                };
                let full = entry.path();
                if file_type.is_dir() {
                    stack.push(full);
                } else if file_type.is_file() {
                    if let Some(rel) = public_relative(public_dir, &full) {
                        index.insert(&rel);
                    }
                }
            }
        }

        log::debug!(
            "images: indexed {} files under {}",
            index.file_count(),
            public_dir.display()
        );
        index
    }

    /// Record a public-relative path such as `images/a.png`.
    pub fn insert(&mut self, rel: &str) {
        let rel = rel.trim_start_matches('/');
        self.paths.insert(format!("/{rel}"));
        self.paths.insert(rel.to_string());
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// Number of distinct files (each file is stored in two forms).
    pub fn file_count(&self) -> usize {
        self.paths.iter().filter(|p| p.starts_with('/')).count()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for ImageIndex {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut index = Self::new();
        for rel in iter {
            index.insert(rel);
        }
        index
    }
}

/// `full` relative to `base`, joined with forward slashes.
fn public_relative(base: &Path, full: &Path) -> Option<String> {
    let rel = full.strip_prefix(base).ok()?;
    let parts: Option<Vec<&str>> = rel
        .components()
        .map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect();
    Some(parts?.join("/"))
}
