// src/exec/copy.rs

//! The copy primitive behind every sync operation.
//!
//! Copies a source tree into a destination, keeping relative paths. Include
//! globs are matched against the path relative to the source root with a
//! leading `/` (so `/static/**` selects `<source>/static/...`). An empty
//! include list selects every file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, trace};

use crate::exec::hash::same_content;
use crate::fs::FileSystem;

/// What a copy did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyReport {
    /// Files written to the destination.
    pub copied: usize,
    /// Files skipped because the destination already had the same content.
    pub up_to_date: usize,
}

impl CopyReport {
    fn merge(&mut self, other: CopyReport) {
        self.copied += other.copied;
        self.up_to_date += other.up_to_date;
    }
}

/// Compiled include filter. `None` inside means "match everything".
#[derive(Debug, Clone)]
pub struct IncludeFilter {
    set: Option<GlobSet>,
}

impl IncludeFilter {
    pub fn new(patterns: &[String]) -> Result<Self> {
        if patterns.is_empty() {
            return Ok(Self { set: None });
        }
        Ok(Self {
            set: Some(build_globset(patterns)?),
        })
    }

    /// `rel_path` uses forward slashes and starts with `/`.
    pub fn matches(&self, rel_path: &str) -> bool {
        match &self.set {
            Some(set) => set.is_match(rel_path),
            None => true,
        }
    }
}

/// Copy every source tree into `destination`.
///
/// Missing source directories are skipped (there is nothing to sync yet).
pub fn copy_trees(
    fs: &dyn FileSystem,
    sources: &[PathBuf],
    destination: &Path,
    includes: &[String],
) -> Result<CopyReport> {
    let filter = IncludeFilter::new(includes)?;
    let mut report = CopyReport::default();
    for source in sources {
        report.merge(copy_tree(fs, source, destination, &filter)?);
    }
    Ok(report)
}

/// Copy a single source tree into `destination`.
pub fn copy_tree(
    fs: &dyn FileSystem,
    source: &Path,
    destination: &Path,
    filter: &IncludeFilter,
) -> Result<CopyReport> {
    let mut report = CopyReport::default();
    if !fs.is_dir(source) {
        debug!(source = ?source, "copy source does not exist; nothing to copy");
        return Ok(report);
    }

    for file in collect_matching_files(fs, source, filter)? {
        let rel = file
            .strip_prefix(source)
            .with_context(|| format!("{:?} is not under {:?}", file, source))?;
        let target = destination.join(rel);

        if same_content(fs, &file, &target)? {
            trace!(file = ?rel, "up to date");
            report.up_to_date += 1;
            continue;
        }

        fs.copy_file(&file, &target)?;
        trace!(from = ?file, to = ?target, "copied");
        report.copied += 1;
    }

    Ok(report)
}

/// Walk `root` and return every file whose relative path passes `filter`.
pub fn collect_matching_files(
    fs: &dyn FileSystem,
    root: &Path,
    filter: &IncludeFilter,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        for path in fs.read_dir(&dir)? {
            if fs.is_dir(&path) {
                stack.push(path);
            } else if fs.is_file(&path) {
                if let Ok(rel) = path.strip_prefix(root) {
                    let rel_str = format!("/{}", rel.to_string_lossy().replace('\\', "/"));
                    if filter.matches(&rel_str) {
                        files.push(path);
                    }
                }
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Build a GlobSet from simple string patterns.
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}
