// Directory materializer for openapi-bruno
// Writes bruno.json, one directory per folder, one .bru file per request and environment

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::bru::{environment_to_bru, request_to_bru};
use crate::error::{Error, Result};
use crate::models::{Collection, Environment, Item, Manifest};
use crate::utils::{hyphen_case, sanitize_directory_name};

pub const MANIFEST_FILE: &str = "bruno.json";
pub const ENVIRONMENTS_DIR: &str = "environments";

/// Counts of what a build wrote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub folders: usize,
    pub requests: usize,
    pub environments: usize,
}

/// Create `dir` and its parents; an existing directory is fine.
pub fn create_directory(dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() {
        return Err(Error::filesystem(dir, std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "directory path is empty",
        )));
    }
    fs::create_dir_all(dir).map_err(|e| Error::filesystem(dir, e))
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| Error::filesystem(path, e))?;
    log::debug!("wrote {}", path.display());
    Ok(())
}

/// Tracks names written into one directory so collisions can be reported.
/// The later write still replaces the earlier file.
struct Siblings<'a> {
    dir: &'a Path,
    seen: HashSet<PathBuf>,
}

impl<'a> Siblings<'a> {
    fn new(dir: &'a Path) -> Self {
        Self {
            dir,
            seen: HashSet::new(),
        }
    }

    fn claim(&mut self, name: &str) -> PathBuf {
        let path = self.dir.join(name);
        if !self.seen.insert(path.clone()) {
            log::warn!("{} is produced by more than one item; the last one wins", path.display());
        }
        path
    }
}

/// Write `collection` under `dest`.
///
/// Files already written are left in place when a later write fails.
pub fn build_directory(collection: &Collection, dest: &Path) -> Result<BuildSummary> {
    create_directory(dest)?;

    let manifest = Manifest::for_collection(sanitize_directory_name(&collection.name));
    let content = serde_json::to_string_pretty(&manifest)
        .map_err(|e| Error::CollectionParse(e.to_string()))?;
    write_file(&dest.join(MANIFEST_FILE), &content)?;

    let mut summary = BuildSummary::default();
    write_items(&collection.items, dest, &mut summary)?;
    summary.environments = write_environments(&collection.environments, dest)?;
    log::info!(
        "built {}: {} folders, {} requests, {} environments",
        dest.display(),
        summary.folders,
        summary.requests,
        summary.environments
    );
    Ok(summary)
}

fn write_items(items: &[Item], dir: &Path, summary: &mut BuildSummary) -> Result<()> {
    let mut siblings = Siblings::new(dir);
    for item in items {
        match item {
            Item::Request(req) => {
                let path = siblings.claim(&format!("{}.bru", hyphen_case(&req.filename)));
                write_file(&path, &request_to_bru(req))?;
                summary.requests += 1;
            }
            Item::Folder(folder) => {
                let path = siblings.claim(&hyphen_case(&folder.name));
                create_directory(&path)?;
                summary.folders += 1;
                write_items(&folder.items, &path, summary)?;
            }
        }
    }
    Ok(())
}

fn write_environments(environments: &[Environment], dest: &Path) -> Result<usize> {
    let dir = dest.join(ENVIRONMENTS_DIR);
    create_directory(&dir)?;
    let mut siblings = Siblings::new(&dir);
    for env in environments {
        let path = siblings.claim(&format!("{}.bru", hyphen_case(&env.name)));
        write_file(&path, &environment_to_bru(env))?;
    }
    Ok(environments.len())
}
