//! Script resource naming and lookup for auto-script migrations

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Which half of a migration a script implements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScriptDirection {
    Up,
    Down,
}

impl fmt::Display for ScriptDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptDirection::Up => f.write_str("Up"),
            ScriptDirection::Down => f.write_str("Down"),
        }
    }
}

const GENERIC: &str = "Generic";

/// Candidate script names, most specific first.
///
/// `Scripts.{Up|Down}.{version}_{name}_{dialect}.sql` for the dialect
/// identity, then one per alias in registration order, then the `Generic`
/// fallback. Without a dialect only the fallback is produced.
pub fn auto_name_candidates(
    direction: ScriptDirection,
    version: i64,
    migration_name: &str,
    dialect: Option<&str>,
    aliases: &[String],
) -> Vec<String> {
    let mut suffixes: Vec<&str> = Vec::with_capacity(aliases.len() + 2);
    if let Some(dialect) = dialect {
        suffixes.push(dialect);
        suffixes.extend(aliases.iter().map(String::as_str));
    }
    suffixes.push(GENERIC);

    suffixes
        .into_iter()
        .map(|suffix| {
            format!(
                "Scripts.{}.{}_{}_{}.sql",
                direction, version, migration_name, suffix
            )
        })
        .collect()
}

/// A located script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptResource {
    pub name: String,
    pub text: String,
}

/// Source of script text for auto-script migrations
pub trait ScriptProvider: Send + Sync {
    /// Return the first candidate that exists
    fn find(&self, candidates: &[String]) -> CoreResult<Option<ScriptResource>>;
}

/// Scripts held in memory, keyed by resource name
#[derive(Debug, Clone, Default)]
pub struct InMemoryScripts {
    scripts: HashMap<String, String>,
}

impl InMemoryScripts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.scripts.insert(name.into(), text.into());
    }
}

impl ScriptProvider for InMemoryScripts {
    fn find(&self, candidates: &[String]) -> CoreResult<Option<ScriptResource>> {
        Ok(candidates.iter().find_map(|candidate| {
            self.scripts.get(candidate).map(|text| ScriptResource {
                name: candidate.clone(),
                text: text.clone(),
            })
        }))
    }
}

/// Scripts stored as files under a directory.
///
/// A file matches a candidate when its name equals the candidate or ends
/// with `.{candidate}` (ASCII case-insensitive), so `0001.Scripts.Up...sql`
/// style prefixes are allowed.
#[derive(Debug, Clone)]
pub struct DirectoryScripts {
    root: PathBuf,
}

impl DirectoryScripts {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_names(&self) -> CoreResult<Vec<String>> {
        let entries = std::fs::read_dir(&self.root).map_err(|e| CoreError::ScriptRead {
            path: self.root.display().to_string(),
            source: e,
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

fn matches_candidate(file_name: &str, candidate: &str) -> bool {
    if file_name.eq_ignore_ascii_case(candidate) {
        return true;
    }
    let file_name = file_name.to_ascii_lowercase();
    let suffix = format!(".{}", candidate.to_ascii_lowercase());
    file_name.ends_with(&suffix)
}

impl ScriptProvider for DirectoryScripts {
    fn find(&self, candidates: &[String]) -> CoreResult<Option<ScriptResource>> {
        if !self.root.is_dir() {
            log::debug!("Script directory {} does not exist", self.root.display());
            return Ok(None);
        }

        let names = self.file_names()?;
        for candidate in candidates {
            let Some(found) = names.iter().find(|n| matches_candidate(n, candidate)) else {
                continue;
            };
            let path = self.root.join(found);
            let text = std::fs::read_to_string(&path).map_err(|e| CoreError::ScriptRead {
                path: path.display().to_string(),
                source: e,
            })?;
            log::debug!("Resolved script {} to {}", candidate, path.display());
            return Ok(Some(ScriptResource {
                name: found.clone(),
                text,
            }));
        }
        Ok(None)
    }
}

#[cfg(test)]
#[path = "autoname_test.rs"]
mod tests;
