//! Source-to-destination project name mapping.
//!
//! The mapping file is a flat YAML document:
//!
//! ```yaml
//! time-tracker: Internal Tools
//! dotfiles: Overhead
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Mapping file errors.
#[derive(Debug, Error)]
pub enum MappingError {
    /// The file could not be opened or read.
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not a flat string-to-string YAML mapping.
    #[error("invalid YAML in {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Renames source projects before they are matched against the destination.
///
/// Names without an entry pass through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ProjectMapping {
    names: HashMap<String, String>,
}

impl ProjectMapping {
    /// Loads a mapping from a YAML file.
    pub fn load(path: &Path) -> Result<Self, MappingError> {
        let contents = fs::read_to_string(path).map_err(|source| MappingError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents).map_err(|source| MappingError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses a mapping from YAML text. An empty or null document is an
    /// empty mapping.
    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str::<Option<Self>>(contents).map(Option::unwrap_or_default)
    }

    /// Returns the effective project name for `source_project`.
    pub fn resolve<'a>(&'a self, source_project: &'a str) -> &'a str {
        self.names
            .get(source_project)
            .map_or(source_project, String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ProjectMapping
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            names: iter
                .into_iter()
                .map(|(source, destination)| (source.into(), destination.into()))
                .collect(),
        }
    }
}
