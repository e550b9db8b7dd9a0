// Notebook references and suites
// A suite is an ordered list of remotely hosted notebooks to smoke-test.

use serde::{Deserialize, Serialize};

use super::error::{DomainError, Result};

const EDEN_EXAMPLES_BASE: &str =
    "https://raw.githubusercontent.com/fabriziocosta/EDeN_examples/master/";
const GRAPHLEARN_EXAMPLES_BASE: &str =
    "https://raw.githubusercontent.com/smautner/GraphLearn_examples/master/notebooks/";

/// Reference to a single remotely hosted notebook.
///
/// Immutable pair of (raw-content base URL, local filename). The full
/// download URL is the base joined with the filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotebookRef {
    base_url: String,
    filename: String,
}

impl NotebookRef {
    /// Create a notebook reference from a base URL and filename.
    ///
    /// # Errors
    /// - `DomainError::InvalidFilename` if the filename is empty or
    ///   contains path separators (the file must land directly in the
    ///   working directory)
    /// - `DomainError::InvalidUrl` if the base URL is not http(s)
    pub fn new(base_url: impl Into<String>, filename: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        let filename = filename.into();

        if filename.is_empty() || filename.contains('/') || filename.contains('\\') {
            return Err(DomainError::InvalidFilename(filename));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(DomainError::InvalidUrl(base_url));
        }

        Ok(Self { base_url, filename })
    }

    /// Create a notebook reference from a full URL, deriving the local
    /// filename from the last path segment.
    pub fn from_url(url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        let (base, filename) = url
            .rsplit_once('/')
            .ok_or_else(|| DomainError::InvalidUrl(url.clone()))?;
        Self::new(format!("{base}/"), filename)
    }

    /// Full download URL.
    pub fn url(&self) -> String {
        format!("{}{}", self.base_url, self.filename)
    }

    /// Local filename the notebook is fetched to.
    pub fn filename(&self) -> &str {
        &self.filename
    }
}

/// A named, ordered list of notebooks processed sequentially.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suite {
    pub name: String,
    pub notebooks: Vec<NotebookRef>,
}

impl Suite {
    pub fn new(name: impl Into<String>, notebooks: Vec<NotebookRef>) -> Self {
        Self {
            name: name.into(),
            notebooks,
        }
    }

    /// Look up a builtin suite by name.
    ///
    /// # Errors
    /// - `DomainError::UnknownSuite` if no builtin suite has that name
    pub fn builtin(name: &str) -> Result<Self> {
        builtin_suites()
            .into_iter()
            .find(|s| s.name == name)
            .ok_or_else(|| DomainError::UnknownSuite(name.to_string()))
    }
}

/// The builtin suites, mirroring the notebook sets this runner has
/// always smoke-tested.
pub fn builtin_suites() -> Vec<Suite> {
    vec![
        Suite::new(
            "eden-examples",
            vec![
                NotebookRef::new(EDEN_EXAMPLES_BASE, "Nearest_Neighbors_and_Gram_Matrix.ipynb")
                    .expect("builtin notebook ref is valid"),
            ],
        ),
        Suite::new(
            "graphlearn-examples",
            vec![NotebookRef::new(GRAPHLEARN_EXAMPLES_BASE, "cascade.ipynb")
                .expect("builtin notebook ref is valid")],
        ),
    ]
}
