//! Markup sources.
//!
//! Fetching pages (driving a browser, scrolling until every result is
//! loaded) happens elsewhere. This crate only needs something that hands
//! back the final markup for a page key, which is what [`MarkupSource`]
//! describes.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::ScrapeError;

/// Identifies one page to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Stable key for the page (e.g. a city slug or destination id).
    pub key: String,
    /// URL the page was or will be fetched from, if known.
    pub url: Option<String>,
}

impl PageRequest {
    /// Creates a request for `key`.
    #[must_use]
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_owned(),
            url: None,
        }
    }

    /// Creates a request keyed by a slug of `label` (lowercase, spaces
    /// replaced by underscores).
    #[must_use]
    pub fn for_label(label: &str) -> Self {
        Self::new(&slug(label))
    }

    /// Records the page URL.
    #[must_use]
    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_owned());
        self
    }
}

/// Lowercases `label` and joins its words with underscores.
#[must_use]
pub fn slug(label: &str) -> String {
    label
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Anything that can return the markup of a page.
pub trait MarkupSource {
    /// Returns the raw markup for `request`.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::PageNotFound`] if the source has no such page,
    /// or another [`ScrapeError`] if reading it fails.
    fn fetch(&self, request: &PageRequest) -> Result<String, ScrapeError>;
}

/// Reads saved pages from `<root>/<key>.html`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    extension: String,
}

impl DirectorySource {
    /// Creates a source rooted at `root`.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            extension: "html".to_owned(),
        }
    }

    /// Overrides the file extension (without the dot).
    #[must_use]
    pub fn with_extension(mut self, extension: &str) -> Self {
        extension.clone_into(&mut self.extension);
        self
    }

    /// Returns the file path backing `request`.
    #[must_use]
    pub fn path_for(&self, request: &PageRequest) -> PathBuf {
        self.root
            .join(format!("{}.{}", request.key, self.extension))
    }
}

impl MarkupSource for DirectorySource {
    fn fetch(&self, request: &PageRequest) -> Result<String, ScrapeError> {
        let path = self.path_for(request);
        if !path.is_file() {
            return Err(ScrapeError::PageNotFound {
                key: request.key.clone(),
            });
        }
        let markup = std::fs::read_to_string(&path)?;
        log::debug!(
            "Loaded '{}' from {} ({} bytes)",
            request.key,
            path.display(),
            markup.len()
        );
        Ok(markup)
    }
}

/// In-memory pages keyed by request key.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    pages: BTreeMap<String, String>,
}

impl StaticSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a page.
    #[must_use]
    pub fn with_page(mut self, key: &str, markup: &str) -> Self {
        self.pages.insert(key.to_owned(), markup.to_owned());
        self
    }
}

impl MarkupSource for StaticSource {
    fn fetch(&self, request: &PageRequest) -> Result<String, ScrapeError> {
        self.pages
            .get(&request.key)
            .cloned()
            .ok_or_else(|| ScrapeError::PageNotFound {
                key: request.key.clone(),
            })
    }
}
