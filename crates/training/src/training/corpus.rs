//! Corpus loading.
//!
//! A corpus is an ordered list of documents. Files are read whole as UTF-8,
//! directories contribute their regular files sorted by path so that the
//! document order is stable between runs.

use charpair_core::{CharPairError, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// How loaded text is split into documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CorpusUnit {
    /// One document per file
    #[default]
    Document,
    /// One document per line, line terminators dropped
    Line,
}

/// Ordered collection of training documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    documents: Vec<String>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a corpus from in-memory documents.
    pub fn from_documents<I, S>(documents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            documents: documents.into_iter().map(Into::into).collect(),
        }
    }

    /// Load files and directories in the given order.
    pub fn from_paths<P: AsRef<Path>>(paths: &[P], unit: CorpusUnit) -> Result<Self> {
        let mut corpus = Self::new();
        for path in paths {
            for file in collect_files(path.as_ref())? {
                let text = fs::read_to_string(&file).map_err(|err| CharPairError::Io {
                    path: file.clone(),
                    err,
                })?;
                debug!("Read {} bytes from {}", text.len(), file.display());
                corpus.push_text(&text, unit);
            }
        }
        Ok(corpus)
    }

    /// Append text as one document or as one document per line.
    pub fn push_text(&mut self, text: &str, unit: CorpusUnit) {
        match unit {
            CorpusUnit::Document => self.documents.push(text.to_string()),
            CorpusUnit::Line => self.documents.extend(text.lines().map(str::to_string)),
        }
    }

    #[inline]
    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    pub fn into_documents(self) -> Vec<String> {
        self.documents
    }

    /// Number of documents.
    #[inline]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Total number of characters over all documents.
    pub fn total_chars(&self) -> usize {
        self.documents.iter().map(|d| d.chars().count()).sum()
    }
}

/// Expand a path into the files it names. Directories are not descended
/// into recursively.
fn collect_files(path: &Path) -> Result<Vec<PathBuf>> {
    let io_err = |err: std::io::Error| CharPairError::Io {
        path: path.to_path_buf(),
        err,
    };

    let meta = fs::metadata(path).map_err(io_err)?;
    if !meta.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(path).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        if entry.file_type().map_err(io_err)?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();

    Ok(files)
}
