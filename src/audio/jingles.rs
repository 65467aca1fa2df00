//! Jingle library: the candidate audio files for the automatic cue.
//!
//! The library is replaced wholesale when the operator picks a new set of
//! files; there is no incremental add or remove. File existence and format
//! are not checked here - the analyzer degrades gracefully when a pick turns
//! out to be unreadable.

use rand::seq::SliceRandom;
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct JingleLibrary {
    files: Vec<PathBuf>,
}

impl JingleLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire file list unconditionally.
    pub fn set_library(&mut self, files: Vec<PathBuf>) {
        self.files = files;
    }

    /// One entry chosen uniformly at random, or `None` on an empty library.
    pub fn pick_random(&self) -> Option<&PathBuf> {
        self.files.choose(&mut rand::thread_rng())
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
