//! Legal vocabulary correction
//!
//! Known OCR misreadings of Gujarati and English legal terms, merged into one
//! ordered dictionary and applied as exact literal substring replacements.

use crate::error::PipelineError;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Common OCR errors in Gujarati legal documents
pub const GUJARATI_CORRECTIONS: &[(&str, &str)] = &[
    ("ફાપાલી", "ફારગતી"),           // Faragati (relinquishment)
    ("નોંધણી નં", "નોંધણી નંબર"), // Registration number
    ("સરવે નં", "સર્વે નંબર"),      // Survey number
];

/// English legal term corrections
pub const ENGLISH_CORRECTIONS: &[(&str, &str)] = &[
    ("Registation", "Registration"),
    ("Relinquishrnent", "Relinquishment"),
    ("Notarised", "Notarized"),
];

/// Ordered mapping from a wrong substring to its corrected form
#[derive(Debug, Clone, Default)]
pub struct CorrectionDictionary {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
    strict: bool,
}

impl CorrectionDictionary {
    /// Empty dictionary; `strict` makes duplicate keys an error instead of
    /// letting the later table win
    pub fn new(strict: bool) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            strict,
        }
    }

    /// Built-in Gujarati and English tables, merged in that order
    pub fn legal(strict: bool) -> Result<Self, PipelineError> {
        let mut dictionary = Self::new(strict);
        dictionary.merge(GUJARATI_CORRECTIONS.iter().copied())?;
        dictionary.merge(ENGLISH_CORRECTIONS.iter().copied())?;
        Ok(dictionary)
    }

    /// Merge a table into the dictionary.
    ///
    /// A key that already exists keeps its position and takes the new value,
    /// unless the dictionary is strict.
    pub fn merge<I, K, V>(&mut self, table: I) -> Result<(), PipelineError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (wrong, right) in table {
            let wrong = wrong.into();
            let right = right.into();

            if wrong.is_empty() {
                return Err(PipelineError::InvalidInput(
                    "Correction dictionary keys must not be empty".to_string(),
                ));
            }

            match self.index.get(&wrong).copied() {
                Some(position) => {
                    if self.strict {
                        return Err(PipelineError::DictionaryConflict { key: wrong });
                    }
                    tracing::warn!(
                        "Correction for '{}' redefined: '{}' replaces '{}'",
                        wrong,
                        right,
                        self.entries[position].1
                    );
                    self.entries[position].1 = right;
                }
                None => {
                    self.index.insert(wrong.clone(), self.entries.len());
                    self.entries.push((wrong, right));
                }
            }
        }

        Ok(())
    }

    /// Merge a JSON object file of `{"wrong": "right"}` pairs, appended in key order
    pub fn merge_file(&mut self, path: &Path) -> Result<(), PipelineError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::InitializationError(format!(
                "Failed to read dictionary {}: {}",
                path.display(),
                e
            ))
        })?;

        let table: BTreeMap<String, String> = serde_json::from_str(&raw).map_err(|e| {
            PipelineError::InitializationError(format!(
                "Failed to parse dictionary {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::info!(
            "Loaded {} corrections from {}",
            table.len(),
            path.display()
        );

        self.merge(table)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, wrong: &str) -> Option<&str> {
        self.index
            .get(wrong)
            .map(|&position| self.entries[position].1.as_str())
    }

    /// Entries in replacement order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(wrong, right)| (wrong.as_str(), right.as_str()))
    }

    pub fn apply(&self, text: &str) -> (String, usize) {
        apply_corrections(text, self)
    }
}

/// Replace every occurrence of each dictionary key, in dictionary order.
///
/// The count is the number of distinct entries that matched, not the number of
/// occurrences replaced.
pub fn apply_corrections(text: &str, dictionary: &CorrectionDictionary) -> (String, usize) {
    let mut corrected = text.to_string();
    let mut count = 0;

    for (wrong, right) in dictionary.iter() {
        if corrected.contains(wrong) {
            corrected = corrected.replace(wrong, right);
            count += 1;
        }
    }

    (corrected, count)
}
