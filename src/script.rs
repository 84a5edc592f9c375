//! Primary script detection for corrected text

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Gujarati Unicode block
pub const GUJARATI_BLOCK: RangeInclusive<char> = '\u{0A80}'..='\u{0AFF}';

/// Share of non-space characters that must fall in the block
const PRIMARY_SCRIPT_THRESHOLD: f64 = 0.5;

/// Dominant script of a document. Only two outcomes exist; there is no mixed tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "gu")]
    Gujarati,
    #[serde(rename = "en")]
    English,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Gujarati => "gu",
            Self::English => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Fraction of non-space characters that lie in the Gujarati block.
///
/// Only U+0020 is stripped from the denominator, which is floored at 1.
pub fn primary_script_ratio(text: &str) -> f64 {
    let gujarati = text.chars().filter(|c| GUJARATI_BLOCK.contains(c)).count();
    let total = text.chars().filter(|&c| c != ' ').count();

    gujarati as f64 / total.max(1) as f64
}

pub fn classify_script(text: &str) -> Language {
    if primary_script_ratio(text) > PRIMARY_SCRIPT_THRESHOLD {
        Language::Gujarati
    } else {
        Language::English
    }
}
