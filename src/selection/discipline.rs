//! Selection disciplines: the closed set of rules for choosing scenes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::errors::ScnError;

/// How many and which scenario files a selection picks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionDiscipline {
    /// The first `num_scenes` entries of the sorted listing.
    FirstN,
    /// A fixed-seed sample drawn without replacement.
    RandomN,
    /// The sorted listing cycled and cut to exactly `num_scenes`.
    #[default]
    PadN,
    /// The whole listing, which must hold exactly `num_scenes` entries.
    ExactN,
    /// `k_unique_scenes` sampled scenes cycled and cut to `num_scenes`.
    KUniqueN,
}

impl SelectionDiscipline {
    /// Every discipline, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::FirstN,
        Self::RandomN,
        Self::PadN,
        Self::ExactN,
        Self::KUniqueN,
    ];

    /// Stable snake_case label used in config files, logs and CLI flags.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstN => "first_n",
            Self::RandomN => "random_n",
            Self::PadN => "pad_n",
            Self::ExactN => "exact_n",
            Self::KUniqueN => "k_unique_n",
        }
    }

    /// Whether the output length is guaranteed to equal `num_scenes`.
    #[must_use]
    pub const fn fixes_output_len(self) -> bool {
        matches!(self, Self::PadN | Self::ExactN | Self::KUniqueN)
    }

    /// Whether the discipline draws from the fixed-seed sampler.
    #[must_use]
    pub const fn is_sampled(self) -> bool {
        matches!(self, Self::RandomN | Self::KUniqueN)
    }
}

impl fmt::Display for SelectionDiscipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionDiscipline {
    type Err = ScnError;

    /// Accepts `pad_n`, `PAD_N` and `pad-n` spellings.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == wanted)
            .ok_or_else(|| ScnError::ConfigParse {
                context: "discipline",
                details: format!(
                    "unknown discipline {raw:?}; expected one of first_n, random_n, pad_n, exact_n, k_unique_n"
                ),
            })
    }
}
