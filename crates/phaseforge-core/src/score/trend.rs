//! Initializing score trend.
//!
//! Declares, per score level, how a level can move while uninitialized
//! variables get assigned. Exhaustive search uses the trend to bound scores.

use std::fmt;
use std::str::FromStr;

use super::traits::ScoreParseError;

/// How one score level evolves as more variables are initialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InitializingScoreTrendLevel {
    /// No guarantee.
    #[default]
    Any,
    /// Assigning a variable never lowers this level.
    OnlyUp,
    /// Assigning a variable never raises this level.
    OnlyDown,
}

impl FromStr for InitializingScoreTrendLevel {
    type Err = ScoreParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ANY" => Ok(Self::Any),
            "ONLY_UP" => Ok(Self::OnlyUp),
            "ONLY_DOWN" => Ok(Self::OnlyDown),
            other => Err(ScoreParseError::new(format!(
                "Unknown initializing score trend level '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for InitializingScoreTrendLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "ANY"),
            Self::OnlyUp => write!(f, "ONLY_UP"),
            Self::OnlyDown => write!(f, "ONLY_DOWN"),
        }
    }
}

/// One [`InitializingScoreTrendLevel`] per score level, hardest first.
///
/// ```
/// use phaseforge_core::{InitializingScoreTrend, InitializingScoreTrendLevel};
///
/// let trend = InitializingScoreTrend::parse("ONLY_DOWN", 2).unwrap();
/// assert!(trend.is_only_down());
///
/// let mixed = InitializingScoreTrend::parse("ONLY_DOWN/ANY", 2).unwrap();
/// assert_eq!(mixed.level(1), InitializingScoreTrendLevel::Any);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InitializingScoreTrend {
    levels: Vec<InitializingScoreTrendLevel>,
}

impl InitializingScoreTrend {
    pub fn new(levels: Vec<InitializingScoreTrendLevel>) -> Self {
        Self { levels }
    }

    /// Uses the same trend level for every score level.
    pub fn uniform(level: InitializingScoreTrendLevel, levels_count: usize) -> Self {
        Self::new(vec![level; levels_count])
    }

    /// Parses `"ONLY_DOWN"` (applied to all levels) or a slash-separated
    /// list with exactly `levels_count` entries.
    pub fn parse(s: &str, levels_count: usize) -> Result<Self, ScoreParseError> {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() == 1 {
            let level = parts[0].parse()?;
            return Ok(Self::uniform(level, levels_count));
        }
        if parts.len() != levels_count {
            return Err(ScoreParseError::new(format!(
                "Initializing score trend '{}' has {} levels, expected {}",
                s,
                parts.len(),
                levels_count
            )));
        }
        parts
            .into_iter()
            .map(str::parse)
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    pub fn levels(&self) -> &[InitializingScoreTrendLevel] {
        &self.levels
    }

    pub fn level(&self, index: usize) -> InitializingScoreTrendLevel {
        self.levels.get(index).copied().unwrap_or_default()
    }

    pub fn levels_count(&self) -> usize {
        self.levels.len()
    }

    pub fn is_only_up(&self) -> bool {
        self.levels
            .iter()
            .all(|l| *l == InitializingScoreTrendLevel::OnlyUp)
    }

    pub fn is_only_down(&self) -> bool {
        self.levels
            .iter()
            .all(|l| *l == InitializingScoreTrendLevel::OnlyDown)
    }
}
