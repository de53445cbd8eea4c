//! The `level_score!` macro behind every integral score type.

/// Defines a score made of named `i64` levels, hardest level first.
///
/// Each level carries its [`ScoreLevel`](crate::score::ScoreLevel) label and
/// the suffix used by the textual form. An empty suffix gives the bare
/// number format of single-level scores. The feasibility rule is written
/// against the struct fields.
///
/// The generated type gets a `ZERO` constant, an `of` constructor taking
/// every level in order, one getter per level, lexicographic ordering,
/// level-wise arithmetic, `Score`, `ParseableScore`, `Display` and `Debug`.
///
/// ```ignore
/// level_score! {
///     /// Hard constraints first, then soft.
///     HardSoftScore { hard: Hard => "hard", soft: Soft => "soft" }
///     feasible: |s| s.hard >= 0;
/// }
/// ```
macro_rules! level_score {
    (
        $(#[$meta:meta])*
        $type:ident { $($field:ident: $label:ident => $suffix:literal),+ $(,)? }
        feasible: |$s:ident| $feasible:expr;
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $type {
            $($field: i64),+
        }

        impl $type {
            pub const ZERO: $type = $type { $($field: 0),+ };

            const LABELS: &'static [$crate::score::ScoreLevel] =
                &[$($crate::score::ScoreLevel::$label),+];

            const SUFFIXES: &'static [&'static str] = &[$($suffix),+];

            #[inline]
            pub const fn of($($field: i64),+) -> Self {
                $type { $($field),+ }
            }

            $(
                #[inline]
                pub const fn $field(&self) -> i64 {
                    self.$field
                }
            )+

            fn levels(&self) -> impl Iterator<Item = i64> {
                [$(self.$field),+].into_iter()
            }

            fn from_levels(levels: &mut impl Iterator<Item = i64>) -> Self {
                $type { $($field: levels.next().unwrap_or_default()),+ }
            }

            fn zip_levels(self, other: Self, f: impl Fn(i64, i64) -> i64) -> Self {
                $type { $($field: f(self.$field, other.$field)),+ }
            }
        }

        impl Ord for $type {
            fn cmp(&self, other: &Self) -> std::cmp::Ordering {
                self.levels().cmp(other.levels())
            }
        }

        impl PartialOrd for $type {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl std::ops::Add for $type {
            type Output = Self;

            fn add(self, other: Self) -> Self {
                self.zip_levels(other, |a, b| a + b)
            }
        }

        impl std::ops::Sub for $type {
            type Output = Self;

            fn sub(self, other: Self) -> Self {
                self.zip_levels(other, |a, b| a - b)
            }
        }

        impl std::ops::Neg for $type {
            type Output = Self;

            fn neg(self) -> Self {
                Self::ZERO - self
            }
        }

        impl $crate::score::Score for $type {
            #[inline]
            fn is_feasible(&self) -> bool {
                let $s = self;
                $feasible
            }

            #[inline]
            fn zero() -> Self {
                Self::ZERO
            }

            #[inline]
            fn levels_count() -> usize {
                Self::LABELS.len()
            }

            fn to_level_numbers(&self) -> Vec<i64> {
                self.levels().collect()
            }

            fn from_level_numbers(levels: &[i64]) -> Self {
                assert_eq!(
                    levels.len(),
                    Self::LABELS.len(),
                    "{} requires exactly {} levels",
                    stringify!($type),
                    Self::LABELS.len()
                );
                Self::from_levels(&mut levels.iter().copied())
            }

            fn multiply(&self, multiplicand: f64) -> Self {
                $crate::score::Score::map_levels(self, |_, level| {
                    (level as f64 * multiplicand).round() as i64
                })
            }

            fn divide(&self, divisor: f64) -> Self {
                $crate::score::Score::map_levels(self, |_, level| {
                    (level as f64 / divisor).round() as i64
                })
            }

            fn abs(&self) -> Self {
                $crate::score::Score::map_levels(self, |_, level| level.abs())
            }

            fn level_label(index: usize) -> $crate::score::ScoreLevel {
                match Self::LABELS.get(index) {
                    Some(label) => *label,
                    None => panic!(
                        "{} has {} levels, got index {}",
                        stringify!($type),
                        Self::LABELS.len(),
                        index
                    ),
                }
            }
        }

        impl $crate::score::ParseableScore for $type {
            fn parse(text: &str) -> Result<Self, $crate::score::ScoreParseError> {
                use $crate::score::ScoreParseError;

                let text = text.trim();
                let parts: Vec<&str> = text.split('/').map(str::trim).collect();
                if parts.len() != Self::SUFFIXES.len() {
                    return Err(ScoreParseError::new(format!(
                        "Invalid {} '{}': expected {} parts separated by '/'",
                        stringify!($type),
                        text,
                        Self::SUFFIXES.len()
                    )));
                }
                let mut levels = Vec::with_capacity(parts.len());
                for (part, suffix) in parts.iter().zip(Self::SUFFIXES) {
                    let digits = part.strip_suffix(*suffix).ok_or_else(|| {
                        ScoreParseError::new(format!("level '{}' must end with '{}'", part, suffix))
                    })?;
                    let level = digits.parse::<i64>().map_err(|e| {
                        ScoreParseError::new(format!(
                            "Invalid {} level '{}': {}",
                            stringify!($type),
                            digits,
                            e
                        ))
                    })?;
                    levels.push(level);
                }
                Ok(Self::from_levels(&mut levels.into_iter()))
            }

            fn to_string_repr(&self) -> String {
                self.levels()
                    .zip(Self::SUFFIXES)
                    .map(|(level, suffix)| format!("{}{}", level, suffix))
                    .collect::<Vec<_>>()
                    .join("/")
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&$crate::score::ParseableScore::to_string_repr(self))
            }
        }

        impl std::fmt::Debug for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let mut tuple = f.debug_tuple(stringify!($type));
                $(tuple.field(&self.$field);)+
                tuple.finish()
            }
        }
    };
}
