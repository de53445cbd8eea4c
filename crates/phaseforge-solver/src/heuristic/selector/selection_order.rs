//! Selection order and cache validation shared by all selectors.

use phaseforge_core::{PhaseForgeError, Result};

pub use phaseforge_config::{SelectionCacheType, SelectionOrder};

/// Direction applied to a sorter comparator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SelectionSorterOrder {
    /// Lowest first (e.g. increasing strength).
    #[default]
    Ascending,
    /// Highest first (e.g. decreasing difficulty).
    Descending,
}

impl SelectionSorterOrder {
    /// Applies this direction to an ascending comparison result.
    pub fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// Rejects orders whose caching requirement the cache type cannot meet.
///
/// `selector` names the selector in the error message.
pub fn validate_cache_type(
    selector: &str,
    order: SelectionOrder,
    cache_type: SelectionCacheType,
) -> Result<()> {
    if order.requires_caching() && cache_type < SelectionCacheType::Step {
        return Err(PhaseForgeError::Config(format!(
            "{selector}: selection order {order:?} requires a cache type of at least Step, got {cache_type:?}"
        )));
    }
    Ok(())
}
