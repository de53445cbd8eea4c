//! Iterators shared by selectors.
//!
//! [`SelectionIter`] turns a materialized candidate list into the sequence a
//! [`SelectionOrder`] asks for. Finite orders yield every candidate once;
//! `Random` and `Probabilistic` never end unless there is nothing to select.

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::seq::SliceRandom;
use rand::Rng;

use super::selection_order::SelectionOrder;
use crate::scope::SolverRng;

/// Candidate sequence for one iteration of a selector.
pub enum SelectionIter<T> {
    Finite(std::vec::IntoIter<T>),
    Random {
        items: Vec<T>,
        rng: SolverRng,
    },
    Probabilistic {
        items: Vec<T>,
        distribution: WeightedIndex<f64>,
        rng: SolverRng,
    },
}

impl<T> SelectionIter<T> {
    /// Orders `items` for one pass.
    ///
    /// `weights` is only read for `Probabilistic`; a missing or unusable
    /// weight vector (all zero, negative, wrong length) selects nothing.
    /// `Sorted` items are expected to be sorted already.
    pub fn new(
        items: Vec<T>,
        order: SelectionOrder,
        weights: Option<Vec<f64>>,
        mut rng: SolverRng,
    ) -> Self {
        match order {
            SelectionOrder::Inherit | SelectionOrder::Original | SelectionOrder::Sorted => {
                Self::Finite(items.into_iter())
            }
            SelectionOrder::Shuffled => {
                let mut items = items;
                items.shuffle(&mut rng);
                Self::Finite(items.into_iter())
            }
            SelectionOrder::Random => {
                if items.is_empty() {
                    Self::empty()
                } else {
                    Self::Random { items, rng }
                }
            }
            SelectionOrder::Probabilistic => {
                let distribution = weights
                    .filter(|w| w.len() == items.len())
                    .and_then(|w| WeightedIndex::new(w).ok());
                match distribution {
                    Some(distribution) => Self::Probabilistic {
                        items,
                        distribution,
                        rng,
                    },
                    None => Self::empty(),
                }
            }
        }
    }

    pub fn empty() -> Self {
        Self::Finite(Vec::new().into_iter())
    }
}

impl<T: Clone> Iterator for SelectionIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match self {
            Self::Finite(iter) => iter.next(),
            Self::Random { items, rng } => {
                let idx = rng.random_range(0..items.len());
                items.get(idx).cloned()
            }
            Self::Probabilistic {
                items,
                distribution,
                rng,
            } => items.get(distribution.sample(rng)).cloned(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::Finite(iter) => iter.size_hint(),
            _ => (usize::MAX, None),
        }
    }
}

/// One of two iterator types with the same item.
pub enum EitherIter<L, R> {
    Left(L),
    Right(R),
}

impl<T, L, R> Iterator for EitherIter<L, R>
where
    L: Iterator<Item = T>,
    R: Iterator<Item = T>,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match self {
            Self::Left(iter) => iter.next(),
            Self::Right(iter) => iter.next(),
        }
    }
}

/// Upper bound on items taken from a child per parent element.
///
/// A never-ending child contributes a single element per parent element so
/// the parent keeps advancing.
pub(crate) fn per_element_limit(child_never_ending: bool) -> usize {
    if child_never_ending {
        1
    } else {
        usize::MAX
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn rng() -> SolverRng {
        SolverRng::seed_from_u64(7)
    }

    #[test]
    fn test_original_yields_all_once() {
        let items: Vec<_> = SelectionIter::new(vec![1, 2, 3], SelectionOrder::Original, None, rng()).collect();
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[test]
    fn test_shuffled_is_a_permutation() {
        let mut items: Vec<_> =
            SelectionIter::new((0..20).collect(), SelectionOrder::Shuffled, None, rng()).collect();
        items.sort_unstable();
        assert_eq!(items, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_random_never_ends_unless_empty() {
        let picked: Vec<_> = SelectionIter::new(vec![1, 2], SelectionOrder::Random, None, rng())
            .take(50)
            .collect();
        assert_eq!(picked.len(), 50);
        assert!(picked.iter().all(|v| *v == 1 || *v == 2));

        let mut empty = SelectionIter::<i32>::new(Vec::new(), SelectionOrder::Random, None, rng());
        assert_eq!(empty.next(), None);
    }

    #[test]
    fn test_probabilistic_respects_zero_weights() {
        let picked: Vec<_> = SelectionIter::new(
            vec!['a', 'b', 'c'],
            SelectionOrder::Probabilistic,
            Some(vec![0.0, 1.0, 0.0]),
            rng(),
        )
        .take(20)
        .collect();
        assert!(picked.iter().all(|c| *c == 'b'));

        let mut unusable = SelectionIter::new(
            vec!['a'],
            SelectionOrder::Probabilistic,
            Some(vec![0.0]),
            rng(),
        );
        assert_eq!(unusable.next(), None);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let a: Vec<_> = SelectionIter::new((0..10).collect(), SelectionOrder::Random, None, rng())
            .take(10)
            .collect();
        let b: Vec<_> = SelectionIter::new((0..10).collect(), SelectionOrder::Random, None, rng())
            .take(10)
            .collect();
        assert_eq!(a, b);
    }
}
