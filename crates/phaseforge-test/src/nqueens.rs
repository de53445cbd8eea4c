//! N-Queens problem test fixtures.
//!
//! N queens on an N×N board, one queen per column. The row of each queen is
//! the planning variable. The score counts row and diagonal conflicts.
//!
//! # Example
//!
//! ```
//! use phaseforge_scoring::ScoreDirector;
//! use phaseforge_test::nqueens::create_nqueens_director;
//!
//! let mut director = create_nqueens_director(&[0, 2, 1, 3]);
//! assert_eq!(director.calculate_score().score(), -2);
//! ```

use phaseforge_core::{
    EntityDescriptor, GenuineVariableDescriptor, PlanningSolution, SimpleScore,
    SolutionDescriptor,
};
use phaseforge_scoring::{EasyScoreCalculator, TypedScoreDirector};

/// A queen placed in a fixed column with a row to choose.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Queen {
    pub id: i64,
    pub column: i64,
    pub row: Option<i64>,
}

impl Queen {
    pub fn new(id: i64, column: i64, row: Option<i64>) -> Self {
        Self { id, column, row }
    }

    /// Creates a queen with an assigned row.
    pub fn assigned(id: i64, column: i64, row: i64) -> Self {
        Self::new(id, column, Some(row))
    }

    /// Creates a queen with no row assigned.
    pub fn unassigned(id: i64, column: i64) -> Self {
        Self::new(id, column, None)
    }
}

/// N-Queens problem solution.
#[derive(Clone, Debug, PartialEq)]
pub struct NQueensSolution {
    pub queens: Vec<Queen>,
    pub score: Option<SimpleScore>,
}

impl NQueensSolution {
    pub fn new(queens: Vec<Queen>) -> Self {
        Self {
            queens,
            score: None,
        }
    }

    /// Creates `n` queens in columns `0..n` without rows.
    pub fn uninitialized(n: usize) -> Self {
        Self::new(
            (0..n)
                .map(|i| Queen::unassigned(i as i64, i as i64))
                .collect(),
        )
    }

    /// Creates queens in columns `0..n` at the given rows.
    pub fn with_rows(rows: &[i64]) -> Self {
        Self::new(
            rows.iter()
                .enumerate()
                .map(|(i, &row)| Queen::assigned(i as i64, i as i64, row))
                .collect(),
        )
    }

    pub fn with_optional_rows(rows: &[Option<i64>]) -> Self {
        Self::new(
            rows.iter()
                .enumerate()
                .map(|(i, &row)| Queen::new(i as i64, i as i64, row))
                .collect(),
        )
    }

    pub fn rows(&self) -> Vec<Option<i64>> {
        self.queens.iter().map(|q| q.row).collect()
    }
}

impl PlanningSolution for NQueensSolution {
    type Score = SimpleScore;

    fn score(&self) -> Option<Self::Score> {
        self.score
    }

    fn set_score(&mut self, score: Option<Self::Score>) {
        self.score = score;
    }
}

pub fn queen_count(s: &NQueensSolution) -> usize {
    s.queens.len()
}

pub fn queens(s: &NQueensSolution) -> &[Queen] {
    &s.queens
}

/// Typed getter for the `row` variable.
pub fn get_queen_row(s: &NQueensSolution, idx: usize) -> Option<i64> {
    s.queens.get(idx).and_then(|q| q.row)
}

/// Typed setter for the `row` variable.
pub fn set_queen_row(s: &mut NQueensSolution, idx: usize, v: Option<i64>) {
    if let Some(queen) = s.queens.get_mut(idx) {
        queen.row = v;
    }
}

pub fn is_row_initialized(s: &NQueensSolution, idx: usize) -> bool {
    get_queen_row(s, idx).is_some()
}

/// Rows `0..n` for a board of `n` queens.
pub fn row_range(s: &NQueensSolution) -> Vec<i64> {
    (0..s.queens.len() as i64).collect()
}

/// Counts row and diagonal conflicts between assigned queens.
///
/// Returns the negated conflict count, so 0 is optimal.
pub fn calculate_conflicts(solution: &NQueensSolution) -> SimpleScore {
    let queens = &solution.queens;
    let mut conflicts = 0i64;

    for i in 0..queens.len() {
        for j in (i + 1)..queens.len() {
            if let (Some(row_i), Some(row_j)) = (queens[i].row, queens[j].row) {
                if row_i == row_j {
                    conflicts += 1;
                }
                let col_diff = (queens[j].column - queens[i].column).abs();
                if (row_i - row_j).abs() == col_diff {
                    conflicts += 1;
                }
            }
        }
    }

    SimpleScore::of(-conflicts)
}

pub fn create_nqueens_descriptor() -> SolutionDescriptor<NQueensSolution> {
    SolutionDescriptor::new("NQueensSolution").with_entity(
        EntityDescriptor::new("Queen", queen_count)
            .with_genuine_variable(GenuineVariableDescriptor::basic("row", is_row_initialized)),
    )
}

pub type NQueensCalculator = EasyScoreCalculator<fn(&NQueensSolution) -> SimpleScore>;

pub type NQueensDirector = TypedScoreDirector<NQueensSolution, NQueensCalculator>;

pub fn nqueens_calculator() -> NQueensCalculator {
    EasyScoreCalculator::new(calculate_conflicts as fn(&NQueensSolution) -> SimpleScore)
}

/// Creates a director with queens at the given rows.
pub fn create_nqueens_director(rows: &[i64]) -> NQueensDirector {
    TypedScoreDirector::new(
        NQueensSolution::with_rows(rows),
        create_nqueens_descriptor(),
        nqueens_calculator(),
    )
}

/// Creates a director with `n` queens and no rows assigned.
pub fn create_uninitialized_nqueens_director(n: usize) -> NQueensDirector {
    TypedScoreDirector::new(
        NQueensSolution::uninitialized(n),
        create_nqueens_descriptor(),
        nqueens_calculator(),
    )
}

pub fn create_nqueens_director_optional(rows: &[Option<i64>]) -> NQueensDirector {
    TypedScoreDirector::new(
        NQueensSolution::with_optional_rows(rows),
        create_nqueens_descriptor(),
        nqueens_calculator(),
    )
}
