//! Errors reported by the scheduler and the genetic optimizer.
//!
//! Panics raised inside user supplied closures are not caught; they unwind
//! through the crate unchanged.

/// Errors returned when a scheduler or an optimizer is given parameters that
/// would never let it finish.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
  /// The scheduler was given no versions to choose from.
  #[error("no versions to schedule")]
  NoVersions,
  /// The scheduler step is zero, so the cursor would never move.
  #[error("step must be greater than zero")]
  ZeroStep,
  /// Both sample and compute sizes are zero, so a round dispatches nothing.
  #[error("sample size and compute size are both zero")]
  NoProgress,
  /// An optimizer was built with an empty population.
  #[error("population is empty")]
  EmptyPopulation,
  /// An optimizer was built with zero archipelagos or zero islands per
  /// archipelago.
  #[error("at least one archipelago with at least one island is required")]
  NoIslands,
  /// The population cannot give every island at least one individual.
  #[error("{individuals} individuals cannot populate {islands} islands")]
  TooFewIndividuals {
    /// Size of the initial population.
    individuals: usize,
    /// Total number of islands.
    islands: usize,
  },
  /// Migrants would replace a whole island.
  #[error(
    "migration size {migration_size} must be smaller than island size {island_size}"
  )]
  InvalidMigration {
    /// Number of migrants per migration.
    migration_size: usize,
    /// Number of individuals on an island.
    island_size: usize,
  },
  /// A batch evaluator returned a different number of scores than it was
  /// given individuals.
  #[error("expected {expected} fitness scores, evaluator returned {found}")]
  ScoreMismatch {
    /// Number of evaluated individuals.
    expected: usize,
    /// Number of returned scores.
    found: usize,
  },
}

/// A specialized `Result` for this crate.
pub type Result<T> = std::result::Result<T, Error>;
