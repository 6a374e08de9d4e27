//! Abstract optimizer, generation statistics and optimization outcome.

pub mod genetic;
mod island;
mod migration;

use itertools::Itertools;

use crate::{
  error::Result,
  math::{mean, median},
  score::Score,
};

/// Represents an abstract optimizer.
pub trait Optimizer<Solution>: Sized {
  /// Runs `Optimizer` until the termination condition is met, then returns
  /// the last found population along with the optimization history.
  fn optimize(self) -> Result<Outcome<Solution>>;
}

/// Fitness statistics of one generation across all islands.
///
/// Scores that are `NaN` are left out of every statistic. If all scores are
/// `NaN`, so are the statistics.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Statistics {
  /// Number of evolved generations. The initial population is generation 0.
  pub generation: usize,
  /// The lowest score.
  pub best: Score,
  /// The highest score.
  pub worst: Score,
  /// Mean score.
  pub mean: Score,
  /// Median score.
  pub median: Score,
  /// Total number of fitness evaluations performed so far.
  pub evaluations: usize,
}

impl Statistics {
  pub(crate) fn new(
    generation: usize,
    scores: impl IntoIterator<Item = Score>,
    evaluations: usize,
  ) -> Self {
    let scores = scores
      .into_iter()
      .filter(|s| !s.is_nan())
      .collect::<Vec<_>>();
    let (best, worst) = scores
      .iter()
      .copied()
      .minmax_by(f64::total_cmp)
      .into_option()
      .unwrap_or((Score::NAN, Score::NAN));
    Self {
      generation,
      best,
      worst,
      mean: mean(scores.iter().copied()).unwrap_or(Score::NAN),
      median: median(&scores).unwrap_or(Score::NAN),
      evaluations,
    }
  }
}

/// The final population of an optimizer, sorted from the fittest to the
/// least fit individual, and statistics of every generation.
#[derive(Clone, Debug)]
pub struct Outcome<S> {
  individuals: Vec<S>,
  scores: Vec<Score>,
  history: Vec<Statistics>,
}

impl<S> Outcome<S> {
  pub(crate) fn new(
    individuals: Vec<S>,
    scores: Vec<Score>,
    history: Vec<Statistics>,
  ) -> Self {
    Self {
      individuals,
      scores,
      history,
    }
  }

  /// Returns the fittest individual and its score.
  pub fn best(&self) -> Option<(&S, Score)> {
    self.individuals.first().zip(self.scores.first().copied())
  }

  /// Returns the final population, the fittest individual first.
  pub fn individuals(&self) -> &[S] {
    &self.individuals
  }

  /// Returns scores of [`individuals()`](Self::individuals) in the same
  /// order.
  pub fn scores(&self) -> &[Score] {
    &self.scores
  }

  /// Returns statistics of every generation, starting with the initial one.
  pub fn history(&self) -> &[Statistics] {
    &self.history
  }

  /// Moves the final population out of `Outcome`.
  pub fn into_individuals(self) -> Vec<S> {
    self.individuals
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_statistics() {
    let stats = Statistics::new(3, [4.0, 1.0, 3.0, 2.0], 42);
    assert_eq!(stats.generation, 3);
    assert_eq!(stats.best, 1.0);
    assert_eq!(stats.worst, 4.0);
    assert_eq!(stats.mean, 2.5);
    assert_eq!(stats.median, 2.5);
    assert_eq!(stats.evaluations, 42);
  }

  #[test]
  fn test_statistics_skip_nan() {
    let stats = Statistics::new(0, [f64::NAN, 5.0, -1.0], 3);
    assert_eq!((stats.best, stats.worst), (-1.0, 5.0));
    assert_eq!(stats.median, 2.0);

    let stats = Statistics::new(0, [f64::NAN], 1);
    assert!(stats.best.is_nan() && stats.mean.is_nan());
  }

  #[test]
  fn test_outcome() {
    let outcome = Outcome::new(vec!['a', 'b'], vec![0.5, 1.5], vec![]);
    assert_eq!(outcome.best(), Some((&'a', 0.5)));
    assert_eq!(outcome.scores(), &[0.5, 1.5]);
    assert!(outcome.history().is_empty());
    assert_eq!(outcome.into_individuals(), vec!['a', 'b']);

    let empty = Outcome::<char>::new(vec![], vec![], vec![]);
    assert_eq!(empty.best(), None);
  }
}
