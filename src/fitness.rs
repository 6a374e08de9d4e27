//! Fitness evaluation operators and utilities.

use executor::FitnessExecutor;
use rayon::prelude::*;

use crate::{
  error::{Error, Result},
  execution::{batch_size, strategy::*},
  operator::{
    tag::FitnessOperatorTag,
    ParBatch,
    ParBatchOperator,
    ParEach,
    ParEachOperator,
  },
  score::Score,
};

/// An operator that evaluates the fitness score of an individual.
///
/// The optimizer minimizes fitness scores. If you want to maximize some value
/// instead, negate it.
///
/// Can be applied in parallel to each individual or to batches of
/// individuals by converting it into a parallelized operator with
/// `par_each()` or `par_batch()` methods.
///
/// # Examples
/// ```
/// # use hnc::operator::*;
/// let f = |x: &f64| x * x; // the closer to 0, the fitter
/// let f = |v: &Vec<f64>| v.iter().map(|x| x.abs()).sum::<f64>();
/// let f = f.par_batch();
/// ```
///
/// **Note that you always can implement this trait instead of using closures.**
pub trait Fitness<S> {
  /// Returns the fitness score of `individual`. The lower, the fitter.
  fn fitness(&self, individual: &S) -> Score;
}

impl<S, F> Fitness<S> for F
where
  F: Fn(&S) -> Score,
{
  fn fitness(&self, individual: &S) -> Score {
    self(individual)
  }
}

impl<S, F> ParEach<FitnessOperatorTag, S, 0> for F
where
  S: Sync,
  F: Fitness<S> + Sync,
{
}

impl<S, F> ParBatch<FitnessOperatorTag, S> for F
where
  S: Sync,
  F: Fitness<S> + Sync,
{
}

/// An operator that evaluates fitness scores of all individuals at once.
///
/// Useful when evaluations share some expensive setup.
///
/// # Examples
/// ```
/// let e = |xs: &[f64]| xs.iter().map(|x| x.abs()).collect::<Vec<f64>>();
/// ```
///
/// **Note that you always can implement this trait instead of using closures.**
pub trait Evaluator<S> {
  /// Returns fitness scores of `individuals` in the same order. The lower,
  /// the fitter.
  ///
  /// Returning a different number of scores than the number of individuals
  /// makes the optimizer fail with [`Error::ScoreMismatch`].
  fn evaluate(&self, individuals: &[S]) -> Vec<Score>;
}

impl<S, F> Evaluator<S> for F
where
  F: Fn(&[S]) -> Vec<Score>,
{
  fn evaluate(&self, individuals: &[S]) -> Vec<Score> {
    self(individuals)
  }
}

/// This private module prevents exposing the `Executor` to a user.
pub(crate) mod executor {
  use crate::score::Score;

  /// An internal fitness executor.
  pub trait FitnessExecutor<S, ExecutionStrategy> {
    /// Evaluates individuals optionally parallelizing operator's application.
    fn execute_fitness(&self, individuals: &[S]) -> Vec<Score>;
  }
}

impl<S, E> FitnessExecutor<S, CustomExecutionStrategy> for E
where
  E: Evaluator<S>,
{
  fn execute_fitness(&self, individuals: &[S]) -> Vec<Score> {
    self.evaluate(individuals)
  }
}

impl<S, F> FitnessExecutor<S, SequentialExecutionStrategy> for F
where
  F: Fitness<S>,
{
  fn execute_fitness(&self, individuals: &[S]) -> Vec<Score> {
    individuals.iter().map(|s| self.fitness(s)).collect()
  }
}

impl<S, F> FitnessExecutor<S, ParallelEachExecutionStrategy>
  for ParEachOperator<FitnessOperatorTag, S, F>
where
  S: Sync,
  F: Fitness<S> + Sync,
{
  fn execute_fitness(&self, individuals: &[S]) -> Vec<Score> {
    individuals
      .par_iter()
      .map(|s| self.operator().fitness(s))
      .collect()
  }
}

impl<S, F> FitnessExecutor<S, ParallelBatchExecutionStrategy>
  for ParBatchOperator<FitnessOperatorTag, S, F>
where
  S: Sync,
  F: Fitness<S> + Sync,
{
  fn execute_fitness(&self, individuals: &[S]) -> Vec<Score> {
    individuals
      .par_chunks(batch_size(individuals.len()))
      .flat_map_iter(|chunk| chunk.iter().map(|s| self.operator().fitness(s)))
      .collect()
  }
}

/// Evaluates `individuals`, checking that every one of them got a score.
pub(crate) fn evaluate<S, ES, E>(
  executor: &E,
  individuals: &[S],
) -> Result<Vec<Score>>
where
  E: FitnessExecutor<S, ES>,
{
  let scores = executor.execute_fitness(individuals);
  if scores.len() != individuals.len() {
    return Err(Error::ScoreMismatch {
      expected: individuals.len(),
      found: scores.len(),
    });
  }
  Ok(scores)
}
