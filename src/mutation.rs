//! Operators that perturb freshly recombined offspring before they are
//! evaluated.

use executor::MutationExecutor;
use rayon::prelude::*;

use crate::{
  execution::{batch_size, strategy::*},
  operator::{
    tag::MutationOperatorTag,
    ParBatch,
    ParBatchOperator,
    ParEach,
    ParEachOperator,
  },
};

/// Perturbs one individual in place.
///
/// The optimizer calls it once per offspring. Wrap it with `par_each()` to
/// spread those calls over the rayon pool, or with `par_batch()` to hand the
/// pool one contiguous chunk of offspring per thread.
///
/// # Examples
/// ```
/// # use hnc::operator::*;
/// let m = |x: &mut f64| *x *= 1.01;
/// let m = m.par_batch();
/// ```
///
/// Any `Fn(&mut S)` is a `Mutation`. Implement it by hand when the operator
/// carries state of its own.
pub trait Mutation<S> {
  /// Changes `individual` in place.
  fn mutate(&self, individual: &mut S);
}

impl<S, F> Mutation<S> for F
where
  F: Fn(&mut S),
{
  fn mutate(&self, individual: &mut S) {
    self(individual)
  }
}

impl<S, M> ParEach<MutationOperatorTag, S, 0> for M
where
  S: Send,
  M: Mutation<S> + Sync,
{
}

impl<S, M> ParBatch<MutationOperatorTag, S> for M
where
  S: Send,
  M: Mutation<S> + Sync,
{
}

/// Perturbs a whole generation of offspring in one call, e.g. to apply a
/// mutation rate across the slice.
///
/// # Examples
/// ```
/// let m = |xs: &mut [f64]| xs.iter_mut().for_each(|x| *x = x.round());
/// ```
///
/// Any `Fn(&mut [S])` is a `Mutator`.
pub trait Mutator<S> {
  /// Changes `individuals` in place.
  fn mutate(&self, individuals: &mut [S]);
}

impl<S, F> Mutator<S> for F
where
  F: Fn(&mut [S]),
{
  fn mutate(&self, individuals: &mut [S]) {
    self(individuals)
  }
}

/// Leaves offspring as they are.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct NoMutation();

impl<S> Mutator<S> for NoMutation {
  fn mutate(&self, _: &mut [S]) {}
}

/// Crate-internal glue between mutation operators and execution strategies.
pub(crate) mod executor {
  /// Applies a mutation operator to offspring under an execution strategy.
  pub trait MutationExecutor<S, ExecutionStrategy> {
    /// Mutates every individual of `individuals`.
    fn execute_mutations(&self, individuals: &mut [S]);
  }
}

impl<S, M> MutationExecutor<S, CustomExecutionStrategy> for M
where
  M: Mutator<S>,
{
  fn execute_mutations(&self, individuals: &mut [S]) {
    self.mutate(individuals)
  }
}

impl<S, M> MutationExecutor<S, SequentialExecutionStrategy> for M
where
  M: Mutation<S>,
{
  fn execute_mutations(&self, individuals: &mut [S]) {
    individuals.iter_mut().for_each(|s| self.mutate(s));
  }
}

impl<S, M> MutationExecutor<S, ParallelEachExecutionStrategy>
  for ParEachOperator<MutationOperatorTag, S, M>
where
  S: Send,
  M: Mutation<S> + Sync,
{
  fn execute_mutations(&self, individuals: &mut [S]) {
    individuals
      .par_iter_mut()
      .for_each(|s| self.operator().mutate(s));
  }
}

impl<S, M> MutationExecutor<S, ParallelBatchExecutionStrategy>
  for ParBatchOperator<MutationOperatorTag, S, M>
where
  S: Send,
  M: Mutation<S> + Sync,
{
  fn execute_mutations(&self, individuals: &mut [S]) {
    let chunk_size = batch_size(individuals.len());
    individuals.par_chunks_mut(chunk_size).for_each(|chunk| {
      chunk.iter_mut().for_each(|s| self.operator().mutate(s))
    });
  }
}
