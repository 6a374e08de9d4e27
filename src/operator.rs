//! Wrappers that parallelize genetic operators.
//!
//! Import [`ParEach`] and [`ParBatch`] to call `par_each()` and `par_batch()`
//! on operators that are applied to individuals one by one.

use std::marker::PhantomData;

/// Tags that tie a parallelized operator to the kind of operator it wraps.
pub(crate) mod tag {
  /// Tags fitness operators.
  pub enum FitnessOperatorTag {}
  /// Tags recombination operators.
  pub enum RecombinationOperatorTag {}
  /// Tags mutation operators.
  pub enum MutationOperatorTag {}
}

/// An operator marked to be applied in parallel to **each** individual.
pub struct ParEachOperator<OperatorTag, S, O> {
  operator: O,
  _solution: PhantomData<fn(&S)>,
  _operator_tag: PhantomData<OperatorTag>,
}

impl<OperatorTag, S, O> ParEachOperator<OperatorTag, S, O> {
  pub(crate) fn operator(&self) -> &O {
    &self.operator
  }
}

/// An operator marked to be applied in parallel to each **batch** of
/// individuals.
pub struct ParBatchOperator<OperatorTag, S, O> {
  operator: O,
  _solution: PhantomData<fn(&S)>,
  _operator_tag: PhantomData<OperatorTag>,
}

impl<OperatorTag, S, O> ParBatchOperator<OperatorTag, S, O> {
  pub(crate) fn operator(&self) -> &O {
    &self.operator
  }
}

/// Marks an operator to be applied in parallel to **each** individual.
///
/// `O` is the number of offspring of a recombination operator and `0` for
/// all other operators.
///
/// **Parallelization is implemented with [rayon]. For cheap operators the
/// overhead usually outweighs the gain. Benchmark if in doubt, for example
/// with the [scheduler](crate::scheduler).**
pub trait ParEach<OperatorTag, S, const O: usize>: Sized {
  /// Wraps the operator so that an executor applies it to each individual
  /// in parallel.
  fn par_each(self) -> ParEachOperator<OperatorTag, S, Self> {
    ParEachOperator {
      operator: self,
      _solution: PhantomData,
      _operator_tag: PhantomData,
    }
  }
}

/// Marks an operator to be applied in parallel to **batches** of
/// individuals. The batch size splits the work evenly across all available
/// threads.
///
/// **Parallelization is implemented with [rayon]. For cheap operators the
/// overhead usually outweighs the gain. Benchmark if in doubt.**
pub trait ParBatch<OperatorTag, S>: Sized {
  /// Wraps the operator so that an executor applies it to batches of
  /// individuals in parallel.
  fn par_batch(self) -> ParBatchOperator<OperatorTag, S, Self> {
    ParBatchOperator {
      operator: self,
      _solution: PhantomData,
      _operator_tag: PhantomData,
    }
  }
}
