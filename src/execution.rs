//! Execution strategies of operators.

/// Execution strategy markers. Each operator executor is implemented once
/// per strategy, which lets the compiler pick the right executor for a
/// closure or a wrapped operator.
pub(crate) mod strategy {
  /// Applies an operator to all individuals at once.
  pub enum CustomExecutionStrategy {}

  /// Applies an operator to each individual on the calling thread.
  pub enum SequentialExecutionStrategy {}

  /// Applies an operator to each individual in parallel.
  pub enum ParallelEachExecutionStrategy {}

  /// Applies an operator to batches of individuals in parallel, one batch per
  /// available thread.
  pub enum ParallelBatchExecutionStrategy {}
}

/// Returns the batch size that splits `len` items evenly across all rayon
/// threads.
pub(crate) fn batch_size(len: usize) -> usize {
  (len / rayon::current_num_threads()).max(1)
}
