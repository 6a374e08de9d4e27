//! Recombination operators and utilities.

use executor::RecombinationExecutor;
use itertools::Itertools;
use rayon::prelude::*;

use crate::{
  execution::strategy::*,
  math::binomial,
  operator::{tag::RecombinationOperatorTag, ParEach, ParEachOperator},
};

/// An operator that creates `O` offspring from a pair of parents. It is
/// applied to every pair (every 2-[combination]) of the selected parents, and
/// the created offspring are passed into the mutation operator.
///
/// For example, for selected parents `[a, b, c]` a `Recombination` `r` of
/// type `Fn(&S, &S) -> S` produces 3 offspring: `r(&a, &b)`, `r(&a, &c)` and
/// `r(&b, &c)`.
///
/// Can be applied in parallel to each pair of parents by converting it into
/// a parallelized operator with `par_each()` method.
///
/// # Examples
/// Any closure that takes two references to parents and returns one
/// offspring or a pair of offspring is a `Recombination`.
/// ```
/// # use hnc::operator::*;
/// let r = |a: &f64, b: &f64| (a + b) / 2.0; // 2 to 1
/// let r = |a: &f64, b: &f64| (a.max(*b), a.min(*b)); // 2 to 2
/// let r = r.par_each();
/// ```
///
/// **Note that you always can implement this trait instead of using closures.**
///
/// [combination]: https://en.wikipedia.org/wiki/Combination
pub trait Recombination<S, const O: usize> {
  /// Takes references to a pair of parents and returns `O` offspring.
  fn recombine(&self, a: &S, b: &S) -> [S; O];
}

impl<S, F> Recombination<S, 1> for F
where
  F: Fn(&S, &S) -> S,
{
  fn recombine(&self, a: &S, b: &S) -> [S; 1] {
    [self(a, b)]
  }
}

impl<S, F> Recombination<S, 2> for F
where
  F: Fn(&S, &S) -> (S, S),
{
  fn recombine(&self, a: &S, b: &S) -> [S; 2] {
    let (m, n) = self(a, b);
    [m, n]
  }
}

impl<S, R, const O: usize> ParEach<RecombinationOperatorTag, S, O> for R
where
  S: Sync + Send,
  R: Recombination<S, O> + Sync,
{
}

/// An operator that receives references to all selected parents and
/// recombines them into a vector of offspring. The offspring are passed into
/// the mutation operator.
///
/// # Examples
/// ```
/// let r = |xs: Vec<&f64>| {
///   xs.chunks(2)
///     .filter(|ch| ch.len() == 2)
///     .map(|ch| (ch[0] + ch[1]) / 2.0)
///     .collect::<Vec<f64>>()
/// };
/// ```
///
/// **Note that you always can implement this trait instead of using closures.**
pub trait Recombinator<S> {
  /// Recombines given parents, returning a vector of created offspring.
  fn recombine(&self, parents: Vec<&S>) -> Vec<S>;
}

impl<S, F> Recombinator<S> for F
where
  F: Fn(Vec<&S>) -> Vec<S>,
{
  fn recombine(&self, parents: Vec<&S>) -> Vec<S> {
    self(parents)
  }
}

/// This private module prevents exposing the `Executor` to a user.
pub(crate) mod executor {
  /// An internal recombination executor.
  pub trait RecombinationExecutor<S, const O: usize, ExecutionStrategy> {
    /// Executes recombinations optionally parallelizing operator's
    /// application.
    fn execute_recombination(&self, parents: Vec<&S>) -> Vec<S>;
  }
}

impl<S, R> RecombinationExecutor<S, { usize::MAX }, CustomExecutionStrategy>
  for R
where
  R: Recombinator<S>,
{
  fn execute_recombination(&self, parents: Vec<&S>) -> Vec<S> {
    self.recombine(parents)
  }
}

impl<S, R, const O: usize>
  RecombinationExecutor<S, O, SequentialExecutionStrategy> for R
where
  R: Recombination<S, O>,
{
  fn execute_recombination(&self, parents: Vec<&S>) -> Vec<S> {
    let mut offspring = Vec::with_capacity(binomial(parents.len(), 2) * O);
    for (a, b) in parents.into_iter().tuple_combinations::<(_, _)>() {
      offspring.extend(self.recombine(a, b));
    }
    offspring
  }
}

impl<S, R, const O: usize>
  RecombinationExecutor<S, O, ParallelEachExecutionStrategy>
  for ParEachOperator<RecombinationOperatorTag, S, R>
where
  S: Sync + Send,
  R: Recombination<S, O> + Sync,
{
  fn execute_recombination(&self, parents: Vec<&S>) -> Vec<S> {
    parents
      .into_iter()
      .tuple_combinations::<(_, _)>()
      .collect::<Vec<_>>()
      .into_par_iter()
      .flat_map_iter(|(a, b)| self.operator().recombine(a, b))
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  type Solution = f64;

  fn takes_recombinator<
    const O: usize,
    ES,
    R: RecombinationExecutor<Solution, O, ES>,
  >(
    r: &R,
    parents: &[Solution],
  ) -> Vec<Solution> {
    r.execute_recombination(parents.iter().collect())
  }

  #[test]
  fn test_recombination_from_closure_2_to_1() {
    let r = |a: &Solution, b: &Solution| a + b;
    let parents = [1.0, 2.0, 4.0];
    assert_eq!(takes_recombinator(&r, &parents), vec![3.0, 5.0, 6.0]);
    let mut offspring = takes_recombinator(&r.par_each(), &parents);
    offspring.sort_by(f64::total_cmp);
    assert_eq!(offspring, vec![3.0, 5.0, 6.0]);
  }

  #[test]
  fn test_recombination_from_closure_2_to_2() {
    let r = |a: &Solution, b: &Solution| (a + b, a - b);
    let parents = [1.0, 2.0, 4.0, 8.0];
    let offspring = takes_recombinator(&r, &parents);
    assert_eq!(offspring.len(), binomial(4, 2) * 2);
    assert_eq!(&offspring[..2], &[3.0, -1.0]);
    assert_eq!(takes_recombinator(&r.par_each(), &parents).len(), 12);
  }

  #[test]
  fn test_recombination_with_too_few_parents() {
    let r = |a: &Solution, b: &Solution| a * b;
    assert!(takes_recombinator(&r, &[1.0]).is_empty());
    assert!(takes_recombinator(&r.par_each(), &[]).is_empty());
  }

  #[test]
  fn test_recombinator_from_closure() {
    let recombinator = |parents: Vec<&Solution>| {
      parents.into_iter().map(|p| p * 10.0).collect::<Vec<_>>()
    };
    assert_eq!(
      takes_recombinator(&recombinator, &[1.0, 2.0]),
      vec![10.0, 20.0]
    );
  }

  #[test]
  fn test_custom_recombination() {
    struct Triplets;
    impl<S: Clone> Recombination<S, 3> for Triplets {
      fn recombine(&self, a: &S, b: &S) -> [S; 3] {
        [a.clone(), b.clone(), a.clone()]
      }
    }
    let parents = [1.0, 2.0];
    assert_eq!(takes_recombinator(&Triplets, &parents), vec![1.0, 2.0, 1.0]);
    assert_eq!(takes_recombinator(&Triplets.par_each(), &parents).len(), 3);
  }

  #[test]
  fn test_custom_recombinator() {
    struct Copies;
    impl<S: Copy> Recombinator<S> for Copies {
      fn recombine(&self, parents: Vec<&S>) -> Vec<S> {
        parents.into_iter().copied().collect()
      }
    }
    assert_eq!(takes_recombinator(&Copies, &[5.0, 6.0]), vec![5.0, 6.0]);
  }
}
