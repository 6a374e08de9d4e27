//! Termination operators and utilities.

use crate::{optimizer::Statistics, score::Score};

/// An operator that terminates the algorithm based on some termination
/// condition. It is consulted once per generation, before the generation is
/// evolved, with the fittest individual found so far and the statistics of
/// the current generation.
///
/// # Examples
/// ```
/// # use hnc::optimizer::Statistics;
/// // stop as soon as the median individual is good enough
/// let t = |_: &f64, stats: &Statistics| stats.median < 1e-3;
/// ```
///
/// **Note that you always can implement this trait instead of using closures.**
pub trait Terminator<S> {
  /// If returns `true`, the algorithm is terminated.
  fn terminate(&mut self, best: &S, statistics: &Statistics) -> bool;
}

impl<S, F> Terminator<S> for F
where
  F: FnMut(&S, &Statistics) -> bool,
{
  fn terminate(&mut self, best: &S, statistics: &Statistics) -> bool {
    self(best, statistics)
  }
}

/// A `Terminator` that terminates the algorithm as soon as a certain number of
/// generations have passed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct GenerationTerminator(pub usize);

impl<S> Terminator<S> for GenerationTerminator {
  fn terminate(&mut self, _: &S, _: &Statistics) -> bool {
    match self.0 {
      0 => true,
      _ => {
        self.0 -= 1;
        false
      }
    }
  }
}

/// A `Terminator` that terminates the algorithm as soon as the fittest
/// individual's score is less than or equal to the target score.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct TargetTerminator(pub Score);

impl<S> Terminator<S> for TargetTerminator {
  fn terminate(&mut self, _: &S, statistics: &Statistics) -> bool {
    statistics.best <= self.0
  }
}

/// A `Terminator` that terminates the algorithm when the best score has not
/// improved for `patience` consecutive generations.
///
/// A `NaN` best score is never an improvement and is never remembered, so
/// the first real score after a run of `NaN`s resets the counter.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct StagnationTerminator {
  patience: usize,
  best: Option<Score>,
  stale: usize,
}

impl StagnationTerminator {
  /// Creates a `StagnationTerminator` that tolerates `patience` generations
  /// without improvement.
  pub fn new(patience: usize) -> Self {
    Self {
      patience,
      best: None,
      stale: 0,
    }
  }
}

impl<S> Terminator<S> for StagnationTerminator {
  fn terminate(&mut self, _: &S, statistics: &Statistics) -> bool {
    let improved = match self.best {
      Some(best) => statistics.best < best,
      None => !statistics.best.is_nan(),
    };
    if improved {
      self.best = Some(statistics.best);
      self.stale = 0;
    } else {
      self.stale += 1;
    }
    self.stale >= self.patience
  }
}
