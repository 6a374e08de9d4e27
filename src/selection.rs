//! Selection operators and utilities.

use rand::{
  distributions::{Distribution, WeightedIndex},
  prelude::*,
};

use crate::score::{fitness_order, Score};

/// An operator that selects individuals suitable for recombination into a
/// new generation. Selected individuals' references are passed into the
/// recombination operator.
///
/// Because [closure lifetime binders] are not stable yet, `Selector`s in
/// closure form are a pain to work with. You can implement them with a `fn`
/// function with a lifetime parameter:
/// ```
/// // selects all individuals for recombination
/// fn selector<'a>(xs: &'a [f64], _: &[f64]) -> Vec<&'a f64> {
///   xs.iter().collect()
/// }
/// ```
///
/// To save you the trouble, this crate provides `AllSelector`,
/// `BestSelector`, `RandomSelector`, `TournamentSelector` and
/// `RouletteSelector`.
///
/// **Note that you probably want to implement this trait instead of using closures.**
///
/// [closure lifetime binders]: https://rust-lang.github.io/rfcs/3216-closure-lifetime-binder.html
pub trait Selector<S> {
  /// Takes individuals and their respective fitness scores. Returns
  /// references to the selected individuals.
  fn select<'a>(&self, individuals: &'a [S], scores: &[Score]) -> Vec<&'a S>;
}

impl<S, F> Selector<S> for F
where
  F: for<'a> Fn(&'a [S], &[Score]) -> Vec<&'a S>,
{
  fn select<'a>(&self, individuals: &'a [S], scores: &[Score]) -> Vec<&'a S> {
    self(individuals, scores)
  }
}

/// Selects all individuals. No discrimination whatsoever.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct AllSelector();

impl<S> Selector<S> for AllSelector {
  fn select<'a>(&self, individuals: &'a [S], _: &[Score]) -> Vec<&'a S> {
    individuals.iter().collect()
  }
}

/// Selects `n` fittest individuals.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct BestSelector(pub usize);

impl<S> Selector<S> for BestSelector {
  fn select<'a>(&self, individuals: &'a [S], scores: &[Score]) -> Vec<&'a S> {
    if individuals.len() <= self.0 {
      return individuals.iter().collect();
    }
    let mut ranked = individuals.iter().zip(scores).collect::<Vec<_>>();
    ranked.sort_by(|a, b| fitness_order(a.1, b.1));
    ranked.into_iter().take(self.0).map(|(s, _)| s).collect()
  }
}

/// Selects `n` distinct random individuals.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct RandomSelector(pub usize);

impl<S> Selector<S> for RandomSelector {
  fn select<'a>(&self, individuals: &'a [S], _: &[Score]) -> Vec<&'a S> {
    individuals
      .iter()
      .choose_multiple(&mut rand::thread_rng(), self.0)
  }
}

/// Shuffles individuals, splits them into tournaments of `n` individuals and
/// selects the fittest individual of each tournament.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TournamentSelector(pub usize);

impl<S> Selector<S> for TournamentSelector {
  fn select<'a>(&self, individuals: &'a [S], scores: &[Score]) -> Vec<&'a S> {
    let mut entrants = individuals.iter().zip(scores).collect::<Vec<_>>();
    entrants.shuffle(&mut rand::thread_rng());
    entrants
      .chunks(self.0.max(1))
      .filter_map(|tournament| {
        tournament
          .iter()
          .min_by(|a, b| fitness_order(a.1, b.1))
          .map(|(s, _)| *s)
      })
      .collect()
  }
}

/// Selects `n` random individuals with replacement. The chance of an
/// individual to be selected is proportional to its rank: the fittest of `k`
/// individuals has weight `k`, the least fit has weight `1`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct RouletteSelector(pub usize);

impl<S> Selector<S> for RouletteSelector {
  fn select<'a>(&self, individuals: &'a [S], scores: &[Score]) -> Vec<&'a S> {
    let mut order = (0..individuals.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| fitness_order(&scores[a], &scores[b]));
    let mut weights = vec![0; individuals.len()];
    for (rank, &idx) in order.iter().enumerate() {
      weights[idx] = individuals.len() - rank;
    }
    let Ok(wheel) = WeightedIndex::new(&weights) else {
      return Vec::new();
    };
    let mut rng = rand::thread_rng();
    (0..self.0)
      .map(|_| &individuals[wheel.sample(&mut rng)])
      .collect()
  }
}
