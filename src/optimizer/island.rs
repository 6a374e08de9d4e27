//! A single population evolved independently between migrations.

use std::mem;

use crate::score::{fitness_order, Score};

/// Individuals and their scores, always kept sorted from the fittest to the
/// least fit. An island never grows past the size it was created with.
#[derive(Clone, Debug)]
pub(crate) struct Island<S> {
  individuals: Vec<S>,
  scores: Vec<Score>,
  capacity: usize,
}

impl<S> Island<S> {
  pub fn new(individuals: Vec<S>, scores: Vec<Score>) -> Self {
    debug_assert_eq!(individuals.len(), scores.len());
    let mut island = Self {
      capacity: individuals.len(),
      individuals,
      scores,
    };
    island.sort();
    island
  }

  pub fn individuals(&self) -> &[S] {
    &self.individuals
  }

  pub fn scores(&self) -> &[Score] {
    &self.scores
  }

  pub fn best(&self) -> Option<(&S, Score)> {
    self.individuals.first().zip(self.scores.first().copied())
  }

  /// Adds offspring to the island and keeps only the fittest individuals.
  /// Parents win ties against offspring.
  pub fn merge(&mut self, offspring: Vec<S>, scores: Vec<Score>) {
    self.individuals.extend(offspring);
    self.scores.extend(scores);
    self.sort();
    self.individuals.truncate(self.capacity);
    self.scores.truncate(self.capacity);
  }

  /// Returns copies of `count` fittest individuals.
  pub fn emigrants(&self, count: usize) -> Vec<(S, Score)>
  where
    S: Clone,
  {
    self
      .individuals
      .iter()
      .cloned()
      .zip(self.scores.iter().copied())
      .take(count)
      .collect()
  }

  /// Replaces the least fit individuals with `immigrants`.
  pub fn immigrate(&mut self, immigrants: Vec<(S, Score)>) {
    let keep = self.capacity.saturating_sub(immigrants.len());
    self.individuals.truncate(keep);
    self.scores.truncate(keep);
    for (individual, score) in immigrants {
      self.individuals.push(individual);
      self.scores.push(score);
    }
    self.sort();
    self.individuals.truncate(self.capacity);
    self.scores.truncate(self.capacity);
  }

  pub fn into_parts(self) -> (Vec<S>, Vec<Score>) {
    (self.individuals, self.scores)
  }

  fn sort(&mut self) {
    let mut ranked = mem::take(&mut self.individuals)
      .into_iter()
      .zip(mem::take(&mut self.scores))
      .collect::<Vec<_>>();
    ranked.sort_by(|a, b| fitness_order(&a.1, &b.1));
    (self.individuals, self.scores) = ranked.into_iter().unzip();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn island() -> Island<char> {
    Island::new(vec!['c', 'a', 'd', 'b'], vec![3.0, 1.0, f64::NAN, 2.0])
  }

  #[test]
  fn test_new_island_is_sorted() {
    let island = island();
    assert_eq!(island.individuals(), &['a', 'b', 'c', 'd']);
    assert_eq!(&island.scores()[..3], &[1.0, 2.0, 3.0]);
    assert!(island.scores()[3].is_nan());
    assert_eq!(island.best(), Some((&'a', 1.0)));
  }

  #[test]
  fn test_merge_keeps_fittest() {
    let mut island = island();
    island.merge(vec!['x', 'y', 'z'], vec![0.5, 2.0, 9.0]);
    assert_eq!(island.individuals().len(), 4);
    // 'b' was there before 'y' and keeps its place
    assert_eq!(island.individuals(), &['x', 'a', 'b', 'y']);
    assert_eq!(island.scores(), &[0.5, 1.0, 2.0, 2.0]);
  }

  #[test]
  fn test_merge_nothing() {
    let mut island = island();
    island.merge(vec![], vec![]);
    assert_eq!(island.individuals(), &['a', 'b', 'c', 'd']);
  }

  #[test]
  fn test_emigrants() {
    let island = island();
    assert_eq!(island.emigrants(2), vec![('a', 1.0), ('b', 2.0)]);
    assert_eq!(island.emigrants(0), vec![]);
    assert_eq!(island.emigrants(10).len(), 4);
  }

  #[test]
  fn test_immigrate_replaces_worst() {
    let mut island = island();
    island.immigrate(vec![('m', 2.5), ('n', 0.0)]);
    assert_eq!(island.individuals(), &['n', 'a', 'b', 'm']);
    assert_eq!(island.scores(), &[0.0, 1.0, 2.0, 2.5]);
  }

  #[test]
  fn test_into_parts() {
    let (individuals, scores) = island().into_parts();
    assert_eq!(individuals.len(), scores.len());
    assert_eq!(individuals[0], 'a');
  }
}
