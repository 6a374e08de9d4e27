//! Ring migrations between islands and between archipelagos.
//!
//! Islands are stored flat: archipelago `k` owns islands
//! `k * islands_per_archipelago .. (k + 1) * islands_per_archipelago`.

use crate::score::{fitness_order, Score};

use super::island::Island;

/// Each island of every archipelago sends copies of its `size` fittest
/// individuals to the next island of the same archipelago. The last island
/// sends them to the first one.
pub(crate) fn between_islands<S: Clone>(
  islands: &mut [Island<S>],
  islands_per_archipelago: usize,
  size: usize,
) {
  if islands_per_archipelago < 2 || size == 0 {
    return;
  }
  for archipelago in islands.chunks_mut(islands_per_archipelago) {
    if archipelago.len() < 2 {
      continue;
    }
    let emigrants = archipelago
      .iter()
      .map(|island| island.emigrants(size))
      .collect::<Vec<_>>();
    let count = archipelago.len();
    for (i, group) in emigrants.into_iter().enumerate() {
      archipelago[(i + 1) % count].immigrate(group);
    }
  }
}

/// Each archipelago sends copies of its `size` fittest individuals to the
/// first island of the next archipelago. The last archipelago sends them to
/// the first one.
pub(crate) fn between_archipelagos<S: Clone>(
  islands: &mut [Island<S>],
  islands_per_archipelago: usize,
  size: usize,
) {
  let count = islands.len() / islands_per_archipelago.max(1);
  if count < 2 || size == 0 {
    return;
  }
  let emigrants = islands
    .chunks(islands_per_archipelago)
    .map(|archipelago| fittest(archipelago, size))
    .collect::<Vec<_>>();
  for (k, group) in emigrants.into_iter().enumerate() {
    let target = (k + 1) % count * islands_per_archipelago;
    islands[target].immigrate(group);
  }
}

/// Copies of `size` fittest individuals of all given islands.
fn fittest<S: Clone>(islands: &[Island<S>], size: usize) -> Vec<(S, Score)> {
  let mut candidates = islands
    .iter()
    .flat_map(|island| island.individuals().iter().zip(island.scores()))
    .collect::<Vec<_>>();
  candidates.sort_by(|a, b| fitness_order(a.1, b.1));
  candidates
    .into_iter()
    .take(size)
    .map(|(s, score)| (s.clone(), *score))
    .collect()
}
