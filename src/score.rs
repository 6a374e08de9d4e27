//! Fitness scores.

use std::cmp::Ordering;

/// An alias for a fitness score.
///
/// The optimizer minimizes scores: the lower the score, the fitter the
/// individual. If your goal is to maximize some value, negate it.
pub type Score = f64;

/// Orders scores from the fittest to the least fit. `NaN` is less fit than
/// any number, so broken individuals are the first to be discarded.
pub(crate) fn fitness_order(a: &Score, b: &Score) -> Ordering {
  match (a.is_nan(), b.is_nan()) {
    (false, false) => a.total_cmp(b),
    (a_nan, b_nan) => a_nan.cmp(&b_nan),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_fitness_order() {
    assert_eq!(fitness_order(&1.0, &2.0), Ordering::Less);
    assert_eq!(fitness_order(&-1.0, &-2.0), Ordering::Greater);
    assert_eq!(fitness_order(&3.0, &3.0), Ordering::Equal);
    assert_eq!(fitness_order(&f64::NAN, &f64::INFINITY), Ordering::Greater);
    assert_eq!(fitness_order(&-f64::NAN, &0.0), Ordering::Greater);
    assert_eq!(fitness_order(&0.0, &f64::NAN), Ordering::Less);
    assert_eq!(fitness_order(&f64::NAN, &f64::NAN), Ordering::Equal);
  }

  #[test]
  fn test_sorting_puts_nan_last() {
    let mut scores = vec![f64::NAN, 2.0, -1.0, f64::NAN, 0.5];
    scores.sort_by(fitness_order);
    assert_eq!(&scores[..3], &[-1.0, 0.5, 2.0]);
    assert!(scores[3..].iter().all(|s| s.is_nan()));
  }
}
