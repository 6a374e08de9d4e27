//! Small numeric helpers.

use std::cmp::Ordering;

use itertools::Itertools;

/// Tolerance at which [`nth_root`] stops iterating.
const ROOT_TOLERANCE: f64 = 1e-12;

/// Upper bound of Newton iterations in [`nth_root`].
const ROOT_MAX_ITERATIONS: usize = 64;

/// Returns the `n`th root of `x`, found with Newton's method.
///
/// Returns `NaN` for `n == 0` and for even roots of negative numbers.
///
/// # Examples
/// ```
/// # use hnc::math::nth_root;
/// assert!((nth_root(27.0, 3) - 3.0).abs() < 1e-9);
/// assert!((nth_root(-32.0, 5) + 2.0).abs() < 1e-9);
/// ```
pub fn nth_root(x: f64, n: u32) -> f64 {
  if n == 0 || (x < 0.0 && n % 2 == 0) || x.is_nan() {
    return f64::NAN;
  }
  if x == 0.0 || n == 1 || x.is_infinite() {
    return x;
  }
  if x < 0.0 {
    return -nth_root(-x, n);
  }

  let n_f = f64::from(n);
  // the logarithmic estimate is within a few ulps, Newton polishes it
  let mut root = (x.ln() / n_f).exp();
  for _ in 0..ROOT_MAX_ITERATIONS {
    let next = ((n_f - 1.0) * root + x / root.powf(n_f - 1.0)) / n_f;
    if (next - root).abs() <= ROOT_TOLERANCE * next.abs() {
      return next;
    }
    root = next;
  }
  root
}

/// Returns the arithmetic mean of `values`, `None` if there are none.
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
  let (sum, count) = values
    .into_iter()
    .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
  (count > 0).then(|| sum / count as f64)
}

/// Returns the median of `values`, `None` if there are none. For an even
/// number of values it is the mean of the two middle values.
///
/// Values are ordered with [`f64::total_cmp`], so `NaN`s sort to the ends.
pub fn median(values: &[f64]) -> Option<f64> {
  if values.is_empty() {
    return None;
  }
  let sorted = values
    .iter()
    .copied()
    .sorted_by(f64::total_cmp)
    .collect::<Vec<_>>();
  let mid = sorted.len() / 2;
  Some(if sorted.len() % 2 == 0 {
    (sorted[mid - 1] + sorted[mid]) / 2.0
  } else {
    sorted[mid]
  })
}

/// Returns the geometric mean of positive `values`, `None` if there are none
/// or if any of them is not positive.
pub fn geometric_mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
  let mut count = 0usize;
  let mut log_sum = 0.0;
  for v in values {
    if v.partial_cmp(&0.0) != Some(Ordering::Greater) {
      return None;
    }
    log_sum += v.ln();
    count += 1;
  }
  (count > 0).then(|| (log_sum / count as f64).exp())
}

/// Returns the number of `k`-combinations of `n` elements.
/// Saturates at `usize::MAX`.
pub fn binomial(n: usize, k: usize) -> usize {
  if k > n {
    return 0;
  }
  let k = k.min(n - k);
  let mut result: u128 = 1;
  for i in 0..k {
    // exact at each step: result is C(n, i + 1)
    result = result * (n - i) as u128 / (i + 1) as u128;
    if result > usize::MAX as u128 {
      return usize::MAX;
    }
  }
  result as usize
}

/// Returns all `k`-combinations of `items` in lexicographic order of their
/// positions.
///
/// # Examples
/// ```
/// # use hnc::math::combinations;
/// assert_eq!(
///   combinations(&[1, 2, 3], 2),
///   vec![vec![&1, &2], vec![&1, &3], vec![&2, &3]],
/// );
/// ```
pub fn combinations<T>(items: &[T], k: usize) -> Vec<Vec<&T>> {
  items.iter().combinations(k).collect()
}

/// Solves the linear system `a * x = b` with Gaussian elimination and partial
/// pivoting. Returns `None` if the system is singular or if the dimensions
/// of `a` and `b` do not match.
///
/// # Examples
/// ```
/// # use hnc::math::solve_linear;
/// // x + y = 3, x - y = 1
/// let x = solve_linear(vec![vec![1.0, 1.0], vec![1.0, -1.0]], vec![3.0, 1.0])
///   .unwrap();
/// assert!((x[0] - 2.0).abs() < 1e-12 && (x[1] - 1.0).abs() < 1e-12);
/// ```
pub fn solve_linear(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
  let n = b.len();
  if a.len() != n || a.iter().any(|row| row.len() != n) {
    return None;
  }

  for col in 0..n {
    let pivot = (col..n).max_by(|&i, &j| {
      a[i][col].abs().total_cmp(&a[j][col].abs())
    })?;
    if a[pivot][col].abs() < f64::EPSILON {
      return None;
    }
    a.swap(col, pivot);
    b.swap(col, pivot);

    for row in col + 1..n {
      let factor = a[row][col] / a[col][col];
      if factor == 0.0 {
        continue;
      }
      for k in col..n {
        a[row][k] -= factor * a[col][k];
      }
      b[row] -= factor * b[col];
    }
  }

  let mut x = vec![0.0; n];
  for row in (0..n).rev() {
    let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
    x[row] = (b[row] - tail) / a[row][row];
  }
  Some(x)
}
