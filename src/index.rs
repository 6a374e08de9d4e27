//! Index types the scheduler can iterate over.

use std::fmt::Debug;

/// An ordered index of a loop, advanced by a fixed step.
///
/// Implemented for all primitive integers up to 64 bits and for `usize` and
/// `isize`. Arithmetic saturates at the bounds of the type, so a cursor
/// advanced past `end` is always clamped back onto it.
pub trait LoopIndex: Copy + Ord + Debug + Send + Sync {
  /// The unit step.
  const ONE: Self;

  /// Returns `self + count * step`, saturating at the bounds of the type.
  fn offset(self, count: usize, step: Self) -> Self;

  /// Returns the number of indices `self, self + step, ...` that are
  /// smaller than `end`.
  fn steps_until(self, end: Self, step: Self) -> usize;

  /// Returns `true` if `self` is a step that moves a cursor forward.
  fn is_positive(self) -> bool;

  /// Returns the `n`th index `self + n * step`.
  fn nth(self, n: usize, step: Self) -> Self {
    self.offset(n, step)
  }

  /// Returns `self` if it lies before `end`, otherwise `end`.
  fn clamp_to(self, end: Self) -> Self {
    self.min(end)
  }
}

macro_rules! loop_index_impl {
  ($($t:ty),*) => {
    $(
      impl LoopIndex for $t {
        const ONE: Self = 1;

        fn offset(self, count: usize, step: Self) -> Self {
          let moved = (self as i128)
            .saturating_add((count as i128).saturating_mul(step as i128));
          moved.clamp(<$t>::MIN as i128, <$t>::MAX as i128) as $t
        }

        #[allow(unused_comparisons)]
        fn steps_until(self, end: Self, step: Self) -> usize {
          if self >= end || step <= 0 {
            return 0;
          }
          let span = end as i128 - self as i128;
          let step = step as i128;
          usize::try_from((span + step - 1) / step).unwrap_or(usize::MAX)
        }

        #[allow(unused_comparisons)]
        fn is_positive(self) -> bool {
          self > 0
        }
      }
    )*
  };
}

loop_index_impl!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);
