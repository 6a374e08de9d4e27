//! Adaptive loop scheduler.
//!
//! The scheduler splits a loop over `[start, end)` between several
//! [versions] that compute the same thing in different ways. It repeats two
//! phases until the range is exhausted:
//! 1. **Sample** - every version, in list order, runs over the next
//!    `sample_size * step` indices and is timed with a monotonic clock.
//! 2. **Compute** - the version with the lowest sample time runs over the next
//!    `compute_size * step` indices.
//!
//! Every sub-range is clamped to `end`, so the dispatched sub-ranges cover
//! `[start, end)` exactly once. Panics raised by a version propagate to the
//! caller and abort the remaining schedule.
//!
//! # Example
//! ```
//! use hnc::{
//!   scheduler::iteration_with,
//!   version::{IntoVersion, Version},
//! };
//! use std::sync::atomic::{AtomicU64, Ordering};
//!
//! let sum = AtomicU64::new(0);
//! let body = |i: u64| {
//!   sum.fetch_add(i, Ordering::Relaxed);
//! };
//! let report = iteration_with(
//!   0,
//!   1000,
//!   &[body.seq_loop(1).boxed(), body.par_batch_loop(1).boxed()],
//!   8,
//!   64,
//!   1,
//! )
//! .unwrap();
//! assert_eq!(sum.load(Ordering::Relaxed), 999 * 1000 / 2);
//! assert_eq!(report.cursor(), 1000);
//! ```
//!
//! [versions]: crate::version

use std::time::{Duration, Instant};

use tracing::{debug, trace};
use typed_builder::TypedBuilder;

use crate::{
  error::{Error, Result},
  index::LoopIndex,
  version::Version,
};

/// Number of loop iterations each version samples per round, unless
/// configured otherwise.
pub const DEFAULT_SAMPLE_SIZE: usize = 4;

/// Number of loop iterations the winning version computes per round, unless
/// configured otherwise.
pub const DEFAULT_COMPUTE_SIZE: usize = 64;

/// Schedules a loop over `[start, end)` between `versions` with the default
/// sample size, compute size and a unit step.
///
/// See [`Scheduler`] for details.
pub fn iteration<I, V>(start: I, end: I, versions: &[V]) -> Result<Report<I>>
where
  I: LoopIndex,
  V: Version<I>,
{
  Scheduler::builder().start(start).end(end).build().run(versions)
}

/// Schedules a loop over `[start, end)` between `versions`.
///
/// See [`Scheduler`] for details.
pub fn iteration_with<I, V>(
  start: I,
  end: I,
  versions: &[V],
  sample_size: usize,
  compute_size: usize,
  step: I,
) -> Result<Report<I>>
where
  I: LoopIndex,
  V: Version<I>,
{
  Scheduler::builder()
    .start(start)
    .end(end)
    .sample_size(sample_size)
    .compute_size(compute_size)
    .step(step)
    .build()
    .run(versions)
}

/// Adaptive loop scheduler configuration.
///
/// # Examples
/// ```
/// # use hnc::scheduler::Scheduler;
/// # use std::cell::Cell;
/// let count = Cell::new(0);
/// let fast = |s: usize, e: usize| count.set(count.get() + (e - s));
/// let slow = |s: usize, e: usize| {
///   for _ in s..e {
///     std::thread::sleep(std::time::Duration::from_micros(50));
///     count.set(count.get() + 1);
///   }
/// };
/// let versions: [&dyn Fn(usize, usize); 2] = [&slow, &fast];
/// let report = Scheduler::builder()
///   .start(0)
///   .end(420)
///   .sample_size(2)
///   .compute_size(32)
///   .build()
///   .run(&versions)
///   .unwrap();
/// assert_eq!(count.get(), 420);
/// assert_eq!(report.cursor(), 420);
/// ```
#[derive(TypedBuilder, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scheduler<I: LoopIndex> {
  /// First index of the loop.
  start: I,
  /// Index one past the last index of the loop.
  end: I,
  /// Number of loop iterations each version samples per round.
  #[builder(default = DEFAULT_SAMPLE_SIZE)]
  sample_size: usize,
  /// Number of loop iterations the winning version computes per round.
  #[builder(default = DEFAULT_COMPUTE_SIZE)]
  compute_size: usize,
  /// Distance between two consecutive loop indices.
  #[builder(default = I::ONE)]
  step: I,
}

impl<I: LoopIndex> Scheduler<I> {
  /// Runs the loop to completion, returning a report of each round.
  ///
  /// # Errors
  ///
  /// Returns an error without running anything if `versions` is empty, if
  /// `step` is not positive or if both sample and compute sizes are zero.
  /// Each of those would leave the cursor in place forever.
  pub fn run<V: Version<I>>(&self, versions: &[V]) -> Result<Report<I>> {
    if versions.is_empty() {
      return Err(Error::NoVersions);
    }
    if !self.step.is_positive() {
      return Err(Error::ZeroStep);
    }
    if self.sample_size == 0 && self.compute_size == 0 {
      return Err(Error::NoProgress);
    }

    let mut report = Report {
      start: self.start,
      cursor: self.start,
      rounds: Vec::new(),
      version_count: versions.len(),
    };
    let mut current = self.start;
    while current < self.end {
      let round_start = current;

      // sample phase
      let mut fastest: Option<(usize, Duration)> = None;
      for (idx, version) in versions.iter().enumerate() {
        let sample_end =
          current.offset(self.sample_size, self.step).clamp_to(self.end);
        let timer = Instant::now();
        version.run(current, sample_end);
        let elapsed = timer.elapsed();
        trace!(
          version = idx,
          name = version.name(),
          start = ?current,
          end = ?sample_end,
          ?elapsed,
          "sampled version"
        );
        if fastest.map_or(true, |(_, best)| elapsed < best) {
          fastest = Some((idx, elapsed));
        }
        current = sample_end;
      }
      let (winner, sample_time) = fastest.unwrap_or((0, Duration::ZERO));

      // compute phase
      if current < self.end {
        let compute_end =
          current.offset(self.compute_size, self.step).clamp_to(self.end);
        versions[winner].run(current, compute_end);
        current = compute_end;
      }

      debug!(
        winner,
        name = versions[winner].name(),
        ?sample_time,
        cursor = ?current,
        "finished scheduling round"
      );
      report.rounds.push(Round {
        start: round_start,
        winner,
        sample_time,
      });
    }
    report.cursor = current;

    Ok(report)
  }
}

/// One sample phase followed by at most one compute phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Round<I> {
  /// Cursor position at the beginning of the round.
  pub start: I,
  /// Index of the version with the lowest sample time.
  pub winner: usize,
  /// Sample time of the winner.
  pub sample_time: Duration,
}

/// Summary of a finished schedule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report<I> {
  start: I,
  cursor: I,
  rounds: Vec<Round<I>>,
  version_count: usize,
}

impl<I: LoopIndex> Report<I> {
  /// Returns the first index of the scheduled loop.
  pub fn start(&self) -> I {
    self.start
  }

  /// Returns the final cursor position. Equals `end` unless `start > end`.
  pub fn cursor(&self) -> I {
    self.cursor
  }

  /// Returns all scheduling rounds in order.
  pub fn rounds(&self) -> &[Round<I>] {
    &self.rounds
  }

  /// Returns the number of rounds each version won, indexed like the
  /// scheduled versions.
  pub fn wins(&self) -> Vec<usize> {
    let mut wins = vec![0; self.version_count];
    for round in &self.rounds {
      wins[round.winner] += 1;
    }
    wins
  }

  /// Returns the index of the version that won the most rounds. Ties go to
  /// the earlier version. `None` if no round was run.
  pub fn fastest(&self) -> Option<usize> {
    if self.rounds.is_empty() {
      return None;
    }
    self
      .wins()
      .into_iter()
      .enumerate()
      .rev()
      .max_by_key(|&(_, wins)| wins)
      .map(|(idx, _)| idx)
  }
}

#[cfg(test)]
mod tests {
  use std::{
    cell::{Cell, RefCell},
    sync::atomic::{AtomicUsize, Ordering},
    thread,
  };

  use rand::{seq::SliceRandom, Rng};

  use super::*;
  use crate::version::{IntoVersion, Named};

  #[test]
  fn test_two_counting_versions() {
    let counter = Cell::new(0);
    let func0 = |s: usize, e: usize| {
      for _ in s..e {
        counter.set(counter.get() + 1);
      }
    };
    let func1 = |s: usize, e: usize| {
      for _ in s..e {
        counter.set(counter.get() + 1);
      }
    };
    let versions: [&dyn Fn(usize, usize); 2] = [&func0, &func1];
    let report = iteration(0, 420, &versions).unwrap();
    assert_eq!(counter.get(), 420);
    assert_eq!(report.cursor(), 420);
  }

  #[test]
  fn test_table_matches_nested_loop() {
    const N: usize = 97;
    let table = RefCell::new(vec![vec![0usize; N]; N]);
    let row_major = |s: usize, e: usize| {
      let mut t = table.borrow_mut();
      for i in s..e {
        for j in 0..N {
          t[i][j] += i * j;
        }
      }
    };
    let column_major = |s: usize, e: usize| {
      let mut t = table.borrow_mut();
      for j in 0..N {
        for i in s..e {
          t[i][j] += i * j;
        }
      }
    };
    let reversed = |s: usize, e: usize| {
      let mut t = table.borrow_mut();
      for i in (s..e).rev() {
        for j in (0..N).rev() {
          t[i][j] += j * i;
        }
      }
    };
    let versions: [&dyn Fn(usize, usize); 3] =
      [&row_major, &column_major, &reversed];
    iteration_with(0, N, &versions, 8, 16, 1).unwrap();

    let mut expected = vec![vec![0usize; N]; N];
    for (i, row) in expected.iter_mut().enumerate() {
      for (j, cell) in row.iter_mut().enumerate() {
        *cell += i * j;
      }
    }
    assert_eq!(*table.borrow(), expected);
  }

  #[test]
  fn test_sub_ranges_cover_range_exactly() {
    let mut rng = rand::thread_rng();
    for _ in 0..50 {
      let start: i64 = rng.gen_range(-100..100);
      let end = start + rng.gen_range(0..500);
      let sample_size = rng.gen_range(0..10);
      let compute_size = rng.gen_range(1..40);
      let step = rng.gen_range(1..5);
      let versions_num = rng.gen_range(1..5);

      let ranges = RefCell::new(Vec::new());
      let record = |s: i64, e: i64| ranges.borrow_mut().push((s, e));
      let versions = vec![&record as &dyn Fn(i64, i64); versions_num];
      let report =
        iteration_with(start, end, &versions, sample_size, compute_size, step)
          .unwrap();

      let ranges = ranges.into_inner();
      let mut expected_start = start;
      for &(s, e) in &ranges {
        assert_eq!(s, expected_start, "sub-ranges must be contiguous");
        assert!(s <= e && e <= end, "sub-range must stay inside the loop");
        assert_eq!((s - start) % step, 0, "sub-range must start on a step");
        expected_start = e;
      }
      assert_eq!(expected_start, end);
      assert_eq!(report.cursor(), end);
    }
  }

  #[test]
  fn test_stepped_loop_counts_each_index_once() {
    for (end, step) in [(10usize, 3usize), (9, 3), (100, 7), (1, 5)] {
      let counter = AtomicUsize::new(0);
      let body = |_: usize| {
        counter.fetch_add(1, Ordering::Relaxed);
      };
      let versions = [body.seq_loop(step), body.seq_loop(step)];
      let report = iteration_with(0, end, &versions, 2, 3, step).unwrap();
      assert_eq!(counter.load(Ordering::Relaxed), end.div_ceil(step));
      assert_eq!(report.cursor(), end);
    }
  }

  #[test]
  fn test_single_version_equals_direct_call() {
    let scheduled = RefCell::new(Vec::new());
    let direct = RefCell::new(Vec::new());
    let scheduled_version =
      |s: u32, e: u32| scheduled.borrow_mut().extend((s..e).map(|i| i * i));
    let direct_version =
      |s: u32, e: u32| direct.borrow_mut().extend((s..e).map(|i| i * i));

    iteration_with(5, 300, &[scheduled_version], 3, 11, 1).unwrap();
    direct_version(5, 300);
    assert_eq!(scheduled.into_inner(), direct.into_inner());
  }

  #[test]
  fn test_version_order_does_not_change_result() {
    let mut values: Vec<u64> = (0..200).collect();
    values.shuffle(&mut rand::thread_rng());

    let run = |first_sum: bool| {
      let total = Cell::new(0u64);
      let sum = |s: usize, e: usize| {
        total.set(total.get() + values[s..e].iter().sum::<u64>())
      };
      let fold = |s: usize, e: usize| {
        total.set(values[s..e].iter().fold(total.get(), |acc, v| acc + v))
      };
      let versions: [&dyn Fn(usize, usize); 2] = if first_sum {
        [&sum, &fold]
      } else {
        [&fold, &sum]
      };
      iteration_with(0, values.len(), &versions, 5, 20, 1).unwrap();
      total.get()
    };
    assert_eq!(run(true), run(false));
    assert_eq!(run(true), values.iter().sum::<u64>());
  }

  #[test]
  fn test_fastest_version_wins() {
    let slow = |s: usize, e: usize| {
      if e > s {
        thread::sleep(Duration::from_millis(2));
      }
    };
    let fast = |_: usize, _: usize| {};
    let versions = [
      Named::new("slow", &slow as &dyn Fn(usize, usize)),
      Named::new("fast", &fast as &dyn Fn(usize, usize)),
    ];
    let report = iteration_with(0, 200, &versions, 1, 10, 1).unwrap();
    assert_eq!(report.fastest(), Some(1));
    assert!(report.rounds().iter().all(|r| r.winner == 1));
    assert_eq!(report.wins(), vec![0, report.rounds().len()]);
  }

  #[test]
  fn test_ties_go_to_first_version() {
    let report = Report {
      start: 0usize,
      cursor: 10,
      rounds: vec![
        Round {
          start: 0,
          winner: 1,
          sample_time: Duration::ZERO,
        },
        Round {
          start: 5,
          winner: 0,
          sample_time: Duration::ZERO,
        },
      ],
      version_count: 3,
    };
    assert_eq!(report.wins(), vec![1, 1, 0]);
    assert_eq!(report.fastest(), Some(0));
  }

  #[test]
  fn test_builder_defaults() {
    let scheduler = Scheduler::builder().start(0u32).end(100).build();
    assert_eq!(
      scheduler,
      Scheduler::builder()
        .start(0)
        .end(100)
        .sample_size(4)
        .compute_size(64)
        .step(1)
        .build()
    );

    let calls = RefCell::new(Vec::new());
    let a = |s: u32, e: u32| calls.borrow_mut().push(("a", s, e));
    let b = |s: u32, e: u32| calls.borrow_mut().push(("b", s, e));
    let versions: [&dyn Fn(u32, u32); 2] = [&a, &b];
    scheduler.run(&versions).unwrap();
    let calls = calls.borrow();
    assert_eq!(calls[..2], [("a", 0, 4), ("b", 4, 8)]);
    assert_eq!(calls[2].1..calls[2].2, 8..72);
  }

  #[test]
  fn test_short_range_skips_compute_phase() {
    let calls = RefCell::new(Vec::new());
    let a = |s: usize, e: usize| calls.borrow_mut().push(("a", s, e));
    let b = |s: usize, e: usize| calls.borrow_mut().push(("b", s, e));
    let versions: [&dyn Fn(usize, usize); 2] = [&a, &b];
    let report = iteration_with(0, 5, &versions, 4, 100, 1).unwrap();
    assert_eq!(*calls.borrow(), vec![("a", 0, 4), ("b", 4, 5)]);
    assert_eq!(report.rounds().len(), 1);
    assert_eq!(report.cursor(), 5);
  }

  #[test]
  fn test_zero_compute_size_still_dispatches() {
    let calls = RefCell::new(Vec::new());
    let a = |s: usize, e: usize| calls.borrow_mut().push((s, e));
    let report = iteration_with(0, 3, &[a], 2, 0, 1).unwrap();
    assert_eq!(*calls.borrow(), vec![(0, 2), (2, 2), (2, 3)]);
    assert_eq!(report.rounds().len(), 2);
  }

  #[test]
  fn test_empty_range() {
    let calls = Cell::new(0);
    let a = |_: i32, _: i32| calls.set(calls.get() + 1);
    let report = iteration(7, 7, &[a]).unwrap();
    assert_eq!(calls.get(), 0);
    assert_eq!(report.cursor(), 7);
    assert_eq!(report.fastest(), None);
    let report = iteration(7, -7, &[a]).unwrap();
    assert_eq!(calls.get(), 0);
    assert_eq!(report.cursor(), 7);
  }

  #[test]
  fn test_invalid_parameters() {
    let a = |_: usize, _: usize| {};
    let none: [fn(usize, usize); 0] = [];
    assert_eq!(iteration(0, 10, &none), Err(Error::NoVersions));
    assert_eq!(iteration_with(0, 10, &[a], 1, 1, 0), Err(Error::ZeroStep));
    assert_eq!(iteration_with(0, 10, &[a], 0, 0, 1), Err(Error::NoProgress));
    assert_eq!(
      iteration_with(0i8, 10, &[|_: i8, _: i8| {}], 1, 1, -1),
      Err(Error::ZeroStep)
    );
  }

  #[test]
  #[should_panic(expected = "broken version")]
  fn test_panicking_version_propagates() {
    let ok = |_: usize, _: usize| {};
    let broken = |s: usize, _: usize| {
      if s >= 8 {
        panic!("broken version");
      }
    };
    let versions: [&dyn Fn(usize, usize); 2] = [&ok, &broken];
    let _ = iteration_with(0, 100, &versions, 4, 4, 1);
  }

  #[test]
  fn test_cursor_clamped_at_type_bounds() {
    let count = Cell::new(0usize);
    let a = |s: u8, e: u8| count.set(count.get() + usize::from(e - s));
    let report = iteration_with(200u8, u8::MAX, &[a], 30, 100, 1).unwrap();
    assert_eq!(count.get(), 55);
    assert_eq!(report.cursor(), u8::MAX);
  }
}
