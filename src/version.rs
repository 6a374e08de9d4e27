//! Versions of a loop and adaptors that build them from loop bodies.
//!
//! A **version** runs some computation over a half-open range of loop
//! indices. The [scheduler] compares several versions that compute the same
//! thing and keeps dispatching work to the fastest one.
//!
//! Any closure of type `Fn(I, I)` is a [`Version`]. When the versions only
//! differ in how they parallelize the same loop body, the adaptors from
//! [`IntoVersion`] build them from a body of type `Fn(I)`:
//!
//! | Adaptor                | Execution                                        |
//! |:-----------------------|:-------------------------------------------------|
//! | [`seq_loop()`]         | a plain loop on the calling thread               |
//! | [`par_loop()`]         | every index is a separate [rayon] task           |
//! | [`par_batch_loop()`]   | one contiguous batch of indices per rayon thread |
//!
//! [scheduler]: crate::scheduler
//! [`seq_loop()`]: IntoVersion::seq_loop
//! [`par_loop()`]: IntoVersion::par_loop
//! [`par_batch_loop()`]: IntoVersion::par_batch_loop

use rayon::prelude::*;

use crate::{execution::batch_size, index::LoopIndex};

/// A computation over the half-open range of loop indices `[start, end)`.
///
/// Versions handed to the same scheduler must compute the same result and
/// must not touch indices outside of the given range.
///
/// # Examples
/// ```
/// # use hnc::version::Version;
/// # use std::sync::atomic::{AtomicUsize, Ordering};
/// let counter = AtomicUsize::new(0);
/// let v = |start: usize, end: usize| {
///   for _ in start..end {
///     counter.fetch_add(1, Ordering::Relaxed);
///   }
/// };
/// v.run(0, 10);
/// assert_eq!(counter.load(Ordering::Relaxed), 10);
/// ```
///
/// **Note that you always can implement this trait instead of using closures.**
pub trait Version<I> {
  /// Runs the computation over `[start, end)`.
  fn run(&self, start: I, end: I);

  /// Returns a human-readable label used in logs.
  fn name(&self) -> Option<&str> {
    None
  }

  /// Erases the type of a version, so that versions built in different ways
  /// can be scheduled together.
  fn boxed<'a>(self) -> BoxedVersion<'a, I>
  where
    Self: Sized + 'a,
  {
    BoxedVersion(Box::new(self))
  }
}

impl<I, F> Version<I> for F
where
  F: Fn(I, I),
{
  fn run(&self, start: I, end: I) {
    self(start, end)
  }
}

/// A version behind a pointer, created with [`Version::boxed`].
pub struct BoxedVersion<'a, I>(Box<dyn Version<I> + 'a>);

impl<I> Version<I> for BoxedVersion<'_, I> {
  fn run(&self, start: I, end: I) {
    self.0.run(start, end)
  }

  fn name(&self) -> Option<&str> {
    self.0.name()
  }
}

/// A version with a label attached to it.
#[derive(Clone, Debug)]
pub struct Named<V> {
  name: String,
  version: V,
}

impl<V> Named<V> {
  /// Attaches `name` to `version`.
  pub fn new(name: impl Into<String>, version: V) -> Self {
    Self {
      name: name.into(),
      version,
    }
  }

  /// Returns the wrapped version.
  pub fn into_inner(self) -> V {
    self.version
  }
}

impl<I, V> Version<I> for Named<V>
where
  V: Version<I>,
{
  fn run(&self, start: I, end: I) {
    self.version.run(start, end)
  }

  fn name(&self) -> Option<&str> {
    Some(&self.name)
  }
}

/// Runs a loop body for each index on the calling thread.
#[derive(Clone, Copy, Debug)]
pub struct SeqLoop<I, F> {
  body: F,
  step: I,
}

/// Runs a loop body for each index as a separate rayon task.
#[derive(Clone, Copy, Debug)]
pub struct ParLoop<I, F> {
  body: F,
  step: I,
}

/// Splits the range into one contiguous batch per rayon thread and runs a
/// loop body for each index of a batch.
#[derive(Clone, Copy, Debug)]
pub struct ParBatchLoop<I, F> {
  body: F,
  step: I,
}

/// Builds versions from a loop body of type `Fn(I)`.
///
/// # Examples
/// ```
/// # use hnc::version::{IntoVersion, Version};
/// # use std::sync::atomic::{AtomicU64, Ordering};
/// let sum = AtomicU64::new(0);
/// let body = |i: u64| {
///   sum.fetch_add(i, Ordering::Relaxed);
/// };
/// body.par_batch_loop(2).run(0, 10); // 0 + 2 + 4 + 6 + 8
/// assert_eq!(sum.load(Ordering::Relaxed), 20);
/// ```
pub trait IntoVersion<I>: Fn(I) + Sized {
  /// Runs the body for `start, start + step, ...` in order.
  fn seq_loop(self, step: I) -> SeqLoop<I, Self> {
    SeqLoop { body: self, step }
  }

  /// Runs the body for every index in parallel.
  ///
  /// **Parallelization is implemented with [rayon]. For cheap bodies the
  /// overhead usually outweighs the gain, which is exactly what the scheduler
  /// is there to find out.**
  fn par_loop(self, step: I) -> ParLoop<I, Self>
  where
    Self: Sync,
  {
    ParLoop { body: self, step }
  }

  /// Runs the body for batches of indices in parallel. The batch size is
  /// chosen to evenly distribute the range across all available threads.
  fn par_batch_loop(self, step: I) -> ParBatchLoop<I, Self>
  where
    Self: Sync,
  {
    ParBatchLoop { body: self, step }
  }
}

impl<I, F> IntoVersion<I> for F where F: Fn(I) {}

impl<I, F> Version<I> for SeqLoop<I, F>
where
  I: LoopIndex,
  F: Fn(I),
{
  fn run(&self, start: I, end: I) {
    for n in 0..start.steps_until(end, self.step) {
      (self.body)(start.nth(n, self.step));
    }
  }
}

impl<I, F> Version<I> for ParLoop<I, F>
where
  I: LoopIndex,
  F: Fn(I) + Sync,
{
  fn run(&self, start: I, end: I) {
    (0..start.steps_until(end, self.step))
      .into_par_iter()
      .for_each(|n| (self.body)(start.nth(n, self.step)));
  }
}

impl<I, F> Version<I> for ParBatchLoop<I, F>
where
  I: LoopIndex,
  F: Fn(I) + Sync,
{
  fn run(&self, start: I, end: I) {
    let len = start.steps_until(end, self.step);
    let batch_size = batch_size(len);
    (0..len.div_ceil(batch_size)).into_par_iter().for_each(|batch| {
      let first = batch * batch_size;
      let last = (first + batch_size).min(len);
      for n in first..last {
        (self.body)(start.nth(n, self.step));
      }
    });
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
  };

  use super::*;

  fn takes_version<I, V: Version<I>>(v: &V, start: I, end: I) {
    v.run(start, end);
  }

  fn visited(version: &impl Version<usize>, log: &Mutex<Vec<usize>>) {
    version.run(3, 20);
    let mut visited = std::mem::take(&mut *log.lock().unwrap());
    visited.sort_unstable();
    assert_eq!(visited, vec![3, 6, 9, 12, 15, 18]);
  }

  #[test]
  fn test_version_from_closure() {
    let counter = AtomicUsize::new(0);
    let v = |start: usize, end: usize| {
      counter.fetch_add(end - start, Ordering::Relaxed);
    };
    takes_version(&v, 0, 42);
    assert_eq!(counter.load(Ordering::Relaxed), 42);
  }

  #[test]
  fn test_version_from_boxed_closures() {
    let counter = AtomicUsize::new(0);
    let versions: Vec<Box<dyn Fn(usize, usize) + '_>> = vec![
      Box::new(|s: usize, e: usize| {
        counter.fetch_add(e - s, Ordering::Relaxed);
      }),
      Box::new(|s: usize, e: usize| {
        (s..e).for_each(|_| {
          counter.fetch_add(1, Ordering::Relaxed);
        })
      }),
    ];
    versions.iter().for_each(|v| takes_version(v, 0, 5));
    assert_eq!(counter.load(Ordering::Relaxed), 10);
  }

  #[test]
  fn test_custom_version() {
    struct Noop;
    impl Version<i32> for Noop {
      fn run(&self, _: i32, _: i32) {}

      fn name(&self) -> Option<&str> {
        Some("noop")
      }
    }
    takes_version(&Noop, -3, 3);
    assert_eq!(Noop.name(), Some("noop"));
  }

  #[test]
  fn test_boxed_versions() {
    let counter = AtomicUsize::new(0);
    let body = |_: usize| {
      counter.fetch_add(1, Ordering::Relaxed);
    };
    let versions = [
      body.seq_loop(1).boxed(),
      Named::new("batch", body.par_batch_loop(1)).boxed(),
    ];
    versions.iter().for_each(|v| v.run(0, 7));
    assert_eq!(counter.load(Ordering::Relaxed), 14);
    assert_eq!(versions[0].name(), None);
    assert_eq!(versions[1].name(), Some("batch"));
  }

  #[test]
  fn test_named_version() {
    let v = Named::new("empty", |_: u8, _: u8| {});
    takes_version(&v, 0, 1);
    assert_eq!(Version::<u8>::name(&v), Some("empty"));
  }

  #[test]
  fn test_seq_loop_visits_stepped_indices() {
    let log = Mutex::new(Vec::new());
    let body = |i: usize| log.lock().unwrap().push(i);
    visited(&body.seq_loop(3), &log);
  }

  #[test]
  fn test_par_loop_visits_stepped_indices() {
    let log = Mutex::new(Vec::new());
    let body = |i: usize| log.lock().unwrap().push(i);
    visited(&body.par_loop(3), &log);
  }

  #[test]
  fn test_par_batch_loop_visits_stepped_indices() {
    let log = Mutex::new(Vec::new());
    let body = |i: usize| log.lock().unwrap().push(i);
    visited(&body.par_batch_loop(3), &log);
  }

  #[test]
  fn test_adaptors_on_empty_range() {
    let counter = AtomicUsize::new(0);
    let body = |_: i64| {
      counter.fetch_add(1, Ordering::Relaxed);
    };
    body.seq_loop(1).run(5, 5);
    body.par_loop(1).run(5, 2);
    body.par_batch_loop(1).run(5, 5);
    assert_eq!(counter.load(Ordering::Relaxed), 0);
  }
}
