//! Fills a multiplication table with whichever loop version turns out to be
//! the fastest on this machine.
//!
//! Run with `RUST_LOG=hnc=debug` to see every scheduling round.

use std::sync::atomic::{AtomicU64, Ordering};

use hnc::{
  scheduler::Scheduler,
  version::{IntoVersion, Named, Version},
};
use tracing_subscriber::EnvFilter;

const SIDE: usize = 97;

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info")),
    )
    .init();

  let table =
    (0..SIDE * SIDE).map(|_| AtomicU64::new(0)).collect::<Vec<_>>();
  // one loop index is one row of the table
  let row = |i: usize| {
    for j in 0..SIDE {
      table[i * SIDE + j].store((i * j) as u64, Ordering::Relaxed);
    }
  };
  let rows_by_hand = |start: usize, end: usize| {
    for (k, cell) in table[start * SIDE..end * SIDE].iter().enumerate() {
      let (i, j) = (start + k / SIDE, k % SIDE);
      cell.store((i * j) as u64, Ordering::Relaxed);
    }
  };

  let versions = [
    Named::new("sequential", row.seq_loop(1)).boxed(),
    Named::new("parallel", row.par_loop(1)).boxed(),
    Named::new("batches", row.par_batch_loop(1)).boxed(),
    Named::new("flat", rows_by_hand).boxed(),
  ];
  let names = versions
    .iter()
    .map(|v| v.name().unwrap_or("?").to_owned())
    .collect::<Vec<_>>();

  let report = match Scheduler::builder()
    .start(0)
    .end(SIDE)
    .sample_size(2)
    .compute_size(16)
    .build()
    .run(&versions)
  {
    Ok(report) => report,
    Err(e) => {
      eprintln!("scheduling failed: {e}");
      return;
    }
  };

  let correct = table.iter().enumerate().all(|(k, v)| {
    v.load(Ordering::Relaxed) == ((k / SIDE) * (k % SIDE)) as u64
  });
  println!("table filled correctly: {correct}");
  println!("rounds: {}", report.rounds().len());
  for (name, wins) in names.iter().zip(report.wins()) {
    println!("{name:>10}: {wins} wins");
  }
  if let Some(fastest) = report.fastest() {
    println!("fastest: {}", names[fastest]);
  }
}
