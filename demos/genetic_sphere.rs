//! Minimizes the sphere function `f(x) = x1^2 + x2^2 + x3^2` on two
//! archipelagos of three islands each.
//!
//! Run with `RUST_LOG=hnc=debug` to see every generation.

use hnc::{
  operator::ParBatch,
  optimizer::{genetic::GeneticAlgo, Optimizer, Statistics},
  selection::TournamentSelector,
  termination::{StagnationTerminator, Terminator},
};
use rand::prelude::*;
use rand_distr::Normal;
use tracing_subscriber::EnvFilter;

type S = [f64; 3];

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info")),
    )
    .init();

  let mut rng = rand::thread_rng();
  let population = (0..120)
    .map(|_| std::array::from_fn(|_| rng.gen_range(-100.0..100.0)))
    .collect::<Vec<S>>();

  let fitness = |x: &S| x.iter().map(|v| v * v).sum::<f64>();

  // blend crossover: each gene of both offspring lies between the parents'
  let recombination = |a: &S, b: &S| -> (S, S) {
    let mut rng = rand::thread_rng();
    let mut p = *a;
    let mut q = *b;
    for k in 0..3 {
      let r: f64 = rng.gen();
      p[k] = r * a[k] + (1.0 - r) * b[k];
      q[k] = (1.0 - r) * a[k] + r * b[k];
    }
    (p, q)
  };

  let noise = match Normal::new(0.0, 0.05) {
    Ok(noise) => noise,
    Err(e) => {
      eprintln!("bad mutation distribution: {e}");
      return;
    }
  };
  let mutation = move |x: &mut S| {
    let mut rng = rand::thread_rng();
    for v in x.iter_mut() {
      if rng.gen_bool(0.2) {
        *v += noise.sample(&mut rng);
      }
    }
  };

  // stop after 1000 generations or after 50 generations without progress
  let mut stagnation = StagnationTerminator::new(50);
  let terminator = move |best: &S, stats: &Statistics| {
    stats.generation >= 1000 || stagnation.terminate(best, stats)
  };

  let outcome = GeneticAlgo::builder()
    .population(population)
    .fitness(fitness.par_batch())
    .selector(TournamentSelector(4))
    .recombinator(recombination)
    .mutator(mutation)
    .terminator(terminator)
    .archipelagos(2)
    .islands_per_archipelago(3)
    .migration_size(2)
    .island_migration_interval(10)
    .archipelago_migration_interval(40)
    .build()
    .optimize();

  match outcome {
    Ok(outcome) => {
      let last = outcome.history().last();
      if let (Some((best, score)), Some(last)) = (outcome.best(), last) {
        println!(
          "generation {}: best {best:?} with f = {score:e}",
          last.generation
        );
        println!("evaluations: {}", last.evaluations);
      }
    }
    Err(e) => eprintln!("optimization failed: {e}"),
  }
}
