//! **hnc** is a small toolkit of two self-tuning engines: an adaptive loop
//! scheduler that keeps dispatching work to the fastest of several loop
//! implementations, and an island-model genetic algorithm that leans on
//! closures for all of its operators.
//!
//! # Scheduler
//!
//! Often a loop can be written in several ways: sequentially, with every
//! index as a parallel task, in parallel batches, with a different memory
//! layout... Which one is the fastest depends on the machine, the input and
//! the load. Instead of guessing, hand all of them to the [`scheduler`]:
//! - a **version** is one implementation of the loop over a half-open range
//!   of indices. Any closure `Fn(I, I)` is a [`Version`], and the adaptors
//!   from [`IntoVersion`] build versions out of a loop body `Fn(I)`
//! - the scheduler alternates a short **sample** phase, where every version
//!   is timed on a few indices, with a longer **compute** phase, where the
//!   fastest version runs alone
//! - the range is covered exactly once, in order, and the [`Report`] tells
//!   which version won each round
//!
//! ```
//! use hnc::{
//!   scheduler::iteration,
//!   version::{IntoVersion, Version},
//! };
//! use std::sync::atomic::{AtomicU32, Ordering};
//!
//! let count = AtomicU32::new(0);
//! let body = |_: u32| {
//!   count.fetch_add(1, Ordering::Relaxed);
//! };
//! let versions = [body.seq_loop(1).boxed(), body.par_loop(1).boxed()];
//! let report = iteration(0, 420, &versions).unwrap();
//! assert_eq!(count.load(Ordering::Relaxed), 420);
//! assert_eq!(report.cursor(), 420);
//! ```
//!
//! # Genetic algorithm
//!
//! This crate defines a few abstractions that allow for flexible construction
//! of genetic algorithms:
//! - **Operator** - is an abstraction over genetic operators: **fitness**,
//!   **selection**, **recombination**, **mutation** and **termination**
//! - Each **operator** is executed by a respective **executor** - an internal
//!   abstraction, that executes operators based on their type and execution
//!   strategy: **sequential** or **parallel**
//! - **Optimizer** is an abstraction that controls execution of each step of
//!   the genetic algorithm loop. [`GeneticAlgo`] runs that loop on several
//!   **islands** at once and lets the fittest individuals migrate between
//!   them
//!
//! Fitness scores are single `f64` values and the optimizer minimizes them.
//!
//! Most **operators** are represented with two traits. One of them operates on
//! all individuals at once, another is applied to individuals one by one or,
//! in case of [`Recombination`], to pairs of individuals.
//!
//! |                            | Applied to all individuals | Applied to each individual<br>or pair of individuals |
//! |:---------------------------|:--------------------------:|:----------------------------------------------------:|
//! | **Fitness operator**       | [`Evaluator`]              | [`Fitness`]                                          |
//! | **Selection operator**     | [`Selector`]               |                                                      |
//! | **Recombination operator** | [`Recombinator`]           | [`Recombination`]                                    |
//! | **Mutation operator**      | [`Mutator`]                | [`Mutation`]                                         |
//! | **Termination operator**   | [`Terminator`]             |                                                      |
//!
//! The operators from the 2nd column can be parallelized by calling
//! [`par_each()`] or [`par_batch()`] on them (the latter isn't implemented for
//! [`Recombination`]). This only wraps the **operator**, so its **executor**
//! applies it in parallel to each individual or to batches of individuals.
//!
//! ```
//! use hnc::{
//!   operator::ParEach,
//!   optimizer::{genetic::GeneticAlgo, Optimizer},
//!   selection::TournamentSelector,
//!   termination::GenerationTerminator,
//! };
//! use rand::Rng;
//!
//! let population = (0..60).map(|i| f64::from(i) - 30.0).collect::<Vec<_>>();
//! let shift = || rand::thread_rng().gen_range(-0.5..0.5);
//! let outcome = GeneticAlgo::builder()
//!   .population(population)
//!   .fitness((|x: &f64| (x - 1.0).powi(2)).par_each())
//!   .selector(TournamentSelector(3))
//!   .recombinator(|a: &f64, b: &f64| (a + b) / 2.0)
//!   .mutator(|x: &mut f64| *x += shift())
//!   .terminator(GenerationTerminator(50))
//!   .archipelagos(2)
//!   .islands_per_archipelago(3)
//!   .build()
//!   .optimize()
//!   .unwrap();
//! let (best, _) = outcome.best().unwrap();
//! assert!((best - 1.0).abs() < 0.5);
//! ```
//!
//! # Common pitfalls
//!
//! - Closures are great and handy to use until they aren't. A subtle mistake
//!   can paint your code red and the error will appear at the creation of an
//!   optimizer, far away from the closure. Annotate closure arguments, or
//!   implement operator traits for your own types instead.
//! - More often than not, parallelization of cheap operators only decreases
//!   performance. Benchmark, if in doubt. The [`scheduler`] can do that for
//!   you at run time.
//!
//! # Logging
//!
//! Both engines emit [tracing] events: scheduling rounds and generations at
//! `DEBUG`, single samples at `TRACE`, the start and the end of an
//! optimization at `INFO`. Install a subscriber to see them.
//!
//! [`Version`]: crate::version::Version
//! [`IntoVersion`]: crate::version::IntoVersion
//! [`Report`]: crate::scheduler::Report
//! [`GeneticAlgo`]: crate::optimizer::genetic::GeneticAlgo
//! [`Fitness`]: crate::fitness::Fitness
//! [`Evaluator`]: crate::fitness::Evaluator
//! [`Selector`]: crate::selection::Selector
//! [`Recombinator`]: crate::recombination::Recombinator
//! [`Recombination`]: crate::recombination::Recombination
//! [`Mutator`]: crate::mutation::Mutator
//! [`Mutation`]: crate::mutation::Mutation
//! [`Terminator`]: crate::termination::Terminator
//! [`par_each()`]: crate::operator::ParEach::par_each
//! [`par_batch()`]: crate::operator::ParBatch::par_batch

#![warn(missing_docs)]

pub mod error;
mod execution;
pub mod fitness;
pub mod index;
pub mod math;
pub mod mutation;
pub mod operator;
pub mod optimizer;
pub mod recombination;
pub mod scheduler;
pub mod score;
pub mod selection;
pub mod termination;
pub mod version;

pub use error::{Error, Result};
pub use optimizer::Optimizer;
