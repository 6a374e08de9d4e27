//! Island-model genetic algorithm.
//!
//! The population is split between islands, which are grouped into
//! archipelagos. Islands evolve independently and in parallel, each keeping
//! its best individuals out of parents and offspring. Every now and then the
//! fittest individuals migrate: between neighboring islands of an
//! archipelago, and between neighboring archipelagos.

use std::marker::PhantomData;

use rayon::prelude::*;
use tracing::{debug, info};
use typed_builder::TypedBuilder;

use super::{island::Island, migration, Optimizer, Outcome, Statistics};
use crate::{
  error::{Error, Result},
  fitness::{evaluate, executor::FitnessExecutor},
  mutation::executor::MutationExecutor,
  recombination::executor::RecombinationExecutor,
  score::{fitness_order, Score},
  selection::Selector,
  termination::Terminator,
};

/// Number of archipelagos unless configured otherwise.
pub const DEFAULT_ARCHIPELAGOS: usize = 1;
/// Number of islands per archipelago unless configured otherwise.
pub const DEFAULT_ISLANDS_PER_ARCHIPELAGO: usize = 1;
/// Number of migrants per migration unless configured otherwise.
pub const DEFAULT_MIGRATION_SIZE: usize = 1;
/// Generations between migrations of islands unless configured otherwise.
pub const DEFAULT_ISLAND_MIGRATION_INTERVAL: usize = 10;
/// Generations between migrations of archipelagos unless configured
/// otherwise.
pub const DEFAULT_ARCHIPELAGO_MIGRATION_INTERVAL: usize = 50;

/// A single-objective genetic algorithm with an island model. Lower fitness
/// scores are better.
///
/// Each generation, on every island:
/// 1. the selector picks parents out of the island's individuals,
/// 2. the recombinator creates offspring from the parents,
/// 3. the mutator mutates the offspring,
/// 4. the offspring are evaluated,
/// 5. parents and offspring are merged, and only as many of the fittest
///    individuals as the island started with survive.
///
/// After that, if the number of evolved generations is a multiple of
/// `island_migration_interval`, each island sends copies of its
/// `migration_size` fittest individuals to the next island of its
/// archipelago, where they replace the least fit ones. Likewise, every
/// `archipelago_migration_interval` generations each archipelago sends its
/// `migration_size` fittest individuals to the first island of the next
/// archipelago. An interval of `0` disables the respective migration.
///
/// # Examples
/// ```
/// use hnc::{
///   optimizer::{genetic::GeneticAlgo, Optimizer},
///   selection::BestSelector,
///   termination::GenerationTerminator,
/// };
///
/// let outcome = GeneticAlgo::builder()
///   .population((0..20).map(f64::from).collect())
///   .fitness(|x: &f64| (x - 3.5).abs())
///   .selector(BestSelector(4))
///   .recombinator(|a: &f64, b: &f64| (a + b) / 2.0)
///   .mutator(|_: &mut f64| {})
///   .terminator(GenerationTerminator(10))
///   .islands_per_archipelago(2)
///   .build()
///   .optimize()
///   .unwrap();
/// assert_eq!(outcome.best(), Some((&3.5, 0.0)));
/// ```
#[derive(TypedBuilder, Debug)]
pub struct GeneticAlgo<
  S,
  Fit: FitnessExecutor<S, FitExecStrat>,
  Sel: Selector<S>,
  Rec: RecombinationExecutor<S, OFFSPRING_NUM, RecExecStrat>,
  Mut: MutationExecutor<S, MutExecStrat>,
  Ter: Terminator<S>,
  FitExecStrat,
  RecExecStrat,
  MutExecStrat,
  const OFFSPRING_NUM: usize,
> {
  /// Initial population. It is split into contiguous chunks of nearly equal
  /// size, one per island.
  population: Vec<S>,
  fitness: Fit,
  selector: Sel,
  recombinator: Rec,
  mutator: Mut,
  terminator: Ter,
  #[builder(default = DEFAULT_ARCHIPELAGOS)]
  archipelagos: usize,
  #[builder(default = DEFAULT_ISLANDS_PER_ARCHIPELAGO)]
  islands_per_archipelago: usize,
  #[builder(default = DEFAULT_MIGRATION_SIZE)]
  migration_size: usize,
  #[builder(default = DEFAULT_ISLAND_MIGRATION_INTERVAL)]
  island_migration_interval: usize,
  #[builder(default = DEFAULT_ARCHIPELAGO_MIGRATION_INTERVAL)]
  archipelago_migration_interval: usize,
  #[builder(setter(skip), default)]
  _solution: PhantomData<S>,
  #[builder(setter(skip), default)]
  _fit_es: PhantomData<FitExecStrat>,
  #[builder(setter(skip), default)]
  _rec_es: PhantomData<RecExecStrat>,
  #[builder(setter(skip), default)]
  _mut_es: PhantomData<MutExecStrat>,
}

impl<
    S,
    Fit,
    Sel,
    Rec,
    Mut,
    Ter,
    FitExecStrat,
    RecExecStrat,
    MutExecStrat,
    const OFFSPRING_NUM: usize,
  >
  GeneticAlgo<
    S,
    Fit,
    Sel,
    Rec,
    Mut,
    Ter,
    FitExecStrat,
    RecExecStrat,
    MutExecStrat,
    OFFSPRING_NUM,
  >
where
  Fit: FitnessExecutor<S, FitExecStrat>,
  Sel: Selector<S>,
  Rec: RecombinationExecutor<S, OFFSPRING_NUM, RecExecStrat>,
  Mut: MutationExecutor<S, MutExecStrat>,
  Ter: Terminator<S>,
{
  /// Checks the configuration and returns the total number of islands.
  fn island_count(&self) -> Result<usize> {
    if self.population.is_empty() {
      return Err(Error::EmptyPopulation);
    }
    let islands = self
      .archipelagos
      .saturating_mul(self.islands_per_archipelago);
    if islands == 0 {
      return Err(Error::NoIslands);
    }
    if self.population.len() < islands {
      return Err(Error::TooFewIndividuals {
        individuals: self.population.len(),
        islands,
      });
    }

    let migrates = (self.islands_per_archipelago > 1
      && self.island_migration_interval > 0)
      || (self.archipelagos > 1 && self.archipelago_migration_interval > 0);
    let island_size = self.population.len() / islands;
    if migrates && self.migration_size >= island_size {
      return Err(Error::InvalidMigration {
        migration_size: self.migration_size,
        island_size,
      });
    }
    Ok(islands)
  }
}

impl<
    S,
    Fit,
    Sel,
    Rec,
    Mut,
    Ter,
    FitExecStrat,
    RecExecStrat,
    MutExecStrat,
    const OFFSPRING_NUM: usize,
  > Optimizer<S>
  for GeneticAlgo<
    S,
    Fit,
    Sel,
    Rec,
    Mut,
    Ter,
    FitExecStrat,
    RecExecStrat,
    MutExecStrat,
    OFFSPRING_NUM,
  >
where
  S: Clone + Send + Sync,
  Fit: FitnessExecutor<S, FitExecStrat> + Sync,
  Sel: Selector<S> + Sync,
  Rec: RecombinationExecutor<S, OFFSPRING_NUM, RecExecStrat> + Sync,
  Mut: MutationExecutor<S, MutExecStrat> + Sync,
  Ter: Terminator<S>,
{
  fn optimize(self) -> Result<Outcome<S>> {
    let island_count = self.island_count()?;
    let Self {
      population,
      fitness,
      selector,
      recombinator,
      mutator,
      mut terminator,
      islands_per_archipelago,
      migration_size,
      island_migration_interval,
      archipelago_migration_interval,
      ..
    } = self;

    info!(
      individuals = population.len(),
      islands = island_count,
      islands_per_archipelago,
      "starting genetic optimization"
    );
    let mut evaluations = population.len();
    let mut islands = split(population, island_count)
      .into_par_iter()
      .map(|individuals| -> Result<Island<S>> {
        let scores = evaluate(&fitness, &individuals)?;
        Ok(Island::new(individuals, scores))
      })
      .collect::<Result<Vec<_>>>()?;

    let mut history = Vec::new();
    let mut generation = 0;
    loop {
      let statistics = Statistics::new(
        generation,
        islands.iter().flat_map(|i| i.scores().iter().copied()),
        evaluations,
      );
      debug!(
        generation,
        best = statistics.best,
        mean = statistics.mean,
        evaluations,
        "generation evaluated"
      );
      history.push(statistics);

      let (best, _) = fittest(&islands).ok_or(Error::EmptyPopulation)?;
      if terminator.terminate(best, &statistics) {
        break;
      }

      evaluations += islands
        .par_iter_mut()
        .map(|island| {
          evolve(island, &fitness, &selector, &recombinator, &mutator)
        })
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .sum::<usize>();
      generation += 1;

      if island_migration_interval > 0
        && generation % island_migration_interval == 0
      {
        migration::between_islands(
          &mut islands,
          islands_per_archipelago,
          migration_size,
        );
        debug!(generation, "islands exchanged migrants");
      }
      if archipelago_migration_interval > 0
        && generation % archipelago_migration_interval == 0
      {
        migration::between_archipelagos(
          &mut islands,
          islands_per_archipelago,
          migration_size,
        );
        debug!(generation, "archipelagos exchanged migrants");
      }
    }

    let mut ranked = islands
      .into_iter()
      .flat_map(|island| {
        let (individuals, scores) = island.into_parts();
        individuals.into_iter().zip(scores)
      })
      .collect::<Vec<_>>();
    ranked.sort_by(|a, b| fitness_order(&a.1, &b.1));
    let (individuals, scores): (Vec<_>, Vec<_>) = ranked.into_iter().unzip();
    info!(
      generations = generation,
      evaluations,
      best = scores.first().copied().unwrap_or(Score::NAN),
      "genetic optimization finished"
    );
    Ok(Outcome::new(individuals, scores, history))
  }
}

/// Runs a single-island genetic algorithm. A shortcut for building a
/// [`GeneticAlgo`] with default settings and optimizing it.
///
/// # Examples
/// ```
/// use hnc::{
///   optimizer::genetic::genetic_algo,
///   selection::AllSelector,
///   termination::TargetTerminator,
/// };
///
/// let outcome = genetic_algo(
///   vec![-8.0, -2.0, 5.0, 9.0],
///   |x: &f64| x * x,
///   AllSelector(),
///   |a: &f64, b: &f64| (a + b) / 2.0,
///   |_: &mut f64| {},
///   TargetTerminator(0.1),
/// )
/// .unwrap();
/// assert!(outcome.best().unwrap().1 <= 0.1);
/// ```
pub fn genetic_algo<
  S,
  Fit,
  Sel,
  Rec,
  Mut,
  Ter,
  FitExecStrat,
  RecExecStrat,
  MutExecStrat,
  const OFFSPRING_NUM: usize,
>(
  population: Vec<S>,
  fitness: Fit,
  selector: Sel,
  recombinator: Rec,
  mutator: Mut,
  terminator: Ter,
) -> Result<Outcome<S>>
where
  S: Clone + Send + Sync,
  Fit: FitnessExecutor<S, FitExecStrat> + Sync,
  Sel: Selector<S> + Sync,
  Rec: RecombinationExecutor<S, OFFSPRING_NUM, RecExecStrat> + Sync,
  Mut: MutationExecutor<S, MutExecStrat> + Sync,
  Ter: Terminator<S>,
{
  GeneticAlgo::<
    S,
    Fit,
    Sel,
    Rec,
    Mut,
    Ter,
    FitExecStrat,
    RecExecStrat,
    MutExecStrat,
    OFFSPRING_NUM,
  >::builder()
  .population(population)
  .fitness(fitness)
  .selector(selector)
  .recombinator(recombinator)
  .mutator(mutator)
  .terminator(terminator)
  .build()
  .optimize()
}

/// Evolves one generation of `island`. Returns the number of evaluated
/// offspring.
fn evolve<
  S,
  Fit,
  Sel,
  Rec,
  Mut,
  FitExecStrat,
  RecExecStrat,
  MutExecStrat,
  const OFFSPRING_NUM: usize,
>(
  island: &mut Island<S>,
  fitness: &Fit,
  selector: &Sel,
  recombinator: &Rec,
  mutator: &Mut,
) -> Result<usize>
where
  Fit: FitnessExecutor<S, FitExecStrat>,
  Sel: Selector<S>,
  Rec: RecombinationExecutor<S, OFFSPRING_NUM, RecExecStrat>,
  Mut: MutationExecutor<S, MutExecStrat>,
{
  let parents = selector.select(island.individuals(), island.scores());
  let mut offspring = recombinator.execute_recombination(parents);
  mutator.execute_mutations(&mut offspring);
  let scores = evaluate(fitness, &offspring)?;
  let count = offspring.len();
  island.merge(offspring, scores);
  Ok(count)
}

/// Splits `population` into `parts` contiguous chunks whose sizes differ by
/// at most one.
fn split<S>(population: Vec<S>, parts: usize) -> Vec<Vec<S>> {
  let (base, extra) = (population.len() / parts, population.len() % parts);
  let mut rest = population.into_iter();
  (0..parts)
    .map(|i| rest.by_ref().take(base + usize::from(i < extra)).collect())
    .collect()
}

/// The fittest individual among all islands' fittest.
fn fittest<S>(islands: &[Island<S>]) -> Option<(&S, Score)> {
  islands
    .iter()
    .filter_map(Island::best)
    .min_by(|a, b| fitness_order(&a.1, &b.1))
}
