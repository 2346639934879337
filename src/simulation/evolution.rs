//! Genetic algorithm driving the generations.
//!
//! Each generation every genome's fitness is reset, the population is
//! evaluated, a report is logged, and the next generation is bred from the
//! best performers by elitism, crossover and mutation.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::brain::Brain;
use super::error::SimError;
use super::evaluator::{Flow, Member, Presenter, evaluate};
use super::params::Params;
use super::track::Track;

/// A controller together with the fitness it earned this generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genome {
    /// Network steering the car.
    pub brain: Brain,
    /// Fitness accumulated during the current generation.
    pub fitness: f64,
}

impl Genome {
    /// Wraps a brain with zero fitness.
    pub fn new(brain: Brain) -> Self {
        Self {
            brain,
            fitness: 0.0,
        }
    }
}

/// Fitness summary of one evaluated generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationReport {
    /// Generation number, starting at 1.
    pub generation: u32,
    /// Number of genomes evaluated.
    pub population: usize,
    /// Highest fitness.
    pub best: f64,
    /// Mean fitness.
    pub mean: f64,
    /// Lowest fitness.
    pub worst: f64,
    /// Ticks the episode lasted.
    pub ticks: u64,
}

/// The evolving population and the generation counter.
#[derive(Debug, Clone)]
pub struct Population {
    genomes: Vec<Genome>,
    generation: u32,
}

impl Population {
    /// Creates `population_size` genomes with random brains.
    pub fn new(params: &Params) -> Self {
        let layer_sizes = params.layer_sizes();
        let genomes = (0..params.population_size)
            .map(|_| Genome::new(Brain::new(&layer_sizes, params.weight_scale)))
            .collect();
        Self::from_genomes(genomes)
    }

    /// Wraps existing genomes; the generation counter starts at 0.
    pub fn from_genomes(genomes: Vec<Genome>) -> Self {
        Self {
            genomes,
            generation: 0,
        }
    }

    /// Genomes in population order.
    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    /// Number of the most recently started generation, 0 before the first.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Advances the generation counter and zeroes every fitness.
    ///
    /// # Returns
    ///
    /// The new generation number.
    pub fn begin_generation(&mut self) -> u32 {
        self.generation += 1;
        for genome in &mut self.genomes {
            genome.fitness = 0.0;
        }
        self.generation
    }

    /// Borrows the genomes as evaluator members, aligned by index.
    pub fn members(&mut self) -> Vec<Member<'_>> {
        self.genomes
            .iter_mut()
            .map(|Genome { brain, fitness }| Member::new(&*brain, fitness))
            .collect()
    }

    /// Summarizes the fitness of the current generation.
    pub fn report(&self, ticks: u64) -> GenerationReport {
        let count = self.genomes.len();
        if count == 0 {
            return GenerationReport {
                generation: self.generation,
                population: 0,
                best: 0.0,
                mean: 0.0,
                worst: 0.0,
                ticks,
            };
        }
        let (best, worst, sum) = self.genomes.iter().map(|g| g.fitness).fold(
            (f64::NEG_INFINITY, f64::INFINITY, 0.0),
            |(best, worst, sum), f| (best.max(f), worst.min(f), sum + f),
        );
        GenerationReport {
            generation: self.generation,
            population: count,
            best,
            mean: sum / count as f64,
            worst,
            ticks,
        }
    }

    /// Genome with the highest fitness.
    pub fn best(&self) -> Option<&Genome> {
        self.genomes
            .iter()
            .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
    }

    /// Breeds the next generation from the current fitness values.
    ///
    /// The `elitism` best genomes survive unchanged. Every other slot is
    /// filled from parents drawn out of the top `survival_threshold` share
    /// of the ranking, by crossover with probability `crossover_rate` and by
    /// cloning otherwise, and is then mutated.
    pub fn evolve<R: Rng>(&mut self, params: &Params, rng: &mut R) {
        let size = self.genomes.len();
        if size == 0 {
            return;
        }

        let mut ranked = std::mem::take(&mut self.genomes);
        ranked.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));

        let elite_count = params.elitism.min(size);
        let parent_count = ((size as f32 * params.survival_threshold).ceil() as usize)
            .clamp(1, size);

        let mut next: Vec<Genome> = ranked[..elite_count]
            .iter()
            .map(|g| Genome::new(g.brain.clone()))
            .collect();

        while next.len() < size {
            let parent_1_idx = rng.random_range(0..parent_count);
            let parent_1 = &ranked[parent_1_idx];
            let mut brain = if parent_count >= 2 && rng.random::<f32>() < params.crossover_rate {
                let mut parent_2_idx = rng.random_range(0..parent_count);
                while parent_2_idx == parent_1_idx {
                    parent_2_idx = rng.random_range(0..parent_count);
                }
                Brain::crossover(&parent_1.brain, &ranked[parent_2_idx].brain)
            } else {
                parent_1.brain.clone()
            };
            brain.mutate(params.mutation_scale);
            next.push(Genome::new(brain));
        }

        self.genomes = next;
    }
}

/// Runs the whole optimization without a window.
///
/// # Arguments
///
/// * `track` - Track raster
/// * `params` - Simulation and optimizer parameters
/// * `presenter` - Receives every tick; returning [`Flow::Quit`] ends the run
///
/// # Returns
///
/// One report per evaluated generation.
pub fn run_headless<P: Presenter + ?Sized>(
    track: &Track,
    params: &Params,
    presenter: &mut P,
) -> Result<Vec<GenerationReport>, SimError> {
    params.validate()?;

    let mut population = Population::new(params);
    let mut rng = rand::rng();
    let mut reports = Vec::with_capacity(params.generations as usize);

    for _ in 0..params.generations {
        let generation = population.begin_generation();
        let evaluation = {
            let mut members = population.members();
            evaluate(track, params, &mut members, generation, presenter)
        };

        let report = population.report(evaluation.ticks);
        log_report(&report);
        reports.push(report);

        if evaluation.flow == Flow::Quit {
            log::info!("Run stopped during generation {}", generation);
            break;
        }
        population.evolve(params, &mut rng);
    }

    Ok(reports)
}

/// Prints a generation summary to the log.
pub fn log_report(report: &GenerationReport) {
    log::info!(
        "Generation {}: population {}, best {:.1}, mean {:.1}, worst {:.1}, ticks {}",
        report.generation,
        report.population,
        report.best,
        report.mean,
        report.worst,
        report.ticks
    );
}
