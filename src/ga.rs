//! Genetic search over placement orders.
//!
//! The GA evolves permutations of the item list; each permutation is decoded
//! by [`pack_by_order`] and scored by utilization minus an unplaced-item
//! penalty. Selection is tournament-of-3, recombination is ordered crossover
//! (OX), mutation is a single position swap, and the top tenth of every
//! generation is carried over unchanged.
//!
//! # Determinism
//!
//! Every random draw comes from one ChaCha8 stream seeded by
//! [`GaConfig::seed`], in a fixed order: the initial shuffles, then per
//! child two tournaments of three, two crossover cuts, one mutation gate
//! (drawn unconditionally), and the two swap positions when the gate passes.
//! Identical inputs and seed therefore produce identical plans on every
//! platform.

use crate::error::Result;
use crate::geometry::{Item, Truck};
use crate::placer::pack_by_order;
use crate::result::PackResult;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the order-evolving genetic algorithm.
///
/// The requested `population` and `generations` are upper bounds: large
/// instances are clamped further to keep the engine responsive (see
/// [`optimize`]).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GaConfig {
    /// Population size.
    pub population: usize,
    /// Number of generations.
    pub generations: usize,
    /// Probability that a child receives a swap mutation.
    pub mutation_rate: f64,
    /// Seed for the random stream.
    pub seed: u32,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population: 40,
            generations: 40,
            mutation_rate: 0.08,
            seed: 12345,
        }
    }
}

impl GaConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the population size.
    pub fn with_population(mut self, population: usize) -> Self {
        self.population = population;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, mutation_rate: f64) -> Self {
        self.mutation_rate = mutation_rate;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the effective (population, generations) for an instance of
    /// `n` items. Large instances are capped aggressively to keep the
    /// engine responsive for interactive use; both values are then floored
    /// so the loop is always well-formed.
    fn effective(&self, n: usize) -> (usize, usize) {
        let (mut population, mut generations) = (self.population, self.generations);
        if n > 250 {
            population = population.min(10);
            generations = generations.min(6);
        } else if n > 150 {
            population = population.min(18);
            generations = generations.min(12);
        } else {
            population = population.min(30);
            generations = generations.min(25);
        }
        (population.max(4), generations.max(1))
    }
}

/// One candidate ordering with its decoded plan and score.
#[derive(Debug, Clone)]
struct Individual {
    order: Vec<usize>,
    result: PackResult,
    score: f64,
}

/// Higher is better: reward utilization, penalize unplaced items.
fn score_result(result: &PackResult) -> f64 {
    result.utilization * 100.0 - result.unplaced.len() as f64 * 0.5
}

/// Seed ordering: volume descending, near-equal volumes broken by priority
/// descending. Stable, so input order decides remaining ties.
fn heuristic_order(items: &[Item]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| {
        let (va, vb) = (items[a].volume(), items[b].volume());
        if (va - vb).abs() > 1e-12 {
            vb.partial_cmp(&va).unwrap_or(Ordering::Equal)
        } else {
            items[b].priority.cmp(&items[a].priority)
        }
    });
    order
}

/// Tournament of 3 with replacement; strict improvement keeps the earliest
/// draw on ties.
fn tournament<'a>(population: &'a [Individual], rng: &mut ChaCha8Rng) -> &'a Individual {
    let mut best = &population[rng.gen_range(0..population.len())];
    for _ in 1..3 {
        let contender = &population[rng.gen_range(0..population.len())];
        if contender.score > best.score {
            best = contender;
        }
    }
    best
}

/// Ordered crossover with the given cut points `i <= j`: the child keeps
/// `a[i..=j]` in place and receives the remaining genes in the order they
/// appear in `b`, filling unassigned positions from the front.
fn ox(a: &[usize], b: &[usize], i: usize, j: usize) -> Vec<usize> {
    let n = a.len();
    let mut child = vec![usize::MAX; n];
    let mut used = vec![false; n];

    for k in i..=j {
        child[k] = a[k];
        used[a[k]] = true;
    }

    let mut write = 0;
    for &gene in b {
        if used[gene] {
            continue;
        }
        while write < n && child[write] != usize::MAX {
            write += 1;
        }
        if write < n {
            child[write] = gene;
        }
    }
    child
}

fn order_crossover(a: &[usize], b: &[usize], rng: &mut ChaCha8Rng) -> Vec<usize> {
    let n = a.len();
    let mut i = rng.gen_range(0..n);
    let mut j = rng.gen_range(0..n);
    if i > j {
        std::mem::swap(&mut i, &mut j);
    }
    ox(a, b, i, j)
}

/// Swap mutation. The gate draw happens unconditionally so that exactly one
/// uniform real is consumed per child regardless of the outcome; moving it
/// would desynchronize the random stream.
fn mutate(order: &mut [usize], mutation_rate: f64, rng: &mut ChaCha8Rng) {
    let gate: f64 = rng.gen();
    if gate > mutation_rate {
        return;
    }
    let a = rng.gen_range(0..order.len());
    let b = rng.gen_range(0..order.len());
    order.swap(a, b);
}

fn sort_by_score_desc(population: &mut [Individual]) {
    population.sort_by(|x, y| y.score.partial_cmp(&x.score).unwrap_or(Ordering::Equal));
}

/// Searches for a good placement order and returns the best plan found.
///
/// Deterministic in `(truck, items, config)` including the seed. An empty
/// item list returns an all-zero [`PackResult`] without running the placer.
pub fn optimize(truck: &Truck, items: &[Item], config: &GaConfig) -> Result<PackResult> {
    truck.validate()?;
    for item in items {
        item.validate()?;
    }

    if items.is_empty() {
        return Ok(PackResult::new());
    }

    let n = items.len();
    let (population, generations) = config.effective(n);
    if (population, generations) != (config.population, config.generations) {
        log::debug!(
            "workload scaling for {} items: population {} -> {}, generations {} -> {}",
            n,
            config.population,
            population,
            config.generations,
            generations
        );
    }

    let mut rng = ChaCha8Rng::seed_from_u64(u64::from(config.seed));

    let evaluate = |order: Vec<usize>| {
        let result = pack_by_order(truck, items, &order);
        let score = score_result(&result);
        Individual {
            order,
            result,
            score,
        }
    };

    let mut pop: Vec<Individual> = Vec::with_capacity(population);
    pop.push(evaluate(heuristic_order(items)));
    while pop.len() < population {
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(&mut rng);
        pop.push(evaluate(order));
    }

    for generation in 0..generations {
        sort_by_score_desc(&mut pop);

        let elite = (population / 10).max(1);
        let mut next: Vec<Individual> = Vec::with_capacity(population);
        next.extend(pop.iter().take(elite).cloned());

        while next.len() < population {
            let parent_a = tournament(&pop, &mut rng);
            let parent_b = tournament(&pop, &mut rng);
            let mut order = order_crossover(&parent_a.order, &parent_b.order, &mut rng);
            mutate(&mut order, config.mutation_rate, &mut rng);
            next.push(evaluate(order));
        }

        log::debug!(
            "generation {}: best score {:.4}",
            generation,
            next.iter().map(|ind| ind.score).fold(f64::NEG_INFINITY, f64::max)
        );

        pop = next;
    }

    sort_by_score_desc(&mut pop);
    Ok(pop.swap_remove(0).result)
}
