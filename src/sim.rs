use crate::game::{Game, DEFAULT_DRAW};
use crate::solver::{Solver, SolverConfig, Verdict};
use anyhow::{anyhow, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU8;
use std::ops::RangeInclusive;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    pub games: u64,
    pub first_seed: u64,
    pub n_draw: NonZeroU8,
    pub solver: SolverConfig,
}

impl SimConfig {
    /// The seeds this batch deals, or `None` for an empty batch.
    pub fn seeds(&self) -> Result<Option<RangeInclusive<u64>>> {
        if self.games == 0 {
            return Ok(None);
        }
        let last = self.first_seed.checked_add(self.games - 1).ok_or_else(|| {
            anyhow!(
                "{} games from seed {} run past the last seed",
                self.games,
                self.first_seed
            )
        })?;
        Ok(Some(self.first_seed..=last))
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            games: 100,
            first_seed: 0,
            n_draw: DEFAULT_DRAW,
            solver: SolverConfig::default(),
        }
    }
}

/// Aggregate outcome of a batch of deals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub games: u64,
    pub solved: u64,
    pub unsolvable: u64,
    pub unknown: u64,
    pub nodes: u64,
}

impl Report {
    fn single(verdict: &Verdict, nodes: usize) -> Self {
        let mut report = Report {
            games: 1,
            nodes: nodes as u64,
            ..Report::default()
        };
        match verdict {
            Verdict::Solved(_) => report.solved = 1,
            Verdict::Unsolvable => report.unsolvable = 1,
            Verdict::Unknown => report.unknown = 1,
        }
        report
    }

    fn merge(self, other: Self) -> Self {
        Self {
            games: self.games + other.games,
            solved: self.solved + other.solved,
            unsolvable: self.unsolvable + other.unsolvable,
            unknown: self.unknown + other.unknown,
            nodes: self.nodes + other.nodes,
        }
    }

    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.solved as f64 / self.games as f64
        }
    }
}

/// Deals `config.games` consecutive seeds and searches each one in parallel.
/// Fails when the seed range does not fit in a `u64`.
pub fn simulate(config: &SimConfig) -> Result<Report> {
    let Some(seeds) = config.seeds()? else {
        return Ok(Report::default());
    };
    log::info!(
        "simulating {} games from seed {} (draw {})",
        config.games,
        config.first_seed,
        config.n_draw
    );
    let solver = Solver::new(config.solver);
    let report = seeds
        .into_par_iter()
        .map(|seed| {
            let search = solver.solve(&Game::seeded(config.n_draw, seed));
            log::debug!("seed {}: {:?} after {} nodes", seed, search.verdict, search.nodes);
            Report::single(&search.verdict, search.nodes)
        })
        .reduce(Report::default, Report::merge);
    log::info!(
        "{} of {} solved ({:.1}%)",
        report.solved,
        report.games,
        100.0 * report.win_rate()
    );
    Ok(report)
}
