use crate::analysis::Analyzer;
use crate::config::Config;
use crate::engine::Engine;
use crate::metrics::MetricsSink;
use crate::scenario::Scenario;
use anyhow::{Context, Result, bail};
use glob::glob;
use std::{
    fs,
    path::{Path, PathBuf},
};

pub struct Manager {
    sim_dir: PathBuf,
    cfg: Config,
}

impl Manager {
    pub fn new<P: AsRef<Path>>(sim_dir: P) -> Result<Self> {
        let sim_dir = sim_dir.as_ref().to_path_buf();

        let cfg = Config::from_file(sim_dir.join("config.toml")).context("failed to construct cfg")?;
        log::info!("{cfg:#?}");

        Ok(Self { sim_dir, cfg })
    }

    /// Simulate one scenario with one seed and export its trajectory.
    pub fn run_once(&self, scenario: Scenario, seed: u64) -> Result<PathBuf> {
        let mut engine = Engine::new(self.cfg.sim_params(scenario, seed));
        let mut sink = MetricsSink::new();
        engine
            .run_simulation(&mut sink)
            .context("failed to run simulation")?;

        let run_file = self.run_file(scenario, seed);
        sink.export(&run_file)
            .with_context(|| format!("failed to export {run_file:?}"))?;
        log::info!("saved {} rows to {run_file:?}", sink.size());

        Ok(run_file)
    }

    /// Simulate every configured scenario with every configured seed.
    ///
    /// A failed run does not stop the batch.
    pub fn run_batch(&self) -> Result<()> {
        let mut n_failed = 0;
        for &scenario in &self.cfg.run.scenarios {
            log::info!("running batch of {scenario}");
            for &seed in &self.cfg.run.seeds {
                if let Err(error) = self.run_once(scenario, seed) {
                    log::warn!("run of {scenario} with seed {seed} failed: {error:#}");
                    n_failed += 1;
                }
            }
        }

        let n_runs = self.cfg.run.scenarios.len() * self.cfg.run.seeds.len();
        if n_failed > 0 {
            bail!("{n_failed} of {n_runs} runs failed");
        }
        log::info!("completed {n_runs} runs");

        Ok(())
    }

    /// Summarize the runs of every configured scenario.
    ///
    /// Scenarios without a run directory are skipped.
    pub fn analyze_sim(&self) -> Result<()> {
        for &scenario in &self.cfg.run.scenarios {
            let scenario_dir = self.scenario_dir(scenario);
            if !scenario_dir.is_dir() {
                log::warn!("no folder {scenario_dir:?}, skipping {scenario}");
                continue;
            }

            let analyzer = self
                .analyze_scenario(scenario)
                .with_context(|| format!("failed to analyze {scenario}"))?;

            let summary_file = self.summary_file(scenario);
            match analyzer.save_results(&summary_file) {
                Ok(()) => log::info!("wrote summary {summary_file:?}"),
                Err(error) => log::warn!("failed to write {summary_file:?}: {error:#}"),
            }

            for (metric, stats) in analyzer.report() {
                match stats {
                    Some(stats) => log::info!("{scenario} {}: {stats}", metric.name()),
                    None => log::info!("{scenario} {}: no data", metric.name()),
                }
            }
        }

        Ok(())
    }

    /// Remove all run and analysis output.
    pub fn clean_sim(&self) -> Result<()> {
        for dir in [self.sim_dir.join("runs"), self.sim_dir.join("analysis")] {
            if dir.is_dir() {
                fs::remove_dir_all(&dir).with_context(|| format!("failed to remove {dir:?}"))?;
                log::info!("removed {dir:?}");
            }
        }
        Ok(())
    }

    fn analyze_scenario(&self, scenario: Scenario) -> Result<Analyzer> {
        let mut analyzer = Analyzer::new(self.cfg.init.population_size);
        for run_file in self.run_files(scenario)? {
            if let Err(error) = analyzer.add_file(&run_file) {
                log::warn!("skipping {run_file:?}: {error:#}");
            }
        }
        Ok(analyzer)
    }

    /// Run files of `scenario`, sorted by file name.
    fn run_files(&self, scenario: Scenario) -> Result<Vec<PathBuf>> {
        let pattern = self.scenario_dir(scenario).join("run_seed*.csv");
        let pattern = pattern.to_str().context("pattern is not valid UTF-8")?;
        let mut files: Vec<_> = glob(pattern)
            .context("failed to glob run files")?
            .filter_map(Result::ok)
            .filter(|p| p.is_file())
            .collect();
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    fn scenario_dir(&self, scenario: Scenario) -> PathBuf {
        self.sim_dir.join("runs").join(scenario.as_str())
    }

    fn run_file(&self, scenario: Scenario, seed: u64) -> PathBuf {
        self.scenario_dir(scenario)
            .join(format!("run_seed{seed}.csv"))
    }

    fn summary_file(&self, scenario: Scenario) -> PathBuf {
        self.sim_dir
            .join("analysis")
            .join("summaries")
            .join(format!("{scenario}_summary.csv"))
    }
}
