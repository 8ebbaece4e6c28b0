use crate::metrics::read_trajectory;
use crate::stats::{Accumulator, AggregateStats};
use crate::summary::RunSummary;
use anyhow::{Context, Result};
use std::{fs, path::Path};

const SUMMARY_HEADER: [&str; 6] = [
    "run",
    "peakI",
    "timeToPeak",
    "finalR",
    "duration",
    "attackRate",
];

/// Per-run metric aggregated across runs.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Metric {
    PeakI,
    TimeToPeak,
    FinalR,
    Duration,
    AttackRate,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::PeakI,
        Metric::TimeToPeak,
        Metric::FinalR,
        Metric::Duration,
        Metric::AttackRate,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::PeakI => "peakI",
            Metric::TimeToPeak => "timeToPeak",
            Metric::FinalR => "finalR",
            Metric::Duration => "duration",
            Metric::AttackRate => "attackRate",
        }
    }

    pub fn value(&self, summary: &RunSummary) -> f64 {
        match self {
            Metric::PeakI => summary.peak_i as f64,
            Metric::TimeToPeak => summary.time_to_peak as f64,
            Metric::FinalR => summary.final_r as f64,
            Metric::Duration => summary.duration as f64,
            Metric::AttackRate => summary.attack_rate,
        }
    }
}

/// Reduces the runs of one scenario to a summary table and per-metric statistics.
pub struct Analyzer {
    n_agt: usize,
    runs: Vec<(String, RunSummary)>,
    acc_vec: Vec<Accumulator>,
}

impl Analyzer {
    pub fn new(n_agt: usize) -> Self {
        let mut acc_vec = Vec::new();
        acc_vec.resize_with(Metric::ALL.len(), Accumulator::new);
        Self {
            n_agt,
            runs: Vec::new(),
            acc_vec,
        }
    }

    pub fn add_summary(&mut self, run_name: String, summary: RunSummary) {
        for (metric, acc) in Metric::ALL.iter().zip(self.acc_vec.iter_mut()) {
            acc.add(metric.value(&summary));
        }
        self.runs.push((run_name, summary));
    }

    /// Summarize a trajectory file, named after its file stem.
    pub fn add_file<P: AsRef<Path>>(&mut self, file: P) -> Result<()> {
        let file = file.as_ref();
        let rows = read_trajectory(file).with_context(|| format!("failed to read {file:?}"))?;
        let run_name = file
            .file_stem()
            .and_then(|stem| stem.to_str())
            .with_context(|| format!("invalid run file name {file:?}"))?
            .to_string();
        self.add_summary(run_name, RunSummary::from_trajectory(&rows, self.n_agt));
        Ok(())
    }

    pub fn runs(&self) -> &[(String, RunSummary)] {
        &self.runs
    }

    /// Write one row per run, creating missing parent directories.
    pub fn save_results<P: AsRef<Path>>(&self, file: P) -> Result<()> {
        let file = file.as_ref();
        if let Some(dir) = file.parent() {
            fs::create_dir_all(dir).with_context(|| format!("failed to create {dir:?}"))?;
        }

        let mut writer =
            csv::Writer::from_path(file).with_context(|| format!("failed to create {file:?}"))?;

        writer
            .write_record(SUMMARY_HEADER)
            .context("failed to write header")?;
        for (run_name, summary) in self.runs() {
            writer
                .write_record([
                    run_name.clone(),
                    summary.peak_i.to_string(),
                    summary.time_to_peak.to_string(),
                    summary.final_r.to_string(),
                    summary.duration.to_string(),
                    format!("{:.4}", summary.attack_rate),
                ])
                .with_context(|| format!("failed to write row of {run_name}"))?;
        }
        writer.flush().context("failed to flush writer stream")?;

        Ok(())
    }

    /// Statistics per metric, `None` when no runs were added.
    pub fn report(&self) -> Vec<(Metric, Option<AggregateStats>)> {
        Metric::ALL
            .iter()
            .zip(self.acc_vec.iter())
            .map(|(&metric, acc)| (metric, acc.report()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricsSink;

    fn write_run(dir: &Path, name: &str, rows: &[(usize, usize, usize, usize)]) {
        let mut sink = MetricsSink::new();
        for &(step, s, i, r) in rows {
            sink.record(step, s, i, r);
        }
        sink.export(dir.join(name)).unwrap();
    }

    #[test]
    fn summary_table_lists_runs_in_order() {
        let dir = tempfile::tempdir().unwrap();
        write_run(dir.path(), "run_seed1.csv", &[(0, 0, 10, 0), (1, 0, 0, 10)]);
        write_run(
            dir.path(),
            "run_seed2.csv",
            &[(0, 8, 2, 0), (1, 6, 3, 1), (2, 6, 0, 4)],
        );

        let mut analyzer = Analyzer::new(10);
        analyzer.add_file(dir.path().join("run_seed1.csv")).unwrap();
        analyzer.add_file(dir.path().join("run_seed2.csv")).unwrap();

        let out = dir.path().join("analysis").join("summaries").join("baseline_summary.csv");
        analyzer.save_results(&out).unwrap();
        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            "run,peakI,timeToPeak,finalR,duration,attackRate\n\
             run_seed1,10,0,10,0,1.0000\n\
             run_seed2,3,1,4,1,0.4000\n"
        );
    }

    #[test]
    fn report_aggregates_each_metric() {
        let mut analyzer = Analyzer::new(10);
        let summary = |peak_i, final_r| RunSummary {
            peak_i,
            time_to_peak: 1,
            final_r,
            duration: 3,
            attack_rate: final_r as f64 / 10.0,
        };
        analyzer.add_summary("a".into(), summary(4, 6));
        analyzer.add_summary("b".into(), summary(6, 8));

        let report = analyzer.report();
        let names: Vec<_> = report.iter().map(|(metric, _)| metric.name()).collect();
        assert_eq!(
            names,
            vec!["peakI", "timeToPeak", "finalR", "duration", "attackRate"]
        );

        let peak = report[0].1.unwrap();
        assert_eq!(peak.mean, 5.0);
        assert_eq!(peak.n, 2);
        let time_to_peak = report[1].1.unwrap();
        assert_eq!(time_to_peak.std_dev, 0.0);
        assert_eq!(time_to_peak.ci_low, 1.0);
        let attack_rate = report[4].1.unwrap();
        assert!((attack_rate.mean - 0.7).abs() < 1e-12);
    }

    #[test]
    fn empty_analyzer_reports_no_data() {
        let analyzer = Analyzer::new(50);
        assert!(analyzer.report().iter().all(|(_, stats)| stats.is_none()));
        assert!(analyzer.runs().is_empty());
    }
}
