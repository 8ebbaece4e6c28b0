use crate::metrics::Row;

/// Scalar outcome of one run.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct RunSummary {
    /// Maximum number of infected agents.
    pub peak_i: usize,
    /// First step at which `peak_i` is reached.
    pub time_to_peak: usize,
    /// Recovered agents in the last row.
    pub final_r: usize,
    /// Last step with infected agents, or 0.
    pub duration: usize,
    /// `final_r / n_agt`, or 0 for an empty population.
    pub attack_rate: f64,
}

impl RunSummary {
    pub fn from_trajectory(rows: &[Row], n_agt: usize) -> Self {
        let mut peak_i = 0;
        let mut time_to_peak = 0;
        for (i_row, row) in rows.iter().enumerate() {
            if i_row == 0 || row.i > peak_i {
                peak_i = row.i;
                time_to_peak = row.step;
            }
        }

        let duration = rows
            .iter()
            .filter(|row| row.i > 0)
            .map(|row| row.step)
            .max()
            .unwrap_or(0);

        let final_r = rows.last().map_or(0, |row| row.r);

        let attack_rate = if n_agt == 0 {
            0.0
        } else {
            final_r as f64 / n_agt as f64
        };

        Self {
            peak_i,
            time_to_peak,
            final_r,
            duration,
            attack_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(step: usize, s: usize, i: usize, r: usize) -> Row {
        Row { step, s, i, r }
    }

    #[test]
    fn summary_of_typical_outbreak() {
        let rows = vec![
            row(0, 8, 2, 0),
            row(1, 5, 4, 1),
            row(2, 3, 5, 2),
            row(3, 2, 5, 3),
            row(4, 2, 1, 7),
            row(5, 2, 0, 8),
        ];
        let summary = RunSummary::from_trajectory(&rows, 10);
        assert_eq!(
            summary,
            RunSummary {
                peak_i: 5,
                time_to_peak: 2,
                final_r: 8,
                duration: 4,
                attack_rate: 0.8,
            }
        );
    }

    #[test]
    fn peak_at_step_zero() {
        let rows = vec![row(0, 0, 10, 0), row(1, 0, 0, 10)];
        let summary = RunSummary::from_trajectory(&rows, 10);
        assert_eq!(
            summary,
            RunSummary {
                peak_i: 10,
                time_to_peak: 0,
                final_r: 10,
                duration: 0,
                attack_rate: 1.0,
            }
        );
    }

    #[test]
    fn no_infections_gives_zeros() {
        let summary = RunSummary::from_trajectory(&[row(0, 50, 0, 0)], 50);
        assert_eq!(summary.peak_i, 0);
        assert_eq!(summary.time_to_peak, 0);
        assert_eq!(summary.duration, 0);
        assert_eq!(summary.attack_rate, 0.0);
    }

    #[test]
    fn empty_trajectory_and_population() {
        let summary = RunSummary::from_trajectory(&[], 0);
        assert_eq!(
            summary,
            RunSummary {
                peak_i: 0,
                time_to_peak: 0,
                final_r: 0,
                duration: 0,
                attack_rate: 0.0,
            }
        );
    }
}
