use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::{fs, path::Path};

const TRAJECTORY_HEADER: [&str; 4] = ["step", "S", "I", "R"];

/// Health-state counts of a run at a single step.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub struct Row {
    pub step: usize,
    #[serde(rename = "S")]
    pub s: usize,
    #[serde(rename = "I")]
    pub i: usize,
    #[serde(rename = "R")]
    pub r: usize,
}

/// Ordered trajectory of one run.
#[derive(Debug, Default)]
pub struct MetricsSink {
    rows: Vec<Row>,
}

impl MetricsSink {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn record(&mut self, step: usize, s: usize, i: usize, r: usize) {
        self.rows.push(Row { step, s, i, r });
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn size(&self) -> usize {
        self.rows.len()
    }

    /// Write the trajectory as `step,S,I,R` CSV, creating missing parent directories.
    pub fn export<P: AsRef<Path>>(&self, file: P) -> Result<()> {
        let file = file.as_ref();
        if let Some(dir) = file.parent() {
            fs::create_dir_all(dir).with_context(|| format!("failed to create {dir:?}"))?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(file)
            .with_context(|| format!("failed to create {file:?}"))?;

        writer
            .write_record(TRAJECTORY_HEADER)
            .context("failed to write header")?;
        for row in self.rows() {
            writer.serialize(row).context("failed to serialize row")?;
        }
        writer.flush().context("failed to flush writer stream")?;

        Ok(())
    }
}

/// Read a trajectory file written by [`MetricsSink::export`].
///
/// Rows with fewer than four fields, or with fields that are not
/// non-negative integers, are skipped.
pub fn read_trajectory<P: AsRef<Path>>(file: P) -> Result<Vec<Row>> {
    let file = file.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(file)
        .with_context(|| format!("failed to open {file:?}"))?;

    let mut rows = Vec::new();
    for (i_rec, record) in reader.records().enumerate() {
        let row = record
            .context("failed to read record")
            .and_then(|record| parse_row(&record));
        match row {
            Ok(row) => rows.push(row),
            Err(error) => log::warn!("skipping row {i_rec} of {file:?}: {error:#}"),
        }
    }

    Ok(rows)
}

fn parse_row(record: &csv::StringRecord) -> Result<Row> {
    if record.len() < TRAJECTORY_HEADER.len() {
        bail!("expected 4 fields, found {}", record.len());
    }
    let field = |idx: usize| -> Result<usize> {
        record[idx]
            .parse()
            .with_context(|| format!("invalid {} value {:?}", TRAJECTORY_HEADER[idx], &record[idx]))
    };
    Ok(Row {
        step: field(0)?,
        s: field(1)?,
        i: field(2)?,
        r: field(3)?,
    })
}
