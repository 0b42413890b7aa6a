//! Export helpers for region tables and run summaries.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

pub mod regions {
    use std::io::{self, Write};

    const HEADER: &str = "epoch_s\tutc\tr_re\ttheta_deg\tphi_deg\tx_gsm_re\ty_gsm_re\tz_gsm_re\tx_gse_re\ty_gse_re\tz_gse_re\tkp\tregion";

    /// Write the region table header.
    pub fn write_header(writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)
    }

    /// Tab-separated row of the region table. Missing values print as `-`.
    #[derive(Debug, Clone)]
    pub struct Record<'a> {
        pub epoch_s: f64,
        pub utc: &'a str,
        pub r_re: f64,
        /// GSM colatitude; undefined at the origin.
        pub theta_deg: Option<f64>,
        pub phi_deg: Option<f64>,
        pub gsm_re: [f64; 3],
        /// Only available when the run has a rotation state.
        pub gse_re: Option<[f64; 3]>,
        pub kp: f64,
        /// 1 solar wind, 2 magnetosheath, 3 magnetosphere.
        pub region: u8,
    }

    impl<'a> Record<'a> {
        /// Serialize the record, matching the header ordering.
        pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
            let [x, y, z] = self.gsm_re;
            let gse = self.gse_re.map(|v| v.map(Some)).unwrap_or([None; 3]);
            writeln!(
                writer,
                "{:.3}\t{}\t{:.4}\t{}\t{}\t{:.4}\t{:.4}\t{:.4}\t{}\t{}\t{}\t{:.3}\t{}",
                self.epoch_s,
                self.utc,
                self.r_re,
                cell(self.theta_deg, 3),
                cell(self.phi_deg, 3),
                x,
                y,
                z,
                cell(gse[0], 4),
                cell(gse[1], 4),
                cell(gse[2], 4),
                self.kp,
                self.region,
            )
        }
    }

    fn cell(value: Option<f64>, precision: usize) -> String {
        match value {
            Some(v) => format!("{v:.precision$}"),
            None => String::from("-"),
        }
    }
}

pub mod summary {
    use serde::Serialize;
    use serde_json::to_writer_pretty;
    use std::io::{self, Write};

    /// Counts reported after a table run.
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
    pub struct RunSummary {
        pub samples: usize,
        pub solar_wind: usize,
        pub magnetosheath: usize,
        pub magnetosphere: usize,
        /// Samples whose Kp was outside [0, 9] and got clamped.
        pub clamped_kp: usize,
        /// Samples that could not be classified.
        pub failed: usize,
    }

    impl RunSummary {
        pub fn record_solar_wind(&mut self) {
            self.samples += 1;
            self.solar_wind += 1;
        }

        pub fn record_magnetosheath(&mut self) {
            self.samples += 1;
            self.magnetosheath += 1;
        }

        pub fn record_magnetosphere(&mut self) {
            self.samples += 1;
            self.magnetosphere += 1;
        }

        /// Note that the sample just recorded ran under a clamped Kp.
        pub fn record_clamped_kp(&mut self) {
            self.clamped_kp += 1;
        }

        pub fn record_failure(&mut self) {
            self.samples += 1;
            self.failed += 1;
        }
    }

    /// Write the summary as pretty-printed JSON followed by a newline.
    pub fn write_json(writer: &mut dyn Write, summary: &RunSummary) -> io::Result<()> {
        to_writer_pretty(&mut *writer, summary)?;
        writeln!(writer)
    }
}
