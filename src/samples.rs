//! CSV readers for position samples and Kp feeds.
//!
//! Position files carry `time,x,y,z` columns with an optional `kp` column.
//! Positions are GSM in Earth radii unless another frame is named; see
//! [`sample_units`]. Kp files carry `time,kp`. Column lookup is by header
//! name, case-insensitive, so extra columns are ignored.

use std::io;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use radmon_core::time::{Epoch, TimeError};
use radmon_frames::{Frame, FrameError, Position, Units};
use radmon_solarwind::KpSeries;
use thiserror::Error;

/// One row of a position file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputSample {
    pub epoch: Epoch,
    pub position: Position,
    pub kp: Option<f64>,
}

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV missing '{0}' column")]
    MissingColumn(&'static str),
    #[error("line {line}: cannot parse {column} value '{value}'")]
    BadNumber {
        line: u64,
        column: &'static str,
        value: String,
    },
    #[error("line {line}: {source}")]
    BadTime { line: u64, source: TimeError },
    #[error("line {line}: {source}")]
    BadPosition { line: u64, source: FrameError },
}

/// Units sample files use for `frame`: Earth radii for the Sun-referenced
/// frames, kilometres for geographic and inertial ephemerides.
pub fn sample_units(frame: Frame) -> Units {
    match frame {
        Frame::Gsm | Frame::Gse | Frame::BowShockAligned => Units::EarthRadii,
        Frame::Geographic | Frame::Inertial => Units::Kilometres,
    }
}

pub fn read_samples<P: AsRef<Path>>(path: P) -> Result<Vec<InputSample>, SampleError> {
    read_samples_in(path, Frame::Gsm)
}

pub fn read_samples_from<R: io::Read>(reader: R) -> Result<Vec<InputSample>, SampleError> {
    read_samples_from_in(reader, Frame::Gsm)
}

/// Read samples whose positions are in `frame`.
pub fn read_samples_in<P: AsRef<Path>>(
    path: P,
    frame: Frame,
) -> Result<Vec<InputSample>, SampleError> {
    let rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    collect_samples(rdr, frame)
}

pub fn read_samples_from_in<R: io::Read>(
    reader: R,
    frame: Frame,
) -> Result<Vec<InputSample>, SampleError> {
    let rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    collect_samples(rdr, frame)
}

pub fn read_kp_series<P: AsRef<Path>>(path: P) -> Result<KpSeries, SampleError> {
    let rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    collect_kp(rdr)
}

pub fn read_kp_series_from<R: io::Read>(reader: R) -> Result<KpSeries, SampleError> {
    let rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    collect_kp(rdr)
}

fn collect_kp<R: io::Read>(mut rdr: csv::Reader<R>) -> Result<KpSeries, SampleError> {
    let headers = rdr.headers()?.clone();
    let time_idx = column(&headers, "time")?;
    let kp_idx = column(&headers, "kp")?;

    let mut samples = Vec::new();
    for rec in rdr.records() {
        let r = rec?;
        let line = line_of(&r);
        let epoch = epoch_field(&r, time_idx, line)?;
        let kp = number_field(&r, kp_idx, "kp", line)?;
        samples.push((epoch, kp));
    }
    Ok(KpSeries::new(samples))
}

fn collect_samples<R: io::Read>(
    mut rdr: csv::Reader<R>,
    frame: Frame,
) -> Result<Vec<InputSample>, SampleError> {
    let units = sample_units(frame);
    let headers = rdr.headers()?.clone();
    let time_idx = column(&headers, "time")?;
    let x_idx = column(&headers, "x")?;
    let y_idx = column(&headers, "y")?;
    let z_idx = column(&headers, "z")?;
    let kp_idx = headers.iter().position(|h| h.eq_ignore_ascii_case("kp"));

    let mut samples = Vec::new();
    for rec in rdr.records() {
        let r = rec?;
        let line = line_of(&r);
        let epoch = epoch_field(&r, time_idx, line)?;
        let x = number_field(&r, x_idx, "x", line)?;
        let y = number_field(&r, y_idx, "y", line)?;
        let z = number_field(&r, z_idx, "z", line)?;
        // An empty kp cell falls back the same way a missing column does.
        let kp = match kp_idx {
            Some(idx) if !r.get(idx).unwrap_or("").is_empty() => {
                Some(number_field(&r, idx, "kp", line)?)
            }
            _ => None,
        };
        let position = Position::new(frame, units, [x, y, z])
            .map_err(|source| SampleError::BadPosition { line, source })?;
        samples.push(InputSample {
            epoch,
            position,
            kp,
        });
    }
    Ok(samples)
}

fn column(headers: &StringRecord, name: &'static str) -> Result<usize, SampleError> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .ok_or(SampleError::MissingColumn(name))
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn number_field(
    record: &StringRecord,
    idx: usize,
    column: &'static str,
    line: u64,
) -> Result<f64, SampleError> {
    let raw = record.get(idx).unwrap_or("");
    raw.parse::<f64>().map_err(|_| SampleError::BadNumber {
        line,
        column,
        value: raw.to_string(),
    })
}

fn epoch_field(record: &StringRecord, idx: usize, line: u64) -> Result<Epoch, SampleError> {
    Epoch::parse(record.get(idx).unwrap_or(""))
        .map_err(|source| SampleError::BadTime { line, source })
}
