//! Batch annotation of position samples with their region.

use std::io::{self, Write};

use log::warn;
use radmon_core::time::Epoch;
use radmon_export::regions::{Record, write_header};
use radmon_export::summary::RunSummary;
use radmon_frames::{Frame, Position, RotationProvider, to_gse, to_spherical};
use radmon_region::{Classification, Classifier, RegionError, RegionLabel};
use radmon_solarwind::KpSeries;

use crate::samples::InputSample;

/// A sample paired with the Kp it was classified under and the outcome.
#[derive(Debug, Clone)]
pub struct AnnotatedSample {
    pub sample: InputSample,
    pub kp: f64,
    pub result: Result<Classification, RegionError>,
    /// GSE position (Re), when the run has a rotation state.
    pub gse: Option<Position>,
}

/// Kp for a sample: its own column, else the feed value at its epoch,
/// else `default_kp`.
pub fn kp_for(sample: &InputSample, feed: Option<&KpSeries>, default_kp: f64) -> f64 {
    sample
        .kp
        .or_else(|| feed.and_then(|series| series.kp_at(sample.epoch)))
        .unwrap_or(default_kp)
}

/// Classify every sample. Each sample is independent; a failure is kept
/// alongside its sample rather than aborting the run.
///
/// Samples outside GSM need `rotation` to reach GSM; without it they fail
/// with [`RegionError::MissingRotation`].
pub fn annotate(
    samples: &[InputSample],
    feed: Option<&KpSeries>,
    default_kp: f64,
    classifier: &Classifier,
    rotation: Option<&dyn RotationProvider>,
) -> Vec<AnnotatedSample> {
    samples
        .iter()
        .map(|sample| {
            let kp = kp_for(sample, feed, default_kp);
            let result = match (sample.position.frame(), rotation) {
                (Frame::Gsm, _) => classifier.classify(&sample.position, kp),
                (_, Some(provider)) => {
                    classifier.classify_inertial(sample.epoch, &sample.position, kp, provider)
                }
                (frame, None) => Err(RegionError::MissingRotation(frame)),
            };
            let gse = match (&result, rotation) {
                (Ok(classification), Some(provider)) => {
                    gse_position(classification, provider, sample.epoch)
                }
                _ => None,
            };
            AnnotatedSample {
                sample: *sample,
                kp,
                result,
                gse,
            }
        })
        .collect()
}

fn gse_position(
    classification: &Classification,
    provider: &dyn RotationProvider,
    epoch: Epoch,
) -> Option<Position> {
    let gse = provider
        .rotation_state(epoch)
        .and_then(|state| to_gse(&classification.gsm, &state));
    match gse {
        Ok(position) => Some(position),
        Err(err) => {
            warn!("no GSE position at {} s: {err}", epoch.unix_seconds());
            None
        }
    }
}

/// Write the region table and return the run summary. Failed samples are
/// logged and left out of the table.
pub fn write_table(writer: &mut dyn Write, rows: &[AnnotatedSample]) -> io::Result<RunSummary> {
    let mut summary = RunSummary::default();
    write_header(writer)?;
    for row in rows {
        let classification = match &row.result {
            Ok(c) => c,
            Err(err) => {
                warn!(
                    "sample at {} s not classified: {err}",
                    row.sample.epoch.unix_seconds()
                );
                summary.record_failure();
                continue;
            }
        };
        let utc = row
            .sample
            .epoch
            .format_utc()
            .unwrap_or_else(|_| String::from("-"));
        let gsm = classification.gsm;
        let spherical = to_spherical(&gsm).ok();
        Record {
            epoch_s: row.sample.epoch.unix_seconds(),
            utc: &utc,
            r_re: gsm.radius(),
            theta_deg: spherical.map(|s| s.colatitude_deg),
            phi_deg: spherical.map(|s| s.azimuth_deg),
            gsm_re: gsm.components(),
            gse_re: row.gse.map(|p| p.components()),
            kp: row.kp,
            region: classification.label.code(),
        }
        .write_to(writer)?;
        match classification.label {
            RegionLabel::SolarWind => summary.record_solar_wind(),
            RegionLabel::Magnetosheath => summary.record_magnetosheath(),
            RegionLabel::Magnetosphere => summary.record_magnetosphere(),
        }
        if classification.solar_wind.activity.was_clamped() {
            summary.record_clamped_kp();
        }
    }
    writer.flush()?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use radmon_frames::{RotationState, from_geographic, from_gsm};

    fn sample(seconds: f64, kp: Option<f64>) -> InputSample {
        InputSample {
            epoch: Epoch::from_unix_seconds(seconds).unwrap(),
            position: Position::gsm_re(10.0, 0.0, 0.0).unwrap(),
            kp,
        }
    }

    fn rotation() -> RotationState {
        RotationState::from_angles(
            1.1,
            0.4,
            0.15,
            9.4_f64.to_radians(),
            287.4_f64.to_radians(),
            23.44_f64.to_radians(),
        )
        .unwrap()
    }

    #[test]
    fn kp_precedence() {
        let feed = KpSeries::new(vec![(Epoch::from_unix_seconds(0.0).unwrap(), 6.0)]);
        assert_eq!(kp_for(&sample(10.0, Some(2.0)), Some(&feed), 1.0), 2.0);
        assert_eq!(kp_for(&sample(10.0, None), Some(&feed), 1.0), 6.0);
        assert_eq!(kp_for(&sample(10.0, None), None, 1.0), 1.0);
    }

    #[test]
    fn clamped_and_failed_samples_are_counted() {
        let rows = annotate(
            &[sample(0.0, Some(12.0)), sample(60.0, Some(f64::NAN)), sample(120.0, None)],
            None,
            1.0,
            &Classifier::default(),
            None,
        );
        let mut out = Vec::new();
        let summary = write_table(&mut out, &rows).unwrap();
        assert_eq!(summary.samples, 3);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.clamped_kp, 1);
        // Kp 12 clamps to 9, which pushes (10, 0, 0) out into the magnetosheath.
        assert_eq!(summary.magnetosheath, 1);
        assert_eq!(summary.magnetosphere, 1);
        assert_eq!(summary.solar_wind, 0);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 3);
    }

    #[test]
    fn inertial_samples_need_a_rotation_state() {
        let state = rotation();
        let gsm = Position::gsm_re(-30.0, 40.0, 2.0).unwrap();
        let gei = from_geographic(&from_gsm(&gsm, &state).unwrap(), &state)
            .unwrap()
            .in_kilometres();
        let inertial = InputSample {
            epoch: Epoch::from_unix_seconds(0.0).unwrap(),
            position: gei,
            kp: Some(1.0),
        };

        let rows = annotate(&[inertial], None, 1.0, &Classifier::default(), Some(&state));
        let classification = rows[0].result.as_ref().unwrap();
        assert_eq!(classification.label, RegionLabel::Magnetosheath);
        for (a, b) in classification.gsm.components().iter().zip(gsm.components()) {
            assert!((a - b).abs() < 1e-6, "{a} vs {b}");
        }
        let gse = rows[0].gse.unwrap();
        assert_eq!(gse.frame(), Frame::Gse);
        assert!((gse.radius() - gsm.radius()).abs() < 1e-6);

        let rows = annotate(&[inertial], None, 1.0, &Classifier::default(), None);
        assert!(matches!(
            rows[0].result,
            Err(RegionError::MissingRotation(Frame::Inertial))
        ));
        assert!(rows[0].gse.is_none());
    }

    #[test]
    fn table_rows_carry_spherical_and_gse_columns() {
        let state = rotation();
        let rows = annotate(
            &[sample(0.0, Some(1.0))],
            None,
            1.0,
            &Classifier::default(),
            Some(&state),
        );
        let mut out = Vec::new();
        write_table(&mut out, &rows).unwrap();
        let text = String::from_utf8(out).unwrap();
        let cells: Vec<&str> = text.lines().nth(1).unwrap().split('\t').collect();
        assert_eq!(cells.len(), 13);
        assert_eq!(cells[2], "10.0000");
        assert_eq!(cells[3], "90.000");
        assert_eq!(cells[4], "0.000");
        assert!(cells[8..11].iter().all(|c| c.parse::<f64>().is_ok()));
        assert_eq!(cells[12], "3");
    }
}
