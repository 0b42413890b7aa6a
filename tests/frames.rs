use radmon::frames::{
    Frame, FrameError, Position, RotationState, Units, from_geographic, from_gse, from_gsm,
    from_spherical, to_geographic, to_gse, to_gsm, to_spherical,
};
use radmon::region::{classify_gsm, classify_inertial};
use radmon::common::time::Epoch;
use std::error::Error;

fn states() -> Vec<RotationState> {
    let mut out = Vec::new();
    for (i, gst) in [0.0, 1.3, 3.9, 6.1].into_iter().enumerate() {
        let sun_ra = 0.7 * i as f64 - 1.0;
        let sun_dec = 0.4 * (i as f64 - 1.5) / 1.5;
        out.push(
            RotationState::from_angles(
                gst,
                sun_ra,
                sun_dec,
                9.7_f64.to_radians(),
                (-72.6_f64).to_radians(),
                23.44_f64.to_radians(),
            )
            .expect("valid state"),
        );
    }
    out
}

fn positions(frame: Frame) -> Vec<Position> {
    [
        [7000.0, 0.0, 0.0],
        [-42_164.0, 1200.0, -300.0],
        [1.0e5, -2.5e5, 3.0e4],
        [12.0, 45.0, -800.0],
    ]
    .into_iter()
    .map(|xyz| Position::new(frame, Units::Kilometres, xyz).expect("finite"))
    .collect()
}

fn assert_close(a: &Position, b: &Position) {
    let scale = a.radius().max(1.0);
    for (u, v) in a.components().iter().zip(b.components()) {
        assert!(
            (u - v).abs() / scale < 1e-6,
            "{:?} vs {:?}",
            a.components(),
            b.components()
        );
    }
    assert_eq!(a.frame(), b.frame());
}

#[test]
fn geographic_round_trip() -> Result<(), Box<dyn Error>> {
    for state in states() {
        for p in positions(Frame::Inertial) {
            let geo = to_geographic(&p, &state)?;
            assert_eq!(geo.frame(), Frame::Geographic);
            assert!((geo.radius() - p.radius()).abs() < 1e-6 * p.radius());
            assert_close(&p, &from_geographic(&geo, &state)?);
        }
    }
    Ok(())
}

#[test]
fn gsm_gse_round_trip() -> Result<(), Box<dyn Error>> {
    for state in states() {
        for p in positions(Frame::Gsm) {
            let gse = to_gse(&p, &state)?;
            assert_eq!(gse.frame(), Frame::Gse);
            assert_close(&p, &from_gse(&gse, &state)?);
        }
        for p in positions(Frame::Geographic) {
            assert_close(&p, &from_gsm(&to_gsm(&p, &state)?, &state)?);
        }
    }
    Ok(())
}

#[test]
fn sun_line_is_gsm_and_gse_x() -> Result<(), Box<dyn Error>> {
    let state = RotationState::new(0.8, [0.6, 0.8, 0.0], [0.1, 0.0, 0.99], [0.0, -0.3978, 0.9175])?;
    let sun = Position::new(Frame::Inertial, Units::EarthRadii, [6.0, 8.0, 0.0])?;
    let gsm = to_gsm(&to_geographic(&sun, &state)?, &state)?;
    assert!((gsm.x() - 10.0).abs() < 1e-9);
    assert!(gsm.y().abs() < 1e-9 && gsm.z().abs() < 1e-9);
    let gse = to_gse(&gsm, &state)?;
    assert!((gse.x() - 10.0).abs() < 1e-9);
    Ok(())
}

#[test]
fn transforms_check_frame_tags() {
    let state = &states()[0];
    let gsm = Position::gsm_re(1.0, 2.0, 3.0).unwrap();
    assert!(matches!(
        to_geographic(&gsm, state),
        Err(FrameError::FrameMismatch {
            expected: Frame::Inertial,
            found: Frame::Gsm
        })
    ));
}

#[test]
fn non_finite_components_are_degenerate() {
    assert!(matches!(
        Position::gsm_re(f64::NAN, 0.0, 0.0),
        Err(FrameError::DegenerateInput { .. })
    ));
    assert!(Position::inertial_km(0.0, f64::INFINITY, 0.0).is_err());
}

#[test]
fn spherical_round_trip_and_origin() -> Result<(), Box<dyn Error>> {
    let p = Position::gsm_re(-3.0, 4.0, 12.0)?;
    let s = to_spherical(&p)?;
    assert!((s.radius - 13.0).abs() < 1e-12);
    assert_close(&p, &from_spherical(Frame::Gsm, &s)?);
    assert!(to_spherical(&Position::gsm_re(0.0, 0.0, 0.0)?).is_err());
    Ok(())
}

#[test]
fn inertial_classification_matches_gsm() -> Result<(), Box<dyn Error>> {
    let epoch = Epoch::from_calendar(2021, 3, 20, 12, 0, 0)?;
    for state in states() {
        for (x, y, z) in [(10.0, 0.0, 0.0), (-30.0, 40.0, 0.0), (0.0, 30.0, 0.0), (12.0, 5.0, 2.0)] {
            let gsm = Position::gsm_re(x, y, z)?;
            let inertial = from_geographic(&from_gsm(&gsm.in_kilometres(), &state)?, &state)?;
            let direct = classify_gsm(&gsm, 1.0)?;
            let via_inertial = classify_inertial(epoch, &inertial, 1.0, &state)?;
            assert_eq!(direct.label, via_inertial.label);
            for (a, b) in direct
                .rotated
                .components()
                .iter()
                .zip(via_inertial.rotated.components())
            {
                assert!((a - b).abs() < 1e-6);
            }
        }
    }
    Ok(())
}
