//! Aberration rotation about the magnetotail hinge.

use radmon_frames::{Frame, FrameError, Position, Units};

/// Rotate a GSM position in the xy-plane by `-aberration_deg` so the bow
/// shock symmetry axis lines up with x. Positions downstream of the Sun-side
/// hinge (`x > hinge_re`) pass through unrotated. The result is tagged
/// [`Frame::BowShockAligned`] and expressed in Earth radii.
pub fn rotate_about_hinge(
    position: &Position,
    aberration_deg: f64,
    hinge_re: f64,
) -> Result<Position, FrameError> {
    position.require(Frame::Gsm)?;
    let p = position.in_earth_radii();
    let (x, y, z) = (p.x(), p.y(), p.z());

    let (x_tail, y_tail) = if x <= hinge_re {
        let (sin_a, cos_a) = (-aberration_deg).to_radians().sin_cos();
        (x * cos_a + y * sin_a, -x * sin_a + y * cos_a)
    } else {
        (x, y)
    };
    Position::new(Frame::BowShockAligned, Units::EarthRadii, [x_tail, y_tail, z])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotates_inside_hinge() {
        let p = Position::gsm_re(10.0, 0.0, 0.0).unwrap();
        let r = rotate_about_hinge(&p, 4.0, 14.0).unwrap();
        assert_eq!(r.frame(), Frame::BowShockAligned);
        assert!((r.x() - 9.975640502598242).abs() < 1e-9);
        assert!((r.y() - 0.6975647374412529).abs() < 1e-9);
        assert_eq!(r.z(), 0.0);
    }

    #[test]
    fn passes_through_beyond_hinge() {
        let p = Position::gsm_re(15.0, 2.0, -1.0).unwrap();
        let r = rotate_about_hinge(&p, 4.0, 14.0).unwrap();
        assert_eq!(r.components(), [15.0, 2.0, -1.0]);
    }

    #[test]
    fn preserves_length() {
        let p = Position::gsm_re(-30.0, 12.0, 5.0).unwrap();
        let r = rotate_about_hinge(&p, 3.0, 14.0).unwrap();
        assert!((r.radius() - p.radius()).abs() < 1e-12);
    }

    #[test]
    fn kilometres_are_converted() {
        let p = Position::new(Frame::Gsm, Units::Kilometres, [6371.0 * 20.0, 0.0, 0.0]).unwrap();
        let r = rotate_about_hinge(&p, 4.0, 14.0).unwrap();
        assert_eq!(r.units(), Units::EarthRadii);
        assert!((r.x() - 20.0).abs() < 1e-12);
    }
}
