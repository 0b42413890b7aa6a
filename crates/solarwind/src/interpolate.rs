//! Two-point interpolation on linear or logarithmic axes.

/// Axis scaling for [`interpolate`], written as x-axis/y-axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitMode {
    LinearLinear,
    /// Logarithmic x, linear y.
    LogLinear,
    /// Linear x, logarithmic y.
    LinearLog,
    LogLog,
}

impl FitMode {
    fn log_x(self) -> bool {
        matches!(self, FitMode::LogLinear | FitMode::LogLog)
    }

    fn log_y(self) -> bool {
        matches!(self, FitMode::LinearLog | FitMode::LogLog)
    }
}

/// Value at `x` on the line through `(x1, y1)` and `(x2, y2)`.
///
/// A log axis is only used when every operand on that axis is positive;
/// otherwise that axis falls back to linear.
pub fn interpolate(x1: f64, y1: f64, x2: f64, y2: f64, x: f64, mode: FitMode) -> f64 {
    let (xx1, xx2, xx) = if mode.log_x() && x1 > 0.0 && x2 > 0.0 && x > 0.0 {
        (x1.ln(), x2.ln(), x.ln())
    } else {
        (x1, x2, x)
    };

    let log_y = mode.log_y() && y1 > 0.0 && y2 > 0.0;
    let (yy1, yy2) = if log_y { (y1.ln(), y2.ln()) } else { (y1, y2) };

    let y = yy1 - (yy1 - yy2) * (xx1 - xx) / (xx1 - xx2);
    if log_y { y.exp() } else { y }
}
