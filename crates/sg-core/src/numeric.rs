use crate::SgError;

/// Floating point type used throughout system
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &str) -> Result<Real, SgError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(SgError::NonFinite {
            what: what.to_string(),
            value: v,
        })
    }
}

/// Closed interval on the vertical layout axis (an epoch's `[min, max]`).
///
/// Bounds are normalised so an inverted pair still describes the same band.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Band {
    pub lo: Real,
    pub hi: Real,
}

impl Band {
    pub fn new(a: Real, b: Real) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, x: Real) -> bool {
        x >= self.lo && x <= self.hi
    }

    pub fn width(&self) -> Real {
        self.hi - self.lo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
        assert_eq!(ensure_finite(1.5, "ok").unwrap(), 1.5);
    }

    #[test]
    fn band_is_inclusive_and_normalised() {
        let band = Band::new(1262.9586, 1050.9586);
        assert_eq!(band.lo, 1050.9586);
        assert!(band.contains(1050.9586));
        assert!(band.contains(1262.9586));
        assert!(band.contains(1150.0));
        assert!(!band.contains(1263.0));
        assert!((band.width() - 212.0).abs() < 1e-9);
    }

    #[test]
    fn band_rejects_nan() {
        assert!(!Band::new(0.0, 10.0).contains(Real::NAN));
    }
}
