use thiserror::Error;

/// Everything that can go wrong in this crate.
///
/// All of these are deterministic: retrying the same call with the same inputs will fail the same
/// way.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A numeric input was NaN or infinite.
    #[error("invalid {what}: {value}")]
    InvalidNumber { what: &'static str, value: f64 },

    /// Vincenty operations only work on the surface of the ellipsoid.
    #[error("point must be on the surface of the ellipsoid (height is {height} m)")]
    NotOnSurface { height: f64 },

    /// The Vincenty direct solution did not settle within its iteration cap.
    #[error("Vincenty formula failed to converge after {iterations} iterations")]
    NoConvergence { iterations: u32 },

    /// A user-built ellipsoid whose axes are not finite or not ordered.
    #[error("invalid ellipsoid: semi-axes a = {a} m, b = {b} m must satisfy 0 < b <= a")]
    InvalidEllipsoid { a: f64, b: f64 },

    /// The two points of a Vincenty inverse live on different ellipsoids.
    #[error("points are on different ellipsoids ({first} and {second})")]
    EllipsoidMismatch {
        first: &'static str,
        second: &'static str,
    },

    /// No ellipsoid in the registry has this name.
    #[error("unknown ellipsoid '{0}'")]
    UnknownEllipsoid(String),

    /// No datum in the registry has this name.
    #[error("unknown datum '{0}'")]
    UnknownDatum(String),

    /// No reference frame in the registry has this name.
    #[error("unknown reference frame '{0}'")]
    UnknownReferenceFrame(String),

    /// Neither a stored transform nor a chain through one intermediate frame connects the frames.
    #[error("no transform path from {from} to {to}")]
    NoTransformPath {
        from: &'static str,
        to: &'static str,
    },

    /// A datum conversion was asked of a point tagged with a reference frame.
    #[error("point is tagged with reference frame {0}, not a datum")]
    NotDatumTagged(&'static str),

    /// A reference-frame conversion was asked of a point not tagged with a reference frame.
    #[error("point is not tagged with a reference frame")]
    NotReferenceFrameTagged,
}

/// Rejects NaN and infinities, naming the offending input.
pub(crate) fn finite(what: &'static str, value: f64) -> Result<f64, Error> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::InvalidNumber { what, value })
    }
}
