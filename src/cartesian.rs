use crate::datum::{self, Datum};
use crate::ellipsoid::Ellipsoid;
use crate::error::Error;
use crate::frame::Frame;
use crate::geodetic::GeodeticPoint;
use crate::reference_frame::{self, ReferenceFrame};
use crate::Point3;
use std::fmt;
use std::fmt::{Display, Formatter};
use uom::si::f64::Length;
use uom::si::length::meter;

#[cfg(any(test, feature = "approx"))]
use approx::{AbsDiffEq, RelativeEq};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An Earth-Centered, Earth-Fixed (ECEF) position, optionally tagged with the datum or reference
/// frame it is expressed in.
///
/// Points without a tag are taken to be in WGS84.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CartesianPoint {
    /// X, Y, Z in meters
    pub(crate) point: Point3,
    #[cfg_attr(feature = "serde", serde(default))]
    frame: Frame,
}

impl CartesianPoint {
    pub(crate) fn from_nalgebra_point(point: Point3, frame: Frame) -> Self {
        Self { point, frame }
    }

    /// Constructs an untagged ECEF point.
    ///
    /// `x` points from the centre of the earth towards the intersection of the equator and the
    /// prime meridian, `z` towards the north pole, and `y` completes a right-handed system.
    pub fn from_cartesian(
        x: impl Into<Length>,
        y: impl Into<Length>,
        z: impl Into<Length>,
    ) -> Self {
        Self::from_nalgebra_point(
            Point3::new(
                x.into().get::<meter>(),
                y.into().get::<meter>(),
                z.into().get::<meter>(),
            ),
            Frame::Unspecified,
        )
    }

    /// Returns the same coordinates, tagged as being in `frame`.
    ///
    /// This does not move the point; use [`CartesianPoint::convert_datum`] or
    /// [`CartesianPoint::convert_reference_frame`] for that.
    #[must_use]
    pub fn with_frame(self, frame: impl Into<Frame>) -> Self {
        Self {
            frame: frame.into(),
            ..self
        }
    }

    #[must_use]
    pub fn x(&self) -> Length {
        Length::new::<meter>(self.point.x)
    }

    #[must_use]
    pub fn y(&self) -> Length {
        Length::new::<meter>(self.point.y)
    }

    #[must_use]
    pub fn z(&self) -> Length {
        Length::new::<meter>(self.point.z)
    }

    #[must_use]
    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Converts to latitude, longitude and height on the ellipsoid of this point's frame.
    #[must_use]
    pub fn to_geodetic(&self) -> GeodeticPoint {
        self.to_geodetic_on(self.frame.ellipsoid())
    }

    /// Converts to latitude, longitude and height on the given ellipsoid.
    ///
    /// The result keeps this point's frame tag.
    ///
    /// This uses [Bowring's method][bowring] in its single-pass form, which is accurate to well
    /// below a millimetre for points anywhere near the earth's surface.
    ///
    /// [bowring]: https://doi.org/10.1179/sre.1976.23.181.323
    #[must_use]
    pub fn to_geodetic_on(&self, ellipsoid: &Ellipsoid) -> GeodeticPoint {
        let (x, y, z) = (self.point.x, self.point.y, self.point.z);
        let (a, b) = (ellipsoid.a(), ellipsoid.b());
        let e2 = ellipsoid.eccentricity_sq(); // e²
        let eps2 = ellipsoid.second_eccentricity_sq(); // ε²

        let p = x.hypot(y); // distance from the minor axis
        let r = p.hypot(z); // polar radius

        let lat_phi = if p == 0. {
            // on the minor axis the parametric latitude is 0/0
            if z > 0. {
                std::f64::consts::FRAC_PI_2
            } else if z < 0. {
                -std::f64::consts::FRAC_PI_2
            } else {
                0.
            }
        } else {
            // parametric latitude
            let tan_beta = (b * z) / (a * p) * (1. + eps2 * b / r);
            let sin_beta = tan_beta / (1. + tan_beta * tan_beta).sqrt();
            let cos_beta = sin_beta / tan_beta;
            if cos_beta.is_nan() {
                // tan β = 0, ie on the equatorial plane
                0.
            } else {
                (z + eps2 * b * sin_beta.powi(3)).atan2(p - e2 * a * cos_beta.powi(3))
            }
        };
        let lon_lambda = y.atan2(x);

        let (sin_phi, cos_phi) = lat_phi.sin_cos();
        let nu = a / (1. - e2 * sin_phi * sin_phi).sqrt(); // prime vertical radius of curvature
        let height_h = p * cos_phi + z * sin_phi - a * a / nu;

        GeodeticPoint::from_degrees(
            lat_phi.to_degrees(),
            lon_lambda.to_degrees(),
            height_h,
            self.frame,
        )
    }

    /// Moves this point into another datum.
    ///
    /// Untagged points are taken to be in WGS84. Points tagged with a reference frame cannot be
    /// converted this way.
    pub fn convert_datum(&self, to: &'static Datum) -> Result<Self, Error> {
        let from = match self.frame {
            Frame::Unspecified => &Datum::WGS84,
            Frame::Datum(datum) => datum,
            Frame::ReferenceFrame { frame, .. } => return Err(Error::NotDatumTagged(frame.name())),
        };
        if from == to {
            return Ok(self.with_frame(to));
        }
        Ok(Self::from_nalgebra_point(
            datum::convert(&self.point, from, to),
            Frame::Datum(to),
        ))
    }

    /// Moves this point into another reference frame.
    ///
    /// The point keeps its observation epoch; only the frame changes. Fails if this point is not
    /// tagged with a reference frame, or if no chain of known transforms leads to `to`.
    pub fn convert_reference_frame(&self, to: &'static ReferenceFrame) -> Result<Self, Error> {
        let Frame::ReferenceFrame { frame, epoch } = self.frame else {
            return Err(Error::NotReferenceFrameTagged);
        };
        let route = reference_frame::route(frame, to)?;
        Ok(Self::from_nalgebra_point(
            route.apply(&self.point, epoch),
            Frame::ReferenceFrame { frame: to, epoch },
        ))
    }
}

impl From<GeodeticPoint> for CartesianPoint {
    fn from(value: GeodeticPoint) -> Self {
        value.to_cartesian()
    }
}

impl Display for CartesianPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let (x, y, z) = (self.point.x, self.point.y, self.point.z);
        write!(f, "({x:.3}m, {y:.3}m, {z:.3}m)")?;
        match self.frame {
            Frame::Unspecified => Ok(()),
            frame => write!(f, " {frame}"),
        }
    }
}

#[cfg(any(test, feature = "approx"))]
impl AbsDiffEq<Self> for CartesianPoint {
    type Epsilon = Length;

    fn default_epsilon() -> Self::Epsilon {
        // a millimetre, which is as far as any of the published transforms are good for
        Length::new::<meter>(0.001)
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        // per-axis rather than by the length of the difference
        self.frame == other.frame && self.point.abs_diff_eq(&other.point, epsilon.get::<meter>())
    }
}

#[cfg(any(test, feature = "approx"))]
impl RelativeEq for CartesianPoint {
    fn default_max_relative() -> Self::Epsilon {
        Length::new::<meter>(Point3::default_max_relative())
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.frame == other.frame
            && self.point.relative_eq(
                &other.point,
                epsilon.get::<meter>(),
                max_relative.get::<meter>(),
            )
    }
}
