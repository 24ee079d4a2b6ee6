use crate::cartesian::CartesianPoint;
use crate::datum::Datum;
use crate::ellipsoid::Ellipsoid;
use crate::error::{finite, Error};
use crate::frame::Frame;
use crate::reference_frame::ReferenceFrame;
use crate::util::{central_angle_by_haversine, wrap180, wrap90};
use crate::Point3;
use std::fmt;
use std::fmt::Display;
use uom::si::f64::{Angle, Length};
use uom::si::{angle::degree, length::meter};

#[cfg(any(test, feature = "approx"))]
use approx::{AbsDiffEq, RelativeEq};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An earth-bound location given by latitude, longitude, and height above an ellipsoid.
///
/// Which ellipsoid is determined by the point's [`Frame`]: its datum's or reference frame's
/// ellipsoid, or WGS84 if the point carries no frame.
///
/// Points are immutable. Every conversion returns a new point.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(into = "GeodeticRepr", try_from = "GeodeticRepr")
)]
pub struct GeodeticPoint {
    /// degrees, in [-90, 90]
    pub(crate) latitude: f64,
    /// degrees, in (-180, 180]
    pub(crate) longitude: f64,
    /// metres above the ellipsoid
    pub(crate) height: f64,
    frame: Frame,
}

impl GeodeticPoint {
    /// Constructs a location from latitude, longitude, height, and frame.
    ///
    /// Latitudes outside [-90°, 90°] reflect back off the poles (so 100° is read as 80°), and
    /// longitudes are wrapped into (-180°, 180°]. Fails if any component is NaN or infinite.
    pub fn build(
        Components {
            latitude,
            longitude,
            height,
            frame,
        }: Components,
    ) -> Result<Self, Error> {
        let latitude = finite("latitude", latitude.get::<degree>())?;
        let longitude = finite("longitude", longitude.get::<degree>())?;
        let height = finite("height", height.get::<meter>())?;
        if let Some(epoch) = frame.epoch() {
            finite("epoch", epoch)?;
        }
        Ok(Self::from_degrees(latitude, longitude, height, frame))
    }

    /// Builds a point from raw degrees and metres, wrapping but not validating them.
    pub(crate) fn from_degrees(latitude: f64, longitude: f64, height: f64, frame: Frame) -> Self {
        Self {
            latitude: wrap90(latitude),
            longitude: wrap180(longitude),
            height,
            frame,
        }
    }

    /// Returns the same coordinates tagged with another frame, without converting them.
    ///
    /// To move the point into another frame, use [`GeodeticPoint::convert_datum`] or
    /// [`GeodeticPoint::convert_reference_frame`].
    #[must_use]
    pub fn with_frame(self, frame: impl Into<Frame>) -> Self {
        Self {
            frame: frame.into(),
            ..self
        }
    }

    /// Returns the number of degrees north of the equator ("northing"), in [-90°, 90°].
    #[must_use]
    pub fn latitude(&self) -> Angle {
        Angle::new::<degree>(self.latitude)
    }

    /// Returns the number of degrees east of the [IERS Reference Meridian] ("easting"), in
    /// (-180°, 180°].
    ///
    /// [IERS Reference Meridian]: https://en.wikipedia.org/wiki/IERS_Reference_Meridian
    #[must_use]
    pub fn longitude(&self) -> Angle {
        Angle::new::<degree>(self.longitude)
    }

    /// Returns the height above the ellipsoid.
    ///
    /// Note that no ellipsoid perfectly aligns with ground level, so while this is similar to
    /// altitude above sea level, it is not equal to it.
    #[must_use]
    pub fn height(&self) -> Length {
        Length::new::<meter>(self.height)
    }

    #[must_use]
    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// The ellipsoid this point's latitude, longitude, and height are relative to.
    #[must_use]
    pub fn ellipsoid(&self) -> &'static Ellipsoid {
        self.frame.ellipsoid()
    }

    #[cfg(test)]
    pub(crate) fn latitude_deg(&self) -> f64 {
        self.latitude
    }

    #[cfg(test)]
    pub(crate) fn longitude_deg(&self) -> f64 {
        self.longitude
    }

    /// Converts to Earth-Centered, Earth-Fixed coordinates in the same frame.
    ///
    /// See:
    /// <https://en.wikipedia.org/wiki/Geographic_coordinate_conversion#From_geodetic_to_ECEF_coordinates>
    #[must_use]
    pub fn to_cartesian(&self) -> CartesianPoint {
        let ellipsoid = self.ellipsoid();
        let e2 = ellipsoid.eccentricity_sq();
        let lat_phi = self.latitude.to_radians();
        let lon_lambda = self.longitude.to_radians();
        let height_h = self.height;

        let (sin_phi, cos_phi) = lat_phi.sin_cos();
        let (sin_lambda, cos_lambda) = lon_lambda.sin_cos();
        // https://en.wikipedia.org/wiki/Earth_radius#Prime_vertical
        let nu = ellipsoid.a() / (1. - e2 * sin_phi * sin_phi).sqrt();

        let x = (nu + height_h) * cos_phi * cos_lambda;
        let y = (nu + height_h) * cos_phi * sin_lambda;
        let z = (nu * (1. - e2) + height_h) * sin_phi;

        CartesianPoint::from_nalgebra_point(Point3::new(x, y, z), self.frame)
    }

    /// Moves this location into another datum, re-expressing it on that datum's ellipsoid.
    ///
    /// See [`CartesianPoint::convert_datum`].
    pub fn convert_datum(&self, to: &'static Datum) -> Result<Self, Error> {
        Ok(self.to_cartesian().convert_datum(to)?.to_geodetic())
    }

    /// Moves this location into another reference frame, re-expressing it on that frame's
    /// ellipsoid.
    ///
    /// See [`CartesianPoint::convert_reference_frame`].
    pub fn convert_reference_frame(&self, to: &'static ReferenceFrame) -> Result<Self, Error> {
        Ok(self
            .to_cartesian()
            .convert_reference_frame(to)?
            .to_geodetic())
    }

    /// Computes the [great-circle distance] between the two locations on a sphere with this
    /// point's equatorial radius.
    ///
    /// This is only an approximation; see [`GeodeticPoint::distance_to`] for the distance along
    /// the ellipsoid.
    ///
    /// [great-circle distance]: https://en.wikipedia.org/wiki/Great-circle_distance
    #[doc(alias = "great_circle_distance")]
    #[must_use]
    pub fn haversine_distance_on_surface(&self, other: &GeodeticPoint) -> Length {
        let angle =
            central_angle_by_haversine(self.latitude, self.longitude, other.latitude, other.longitude);
        Length::new::<meter>(angle * self.ellipsoid().a())
    }
}

impl From<CartesianPoint> for GeodeticPoint {
    fn from(value: CartesianPoint) -> Self {
        value.to_geodetic()
    }
}

impl Display for GeodeticPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.latitude >= 0. { 'N' } else { 'S' };
        let ew = if self.longitude >= 0. { 'E' } else { 'W' };
        let (lat, lon) = (self.latitude.abs(), self.longitude.abs());
        write!(f, "{lat:.6}°{ns}, {lon:.6}°{ew}, {:.3}m", self.height)
    }
}

#[cfg(any(test, feature = "approx"))]
impl AbsDiffEq<Self> for GeodeticPoint {
    type Epsilon = Length;

    fn default_epsilon() -> Self::Epsilon {
        Length::new::<meter>(0.001)
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.frame == other.frame
            && self.haversine_distance_on_surface(other) <= epsilon
            && self
                .height
                .abs_diff_eq(&other.height, epsilon.get::<meter>())
    }
}

#[cfg(any(test, feature = "approx"))]
impl RelativeEq for GeodeticPoint {
    fn default_max_relative() -> Self::Epsilon {
        Length::new::<meter>(f64::default_max_relative())
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.frame == other.frame
            && self
                .haversine_distance_on_surface(other)
                .get::<meter>()
                .abs_diff_eq(&0., epsilon.get::<meter>())
            && self.height.relative_eq(
                &other.height,
                epsilon.get::<meter>(),
                max_relative.get::<meter>(),
            )
    }
}

/// Argument type for [`GeodeticPoint::build`].
#[derive(Debug, Default, Clone, Copy)]
#[must_use]
pub struct Components {
    /// The latitude of the proposed [`GeodeticPoint`].
    pub latitude: Angle,

    /// The longitude of the proposed [`GeodeticPoint`].
    pub longitude: Angle,

    /// The height above the ellipsoid of the proposed [`GeodeticPoint`].
    pub height: Length,

    /// What the coordinates are relative to. Defaults to [`Frame::Unspecified`] (WGS84).
    pub frame: Frame,
}

/// Serialized form: degrees and metres, re-validated on the way in.
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct GeodeticRepr {
    latitude: f64,
    longitude: f64,
    height: f64,
    #[serde(default)]
    frame: Frame,
}

#[cfg(feature = "serde")]
impl From<GeodeticPoint> for GeodeticRepr {
    fn from(point: GeodeticPoint) -> Self {
        Self {
            latitude: point.latitude,
            longitude: point.longitude,
            height: point.height,
            frame: point.frame,
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<GeodeticRepr> for GeodeticPoint {
    type Error = Error;

    fn try_from(repr: GeodeticRepr) -> Result<Self, Self::Error> {
        Ok(Self::from_degrees(
            finite("latitude", repr.latitude)?,
            finite("longitude", repr.longitude)?,
            finite("height", repr.height)?,
            repr.frame,
        ))
    }
}
