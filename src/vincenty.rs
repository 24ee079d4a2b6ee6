//! Geodesics on the ellipsoid using [Vincenty's formulae][vincenty].
//!
//! Both the direct and the inverse solution iterate on the auxiliary sphere until the correction
//! term settles. The inverse solution does not settle for nearly-antipodal points; rather than
//! fail, it then reports NaN for the distance and bearings.
//!
//! [vincenty]: https://www.ngs.noaa.gov/PUBS_LIB/inverse.pdf

use crate::error::{finite, Error};
use crate::geodetic::GeodeticPoint;
use crate::util::{round_to, wrap360};
use log::{debug, trace};
use std::f64::consts::{FRAC_PI_2, PI};
use uom::si::f64::{Angle, Length};
use uom::si::{
    angle::{degree, radian},
    length::meter,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const DIRECT_MAX_ITERATIONS: u32 = 100;
const INVERSE_MAX_ITERATIONS: u32 = 1000;
/// radians on the auxiliary sphere; about 0.006mm on the ground
const CONVERGENCE: f64 = 1e-12;

/// decimal places kept by the rounded accessors: millimetres
const DISTANCE_DECIMALS: i32 = 3;
/// decimal places (of a degree) kept by the rounded accessors: about 0.0004 arcseconds
const BEARING_DECIMALS: i32 = 7;

/// Result of [`GeodeticPoint::direct`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DirectSolution {
    pub destination: GeodeticPoint,
    /// In [0°, 360°), or NaN for a zero distance.
    pub final_bearing: Angle,
    pub iterations: u32,
}

/// Result of [`GeodeticPoint::inverse`].
///
/// All of `distance`, `initial_bearing`, and `final_bearing` are NaN if the solution did not
/// converge. The bearings are also NaN if the two points coincide.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InverseSolution {
    pub distance: Length,
    /// In [0°, 360°).
    pub initial_bearing: Angle,
    /// In [0°, 360°).
    pub final_bearing: Angle,
    pub iterations: u32,
    /// Whether the points lie far enough apart that the iteration started from the antipodal
    /// side.
    pub antipodal: bool,
}

impl InverseSolution {
    fn diverged(iterations: u32, antipodal: bool) -> Self {
        Self {
            distance: Length::new::<meter>(f64::NAN),
            initial_bearing: Angle::new::<radian>(f64::NAN),
            final_bearing: Angle::new::<radian>(f64::NAN),
            iterations,
            antipodal,
        }
    }
}

// A = 1 + u²/16384 ⋅ (4096 + u²(-768 + u²(320 - 175u²)))
// B = u²/1024 ⋅ (256 + u²(-128 + u²(74 - 47u²)))
fn series_coefficients(u_sq: f64) -> (f64, f64) {
    let a = 1. + u_sq / 16384. * (4096. + u_sq * (-768. + u_sq * (320. - 175. * u_sq)));
    let b = u_sq / 1024. * (256. + u_sq * (-128. + u_sq * (74. - 47. * u_sq)));
    (a, b)
}

fn delta_sigma(b: f64, sin_sigma: f64, cos_sigma: f64, cos_2sigma_m: f64) -> f64 {
    let c2 = cos_2sigma_m * cos_2sigma_m;
    b * sin_sigma
        * (cos_2sigma_m
            + b / 4.
                * (cos_sigma * (-1. + 2. * c2)
                    - b / 6.
                        * cos_2sigma_m
                        * (-3. + 4. * sin_sigma * sin_sigma)
                        * (-3. + 4. * c2)))
}

/// Reduced (parametric) latitude U as (sin U, cos U).
fn reduced_latitude(phi: f64, f: f64) -> (f64, f64) {
    let tan_u = (1. - f) * phi.tan();
    let cos_u = 1. / (1. + tan_u * tan_u).sqrt();
    (tan_u * cos_u, cos_u)
}

fn on_surface(point: &GeodeticPoint) -> Result<(), Error> {
    if point.height == 0. {
        Ok(())
    } else {
        Err(Error::NotOnSurface {
            height: point.height,
        })
    }
}

impl GeodeticPoint {
    /// Travels `distance` along the geodesic leaving this point at `initial_bearing` (clockwise
    /// from north), and reports where that ends up.
    ///
    /// A zero distance gives back this very point, with a NaN final bearing. Otherwise the point
    /// must be on the surface of its ellipsoid (zero height).
    ///
    /// # Examples
    ///
    /// ```
    /// # use ellipsoidal::{Components, GeodeticPoint};
    /// # use uom::si::f64::{Angle, Length};
    /// # use uom::si::{angle::degree, length::meter};
    /// let lands_end = GeodeticPoint::build(Components {
    ///     latitude: Angle::new::<degree>(50.06632),
    ///     longitude: Angle::new::<degree>(-5.71475),
    ///     ..Default::default()
    /// })?;
    /// let solution = lands_end.direct(
    ///     Length::new::<meter>(969_954.166),
    ///     Angle::new::<degree>(9.141_877_5),
    /// )?;
    /// assert!((solution.destination.latitude().get::<degree>() - 58.64402).abs() < 1e-7);
    /// # Ok::<(), ellipsoidal::Error>(())
    /// ```
    pub fn direct(
        &self,
        distance: impl Into<Length>,
        initial_bearing: impl Into<Angle>,
    ) -> Result<DirectSolution, Error> {
        let s = finite("distance", distance.into().get::<meter>())?;
        if s == 0. {
            return Ok(DirectSolution {
                destination: *self,
                final_bearing: Angle::new::<radian>(f64::NAN),
                iterations: 0,
            });
        }
        let alpha1 = finite("bearing", initial_bearing.into().get::<radian>())?;
        on_surface(self)?;

        let ellipsoid = self.ellipsoid();
        let (a, b, f) = (ellipsoid.a(), ellipsoid.b(), ellipsoid.f());
        let lat_phi1 = self.latitude.to_radians();
        let lon_lambda1 = self.longitude.to_radians();

        let (sin_alpha1, cos_alpha1) = alpha1.sin_cos();
        let (sin_u1, cos_u1) = reduced_latitude(lat_phi1, f);
        // angular distance on the sphere from the equator to the point
        let sigma1 = (sin_u1 / cos_u1).atan2(cos_alpha1);
        // α is the azimuth of the geodesic at the equator
        let sin_alpha = cos_u1 * sin_alpha1;
        let cos_sq_alpha = 1. - sin_alpha * sin_alpha;
        let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
        let (big_a, big_b) = series_coefficients(u_sq);

        let first_approximation = s / (b * big_a);
        let mut sigma = first_approximation;
        let mut iterations = 0;
        let (sin_sigma, cos_sigma, cos_2sigma_m) = loop {
            // σₘ is the angular distance on the sphere from the equator to the midpoint
            let cos_2sigma_m = (2. * sigma1 + sigma).cos();
            let (sin_sigma, cos_sigma) = sigma.sin_cos();
            let previous = sigma;
            sigma = first_approximation + delta_sigma(big_b, sin_sigma, cos_sigma, cos_2sigma_m);
            iterations += 1;
            if (sigma - previous).abs() <= CONVERGENCE {
                break (sin_sigma, cos_sigma, cos_2sigma_m);
            }
            if iterations >= DIRECT_MAX_ITERATIONS {
                return Err(Error::NoConvergence { iterations });
            }
        };
        trace!("vincenty direct converged after {iterations} iterations");

        let x = sin_u1 * sin_sigma - cos_u1 * cos_sigma * cos_alpha1;
        let lat_phi2 = (sin_u1 * cos_sigma + cos_u1 * sin_sigma * cos_alpha1)
            .atan2((1. - f) * (sin_alpha * sin_alpha + x * x).sqrt());
        let lambda =
            (sin_sigma * sin_alpha1).atan2(cos_u1 * cos_sigma - sin_u1 * sin_sigma * cos_alpha1);
        let c = f / 16. * cos_sq_alpha * (4. + f * (4. - 3. * cos_sq_alpha));
        let big_l = lambda
            - (1. - c)
                * f
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m + c * cos_sigma * (-1. + 2. * cos_2sigma_m * cos_2sigma_m)));
        let lon_lambda2 = lon_lambda1 + big_l;
        let alpha2 = sin_alpha.atan2(-x);

        Ok(DirectSolution {
            destination: GeodeticPoint::from_degrees(
                lat_phi2.to_degrees(),
                lon_lambda2.to_degrees(),
                0.,
                self.frame(),
            ),
            final_bearing: Angle::new::<degree>(wrap360(alpha2.to_degrees())),
            iterations,
        })
    }

    /// Finds the geodesic between this point and `other`: its length, and the bearings it
    /// leaves this point and arrives at `other` with.
    ///
    /// Both points must be on the surface (zero height) of the same ellipsoid. Nearly-antipodal
    /// points, for which the solution does not converge, yield NaN distance and bearings rather
    /// than an error.
    pub fn inverse(&self, other: &GeodeticPoint) -> Result<InverseSolution, Error> {
        on_surface(self)?;
        on_surface(other)?;
        let ellipsoid = self.ellipsoid();
        if ellipsoid != other.ellipsoid() {
            return Err(Error::EllipsoidMismatch {
                first: ellipsoid.name(),
                second: other.ellipsoid().name(),
            });
        }
        let (a, b, f) = (ellipsoid.a(), ellipsoid.b(), ellipsoid.f());
        let lat_phi1 = self.latitude.to_radians();
        let lat_phi2 = other.latitude.to_radians();
        // difference in longitude on the ellipsoid
        let big_l = (other.longitude - self.longitude).to_radians();

        let (sin_u1, cos_u1) = reduced_latitude(lat_phi1, f);
        let (sin_u2, cos_u2) = reduced_latitude(lat_phi2, f);

        let antipodal = big_l.abs() > FRAC_PI_2 || (lat_phi2 - lat_phi1).abs() > FRAC_PI_2;

        // λ is the difference in longitude on the auxiliary sphere
        let mut lambda = big_l;
        let (mut sin_lambda, mut cos_lambda);
        let mut sin_sq_sigma;
        let mut sigma = if antipodal { PI } else { 0. };
        let mut sin_sigma = 0.;
        let mut cos_sigma = if antipodal { -1. } else { 1. };
        let mut cos_2sigma_m = 1.;
        let mut cos_sq_alpha = 1.;
        let mut iterations = 0;
        loop {
            (sin_lambda, cos_lambda) = lambda.sin_cos();
            let t = cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda;
            sin_sq_sigma = (cos_u2 * sin_lambda).powi(2) + t * t;
            if sin_sq_sigma.abs() < 1e-24 {
                // coincident or exactly antipodal
                break;
            }
            sin_sigma = sin_sq_sigma.sqrt();
            cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
            sigma = sin_sigma.atan2(cos_sigma);
            let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
            cos_sq_alpha = 1. - sin_alpha * sin_alpha;
            cos_2sigma_m = if cos_sq_alpha != 0. {
                cos_sigma - 2. * sin_u1 * sin_u2 / cos_sq_alpha
            } else {
                // on the equatorial line
                0.
            };
            let c = f / 16. * cos_sq_alpha * (4. + f * (4. - 3. * cos_sq_alpha));
            let previous = lambda;
            lambda = big_l
                + (1. - c)
                    * f
                    * sin_alpha
                    * (sigma
                        + c * sin_sigma
                            * (cos_2sigma_m
                                + c * cos_sigma * (-1. + 2. * cos_2sigma_m * cos_2sigma_m)));
            let check = if antipodal {
                lambda.abs() - PI
            } else {
                lambda.abs()
            };
            if check > PI {
                debug!(
                    "vincenty inverse diverged (λ > π) after {iterations} iterations from {self} to {other}"
                );
                return Ok(InverseSolution::diverged(iterations, antipodal));
            }
            iterations += 1;
            if (lambda - previous).abs() <= CONVERGENCE {
                break;
            }
            if iterations >= INVERSE_MAX_ITERATIONS {
                debug!("vincenty inverse did not converge from {self} to {other}");
                return Ok(InverseSolution::diverged(iterations, antipodal));
            }
        }
        trace!("vincenty inverse converged after {iterations} iterations");

        let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
        let (big_a, big_b) = series_coefficients(u_sq);
        let s = b * big_a * (sigma - delta_sigma(big_b, sin_sigma, cos_sigma, cos_2sigma_m));

        let degenerate = sin_sq_sigma.abs() < f64::EPSILON;
        let alpha1 = if degenerate {
            0.
        } else {
            (cos_u2 * sin_lambda).atan2(cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda)
        };
        let alpha2 = if degenerate {
            PI
        } else {
            (cos_u1 * sin_lambda).atan2(-sin_u1 * cos_u2 + cos_u1 * sin_u2 * cos_lambda)
        };
        let (initial_bearing, final_bearing) = if s.abs() < f64::EPSILON {
            (f64::NAN, f64::NAN)
        } else {
            (
                wrap360(alpha1.to_degrees()),
                wrap360(alpha2.to_degrees()),
            )
        };

        Ok(InverseSolution {
            distance: Length::new::<meter>(s),
            initial_bearing: Angle::new::<degree>(initial_bearing),
            final_bearing: Angle::new::<degree>(final_bearing),
            iterations,
            antipodal,
        })
    }

    /// The distance along the ellipsoid to `other`, to the millimetre.
    ///
    /// NaN if the points are nearly antipodal and no distance could be found.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ellipsoidal::{Components, GeodeticPoint};
    /// # use uom::si::f64::{Angle, Length};
    /// # use uom::si::{angle::degree, length::meter};
    /// let at = |lat: f64, lon: f64| GeodeticPoint::build(Components {
    ///     latitude: Angle::new::<degree>(lat),
    ///     longitude: Angle::new::<degree>(lon),
    ///     ..Default::default()
    /// });
    /// let lands_end = at(50.06632, -5.71475)?;
    /// let john_o_groats = at(58.64402, -3.07009)?;
    /// let distance = lands_end.distance_to(&john_o_groats)?;
    /// assert_eq!(distance, Length::new::<meter>(969_954.166));
    /// # Ok::<(), ellipsoidal::Error>(())
    /// ```
    pub fn distance_to(&self, other: &GeodeticPoint) -> Result<Length, Error> {
        let solution = self.inverse(other)?;
        Ok(Length::new::<meter>(round_to(
            solution.distance.get::<meter>(),
            DISTANCE_DECIMALS,
        )))
    }

    /// The bearing (clockwise from north) to set out on to reach `other`, rounded to 1e-7°.
    ///
    /// NaN if the points coincide or are nearly antipodal.
    pub fn initial_bearing_to(&self, other: &GeodeticPoint) -> Result<Angle, Error> {
        let solution = self.inverse(other)?;
        Ok(round_bearing(solution.initial_bearing))
    }

    /// The bearing (clockwise from north) on arrival at `other`, rounded to 1e-7°.
    ///
    /// NaN if the points coincide or are nearly antipodal.
    pub fn final_bearing_to(&self, other: &GeodeticPoint) -> Result<Angle, Error> {
        let solution = self.inverse(other)?;
        Ok(round_bearing(solution.final_bearing))
    }

    /// Where travelling `distance` at `initial_bearing` from here ends up.
    pub fn destination_point(
        &self,
        distance: impl Into<Length>,
        initial_bearing: impl Into<Angle>,
    ) -> Result<GeodeticPoint, Error> {
        Ok(self.direct(distance, initial_bearing)?.destination)
    }

    /// The bearing on arrival after travelling `distance` at `initial_bearing` from here,
    /// rounded to 1e-7°.
    pub fn final_bearing_on(
        &self,
        distance: impl Into<Length>,
        initial_bearing: impl Into<Angle>,
    ) -> Result<Angle, Error> {
        let solution = self.direct(distance, initial_bearing)?;
        Ok(round_bearing(solution.final_bearing))
    }

    /// The point `fraction` of the way along the geodesic to `other`.
    ///
    /// A `fraction` of 0 gives this point and 1 gives `other`; other values (including ones
    /// outside [0, 1]) travel the corresponding share of the distance. If no bearing to `other`
    /// can be found (the points coincide, or are nearly antipodal), this point is returned.
    pub fn intermediate_point_to(
        &self,
        other: &GeodeticPoint,
        fraction: f64,
    ) -> Result<GeodeticPoint, Error> {
        let fraction = finite("fraction", fraction)?;
        if fraction == 0. {
            return Ok(*self);
        }
        if fraction == 1. {
            return Ok(*other);
        }
        let inverse = self.inverse(other)?;
        if inverse.initial_bearing.is_nan() {
            return Ok(*self);
        }
        self.destination_point(inverse.distance * fraction, inverse.initial_bearing)
    }
}

fn round_bearing(bearing: Angle) -> Angle {
    Angle::new::<degree>(round_to(bearing.get::<degree>(), BEARING_DECIMALS))
}
