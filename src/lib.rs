//! This library does geodesy on an ellipsoidal earth for engineers who want answers in metres and
//! degrees rather than a tour of the literature.
//!
//! The main type is [`GeodeticPoint`]: a latitude, longitude, and height on some [`Ellipsoid`].
//! Which ellipsoid is decided by the point's [`Frame`], which is either a classical geodetic
//! [`Datum`] (like OSGB36 or ED50), a modern [`ReferenceFrame`] observed at some epoch (like
//! ITRF2014 at 2020.0), or unspecified, in which case the point is taken to be on WGS84.
//!
//! With two points on the same ellipsoid you can find the distance and bearings between them, or
//! go the other way and find where travelling some distance at some bearing ends up. Both use
//! [Vincenty's formulae][vincenty], which are accurate to within a millimetre or so on the
//! earth's ellipsoid (see [`GeodeticPoint::inverse`] and [`GeodeticPoint::direct`]).
//!
//! Every geodetic point also has an Earth-Centered, Earth-Fixed [`CartesianPoint`] equivalent.
//! Moving a point between datums or between reference frames goes through this cartesian form and
//! one or two seven-parameter [Helmert transforms][helmert].
//!
//! # Examples
//!
//! The distance from Land's End to John o' Groats:
//!
//! ```
//! # use ellipsoidal::{Components, GeodeticPoint};
//! use uom::si::f64::{Angle, Length};
//! use uom::si::{angle::degree, length::meter};
//!
//! let lands_end = GeodeticPoint::build(Components {
//!     latitude: Angle::new::<degree>(50.06632),
//!     longitude: Angle::new::<degree>(-5.71475),
//!     ..Default::default()
//! })?;
//! let john_o_groats = GeodeticPoint::build(Components {
//!     latitude: Angle::new::<degree>(58.64402),
//!     longitude: Angle::new::<degree>(-3.07009),
//!     ..Default::default()
//! })?;
//!
//! let geodesic = lands_end.inverse(&john_o_groats)?;
//! assert!((geodesic.distance.get::<meter>() - 969_954.166).abs() < 0.001);
//! assert!((geodesic.initial_bearing.get::<degree>() - 9.141_877_5).abs() < 1e-7);
//!
//! // the rounded shorthand
//! assert_eq!(
//!     lands_end.distance_to(&john_o_groats)?,
//!     Length::new::<meter>(969_954.166)
//! );
//! # Ok::<(), ellipsoidal::Error>(())
//! ```
//!
//! The Royal Observatory in Greenwich, as a WGS84 (GPS) position and on the Ordnance Survey's
//! OSGB36 datum:
//!
//! ```
//! # use ellipsoidal::{Components, Datum, GeodeticPoint};
//! use uom::si::f64::Angle;
//! use uom::si::{angle::degree, length::meter};
//!
//! let gps = GeodeticPoint::build(Components {
//!     latitude: Angle::new::<degree>(51.47788),
//!     longitude: Angle::new::<degree>(-0.00147),
//!     ..Default::default()
//! })?;
//! let osgb = gps.convert_datum(&Datum::OSGB36)?;
//!
//! // the prime meridian on the older datum passes a few metres from where GPS puts it
//! assert!((osgb.longitude().get::<degree>() - 0.000_149_6).abs() < 1e-6);
//! assert_eq!(osgb.ellipsoid().name(), "Airy1830");
//! assert!((osgb.height().get::<meter>() + 45.9).abs() < 0.01);
//! # Ok::<(), ellipsoidal::Error>(())
//! ```
//!
//! [vincenty]: https://en.wikipedia.org/wiki/Vincenty%27s_formulae
//! [helmert]: https://en.wikipedia.org/wiki/Helmert_transformation

mod cartesian;
mod datum;
mod ellipsoid;
mod error;
mod frame;
mod geodetic;
mod helmert;
mod reference_frame;
mod util;
mod vincenty;

pub(crate) type Point3 = nalgebra::Point3<f64>;
pub(crate) type Vector3 = nalgebra::Vector3<f64>;

pub use cartesian::CartesianPoint;
pub use datum::Datum;
pub use ellipsoid::Ellipsoid;
pub use error::Error;
pub use frame::Frame;
pub use geodetic::{Components, GeodeticPoint};
pub use helmert::HelmertParams;
pub use reference_frame::{ReferenceFrame, TransformParams};
pub use vincenty::{DirectSolution, InverseSolution};
