use crate::error::{finite, Error};
use uom::si::f64::Length;
use uom::si::length::meter;

/// A reference ellipsoid: the mathematical model of the earth's shape a set of geodetic
/// coordinates is expressed on.
///
/// The semi-minor axis and the flattening are stored as published rather than derived from one
/// another, so `f` may differ from `(a - b) / a` in the last few digits for some ellipsoids.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    name: &'static str,
    a: f64,
    b: f64,
    f: f64,
}

// https://nsgreg.nga.mil/doc/view?i=4085 table 3.1 and the respective national agencies
impl Ellipsoid {
    pub const WGS84: Ellipsoid =
        Ellipsoid::known("WGS84", 6_378_137.0, 6_356_752.314_245, 1. / 298.257_223_563);
    pub const AIRY_1830: Ellipsoid =
        Ellipsoid::known("Airy1830", 6_377_563.396, 6_356_256.909, 1. / 299.324_964_6);
    pub const AIRY_MODIFIED: Ellipsoid =
        Ellipsoid::known("AiryModified", 6_377_340.189, 6_356_034.448, 1. / 299.324_964_6);
    pub const BESSEL_1841: Ellipsoid =
        Ellipsoid::known("Bessel1841", 6_377_397.155, 6_356_078.962_818, 1. / 299.152_812_8);
    pub const CLARKE_1866: Ellipsoid =
        Ellipsoid::known("Clarke1866", 6_378_206.4, 6_356_583.8, 1. / 294.978_698_214);
    pub const CLARKE_1880_IGN: Ellipsoid =
        Ellipsoid::known("Clarke1880IGN", 6_378_249.2, 6_356_515.0, 1. / 293.466_021_294);
    pub const GRS80: Ellipsoid =
        Ellipsoid::known("GRS80", 6_378_137.0, 6_356_752.314_140, 1. / 298.257_222_101);
    /// Also known as the Hayford ellipsoid.
    pub const INTL_1924: Ellipsoid =
        Ellipsoid::known("Intl1924", 6_378_388.0, 6_356_911.946, 1. / 297.0);
    pub const WGS72: Ellipsoid = Ellipsoid::known("WGS72", 6_378_135.0, 6_356_750.52, 1. / 298.26);

    const fn known(name: &'static str, a: f64, b: f64, f: f64) -> Self {
        Self { name, a, b, f }
    }

    /// Constructs a user-defined ellipsoid.
    ///
    /// Fails unless both axes are finite and `0 < b <= a`, and the flattening is finite.
    pub fn new(
        name: &'static str,
        semi_major_axis: impl Into<Length>,
        semi_minor_axis: impl Into<Length>,
        flattening: f64,
    ) -> Result<Self, Error> {
        let a = semi_major_axis.into().get::<meter>();
        let b = semi_minor_axis.into().get::<meter>();
        let f = finite("flattening", flattening)?;
        if !(a.is_finite() && b.is_finite() && 0. < b && b <= a) {
            return Err(Error::InvalidEllipsoid { a, b });
        }
        Ok(Self { name, a, b, f })
    }

    /// Looks up one of the well-known ellipsoids by its name (eg, `"Airy1830"`).
    pub fn named(name: &str) -> Result<&'static Ellipsoid, Error> {
        ELLIPSOIDS
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| Error::UnknownEllipsoid(name.to_owned()))
    }

    /// All well-known ellipsoids.
    pub fn all() -> &'static [Ellipsoid] {
        &ELLIPSOIDS
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[doc(alias = "a")]
    #[doc(alias = "equatorial radius")]
    #[must_use]
    pub fn semi_major_axis(&self) -> Length {
        Length::new::<meter>(self.a)
    }

    #[doc(alias = "b")]
    #[doc(alias = "polar radius")]
    #[must_use]
    pub fn semi_minor_axis(&self) -> Length {
        Length::new::<meter>(self.b)
    }

    #[doc(alias = "f")]
    #[must_use]
    pub fn flattening(&self) -> f64 {
        self.f
    }

    pub(crate) fn a(&self) -> f64 {
        self.a
    }

    pub(crate) fn b(&self) -> f64 {
        self.b
    }

    pub(crate) fn f(&self) -> f64 {
        self.f
    }

    /// e² = 2f − f², ie (a² − b²) / a² for a self-consistent ellipsoid.
    #[doc(alias = "e^2")]
    pub(crate) fn eccentricity_sq(&self) -> f64 {
        2. * self.f - self.f * self.f
    }

    /// ε² = e² / (1 − e²), ie (a² − b²) / b² for a self-consistent ellipsoid.
    #[doc(alias = "e2prime")]
    pub(crate) fn second_eccentricity_sq(&self) -> f64 {
        let e2 = self.eccentricity_sq();
        e2 / (1. - e2)
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::WGS84
    }
}

static ELLIPSOIDS: [Ellipsoid; 9] = [
    Ellipsoid::WGS84,
    Ellipsoid::AIRY_1830,
    Ellipsoid::AIRY_MODIFIED,
    Ellipsoid::BESSEL_1841,
    Ellipsoid::CLARKE_1866,
    Ellipsoid::CLARKE_1880_IGN,
    Ellipsoid::GRS80,
    Ellipsoid::INTL_1924,
    Ellipsoid::WGS72,
];
