use crate::ellipsoid::Ellipsoid;
use crate::error::Error;
use crate::helmert::{Helmert, HelmertParams};
use crate::Point3;
use log::trace;

/// A geodetic datum: an [`Ellipsoid`] anchored to WGS84 by a fixed 7-parameter Helmert
/// transform.
///
/// The stored transform goes _from_ WGS84 _to_ the datum, with translations in metres, scale in
/// parts per million and rotations in arcseconds. The reverse direction is taken to be the
/// negated transform, which is only accurate to first order (generally a centimetre or so for
/// the transforms in this registry).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Datum {
    name: &'static str,
    ellipsoid: &'static Ellipsoid,
    transform: HelmertParams,
}

// transforms: t in metres, s in ppm, r in arcseconds
#[rustfmt::skip]
impl Datum {
    /// epsg.io/1311
    pub const ED50: Datum = Datum::known("ED50", &Ellipsoid::INTL_1924,
        HelmertParams::new(89.5, 93.8, 123.1, -1.2, 0.0, 0.0, 0.156));
    /// epsg.io/1149; coincides with WGS84 at the metre level
    pub const ETRS89: Datum = Datum::known("ETRS89", &Ellipsoid::GRS80,
        HelmertParams::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0));
    /// epsg.io/1954
    pub const IRL1975: Datum = Datum::known("Irl1975", &Ellipsoid::AIRY_MODIFIED,
        HelmertParams::new(-482.530, 130.596, -564.557, -8.150, 1.042, 0.214, 0.631));
    pub const NAD27: Datum = Datum::known("NAD27", &Ellipsoid::CLARKE_1866,
        HelmertParams::new(8.0, -160.0, -176.0, 0.0, 0.0, 0.0, 0.0));
    pub const NAD83: Datum = Datum::known("NAD83", &Ellipsoid::GRS80,
        HelmertParams::new(0.9956, -1.9103, -0.5215, -0.00062, 0.025915, 0.009426, 0.011599));
    pub const NTF: Datum = Datum::known("NTF", &Ellipsoid::CLARKE_1880_IGN,
        HelmertParams::new(168.0, 60.0, -320.0, 0.0, 0.0, 0.0, 0.0));
    /// epsg.io/1314
    pub const OSGB36: Datum = Datum::known("OSGB36", &Ellipsoid::AIRY_1830,
        HelmertParams::new(-446.448, 125.157, -542.060, 20.4894, -0.1502, -0.2470, -0.8421));
    pub const POTSDAM: Datum = Datum::known("Potsdam", &Ellipsoid::BESSEL_1841,
        HelmertParams::new(-582.0, -105.0, -414.0, -8.3, 1.04, 0.35, -3.08));
    pub const TOKYO_JAPAN: Datum = Datum::known("TokyoJapan", &Ellipsoid::BESSEL_1841,
        HelmertParams::new(148.0, -507.0, -685.0, 0.0, 0.0, 0.0, 0.0));
    pub const WGS72: Datum = Datum::known("WGS72", &Ellipsoid::WGS72,
        HelmertParams::new(0.0, 0.0, -4.5, -0.22, 0.0, 0.0, 0.554));
    pub const WGS84: Datum = Datum::known("WGS84", &Ellipsoid::WGS84,
        HelmertParams::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0));
}

impl Datum {
    const fn known(
        name: &'static str,
        ellipsoid: &'static Ellipsoid,
        transform: HelmertParams,
    ) -> Self {
        Self {
            name,
            ellipsoid,
            transform,
        }
    }

    /// Looks up a datum by its name (eg, `"OSGB36"`).
    pub fn named(name: &str) -> Result<&'static Datum, Error> {
        DATUMS
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| Error::UnknownDatum(name.to_owned()))
    }

    /// All known datums.
    pub fn all() -> &'static [Datum] {
        &DATUMS
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn ellipsoid(&self) -> &'static Ellipsoid {
        self.ellipsoid
    }

    /// The transform from WGS84 to this datum (m, ppm, arcsec).
    #[must_use]
    pub fn transform(&self) -> HelmertParams {
        self.transform
    }

    pub(crate) fn is_wgs84(&self) -> bool {
        self.name == Datum::WGS84.name
    }
}

impl Default for Datum {
    fn default() -> Self {
        Self::WGS84
    }
}

static DATUMS: [Datum; 11] = [
    Datum::ED50,
    Datum::ETRS89,
    Datum::IRL1975,
    Datum::NAD27,
    Datum::NAD83,
    Datum::NTF,
    Datum::OSGB36,
    Datum::POTSDAM,
    Datum::TOKYO_JAPAN,
    Datum::WGS72,
    Datum::WGS84,
];

/// Moves an ECEF point from one datum to another.
///
/// Only transforms to and from WGS84 are stored, so anything else goes through WGS84.
pub(crate) fn convert(point: &Point3, from: &Datum, to: &Datum) -> Point3 {
    if to.is_wgs84() {
        trace!("datum {} -> WGS84 (negated transform)", from.name);
        Helmert::from_datum_params(&-from.transform).apply(point)
    } else if from.is_wgs84() {
        trace!("datum WGS84 -> {}", to.name);
        Helmert::from_datum_params(&to.transform).apply(point)
    } else {
        trace!("datum {} -> {} via WGS84", from.name, to.name);
        let wgs84 = convert(point, from, &Datum::WGS84);
        convert(&wgs84, &Datum::WGS84, to)
    }
}
