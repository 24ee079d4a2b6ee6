//! Time-dependent terrestrial reference frames and the 14-parameter transforms between them.
//!
//! Transform parameters are stored as directed `source → target` entries. Together they form a
//! small graph over the frames: every entry is an edge in its stored direction, and (with all 14
//! values negated) an edge in the reverse direction. Routes through that graph are resolved once,
//! on first use, and are at most two hops long.

use crate::ellipsoid::Ellipsoid;
use crate::error::Error;
use crate::helmert::{Helmert, HelmertParams};
use crate::Point3;
use log::{debug, trace};
use std::collections::HashMap;
use std::sync::OnceLock;

/// A realisation of a terrestrial reference system (eg, ITRF2014), with the epoch its
/// coordinates are conventionally given at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceFrame {
    name: &'static str,
    epoch: f64,
    ellipsoid: &'static Ellipsoid,
}

#[rustfmt::skip]
impl ReferenceFrame {
    pub const ITRF2014: ReferenceFrame = ReferenceFrame::known("ITRF2014", 2010.0, &Ellipsoid::GRS80);
    pub const ITRF2008: ReferenceFrame = ReferenceFrame::known("ITRF2008", 2005.0, &Ellipsoid::GRS80);
    pub const ITRF2005: ReferenceFrame = ReferenceFrame::known("ITRF2005", 2000.0, &Ellipsoid::GRS80);
    pub const ITRF2000: ReferenceFrame = ReferenceFrame::known("ITRF2000", 1997.0, &Ellipsoid::GRS80);
    pub const ITRF93: ReferenceFrame = ReferenceFrame::known("ITRF93", 1988.0, &Ellipsoid::GRS80);
    pub const ITRF91: ReferenceFrame = ReferenceFrame::known("ITRF91", 1988.0, &Ellipsoid::GRS80);
    pub const WGS84_G1762: ReferenceFrame = ReferenceFrame::known("WGS84g1762", 2005.0, &Ellipsoid::WGS84);
    pub const WGS84_G1674: ReferenceFrame = ReferenceFrame::known("WGS84g1674", 2005.0, &Ellipsoid::WGS84);
    pub const WGS84_G1150: ReferenceFrame = ReferenceFrame::known("WGS84g1150", 2001.0, &Ellipsoid::WGS84);
    /// ETRF2000(R08)
    pub const ETRF2000: ReferenceFrame = ReferenceFrame::known("ETRF2000", 2005.0, &Ellipsoid::GRS80);
    /// NAD83(CORS96)
    pub const NAD83: ReferenceFrame = ReferenceFrame::known("NAD83", 1997.0, &Ellipsoid::GRS80);
    pub const GDA94: ReferenceFrame = ReferenceFrame::known("GDA94", 1994.0, &Ellipsoid::GRS80);
}

impl ReferenceFrame {
    const fn known(name: &'static str, epoch: f64, ellipsoid: &'static Ellipsoid) -> Self {
        Self {
            name,
            epoch,
            ellipsoid,
        }
    }

    /// Looks up a reference frame by its name (eg, `"ITRF2014"`).
    pub fn named(name: &str) -> Result<&'static ReferenceFrame, Error> {
        REFERENCE_FRAMES
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| Error::UnknownReferenceFrame(name.to_owned()))
    }

    /// All known reference frames.
    pub fn all() -> &'static [ReferenceFrame] {
        &REFERENCE_FRAMES
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The frame's reference epoch as a decimal year.
    #[must_use]
    pub fn epoch(&self) -> f64 {
        self.epoch
    }

    #[must_use]
    pub fn ellipsoid(&self) -> &'static Ellipsoid {
        self.ellipsoid
    }
}

static REFERENCE_FRAMES: [ReferenceFrame; 12] = [
    ReferenceFrame::ITRF2014,
    ReferenceFrame::ITRF2008,
    ReferenceFrame::ITRF2005,
    ReferenceFrame::ITRF2000,
    ReferenceFrame::ITRF93,
    ReferenceFrame::ITRF91,
    ReferenceFrame::WGS84_G1762,
    ReferenceFrame::WGS84_G1674,
    ReferenceFrame::WGS84_G1150,
    ReferenceFrame::ETRF2000,
    ReferenceFrame::NAD83,
    ReferenceFrame::GDA94,
];

/// Published 14-parameter transform from one reference frame to another.
///
/// `params` hold translations in millimetres, scale in parts per billion and rotations in
/// milliarcseconds at the reference `epoch`; `rates` hold the same per year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformParams {
    source: &'static str,
    target: &'static str,
    epoch: f64,
    params: HelmertParams,
    rates: HelmertParams,
}

impl TransformParams {
    const fn known(
        source: &'static str,
        target: &'static str,
        epoch: f64,
        params: HelmertParams,
        rates: HelmertParams,
    ) -> Self {
        Self {
            source,
            target,
            epoch,
            params,
            rates,
        }
    }

    /// The stored transform from `source` to `target`, if there is one.
    ///
    /// This does not look for reversed or chained transforms.
    pub fn between(source: &str, target: &str) -> Option<&'static TransformParams> {
        TRANSFORMS
            .iter()
            .find(|t| t.source == source && t.target == target)
    }

    /// All stored transforms.
    pub fn all() -> &'static [TransformParams] {
        &TRANSFORMS
    }

    #[must_use]
    pub fn source(&self) -> &'static str {
        self.source
    }

    #[must_use]
    pub fn target(&self) -> &'static str {
        self.target
    }

    #[must_use]
    pub fn epoch(&self) -> f64 {
        self.epoch
    }

    #[must_use]
    pub fn params(&self) -> HelmertParams {
        self.params
    }

    #[must_use]
    pub fn rates(&self) -> HelmertParams {
        self.rates
    }

    /// The transform from `target` back to `source`: all 14 values negated.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            source: self.target,
            target: self.source,
            epoch: self.epoch,
            params: -self.params,
            rates: -self.rates,
        }
    }
}

// IERS (itrf.ign.fr), EUREF TN (etrs89.ensg.ign.fr), NGS (CORS96), and Geoscience Australia
// (Dawson & Woods 2010); t in mm, s in ppb, r in mas.
#[rustfmt::skip]
static TRANSFORMS: [TransformParams; 18] = [
    TransformParams::known("ITRF2014", "ITRF2008", 2010.0,
        HelmertParams::new(   1.6,    1.9,    2.4,  -0.02,    0.00,    0.00,    0.00),
        HelmertParams::new(   0.0,    0.0,   -0.1,   0.03,    0.00,    0.00,    0.00)),
    TransformParams::known("ITRF2014", "ITRF2005", 2010.0,
        HelmertParams::new(   2.6,    1.0,   -2.3,   0.92,    0.00,    0.00,    0.00),
        HelmertParams::new(   0.3,    0.0,   -0.1,   0.03,    0.00,    0.00,    0.00)),
    TransformParams::known("ITRF2014", "ITRF2000", 2010.0,
        HelmertParams::new(   0.7,    1.2,  -26.1,   2.12,    0.00,    0.00,    0.00),
        HelmertParams::new(   0.1,    0.1,   -1.9,   0.11,    0.00,    0.00,    0.00)),
    TransformParams::known("ITRF2014", "ITRF93", 2010.0,
        HelmertParams::new( -50.4,    3.3,  -60.2,   4.29,   -2.81,   -3.38,    0.40),
        HelmertParams::new(  -2.8,   -0.1,   -2.5,   0.12,   -0.11,   -0.19,    0.07)),
    TransformParams::known("ITRF2014", "ITRF91", 2010.0,
        HelmertParams::new(  26.4,   14.6,  -98.2,   7.29,    0.00,    0.00,    0.18),
        HelmertParams::new(   0.1,   -0.5,   -3.3,   0.12,    0.00,    0.00,    0.02)),
    TransformParams::known("ITRF2008", "ITRF2005", 2000.0,
        HelmertParams::new(  -2.0,   -0.9,   -4.7,   0.94,    0.00,    0.00,    0.00),
        HelmertParams::new(   0.3,    0.0,    0.0,   0.00,    0.00,    0.00,    0.00)),
    TransformParams::known("ITRF2008", "ITRF2000", 2000.0,
        HelmertParams::new(  -1.9,   -1.7,  -10.5,   1.34,    0.00,    0.00,    0.00),
        HelmertParams::new(   0.1,    0.1,   -1.8,   0.08,    0.00,    0.00,    0.00)),
    TransformParams::known("ITRF2005", "ITRF2000", 2000.0,
        HelmertParams::new(   0.1,   -0.8,   -5.8,   0.40,    0.00,    0.00,    0.00),
        HelmertParams::new(  -0.2,    0.1,   -1.8,   0.08,    0.00,    0.00,    0.00)),
    TransformParams::known("ITRF2000", "ITRF93", 1988.0,
        HelmertParams::new(  12.7,    6.5,  -20.9,   1.95,   -0.39,    0.80,   -1.14),
        HelmertParams::new(  -2.9,   -0.2,   -0.6,   0.01,   -0.11,   -0.19,    0.07)),
    TransformParams::known("ITRF2000", "ITRF91", 1988.0,
        HelmertParams::new(  26.7,   27.5,  -19.9,   2.15,    0.00,    0.00,   -0.18),
        HelmertParams::new(   0.0,   -0.6,   -1.4,   0.01,    0.00,    0.00,    0.02)),
    TransformParams::known("ITRF2014", "ETRF2000", 2000.0,
        HelmertParams::new(  53.7,   51.2,  -55.1,   1.02,   0.891,   5.390,  -8.712),
        HelmertParams::new(   0.1,    0.1,   -1.9,   0.11,   0.081,   0.490,  -0.792)),
    TransformParams::known("ITRF2008", "ETRF2000", 2000.0,
        HelmertParams::new(  52.1,   49.3,  -58.5,   1.34,   0.891,   5.390,  -8.712),
        HelmertParams::new(   0.1,    0.1,   -1.8,   0.08,   0.081,   0.490,  -0.792)),
    TransformParams::known("ITRF2005", "ETRF2000", 2000.0,
        HelmertParams::new(  54.1,   50.2,  -53.8,   0.40,   0.891,   5.390,  -8.712),
        HelmertParams::new(  -0.2,    0.1,   -1.8,   0.08,   0.081,   0.490,  -0.792)),
    TransformParams::known("ITRF2000", "ETRF2000", 2000.0,
        HelmertParams::new(  54.0,   51.0,  -48.0,   0.00,   0.891,   5.390,  -8.712),
        HelmertParams::new(   0.0,    0.0,    0.0,   0.00,   0.081,   0.490,  -0.792)),
    TransformParams::known("ITRF2000", "NAD83", 1997.0,
        HelmertParams::new( 995.6,-1901.3, -521.5,   0.62,  25.915,   9.426,  11.599),
        HelmertParams::new(   0.7,   -0.7,    0.5,  -0.18,   0.067,  -0.757,  -0.051)),
    TransformParams::known("ITRF2008", "GDA94", 1994.0,
        HelmertParams::new(-84.68, -19.42,  32.01,  9.710, -0.4254,  2.2578,  2.4015),
        HelmertParams::new(  1.42,   1.34,   0.90,  0.109,  1.5461,  1.1820,  1.1551)),
    TransformParams::known("ITRF2005", "GDA94", 1994.0,
        HelmertParams::new(-79.73,  -6.86,  38.03,  6.636, -0.0351,  2.1211,  2.1411),
        HelmertParams::new(  2.25,  -0.62,  -0.56,  0.294,  1.4707,  1.1443,  1.1701)),
    TransformParams::known("ITRF2000", "GDA94", 1994.0,
        HelmertParams::new(-45.91, -29.85, -20.37,  7.070, -1.6705,  0.4594,  1.9356),
        HelmertParams::new( -4.66,   3.55,  11.24,  0.249,  1.7454,  1.4868,  1.2240)),
];

/// One edge of the transform graph: a stored transform, possibly walked backwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Hop {
    params: &'static TransformParams,
    reversed: bool,
}

impl Hop {
    fn target(&self) -> &'static str {
        if self.reversed {
            self.params.source
        } else {
            self.params.target
        }
    }

    /// The transform for a point observed at `epoch`, relative to this hop's own reference epoch.
    fn helmert(&self, epoch: f64) -> Helmert {
        let dt = epoch - self.params.epoch;
        if self.reversed {
            Helmert::from_frame_params(&-self.params.params, &-self.params.rates, dt)
        } else {
            Helmert::from_frame_params(&self.params.params, &self.params.rates, dt)
        }
    }
}

/// How to get from one reference frame to another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Route {
    /// Same frame.
    Identity,
    /// ITRF and WGS84 realisations agree to within centimetres, and are treated as identical.
    Equivalent,
    Direct(Hop),
    Chained(Hop, Hop),
}

impl Route {
    pub(crate) fn apply(&self, point: &Point3, epoch: f64) -> Point3 {
        match self {
            Route::Identity | Route::Equivalent => *point,
            Route::Direct(hop) => hop.helmert(epoch).apply(point),
            Route::Chained(first, second) => {
                let intermediate = first.helmert(epoch).apply(point);
                second.helmert(epoch).apply(&intermediate)
            }
        }
    }
}

// WGS84(G730/G873/G1150) coincide with ITRF at the 10-centimetre level, and WGS84(G1674) with
// ITRF2008/ITRF2014 at the centimetre level.
fn is_near_equivalent(a: &str, b: &str) -> bool {
    (a.starts_with("ITRF") && b.starts_with("WGS84"))
        || (a.starts_with("WGS84") && b.starts_with("ITRF"))
}

/// Every edge leaving `frame`: stored entries first, then reversed ones, each in table order.
fn edges_from(frame: &'static str) -> impl Iterator<Item = Hop> {
    let forward = TRANSFORMS
        .iter()
        .filter(move |t| t.source == frame)
        .map(|params| Hop {
            params,
            reversed: false,
        });
    let reverse = TRANSFORMS
        .iter()
        .filter(move |t| t.target == frame)
        .map(|params| Hop {
            params,
            reversed: true,
        });
    forward.chain(reverse)
}

fn direct(source: &'static str, target: &str) -> Option<Hop> {
    edges_from(source).find(|hop| hop.target() == target)
}

fn resolve(source: &'static str, target: &'static str) -> Option<Route> {
    if source == target {
        return Some(Route::Identity);
    }
    if is_near_equivalent(source, target) {
        return Some(Route::Equivalent);
    }
    if let Some(hop) = direct(source, target) {
        return Some(Route::Direct(hop));
    }
    // the first hop must be a stored entry out of `source`; only the second may run backwards
    edges_from(source)
        .filter(|hop| !hop.reversed)
        .find_map(|first| {
            direct(first.target(), target).map(|second| Route::Chained(first, second))
        })
}

fn routes() -> &'static HashMap<(&'static str, &'static str), Route> {
    static ROUTES: OnceLock<HashMap<(&'static str, &'static str), Route>> = OnceLock::new();
    ROUTES.get_or_init(|| {
        let table: HashMap<_, _> = REFERENCE_FRAMES
            .iter()
            .flat_map(|source| REFERENCE_FRAMES.iter().map(move |target| (source, target)))
            .filter_map(|(source, target)| {
                resolve(source.name, target.name).map(|route| ((source.name, target.name), route))
            })
            .collect();
        debug!(
            "resolved {} routes between {} reference frames",
            table.len(),
            REFERENCE_FRAMES.len()
        );
        table
    })
}

/// Finds how to move points from `source` to `target`.
pub(crate) fn route(
    source: &ReferenceFrame,
    target: &ReferenceFrame,
) -> Result<Route, Error> {
    let route = routes()
        .get(&(source.name, target.name))
        .copied()
        .ok_or(Error::NoTransformPath {
            from: source.name,
            to: target.name,
        })?;
    trace!("{} -> {}: {route:?}", source.name, target.name);
    Ok(route)
}

#[cfg(test)]
mod tests {
    use super::{route, ReferenceFrame, Route, TransformParams};
    use crate::error::Error;
    use crate::helmert::Helmert;
    use crate::Point3;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    // the Royal Observatory, Greenwich on GRS80
    fn greenwich() -> Point3 {
        Point3::new(3_980_574.246_856_543, -102.126_966_312_186_38, 4_966_830.065_323_138)
    }

    // Sydney on GRS80
    fn sydney() -> Point3 {
        Point3::new(-4_646_559.141_836_342, 2_553_411.526_773_187_3, -3_533_561.878_481_629)
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(ReferenceFrame::named("ITRF2014"), Ok(&ReferenceFrame::ITRF2014));
        assert_eq!(ReferenceFrame::named("WGS84g1674"), Ok(&ReferenceFrame::WGS84_G1674));
        assert_eq!(
            ReferenceFrame::named("ITRF2020"),
            Err(Error::UnknownReferenceFrame("ITRF2020".to_owned()))
        );
    }

    #[test]
    fn transforms_only_name_known_frames() {
        for t in TransformParams::all() {
            assert!(ReferenceFrame::named(t.source()).is_ok(), "{}", t.source());
            assert!(ReferenceFrame::named(t.target()).is_ok(), "{}", t.target());
        }
    }

    #[test]
    fn reversed_negates_everything() {
        let t = TransformParams::between("ITRF2000", "NAD83").unwrap();
        let r = t.reversed();
        assert_eq!(r.source(), "NAD83");
        assert_eq!(r.target(), "ITRF2000");
        assert_eq!(r.epoch(), t.epoch());
        assert_eq!(r.params(), -t.params());
        assert_eq!(r.rates(), -t.rates());
        assert_eq!(r.reversed(), *t);
        assert_eq!(TransformParams::between("NAD83", "ITRF2000"), None);
    }

    #[rstest]
    #[case(ReferenceFrame::ITRF2014, ReferenceFrame::ITRF2014, Route::Identity)]
    #[case(ReferenceFrame::ITRF2008, ReferenceFrame::WGS84_G1674, Route::Equivalent)]
    #[case(ReferenceFrame::WGS84_G1150, ReferenceFrame::ITRF2000, Route::Equivalent)]
    fn trivial_routes(
        #[case] source: ReferenceFrame,
        #[case] target: ReferenceFrame,
        #[case] expected: Route,
    ) {
        assert_eq!(route(&source, &target), Ok(expected));
    }

    #[rstest]
    #[case(ReferenceFrame::ITRF2014, ReferenceFrame::ITRF2008, false)]
    #[case(ReferenceFrame::ITRF2008, ReferenceFrame::ITRF2014, true)]
    #[case(ReferenceFrame::GDA94, ReferenceFrame::ITRF2000, true)]
    fn direct_routes(
        #[case] source: ReferenceFrame,
        #[case] target: ReferenceFrame,
        #[case] reversed: bool,
    ) {
        match route(&source, &target) {
            Ok(Route::Direct(hop)) => assert_eq!(hop.reversed, reversed),
            other => panic!("expected a direct route, got {other:?}"),
        }
    }

    #[rstest]
    #[case(ReferenceFrame::ITRF2014, ReferenceFrame::GDA94, "ITRF2008")]
    #[case(ReferenceFrame::ITRF2014, ReferenceFrame::NAD83, "ITRF2000")]
    #[case(ReferenceFrame::ITRF2008, ReferenceFrame::ITRF93, "ITRF2000")]
    #[case(ReferenceFrame::ITRF2005, ReferenceFrame::ITRF91, "ITRF2000")]
    fn chained_routes(
        #[case] source: ReferenceFrame,
        #[case] target: ReferenceFrame,
        #[case] via: &str,
    ) {
        init_logging();
        match route(&source, &target) {
            Ok(Route::Chained(first, second)) => {
                assert!(!first.reversed);
                assert_eq!(first.target(), via);
                assert_eq!(second.target(), target.name());
            }
            other => panic!("expected a chained route, got {other:?}"),
        }
    }

    #[rstest]
    #[case(ReferenceFrame::WGS84_G1762, ReferenceFrame::WGS84_G1150)]
    #[case(ReferenceFrame::WGS84_G1762, ReferenceFrame::ETRF2000)]
    #[case(ReferenceFrame::GDA94, ReferenceFrame::WGS84_G1674)]
    // frames that are never the source of a stored transform can only be left by a direct hop
    #[case(ReferenceFrame::NAD83, ReferenceFrame::GDA94)]
    #[case(ReferenceFrame::GDA94, ReferenceFrame::NAD83)]
    #[case(ReferenceFrame::ETRF2000, ReferenceFrame::ITRF93)]
    #[case(ReferenceFrame::ITRF91, ReferenceFrame::ETRF2000)]
    fn unreachable_frames(#[case] source: ReferenceFrame, #[case] target: ReferenceFrame) {
        assert_eq!(
            route(&source, &target),
            Err(Error::NoTransformPath {
                from: source.name(),
                to: target.name(),
            })
        );
    }

    #[test]
    fn direct_route_applies_rates_from_its_own_epoch() {
        let etrf = route(&ReferenceFrame::ITRF2000, &ReferenceFrame::ETRF2000)
            .unwrap()
            .apply(&greenwich(), 2012.0);
        assert_relative_eq!(
            etrf - greenwich(),
            crate::Vector3::new(0.325_371, -0.345_400, -0.265_494),
            epsilon = 1e-5
        );
    }

    #[test]
    fn reverse_route_undoes_forward_route() {
        let there = route(&ReferenceFrame::ITRF2000, &ReferenceFrame::ETRF2000)
            .unwrap()
            .apply(&greenwich(), 2012.0);
        let back = route(&ReferenceFrame::ETRF2000, &ReferenceFrame::ITRF2000)
            .unwrap()
            .apply(&there, 2012.0);
        assert_relative_eq!(back, greenwich(), epsilon = 1e-6);
    }

    #[test]
    fn chained_route_evaluates_each_hop_at_its_own_epoch() {
        let to_itrf2008 = TransformParams::between("ITRF2014", "ITRF2008").unwrap();
        let to_gda94 = TransformParams::between("ITRF2008", "GDA94").unwrap();
        let expected = Helmert::from_frame_params(
            &to_gda94.params(),
            &to_gda94.rates(),
            2020.0 - 1994.0,
        )
        .apply(
            &Helmert::from_frame_params(
                &to_itrf2008.params(),
                &to_itrf2008.rates(),
                2020.0 - 2010.0,
            )
            .apply(&sydney()),
        );

        let gda94 = route(&ReferenceFrame::ITRF2014, &ReferenceFrame::GDA94)
            .unwrap()
            .apply(&sydney(), 2020.0);
        assert_eq!(gda94, expected);
        assert_relative_eq!(
            gda94 - sydney(),
            crate::Vector3::new(-1.072_413, 0.000_779, 1.247_026),
            epsilon = 1e-5
        );
    }
}
