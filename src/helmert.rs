//! Helmert (similarity) transforms between Cartesian frames.
//!
//! Both the static datum transforms and the time-dependent reference-frame transforms use the
//! small-angle form of the rotation matrix, so a transform followed by its negation is only the
//! identity to first order. This is how the published parameter sets are meant to be applied.

use crate::{Point3, Vector3};
use nalgebra::Matrix3;
use std::ops::Neg;

/// The seven numbers describing a Helmert transform: three translations, a scale change, and
/// three rotations about the x, y and z axes.
///
/// The units depend on where the parameters are used:
///
/// - for [datums](crate::Datum): metres, parts per million, and arcseconds;
/// - for [reference frames](crate::ReferenceFrame): millimetres, parts per billion, and
///   milliarcseconds (and the same per year for their rates).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HelmertParams {
    pub translation: [f64; 3],
    pub scale: f64,
    pub rotation: [f64; 3],
}

impl HelmertParams {
    /// Parameters in the conventional `[tx, ty, tz, s, rx, ry, rz]` order.
    #[must_use]
    pub const fn new(tx: f64, ty: f64, tz: f64, s: f64, rx: f64, ry: f64, rz: f64) -> Self {
        Self {
            translation: [tx, ty, tz],
            scale: s,
            rotation: [rx, ry, rz],
        }
    }
}

/// Negating every parameter gives the (linearised) reverse transform.
impl Neg for HelmertParams {
    type Output = Self;

    fn neg(self) -> Self::Output {
        let [tx, ty, tz] = self.translation;
        let [rx, ry, rz] = self.rotation;
        Self::new(-tx, -ty, -tz, -self.scale, -rx, -ry, -rz)
    }
}

/// A Helmert transform in SI units, ready to be applied to ECEF points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Helmert {
    /// metres
    translation: Vector3,
    /// dimensionless scale factor S = 1 + s
    scale: f64,
    /// radians
    rotation: Vector3,
}

impl Helmert {
    /// Builds the 7-parameter transform of a datum (m, ppm, arcsec).
    pub(crate) fn from_datum_params(params: &HelmertParams) -> Self {
        let [rx, ry, rz] = params.rotation.map(|arcsec| (arcsec / 3600.).to_radians());
        Self {
            translation: Vector3::from(params.translation),
            scale: 1. + params.scale / 1e6,
            rotation: Vector3::new(rx, ry, rz),
        }
    }

    /// Builds the 14-parameter transform between reference frames (mm, ppb, mas, and the same
    /// per year), evaluated `dt` years after the parameters' reference epoch.
    pub(crate) fn from_frame_params(params: &HelmertParams, rates: &HelmertParams, dt: f64) -> Self {
        let at_epoch = |base: f64, rate: f64| base + rate * dt;

        let translation = Vector3::from(std::array::from_fn::<_, 3, _>(|i| {
            at_epoch(params.translation[i], rates.translation[i]) / 1000.
        }));
        let rotation = Vector3::from(std::array::from_fn::<_, 3, _>(|i| {
            (at_epoch(params.rotation[i], rates.rotation[i]) / 3600. / 1000.).to_radians()
        }));

        Self {
            translation,
            scale: 1. + params.scale / 1e9 + rates.scale / 1e9 * dt,
            rotation,
        }
    }

    //   x' = tx + x·S − y·Rz + z·Ry
    //   y' = ty + x·Rz + y·S − z·Rx
    //   z' = tz − x·Ry + y·Rx + z·S
    fn matrix(&self) -> Matrix3<f64> {
        let s = self.scale;
        let (rx, ry, rz) = (self.rotation.x, self.rotation.y, self.rotation.z);
        #[rustfmt::skip]
        let m = Matrix3::new(
              s, -rz,  ry,
             rz,   s, -rx,
            -ry,  rx,   s,
        );
        m
    }

    pub(crate) fn apply(&self, point: &Point3) -> Point3 {
        Point3::from(self.translation + self.matrix() * point.coords)
    }
}

#[cfg(test)]
mod tests {
    use super::{Helmert, HelmertParams};
    use crate::Point3;
    use approx::assert_relative_eq;
    use rstest::rstest;

    const A: f64 = 6_378_137.;

    #[test]
    fn zero_params_are_identity() {
        let p = Point3::new(3_980_581.21, -111.16, 4_966_824.52);
        let h = Helmert::from_datum_params(&HelmertParams::default());
        assert_eq!(h.apply(&p), p);
    }

    #[test]
    fn translation_only() {
        // EPSG:1134, ED50 -> WGS84 three-parameter shift
        let h = Helmert::from_datum_params(&HelmertParams::new(-87., -96., -120., 0., 0., 0., 0.));
        assert_eq!(h.apply(&Point3::origin()), Point3::new(-87., -96., -120.));
    }

    #[test]
    fn scale_in_ppm() {
        let h = Helmert::from_datum_params(&HelmertParams::new(0., 0., 0., 1., 0., 0., 0.));
        assert_relative_eq!(h.apply(&Point3::new(A, 0., 0.)).x, A + A / 1e6, epsilon = 1e-9);
    }

    #[rstest]
    // one arcsecond about z swings the x axis towards y
    #[case(HelmertParams::new(0., 0., 0., 0., 0., 0., 1.), Point3::new(A, 0., 0.), Point3::new(A, A * 4.848_136_811_095_36e-6, 0.))]
    // ... and about y swings z towards x
    #[case(HelmertParams::new(0., 0., 0., 0., 0., 1., 0.), Point3::new(0., 0., A), Point3::new(A * 4.848_136_811_095_36e-6, 0., A))]
    // ... and about x swings y towards z
    #[case(HelmertParams::new(0., 0., 0., 0., 1., 0., 0.), Point3::new(0., A, 0.), Point3::new(0., A, A * 4.848_136_811_095_36e-6))]
    fn small_rotations(
        #[case] params: HelmertParams,
        #[case] input: Point3,
        #[case] expected: Point3,
    ) {
        let h = Helmert::from_datum_params(&params);
        assert_relative_eq!(h.apply(&input), expected, epsilon = 1e-6);
    }

    #[test]
    fn negated_params_undo_to_first_order() {
        // OSGB36 parameters are among the largest in use
        let params = HelmertParams::new(-446.448, 125.157, -542.06, 20.4894, -0.1502, -0.247, -0.8421);
        let p = Point3::new(3_980_581.21, -111.16, 4_966_824.52);
        let there = Helmert::from_datum_params(&params).apply(&p);
        let back = Helmert::from_datum_params(&-params).apply(&there);
        assert_relative_eq!(back, p, epsilon = 0.02);
    }

    #[test]
    fn frame_params_apply_rates() {
        let params = HelmertParams::new(1.6, 1.9, 2.4, -0.02, 0., 0., 0.);
        let rates = HelmertParams::new(0., 0., -0.1, 0.03, 0., 0., 0.);

        let at_epoch = Helmert::from_frame_params(&params, &rates, 0.).apply(&Point3::origin());
        assert_relative_eq!(at_epoch, Point3::new(0.0016, 0.0019, 0.0024), epsilon = 1e-12);

        // ten years later z has drifted by a millimetre
        let later = Helmert::from_frame_params(&params, &rates, 10.).apply(&Point3::origin());
        assert_relative_eq!(later, Point3::new(0.0016, 0.0019, 0.0014), epsilon = 1e-12);

        let scaled = Helmert::from_frame_params(&params, &rates, 10.).apply(&Point3::new(A, 0., 0.));
        assert_relative_eq!(scaled.x, 0.0016 + A * (1. + (-0.02 + 0.3) / 1e9), epsilon = 1e-6);
    }

    #[test]
    fn frame_rotations_in_milliarcseconds() {
        let params = HelmertParams::new(0., 0., 0., 0., 0., 0., 1000.);
        let h = Helmert::from_frame_params(&params, &HelmertParams::default(), 5.);
        let rotated = h.apply(&Point3::new(A, 0., 0.));
        assert_relative_eq!(rotated.y, A * 4.848_136_811_095_36e-6, epsilon = 1e-6);
    }
}
