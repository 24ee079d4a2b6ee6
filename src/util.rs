/// Wraps a latitude into [-90°, 90°].
///
/// Out-of-range values reflect off the poles (a triangle wave) rather than being clamped, so
/// 100° becomes 80° and -100° becomes -80°.
pub(crate) fn wrap90(degrees: f64) -> f64 {
    if (-90. ..=90.).contains(&degrees) {
        return degrees;
    }
    // triangle wave with amplitude a = 90 and period p = 360:
    //   4a/p ⋅ |((x - p/4) mod p) - p/2| - a
    ((degrees - 90.).rem_euclid(360.) - 180.).abs() - 90.
}

/// Wraps a longitude into (-180°, 180°].
pub(crate) fn wrap180(degrees: f64) -> f64 {
    if -180. < degrees && degrees <= 180. {
        return degrees;
    }
    // sawtooth with amplitude 180 and period 360
    let wrapped = (degrees - 180.).rem_euclid(360.) - 180.;
    if wrapped == -180. {
        180.
    } else {
        wrapped
    }
}

/// Wraps a bearing into [0°, 360°).
pub(crate) fn wrap360(degrees: f64) -> f64 {
    if (0. ..360.).contains(&degrees) {
        return degrees;
    }
    let wrapped = degrees.rem_euclid(360.);
    // rem_euclid of a tiny negative value rounds up to the modulus itself
    if wrapped == 360. {
        0.
    } else {
        wrapped
    }
}

/// Rounds to the given number of decimal places. NaN stays NaN.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Computes the central angle (in radians) between two lat/lon points (in degrees).
///
/// To turn this into [great-circle distance], multiply by the radius of the sphere. Uses the
/// haversine in its `sin²` form, which stays well-conditioned for points very close together.
///
/// [great-circle distance]: https://en.wikipedia.org/wiki/Great-circle_distance
pub(crate) fn central_angle_by_haversine(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> f64 {
    let (lat_a, lat_b) = (lat_a.to_radians(), lat_b.to_radians()); // φ1, φ2
    let delta_lat = lat_b - lat_a;
    let delta_lon = (lon_b - lon_a).to_radians();

    let a = (delta_lat / 2.).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (delta_lon / 2.).sin().powi(2);
    2. * a.sqrt().atan2((1. - a).sqrt())
}

#[cfg(test)]
mod tests {
    use super::{central_angle_by_haversine, round_to, wrap180, wrap360, wrap90};
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0., 0.)]
    #[case(45., 45.)]
    #[case(90., 90.)]
    #[case(-90., -90.)]
    #[case(91., 89.)]
    #[case(100., 80.)]
    #[case(180., 0.)]
    #[case(270., -90.)]
    #[case(-100., -80.)]
    #[case(-180., 0.)]
    #[case(360. + 45., 45.)]
    fn latitude_reflects_off_the_poles(#[case] input: f64, #[case] expected: f64) {
        assert_relative_eq!(wrap90(input), expected, epsilon = 1e-12);
    }

    #[rstest]
    #[case(0., 0.)]
    #[case(180., 180.)]
    #[case(-180., 180.)]
    #[case(179.5, 179.5)]
    #[case(190., -170.)]
    #[case(-190., 170.)]
    #[case(360., 0.)]
    #[case(540., 180.)]
    #[case(-540., 180.)]
    #[case(720. + 30., 30.)]
    fn longitude_saws_around(#[case] input: f64, #[case] expected: f64) {
        assert_relative_eq!(wrap180(input), expected, epsilon = 1e-12);
    }

    #[rstest]
    #[case(0., 0.)]
    #[case(359.5, 359.5)]
    #[case(360., 0.)]
    #[case(-90., 270.)]
    #[case(-1e-20, 0.)]
    #[case(725., 5.)]
    fn bearing_wraps_into_a_full_turn(#[case] input: f64, #[case] expected: f64) {
        let wrapped = wrap360(input);
        assert!((0. ..360.).contains(&wrapped), "{wrapped}");
        assert_relative_eq!(wrapped, expected, epsilon = 1e-12);
    }

    #[test]
    fn in_range_values_are_untouched() {
        for x in [-89.999_999_999_999, 12.345_678_901_234_5, 89.999_999_999_999] {
            assert_eq!(wrap90(x), x);
            assert_eq!(wrap180(x), x);
        }
        assert_eq!(wrap360(123.456_789_012_345_6), 123.456_789_012_345_6);
    }

    #[rstest]
    #[case(969_954.166_313_7, 3, 969_954.166)]
    #[case(9.141_877_488_91, 7, 9.141_877_5)]
    #[case(-0.000_000_04, 7, -0.)]
    fn rounding(#[case] value: f64, #[case] decimals: i32, #[case] expected: f64) {
        assert_eq!(round_to(value, decimals), expected);
    }

    #[test]
    fn rounding_keeps_nan() {
        assert!(round_to(f64::NAN, 3).is_nan());
    }

    #[test]
    fn haversine_resolves_millimetres() {
        let r: f64 = 6_371_000.;
        // a millimetre of latitude
        let dlat = (0.001 / r).to_degrees();
        let d = r * central_angle_by_haversine(51.5, -0.1, 51.5 + dlat, -0.1);
        assert_relative_eq!(d, 0.001, epsilon = 1e-8);
    }

    #[test]
    fn haversine_quarter_turn() {
        assert_relative_eq!(
            central_angle_by_haversine(0., 0., 0., 90.),
            std::f64::consts::FRAC_PI_2,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            central_angle_by_haversine(0., 0., 90., 0.),
            std::f64::consts::FRAC_PI_2,
            epsilon = 1e-12
        );
    }
}
