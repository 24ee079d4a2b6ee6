use crate::datum::Datum;
use crate::ellipsoid::Ellipsoid;
use crate::error::{finite, Error};
use crate::reference_frame::ReferenceFrame;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What a point's coordinates are relative to.
///
/// Points that carry no frame are assumed to be on the WGS84 ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(into = "FrameRepr", try_from = "FrameRepr")
)]
pub enum Frame {
    #[default]
    Unspecified,
    Datum(&'static Datum),
    /// A reference frame, along with the epoch (decimal year) the coordinates were observed at.
    ReferenceFrame {
        frame: &'static ReferenceFrame,
        epoch: f64,
    },
}

impl Frame {
    /// Tags with `frame` at the frame's own reference epoch.
    #[must_use]
    pub fn reference_frame(frame: &'static ReferenceFrame) -> Self {
        Self::ReferenceFrame {
            frame,
            epoch: frame.epoch(),
        }
    }

    /// Tags with `frame` at an explicit observation epoch.
    pub fn reference_frame_at(frame: &'static ReferenceFrame, epoch: f64) -> Result<Self, Error> {
        Ok(Self::ReferenceFrame {
            frame,
            epoch: finite("epoch", epoch)?,
        })
    }

    /// The ellipsoid that geodetic coordinates in this frame are expressed on.
    #[must_use]
    pub fn ellipsoid(&self) -> &'static Ellipsoid {
        match self {
            Frame::Unspecified => &Ellipsoid::WGS84,
            Frame::Datum(datum) => datum.ellipsoid(),
            Frame::ReferenceFrame { frame, .. } => frame.ellipsoid(),
        }
    }

    #[must_use]
    pub fn datum(&self) -> Option<&'static Datum> {
        match self {
            Frame::Datum(datum) => Some(*datum),
            _ => None,
        }
    }

    #[must_use]
    pub fn epoch(&self) -> Option<f64> {
        match self {
            Frame::ReferenceFrame { epoch, .. } => Some(*epoch),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<&'static str> {
        match self {
            Frame::Unspecified => None,
            Frame::Datum(datum) => Some(datum.name()),
            Frame::ReferenceFrame { frame, .. } => Some(frame.name()),
        }
    }
}

impl From<&'static Datum> for Frame {
    fn from(datum: &'static Datum) -> Self {
        Self::Datum(datum)
    }
}

impl From<&'static ReferenceFrame> for Frame {
    fn from(frame: &'static ReferenceFrame) -> Self {
        Self::reference_frame(frame)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frame::Unspecified => write!(f, "unspecified"),
            Frame::Datum(datum) => write!(f, "{}", datum.name()),
            Frame::ReferenceFrame { frame, epoch } => write!(f, "{}@{epoch}", frame.name()),
        }
    }
}

/// Frames travel by registry name.
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum FrameRepr {
    Unspecified,
    Datum { name: String },
    ReferenceFrame { name: String, epoch: f64 },
}

#[cfg(feature = "serde")]
impl From<Frame> for FrameRepr {
    fn from(frame: Frame) -> Self {
        match frame {
            Frame::Unspecified => FrameRepr::Unspecified,
            Frame::Datum(datum) => FrameRepr::Datum {
                name: datum.name().to_owned(),
            },
            Frame::ReferenceFrame { frame, epoch } => FrameRepr::ReferenceFrame {
                name: frame.name().to_owned(),
                epoch,
            },
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<FrameRepr> for Frame {
    type Error = Error;

    fn try_from(repr: FrameRepr) -> Result<Self, Self::Error> {
        match repr {
            FrameRepr::Unspecified => Ok(Frame::Unspecified),
            FrameRepr::Datum { name } => Ok(Frame::Datum(Datum::named(&name)?)),
            FrameRepr::ReferenceFrame { name, epoch } => {
                Frame::reference_frame_at(ReferenceFrame::named(&name)?, epoch)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Frame;
    use crate::datum::Datum;
    use crate::ellipsoid::Ellipsoid;
    use crate::error::Error;
    use crate::reference_frame::ReferenceFrame;
    use rstest::rstest;

    #[rstest]
    #[case(Frame::Unspecified, &Ellipsoid::WGS84)]
    #[case(Frame::Datum(&Datum::OSGB36), &Ellipsoid::AIRY_1830)]
    #[case(Frame::reference_frame(&ReferenceFrame::ITRF2014), &Ellipsoid::GRS80)]
    #[case(Frame::reference_frame(&ReferenceFrame::WGS84_G1762), &Ellipsoid::WGS84)]
    fn ellipsoid_of_frame(#[case] frame: Frame, #[case] expected: &Ellipsoid) {
        assert_eq!(frame.ellipsoid(), expected);
    }

    #[test]
    fn reference_frame_defaults_to_its_own_epoch() {
        let frame = Frame::reference_frame(&ReferenceFrame::GDA94);
        assert_eq!(frame.epoch(), Some(1994.0));
        assert_eq!(frame.name(), Some("GDA94"));
        assert_eq!(frame.datum(), None);
    }

    #[test]
    fn epoch_must_be_finite() {
        assert_eq!(
            Frame::reference_frame_at(&ReferenceFrame::ITRF2014, f64::INFINITY),
            Err(Error::InvalidNumber {
                what: "epoch",
                value: f64::INFINITY
            })
        );
    }

    #[test]
    fn display() {
        assert_eq!(Frame::Unspecified.to_string(), "unspecified");
        assert_eq!(Frame::Datum(&Datum::ED50).to_string(), "ED50");
        let itrf = Frame::reference_frame_at(&ReferenceFrame::ITRF2008, 2012.5).unwrap();
        assert_eq!(itrf.to_string(), "ITRF2008@2012.5");
    }

    #[cfg(feature = "serde")]
    #[rstest]
    #[case(Frame::Unspecified, "kind: unspecified\n")]
    #[case(Frame::Datum(&Datum::NAD27), "kind: datum\nname: NAD27\n")]
    #[case(
        Frame::reference_frame_at(&ReferenceFrame::ETRF2000, 2012.0).unwrap(),
        "kind: reference_frame\nname: ETRF2000\nepoch: 2012.0\n"
    )]
    fn serde_by_name(#[case] frame: Frame, #[case] yaml: &str) {
        assert_eq!(serde_yaml::to_string(&frame).unwrap(), yaml);
        assert_eq!(serde_yaml::from_str::<Frame>(yaml).unwrap(), frame);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializing_unknown_names_fails() {
        let err = serde_yaml::from_str::<Frame>("kind: datum\nname: Atlantis\n").unwrap_err();
        assert!(err.to_string().contains("unknown datum 'Atlantis'"), "{err}");
    }
}
