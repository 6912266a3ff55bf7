// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use crate::keypoint::Keypoint;
use crate::results::Person;

use super::color::Color;

/// A polyline drawn through consecutive keypoints.
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    /// Keypoints to connect, in drawing order.
    pub keypoints: &'static [Keypoint],
    /// Line color.
    pub color: Color,
}

impl Segment {
    /// Pixel points to connect for `person`.
    ///
    /// Keypoints missing from the person are skipped, so the line joins the
    /// remaining ones in order.
    pub fn points(&self, person: &Person) -> Vec<(i32, i32)> {
        self.keypoints
            .iter()
            .filter_map(|&kind| person.keypoint(kind))
            .map(|part| (part.x, part.y))
            .collect()
    }
}

/// MoveNet skeleton as colored polylines.
pub const SKELETON: [Segment; 6] = [
    // face
    Segment {
        keypoints: &[Keypoint::Nose, Keypoint::LeftEye, Keypoint::RightEye, Keypoint::Nose],
        color: Color::FACE,
    },
    // rightArm
    Segment {
        keypoints: &[Keypoint::RightShoulder, Keypoint::RightElbow, Keypoint::RightWrist],
        color: Color::ARM,
    },
    // leftArm
    Segment {
        keypoints: &[Keypoint::LeftShoulder, Keypoint::LeftElbow, Keypoint::LeftWrist],
        color: Color::ARM,
    },
    // rightLeg
    Segment {
        keypoints: &[Keypoint::RightHip, Keypoint::RightKnee, Keypoint::RightAnkle],
        color: Color::LEG,
    },
    // leftLeg
    Segment {
        keypoints: &[Keypoint::LeftHip, Keypoint::LeftKnee, Keypoint::LeftAnkle],
        color: Color::LEG,
    },
    // torso
    Segment {
        keypoints: &[
            Keypoint::RightShoulder,
            Keypoint::LeftShoulder,
            Keypoint::LeftHip,
            Keypoint::RightHip,
            Keypoint::RightShoulder,
        ],
        color: Color::TORSO,
    },
];
