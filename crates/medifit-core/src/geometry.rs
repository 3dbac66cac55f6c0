//! Joint-angle geometry on 2D landmark coordinates.

use nalgebra::Point2;

/// Segments shorter than this are treated as coincident points.
const MIN_SEGMENT_LENGTH: f64 = 1e-9;

/// Calculate the angle ABC in degrees, in [0, 180].
///
/// The angle is the difference between the polar angles of B→C and B→A,
/// taken as an absolute value and reflected through 360 when it exceeds 180.
pub fn joint_angle(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> f64 {
    let ba = a - b;
    let bc = c - b;
    let radians = bc.y.atan2(bc.x) - ba.y.atan2(ba.x);
    let angle = radians.to_degrees().abs();

    if angle > 180.0 {
        360.0 - angle
    } else {
        angle
    }
}

/// Like [`joint_angle`], but `None` for coincident points or non-finite input.
pub fn checked_joint_angle(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> Option<f64> {
    if ![a, b, c].iter().all(|p| p.x.is_finite() && p.y.is_finite()) {
        return None;
    }

    let ba = a - b;
    let bc = c - b;
    if ba.norm() < MIN_SEGMENT_LENGTH || bc.norm() < MIN_SEGMENT_LENGTH {
        return None;
    }

    let angle = joint_angle(a, b, c);
    angle.is_finite().then_some(angle)
}

/// Truncate an angle to whole degrees the way angle history stores it.
pub fn whole_degrees(angle: f64) -> i32 {
    angle.trunc() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2<f64> {
        Point2::new(x, y)
    }

    #[test]
    fn test_straight_line_is_180() {
        let angle = joint_angle(p(0.0, 0.0), p(0.5, 0.0), p(1.0, 0.0));
        assert!((angle - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_right_angle() {
        let angle = joint_angle(p(0.0, 0.0), p(0.5, 0.0), p(0.5, 0.5));
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_reflex_angle_is_reflected() {
        // Polar difference 135 - (-90) = 225 before reflection
        let angle = joint_angle(p(0.0, -1.0), p(0.0, 0.0), p(-1.0, 1.0));
        assert!((angle - 135.0).abs() < 1e-9);
        assert!((0.0..=180.0).contains(&angle));
    }

    #[test]
    fn test_order_of_outer_points_does_not_matter() {
        let a = p(0.2, 0.9);
        let b = p(0.4, 0.5);
        let c = p(0.9, 0.6);
        assert!((joint_angle(a, b, c) - joint_angle(c, b, a)).abs() < 1e-9);
    }

    #[test]
    fn test_checked_rejects_coincident_points() {
        assert!(checked_joint_angle(p(0.5, 0.5), p(0.5, 0.5), p(1.0, 0.0)).is_none());
        assert!(checked_joint_angle(p(0.0, 0.0), p(0.5, 0.5), p(0.5, 0.5)).is_none());
    }

    #[test]
    fn test_checked_rejects_non_finite() {
        assert!(checked_joint_angle(p(f64::NAN, 0.0), p(0.5, 0.5), p(1.0, 0.0)).is_none());
        assert!(checked_joint_angle(p(0.0, 0.0), p(f64::INFINITY, 0.5), p(1.0, 0.0)).is_none());
    }

    #[test]
    fn test_whole_degrees_truncates() {
        assert_eq!(whole_degrees(139.99), 139);
        assert_eq!(whole_degrees(180.0), 180);
    }
}
