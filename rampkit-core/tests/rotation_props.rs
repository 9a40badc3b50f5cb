use proptest::prelude::*;
use rampkit_core::geometry::{BoundingBoxMm, Footprint, Point2, rotate_point};
use rampkit_core::model::{Object2D, ObjectPatch};

const TOLERANCE: f64 = 1e-6;

proptest! {
    #[test]
    fn zero_rotation_is_identity(x in -20_000.0f64..20_000.0, y in -20_000.0f64..20_000.0) {
        let rotated = rotate_point(x, y, 0.0);
        prop_assert_eq!(rotated.x, x);
        prop_assert_eq!(rotated.y, y);
    }

    #[test]
    fn rotation_then_inverse_restores_point(
        x in -20_000.0f64..20_000.0,
        y in -20_000.0f64..20_000.0,
        r in 0u32..360,
    ) {
        let r = f64::from(r);
        let forward = rotate_point(x, y, r);
        let back = rotate_point(forward.x, forward.y, -r);
        prop_assert!((back.x - x).abs() < TOLERANCE);
        prop_assert!((back.y - y).abs() < TOLERANCE);
    }

    #[test]
    fn rotated_box_contains_center_and_preserves_it(
        cx in -10_000.0f64..10_000.0,
        cy in -10_000.0f64..10_000.0,
        w in 0.0f64..5_000.0,
        h in 0.0f64..5_000.0,
        r in 0u32..360,
    ) {
        let center = Point2::new(cx, cy);
        let bbox = BoundingBoxMm::rotated(center, Footprint::new(w, h), f64::from(r));
        prop_assert_eq!(bbox.center(), center);
        prop_assert!(bbox.left <= cx + TOLERANCE && cx <= bbox.right + TOLERANCE);
        prop_assert!(bbox.top <= cy + TOLERANCE && cy <= bbox.bottom + TOLERANCE);
        // 旋转后的包围盒不会小于原外形的较短边
        prop_assert!(bbox.width() + TOLERANCE >= w.min(h));
        prop_assert!(bbox.height() + TOLERANCE >= w.min(h));
    }

    #[test]
    fn patched_objects_stay_normalized(
        length in -5_000.0f64..5_000.0,
        rotation in -1_000.0f64..1_000.0,
        x in -12_500.0f64..12_500.0,
    ) {
        let ramp = Object2D::ramp("ramp-1", Point2::ORIGIN);
        let patch = ObjectPatch {
            run_mm: Some(length),
            rotation_deg: Some(rotation),
            x_mm: Some(x),
            ..ObjectPatch::default()
        };
        let patched = ramp.apply_patch(&patch);
        let base = patched.base();
        prop_assert!(base.rotation_deg >= 0.0 && base.rotation_deg < 360.0);
        prop_assert_eq!(base.rotation_deg.fract(), 0.0);
        prop_assert_eq!(base.x_mm.fract(), 0.0);
        prop_assert!(patched.plan_length_mm() >= 0.0);
        prop_assert_eq!(patched.apply_patch(&ObjectPatch::default()), patched.clone());
    }
}
