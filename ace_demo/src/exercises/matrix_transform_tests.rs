//! Unit tests for the exercise 3 animation

use super::*;

#[test]
fn test_animation_moves_right_first() {
    let mut animation = Animation::default();
    animation.update(0.5);
    assert!((animation.position - 0.5).abs() < 1e-6);
    assert_eq!(animation.speed, 1.0);
}

#[test]
fn test_animation_bounces_after_overshoot() {
    let mut animation = Animation {
        position: 1.05,
        ..Animation::default()
    };
    animation.update(0.1);
    assert_eq!(animation.speed, -1.0);
    assert!((animation.position - 0.95).abs() < 1e-5);

    // Back inside the range: no second flip
    animation.update(0.1);
    assert_eq!(animation.speed, -1.0);
}

#[test]
fn test_animation_rotation_rate_and_wrap() {
    let mut animation = Animation::default();
    animation.update(1.0);
    assert!((animation.rotation_deg - ROTATION_SPEED).abs() < 1e-4);

    animation.rotation_deg = 355.0;
    animation.update(0.2);
    assert!((animation.rotation_deg - 5.0).abs() < 1e-3);
}

#[test]
fn test_scale_factor_stays_in_pulse_range() {
    let mut animation = Animation::default();
    assert!((animation.scale_factor() - 0.75).abs() < 1e-6);

    for _ in 0..200 {
        animation.update(0.05);
        let s = animation.scale_factor();
        assert!((0.5 - 1e-6..=1.0 + 1e-6).contains(&s), "scale {s}");
    }
}

#[test]
fn test_model_matrix_is_translate_rotate_scale() {
    let animation = Animation {
        position: 0.4,
        speed: 1.0,
        rotation_deg: 90.0,
        scale_time: 0.0,
    };
    let m = animation.model_matrix();

    // Translation column
    assert!((m.m[12] - 0.4).abs() < 1e-6);
    assert_eq!(m.m[13], 0.0);

    // Local X (scaled by 0.75) rotated onto +Y
    let x_axis = m.transform_point4(ace_engine::ace::math::Vec3::new(1.0, 0.0, 0.0));
    assert!((x_axis[0] - 0.4).abs() < 1e-5);
    assert!((x_axis[1] - 0.75).abs() < 1e-5);
}
