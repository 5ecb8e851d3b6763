//! Unit tests for the exercise 4 scene and culling

use super::*;

fn frustum_for(view: Mat4) -> Frustum {
    let proj = Mat4::perspective(FOV_Y_DEG, 640.0 / 480.0, NEAR, FAR);
    Frustum::from_proj_view(&(proj * view))
}

// ============================================================================
// SCENE TESTS
// ============================================================================

#[test]
fn test_build_scene_count() {
    // 1 red triangle + 7 columns x 9 rows
    assert_eq!(build_scene().len(), 64);
}

#[test]
fn test_build_scene_red_triangle_first() {
    let scene = build_scene();
    assert_eq!(scene[0].position, Vec3::new(0.0, 0.0, -5.0));
    assert_eq!(scene[0].colour, [1.0, 0.0, 0.0]);
}

#[test]
fn test_build_scene_grid_extents_and_tint() {
    let scene = build_scene();
    let grid = &scene[1..];

    assert!(grid.iter().all(|t| (-15.0..=15.0).contains(&t.position.x)));
    assert!(grid.iter().all(|t| (-50.0..=-10.0).contains(&t.position.z)));
    assert!(grid.iter().all(|t| t.position.y == 0.0 && t.colour[1] == 0.5));

    let near_left = grid
        .iter()
        .find(|t| t.position == Vec3::new(-15.0, 0.0, -10.0))
        .unwrap();
    assert_eq!(near_left.colour, [0.0, 0.5, 0.0]);

    let far_right = grid
        .iter()
        .find(|t| t.position == Vec3::new(15.0, 0.0, -50.0))
        .unwrap();
    assert_eq!(far_right.colour, [1.0, 0.5, 1.0]);
}

#[test]
fn test_vertex_data_offsets_template() {
    let triangle = SceneTriangle {
        position: Vec3::new(5.0, 0.0, -10.0),
        colour: [0.2, 0.5, 0.7],
    };
    let (points, colours) = triangle.vertex_data();

    assert_eq!(&points[0..3], &[5.0, 1.0, -10.0]);
    assert_eq!(&points[3..6], &[6.0, -1.0, -10.0]);
    assert_eq!(&points[6..9], &[4.0, -1.0, -10.0]);
    assert_eq!(&colours[6..9], &[0.2, 0.5, 0.7]);
}

// ============================================================================
// CULLING TESTS
// ============================================================================

#[test]
fn test_visible_triangles_without_frustum_keeps_all() {
    let scene = build_scene();
    assert_eq!(visible_triangles(&scene, None).count(), scene.len());
}

#[test]
fn test_visible_triangles_default_camera() {
    let scene = build_scene();
    let frustum = frustum_for(FlyCamera::default().view_matrix());
    let visible: Vec<_> = visible_triangles(&scene, Some(&frustum)).collect();

    assert_eq!(visible[0].position, Vec3::new(0.0, 0.0, -5.0));
    // The outer columns of the nearest row fall outside the side planes
    assert!(visible.len() < scene.len());
    assert!(!visible.iter().any(|t| t.position == Vec3::new(-15.0, 0.0, -10.0)));
}

#[test]
fn test_visible_triangles_camera_turned_around() {
    let scene = build_scene();
    let mut camera = FlyCamera::default();
    camera.yaw = 180.0;
    let frustum = frustum_for(camera.view_matrix());

    assert_eq!(visible_triangles(&scene, Some(&frustum)).count(), 0);
}

// ============================================================================
// STATS TESTS
// ============================================================================

#[test]
fn test_stats_message() {
    assert_eq!(stats_message(32, 64, true), "Drawing 32 / 64 (50%) - Culling: ON");
    assert_eq!(stats_message(64, 64, false), "Drawing 64 / 64 (100%) - Culling: OFF");
    assert_eq!(stats_message(1, 3, true), "Drawing 1 / 3 (33%) - Culling: ON");
}

#[test]
fn test_stats_message_empty_scene() {
    assert_eq!(stats_message(0, 0, false), "Drawing 0 / 0 (0%) - Culling: OFF");
}
