/// Integration tests that run whole frames through the pipeline:
/// mesh -> clip space -> clip -> cull/map -> sort -> draw list.
use nalgebra::{Matrix4, Point3, Vector2, Vector3, Vector4};
use softpipe_core::geometry::white;
use softpipe_core::obj::parse_obj;
use softpipe_core::projection::y_down;
use softpipe_core::interpolate::ClipVertex;
use softpipe_core::screen::map_to_screen;
use softpipe_core::transform::to_clip_space;
use softpipe_core::*;

fn identity_context(projection: Matrix4<f32>) -> Context {
    Context::new(Matrix4::identity(), projection, Viewport::new(0, 0, 800, 600))
}

fn flat_mesh(points: Vec<Point3<f32>>, faces: &[[u32; 3]]) -> Mesh {
    let triangles = faces.iter().map(|&f| Triangle::flat(f, white())).collect();
    Mesh::new(points, vec![], triangles).expect("valid test mesh")
}

fn unit_triangle() -> Mesh {
    flat_mesh(
        vec![
            Point3::new(-1.0, -1.0, 0.0),
            Point3::new(1.0, -1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ],
        &[[0, 1, 2]],
    )
}

fn close(a: (f32, f32), b: (f32, f32)) -> bool {
    (a.0 - b.0).abs() < 1e-3 && (a.1 - b.1).abs() < 1e-3
}

#[test]
fn unit_triangle_maps_to_viewport_corners() {
    // Straight pass-through projection with rows growing downward
    let ctx = identity_context(y_down());
    let mesh = unit_triangle();

    let mut clip = Vec::new();
    to_clip_space(mesh.points(), &ctx.projection_view(), &mut clip);
    let tri = [0usize, 1, 2].map(|i| ClipVertex::new(clip[i], Vector2::zeros(), white()));
    let ndc = [0usize, 1, 2].map(|i| ctx.clip_to_ndc(&clip[i]));
    let screen = map_to_screen(&ctx, &tri, &ndc);

    let expected = [(0.0, 600.0), (800.0, 600.0), (400.0, 0.0)];
    for (vertex, want) in screen.iter().zip(expected.iter()) {
        assert!(
            close((vertex.position.x, vertex.position.y), *want),
            "got {:?}, want {:?}",
            vertex.position,
            want
        );
    }
}

#[test]
fn unit_triangle_through_full_pipeline() {
    let ctx = identity_context(Matrix4::identity());
    let mut pipeline = Pipeline::new();
    let stats = pipeline.draw(&unit_triangle(), &ctx, TextureSize::default());

    assert_eq!(stats.drawn, 1);
    assert_eq!(stats.clipped, 0);
    let list = pipeline.draw_list();
    let got: Vec<(f32, f32)> = list.vertices.iter().map(|v| (v.dst_x, v.dst_y)).collect();
    let expected = [(0.0, 0.0), (800.0, 0.0), (400.0, 600.0)];
    for (g, w) in got.iter().zip(expected.iter()) {
        assert!(close(*g, *w), "got {:?}, want {:?}", g, w);
    }
    assert!(list.vertices.iter().all(|v| v.color_a == 1.0));
}

#[test]
fn mirrored_unit_triangle_is_culled() {
    let ctx = identity_context(y_down());
    let mut pipeline = Pipeline::new();
    let stats = pipeline.draw(&unit_triangle(), &ctx, TextureSize::default());
    assert_eq!(stats.drawn, 0);
    assert_eq!(stats.culled, 1);
}

#[test]
fn triangle_crossing_right_edge_is_split_in_two() {
    let mesh = flat_mesh(
        vec![
            Point3::new(-0.5, -0.5, 0.0),
            Point3::new(2.0, -0.5, 0.0),
            Point3::new(-0.5, 0.5, 0.0),
        ],
        &[[0, 1, 2]],
    );
    let ctx = identity_context(Matrix4::identity());
    let mut pipeline = Pipeline::new();
    let stats = pipeline.draw(&mesh, &ctx, TextureSize::default());

    assert_eq!(stats.clipped, 1);
    assert_eq!(stats.drawn, 2);
    for v in &pipeline.draw_list().vertices {
        assert!(v.dst_x <= 800.0 + 1e-3, "vertex escaped the viewport: {:?}", v);
    }
}

#[test]
fn triangle_outside_one_plane_draws_nothing() {
    let mesh = flat_mesh(
        vec![
            Point3::new(1.5, -0.5, 0.0),
            Point3::new(3.0, -0.5, 0.0),
            Point3::new(1.5, 0.5, 0.0),
        ],
        &[[0, 1, 2]],
    );
    let ctx = identity_context(Matrix4::identity());
    let mut pipeline = Pipeline::new();
    let stats = pipeline.draw(&mesh, &ctx, TextureSize::default());
    assert_eq!(stats.clipped, 1);
    assert_eq!(stats.drawn, 0);
    assert!(pipeline.draw_list().is_empty());
}

#[test]
fn collinear_triangle_crossing_a_plane_counts_as_culled() {
    let mesh = flat_mesh(
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
        ],
        &[[0, 1, 2]],
    );
    let ctx = identity_context(Matrix4::identity());
    let mut pipeline = Pipeline::new();
    let stats = pipeline.draw(&mesh, &ctx, TextureSize::default());

    assert_eq!(stats.clipped, 1);
    assert_eq!(stats.drawn, 0);
    assert_eq!(stats.culled + stats.drawn, stats.mesh_triangles);
}

#[test]
fn triangles_are_drawn_farthest_first_without_sharing_vertices() {
    // Mapped depth is 0.5 * z + 0.5, so these sit at 0.2, 0.5 and 0.1
    let mut points = Vec::new();
    let mut faces = Vec::new();
    for (i, z) in [-0.6_f32, 0.0, -0.8].iter().enumerate() {
        let x = -0.9 + 0.6 * i as f32;
        let base = points.len() as u32;
        points.push(Point3::new(x, -0.2, *z));
        points.push(Point3::new(x + 0.4, -0.2, *z));
        points.push(Point3::new(x, 0.2, *z));
        faces.push([base, base + 1, base + 2]);
    }
    let mesh = flat_mesh(points, &faces);

    let ctx = identity_context(Matrix4::identity());
    let mut pipeline = Pipeline::new();
    let stats = pipeline.draw(&mesh, &ctx, TextureSize::default());
    assert_eq!(stats.drawn, 3);

    let depths: Vec<f32> = pipeline.screen_triangles().iter().map(|t| t.depth).collect();
    for (got, want) in depths.iter().zip([0.5, 0.2, 0.1].iter()) {
        assert!((got - want).abs() < 1e-5, "depths {:?}", depths);
    }

    let list = pipeline.draw_list();
    assert_eq!(list.indices.len(), 9);
    for (t, triple) in list.indices.chunks(3).enumerate() {
        let base = 3 * t as u32;
        assert_eq!(triple, &[base, base + 1, base + 2]);
    }
    // The middle mesh triangle (depth 0.5) comes out first
    assert!((list.vertices[0].dst_x - 400.0 * (1.0 - 0.3)).abs() < 1e-3);
}

#[test]
fn textured_obj_scales_texcoords_to_pixels() {
    let src = "\
v -0.5 -0.5 0.0
v 0.5 -0.5 0.0
v 0.0 0.5 0.0
vt 0.0 1.0
vt 1.0 1.0
vt 0.5 0.0
f 1/1 2/2 3/3
";
    let mesh = parse_obj(src).expect("valid OBJ");
    let ctx = identity_context(Matrix4::identity());
    let mut pipeline = Pipeline::new();
    pipeline.draw(&mesh, &ctx, TextureSize::new(64, 32));

    let src: Vec<(f32, f32)> = pipeline
        .draw_list()
        .vertices
        .iter()
        .map(|v| (v.src_x, v.src_y))
        .collect();
    assert_eq!(src, vec![(0.0, 32.0), (64.0, 32.0), (32.0, 0.0)]);
}

#[test]
fn near_plane_clip_keeps_perspective_output_finite() {
    // A floor quad running from in front of the camera to behind it
    let mesh = flat_mesh(
        vec![
            Point3::new(-2.0, -1.0, 5.0),
            Point3::new(2.0, -1.0, 5.0),
            Point3::new(2.0, -1.0, -5.0),
            Point3::new(-2.0, -1.0, -5.0),
        ],
        &[[0, 1, 2], [0, 2, 3]],
    )
    .with_reversed_winding();

    let config = RenderConfig::default()
        .with_fov_degrees(60.0)
        .looking_from(Point3::new(0.0, 0.0, -1.0), Point3::new(0.0, 0.0, 10.0));
    let camera = CameraState::new(&config.camera);
    let ctx = Context::for_frame(&config.projection, &camera, 800, 600);

    let mut pipeline = Pipeline::new();
    let stats = pipeline.draw(&mesh, &ctx, TextureSize::default());
    assert_eq!(stats.clipped, 2);
    assert!(stats.drawn > 0);

    for triangle in pipeline.screen_triangles() {
        for v in &triangle.vertices {
            assert!(v.position.iter().all(|c| c.is_finite()));
            assert!(v.position.z >= -1e-4 && v.position.z <= 1.0 + 1e-4);
            assert!(v.position.y >= 300.0 - 1e-3, "floor must stay below the horizon");
        }
    }
}

#[test]
fn camera_drag_changes_the_frame() {
    let config = RenderConfig::default()
        .looking_from(Point3::new(0.0, 0.0, -10.0), Point3::new(0.0, 0.0, 0.0));
    let mesh = Mesh::cube(2.0);
    let mut pipeline = Pipeline::new();
    let mean_y = |list: &DrawList| {
        list.vertices.iter().map(|v| v.dst_y).sum::<f32>() / list.vertices.len() as f32
    };

    let idle = CameraState::new(&config.camera);
    let before = Context::for_frame(&config.projection, &idle, 800, 600);
    assert_eq!(pipeline.draw(&mesh, &before, TextureSize::default()).drawn, 2);
    let centered = mean_y(pipeline.draw_list());

    // Press, then drag up a little so the camera tilts upward
    let press = |y: f32| InputSnapshot {
        pointer_x: 400.0,
        pointer_y: y,
        button_down: true,
        keys: DirectionKeys::default(),
    };
    let camera = idle
        .update(&press(300.0), &config.camera)
        .update(&press(295.0), &config.camera);
    let view = camera.view_matrix().expect("dragging sets the view");
    assert!(camera.pitch < 0.0);
    let forward = view.transpose() * Vector4::new(0.0, 0.0, -1.0, 0.0);
    assert!(forward.xyz().dot(&Vector3::new(0.0, 1.0, 0.0)) > 0.0);

    let after = Context::for_frame(&config.projection, &camera, 800, 600);
    let stats = pipeline.draw(&mesh, &after, TextureSize::default());
    assert_eq!(stats.drawn, 2);
    assert_eq!(stats.clipped, 0);
    // Looking up moves the cube down the screen
    assert!(mean_y(pipeline.draw_list()) > centered + 1.0);
}
