use nalgebra::{Point3, Vector2, Vector3, Vector4};

use prism::prism::intersect::closest_hit;
use prism::prism::ray::generate_ray;
use prism::prism::texture::Image;
use prism::prism::trace::trace_ray;
use prism::{render, shade_pixel, Camera, Frame, RenderConfig, Scene, Sphere, Time, TraceSettings};

fn config(output: &str, scene: &str) -> RenderConfig {
    RenderConfig {
        width: 24,
        height: 16,
        output: output.to_owned(),
        scene: scene.to_owned(),
        samples: 2,
        max_bounces: 4,
        frames: 2,
        frame_interval_ms: 16.0,
        elapsed_ms: 0.0,
        jitter: true,
        seed: 3,
    }
}

#[test]
fn center_pixel_hits_near_side_of_sphere() {
    let camera = Camera::new(100, 100).unwrap();
    let scene = Scene::single();
    let ray = generate_ray(Vector2::new(0.5, 0.5), &camera);

    let payload = closest_hit(&ray, &scene.spheres, 1e-4).unwrap();
    assert!(payload.hit.intersected);
    assert!((payload.hit.position - Point3::new(0.0, 0.0, -1.0)).norm() < 1e-4);
    assert!((payload.hit.normal.into_inner() - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-4);

    let settings = TraceSettings {
        samples: 1,
        max_bounces: 0,
        jitter: false,
        ..Default::default()
    };
    let color = trace_ray(ray, &scene.spheres, &settings);
    assert!(color.x > 0.0);
    assert_eq!((color.y, color.z, color.w), (0.0, 0.0, 1.0));

    let frame = Frame {
        camera,
        time: Time::from_millis(123.0),
        spheres: &scene.spheres,
    };
    let jittered = shade_pixel(Vector2::new(0.5, 0.5), &frame, &TraceSettings::default());
    assert!(jittered.x > 0.0);
    assert!((jittered.x - color.x).abs() < 0.05);
}

#[test]
fn same_frame_renders_identically() {
    let scene = Scene::showcase();
    let camera = Camera::new(20, 10).unwrap();
    let frame = Frame {
        camera,
        time: Time::from_millis(42.0),
        spheres: &scene.spheres,
    };

    let mut first = prism::Prism::new(20, 10);
    let mut second = prism::Prism::new(20, 10);
    first.render(&frame).unwrap();
    second.render(&frame).unwrap();
    assert_eq!(first.final_image_data, second.final_image_data);
}

#[test]
fn renders_preset_to_png() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("showcase.png");
    let config = config(output.to_str().unwrap(), "showcase");

    let prism = render(&config).unwrap();
    assert_eq!(prism.accumulated_frames(), 2);

    let saved = Image::from_path(&output, None).unwrap();
    assert_eq!(saved.size(), (24, 16));
    assert_eq!(saved.as_raw(), prism.final_image.as_raw());
}

#[test]
fn renders_scene_files() {
    let dir = tempfile::tempdir().unwrap();
    let scene = Scene::new(vec![Sphere::new(
        Vector3::new(0.0, 0.0, 0.5),
        1.0,
        Vector4::new(0.0, 0.0, 1.0, 1.0),
    )]);

    let json_path = dir.path().join("scene.json");
    std::fs::write(&json_path, scene.to_json().unwrap()).unwrap();
    let bin_path = dir.path().join("scene.bin");
    std::fs::write(&bin_path, scene.to_buffer_bytes()).unwrap();

    assert_eq!(Scene::load(json_path.to_str().unwrap(), 0).unwrap(), scene);
    assert_eq!(Scene::load(bin_path.to_str().unwrap(), 0).unwrap(), scene);

    let output = dir.path().join("from_bin.jpg");
    let prism = render(&config(output.to_str().unwrap(), bin_path.to_str().unwrap())).unwrap();
    assert!(output.exists());

    // Blue sphere straight ahead: the center pixel has blue and nothing else.
    let [r, g, b, a] = prism.final_image.pixel(12, 8);
    assert_eq!((r, g, a), (0, 0, 255));
    assert!(b > 0);
}

#[test]
fn rejects_bad_config_before_rendering() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("never.png");

    let mut zero = config(output.to_str().unwrap(), "single");
    zero.height = 0;
    assert!(render(&zero).is_err());

    let unknown = config(output.to_str().unwrap(), "teapot");
    assert!(matches!(render(&unknown), Err(prism::Error::UnknownPreset(_))));
    assert!(!output.exists());
}
