//! Built-in demo scenes.
//!
//! Scenes are built in code. Lengths in the Cornell box are given in the
//! box's 300-unit half-width and scaled down so the box spans [-1, 1].

use lux_math::{Camera, Color, EulerRot, Quat, Vec3};

use crate::mesh::Mesh;
use crate::scene::{Material, PointLight, Scene, Shape, Transform};

/// Name of the light evaluated when only one light is enabled.
pub const MAIN_LIGHT: &str = "main_light";

const UNIT: f32 = 1.0 / 300.0;

fn units(x: f32, y: f32, z: f32) -> Vec3 {
    Vec3::new(x, y, z) * UNIT
}

fn placed(translation: Vec3, euler_xyz: (f32, f32, f32), scale: Vec3) -> Transform {
    let (x, y, z) = euler_xyz;
    Transform::from_translation(translation)
        .with_rotation(Quat::from_euler(EulerRot::XYZ, x, y, z))
        .with_scale(scale)
}

/// A five-walled box with two small spheres, two mirror cubes and a mirror
/// back wall, lit by three colored point lights.
///
/// The camera sits in front of the open side looking down -Z.
pub fn cornell_box(aspect: f32) -> (Scene, Camera) {
    let mut scene = Scene::new("cornell_box");

    let glossy = |hex: u32| Material::from_hex(hex).with_specular(Color::splat(0xaa as f32 / 255.0), 150.0);
    let red = glossy(0xff0000);
    let green = glossy(0x00ff00);
    let blue = glossy(0x0000ff);
    let top = Material::from_hex(0xffffff).with_specular(Color::splat(0x11 as f32 / 255.0), 100.0);
    let ground = Material::from_hex(0x666666).with_specular(Color::splat(0x11 as f32 / 255.0), 100.0);
    let back_mirror = Material::from_hex(0xffaa00)
        .with_specular(Color::ONE, 10000.0)
        .with_mirror(0.8);
    let red_mirror = red.clone().with_mirror(0.8);
    let blue_mirror = blue.clone().with_mirror(0.8);

    let sphere_radius = 50.0 * UNIT;
    let cube = 100.0 * UNIT;
    let wall = 602.0 * UNIT;
    let squashed = Vec3::new(1.0, 0.6, 1.0);
    let quarter_turn = 1.57;

    scene.add_primitive(
        "red_sphere",
        Shape::sphere(sphere_radius),
        red.clone(),
        Transform::from_translation(units(-50.0, -245.0, -50.0)),
    );
    scene.add_primitive(
        "green_sphere",
        Shape::sphere(sphere_radius),
        green,
        Transform::from_translation(units(-175.0, -150.0, -150.0)),
    );
    scene.add_primitive(
        "blue_cube",
        Shape::mesh(Mesh::cuboid(cube, cube, cube)),
        blue_mirror,
        placed(units(75.0, -245.0, -75.0), (0.0, -0.5, 0.0), Vec3::ONE),
    );
    scene.add_primitive(
        "red_cube",
        Shape::mesh(Mesh::cuboid(cube, cube, cube)),
        red_mirror,
        placed(units(-175.0, -247.5, -150.0), (0.0, 0.25, 0.0), Vec3::ONE),
    );

    scene.add_primitive(
        "floor",
        Shape::mesh(Mesh::plane(wall, wall)),
        ground,
        placed(units(0.0, -300.0, -150.0), (-quarter_turn, 0.0, 0.0), squashed),
    );
    scene.add_primitive(
        "ceiling",
        Shape::mesh(Mesh::plane(wall, wall)),
        top,
        placed(units(0.0, 300.0, -150.0), (quarter_turn, 0.0, 0.0), squashed),
    );
    scene.add_primitive(
        "back_wall",
        Shape::mesh(Mesh::plane(wall, wall)),
        back_mirror,
        Transform::from_translation(units(0.0, 0.0, -300.0)),
    );
    scene.add_primitive(
        "left_wall",
        Shape::mesh(Mesh::plane(wall, wall)),
        red,
        placed(
            units(-300.0, 0.0, -150.0),
            (0.0, quarter_turn, quarter_turn),
            squashed,
        ),
    );
    scene.add_primitive(
        "right_wall",
        Shape::mesh(Mesh::plane(wall, wall)),
        blue,
        placed(
            units(300.0, 0.0, -150.0),
            (0.0, -quarter_turn, quarter_turn),
            squashed,
        ),
    );

    let base_intensity = 0.2;
    scene.add_light(PointLight::new(
        "magenta",
        Vec3::new(1.0, 0.8, 0.5),
        Color::new(1.0, 0.0, 1.0),
        base_intensity * 2.0,
    ));
    scene.add_light(PointLight::new(
        "cyan",
        units(-200.0, 100.0, 100.0),
        Color::new(0.0, 1.0, 1.0),
        base_intensity * 2.5,
    ));
    scene.add_light(PointLight::new(
        MAIN_LIGHT,
        units(200.0, -150.0, 100.0),
        Color::new(1.0, 0.0, 0.0),
        base_intensity,
    ));

    let camera = Camera::new(units(0.0, 0.0, 540.0), Vec3::ZERO, aspect)
        .with_fov_degrees(60.0)
        .with_clip(0.001, 1000.0);

    (scene, camera)
}

/// A single red unit sphere five units in front of the camera, lit by one
/// white light up and to the right.
pub fn red_sphere(aspect: f32) -> (Scene, Camera) {
    let mut scene = Scene::new("red_sphere");

    scene.add_primitive(
        "sphere",
        Shape::sphere(1.0),
        Material::new(Color::new(1.0, 0.0, 0.0)).with_specular(Color::splat(0.5), 50.0),
        Transform::from_translation(Vec3::new(0.0, 0.0, -5.0)),
    );
    scene.add_light(PointLight::new(
        MAIN_LIGHT,
        Vec3::new(5.0, 5.0, 5.0),
        Color::ONE,
        25.0,
    ));

    let camera = Camera::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), aspect)
        .with_fov_degrees(60.0)
        .with_clip(0.001, 1000.0);

    (scene, camera)
}
