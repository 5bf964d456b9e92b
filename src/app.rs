//! Glue shared by the interactive and headless front ends.

use anyhow::{Context, Result};
use glam::Vec3;

use crate::input::{InputState, KeyBindings, KeyCode, NamedKey};
use crate::probe::probe_object;
use crate::scene::{ObjectRole, Scene};

/// Parses the keys held during a headless run. Either a run of single-key
/// characters (`WA`) or comma-separated key names (`W,ArrowUp`).
pub fn parse_held_keys(keys: &str) -> Result<Vec<KeyCode>> {
    if keys.contains(',') {
        keys.split(',')
            .filter(|name| !name.trim().is_empty())
            .map(KeyBindings::parse_key)
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("invalid key list `{keys}`"))
    } else {
        keys.chars()
            .filter(|ch| !ch.is_whitespace())
            .map(|ch| KeyBindings::parse_key(&ch.to_string()))
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("invalid key list `{keys}`"))
    }
}

/// Advances the scene `frames` times with whatever `input` currently holds.
pub fn simulate(scene: &mut Scene, input: &InputState, frames: u32) {
    for _ in 0..frames {
        let controls = input.controls(&scene.bindings);
        scene.step(&controls);
    }
}

pub fn describe_role(role: ObjectRole) -> String {
    match role {
        ObjectRole::Letter(ch) => format!("letter {ch:?}"),
        ObjectRole::Digit(ch) => format!("digit {ch:?}"),
        ObjectRole::GlowCube => "cube".to_string(),
    }
}

pub fn format_vec3(value: Vec3) -> String {
    format!("({:.2}, {:.2}, {:.2})", value.x, value.y, value.z)
}

pub fn print_scene_summary(scene: &Scene, ambient_intensity: f32) {
    println!(
        "Loaded scene with {} objects (ambient intensity {:.3})",
        scene.objects.len(),
        ambient_intensity
    );
    for object in &scene.objects {
        println!(
            " - {} ({}) at {}, {} triangles",
            describe_role(object.role),
            object.material.label(),
            format_vec3(object.position),
            object.mesh.triangle_count()
        );
    }
}

pub fn print_final_state(scene: &Scene) {
    let animation = &scene.animation;
    println!(
        "Final state after {} frame(s): time={:.3}",
        animation.frame, animation.time
    );
    println!(
        " - cube pos={} rot=({:.3}, {:.3}, {:.3})",
        format_vec3(animation.cube_position),
        animation.cube_rotation.x,
        animation.cube_rotation.y,
        animation.cube_rotation.z
    );
    println!(" - camera pos={}", format_vec3(animation.camera_position));
    println!(" - light pos={}", format_vec3(animation.light_position));

    let frame = scene.frame_inputs();
    println!("Shading probe:");
    for object in &scene.objects {
        let report = probe_object(object, &frame);
        println!(
            " - {} samples={} mean={} max={}",
            object.name,
            report.samples,
            format_vec3(report.mean),
            format_vec3(report.max)
        );
    }
}

pub fn map_keycode(code: winit::keyboard::KeyCode) -> Option<KeyCode> {
    use winit::keyboard::KeyCode as Key;
    Some(match code {
        Key::Space => KeyCode::Named(NamedKey::Space),
        Key::Enter => KeyCode::Named(NamedKey::Enter),
        Key::Tab => KeyCode::Named(NamedKey::Tab),
        Key::ArrowLeft => KeyCode::Named(NamedKey::Left),
        Key::ArrowRight => KeyCode::Named(NamedKey::Right),
        Key::ArrowUp => KeyCode::Named(NamedKey::Up),
        Key::ArrowDown => KeyCode::Named(NamedKey::Down),
        Key::Escape => KeyCode::Named(NamedKey::Escape),
        Key::Backspace => KeyCode::Named(NamedKey::Backspace),
        Key::ShiftLeft => KeyCode::Named(NamedKey::LeftShift),
        Key::ShiftRight => KeyCode::Named(NamedKey::RightShift),
        Key::Digit0 => KeyCode::Digit(0),
        Key::Digit1 => KeyCode::Digit(1),
        Key::Digit2 => KeyCode::Digit(2),
        Key::Digit3 => KeyCode::Digit(3),
        Key::Digit4 => KeyCode::Digit(4),
        Key::Digit5 => KeyCode::Digit(5),
        Key::Digit6 => KeyCode::Digit(6),
        Key::Digit7 => KeyCode::Digit(7),
        Key::Digit8 => KeyCode::Digit(8),
        Key::Digit9 => KeyCode::Digit(9),
        Key::KeyA => KeyCode::Character('A'),
        Key::KeyB => KeyCode::Character('B'),
        Key::KeyC => KeyCode::Character('C'),
        Key::KeyD => KeyCode::Character('D'),
        Key::KeyE => KeyCode::Character('E'),
        Key::KeyF => KeyCode::Character('F'),
        Key::KeyG => KeyCode::Character('G'),
        Key::KeyH => KeyCode::Character('H'),
        Key::KeyI => KeyCode::Character('I'),
        Key::KeyJ => KeyCode::Character('J'),
        Key::KeyK => KeyCode::Character('K'),
        Key::KeyL => KeyCode::Character('L'),
        Key::KeyM => KeyCode::Character('M'),
        Key::KeyN => KeyCode::Character('N'),
        Key::KeyO => KeyCode::Character('O'),
        Key::KeyP => KeyCode::Character('P'),
        Key::KeyQ => KeyCode::Character('Q'),
        Key::KeyR => KeyCode::Character('R'),
        Key::KeyS => KeyCode::Character('S'),
        Key::KeyT => KeyCode::Character('T'),
        Key::KeyU => KeyCode::Character('U'),
        Key::KeyV => KeyCode::Character('V'),
        Key::KeyW => KeyCode::Character('W'),
        Key::KeyX => KeyCode::Character('X'),
        Key::KeyY => KeyCode::Character('Y'),
        Key::KeyZ => KeyCode::Character('Z'),
        Key::F1 => KeyCode::Function(1),
        Key::F2 => KeyCode::Function(2),
        Key::F3 => KeyCode::Function(3),
        Key::F4 => KeyCode::Function(4),
        Key::F5 => KeyCode::Function(5),
        Key::F6 => KeyCode::Function(6),
        Key::F7 => KeyCode::Function(7),
        Key::F8 => KeyCode::Function(8),
        Key::F9 => KeyCode::Function(9),
        Key::F10 => KeyCode::Function(10),
        Key::F11 => KeyCode::Function(11),
        Key::F12 => KeyCode::Function(12),
        _ => return None,
    })
}
