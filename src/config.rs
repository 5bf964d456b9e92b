use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use glam::Vec3;
use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};

use crate::animation::FrameSteps;
use crate::camera::PerspectiveCamera;
use crate::glyph::{Bevel, TextStyle};
use crate::input::KeyBindings;
use crate::material::Glow;

/// Placement and colour of one extruded character.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlyphPlacement {
    pub color: Vec3,
    pub position: Vec3,
}

/// The glowing cube at the centre of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubeConfig {
    pub size: f32,
    pub position: Vec3,
    pub glow: Glow,
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            size: 3.0,
            position: Vec3::ZERO,
            glow: Glow::default(),
        }
    }
}

/// Everything needed to populate a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Name whose last character becomes the letter glyph.
    pub name: String,
    /// Identifier whose last digit becomes the digit glyph and whose last
    /// three digits set the ambient intensity.
    pub student_id: String,
    /// Directory of OBJ glyphs; the built-in block font is used when absent.
    pub font: Option<PathBuf>,
    pub text: TextStyle,
    pub letter: GlyphPlacement,
    pub digit: GlyphPlacement,
    pub cube: CubeConfig,
    pub camera: PerspectiveCamera,
    pub controls: KeyBindings,
    pub frame: FrameSteps,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            name: "DaniS".to_string(),
            student_id: "5025221239".to_string(),
            font: None,
            text: TextStyle::default(),
            letter: GlyphPlacement {
                color: hex_color(0x0e0e0e),
                position: Vec3::new(-10.0, 0.0, 0.0),
            },
            digit: GlyphPlacement {
                color: hex_color(0xf1f1f1),
                position: Vec3::new(10.0, 0.0, 0.0),
            },
            cube: CubeConfig::default(),
            camera: PerspectiveCamera::default(),
            controls: KeyBindings::default(),
            frame: FrameSteps::default(),
        }
    }
}

/// Converts a packed `0xRRGGBB` value into a colour with unit channels.
pub fn hex_color(value: u32) -> Vec3 {
    Vec3::new(
        ((value >> 16) & 0xff) as f32 / 255.0,
        ((value >> 8) & 0xff) as f32 / 255.0,
        (value & 0xff) as f32 / 255.0,
    )
}

impl SceneConfig {
    /// Reads a scene file. A relative `<font>` path is resolved against the
    /// file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let xml = fs::read_to_string(path)
            .with_context(|| format!("unable to read scene file {}", path.display()))?;
        let mut config = Self::from_xml(&xml)
            .with_context(|| format!("invalid scene file {}", path.display()))?;
        if let (Some(font), Some(parent)) = (config.font.as_mut(), path.parent()) {
            if font.is_relative() {
                *font = parent.join(&*font);
            }
        }
        Ok(config)
    }

    /// Parses the scene XML. Every element is optional and falls back to the
    /// default scene.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let document = Document::parse(xml).context("invalid scene XML")?;
        let root = document.root_element();
        if !root.has_tag_name("scene") {
            bail!("expected <scene> root element, found <{}>", root.tag_name().name());
        }

        let mut config = Self::default();
        // A present but blank element overrides the default so validation sees it.
        if let Some(name) = element_text(&root, "name") {
            config.name = name;
        }
        if let Some(id) = element_text(&root, "student-id") {
            config.student_id = id;
        }
        config.font = optional_text(&root, "font").map(PathBuf::from);

        if let Some(text) = child(&root, "text") {
            let style = &mut config.text;
            style.size = parse_f32(optional_text(&text, "size"), style.size)?;
            style.height = parse_f32(optional_text(&text, "height"), style.height)?;
            style.bevel = parse_bevel(optional_text(&text, "bevel"), style.bevel)?;
        }
        if let Some(letter) = child(&root, "letter") {
            config.letter = parse_placement(&letter, config.letter)?;
        }
        if let Some(digit) = child(&root, "digit") {
            config.digit = parse_placement(&digit, config.digit)?;
        }
        if let Some(cube) = child(&root, "cube") {
            let target = &mut config.cube;
            target.size = parse_f32(optional_text(&cube, "size"), target.size)?;
            target.position = parse_vec3(optional_text(&cube, "position"), target.position)?;
            let glow = &mut target.glow;
            glow.glow_color = parse_color(optional_text(&cube, "color"), glow.glow_color)?;
            glow.ambient_light = parse_f32(optional_text(&cube, "ambient"), glow.ambient_light)?;
            glow.metalness = parse_f32(optional_text(&cube, "metalness"), glow.metalness)?;
            glow.roughness = parse_f32(optional_text(&cube, "roughness"), glow.roughness)?;
        }
        if let Some(camera) = child(&root, "camera") {
            let target = &mut config.camera;
            target.fov_degrees = parse_f32(optional_text(&camera, "fov"), target.fov_degrees)?;
            target.position = parse_vec3(optional_text(&camera, "position"), target.position)?;
            target.near = parse_f32(optional_text(&camera, "near"), target.near)?;
            target.far = parse_f32(optional_text(&camera, "far"), target.far)?;
        }
        if let Some(controls) = child(&root, "controls") {
            let bindings = &mut config.controls;
            for (tag, slot) in [
                ("cube-up", &mut bindings.cube_up),
                ("cube-down", &mut bindings.cube_down),
                ("camera-left", &mut bindings.camera_left),
                ("camera-right", &mut bindings.camera_right),
            ] {
                if let Some(name) = optional_text(&controls, tag) {
                    *slot = KeyBindings::parse_key(&name)
                        .with_context(|| format!("invalid <{tag}> binding"))?;
                }
            }
        }
        if let Some(frame) = child(&root, "frame") {
            let steps = &mut config.frame;
            steps.time_step = parse_f32(optional_text(&frame, "time-step"), steps.time_step)?;
            steps.rotation_step =
                parse_f32(optional_text(&frame, "rotation-step"), steps.rotation_step)?;
            steps.move_step = parse_f32(optional_text(&frame, "move-step"), steps.move_step)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("<name> must not be empty");
        }
        if self.student_id.is_empty() || !self.student_id.chars().all(|c| c.is_ascii_digit()) {
            bail!(
                "<student-id> must be a non-empty string of digits, got `{}`",
                self.student_id
            );
        }
        if self.text.size <= 0.0 || self.text.height <= 0.0 {
            bail!("text size and height must be positive");
        }
        if self.cube.size <= 0.0 {
            bail!("cube size must be positive");
        }
        if !(0.0..=1.0).contains(&self.cube.glow.metalness)
            || !(0.0..=1.0).contains(&self.cube.glow.roughness)
        {
            bail!("cube metalness and roughness must lie in [0, 1]");
        }
        let camera = &self.camera;
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            bail!("camera fov must lie in (0, 180) degrees");
        }
        if !(camera.near > 0.0 && camera.far > camera.near) {
            bail!("camera clip planes must satisfy 0 < near < far");
        }
        Ok(())
    }

    /// Last character of the name, rendered with the plastic material.
    pub fn letter_char(&self) -> char {
        self.name.trim().chars().last().unwrap_or('?')
    }

    /// Last digit of the identifier, rendered with the metal material.
    pub fn digit_char(&self) -> char {
        self.student_id.chars().last().unwrap_or('0')
    }

    /// `(last three digits + 200) / 1000`, shared by both text materials.
    pub fn ambient_intensity(&self) -> f32 {
        let mut digits: Vec<char> = self.student_id.chars().rev().take(3).collect();
        digits.reverse();
        let value: u32 = digits.into_iter().collect::<String>().parse().unwrap_or(0);
        (value + 200) as f32 / 1000.0
    }
}

fn child<'a, 'input>(node: &Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| child.has_tag_name(tag))
}

fn element_text(node: &Node<'_, '_>, tag: &str) -> Option<String> {
    child(node, tag).map(|child| child.text().unwrap_or_default().trim().to_string())
}

fn optional_text(node: &Node<'_, '_>, tag: &str) -> Option<String> {
    child(node, tag)
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| text.to_string())
}

fn parse_placement(node: &Node<'_, '_>, default: GlyphPlacement) -> Result<GlyphPlacement> {
    Ok(GlyphPlacement {
        color: parse_color(optional_text(node, "color"), default.color)?,
        position: parse_vec3(optional_text(node, "position"), default.position)?,
    })
}

fn parse_components<const N: usize>(value: &str, what: &str) -> Result<[f32; N]> {
    let numbers = value
        .split_whitespace()
        .map(|component| {
            component
                .parse::<f32>()
                .map_err(|err| anyhow!("invalid {what} component `{component}`: {err}"))
        })
        .collect::<Result<Vec<_>>>()?;
    numbers
        .try_into()
        .map_err(|numbers: Vec<f32>| anyhow!("{what} needs {N} components, got {}", numbers.len()))
}

fn parse_vec3(value: Option<String>, default: Vec3) -> Result<Vec3> {
    let Some(value) = value else {
        return Ok(default);
    };
    Ok(Vec3::from_array(parse_components(&value, "vector")?))
}

/// Colours are written as three 0-255 channel values.
fn parse_color(value: Option<String>, default: Vec3) -> Result<Vec3> {
    let Some(value) = value else {
        return Ok(default);
    };
    let [r, g, b] = parse_components(&value, "color")?;
    Ok(Vec3::new(r, g, b) / 255.0)
}

fn parse_f32(value: Option<String>, default: f32) -> Result<f32> {
    match value {
        Some(value) => value
            .parse::<f32>()
            .map_err(|err| anyhow!("failed to parse float `{value}`: {err}")),
        None => Ok(default),
    }
}

fn parse_bevel(value: Option<String>, default: Option<Bevel>) -> Result<Option<Bevel>> {
    match value.as_deref() {
        None => Ok(default),
        Some("none") | Some("off") => Ok(None),
        Some(value) => {
            let [thickness, size, offset] = parse_components(value, "bevel")?;
            Ok(Some(Bevel {
                thickness,
                size,
                offset,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KeyCode, NamedKey};

    #[test]
    fn defaults_reproduce_the_reference_scene() {
        let config = SceneConfig::from_xml("<scene/>").unwrap();
        assert_eq!(config, SceneConfig::default());
        assert_eq!(config.letter_char(), 'S');
        assert_eq!(config.digit_char(), '9');
        assert!((config.ambient_intensity() - 0.439).abs() < 1e-6);
        assert_eq!(config.camera.position, Vec3::new(0.0, 0.0, 30.0));
        assert_eq!(config.letter.color, Vec3::splat(14.0 / 255.0));
    }

    #[test]
    fn parses_every_section() {
        let xml = r#"
        <scene>
            <name>Ada</name>
            <student-id>42</student-id>
            <font>glyphs</font>
            <text><size>4</size><height>2</height><bevel>none</bevel></text>
            <letter><color>255 0 0</color><position>-8 1 0</position></letter>
            <digit><position>8 1 0</position></digit>
            <cube><size>2</size><color>0 255 0</color><ambient>0.25</ambient>
                  <metalness>0.5</metalness><roughness>0.2</roughness></cube>
            <camera><fov>60</fov><position>0 2 20</position></camera>
            <controls><cube-up>ArrowUp</cube-up><camera-left>j</camera-left></controls>
            <frame><time-step>0.02</time-step></frame>
        </scene>"#;
        let config = SceneConfig::from_xml(xml).unwrap();
        assert_eq!(config.letter_char(), 'a');
        assert_eq!(config.digit_char(), '2');
        assert!((config.ambient_intensity() - 0.242).abs() < 1e-6);
        assert_eq!(config.font, Some(PathBuf::from("glyphs")));
        assert_eq!(config.text.bevel, None);
        assert_eq!(config.letter.color, Vec3::X);
        assert_eq!(config.digit.color, SceneConfig::default().digit.color);
        assert_eq!(config.cube.glow.glow_color, Vec3::Y);
        assert_eq!(config.cube.glow.metalness, 0.5);
        assert_eq!(config.camera.fov_degrees, 60.0);
        assert_eq!(config.controls.cube_up, KeyCode::Named(NamedKey::Up));
        assert_eq!(config.controls.camera_left, KeyCode::Character('J'));
        assert_eq!(config.controls.cube_down, KeyCode::Character('S'));
        assert_eq!(config.frame.time_step, 0.02);
        assert_eq!(config.frame.move_step, 0.1);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(SceneConfig::from_xml("<scene><student-id>12a</student-id></scene>").is_err());
        assert!(SceneConfig::from_xml("<scene><name> </name></scene>").is_err());
        assert!(SceneConfig::from_xml("<scene><name/></scene>").is_err());
        assert!(SceneConfig::from_xml("<scene><student-id>  </student-id></scene>").is_err());
        assert!(SceneConfig::from_xml("<scene><student-id></student-id></scene>").is_err());
        assert!(SceneConfig::from_xml("<scene><cube><size>-1</size></cube></scene>").is_err());
        assert!(SceneConfig::from_xml("<scene><camera><fov>wide</fov></camera></scene>").is_err());
        assert!(
            SceneConfig::from_xml("<scene><letter><color>1 2</color></letter></scene>").is_err()
        );
        assert!(SceneConfig::from_xml(
            "<scene><controls><cube-up>Hyper</cube-up></controls></scene>"
        )
        .is_err());
        assert!(SceneConfig::from_xml("<world/>").is_err());
        assert!(SceneConfig::from_xml("<scene>").is_err());
    }

    #[test]
    fn ambient_intensity_uses_last_three_characters() {
        let mut config = SceneConfig::default();
        config.student_id = "42".to_string();
        assert!((config.ambient_intensity() - 0.242).abs() < 1e-6);
        // Unvalidated ids must not panic on multi-byte characters.
        config.student_id = "€1".to_string();
        assert!((config.ambient_intensity() - 0.2).abs() < 1e-6);
        config.student_id = "x€99".to_string();
        assert!((config.ambient_intensity() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn bevel_triplet_is_parsed() {
        let config =
            SceneConfig::from_xml("<scene><text><bevel>0.2 0.1 0.05</bevel></text></scene>")
                .unwrap();
        assert_eq!(
            config.text.bevel,
            Some(Bevel {
                thickness: 0.2,
                size: 0.1,
                offset: 0.05
            })
        );
    }

    #[test]
    fn load_resolves_font_relative_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.xml");
        fs::write(&path, "<scene><font>fonts/block</font></scene>").unwrap();
        let config = SceneConfig::load(&path).unwrap();
        assert_eq!(config.font, Some(dir.path().join("fonts/block")));
        assert!(SceneConfig::load(dir.path().join("missing.xml")).is_err());
    }
}
