//! Turning single characters into extruded 3D meshes.
//!
//! [`GlyphMesher`] is the seam to whatever font source the scene uses. Two
//! implementations ship with the crate: [`BlockFont`], a built-in 5x7 block
//! font that needs no assets, and [`ObjGlyphLibrary`], which reads one OBJ
//! mesh per character from a directory.

use std::fs;
use std::path::PathBuf;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mesh::Mesh;

/// Errors reported by glyph sources. Any of them aborts scene population.
#[derive(Debug, Error)]
pub enum GlyphError {
    #[error("character {0:?} has no glyph in this font")]
    Unsupported(char),
    #[error("glyph file {} does not exist", .0.display())]
    Missing(PathBuf),
    #[error("failed to read glyph file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("glyph file {} is not a valid mesh: {message}", .path.display())]
    Malformed { path: PathBuf, message: String },
}

/// Bevel applied around the extruded outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bevel {
    /// Depth added to the front and back faces.
    pub thickness: f32,
    /// Distance the outline grows outward.
    pub size: f32,
    /// Extra outward offset of the outline before the bevel starts.
    pub offset: f32,
}

impl Default for Bevel {
    fn default() -> Self {
        Self {
            thickness: 0.5,
            size: 0.3,
            offset: 0.0,
        }
    }
}

/// Size and extrusion controls for a glyph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Cap height in world units.
    pub size: f32,
    /// Extrusion depth along +Z.
    pub height: f32,
    pub bevel: Option<Bevel>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 5.0,
            height: 1.0,
            bevel: Some(Bevel::default()),
        }
    }
}

/// Produces a mesh approximating a single character.
pub trait GlyphMesher {
    fn mesh_glyph(&self, ch: char, style: &TextStyle) -> Result<Mesh, GlyphError>;
}

impl<T> GlyphMesher for &T
where
    T: GlyphMesher + ?Sized,
{
    fn mesh_glyph(&self, ch: char, style: &TextStyle) -> Result<Mesh, GlyphError> {
        (**self).mesh_glyph(ch, style)
    }
}

pub const BLOCK_COLUMNS: usize = 5;
pub const BLOCK_ROWS: usize = 7;

/// Built-in block font. Every lit cell of a 5x7 bitmap becomes a box; the
/// glyph's origin is its bottom-left corner on the front of the extrusion's
/// back face (z = 0).
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockFont;

impl BlockFont {
    /// Returns the bitmap rows for a character, top row first. Bit 4 is the
    /// leftmost column. Lowercase letters share the uppercase shapes.
    pub fn bitmap(ch: char) -> Option<[u8; BLOCK_ROWS]> {
        let rows = match ch.to_ascii_uppercase() {
            '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
            '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
            '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
            '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
            '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
            '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
            '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
            '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
            '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
            '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
            'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
            'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
            'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
            'D' => [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100],
            'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
            'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
            'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
            'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
            'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
            'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
            'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
            'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
            'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
            'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
            'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
            'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
            'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
            'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
            'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
            'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
            'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
            'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
            'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
            'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
            'Y' => [0b10001, 0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100],
            'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
            _ => return None,
        };
        Some(rows)
    }
}

impl GlyphMesher for BlockFont {
    fn mesh_glyph(&self, ch: char, style: &TextStyle) -> Result<Mesh, GlyphError> {
        let rows = Self::bitmap(ch).ok_or(GlyphError::Unsupported(ch))?;
        let cell = style.size / BLOCK_ROWS as f32;
        let (grow, thickness) = style
            .bevel
            .map(|bevel| (bevel.size + bevel.offset, bevel.thickness))
            .unwrap_or((0.0, 0.0));

        let mut mesh = Mesh::default();
        for (row_index, row) in rows.iter().enumerate() {
            let y = (BLOCK_ROWS - 1 - row_index) as f32 * cell;
            for column in 0..BLOCK_COLUMNS {
                if row & (1 << (BLOCK_COLUMNS - 1 - column)) == 0 {
                    continue;
                }
                let x = column as f32 * cell;
                let min = Vec3::new(x - grow, y - grow, -thickness);
                let max = Vec3::new(x + cell + grow, y + cell + grow, style.height + thickness);
                mesh.append(&Mesh::cuboid_between(min, max));
            }
        }
        Ok(mesh)
    }
}

/// Font resource made of one OBJ file per character (`<char>.obj`).
///
/// Glyphs are authored in em units: one unit of x/y becomes `size` world
/// units and one unit of z becomes `height`.
#[derive(Debug, Clone)]
pub struct ObjGlyphLibrary {
    root: PathBuf,
}

impl ObjGlyphLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn glyph_path(&self, ch: char) -> PathBuf {
        self.root.join(format!("{ch}.obj"))
    }
}

impl GlyphMesher for ObjGlyphLibrary {
    fn mesh_glyph(&self, ch: char, style: &TextStyle) -> Result<Mesh, GlyphError> {
        if ch.is_control() || ch == '/' || ch == '\\' || ch == '.' {
            return Err(GlyphError::Unsupported(ch));
        }
        let path = self.glyph_path(ch);
        if !path.is_file() {
            return Err(GlyphError::Missing(path));
        }
        let contents = fs::read_to_string(&path).map_err(|source| GlyphError::Io {
            path: path.clone(),
            source,
        })?;
        let mesh = Mesh::from_obj_str(&contents).map_err(|err| GlyphError::Malformed {
            path: path.clone(),
            message: format!("{err:#}"),
        })?;
        let thickness = style.bevel.map(|bevel| bevel.thickness).unwrap_or(0.0);
        let depth = style.height + 2.0 * thickness;
        Ok(mesh.transformed(
            Vec3::new(style.size, style.size, depth),
            Vec3::new(0.0, 0.0, -thickness),
        ))
    }
}
