use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Vertex layout shared by every mesh: position followed by normal.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.into(),
            normal: normal.into(),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from(self.position)
    }

    pub fn normal(&self) -> Vec3 {
        Vec3::from(self.normal)
    }
}

/// Indexed triangle mesh ready for upload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

/// Outward normal and the four corners of each box face, counter-clockwise
/// when seen from outside. Corners are in unit-cube coordinates.
const BOX_FACES: [(Vec3, [Vec3; 4]); 6] = [
    (
        Vec3::Z,
        [
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(0.0, 1.0, 1.0),
        ],
    ),
    (
        Vec3::NEG_Z,
        [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
        ],
    ),
    (
        Vec3::NEG_X,
        [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 1.0, 1.0),
            Vec3::new(0.0, 1.0, 0.0),
        ],
    ),
    (
        Vec3::X,
        [
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 1.0),
        ],
    ),
    (
        Vec3::NEG_Y,
        [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 1.0),
        ],
    ),
    (
        Vec3::Y,
        [
            Vec3::new(0.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ],
    ),
];

impl Mesh {
    /// Axis-aligned cube of edge `size` centred on the origin.
    pub fn cuboid(size: f32) -> Self {
        let half = Vec3::splat(size * 0.5);
        Self::cuboid_between(-half, half)
    }

    /// Axis-aligned box spanning `min..max`, 24 vertices with flat normals.
    pub fn cuboid_between(min: Vec3, max: Vec3) -> Self {
        let extent = max - min;
        let mut mesh = Self::default();
        for (normal, corners) in BOX_FACES {
            let base = mesh.vertices.len() as u32;
            for corner in corners {
                mesh.vertices.push(Vertex::new(min + corner * extent, normal));
            }
            mesh.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        mesh
    }

    /// Appends another mesh, rebasing its indices.
    pub fn append(&mut self, other: &Mesh) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|index| index + base));
    }

    /// Applies a per-axis scale followed by a translation.
    pub fn transformed(&self, scale: Vec3, offset: Vec3) -> Self {
        let vertices = self
            .vertices
            .iter()
            .map(|vertex| {
                // Non-uniform scale bends normals by the inverse scale.
                let normal = (vertex.normal() / scale).normalize_or_zero();
                Vertex::new(vertex.position() * scale + offset, normal)
            })
            .collect();
        Self {
            vertices,
            indices: self.indices.clone(),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns the axis-aligned bounds, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = self.vertices.first()?.position();
        Some(
            self.vertices
                .iter()
                .fold((first, first), |(min, max), vertex| {
                    (min.min(vertex.position()), max.max(vertex.position()))
                }),
        )
    }

    /// Parses a Wavefront OBJ document. Polygons are fan-triangulated and
    /// missing normals are computed from the faces.
    pub fn from_obj_str(data: &str) -> Result<Self> {
        let mut positions = Vec::new();
        let mut normals = Vec::new();
        let mut faces: Vec<[FaceIndex; 3]> = Vec::new();

        for (line_no, line) in data.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let mut parts = trimmed.split_whitespace();
            let Some(tag) = parts.next() else {
                continue;
            };
            match tag {
                "v" => positions.push(
                    parse_vec3(parts)
                        .with_context(|| format!("invalid vertex on line {}", line_no + 1))?,
                ),
                "vn" => normals.push(
                    parse_vec3(parts)
                        .with_context(|| format!("invalid normal on line {}", line_no + 1))?,
                ),
                "f" => {
                    let polygon = parse_face(parts)
                        .with_context(|| format!("invalid face on line {}", line_no + 1))?;
                    for i in 1..(polygon.len() - 1) {
                        faces.push([polygon[0], polygon[i], polygon[i + 1]]);
                    }
                }
                _ => {}
            }
        }

        if positions.is_empty() {
            return Err(anyhow!("OBJ document does not define any vertices"));
        }

        let mut mesh = build_mesh(&positions, &normals, &faces)?;
        if mesh
            .vertices
            .iter()
            .any(|vertex| vertex.normal() == Vec3::ZERO)
        {
            compute_normals(&mut mesh);
        }
        Ok(mesh)
    }
}

fn parse_vec3<'a>(mut parts: impl Iterator<Item = &'a str>) -> Result<Vec3> {
    let mut next = || -> Result<f32> {
        Ok(parts
            .next()
            .ok_or_else(|| anyhow!("missing vector component"))?
            .parse::<f32>()?)
    };
    Ok(Vec3::new(next()?, next()?, next()?))
}

#[derive(Debug, Clone, Copy)]
struct FaceIndex {
    v: i32,
    vn: i32,
}

fn parse_face<'a>(parts: impl Iterator<Item = &'a str>) -> Result<Vec<FaceIndex>> {
    let mut indices = Vec::new();
    for part in parts {
        let mut segments = part.split('/');
        let v = segments
            .next()
            .ok_or_else(|| anyhow!("missing vertex index"))?
            .parse::<i32>()?;
        let _texcoord = segments.next();
        let vn = match segments.next() {
            Some(s) if !s.is_empty() => s.parse::<i32>()?,
            _ => 0,
        };
        indices.push(FaceIndex { v, vn });
    }
    if indices.len() < 3 {
        return Err(anyhow!("faces must reference at least 3 vertices"));
    }
    Ok(indices)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Key {
    position: usize,
    normal: Option<usize>,
}

fn build_mesh(positions: &[Vec3], normals: &[Vec3], faces: &[[FaceIndex; 3]]) -> Result<Mesh> {
    let mut lookup: HashMap<Key, u32> = HashMap::new();
    let mut mesh = Mesh::default();

    for face in faces {
        for idx in face {
            let position = fix_index(idx.v, positions.len())
                .ok_or_else(|| anyhow!("vertex index {} is out of range", idx.v))?;
            let normal = fix_index(idx.vn, normals.len());
            let key = Key { position, normal };
            let next_index = mesh.vertices.len() as u32;
            let entry = *lookup.entry(key).or_insert_with(|| {
                let normal = normal.map(|i| normals[i]).unwrap_or(Vec3::ZERO);
                mesh.vertices.push(Vertex::new(positions[position], normal));
                next_index
            });
            mesh.indices.push(entry);
        }
    }

    Ok(mesh)
}

/// Converts a one-based (or negative, end-relative) OBJ index.
fn fix_index(index: i32, len: usize) -> Option<usize> {
    if index > 0 {
        let zero_based = index as usize - 1;
        (zero_based < len).then_some(zero_based)
    } else if index < 0 {
        let back = index.unsigned_abs() as usize;
        (back <= len).then(|| len - back)
    } else {
        None
    }
}

fn compute_normals(mesh: &mut Mesh) {
    let mut accum = vec![Vec3::ZERO; mesh.vertices.len()];

    for triangle in mesh.indices.chunks_exact(3) {
        let [i0, i1, i2] = [
            triangle[0] as usize,
            triangle[1] as usize,
            triangle[2] as usize,
        ];
        let p0 = mesh.vertices[i0].position();
        let p1 = mesh.vertices[i1].position();
        let p2 = mesh.vertices[i2].position();
        let normal = (p1 - p0).cross(p2 - p0);
        if normal.length_squared() > f32::EPSILON {
            let normal = normal.normalize();
            accum[i0] += normal;
            accum[i1] += normal;
            accum[i2] += normal;
        }
    }

    for (vertex, normal) in mesh.vertices.iter_mut().zip(accum) {
        if vertex.normal() == Vec3::ZERO {
            vertex.normal = normal.normalize_or_zero().into();
        }
    }
}
