use anyhow::{bail, Context, Result};
use glam::{Vec3, Vec4};
use log::{info, warn};
use std::path::{Path, PathBuf};

use crate::types::{Material, MeshVertex};

/// CPU-side mesh ready for GPU upload
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
    pub material: Material,
    /// Diffuse and normal maps named by the MTL file, resolved against the OBJ directory
    pub diffuse_texture: Option<PathBuf>,
    pub normal_texture: Option<PathBuf>,
}

impl MeshData {
    pub fn triangle_count(&self) -> u32 {
        (self.indices.len() / 3) as u32
    }

    /// Replace vertex normals with the average of adjacent face normals
    pub fn compute_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.vertices.len()];

        for triangle in self.indices.chunks_exact(3) {
            let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
            let pa = Vec3::from_array(self.vertices[a].position);
            let pb = Vec3::from_array(self.vertices[b].position);
            let pc = Vec3::from_array(self.vertices[c].position);
            let face = (pb - pa).cross(pc - pb);

            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }

        for (vertex, normal) in self.vertices.iter_mut().zip(normals) {
            vertex.normal = normal.normalize_or_zero().to_array();
        }
    }

    /// Center on the origin and scale the bounding-box diagonal to 2
    pub fn standardize(&mut self) {
        let positions: Vec<Vec3> = self
            .vertices
            .iter()
            .map(|v| Vec3::from_array(v.position))
            .collect();
        let (min, max) = compute_mesh_bounds(&positions);
        let diagonal = (max - min).length();
        if diagonal <= f32::EPSILON {
            return;
        }

        let center = (min + max) * 0.5;
        let scaling = 2.0 / diagonal;
        for vertex in &mut self.vertices {
            let p = (Vec3::from_array(vertex.position) - center) * scaling;
            vertex.position = p.to_array();
        }
    }
}

/// Loads an OBJ file (all shapes merged) and standardizes it
pub fn load_obj_file(path: impl AsRef<Path>) -> Result<MeshData> {
    let path = path.as_ref();
    info!("Loading OBJ file: {:?}", path);

    let options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    };
    let (models, materials) = tobj::load_obj(path, &options)
        .with_context(|| format!("Failed to load OBJ file: {:?}", path))?;

    let materials = materials.unwrap_or_else(|e| {
        warn!("No usable materials for {:?}: {}", path, e);
        Vec::new()
    });

    let mut mesh = MeshData::default();
    let mut has_normals = true;

    for model in &models {
        let source = &model.mesh;
        let base = mesh.vertices.len() as u32;
        let vertex_count = source.positions.len() / 3;
        has_normals &= source.normals.len() == source.positions.len();

        for i in 0..vertex_count {
            let position = [
                source.positions[3 * i],
                source.positions[3 * i + 1],
                source.positions[3 * i + 2],
            ];
            let normal = if source.normals.len() >= 3 * (i + 1) {
                [
                    source.normals[3 * i],
                    source.normals[3 * i + 1],
                    source.normals[3 * i + 2],
                ]
            } else {
                [0.0; 3]
            };
            // OBJ v runs bottom-up, wgpu textures top-down
            let tex_coords = if source.texcoords.len() >= 2 * (i + 1) {
                [source.texcoords[2 * i], 1.0 - source.texcoords[2 * i + 1]]
            } else {
                [0.0; 2]
            };

            mesh.vertices.push(MeshVertex {
                position,
                normal,
                tex_coords,
            });
        }

        mesh.indices.extend(source.indices.iter().map(|&i| base + i));
    }

    if mesh.indices.is_empty() {
        bail!("OBJ file has no triangles: {:?}", path);
    }

    if let Some(material) = materials.first() {
        let directory = path.parent().unwrap_or_else(|| Path::new("."));
        apply_material(&mut mesh, material, directory);
    }

    if !has_normals {
        mesh.compute_normals();
    }
    mesh.standardize();

    info!(
        "Loaded {:?}: {} shapes, {} vertices, {} triangles",
        path.file_name().unwrap_or_default(),
        models.len(),
        mesh.vertices.len(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

fn apply_material(mesh: &mut MeshData, material: &tobj::Material, directory: &Path) {
    let defaults = Material::default();
    let rgba = |rgb: Option<[f32; 3]>, fallback: Vec4| {
        rgb.map(|c| Vec4::new(c[0], c[1], c[2], 1.0)).unwrap_or(fallback)
    };

    mesh.material = Material {
        ka: rgba(material.ambient, defaults.ka),
        kd: rgba(material.diffuse, defaults.kd),
        ks: rgba(material.specular, defaults.ks),
        shininess: material.shininess.unwrap_or(defaults.shininess),
    };
    mesh.diffuse_texture = material
        .diffuse_texture
        .as_ref()
        .filter(|name| !name.is_empty())
        .map(|name| directory.join(name));
    mesh.normal_texture = material
        .normal_texture
        .as_ref()
        .filter(|name| !name.is_empty())
        .map(|name| directory.join(name));
}

/// Computes the overall bounding box of a set of positions
pub fn compute_mesh_bounds(vertices: &[Vec3]) -> (Vec3, Vec3) {
    if vertices.is_empty() {
        return (Vec3::ZERO, Vec3::ZERO);
    }

    let mut min = vertices[0];
    let mut max = vertices[0];

    for &vertex in vertices.iter().skip(1) {
        min = min.min(vertex);
        max = max.max(vertex);
    }

    (min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("meadow-obj-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    const QUAD_OBJ: &str = "\
mtllib quad.mtl
v 0.0 0.0 0.0
v 4.0 0.0 0.0
v 4.0 2.0 0.0
v 0.0 2.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 1.0 1.0
vt 0.0 1.0
usemtl grass
f 1/1 2/2 3/3 4/4
";

    const QUAD_MTL: &str = "\
newmtl grass
Ka 0.2 0.2 0.2
Kd 0.1 0.8 0.1
Ks 0.5 0.5 0.5
Ns 10.0
map_Kd grass.jpg
";

    #[test]
    fn test_compute_mesh_bounds() {
        let vertices = vec![
            Vec3::new(-1.0, -2.0, -3.0),
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(0.0, 0.0, 0.0),
        ];

        let (min, max) = compute_mesh_bounds(&vertices);

        assert_eq!(min, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(max, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_load_quad_triangulates_and_reads_material() {
        let dir = scratch_dir("quad");
        fs::write(dir.join("quad.obj"), QUAD_OBJ).unwrap();
        fs::write(dir.join("quad.mtl"), QUAD_MTL).unwrap();

        let mesh = load_obj_file(dir.join("quad.obj")).unwrap();

        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.material.kd, Vec4::new(0.1, 0.8, 0.1, 1.0));
        assert_eq!(mesh.material.shininess, 10.0);
        assert_eq!(mesh.diffuse_texture, Some(dir.join("grass.jpg")));
        assert_eq!(mesh.normal_texture, None);

        // No normals in the file: computed ones face +Z
        for vertex in &mesh.vertices {
            assert!((Vec3::from_array(vertex.normal) - Vec3::Z).length() < 1e-5);
        }
    }

    #[test]
    fn test_load_standardizes_geometry() {
        let dir = scratch_dir("standard");
        fs::write(dir.join("quad.obj"), QUAD_OBJ.replace("mtllib quad.mtl\n", "")).unwrap();

        let mesh = load_obj_file(dir.join("quad.obj")).unwrap();
        let positions: Vec<Vec3> = mesh.vertices.iter().map(|v| Vec3::from_array(v.position)).collect();
        let (min, max) = compute_mesh_bounds(&positions);

        assert!(((min + max) * 0.5).length() < 1e-5);
        assert!(((max - min).length() - 2.0).abs() < 1e-5);
        assert_eq!(mesh.material, Material::default());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load_obj_file("/definitely/not/here.obj").is_err());
    }

    #[test]
    fn test_flat_mesh_standardize_keeps_degenerate_geometry() {
        let mut mesh = MeshData {
            vertices: vec![MeshVertex::default(); 3],
            indices: vec![0, 1, 2],
            ..Default::default()
        };
        mesh.standardize();
        assert!(mesh.vertices.iter().all(|v| v.position == [0.0; 3]));
    }
}
