use anyhow::Result;
use log::warn;
use std::path::{Path, PathBuf};
use wgpu::util::DeviceExt;

use crate::loaders::{load_obj_file, load_texture, MeshData, TextureData};
use crate::types::Material;

/// Where a model's files live; explicit textures override the MTL maps
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSource {
    pub mesh: PathBuf,
    pub diffuse_texture: Option<PathBuf>,
    pub normal_texture: Option<PathBuf>,
}

impl ModelSource {
    pub fn mesh(path: impl Into<PathBuf>) -> Self {
        Self {
            mesh: path.into(),
            diffuse_texture: None,
            normal_texture: None,
        }
    }
}

/// Geometry and decoded maps, before GPU upload
#[derive(Debug, Clone)]
pub struct ModelAssets {
    pub mesh: MeshData,
    pub diffuse: TextureData,
    pub normal: TextureData,
}

impl ModelAssets {
    /// Explicit textures must load; textures named only by the MTL file fall back to a texel
    pub fn load(source: &ModelSource) -> Result<Self> {
        let mesh = load_obj_file(&source.mesh)?;

        let diffuse = match &source.diffuse_texture {
            Some(path) => load_texture(path)?,
            None => optional_texture(mesh.diffuse_texture.as_deref(), TextureData::white),
        };
        let normal = match &source.normal_texture {
            Some(path) => load_texture(path)?,
            None => optional_texture(mesh.normal_texture.as_deref(), TextureData::flat_normal),
        };

        Ok(Self {
            mesh,
            diffuse,
            normal,
        })
    }
}

fn optional_texture(path: Option<&Path>, fallback: fn() -> TextureData) -> TextureData {
    match path {
        Some(path) => load_texture(path).unwrap_or_else(|e| {
            warn!("{:#}; using a placeholder texel", e);
            fallback()
        }),
        None => fallback(),
    }
}

/// Mesh buffers, material and texture bind group resident on the GPU
pub struct Model {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    material: Material,
    textures: wgpu::BindGroup,
}

impl Model {
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        assets: &ModelAssets,
        texture_layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        label: &str,
    ) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", label)),
            contents: bytemuck::cast_slice(&assets.mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", label)),
            contents: bytemuck::cast_slice(&assets.mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let diffuse_view = upload_texture(
            device,
            queue,
            &assets.diffuse,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            &format!("{} Diffuse", label),
        );
        let normal_view = upload_texture(
            device,
            queue,
            &assets.normal,
            wgpu::TextureFormat::Rgba8Unorm,
            &format!("{} Normal", label),
        );

        let textures = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} Texture Bind Group", label)),
            layout: texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&diffuse_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&normal_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: assets.mesh.indices.len() as u32,
            material: assets.mesh.material,
            textures,
        }
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn triangle_count(&self) -> u32 {
        self.index_count / 3
    }

    /// Draw up to `triangles` triangles (all when None); texture bind group goes in group 2
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, triangles: Option<u32>) {
        let count = triangles
            .map(|t| t.saturating_mul(3).min(self.index_count))
            .unwrap_or(self.index_count);

        pass.set_bind_group(2, &self.textures, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..count, 0, 0..1);
    }
}

fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture: &TextureData,
    format: wgpu::TextureFormat,
    label: &str,
) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width: texture.width,
        height: texture.height,
        depth_or_array_layers: 1,
    };

    let gpu_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        gpu_texture.as_image_copy(),
        &texture.data,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * texture.width),
            rows_per_image: Some(texture.height),
        },
        size,
    );

    gpu_texture.create_view(&wgpu::TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_mtl_texture_falls_back() {
        let texture = optional_texture(Some(Path::new("/definitely/not/here.png")), TextureData::white);
        assert_eq!(texture, TextureData::white());
    }

    #[test]
    fn test_no_texture_uses_fallback() {
        assert_eq!(optional_texture(None, TextureData::flat_normal), TextureData::flat_normal());
    }

    #[test]
    fn test_explicit_texture_must_exist() {
        let dir = std::env::temp_dir().join(format!("meadow-model-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("tri.obj"), "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

        let mut source = ModelSource::mesh(dir.join("tri.obj"));
        assert!(ModelAssets::load(&source).is_ok());

        source.diffuse_texture = Some(dir.join("missing.jpg"));
        assert!(ModelAssets::load(&source).is_err());
    }
}
