use glam::{Mat3, Mat4, Vec4};

use crate::config::LightingConfig;

/// Mesh vertex: position, normal, texture coordinates
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl MeshVertex {
    pub const ATTRIBS: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Material coefficients for the Phong family of programs
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Material {
    pub ka: Vec4,
    pub kd: Vec4,
    pub ks: Vec4,
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ka: Vec4::new(0.1, 0.1, 0.1, 1.0),
            kd: Vec4::new(0.7, 0.7, 0.7, 1.0),
            ks: Vec4::new(1.0, 1.0, 1.0, 1.0),
            shininess: 25.0,
        }
    }
}

/// Per-frame uniforms shared by every draw (group 0)
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUniforms {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub light_dir: [f32; 4],
    pub ia: [f32; 4],
    pub id: [f32; 4],
    pub is: [f32; 4],
    pub mapping_mode: u32,
    pub _pad: [u32; 3],
}

impl GlobalUniforms {
    pub fn new(view: Mat4, projection: Mat4, lighting: &LightingConfig, mapping_mode: u32) -> Self {
        Self {
            view: view.to_cols_array_2d(),
            projection: projection.to_cols_array_2d(),
            light_dir: lighting.direction,
            ia: lighting.ambient,
            id: lighting.diffuse,
            is: lighting.specular,
            mapping_mode,
            _pad: [0; 3],
        }
    }
}

/// Per-draw uniforms (group 1, dynamic offset)
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniforms {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 3], // mat3x3 columns padded to vec4
    pub ka: [f32; 4],
    pub kd: [f32; 4],
    pub ks: [f32; 4],
    pub shininess: f32,
    pub _pad: [f32; 3],
}

impl DrawUniforms {
    pub fn new(model: Mat4, view: Mat4, material: &Material) -> Self {
        let normal = Mat3::from_mat4(view * model).inverse().transpose();

        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: [
                normal.x_axis.extend(0.0).to_array(),
                normal.y_axis.extend(0.0).to_array(),
                normal.z_axis.extend(0.0).to_array(),
            ],
            ka: material.ka.to_array(),
            kd: material.kd.to_array(),
            ks: material.ks.to_array(),
            shininess: material.shininess,
            _pad: [0.0; 3],
        }
    }
}
