pub mod obj;
pub mod texture;

pub use obj::{compute_mesh_bounds, load_obj_file, MeshData};
pub use texture::{load_texture, TextureData};
