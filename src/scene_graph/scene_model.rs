use id_arena::Id;

use crate::material_manager::{MaterialId, MaterialManager};

pub type SceneModelId = Id<SceneModel>;

/// Geometry data shared between objects. Objects instancing the same mesh hold
/// the same `SceneModelId`, which is what duplicate detection compares.
#[derive(Debug, Clone)]
pub struct SceneModel {
    pub name: String,
    pub materials: Vec<Option<MaterialId>>,
}

impl SceneModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            materials: Vec::new(),
        }
    }

    pub fn from_gltf(
        material_manager: &MaterialManager,
        file_name: &str,
        name: impl Into<String>,
        mesh: &gltf::Mesh,
    ) -> Self {
        // One slot per primitive, like the host's material slots.
        let materials = mesh
            .primitives()
            .map(|primitive| {
                primitive
                    .material()
                    .index()
                    .and_then(|index| material_manager.get_gltf_material(file_name, index))
            })
            .collect::<Vec<_>>();

        Self {
            name: name.into(),
            materials,
        }
    }
}
