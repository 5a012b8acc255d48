use std::collections::HashMap;

use id_arena::{Arena, Id};
use log::debug;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GltfMaterialKey {
    pub file_name: String,
    pub material_index: usize,
}

#[derive(Debug, Clone)]
pub struct MaterialData {
    pub name: String,
    pub double_sided: bool,
}

impl MaterialData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            double_sided: false,
        }
    }
}

pub type MaterialId = Id<MaterialData>;

/// Owns every material referenced by a scene. Material slots hold ids into
/// this arena, so two slots are "the same material" exactly when their ids are
/// equal, regardless of how similar the material data is.
#[derive(Debug)]
pub struct MaterialManager {
    materials: Arena<MaterialData>,
    materials_by_gltf: HashMap<GltfMaterialKey, MaterialId>,
}

impl MaterialManager {
    pub fn new() -> Self {
        Self {
            materials: Arena::new(),
            materials_by_gltf: HashMap::new(),
        }
    }

    pub fn add_material(&mut self, material_data: MaterialData) -> MaterialId {
        self.materials.alloc(material_data)
    }

    pub fn get_material(&self, id: MaterialId) -> Option<&MaterialData> {
        self.materials.get(id)
    }

    pub fn get_gltf_material(&self, file_name: &str, material_index: usize) -> Option<MaterialId> {
        let key = GltfMaterialKey {
            file_name: file_name.to_string(),
            material_index,
        };
        self.materials_by_gltf.get(&key).copied()
    }

    pub fn load_all_materials_from_gltf(&mut self, file_name: &str, document: &gltf::Document) {
        for material in document.materials() {
            // The implicit default material has no index and is never referenced by slot.
            let Some(material_index) = material.index() else {
                continue;
            };

            let key = GltfMaterialKey {
                file_name: file_name.to_string(),
                material_index,
            };

            if self.materials_by_gltf.contains_key(&key) {
                continue;
            }

            let material_data = MaterialData {
                name: material.name().unwrap_or("Unnamed material").to_string(),
                double_sided: material.double_sided(),
            };

            debug!("Loaded material {} from {}", material_data.name, file_name);

            let id = self.add_material(material_data);
            self.materials_by_gltf.insert(key, id);
        }
    }

    pub fn materials(&self) -> impl Iterator<Item = &MaterialData> {
        self.materials.iter().map(|(_, material)| material)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.len() == 0
    }
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}
