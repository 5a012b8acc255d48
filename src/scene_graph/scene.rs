use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use glam::{Quat, Vec3};
use id_arena::Arena;
use log::{debug, warn};
use serde_json::Value;

use crate::dedup::{self, EquivalenceProfile, SceneIndex};
use crate::material_manager::MaterialManager;
use crate::scene_graph::object3d::{Modifier, Object3D, ObjectId, ObjectKind, PropertyMap};
use crate::scene_graph::scene_model::{SceneModel, SceneModelId};
use crate::scene_graph::transform::Transform;

/// Extras key holding an object's opaque flags value instead of a custom property.
pub const FLAGS_EXTRAS_KEY: &str = "_flags";
/// Extras key holding the modifier stack as an array of `{ "type": ..., ... }` objects.
pub const MODIFIERS_EXTRAS_KEY: &str = "_modifiers";

#[derive(Debug)]
pub struct Scene {
    objects: Arena<Object3D>,
    models: Arena<SceneModel>,
    objects_by_name: HashMap<String, ObjectId>,
    gltf_mesh_to_model: HashMap<usize, SceneModelId>,
}

/// Outcome of canonical-name resolution for one object of a scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalEntry {
    pub object_id: ObjectId,
    pub name: String,
    pub canonical_name: String,
}

impl CanonicalEntry {
    pub fn is_folded(&self) -> bool {
        self.name != self.canonical_name
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Arena::new(),
            models: Arena::new(),
            objects_by_name: HashMap::new(),
            gltf_mesh_to_model: HashMap::new(),
        }
    }

    /// Adds an object, renaming it to the first free `base.NNN` if its name is taken.
    pub fn add_object(&mut self, mut object: Object3D) -> ObjectId {
        if self.objects_by_name.contains_key(&object.name) {
            let unique = self.unique_object_name(&object.name);
            debug!("Object name {} is taken, using {}", object.name, unique);
            object.name = unique;
        }

        let name = object.name.clone();
        let id = self.objects.alloc(object);
        self.objects_by_name.insert(name, id);
        id
    }

    /// Lowest free disambiguated name for `name`. Any existing `.NNN` suffix is
    /// stripped first, so `Prop.001` colliding yields `Prop.002` rather than
    /// `Prop.001.001`.
    pub fn unique_object_name(&self, name: &str) -> String {
        if !self.objects_by_name.contains_key(name) {
            return name.to_string();
        }

        let base = dedup::split_duplicate_suffix(name)
            .map(|(base, _)| base)
            .unwrap_or(name);

        (1u32..)
            .map(|n| format!("{base}.{n:03}"))
            .find(|candidate| !self.objects_by_name.contains_key(candidate))
            .unwrap_or_else(|| name.to_string())
    }

    pub fn get_object(&self, id: ObjectId) -> Option<&Object3D> {
        self.objects.get(id)
    }

    /// Renames an object, keeping the name index in sync. A taken name gets the
    /// same `.NNN` treatment as in [`Scene::add_object`]. Returns the name the
    /// object ends up with, or `None` if `id` is not in this scene.
    pub fn rename_object(&mut self, id: ObjectId, name: &str) -> Option<String> {
        let old_name = self.get_object(id)?.name.clone();
        if old_name == name {
            return Some(old_name);
        }

        self.objects_by_name.remove(&old_name);
        let unique = self.unique_object_name(name);
        self.objects_by_name.insert(unique.clone(), id);

        if let Some(object) = self.objects.get_mut(id) {
            object.name = unique.clone();
        }

        debug!("Renamed {} to {}", old_name, unique);
        Some(unique)
    }

    pub fn get_object_by_name(&self, name: &str) -> Option<ObjectId> {
        self.objects_by_name.get(name).copied()
    }

    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &Object3D)> {
        self.objects.iter()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    pub fn add_model(&mut self, model: SceneModel) -> SceneModelId {
        self.models.alloc(model)
    }

    pub fn get_model(&self, id: SceneModelId) -> Option<&SceneModel> {
        self.models.get(id)
    }

    /// Of the given selection, keeps the objects whose parent is not part of the
    /// selection itself. Order of the selection is preserved.
    pub fn top_level_objects(&self, selection: &[ObjectId]) -> Vec<ObjectId> {
        let selected = selection.iter().copied().collect::<HashSet<_>>();

        selection
            .iter()
            .copied()
            .filter(|id| {
                self.get_object(*id)
                    .and_then(|object| object.parent_id)
                    .map_or(true, |parent| !selected.contains(&parent))
            })
            .collect()
    }

    /// Resolves the canonical name of every object against this scene's own name index.
    pub fn canonical_names(&self, profile: &EquivalenceProfile) -> Vec<CanonicalEntry> {
        self.objects
            .iter()
            .map(|(object_id, object)| {
                let canonical_name = dedup::resolve_canonical_name(object, self, profile);

                if canonical_name != object.name {
                    debug!("{} is a duplicate of {}", object.name, canonical_name);
                }

                CanonicalEntry {
                    object_id,
                    name: object.name.clone(),
                    canonical_name,
                }
            })
            .collect()
    }

    pub fn spawn_gltf_scene(
        &mut self,
        material_manager: &MaterialManager,
        file_name: &str,
        scene: &gltf::Scene,
    ) -> Option<ObjectId> {
        let mut last_object_id = None;

        for node in scene.nodes() {
            last_object_id =
                Some(self.spawn_gltf_node(material_manager, file_name, &node, None));
        }

        last_object_id
    }

    fn spawn_gltf_node(
        &mut self,
        material_manager: &MaterialManager,
        file_name: &str,
        node: &gltf::Node,
        parent: Option<ObjectId>,
    ) -> ObjectId {
        let node_name = node.name().unwrap_or("Unnamed").to_string();
        let (translation, rotation, scale) = node.transform().decomposed();

        let mut object = Object3D::new(node_name.clone(), ObjectKind::Empty);
        object.transform = Transform::new(
            Vec3::from(translation),
            Quat::from_array(rotation),
            Vec3::from(scale),
        );

        let extras = read_extras(&node_name, node.extras());
        object.properties = extras.properties;
        object.flags = extras.flags;
        object.modifiers = extras.modifiers;

        if let Some(mesh) = node.mesh() {
            let model_id = self.model_for_gltf_mesh(material_manager, file_name, &node_name, &mesh);
            object.kind = ObjectKind::Mesh;
            object.material_slots = self
                .get_model(model_id)
                .map(|model| model.materials.clone())
                .unwrap_or_default();
            object.model_id = Some(model_id);
        } else if node.camera().is_some() {
            object.kind = ObjectKind::Camera;
        }

        let object_id = self.add_object(object);

        if let Some(parent_id) = parent {
            self.set_object_parent(object_id, Some(parent_id));
        }

        for child in node.children() {
            self.spawn_gltf_node(material_manager, file_name, &child, Some(object_id));
        }

        object_id
    }

    fn model_for_gltf_mesh(
        &mut self,
        material_manager: &MaterialManager,
        file_name: &str,
        node_name: &str,
        mesh: &gltf::Mesh,
    ) -> SceneModelId {
        let mesh_index = mesh.index();

        if let Some(model_id) = self.gltf_mesh_to_model.get(&mesh_index).copied() {
            return model_id;
        }

        let mesh_name = mesh
            .name()
            .map(String::from)
            .unwrap_or_else(|| format!("{} (Mesh)", node_name));

        let model = SceneModel::from_gltf(material_manager, file_name, mesh_name, mesh);
        let model_id = self.add_model(model);
        self.gltf_mesh_to_model.insert(mesh_index, model_id);

        model_id
    }

    /// Sets the parent of an object and updates child relationships
    pub fn set_object_parent(&mut self, child_id: ObjectId, new_parent_id: Option<ObjectId>) {
        // Remove from old parent's children list
        if let Some(old_parent_id) = self.get_object(child_id).and_then(|child| child.parent_id) {
            if let Some(old_parent) = self.objects.get_mut(old_parent_id) {
                old_parent.child_ids.retain(|&id| id != child_id);
            }
        }

        if let Some(child) = self.objects.get_mut(child_id) {
            child.parent_id = new_parent_id;
        }

        if let Some(new_parent) = new_parent_id.and_then(|id| self.objects.get_mut(id)) {
            new_parent.child_ids.push(child_id);
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneIndex<Object3D> for Scene {
    fn lookup(&self, name: &str) -> Option<&Object3D> {
        self.get_object_by_name(name)
            .and_then(|id| self.get_object(id))
    }
}

#[derive(Default)]
struct NodeExtras {
    properties: PropertyMap,
    flags: Option<Value>,
    modifiers: Vec<Modifier>,
}

/// Splits node extras into custom properties, the flags value and the modifier stack.
fn read_extras(node_name: &str, extras: &gltf::json::Extras) -> NodeExtras {
    let Some(raw) = extras else {
        return NodeExtras::default();
    };

    let mut properties = match serde_json::from_str::<PropertyMap>(raw.get()) {
        Ok(properties) => properties,
        Err(err) => {
            warn!("Ignoring extras of {}: not a JSON object ({})", node_name, err);
            return NodeExtras::default();
        }
    };

    let flags = properties.remove(FLAGS_EXTRAS_KEY);
    let modifiers = match properties.remove(MODIFIERS_EXTRAS_KEY) {
        None => Vec::new(),
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(|entry| {
                let modifier = Modifier::from_json(entry);
                if modifier.is_none() {
                    warn!("Skipping malformed modifier on {}: {}", node_name, entry);
                }
                modifier
            })
            .collect(),
        Some(other) => {
            warn!("Ignoring {} of {}: not an array ({})", MODIFIERS_EXTRAS_KEY, node_name, other);
            Vec::new()
        }
    };

    NodeExtras {
        properties,
        flags,
        modifiers,
    }
}

/// Opens a glTF or GLB document and spawns its default scene (or the first one).
/// Only the document is read; buffers and images are never loaded.
pub fn load_gltf(path: impl AsRef<Path>) -> Result<(Scene, MaterialManager)> {
    let path = path.as_ref();
    let gltf = gltf::Gltf::open(path)
        .with_context(|| format!("Failed to open glTF document {}", path.display()))?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    scene_from_document(&file_name, &gltf.document)
}

pub fn scene_from_document(
    file_name: &str,
    document: &gltf::Document,
) -> Result<(Scene, MaterialManager)> {
    let gltf_scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .context("No scenes in gltf")?;

    let mut material_manager = MaterialManager::new();
    material_manager.load_all_materials_from_gltf(file_name, document);

    let mut scene = Scene::new();
    scene.spawn_gltf_scene(&material_manager, file_name, &gltf_scene);

    debug!(
        "Spawned {} objects and {} models from {}",
        scene.object_count(),
        scene.model_count(),
        file_name
    );

    Ok((scene, material_manager))
}
