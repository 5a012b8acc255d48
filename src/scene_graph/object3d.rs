use std::collections::BTreeMap;

use id_arena::Id;
use serde_json::Value;

use crate::dedup::SceneObjectView;
use crate::material_manager::MaterialId;
use crate::scene_graph::scene::Scene;
use crate::scene_graph::scene_model::SceneModelId;
use crate::scene_graph::transform::Transform;

pub type ObjectId = Id<Object3D>;

/// Custom key-value properties attached to an object.
pub type PropertyMap = BTreeMap<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Mesh,
    Empty,
    Camera,
    Light,
    Armature,
    Curve,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModifierKind {
    Array,
    Bevel,
    Mirror,
    Solidify,
    Subdivision,
    Triangulate,
    WeightedNormal,
    Other(String),
}

impl ModifierKind {
    /// Maps the host's modifier type names (`SUBSURF`, `MIRROR`, ...).
    pub fn from_type_name(type_name: &str) -> Self {
        match type_name {
            "ARRAY" => ModifierKind::Array,
            "BEVEL" => ModifierKind::Bevel,
            "MIRROR" => ModifierKind::Mirror,
            "SOLIDIFY" => ModifierKind::Solidify,
            "SUBSURF" => ModifierKind::Subdivision,
            "TRIANGULATE" => ModifierKind::Triangulate,
            "WEIGHTED_NORMAL" => ModifierKind::WeightedNormal,
            other => ModifierKind::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Modifier {
    pub kind: ModifierKind,
    pub name: String,
    pub params: BTreeMap<String, Value>,
}

impl Modifier {
    pub fn new(kind: ModifierKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            params: BTreeMap::new(),
        }
    }

    /// Reads `{ "type": "MIRROR", "name": "Mirror", ...params }`. Entries
    /// without a string `type` are rejected.
    pub fn from_json(value: &Value) -> Option<Self> {
        let mut fields = value.as_object()?.clone();
        let kind = match fields.remove("type")? {
            Value::String(type_name) => ModifierKind::from_type_name(&type_name),
            _ => return None,
        };
        let name = match fields.remove("name") {
            Some(Value::String(name)) => name,
            _ => String::new(),
        };

        Some(Self {
            kind,
            name,
            params: fields.into_iter().collect(),
        })
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct Object3D {
    pub name: String,
    pub kind: ObjectKind,
    pub transform: Transform,
    pub model_id: Option<SceneModelId>,
    pub material_slots: Vec<Option<MaterialId>>,
    pub modifiers: Vec<Modifier>,
    pub properties: PropertyMap,
    pub flags: Option<Value>,
    pub parent_id: Option<ObjectId>,
    pub child_ids: Vec<ObjectId>,
}

impl Object3D {
    pub fn new(name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Default::default()
        }
    }

    pub fn parent<'a>(&self, scene: &'a Scene) -> Option<&'a Object3D> {
        self.parent_id.and_then(|id| scene.get_object(id))
    }

    pub fn children<'a, 'b>(&'a self, scene: &'b Scene) -> impl Iterator<Item = &'b Object3D> + 'b
    where
        'a: 'b,
    {
        self.child_ids
            .iter()
            .filter_map(move |id| scene.get_object(*id))
    }
}

impl Default for Object3D {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: ObjectKind::Empty,
            transform: Transform::IDENTITY,
            model_id: None,
            material_slots: Vec::new(),
            modifiers: Vec::new(),
            properties: PropertyMap::new(),
            flags: None,
            parent_id: None,
            child_ids: Vec::new(),
        }
    }
}

impl SceneObjectView for Object3D {
    type MeshRef = SceneModelId;
    type MaterialRef = MaterialId;

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ObjectKind {
        self.kind
    }

    fn mesh(&self) -> Option<SceneModelId> {
        self.model_id
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    fn material_slots(&self) -> &[Option<MaterialId>] {
        &self.material_slots
    }

    fn custom_properties(&self) -> &PropertyMap {
        &self.properties
    }

    fn flags(&self) -> Option<&Value> {
        self.flags.as_ref()
    }
}
