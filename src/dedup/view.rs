use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use serde_json::Value;

use crate::scene_graph::{Modifier, ObjectKind, PropertyMap, Transform};

/// Read-only view of a scene object, covering exactly the attributes duplicate
/// detection looks at.
///
/// `MeshRef` and `MaterialRef` are identity handles: two objects share geometry
/// only when their handles compare equal, never because the data behind two
/// different handles happens to be identical.
pub trait SceneObjectView {
    type MeshRef: PartialEq;
    type MaterialRef: PartialEq;

    fn name(&self) -> &str;
    fn kind(&self) -> ObjectKind;
    fn mesh(&self) -> Option<Self::MeshRef>;
    fn transform(&self) -> &Transform;
    fn modifiers(&self) -> &[Modifier];
    fn material_slots(&self) -> &[Option<Self::MaterialRef>];
    fn custom_properties(&self) -> &PropertyMap;
    fn flags(&self) -> Option<&Value>;
}

/// Name to canonical object lookup, supplied by whoever owns the objects.
pub trait SceneIndex<O> {
    fn lookup(&self, name: &str) -> Option<&O>;
}

impl<O, S: BuildHasher> SceneIndex<O> for HashMap<String, O, S> {
    fn lookup(&self, name: &str) -> Option<&O> {
        self.get(name)
    }
}

impl<O, S: BuildHasher> SceneIndex<O> for HashMap<String, &O, S> {
    fn lookup(&self, name: &str) -> Option<&O> {
        self.get(name).copied()
    }
}

impl<O> SceneIndex<O> for BTreeMap<String, O> {
    fn lookup(&self, name: &str) -> Option<&O> {
        self.get(name)
    }
}

impl<O> SceneIndex<O> for BTreeMap<String, &O> {
    fn lookup(&self, name: &str) -> Option<&O> {
        self.get(name).copied()
    }
}
