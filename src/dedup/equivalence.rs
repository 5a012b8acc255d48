use std::collections::BTreeSet;

use log::trace;
use serde_json::Value;

use crate::dedup::profile::{EquivalenceCheck, EquivalenceProfile};
use crate::dedup::view::SceneObjectView;
use crate::scene_graph::PropertyMap;

static NULL: Value = Value::Null;

/// Whether `a` and `b` are the same logical asset under `profile`.
///
/// The type check always runs. Every other check runs only when enabled, in
/// the order mesh, transform, modifiers, materials, custom properties, flags,
/// stopping at the first mismatch.
pub fn classify_equivalence<O: SceneObjectView>(a: &O, b: &O, profile: &EquivalenceProfile) -> bool {
    if a.kind() != b.kind() {
        trace!("{} / {}: type differs", a.name(), b.name());
        return false;
    }

    let checks = [
        (EquivalenceCheck::Mesh, meshes_match::<O> as fn(&O, &O) -> bool),
        (EquivalenceCheck::Transform, transforms_match::<O>),
        (EquivalenceCheck::Modifiers, modifiers_match::<O>),
        (EquivalenceCheck::Materials, materials_match::<O>),
        (EquivalenceCheck::CustomProperties, custom_properties_match::<O>),
        (EquivalenceCheck::Flags, flags_match::<O>),
    ];

    for (check, matches) in checks {
        if profile.is_enabled(check) && !matches(a, b) {
            trace!("{} / {}: {} differs", a.name(), b.name(), check);
            return false;
        }
    }

    true
}

fn meshes_match<O: SceneObjectView>(a: &O, b: &O) -> bool {
    a.mesh() == b.mesh()
}

fn transforms_match<O: SceneObjectView>(a: &O, b: &O) -> bool {
    a.transform().matches(b.transform())
}

// Only the modifier type is compared, never its parameters.
fn modifiers_match<O: SceneObjectView>(a: &O, b: &O) -> bool {
    let (a, b) = (a.modifiers(), b.modifiers());
    a.len() == b.len() && a.iter().zip(b).all(|(ma, mb)| ma.kind == mb.kind)
}

fn materials_match<O: SceneObjectView>(a: &O, b: &O) -> bool {
    a.material_slots() == b.material_slots()
}

fn custom_properties_match<O: SceneObjectView>(a: &O, b: &O) -> bool {
    let (a, b) = (a.custom_properties(), b.custom_properties());
    let keys_a = public_keys(a);

    keys_a == public_keys(b) && keys_a.into_iter().all(|key| a.get(key) == b.get(key))
}

/// Property keys not starting with `_`; underscored keys are host-internal.
fn public_keys(properties: &PropertyMap) -> BTreeSet<&str> {
    properties
        .keys()
        .map(String::as_str)
        .filter(|key| !key.starts_with('_'))
        .collect()
}

fn flags_match<O: SceneObjectView>(a: &O, b: &O) -> bool {
    a.flags().unwrap_or(&NULL) == b.flags().unwrap_or(&NULL)
}
