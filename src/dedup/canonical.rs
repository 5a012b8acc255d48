use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::dedup::equivalence::classify_equivalence;
use crate::dedup::profile::EquivalenceProfile;
use crate::dedup::view::{SceneIndex, SceneObjectView};

/// `base.NNN`, the name the host gives an object when `base` is already taken.
/// The host only ever writes ASCII digits here.
static DUPLICATE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*)\.([0-9]{3})$").expect("duplicate suffix pattern is valid"));

/// Splits `Prop.001` into `("Prop", 1)`. Names without a three digit suffix
/// yield `None`. This is the single definition of "suffixed" shared by name
/// resolution and name disambiguation.
pub fn split_duplicate_suffix(name: &str) -> Option<(&str, u32)> {
    let captures = DUPLICATE_SUFFIX.captures(name)?;
    let base = captures.get(1)?.as_str();
    let number = captures.get(2)?.as_str().parse().ok()?;
    Some((base, number))
}

/// The name `object` should be addressed by.
///
/// A suffixed object whose base name exists in `index` and is equivalent to it
/// under `profile` resolves to the base name. Anything else, including names
/// without a suffix and bases missing from the index, keeps its own name.
pub fn resolve_canonical_name<O, I>(object: &O, index: &I, profile: &EquivalenceProfile) -> String
where
    O: SceneObjectView,
    I: SceneIndex<O> + ?Sized,
{
    let name = object.name();

    let Some((base_name, _)) = split_duplicate_suffix(name) else {
        return name.to_string();
    };
    let Some(base_object) = index.lookup(base_name) else {
        return name.to_string();
    };

    if classify_equivalence(object, base_object, profile) {
        debug!("Folding {} into {}", name, base_name);
        base_name.to_string()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::scene_graph::{Object3D, ObjectKind, Scene, SceneModel};

    fn mesh_object(name: &str, scene: &mut Scene, shared: Option<&Object3D>) -> Object3D {
        let model_id = match shared {
            Some(other) => other.model_id,
            None => Some(scene.add_model(SceneModel::new(name))),
        };

        Object3D {
            model_id,
            ..Object3D::new(name, ObjectKind::Mesh)
        }
    }

    #[test]
    fn split_requires_exactly_three_digits() {
        assert_eq!(split_duplicate_suffix("Prop.001"), Some(("Prop", 1)));
        assert_eq!(split_duplicate_suffix("Prop.v2.015"), Some(("Prop.v2", 15)));
        assert_eq!(split_duplicate_suffix(".004"), Some(("", 4)));
        assert_eq!(split_duplicate_suffix("Prop.01"), None);
        assert_eq!(split_duplicate_suffix("Prop.0001"), None);
        assert_eq!(split_duplicate_suffix("Prop001"), None);
        assert_eq!(split_duplicate_suffix("Prop.001a"), None);
        assert_eq!(split_duplicate_suffix("Prop.\u{661}\u{662}\u{663}"), None);
    }

    #[test]
    fn non_ascii_digit_suffix_is_not_a_duplicate() {
        let mut scene = Scene::new();
        let base = mesh_object("Prop", &mut scene, None);
        let arabic_indic = mesh_object("Prop.\u{661}\u{662}\u{663}", &mut scene, Some(&base));
        let index = HashMap::from([("Prop".to_string(), &base)]);

        let canonical = resolve_canonical_name(&arabic_indic, &index, &EquivalenceProfile::default());
        assert_eq!(canonical, arabic_indic.name);

        scene.add_object(arabic_indic.clone());
        assert_eq!(
            scene.unique_object_name(&arabic_indic.name),
            format!("{}.001", arabic_indic.name)
        );
    }

    #[test]
    fn shared_geometry_duplicate_folds_into_base() {
        let mut scene = Scene::new();
        let base = mesh_object("Prop", &mut scene, None);
        let copy = mesh_object("Prop.001", &mut scene, Some(&base));
        let index = HashMap::from([("Prop".to_string(), &base)]);

        let canonical = resolve_canonical_name(&copy, &index, &EquivalenceProfile::default());
        assert_eq!(canonical, "Prop");
    }

    #[test]
    fn distinct_geometry_keeps_suffixed_name() {
        let mut scene = Scene::new();
        let base = mesh_object("Prop", &mut scene, None);
        let other = mesh_object("Prop.001", &mut scene, None);
        let index = HashMap::from([("Prop".to_string(), &base)]);

        let canonical = resolve_canonical_name(&other, &index, &EquivalenceProfile::default());
        assert_eq!(canonical, "Prop.001");
    }

    #[test]
    fn unsuffixed_name_is_returned_unchanged() {
        let mut scene = Scene::new();
        let chair = mesh_object("Chair", &mut scene, None);
        let lookalike = mesh_object("Chai", &mut scene, Some(&chair));
        let index = HashMap::from([
            ("Chair".to_string(), &chair),
            ("Chai".to_string(), &lookalike),
        ]);

        for profile in [EquivalenceProfile::default(), EquivalenceProfile::disabled()] {
            assert_eq!(resolve_canonical_name(&chair, &index, &profile), "Chair");
        }
    }

    #[test]
    fn missing_base_keeps_suffixed_name() {
        let mut scene = Scene::new();
        let lamp = mesh_object("Lamp.002", &mut scene, None);
        let index: HashMap<String, Object3D> = HashMap::new();

        let canonical = resolve_canonical_name(&lamp, &index, &EquivalenceProfile::disabled());
        assert_eq!(canonical, "Lamp.002");
    }

    #[test]
    fn resolving_the_resolved_name_again_is_stable() {
        let mut scene = Scene::new();
        let base = mesh_object("Prop", &mut scene, None);
        let copy = mesh_object("Prop.001", &mut scene, Some(&base));
        let index = HashMap::from([("Prop".to_string(), &base)]);
        let profile = EquivalenceProfile::default();

        let first = resolve_canonical_name(&copy, &index, &profile);
        let renamed = Object3D {
            name: first.clone(),
            ..copy.clone()
        };
        let empty: HashMap<String, Object3D> = HashMap::new();

        assert_eq!(resolve_canonical_name(&renamed, &empty, &profile), first);
    }

    #[test]
    fn different_type_under_base_name_is_not_folded() {
        let base = Object3D::new("Spawn", ObjectKind::Empty);
        let camera = Object3D::new("Spawn.001", ObjectKind::Camera);
        let index = HashMap::from([("Spawn".to_string(), base)]);

        let canonical = resolve_canonical_name(&camera, &index, &EquivalenceProfile::disabled());
        assert_eq!(canonical, "Spawn.001");
    }

    #[test]
    fn scene_acts_as_its_own_index() {
        let mut scene = Scene::new();
        let model = scene.add_model(SceneModel::new("Barrel"));
        let barrel = Object3D {
            model_id: Some(model),
            ..Object3D::new("Barrel", ObjectKind::Mesh)
        };
        scene.add_object(barrel.clone());
        let copy_id = scene.add_object(barrel);

        let copy = scene.get_object(copy_id).unwrap();
        assert_eq!(copy.name, "Barrel.001");
        assert_eq!(
            resolve_canonical_name(copy, &scene, &EquivalenceProfile::default()),
            "Barrel"
        );
    }
}
