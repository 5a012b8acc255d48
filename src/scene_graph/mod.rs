pub mod object3d;
pub mod scene;
pub mod scene_model;
pub mod transform;

// Re-export main types for convenience
pub use object3d::{Modifier, ModifierKind, Object3D, ObjectId, ObjectKind, PropertyMap};
pub use scene::{load_gltf, scene_from_document, CanonicalEntry, Scene};
pub use scene_model::{SceneModel, SceneModelId};
pub use transform::Transform;
