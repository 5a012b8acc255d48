use glam::{Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    translation: Vec3,
    rotation: Quat,
    scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Exact component-wise comparison of location, rotation and scale.
    /// NaN matches NaN, so every transform matches itself.
    pub fn matches(&self, other: &Transform) -> bool {
        components_match(&self.translation.to_array(), &other.translation.to_array())
            && components_match(&self.rotation.to_array(), &other.rotation.to_array())
            && components_match(&self.scale.to_array(), &other.scale.to_array())
    }
}

fn components_match(a: &[f32], b: &[f32]) -> bool {
    a.iter()
        .zip(b)
        .all(|(a, b)| a == b || (a.is_nan() && b.is_nan()))
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
