use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use log::warn;
use serde::{Deserialize, Serialize};

/// One optional attribute group compared by [`classify_equivalence`](super::classify_equivalence).
/// The type check is not listed because it cannot be turned off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EquivalenceCheck {
    Mesh,
    Flags,
    Transform,
    Modifiers,
    Materials,
    CustomProperties,
}

impl EquivalenceCheck {
    pub const ALL: [EquivalenceCheck; 6] = [
        EquivalenceCheck::Mesh,
        EquivalenceCheck::Flags,
        EquivalenceCheck::Transform,
        EquivalenceCheck::Modifiers,
        EquivalenceCheck::Materials,
        EquivalenceCheck::CustomProperties,
    ];

    pub fn key(self) -> &'static str {
        match self {
            EquivalenceCheck::Mesh => "mesh",
            EquivalenceCheck::Flags => "flags",
            EquivalenceCheck::Transform => "transform",
            EquivalenceCheck::Modifiers => "modifiers",
            EquivalenceCheck::Materials => "materials",
            EquivalenceCheck::CustomProperties => "custom_properties",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|check| check.key() == key)
    }
}

impl fmt::Display for EquivalenceCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for EquivalenceCheck {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept the CLI spelling `custom-properties` as well.
        Self::from_key(&s.replace('-', "_")).ok_or_else(|| {
            anyhow!(
                "Unknown equivalence check {s:?}, expected one of: {}",
                Self::ALL.map(EquivalenceCheck::key).join(", ")
            )
        })
    }
}

/// Which attribute groups take part in equivalence classification.
///
/// The default enables only `mesh`. When deserialized, keys missing from the
/// table are disabled and unknown keys are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EquivalenceProfile {
    #[serde(default)]
    pub mesh: bool,
    #[serde(default)]
    pub flags: bool,
    #[serde(default)]
    pub transform: bool,
    #[serde(default)]
    pub modifiers: bool,
    #[serde(default)]
    pub materials: bool,
    #[serde(default)]
    pub custom_properties: bool,
}

impl EquivalenceProfile {
    /// Every optional check off: equivalence reduces to "same type".
    pub const fn disabled() -> Self {
        Self {
            mesh: false,
            flags: false,
            transform: false,
            modifiers: false,
            materials: false,
            custom_properties: false,
        }
    }

    pub const fn strict() -> Self {
        Self {
            mesh: true,
            flags: true,
            transform: true,
            modifiers: true,
            materials: true,
            custom_properties: true,
        }
    }

    /// Builds a profile from loosely typed `(key, enabled)` pairs. Keys not
    /// named are disabled; unrecognized keys are logged and ignored.
    pub fn from_flags<K: AsRef<str>>(flags: impl IntoIterator<Item = (K, bool)>) -> Self {
        let mut profile = Self::disabled();

        for (key, enabled) in flags {
            let key = key.as_ref();
            match EquivalenceCheck::from_key(key) {
                Some(check) => profile.set(check, enabled),
                None => warn!("Ignoring unknown equivalence profile key {key:?}"),
            }
        }

        profile
    }

    pub fn from_checks(checks: impl IntoIterator<Item = EquivalenceCheck>) -> Self {
        let mut profile = Self::disabled();
        for check in checks {
            profile.set(check, true);
        }
        profile
    }

    pub fn is_enabled(&self, check: EquivalenceCheck) -> bool {
        match check {
            EquivalenceCheck::Mesh => self.mesh,
            EquivalenceCheck::Flags => self.flags,
            EquivalenceCheck::Transform => self.transform,
            EquivalenceCheck::Modifiers => self.modifiers,
            EquivalenceCheck::Materials => self.materials,
            EquivalenceCheck::CustomProperties => self.custom_properties,
        }
    }

    pub fn set(&mut self, check: EquivalenceCheck, enabled: bool) {
        let field = match check {
            EquivalenceCheck::Mesh => &mut self.mesh,
            EquivalenceCheck::Flags => &mut self.flags,
            EquivalenceCheck::Transform => &mut self.transform,
            EquivalenceCheck::Modifiers => &mut self.modifiers,
            EquivalenceCheck::Materials => &mut self.materials,
            EquivalenceCheck::CustomProperties => &mut self.custom_properties,
        };
        *field = enabled;
    }

    pub fn enabled_checks(&self) -> impl Iterator<Item = EquivalenceCheck> + '_ {
        EquivalenceCheck::ALL
            .into_iter()
            .filter(|check| self.is_enabled(*check))
    }
}

impl Default for EquivalenceProfile {
    fn default() -> Self {
        Self {
            mesh: true,
            ..Self::disabled()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_enables_only_mesh() {
        let profile = EquivalenceProfile::default();
        assert_eq!(
            profile.enabled_checks().collect::<Vec<_>>(),
            vec![EquivalenceCheck::Mesh]
        );
    }

    #[test]
    fn from_flags_ignores_unknown_and_defaults_missing_to_disabled() {
        let profile = EquivalenceProfile::from_flags([
            ("transform", true),
            ("materials", false),
            ("vertex_groups", true),
        ]);

        assert_eq!(
            profile,
            EquivalenceProfile {
                transform: true,
                ..EquivalenceProfile::disabled()
            }
        );
    }

    #[test]
    fn check_parses_cli_and_config_spellings() {
        assert_eq!(
            "custom-properties".parse::<EquivalenceCheck>().unwrap(),
            EquivalenceCheck::CustomProperties
        );
        assert_eq!(
            "custom_properties".parse::<EquivalenceCheck>().unwrap(),
            EquivalenceCheck::CustomProperties
        );
        assert!("normals".parse::<EquivalenceCheck>().is_err());
    }

    #[test]
    fn deserialized_table_disables_missing_keys() {
        let profile: EquivalenceProfile = toml::from_str("transform = true").unwrap();
        assert!(profile.transform);
        assert!(!profile.mesh);
    }

    #[test]
    fn deserializing_rejects_unknown_keys() {
        let result = toml::from_str::<EquivalenceProfile>("mesh = true\nnormals = true");
        assert!(result.is_err());
    }

    #[test]
    fn set_and_is_enabled_agree_for_every_check() {
        for check in EquivalenceCheck::ALL {
            let mut profile = EquivalenceProfile::disabled();
            profile.set(check, true);
            assert!(profile.is_enabled(check));
            assert_eq!(profile.enabled_checks().count(), 1);
            assert_eq!(EquivalenceProfile::from_checks([check]), profile);
        }
    }
}
