//! Typed material parameter storage.
//!
//! A material holds two tables: a name-keyed map of typed uniform values and
//! a texture-slot table. Both obey last-write-wins — re-setting a name
//! replaces the previous entry, including across value types.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::gfx::{TextureRef, UniformValue};

/// One sampler binding: uniform name, texture, unit and cubemap flag.
#[derive(Clone)]
pub struct TextureSlot {
    /// e.g. `"u_AlbedoTexture"`.
    pub uniform_name: String,
    pub texture: TextureRef,
    /// Texture unit (0-15), see [`crate::material::units`].
    pub unit: u32,
    pub is_cubemap: bool,
}

/// Uniform values + texture slots owned by one material.
#[derive(Default)]
pub struct ParameterStore {
    values: FxHashMap<String, UniformValue>,
    // Slots are a small ordered table, deduplicated by uniform name.
    slots: SmallVec<[TextureSlot; 12]>,
}

impl ParameterStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value under `name`. A name maps to exactly one active type at
    /// a time; the last write wins.
    pub fn set(&mut self, name: &str, value: impl Into<UniformValue>) {
        self.values.insert(name.to_owned(), value.into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<UniformValue> {
        self.values.get(name).copied()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Iterate stored (name, value) pairs. Insertion order is irrelevant.
    pub fn iter(&self) -> impl Iterator<Item = (&str, UniformValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Bind `texture` as `name` on `unit`, updating an existing slot with the
    /// same uniform name in place. `None` removes the slot entirely so no
    /// stale binding survives.
    pub fn set_texture(&mut self, name: &str, texture: Option<TextureRef>, unit: u32, is_cubemap: bool) {
        match texture {
            Some(texture) => {
                if let Some(slot) = self.slots.iter_mut().find(|s| s.uniform_name == name) {
                    slot.texture = texture;
                    slot.unit = unit;
                    slot.is_cubemap = is_cubemap;
                } else {
                    self.slots.push(TextureSlot {
                        uniform_name: name.to_owned(),
                        texture,
                        unit,
                        is_cubemap,
                    });
                }
            }
            None => {
                self.slots.retain(|s| s.uniform_name != name);
            }
        }
    }

    #[must_use]
    pub fn texture_slot(&self, name: &str) -> Option<&TextureSlot> {
        self.slots.iter().find(|s| s.uniform_name == name)
    }

    pub fn texture_slots(&self) -> impl Iterator<Item = &TextureSlot> {
        self.slots.iter()
    }

    #[must_use]
    pub fn texture_slot_count(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn last_write_wins_same_type() {
        let mut store = ParameterStore::new();
        store.set("u_Roughness", 0.2_f32);
        store.set("u_Roughness", 0.8_f32);
        assert_eq!(store.get("u_Roughness"), Some(UniformValue::Float(0.8)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn last_write_wins_across_types() {
        let mut store = ParameterStore::new();
        store.set("u_Value", 1.0_f32);
        store.set("u_Value", Vec3::ONE);
        assert_eq!(store.get("u_Value"), Some(UniformValue::Vec3(Vec3::ONE)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn missing_name_is_none() {
        let store = ParameterStore::new();
        assert_eq!(store.get("u_Nothing"), None);
        assert!(!store.contains("u_Nothing"));
    }
}
