//! Prims: typed nodes holding attributes, relationships and ordered children.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::attribute::Attribute;
use super::path::StagePath;
use super::schema::SchemaType;
use super::value::ValueTypeName;

/// A node of the stage hierarchy. The prim's own path is the key it is stored
/// under in its layer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Prim {
    #[serde(default, rename = "type", skip_serializing_if = "String::is_empty")]
    type_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    api_schemas: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<String, Attribute>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    relationships: BTreeMap<String, Vec<StagePath>>,
}

impl Prim {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Default::default()
        }
    }

    /// Schema type name; empty for typeless prims.
    #[inline]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn set_type_name(&mut self, type_name: impl Into<String>) {
        self.type_name = type_name.into();
    }

    pub fn schema_type(&self) -> SchemaType {
        SchemaType::from_type_name(&self.type_name)
    }

    /// Child names in authored order.
    pub fn children(&self) -> &[String] {
        &self.children
    }

    pub fn has_child(&self, name: &str) -> bool {
        self.children.iter().any(|c| c == name)
    }

    pub(crate) fn add_child(&mut self, name: &str) {
        if !self.has_child(name) {
            self.children.push(name.to_string());
        }
    }

    // --- attributes ---

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn attribute_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        self.attributes.get_mut(name)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Attributes sorted by name.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Attribute)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Return the named attribute, creating it when absent. An existing
    /// attribute with a different type is replaced.
    pub fn create_attribute(
        &mut self,
        name: &str,
        type_name: ValueTypeName,
        custom: bool,
    ) -> &mut Attribute {
        let attribute = self
            .attributes
            .entry(name.to_string())
            .or_insert_with(|| Attribute::new(type_name, custom));
        if attribute.type_name() != type_name {
            *attribute = Attribute::new(type_name, custom);
        }
        attribute
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<Attribute> {
        self.attributes.remove(name)
    }

    // --- relationships ---

    pub fn relationship(&self, name: &str) -> Option<&[StagePath]> {
        self.relationships.get(name).map(Vec::as_slice)
    }

    pub fn has_relationship(&self, name: &str) -> bool {
        self.relationships.contains_key(name)
    }

    pub fn relationship_names(&self) -> impl Iterator<Item = &str> {
        self.relationships.keys().map(String::as_str)
    }

    /// Append a target, ignoring duplicates.
    pub fn add_relationship_target(&mut self, name: &str, target: StagePath) {
        let targets = self.relationships.entry(name.to_string()).or_default();
        if !targets.contains(&target) {
            targets.push(target);
        }
    }

    pub fn set_relationship_targets(&mut self, name: &str, targets: Vec<StagePath>) {
        self.relationships.insert(name.to_string(), targets);
    }

    // --- applied API schemas ---

    pub fn api_schemas(&self) -> &[String] {
        &self.api_schemas
    }

    pub fn has_api_schema(&self, name: &str) -> bool {
        self.api_schemas.iter().any(|s| s == name)
    }

    pub fn apply_api_schema(&mut self, name: &str) {
        if !self.has_api_schema(name) {
            self.api_schemas.push(name.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::value::ScalarType;

    #[test]
    fn test_create_attribute_keeps_or_replaces() {
        let mut prim = Prim::new("Mesh");
        let int_array = ValueTypeName::array(ScalarType::Int);
        prim.create_attribute("faceVertexCounts", int_array, false)
            .set(crate::stage::Value::IntArray(vec![4]), crate::core::TimeCode::Default)
            .unwrap();

        // Same type: existing values survive.
        assert!(prim.create_attribute("faceVertexCounts", int_array, false).has_value());

        // Different type: replaced.
        let float_array = ValueTypeName::array(ScalarType::Float);
        assert!(!prim.create_attribute("faceVertexCounts", float_array, false).has_value());
    }

    #[test]
    fn test_relationship_targets_dedup() {
        let mut prim = Prim::default();
        let a = StagePath::new("/a").unwrap();
        prim.add_relationship_target("collection:x:includes", a.clone());
        prim.add_relationship_target("collection:x:includes", a.clone());
        assert_eq!(prim.relationship("collection:x:includes"), Some(&[a][..]));
        assert_eq!(prim.relationship("collection:y:includes"), None);
    }

    #[test]
    fn test_children_and_schemas() {
        let mut prim = Prim::new("Xform");
        prim.add_child("b");
        prim.add_child("a");
        prim.add_child("b");
        assert_eq!(prim.children(), &["b".to_string(), "a".to_string()]);

        prim.apply_api_schema("CollectionAPI:s");
        prim.apply_api_schema("CollectionAPI:s");
        assert_eq!(prim.api_schemas().len(), 1);
        assert_eq!(prim.schema_type(), SchemaType::Xform);
    }
}
