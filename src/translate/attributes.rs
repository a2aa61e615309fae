//! Custom attributes, stored on the stage under the `sceneStage:` namespace.
//!
//! The namespace is specific to this crate so that generic `user:` data
//! authored by other tools is never read back as a custom attribute.

use crate::core::{Diagnostics, TimeCode};
use crate::geom::data_algo;
use crate::scene::Data;
use crate::stage::{tokens, Prim};
use crate::util::Result;

/// Namespace of custom attributes.
pub const PREFIX: &str = tokens::CUSTOM_ATTRIBUTE_PREFIX;

const CONTEXT: &str = "Attributes";

/// Stage name for custom attribute `name`.
pub fn encode(name: &str) -> String {
    format!("{}{}", PREFIX, name)
}

/// Custom attribute name for stage attribute `name`, if it is one.
pub fn decode(name: &str) -> Option<&str> {
    name.strip_prefix(PREFIX)
}

#[inline]
pub fn is_custom_attribute(name: &str) -> bool {
    name.starts_with(PREFIX)
}

/// Decoded names of the custom attributes on `prim`.
pub fn attribute_names(prim: &Prim) -> Vec<String> {
    prim.attributes()
        .filter_map(|(name, _)| decode(name))
        .map(str::to_string)
        .collect()
}

pub fn has_attribute(prim: &Prim, name: &str) -> bool {
    prim.has_attribute(&encode(name))
}

/// Read custom attribute `name`. None when absent, unset at `time`, or of a
/// type with no scene equivalent (which is also reported).
pub fn read_attribute(
    prim: &Prim,
    name: &str,
    time: TimeCode,
    diagnostics: &Diagnostics,
) -> Option<Data> {
    let stage_name = encode(name);
    let attr = prim.attribute(&stage_name)?;
    let value = attr.get(time)?;
    let data = data_algo::from_stage(value, &attr.type_name());
    if data.is_none() {
        diagnostics.warn(
            CONTEXT,
            format!(
                "Attribute \"{}\" has unsupported type {}",
                name,
                attr.type_name()
            ),
        );
    }
    data
}

/// Author custom attribute `name`, typed from `value`.
pub fn write_attribute(prim: &mut Prim, name: &str, value: &Data, time: TimeCode) -> Result<()> {
    prim.create_attribute(&encode(name), data_algo::value_type_name(value), true)
        .set(data_algo::to_stage(value), time)
}

/// True if any custom attribute might change over time.
pub fn might_be_time_varying(prim: &Prim) -> bool {
    prim.attributes()
        .any(|(name, attr)| is_custom_attribute(name) && attr.value_might_be_time_varying())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::{ScalarType, Value, ValueTypeName};
    use crate::util::Vec3;

    #[test]
    fn test_codec() {
        assert_eq!(encode("foo:bar"), "sceneStage:foo:bar");
        assert_eq!(decode("sceneStage:foo:bar"), Some("foo:bar"));
        assert_eq!(decode("points"), None);
        assert!(is_custom_attribute("sceneStage:x"));
        assert!(!is_custom_attribute("primvars:sceneStage:x"));
        assert!(!is_custom_attribute("user:x"));
    }

    #[test]
    fn test_read_write() {
        let mut prim = Prim::new("Xform");
        write_attribute(&mut prim, "weight", &Data::Float(0.5), TimeCode::Time(1.0)).unwrap();
        write_attribute(&mut prim, "tint", &Data::Color3f(Vec3::ONE), TimeCode::Default).unwrap();
        prim.create_attribute("points", ValueTypeName::array(ScalarType::Point3f), false);

        assert_eq!(attribute_names(&prim), vec!["tint", "weight"]);
        assert!(has_attribute(&prim, "weight"));
        assert!(prim.attribute("sceneStage:weight").is_some_and(|a| a.is_custom()));

        let diagnostics = Diagnostics::new();
        assert_eq!(
            read_attribute(&prim, "weight", TimeCode::Time(1.0), &diagnostics),
            Some(Data::Float(0.5))
        );
        assert_eq!(
            read_attribute(&prim, "tint", TimeCode::Default, &diagnostics),
            Some(Data::Color3f(Vec3::ONE))
        );
        assert_eq!(read_attribute(&prim, "missing", TimeCode::Default, &diagnostics), None);
        assert!(!might_be_time_varying(&prim));

        write_attribute(&mut prim, "weight", &Data::Float(1.0), TimeCode::Time(2.0)).unwrap();
        assert!(might_be_time_varying(&prim));
    }

    #[test]
    fn test_foreign_user_namespace_is_ignored() {
        let mut prim = Prim::new("Xform");
        prim.create_attribute("user:weight", ValueTypeName::scalar(ScalarType::Float), true)
            .set(Value::Float(2.0), TimeCode::Default)
            .unwrap();
        assert!(attribute_names(&prim).is_empty());
        assert!(!has_attribute(&prim, "weight"));
    }

    #[test]
    fn test_unsupported_type_warns() {
        let mut prim = Prim::new("Xform");
        prim.create_attribute("sceneStage:tex", ValueTypeName::scalar(ScalarType::Asset), true)
            .set(Value::Asset("a.png".into()), TimeCode::Default)
            .unwrap();
        let diagnostics = Diagnostics::new();
        assert_eq!(read_attribute(&prim, "tex", TimeCode::Default, &diagnostics), None);
        assert_eq!(diagnostics.len(), 1);
    }
}
