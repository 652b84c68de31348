use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

/// A plugin property value as declared by a descriptor or set by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Double(f64),
    String(String),
}

impl PropertyValue {
    /// True when both values carry the same variant
    pub fn same_kind(
        &self,
        other: &PropertyValue,
    ) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub name: String,
    pub default: PropertyValue,
}

/// Catalog entry describing one loaded plugin.
///
/// The catalog is fixed at store construction and seeds the closed set of
/// plugin configs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub transaction_types: Vec<String>,
    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,
}

impl PluginDescriptor {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            transaction_types: Vec::new(),
            properties: Vec::new(),
        }
    }

    pub fn with_transaction_types<I, S>(
        mut self,
        types: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.transaction_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_property(
        mut self,
        name: impl Into<String>,
        default: PropertyValue,
    ) -> Self {
        self.properties.push(PropertyDescriptor {
            name: name.into(),
            default,
        });
        self
    }

    /// Enabled config carrying every declared property at its default
    pub fn default_config(&self) -> PluginConfig {
        PluginConfig {
            id: self.id.clone(),
            enabled: true,
            properties: self
                .properties
                .iter()
                .map(|p| (p.name.clone(), p.default.clone()))
                .collect(),
        }
    }

    /// Aligns a stored config with this descriptor: undeclared properties
    /// are dropped, missing or mistyped ones fall back to the default.
    pub fn reconcile(
        &self,
        stored: &PluginConfig,
    ) -> PluginConfig {
        let properties = self
            .properties
            .iter()
            .map(|p| {
                let value = match stored.properties.get(&p.name) {
                    Some(v) if v.same_kind(&p.default) => v.clone(),
                    _ => p.default.clone(),
                };
                (p.name.clone(), value)
            })
            .collect();
        PluginConfig {
            id: self.id.clone(),
            enabled: stored.enabled,
            properties,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginConfig {
    pub id: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,
}

impl PluginConfig {
    pub fn property(
        &self,
        name: &str,
    ) -> Option<&PropertyValue> {
        self.properties.get(name)
    }
}

fn default_enabled() -> bool {
    true
}
