use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MBeanAttribute {
    pub name: String,
    /// Counter-like attribute reported as a per-interval delta
    pub ever_increasing: bool,
}

/// Gauge over one monitored resource.
///
/// `mbean_object_name` is unique across the whole gauge collection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GaugeConfig {
    pub mbean_object_name: String,
    pub mbean_attributes: Vec<MBeanAttribute>,
}

impl GaugeConfig {
    pub fn new(mbean_object_name: impl Into<String>) -> Self {
        Self {
            mbean_object_name: mbean_object_name.into(),
            mbean_attributes: Vec::new(),
        }
    }

    pub fn with_attribute(
        mut self,
        name: impl Into<String>,
        ever_increasing: bool,
    ) -> Self {
        self.mbean_attributes.push(MBeanAttribute {
            name: name.into(),
            ever_increasing,
        });
        self
    }
}
