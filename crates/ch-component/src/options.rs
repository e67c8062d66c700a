//! Component-level options.  Only component builders accept them; the last
//! `options` call wins.

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ComponentOptions {
    /// Allow more than one named slot in the template.
    pub multiple_slots:    bool,
    /// Render without a host element of its own.
    pub virtual_host:      bool,
    /// Data fields matching this pattern are never sent to the renderer.
    pub pure_data_pattern: Option<String>,
    /// Let global styles apply inside the component.
    pub add_global_class:  bool,
}
