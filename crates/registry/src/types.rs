//! Record types stored in the registry

use serde::{Deserialize, Deserializer, Serialize};

/// One managed plugin: its directory name, where it comes from, and whether
/// it is pinned to a branch or tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginRecord {
    /// Unique key, also the directory name under the install root
    pub name: String,

    /// Remote locator handed to git (not always a URL)
    pub url: String,

    /// Branch or tag the plugin is frozen to; `None` tracks the checkout
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_as_none"
    )]
    pub pin: Option<String>,

    /// Whether the loader should load the plugin
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Whether the plugin ships a colorscheme
    #[serde(default, skip_serializing_if = "is_false")]
    pub colorscheme: bool,
}

impl PluginRecord {
    /// A tracking, enabled record.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            pin: None,
            enabled: true,
            colorscheme: false,
        }
    }

    /// The same record frozen to `reference`; an empty reference unpins.
    pub fn pinned(mut self, reference: impl Into<String>) -> Self {
        self.pin = normalize_pin(Some(reference.into()));
        self
    }

    /// The same record, disabled.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Whether the record is frozen to a branch or tag.
    pub fn is_pinned(&self) -> bool {
        self.pin.is_some()
    }
}

pub(crate) fn normalize_pin(pin: Option<String>) -> Option<String> {
    pin.map(|p| p.trim().to_string()).filter(|p| !p.is_empty())
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(normalize_pin(Option::<String>::deserialize(deserializer)?))
}

fn default_enabled() -> bool {
    true
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}
