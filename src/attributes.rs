use crate::resources::ResourceId;

/// Configuration attributes for a [`GifMovieView`](crate::GifMovieView).
///
/// `gif` uses `-1` (or any negative value) for "unset" so style files can
/// spell out the default explicitly.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ViewAttributes {
    pub gif: i64,
    pub paused: bool,
}

impl Default for ViewAttributes {
    fn default() -> Self {
        Self {
            gif: -1,
            paused: false,
        }
    }
}

impl ViewAttributes {
    pub fn new(gif: Option<ResourceId>, paused: bool) -> Self {
        Self {
            gif: gif.map_or(-1, |id| id.0 as i64),
            paused,
        }
    }

    /// Parse attributes from a TOML string.
    #[cfg(feature = "toml")]
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// The configured resource, or `None` when unset or out of range.
    pub fn resource_id(&self) -> Option<ResourceId> {
        u32::try_from(self.gif).ok().map(ResourceId)
    }
}
