//! Resource lookup for animated-image assets.

use std::collections::HashMap;
use std::io;
use std::path::Path;

/// Identifier of an animated-image asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceId(pub u32);

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Trait for raw resource providers.
///
/// Implement this trait to serve asset bytes from your own storage (bundled
/// assets, archive, network cache, etc.). The view only asks for a resource
/// when it is assigned, never from the paint path.
pub trait ResourceProvider {
    /// Read the raw bytes of a resource.
    fn open_raw_resource(&self, id: ResourceId) -> io::Result<Vec<u8>>;
}

impl<P: ResourceProvider + ?Sized> ResourceProvider for &P {
    fn open_raw_resource(&self, id: ResourceId) -> io::Result<Vec<u8>> {
        (**self).open_raw_resource(id)
    }
}

/// In-memory resource table.
///
/// ```rust
/// use gif_movie_view::{MemoryResources, ResourceId, ResourceProvider};
///
/// let mut resources = MemoryResources::new();
/// resources.insert(ResourceId(7), vec![1, 2, 3]);
/// assert_eq!(resources.open_raw_resource(ResourceId(7)).unwrap(), vec![1, 2, 3]);
/// assert!(resources.open_raw_resource(ResourceId(8)).is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct MemoryResources {
    entries: HashMap<ResourceId, Vec<u8>>,
}

impl MemoryResources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register bytes under `id`, replacing any previous entry.
    pub fn insert(&mut self, id: ResourceId, bytes: Vec<u8>) {
        self.entries.insert(id, bytes);
    }

    /// Read a file from disk and register it under `id`.
    pub fn insert_file<P: AsRef<Path>>(&mut self, id: ResourceId, path: P) -> io::Result<()> {
        let bytes = std::fs::read(path)?;
        self.insert(id, bytes);
        Ok(())
    }

    pub fn remove(&mut self, id: ResourceId) -> Option<Vec<u8>> {
        self.entries.remove(&id)
    }

    #[inline]
    pub fn contains(&self, id: ResourceId) -> bool {
        self.entries.contains_key(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResourceProvider for MemoryResources {
    fn open_raw_resource(&self, id: ResourceId) -> io::Result<Vec<u8>> {
        self.entries
            .get(&id)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("resource {id} not found")))
    }
}
