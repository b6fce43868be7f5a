use crate::basic_types::StorageKey;

/// The id of a reversible integer cell stored in [`TrailedValues`].
///
/// [`TrailedValues`]: super::TrailedValues
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct TrailedInteger {
    id: u32,
}

impl StorageKey for TrailedInteger {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        Self { id: index as u32 }
    }
}
