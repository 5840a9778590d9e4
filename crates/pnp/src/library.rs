use indexmap::IndexMap;
use thiserror::Error;

use crate::part::{Part, PartId};

/// Parts known to the machine, by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartLibrary {
    parts: IndexMap<PartId, Part>,
}

#[derive(Error, Debug, PartialEq)]
pub enum PartLibraryError {
    #[error("Duplicate part. id: {0}")]
    DuplicatePart(PartId),
}

impl PartLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_from_parts(parts: Vec<Part>) -> Result<Self, PartLibraryError> {
        let mut library = Self::new();
        for part in parts {
            library.insert(part)?;
        }
        Ok(library)
    }

    pub fn insert(&mut self, part: Part) -> Result<(), PartLibraryError> {
        if self.parts.contains_key(&part.id) {
            return Err(PartLibraryError::DuplicatePart(part.id));
        }
        self.parts.insert(part.id.clone(), part);
        Ok(())
    }

    pub fn get(&self, id: &PartId) -> Option<&Part> {
        self.parts.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Part> {
        self.parts.values()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}
