use std::collections::HashSet;

use async_trait::async_trait;

use crate::{error::Result, types::Attraction};

pub mod store;

pub use store::{CatalogCache, FileCatalogStore};

/// Supplies the candidate attractions for a destination. The pipeline
/// treats whatever this returns as read-only input; an empty list means
/// the destination is unknown.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn load(&self, destination: &str) -> Result<Vec<Attraction>>;
}

/// The attraction catalog for one destination, with the id set the
/// validator checks referential integrity against.
#[derive(Debug, Clone)]
pub struct Catalog {
    destination: String,
    attractions: Vec<Attraction>,
    ids: HashSet<String>,
}

impl Catalog {
    pub fn new(destination: impl Into<String>, attractions: Vec<Attraction>) -> Self {
        let ids = attractions.iter().map(|a| a.id.clone()).collect();
        Self {
            destination: destination.into(),
            attractions,
            ids,
        }
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn attractions(&self) -> &[Attraction] {
        &self.attractions
    }

    pub fn len(&self) -> usize {
        self.attractions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attractions.is_empty()
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.ids.contains(id)
    }
}
