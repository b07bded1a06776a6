pub mod assets;
pub mod client;
pub mod error;
pub mod model;

pub use client::{CatalogService, ClientConfig, SwapiClient};
pub use error::FetchError;
pub use model::{Entity, EntityKind, Film, Person, PersonSummary, Starship, Vehicle};
