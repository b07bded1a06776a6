// In-memory catalog service for core tests

#![allow(dead_code)]

use holomap_client::error::Result;
use holomap_client::{
    CatalogService, EntityKind, FetchError, Film, Person, PersonSummary, Starship, Vehicle,
};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Default)]
pub struct FakeCatalog {
    pages: Mutex<VecDeque<Result<Vec<PersonSummary>>>>,
    list_calls: AtomicUsize,
    people: HashMap<u32, Person>,
    films: HashMap<u32, Film>,
    starships: HashMap<u32, Starship>,
    vehicles: HashMap<u32, Vehicle>,
    delays: HashMap<(EntityKind, u32), u64>,
    failing: HashSet<(EntityKind, u32)>,
    completed: Mutex<Vec<(EntityKind, u32)>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, page: Result<Vec<PersonSummary>>) -> Self {
        self.pages.lock().unwrap().push_back(page);
        self
    }

    pub fn with_person(mut self, person: Person) -> Self {
        self.people.insert(person.id, person);
        self
    }

    pub fn with_film(mut self, id: u32, title: &str) -> Self {
        self.films.insert(
            id,
            Film {
                id,
                title: title.to_string(),
                ..Default::default()
            },
        );
        self
    }

    pub fn with_starship(mut self, id: u32, name: &str) -> Self {
        self.starships.insert(
            id,
            Starship {
                id,
                name: name.to_string(),
                ..Default::default()
            },
        );
        self
    }

    pub fn with_vehicle(mut self, id: u32, name: &str) -> Self {
        self.vehicles.insert(
            id,
            Vehicle {
                id,
                name: name.to_string(),
                ..Default::default()
            },
        );
        self
    }

    /// Delay the response for one record by `millis` of (paused) time
    pub fn with_delay(mut self, kind: EntityKind, id: u32, millis: u64) -> Self {
        self.delays.insert((kind, id), millis);
        self
    }

    /// Make one record fetch fail with a transport-style error
    pub fn with_failure(mut self, kind: EntityKind, id: u32) -> Self {
        self.failing.insert((kind, id));
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Record fetches in the order they finished
    pub fn completed(&self) -> Vec<(EntityKind, u32)> {
        self.completed.lock().unwrap().clone()
    }

    async fn lookup<T: Clone>(
        &self,
        kind: EntityKind,
        id: u32,
        records: &HashMap<u32, T>,
    ) -> Result<T> {
        if let Some(&millis) = self.delays.get(&(kind, id)) {
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
        self.completed.lock().unwrap().push((kind, id));

        if self.failing.contains(&(kind, id)) {
            return Err(FetchError::Status {
                status: 500,
                url: format!("fake://{}/{}", kind.collection(), id),
            });
        }
        records
            .get(&id)
            .cloned()
            .ok_or(FetchError::NotFound { kind, id })
    }
}

impl CatalogService for FakeCatalog {
    async fn list_people(&self, _page: u32, _page_size: usize) -> Result<Vec<PersonSummary>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.pages.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn get_person(&self, id: u32) -> Result<Person> {
        self.lookup(EntityKind::Person, id, &self.people).await
    }

    async fn get_film(&self, id: u32) -> Result<Film> {
        self.lookup(EntityKind::Film, id, &self.films).await
    }

    async fn get_starship(&self, id: u32) -> Result<Starship> {
        self.lookup(EntityKind::Starship, id, &self.starships).await
    }

    async fn get_vehicle(&self, id: u32) -> Result<Vehicle> {
        self.lookup(EntityKind::Vehicle, id, &self.vehicles).await
    }
}

pub fn summary(id: u32) -> PersonSummary {
    PersonSummary {
        id,
        name: format!("Person {}", id),
        birth_year: None,
        gender: None,
    }
}

pub fn page(ids: impl IntoIterator<Item = u32>) -> Result<Vec<PersonSummary>> {
    Ok(ids.into_iter().map(summary).collect())
}

pub fn person(id: u32, films: &[u32], starships: &[u32], vehicles: &[u32]) -> Person {
    Person {
        id,
        name: format!("Person {}", id),
        films: films.to_vec(),
        starships: starships.to_vec(),
        vehicles: vehicles.to_vec(),
        ..Default::default()
    }
}
