use serde::{Deserialize, Serialize};
use std::fmt;

/// The catalog resource an id belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Person,
    Film,
    Starship,
    Vehicle,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Person => "person",
            EntityKind::Film => "film",
            EntityKind::Starship => "starship",
            EntityKind::Vehicle => "vehicle",
        }
    }

    /// Collection segment used by the REST service
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Person => "people",
            EntityKind::Film => "films",
            EntityKind::Starship => "starships",
            EntityKind::Vehicle => "vehicles",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityKind::Person => "Person",
            EntityKind::Film => "Film",
            EntityKind::Starship => "Starship",
            EntityKind::Vehicle => "Vehicle",
        };
        f.write_str(label)
    }
}

/// One row of a catalog page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonSummary {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub birth_year: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
    pub id: u32,
    pub name: String,
    pub height: String,
    pub mass: String,
    pub hair_color: String,
    pub skin_color: String,
    pub eye_color: String,
    pub birth_year: String,
    pub gender: String,
    pub homeworld: Option<u32>,
    pub films: Vec<u32>,
    pub species: Vec<u32>,
    pub vehicles: Vec<u32>,
    pub starships: Vec<u32>,
    pub created: String,
    pub edited: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Film {
    pub id: u32,
    pub title: String,
    pub episode_id: u32,
    pub opening_crawl: String,
    pub director: String,
    pub producer: String,
    pub release_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Starship {
    pub id: u32,
    pub name: String,
    pub model: String,
    pub manufacturer: String,
    pub cost_in_credits: String,
    pub length: String,
    pub max_atmosphering_speed: String,
    pub crew: String,
    pub passengers: String,
    pub cargo_capacity: String,
    pub consumables: String,
    pub hyperdrive_rating: String,
    #[serde(rename = "MGLT")]
    pub mglt: String,
    pub starship_class: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vehicle {
    pub id: u32,
    pub name: String,
    pub model: String,
    pub vehicle_class: String,
    pub manufacturer: String,
    pub length: String,
    pub cost_in_credits: String,
    pub crew: String,
    pub passengers: String,
    pub max_atmosphering_speed: String,
    pub cargo_capacity: String,
    pub consumables: String,
}

/// Any catalog record, discriminated by `kind`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entity {
    Person(Person),
    Film(Film),
    Starship(Starship),
    Vehicle(Vehicle),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Person(_) => EntityKind::Person,
            Entity::Film(_) => EntityKind::Film,
            Entity::Starship(_) => EntityKind::Starship,
            Entity::Vehicle(_) => EntityKind::Vehicle,
        }
    }

    pub fn id(&self) -> u32 {
        match self {
            Entity::Person(p) => p.id,
            Entity::Film(f) => f.id,
            Entity::Starship(s) => s.id,
            Entity::Vehicle(v) => v.id,
        }
    }

    /// Name, or title for films
    pub fn label(&self) -> &str {
        match self {
            Entity::Person(p) => &p.name,
            Entity::Film(f) => &f.title,
            Entity::Starship(s) => &s.name,
            Entity::Vehicle(v) => &v.name,
        }
    }

    /// Descriptive fields in display order, excluding the label and id lists
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Entity::Person(p) => vec![
                ("Birth Year", p.birth_year.clone()),
                ("Gender", p.gender.clone()),
                ("Height", format!("{} cm", p.height)),
                ("Mass", format!("{} kg", p.mass)),
                ("Hair Color", p.hair_color.clone()),
                ("Eye Color", p.eye_color.clone()),
                ("Skin Color", p.skin_color.clone()),
            ],
            Entity::Film(f) => vec![
                ("Episode", f.episode_id.to_string()),
                ("Director", f.director.clone()),
                ("Producer", f.producer.clone()),
                ("Release Date", f.release_date.clone()),
                (
                    "Opening Crawl",
                    f.opening_crawl.split_whitespace().collect::<Vec<_>>().join(" "),
                ),
            ],
            Entity::Starship(s) => vec![
                ("Model", s.model.clone()),
                ("Manufacturer", s.manufacturer.clone()),
                ("Class", s.starship_class.clone()),
                ("Cost", s.cost_in_credits.clone()),
                ("Length", s.length.clone()),
                ("Max Speed", s.max_atmosphering_speed.clone()),
                ("Crew", s.crew.clone()),
                ("Passengers", s.passengers.clone()),
                ("Cargo Capacity", s.cargo_capacity.clone()),
                ("Consumables", s.consumables.clone()),
                ("Hyperdrive Rating", s.hyperdrive_rating.clone()),
                ("MGLT", s.mglt.clone()),
            ],
            Entity::Vehicle(v) => vec![
                ("Model", v.model.clone()),
                ("Manufacturer", v.manufacturer.clone()),
                ("Class", v.vehicle_class.clone()),
                ("Cost", v.cost_in_credits.clone()),
                ("Length", v.length.clone()),
                ("Max Speed", v.max_atmosphering_speed.clone()),
                ("Crew", v.crew.clone()),
                ("Passengers", v.passengers.clone()),
                ("Cargo Capacity", v.cargo_capacity.clone()),
                ("Consumables", v.consumables.clone()),
            ],
        }
    }
}

impl From<Person> for Entity {
    fn from(value: Person) -> Self {
        Entity::Person(value)
    }
}

impl From<Film> for Entity {
    fn from(value: Film) -> Self {
        Entity::Film(value)
    }
}

impl From<Starship> for Entity {
    fn from(value: Starship) -> Self {
        Entity::Starship(value)
    }
}

impl From<Vehicle> for Entity {
    fn from(value: Vehicle) -> Self {
        Entity::Vehicle(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_serializes_with_kind_discriminant() {
        let film = Entity::Film(Film {
            id: 4,
            title: "A New Hope".to_string(),
            ..Default::default()
        });

        let json = serde_json::to_value(&film).unwrap();
        assert_eq!(json["kind"], "film");
        assert_eq!(json["title"], "A New Hope");

        let back: Entity = serde_json::from_value(json).unwrap();
        assert_eq!(back.kind(), EntityKind::Film);
        assert_eq!(back.label(), "A New Hope");
    }

    #[test]
    fn test_person_tolerates_missing_fields() {
        let person: Person =
            serde_json::from_str(r#"{"id": 1, "name": "Luke Skywalker", "films": [1, 2]}"#).unwrap();
        assert_eq!(person.id, 1);
        assert_eq!(person.films, vec![1, 2]);
        assert!(person.starships.is_empty());
        assert_eq!(person.homeworld, None);
    }

    #[test]
    fn test_starship_mglt_rename() {
        let ship: Starship =
            serde_json::from_str(r#"{"id": 12, "name": "X-wing", "MGLT": "100"}"#).unwrap();
        assert_eq!(ship.mglt, "100");
    }

    #[test]
    fn test_vehicle_fields_include_class_and_crew() {
        let vehicle = Entity::Vehicle(Vehicle {
            id: 14,
            name: "Snowspeeder".to_string(),
            vehicle_class: "airspeeder".to_string(),
            crew: "2".to_string(),
            ..Default::default()
        });
        let fields = vehicle.fields();
        assert!(fields.contains(&("Class", "airspeeder".to_string())));
        assert!(fields.contains(&("Crew", "2".to_string())));
    }

    #[test]
    fn test_film_fields_include_flattened_opening_crawl() {
        let film = Entity::Film(Film {
            id: 1,
            title: "A New Hope".to_string(),
            opening_crawl: "It is a period of civil war.\r\nRebel spaceships,".to_string(),
            ..Default::default()
        });

        let fields = film.fields();
        assert_eq!(
            fields.last(),
            Some(&(
                "Opening Crawl",
                "It is a period of civil war. Rebel spaceships,".to_string()
            ))
        );
    }

    #[test]
    fn test_kind_collection_segments() {
        assert_eq!(EntityKind::Person.collection(), "people");
        assert_eq!(EntityKind::Film.collection(), "films");
        assert_eq!(EntityKind::Starship.collection(), "starships");
        assert_eq!(EntityKind::Vehicle.collection(), "vehicles");
    }
}
