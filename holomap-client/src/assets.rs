use crate::model::EntityKind;

const ASSET_BASE_URL: &str = "https://starwars-visualguide.com/assets/img";

/// Substitute image for entities without artwork
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://starwars-visualguide.com/assets/img/big-placeholder.jpg";

/// Display image for a catalog entity.
///
/// Records that came back without an id (deserialized as 0) get the
/// placeholder.
pub fn image_url(kind: EntityKind, id: u32) -> String {
    if id == 0 {
        return PLACEHOLDER_IMAGE_URL.to_string();
    }
    let folder = match kind {
        EntityKind::Person => "characters",
        other => other.collection(),
    };
    format!("{}/{}/{}.jpg", ASSET_BASE_URL, folder, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_images_live_under_characters() {
        assert_eq!(
            image_url(EntityKind::Person, 1),
            "https://starwars-visualguide.com/assets/img/characters/1.jpg"
        );
    }

    #[test]
    fn test_related_images_use_collection_folder() {
        assert_eq!(
            image_url(EntityKind::Starship, 12),
            "https://starwars-visualguide.com/assets/img/starships/12.jpg"
        );
        assert_eq!(
            image_url(EntityKind::Film, 4),
            "https://starwars-visualguide.com/assets/img/films/4.jpg"
        );
    }

    #[test]
    fn test_missing_id_falls_back_to_placeholder() {
        assert_eq!(image_url(EntityKind::Vehicle, 0), PLACEHOLDER_IMAGE_URL);
        assert_eq!(image_url(EntityKind::Person, 0), PLACEHOLDER_IMAGE_URL);
    }
}
