use serde::Serialize;

use super::repo::Car;

/// POST /cars wraps the record; the other operations return it bare.
#[derive(Debug, Serialize)]
pub struct CreatedCar {
    pub car: Car,
}

/// Fields a multipart request may supply. `None` means "leave unchanged";
/// an empty string on a text field counts as absent, and a supplied image
/// list replaces the prior one wholesale.
#[derive(Debug, Default)]
pub struct CarPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
}

impl CarPatch {
    pub fn apply(self, car: &mut Car) {
        if let Some(title) = self.title.filter(|t| !t.is_empty()) {
            car.title = Some(title);
        }
        if let Some(description) = self.description.filter(|d| !d.is_empty()) {
            car.description = Some(description);
        }
        if let Some(tags) = self.tags.filter(|t| t.iter().any(|s| !s.is_empty())) {
            car.tags = tags;
        }
        if let Some(images) = self.images.filter(|i| !i.is_empty()) {
            car.images = images;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn existing_car() -> Car {
        Car {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: Some("Old title".into()),
            description: Some("Old description".into()),
            tags: vec!["vintage".into()],
            images: vec!["100.jpg".into(), "101.jpg".into()],
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn title_only_patch_leaves_everything_else() {
        let mut car = existing_car();
        CarPatch {
            title: Some("New title".into()),
            ..Default::default()
        }
        .apply(&mut car);

        assert_eq!(car.title.as_deref(), Some("New title"));
        assert_eq!(car.description.as_deref(), Some("Old description"));
        assert_eq!(car.tags, vec!["vintage".to_string()]);
        assert_eq!(car.images.len(), 2);
    }

    #[test]
    fn empty_title_counts_as_absent() {
        let mut car = existing_car();
        CarPatch {
            title: Some(String::new()),
            ..Default::default()
        }
        .apply(&mut car);
        assert_eq!(car.title.as_deref(), Some("Old title"));
    }

    #[test]
    fn new_images_replace_not_merge() {
        let mut car = existing_car();
        CarPatch {
            images: Some(vec!["200.png".into()]),
            ..Default::default()
        }
        .apply(&mut car);
        assert_eq!(car.images, vec!["200.png".to_string()]);
    }

    #[test]
    fn empty_image_list_keeps_prior_images() {
        let mut car = existing_car();
        CarPatch {
            images: Some(vec![]),
            ..Default::default()
        }
        .apply(&mut car);
        assert_eq!(car.images.len(), 2);
    }

    #[test]
    fn blank_tags_keep_prior_list() {
        let mut car = existing_car();
        CarPatch {
            tags: Some(vec![String::new()]),
            ..Default::default()
        }
        .apply(&mut car);
        assert_eq!(car.tags, vec!["vintage".to_string()]);
    }

    #[test]
    fn tags_replace_when_supplied() {
        let mut car = existing_car();
        CarPatch {
            tags: Some(vec!["electric".into(), "sedan".into()]),
            ..Default::default()
        }
        .apply(&mut car);
        assert_eq!(car.tags, vec!["electric".to_string(), "sedan".to_string()]);
    }
}
