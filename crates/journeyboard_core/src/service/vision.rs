//! Static vision board items. Not persisted.

use crate::locale::Translator;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisionItem {
    pub id: u32,
    /// Translation namespace under `vision.items`.
    pub slug: &'static str,
    pub image: &'static str,
}

impl VisionItem {
    pub fn title_key(&self) -> String {
        format!("vision.items.{}.title", self.slug)
    }

    pub fn description_key(&self) -> String {
        format!("vision.items.{}.description", self.slug)
    }
}

const PLACEHOLDER_IMAGE: &str = "/placeholder.svg?height=200&width=300";

const VISION_ITEMS: [VisionItem; 8] = [
    VisionItem {
        id: 1,
        slug: "camry",
        image: "/images/camry.jpg",
    },
    VisionItem {
        id: 2,
        slug: "apple",
        image: PLACEHOLDER_IMAGE,
    },
    VisionItem {
        id: 3,
        slug: "physique",
        image: "/images/fitness.jpg",
    },
    VisionItem {
        id: 4,
        slug: "youtube",
        image: PLACEHOLDER_IMAGE,
    },
    VisionItem {
        id: 5,
        slug: "gifts",
        image: PLACEHOLDER_IMAGE,
    },
    VisionItem {
        id: 6,
        slug: "hajj",
        image: PLACEHOLDER_IMAGE,
    },
    VisionItem {
        id: 7,
        slug: "home",
        image: PLACEHOLDER_IMAGE,
    },
    VisionItem {
        id: 8,
        slug: "audi",
        image: "/images/audi.jpg",
    },
];

pub fn vision_items() -> &'static [VisionItem] {
    &VISION_ITEMS
}

/// Vision item with text resolved for one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizedVisionItem {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub image: String,
}

pub fn localized_vision_items(translator: &dyn Translator) -> Vec<LocalizedVisionItem> {
    vision_items()
        .iter()
        .map(|item| LocalizedVisionItem {
            id: item.id,
            title: translator.translate(&item.title_key()),
            description: translator.translate(&item.description_key()),
            image: item.image.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{localized_vision_items, vision_items};
    use crate::locale::{Locale, StaticTranslator};

    #[test]
    fn ids_are_unique_and_sequential() {
        let ids = vision_items().iter().map(|item| item.id).collect::<Vec<_>>();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());
    }

    #[test]
    fn titles_are_localized() {
        let items = localized_vision_items(&StaticTranslator::new(Locale::Ru));
        assert_eq!(items[5].title, "Хадж");
        assert_eq!(items[0].image, "/images/camry.jpg");
    }
}
