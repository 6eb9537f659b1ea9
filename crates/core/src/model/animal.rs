use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;

use crate::model::ids::LevelId;

/// Number of animals in a level's answer pool.
pub const POOL_SIZE: usize = 4;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("catalog needs at least {min} animals, got {len}")]
    TooSmall { len: usize, min: usize },

    #[error("duplicate animal name: {0}")]
    DuplicateName(String),

    #[error("animal name cannot be empty")]
    EmptyName,
}

//
// ─── ANIMAL ────────────────────────────────────────────────────────────────────
//

/// A catalog entry: something the child can hear and has to recognise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animal {
    name: String,
    arabic_name: String,
    image: String,
    sound_url: String,
    sound_hint: String,
}

impl Animal {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        arabic_name: impl Into<String>,
        image: impl Into<String>,
        sound_url: impl Into<String>,
        sound_hint: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            arabic_name: arabic_name.into(),
            image: image.into(),
            sound_url: sound_url.into(),
            sound_hint: sound_hint.into(),
        }
    }

    /// Unique key within a catalog.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn arabic_name(&self) -> &str {
        &self.arabic_name
    }

    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }

    #[must_use]
    pub fn sound_url(&self) -> &str {
        &self.sound_url
    }

    /// Short Arabic description of the sound ("زئير الأسد").
    #[must_use]
    pub fn sound_hint(&self) -> &str {
        &self.sound_hint
    }
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// Ordered, validated set of animals that questions are drawn from.
///
/// Entries are shared behind `Arc` so questions can hold them without copying
/// strings around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimalCatalog {
    animals: Vec<Arc<Animal>>,
}

impl AnimalCatalog {
    /// Builds a catalog, checking it can fill a pool and that names are unique.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::TooSmall` with fewer than `POOL_SIZE` entries,
    /// `CatalogError::EmptyName` or `CatalogError::DuplicateName` on bad names.
    pub fn new(animals: Vec<Animal>) -> Result<Self, CatalogError> {
        if animals.len() < POOL_SIZE {
            return Err(CatalogError::TooSmall {
                len: animals.len(),
                min: POOL_SIZE,
            });
        }

        let mut seen = HashSet::with_capacity(animals.len());
        for animal in &animals {
            if animal.name().trim().is_empty() {
                return Err(CatalogError::EmptyName);
            }
            if !seen.insert(animal.name().to_owned()) {
                return Err(CatalogError::DuplicateName(animal.name().to_owned()));
            }
        }

        Ok(Self {
            animals: animals.into_iter().map(Arc::new).collect(),
        })
    }

    /// The twelve animals the game ships with.
    #[must_use]
    pub fn builtin() -> Self {
        let animals = BUILTIN
            .iter()
            .map(|(name, arabic, sound_url, hint)| {
                Animal::new(
                    *name,
                    *arabic,
                    format!("https://picsum.photos/seed/{}/400", name.to_lowercase()),
                    *sound_url,
                    *hint,
                )
            })
            .map(Arc::new)
            .collect();
        Self { animals }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.animals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.animals.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Arc<Animal>> {
        self.animals.get(index)
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Arc<Animal>> {
        self.animals.iter().find(|animal| animal.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Animal>> {
        self.animals.iter()
    }

    #[must_use]
    pub fn animals(&self) -> &[Arc<Animal>] {
        &self.animals
    }

    /// Index of the first pool entry for `level_id`.
    #[must_use]
    pub fn pool_start(&self, level_id: LevelId) -> usize {
        let offset = u64::from(level_id.value() - 1) * 2;
        let len = self.animals.len() as u64;
        usize::try_from(offset % len).unwrap_or(0)
    }

    /// The animals a level draws its correct answers from.
    ///
    /// A window of `POOL_SIZE` consecutive entries starting two places further
    /// along for each level, wrapping at the end of the catalog.
    #[must_use]
    pub fn level_pool(&self, level_id: LevelId) -> Vec<Arc<Animal>> {
        let start = self.pool_start(level_id);
        (0..POOL_SIZE)
            .map(|i| Arc::clone(&self.animals[(start + i) % self.animals.len()]))
            .collect()
    }
}

const BUILTIN: [(&str, &str, &str, &str); 12] = [
    (
        "Lion",
        "أسد",
        "https://www.soundjay.com/nature/sounds/lion-roar-01.mp3",
        "زئير الأسد",
    ),
    (
        "Cat",
        "قطة",
        "https://cdn.pixabay.com/audio/2022/03/15/audio_73147c23a5.mp3",
        "مواء القطة",
    ),
    (
        "Dog",
        "كلب",
        "https://www.soundjay.com/nature/sounds/dog-bark-1.mp3",
        "نباح الكلب",
    ),
    (
        "Elephant",
        "فيل",
        "https://www.soundjay.com/nature/sounds/elephant-trumpeting-01.mp3",
        "صوت الفيل",
    ),
    (
        "Bird",
        "عصفور",
        "https://www.soundjay.com/nature/sounds/canary-singing-01.mp3",
        "تغريد العصفور",
    ),
    (
        "Cow",
        "بقرة",
        "https://www.soundjay.com/nature/sounds/cow-moo-1.mp3",
        "خوار البقرة",
    ),
    (
        "Sheep",
        "خروف",
        "https://www.soundjay.com/nature/sounds/sheep-lamb-1.mp3",
        "ثغاء الخروف",
    ),
    (
        "Monkey",
        "قرد",
        "https://www.soundjay.com/nature/sounds/monkey-chatter-1.mp3",
        "ضحك القرد",
    ),
    (
        "Duck",
        "بطة",
        "https://www.soundjay.com/nature/sounds/duck-quack-1.mp3",
        "بطبطة البطة",
    ),
    (
        "Horse",
        "حصان",
        "https://www.soundjay.com/nature/sounds/horse-neigh-1.mp3",
        "صهيل الحصان",
    ),
    (
        "Rooster",
        "ديك",
        "https://www.soundjay.com/nature/sounds/rooster-crowing-1.mp3",
        "صياح الديك",
    ),
    (
        "Snake",
        "ثعبان",
        "https://www.soundjay.com/nature/sounds/snake-hiss-1.mp3",
        "فحيح الثعبان",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn level(id: u32) -> LevelId {
        LevelId::new(id).unwrap()
    }

    fn names(pool: &[Arc<Animal>]) -> Vec<&str> {
        pool.iter().map(|a| a.name()).collect()
    }

    #[test]
    fn builtin_catalog_has_twelve_unique_animals() {
        let catalog = AnimalCatalog::builtin();
        assert_eq!(catalog.len(), 12);
        let unique: HashSet<_> = catalog.iter().map(|a| a.name()).collect();
        assert_eq!(unique.len(), 12);
        assert_eq!(catalog.get(0).unwrap().arabic_name(), "أسد");
        assert_eq!(
            catalog.find("Cat").unwrap().image(),
            "https://picsum.photos/seed/cat/400"
        );
    }

    #[test]
    fn pool_window_moves_two_per_level() {
        let catalog = AnimalCatalog::builtin();
        assert_eq!(
            names(&catalog.level_pool(level(1))),
            ["Lion", "Cat", "Dog", "Elephant"]
        );
        assert_eq!(
            names(&catalog.level_pool(level(2))),
            ["Dog", "Elephant", "Bird", "Cow"]
        );
    }

    #[test]
    fn pool_wraps_around_the_catalog() {
        let catalog = AnimalCatalog::builtin();
        assert_eq!(
            names(&catalog.level_pool(level(6))),
            ["Rooster", "Snake", "Lion", "Cat"]
        );
        // 12 animals, offset cycles every 6 levels
        assert_eq!(catalog.level_pool(level(7)), catalog.level_pool(level(1)));
    }

    #[test]
    fn pool_always_has_distinct_entries() {
        let catalog = AnimalCatalog::builtin();
        for id in 1..=50 {
            let pool = catalog.level_pool(level(id));
            assert_eq!(pool.len(), POOL_SIZE);
            let unique: HashSet<_> = pool.iter().map(|a| a.name()).collect();
            assert_eq!(unique.len(), POOL_SIZE, "level {id}");
        }
    }

    #[test]
    fn smallest_catalog_pool_is_the_whole_catalog() {
        let animals = ["A", "B", "C", "D"]
            .iter()
            .map(|n| Animal::new(*n, *n, "", "", ""))
            .collect();
        let catalog = AnimalCatalog::new(animals).unwrap();
        for id in 1..=5 {
            let mut pool = names(&catalog.level_pool(level(id)))
                .into_iter()
                .map(str::to_owned)
                .collect::<Vec<_>>();
            pool.sort();
            assert_eq!(pool, ["A", "B", "C", "D"]);
        }
    }

    #[test]
    fn rejects_small_or_duplicate_catalogs() {
        let small = vec![Animal::new("A", "", "", "", "")];
        assert_eq!(
            AnimalCatalog::new(small),
            Err(CatalogError::TooSmall { len: 1, min: 4 })
        );

        let dupes = ["A", "B", "A", "C"]
            .iter()
            .map(|n| Animal::new(*n, "", "", "", ""))
            .collect();
        assert_eq!(
            AnimalCatalog::new(dupes),
            Err(CatalogError::DuplicateName("A".into()))
        );
    }
}
