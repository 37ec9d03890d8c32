use std::path::{Path, PathBuf};

/* ───────────────────────── asset naming ─────────────────────────── */

/// Canonical asset extension. The asset layer serves
/// `<root>/<name><suffix>.webp`; there is no content negotiation.
pub const ASSET_EXTENSION: &str = "webp";

/// Which rendition of an asset to request. `Small` is the reduced-size
/// variant used by the denser layouts.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum AssetVariant {
    Full,
    Small,
}

impl AssetVariant {
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Full => "",
            Self::Small => "-small",
        }
    }
}

/// Resolve the on-disk path for an image. Naming is a fixed contract
/// with the asset directory: basename + variant suffix + extension.
pub fn asset_path(root: &Path, name: &str, variant: AssetVariant) -> PathBuf {
    root.join(format!("{name}{}.{ASSET_EXTENSION}", variant.suffix()))
}

/* ───────────────────────── domain types ─────────────────────────── */

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Category {
    Car,
    Forest,
    Beach,
    Watch,
}

impl Category {
    pub fn all() -> [Self; 4] {
        [Self::Car, Self::Forest, Self::Beach, Self::Watch]
    }
    pub fn label(self) -> &'static str {
        match self {
            Self::Car => "Car",
            Self::Forest => "Forest",
            Self::Beach => "Beach",
            Self::Watch => "Watch",
        }
    }
}

/// One catalog entry. `name` doubles as the unique identity and the
/// asset basename. Entries are immutable for the lifetime of the app.
#[derive(Clone, Debug)]
pub struct CatalogItem {
    pub name: &'static str,
    pub tags: [&'static str; 3],
    pub category: Category,
}

/// The fixed image catalog. Compiled in; no loading step.
pub static CATALOG: &[CatalogItem] = &[
    CatalogItem { name: "beach-with-palms", tags: ["beach", "palms", "water"], category: Category::Beach },
    CatalogItem { name: "beach-with-palms2", tags: ["beach", "palms", "sand"], category: Category::Beach },
    CatalogItem { name: "beach", tags: ["beach", "sand", "water"], category: Category::Beach },
    CatalogItem { name: "bmw-m2", tags: ["car", "bmw", "fast"], category: Category::Car },
    CatalogItem { name: "audi-r8", tags: ["car", "audi", "sport"], category: Category::Car },
    CatalogItem { name: "mercedes-gt", tags: ["car", "mercedes", "yellow"], category: Category::Car },
    CatalogItem { name: "forest-fog", tags: ["trees", "fog", "beautiful"], category: Category::Forest },
    CatalogItem { name: "forest-green", tags: ["green", "trees", "grass"], category: Category::Forest },
    CatalogItem { name: "forest-lake", tags: ["lake", "mountain", "people"], category: Category::Forest },
    CatalogItem { name: "classy-watch", tags: ["suit", "classy", "rolex"], category: Category::Watch },
    CatalogItem { name: "rolex", tags: ["rolex", "shiny", "expensive"], category: Category::Watch },
    CatalogItem { name: "smart-watch", tags: ["smart", "technology", "apple"], category: Category::Watch },
    CatalogItem { name: "tissot-watch", tags: ["vintage", "tissot", "classy"], category: Category::Watch },
];
