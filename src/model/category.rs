use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Default category set inserted by the startup seed when the collection is
/// empty. Order in this slice becomes the display order.
pub const DEFAULT_CATEGORIES: [&str; 8] = [
    "Soups",
    "Appetizers (Veg)",
    "Appetizers (Non-Veg)",
    "Entree (Veg)",
    "Entree (Non-Veg)",
    "Main Course",
    "Desserts",
    "Drinks",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuCategory {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub slug: String,
    pub order: i32,
    pub is_active: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Lowercase, non-alphanumeric runs collapsed to single dashes, trimmed.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true; // suppress a leading dash
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Main Course"), "main-course");
        assert_eq!(slugify("Drinks"), "drinks");
    }

    #[test]
    fn test_slugify_collapses_punctuation() {
        assert_eq!(slugify("Appetizers (Veg)"), "appetizers-veg");
        assert_eq!(slugify("Entree (Non-Veg)"), "entree-non-veg");
    }

    #[test]
    fn test_slugify_trims_edges() {
        assert_eq!(slugify("  Soups!  "), "soups");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_default_slugs_are_unique() {
        let mut slugs: Vec<String> = DEFAULT_CATEGORIES.iter().map(|n| slugify(n)).collect();
        slugs.sort();
        slugs.dedup();
        assert_eq!(slugs.len(), DEFAULT_CATEGORIES.len());
    }
}
