//! Menu items and catalog queries.
//!
//! The menu page lets diners narrow the catalog by category and dietary
//! option and reorder it by price or rating. [`MenuQuery`] captures those
//! choices and applies them to a slice of [`MenuItem`]s.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{MenuItemId, Price};

/// Menu section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    MainCourses,
    Appetizers,
    Desserts,
    Drinks,
}

impl Category {
    /// All categories in menu order.
    pub const ALL: [Self; 4] = [
        Self::MainCourses,
        Self::Appetizers,
        Self::Desserts,
        Self::Drinks,
    ];

    /// Wire/URL name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MainCourses => "main-courses",
            Self::Appetizers => "appetizers",
            Self::Desserts => "desserts",
            Self::Drinks => "drinks",
        }
    }
}

/// Dietary option an item satisfies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dietary {
    Vegetarian,
    Vegan,
    GlutenFree,
}

impl Dietary {
    /// Wire/URL name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Vegetarian => "vegetarian",
            Self::Vegan => "vegan",
            Self::GlutenFree => "gluten-free",
        }
    }
}

/// Heat of a dish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpicyLevel {
    Mild,
    Medium,
    Hot,
}

impl SpicyLevel {
    /// Wire and display name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mild => "mild",
            Self::Medium => "medium",
            Self::Hot => "hot",
        }
    }
}

/// Ordering applied to a menu listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Catalog order.
    #[default]
    Recommended,
    PriceLow,
    PriceHigh,
    /// Highest rated first.
    Rating,
}

impl SortOrder {
    /// Wire/URL name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Rating => "rating",
        }
    }
}

macro_rules! impl_text_enum {
    ($ty:ty, $kind:literal, [$($variant:path),+ $(,)?]) => {
        impl ::std::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $ty {
            type Err = MenuFilterError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                [$($variant),+]
                    .into_iter()
                    .find(|candidate| candidate.as_str() == s)
                    .ok_or_else(|| MenuFilterError::Unknown {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

impl_text_enum!(Category, "category", [
    Category::MainCourses,
    Category::Appetizers,
    Category::Desserts,
    Category::Drinks,
]);
impl_text_enum!(Dietary, "dietary option", [
    Dietary::Vegetarian,
    Dietary::Vegan,
    Dietary::GlutenFree,
]);
impl_text_enum!(SpicyLevel, "spicy level", [
    SpicyLevel::Mild,
    SpicyLevel::Medium,
    SpicyLevel::Hot,
]);
impl_text_enum!(SortOrder, "sort order", [
    SortOrder::Recommended,
    SortOrder::PriceLow,
    SortOrder::PriceHigh,
    SortOrder::Rating,
]);

/// Invalid menu filter value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MenuFilterError {
    #[error("unknown {kind}: {value}")]
    Unknown { kind: &'static str, value: String },
}

/// A dish or drink on the menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub image: String,
    pub category: Category,
    #[serde(default)]
    pub dietary: Vec<Dietary>,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub prep_time: Option<String>,
    #[serde(default)]
    pub spicy_level: Option<SpicyLevel>,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub is_popular: bool,
}

impl MenuItem {
    /// Returns `true` if the item is suitable for the given diet.
    #[must_use]
    pub fn suits(&self, dietary: Dietary) -> bool {
        self.dietary.contains(&dietary)
    }
}

/// Filter and ordering for a menu listing.
///
/// `None` filters mean "all".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MenuQuery {
    pub category: Option<Category>,
    pub dietary: Option<Dietary>,
    pub sort: SortOrder,
}

impl MenuQuery {
    /// Build a query from raw request values.
    ///
    /// Missing, empty and `"all"` values select everything; a missing sort
    /// keeps catalog order.
    ///
    /// # Errors
    ///
    /// Returns `MenuFilterError` if a value is not a known category, dietary
    /// option or sort order.
    pub fn parse(
        category: Option<&str>,
        dietary: Option<&str>,
        sort: Option<&str>,
    ) -> Result<Self, MenuFilterError> {
        Ok(Self {
            category: parse_filter(category)?,
            dietary: parse_filter(dietary)?,
            sort: match sort {
                None | Some("") => SortOrder::default(),
                Some(value) => value.parse()?,
            },
        })
    }

    /// Returns `true` if the item passes the category and dietary filters.
    #[must_use]
    pub fn matches(&self, item: &MenuItem) -> bool {
        self.category.is_none_or(|category| item.category == category)
            && self.dietary.is_none_or(|dietary| item.suits(dietary))
    }

    /// Filter and order items. Ties keep catalog order.
    #[must_use]
    pub fn apply<'a>(&self, items: &'a [MenuItem]) -> Vec<&'a MenuItem> {
        let mut selected: Vec<&MenuItem> = items.iter().filter(|item| self.matches(item)).collect();

        match self.sort {
            SortOrder::Recommended => {}
            SortOrder::PriceLow => selected.sort_by(|a, b| a.price.cmp(&b.price)),
            SortOrder::PriceHigh => selected.sort_by(|a, b| b.price.cmp(&a.price)),
            SortOrder::Rating => selected.sort_by(|a, b| by_rating_desc(a, b)),
        }

        selected
    }
}

fn by_rating_desc(a: &MenuItem, b: &MenuItem) -> Ordering {
    b.rating.total_cmp(&a.rating)
}

fn parse_filter<T>(value: Option<&str>) -> Result<Option<T>, MenuFilterError>
where
    T: std::str::FromStr<Err = MenuFilterError>,
{
    match value {
        None | Some("" | "all") => Ok(None),
        Some(value) => value.parse().map(Some),
    }
}
