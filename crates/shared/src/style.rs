//! Display attributes for categories, shared by every renderer.

use crate::domain::{Category, CategoryFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    Blue,
    Green,
    Magenta,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryStyle {
    pub icon: &'static str,
    pub label: &'static str,
    pub accent: Accent,
}

pub fn category_style(category: Category) -> CategoryStyle {
    match category {
        Category::Work => CategoryStyle {
            icon: "💼",
            label: "Work",
            accent: Accent::Blue,
        },
        Category::Personal => CategoryStyle {
            icon: "🏠",
            label: "Personal",
            accent: Accent::Green,
        },
        Category::Other => CategoryStyle {
            icon: "📌",
            label: "Other",
            accent: Accent::Magenta,
        },
    }
}

pub fn filter_style(filter: CategoryFilter) -> CategoryStyle {
    match filter {
        CategoryFilter::All => CategoryStyle {
            icon: "📊",
            label: "All Events",
            accent: Accent::Neutral,
        },
        CategoryFilter::Only(category) => category_style(category),
    }
}
