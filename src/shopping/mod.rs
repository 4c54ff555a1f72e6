pub mod aisle;
pub mod consolidation;
pub mod data_loader;
pub mod grouping;
pub mod models;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::info;

pub use aisle::get_aisle;
pub use consolidation::{consolidate_items, reconsolidate};
pub use data_loader::load_items;
pub use grouping::{
    aisle_display_groups, group_by_aisle, group_by_recipe, sort_recipe_groups, DisplayGroup,
    GroupKey, GroupedItems,
};
pub use models::{ConsolidatedItem, FoodRef, RecipeRef, ServingRef, ShoppingItem};

/// How the shopping list is sectioned on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum GroupMode {
    #[default]
    Recipe,
    Aisle,
}

impl FromStr for GroupMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recipe" => Ok(GroupMode::Recipe),
            "aisle" => Ok(GroupMode::Aisle),
            other => Err(format!("unknown group mode '{}', expected 'recipe' or 'aisle'", other)),
        }
    }
}

impl fmt::Display for GroupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupMode::Recipe => f.write_str("recipe"),
            GroupMode::Aisle => f.write_str("aisle"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShoppingListSummary {
    pub raw_items: usize,
    pub consolidated_items: usize,
    pub groups: usize,
    pub checked_items: usize,
}

impl ShoppingListSummary {
    pub fn from_groups(raw_items: usize, groups: &[DisplayGroup]) -> Self {
        let all_items = groups.iter().flat_map(|g| g.items.iter());
        let (consolidated_items, checked_items) = all_items.fold((0, 0), |(total, checked), item| {
            (total + 1, checked + usize::from(item.item.is_checked))
        });
        Self {
            raw_items,
            consolidated_items,
            groups: groups.len(),
            checked_items,
        }
    }
}

/// Turns the raw item list into the ordered sections shown to the user.
pub fn build_shopping_list(items: &[ShoppingItem], mode: GroupMode) -> Vec<DisplayGroup> {
    let groups = match mode {
        GroupMode::Recipe => {
            let consolidated = consolidate_items(items, true);
            let grouped = group_by_recipe(&consolidated);
            sort_recipe_groups(grouped, &consolidated)
        }
        GroupMode::Aisle => {
            let consolidated = consolidate_items(items, false);
            aisle_display_groups(group_by_aisle(&consolidated))
        }
    };

    let summary = ShoppingListSummary::from_groups(items.len(), &groups);
    info!(
        mode = %mode,
        raw_items = summary.raw_items,
        consolidated_items = summary.consolidated_items,
        groups = summary.groups,
        "built shopping list"
    );
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spoonacular(id: &str, recipe: Option<(&str, &str)>, aisle: &str, servings: f64) -> ShoppingItem {
        ShoppingItem {
            id: id.to_string(),
            recipe_id: recipe.map(|(rid, _)| rid.to_string()),
            recipe: recipe.map(|(_, name)| RecipeRef { name: name.to_string() }),
            food: Some(FoodRef {
                spoonacular_id: Some(20081),
                aisle: Some(aisle.to_string()),
                ..Default::default()
            }),
            serving: Some(ServingRef {
                id: None,
                measurement_description: Some("cup".to_string()),
            }),
            number_of_servings: Some(servings),
            ..Default::default()
        }
    }

    #[test]
    fn test_group_mode_parsing() {
        assert_eq!("Aisle".parse::<GroupMode>(), Ok(GroupMode::Aisle));
        assert_eq!(" recipe ".parse::<GroupMode>(), Ok(GroupMode::Recipe));
        assert!("store".parse::<GroupMode>().is_err());
        assert_eq!(GroupMode::default(), GroupMode::Recipe);
    }

    #[test]
    fn test_recipe_mode_keeps_recipes_apart() {
        let items = vec![
            spoonacular("1", Some(("r1", "Bread")), "Baking", 2.0),
            spoonacular("2", Some(("r2", "Cake")), "Baking", 1.0),
            spoonacular("3", None, "Baking", 1.0),
        ];
        let groups = build_shopping_list(&items, GroupMode::Recipe);
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Bread", "Cake", "Other Items"]);
    }

    #[test]
    fn test_aisle_mode_merges_across_recipes() {
        let items = vec![
            spoonacular("1", Some(("r1", "Bread")), "Baking", 2.0),
            spoonacular("2", Some(("r2", "Cake")), "Baking", 1.0),
        ];
        let groups = build_shopping_list(&items, GroupMode::Aisle);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "Baking");
        assert_eq!(groups[0].items[0].item.number_of_servings, Some(3.0));

        let summary = ShoppingListSummary::from_groups(items.len(), &groups);
        assert_eq!(summary.raw_items, 2);
        assert_eq!(summary.consolidated_items, 1);
        assert_eq!(summary.checked_items, 0);
    }
}
