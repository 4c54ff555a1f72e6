use std::collections::HashMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::shopping::aisle::get_aisle;
use crate::shopping::models::{non_empty, ConsolidatedItem};

pub const OTHER_GROUP: &str = "OTHER";
pub const CUSTOM_GROUP: &str = "CUSTOM";

const DEFAULT_RECIPE_NAME: &str = "Recipe";
const OTHER_GROUP_NAME: &str = "Other Items";
const CUSTOM_GROUP_NAME: &str = "Custom Items";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Recipe(String),
    /// Catalog foods added outside of any recipe.
    Other,
    /// Free-text items typed in by the user.
    Custom,
    Aisle(String),
}

impl GroupKey {
    pub fn as_str(&self) -> &str {
        match self {
            GroupKey::Recipe(id) => id,
            GroupKey::Other => OTHER_GROUP,
            GroupKey::Custom => CUSTOM_GROUP,
            GroupKey::Aisle(aisle) => aisle,
        }
    }

    // Recipe and aisle groups sort among themselves; OTHER then CUSTOM always trail.
    fn tail_rank(&self) -> u8 {
        match self {
            GroupKey::Recipe(_) | GroupKey::Aisle(_) => 0,
            GroupKey::Other => 1,
            GroupKey::Custom => 2,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for GroupKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Group key to items, remembering the order in which keys were first seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedItems {
    groups: Vec<(GroupKey, Vec<ConsolidatedItem>)>,
    index: HashMap<GroupKey, usize>,
}

impl GroupedItems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: GroupKey, item: ConsolidatedItem) {
        match self.index.get(&key) {
            Some(&idx) => self.groups[idx].1.push(item),
            None => {
                self.index.insert(key.clone(), self.groups.len());
                self.groups.push((key, vec![item]));
            }
        }
    }

    pub fn get(&self, key: &GroupKey) -> Option<&[ConsolidatedItem]> {
        self.index.get(key).map(|&idx| self.groups[idx].1.as_slice())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &GroupKey> {
        self.groups.iter().map(|(key, _)| key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &[ConsolidatedItem])> {
        self.groups.iter().map(|(key, items)| (key, items.as_slice()))
    }
}

impl IntoIterator for GroupedItems {
    type Item = (GroupKey, Vec<ConsolidatedItem>);
    type IntoIter = std::vec::IntoIter<(GroupKey, Vec<ConsolidatedItem>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

/// A titled section of the rendered shopping list.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DisplayGroup {
    pub key: GroupKey,
    pub name: String,
    pub items: Vec<ConsolidatedItem>,
}

pub fn recipe_group_key(item: &ConsolidatedItem) -> GroupKey {
    if let Some(recipe_id) = non_empty(item.item.recipe_id.as_deref()) {
        GroupKey::Recipe(recipe_id.to_string())
    } else if item.item.food.is_some() {
        GroupKey::Other
    } else {
        GroupKey::Custom
    }
}

pub fn group_by_recipe(items: &[ConsolidatedItem]) -> GroupedItems {
    group_with(items, recipe_group_key)
}

pub fn group_by_aisle(items: &[ConsolidatedItem]) -> GroupedItems {
    group_with(items, |item| GroupKey::Aisle(get_aisle(&item.item)))
}

fn group_with(items: &[ConsolidatedItem], key_of: impl Fn(&ConsolidatedItem) -> GroupKey) -> GroupedItems {
    let mut grouped = GroupedItems::new();
    for item in items {
        grouped.push(key_of(item), item.clone());
    }
    grouped
}

fn first_with_recipe<'a>(items: &'a [ConsolidatedItem], recipe_id: &str) -> Option<&'a ConsolidatedItem> {
    items
        .iter()
        .find(|i| i.item.recipe_id.as_deref() == Some(recipe_id))
}

fn group_name(key: &GroupKey, items: &[ConsolidatedItem]) -> String {
    match key {
        GroupKey::Recipe(recipe_id) => items
            .iter()
            .find(|i| i.item.recipe_id.as_deref() == Some(recipe_id.as_str()) && i.item.recipe.is_some())
            .and_then(|i| i.item.recipe.as_ref())
            .map(|r| r.name.clone())
            .unwrap_or_else(|| DEFAULT_RECIPE_NAME.to_string()),
        GroupKey::Other => OTHER_GROUP_NAME.to_string(),
        GroupKey::Custom => CUSTOM_GROUP_NAME.to_string(),
        GroupKey::Aisle(aisle) => aisle.clone(),
    }
}

// Catalog id of the recipe's first item; FatSecret ids are numeric strings.
fn recipe_sort_value(key: &GroupKey, items: &[ConsolidatedItem]) -> f64 {
    let GroupKey::Recipe(recipe_id) = key else {
        return 0.0;
    };
    let Some(food) = first_with_recipe(items, recipe_id).and_then(|i| i.item.food.as_ref()) else {
        return 0.0;
    };
    if let Some(spoonacular_id) = food.spoonacular_id.filter(|id| *id != 0) {
        return spoonacular_id as f64;
    }
    non_empty(food.fat_secret_id.as_deref())
        .and_then(|id| id.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Orders recipe groups for display and attaches their names.
///
/// `items` is the full consolidated list the groups were built from; names and
/// sort values are looked up there. OTHER and CUSTOM always come last, in that order.
pub fn sort_recipe_groups(grouped: GroupedItems, items: &[ConsolidatedItem]) -> Vec<DisplayGroup> {
    let mut ranked: Vec<(f64, DisplayGroup)> = grouped
        .into_iter()
        .map(|(key, group_items)| {
            let sort_value = recipe_sort_value(&key, items);
            let name = group_name(&key, items);
            (
                sort_value,
                DisplayGroup {
                    key,
                    name,
                    items: group_items,
                },
            )
        })
        .collect();

    // sort_by is stable, so equal values keep first-seen order.
    ranked.sort_by(|(a_value, a), (b_value, b)| {
        a.key
            .tail_rank()
            .cmp(&b.key.tail_rank())
            .then_with(|| a_value.total_cmp(b_value))
    });

    ranked.into_iter().map(|(_, group)| group).collect()
}

/// Aisle groups in first-seen order, each titled with its aisle.
pub fn aisle_display_groups(grouped: GroupedItems) -> Vec<DisplayGroup> {
    grouped
        .into_iter()
        .map(|(key, items)| DisplayGroup {
            name: key.as_str().to_string(),
            key,
            items,
        })
        .collect()
}
