use std::collections::HashMap;

use tracing::debug;

use crate::shopping::models::{non_empty, ConsolidatedItem, ShoppingItem};

/// What makes two shopping items "the same thing to buy".
///
/// Catalog foods are matched on their catalog id, serving unit and notes.
/// Anything else only ever matches itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemIdentity {
    Spoonacular {
        spoonacular_id: i64,
        measurement_description: String,
        notes: String,
    },
    FatSecret {
        fat_secret_id: String,
        serving_id: String,
        notes: String,
    },
    Unique(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConsolidationKey {
    /// `Some(recipe)` when merging is scoped per recipe; the inner `None` is an item with no recipe.
    pub recipe_scope: Option<Option<String>>,
    pub identity: ItemIdentity,
}

impl ConsolidationKey {
    pub fn for_item(item: &ShoppingItem, group_by_recipe: bool) -> Self {
        let identity = item_identity(item);
        let recipe_scope = match identity {
            ItemIdentity::Unique(_) => None,
            _ if group_by_recipe => Some(non_empty(item.recipe_id.as_deref()).map(str::to_string)),
            _ => None,
        };
        Self {
            recipe_scope,
            identity,
        }
    }
}

fn item_identity(item: &ShoppingItem) -> ItemIdentity {
    let food = item.food.as_ref();
    let serving = item.serving.as_ref();
    let notes = item.notes.clone().unwrap_or_default();

    let spoonacular_id = food.and_then(|f| f.spoonacular_id).filter(|id| *id != 0);
    let measurement = serving.and_then(|s| non_empty(s.measurement_description.as_deref()));
    if let (Some(spoonacular_id), Some(measurement)) = (spoonacular_id, measurement) {
        return ItemIdentity::Spoonacular {
            spoonacular_id,
            measurement_description: measurement.to_string(),
            notes,
        };
    }

    let fat_secret_id = food.and_then(|f| non_empty(f.fat_secret_id.as_deref()));
    let serving_id = serving.and_then(|s| non_empty(s.id.as_deref()));
    if let (Some(fat_secret_id), Some(serving_id)) = (fat_secret_id, serving_id) {
        return ItemIdentity::FatSecret {
            fat_secret_id: fat_secret_id.to_string(),
            serving_id: serving_id.to_string(),
            notes,
        };
    }

    ItemIdentity::Unique(item.id.clone())
}

/// Merges duplicate shopping items into single entries with summed servings.
///
/// With `group_by_recipe` set, the same food in two different recipes stays
/// as two entries. Output keeps the order in which each entry was first seen.
pub fn consolidate_items(items: &[ShoppingItem], group_by_recipe: bool) -> Vec<ConsolidatedItem> {
    merge(
        items.iter().cloned().map(ConsolidatedItem::new),
        group_by_recipe,
    )
}

/// Consolidates an already consolidated list, carrying over every merged id.
pub fn reconsolidate(items: Vec<ConsolidatedItem>, group_by_recipe: bool) -> Vec<ConsolidatedItem> {
    merge(items, group_by_recipe)
}

fn merge(
    items: impl IntoIterator<Item = ConsolidatedItem>,
    group_by_recipe: bool,
) -> Vec<ConsolidatedItem> {
    let mut consolidated: Vec<ConsolidatedItem> = Vec::new();
    let mut index_by_key: HashMap<ConsolidationKey, usize> = HashMap::new();
    let mut input_count = 0usize;

    for incoming in items {
        input_count += 1;
        let key = ConsolidationKey::for_item(&incoming.item, group_by_recipe);
        match index_by_key.get(&key) {
            Some(&idx) => {
                let existing = &mut consolidated[idx];
                existing.item.number_of_servings = Some(existing.servings() + incoming.servings());
                existing.consolidated_ids.extend(incoming.consolidated_ids);
            }
            None => {
                index_by_key.insert(key, consolidated.len());
                consolidated.push(incoming);
            }
        }
    }

    debug!(
        input_count,
        output_count = consolidated.len(),
        group_by_recipe,
        "consolidated shopping items"
    );
    consolidated
}
