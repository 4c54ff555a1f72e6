use serde::{Deserialize, Deserializer, Serialize};

/// Denormalized recipe snapshot carried on recipe-linked items.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct RecipeRef {
    pub name: String,
}

/// Catalog food entry (Spoonacular or FatSecret backed).
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct FoodRef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub spoonacular_id: Option<i64>,
    #[serde(default)]
    pub fat_secret_id: Option<String>,
    #[serde(default)]
    pub food_type: Option<String>,
    /// Semicolon-delimited list of store aisles, left-most wins.
    #[serde(default)]
    pub aisle: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ServingRef {
    #[serde(default, deserialize_with = "deserialize_serving_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub measurement_description: Option<String>,
}

/// One row of the shopping list as fetched from the item store.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ShoppingItem {
    pub id: String,
    #[serde(default)]
    pub recipe_id: Option<String>,
    #[serde(default)]
    pub recipe: Option<RecipeRef>,
    #[serde(default)]
    pub food: Option<FoodRef>,
    #[serde(default)]
    pub serving: Option<ServingRef>,
    #[serde(default)]
    pub number_of_servings: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_as_false")]
    pub is_checked: bool,
}

/// A shopping item standing in for one or more merged inputs.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ConsolidatedItem {
    #[serde(flatten)]
    pub item: ShoppingItem,
    #[serde(rename = "consolidatedIds")]
    pub consolidated_ids: Vec<String>,
}

impl ConsolidatedItem {
    pub fn new(item: ShoppingItem) -> Self {
        let consolidated_ids = vec![item.id.clone()];
        Self {
            item,
            consolidated_ids,
        }
    }

    pub fn servings(&self) -> f64 {
        self.item.number_of_servings.unwrap_or(0.0)
    }

    /// Name shown on the list: custom name, then the catalog food name, then the item id.
    pub fn display_name(&self) -> &str {
        self.item
            .name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or_else(|| self.item.food.as_ref().and_then(|f| f.name.as_deref()))
            .unwrap_or(&self.item.id)
    }
}

/// Returns `Some(s)` only for non-blank strings, mirroring the item store's
/// "empty means unset" convention.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

// The store hands out serving ids as numbers for some catalogs and strings for others.
fn deserialize_serving_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "serving id must be a string or number, got {}",
            other
        ))),
    }
}

fn deserialize_null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}
