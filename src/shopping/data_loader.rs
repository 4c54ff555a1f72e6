use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use std::path::Path;
use tracing::{debug, warn};

use crate::shopping::models::{FoodRef, RecipeRef, ServingRef, ShoppingItem};

// Column headers of the flattened CSV export
const ID_COL: &str = "id";
const RECIPE_ID_COL: &str = "recipe_id";
const RECIPE_NAME_COL: &str = "recipe_name";
const NAME_COL: &str = "name";
const FOOD_NAME_COL: &str = "food_name";
const SPOONACULAR_ID_COL: &str = "spoonacular_id";
const FAT_SECRET_ID_COL: &str = "fat_secret_id";
const FOOD_TYPE_COL: &str = "food_type";
const AISLE_COL: &str = "aisle";
const IMAGE_URL_COL: &str = "image_url";
const SERVING_ID_COL: &str = "serving_id";
const MEASUREMENT_COL: &str = "measurement_description";
const SERVINGS_COL: &str = "number_of_servings";
const NOTES_COL: &str = "notes";
const CHECKED_COL: &str = "is_checked";

struct ColumnIndex {
    id: usize,
    recipe_id: Option<usize>,
    recipe_name: Option<usize>,
    name: Option<usize>,
    food_name: Option<usize>,
    spoonacular_id: Option<usize>,
    fat_secret_id: Option<usize>,
    food_type: Option<usize>,
    aisle: Option<usize>,
    image_url: Option<usize>,
    serving_id: Option<usize>,
    measurement_description: Option<usize>,
    number_of_servings: Option<usize>,
    notes: Option<usize>,
    is_checked: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |col: &str| headers.iter().position(|h| h.trim() == col);
        Ok(Self {
            id: find(ID_COL).ok_or_else(|| anyhow::anyhow!("Column '{}' not found", ID_COL))?,
            recipe_id: find(RECIPE_ID_COL),
            recipe_name: find(RECIPE_NAME_COL),
            name: find(NAME_COL),
            food_name: find(FOOD_NAME_COL),
            spoonacular_id: find(SPOONACULAR_ID_COL),
            fat_secret_id: find(FAT_SECRET_ID_COL),
            food_type: find(FOOD_TYPE_COL),
            aisle: find(AISLE_COL),
            image_url: find(IMAGE_URL_COL),
            serving_id: find(SERVING_ID_COL),
            measurement_description: find(MEASUREMENT_COL),
            number_of_servings: find(SERVINGS_COL),
            notes: find(NOTES_COL),
            is_checked: find(CHECKED_COL),
        })
    }
}

fn cell(record: &StringRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_bool(s: &str) -> bool {
    matches!(s.to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "y" | "x")
}

fn item_from_record(record: &StringRecord, cols: &ColumnIndex) -> Option<ShoppingItem> {
    let id = cell(record, Some(cols.id))?;

    let food = FoodRef {
        name: cell(record, cols.food_name),
        spoonacular_id: cell(record, cols.spoonacular_id).and_then(|s| s.parse::<i64>().ok()),
        fat_secret_id: cell(record, cols.fat_secret_id),
        food_type: cell(record, cols.food_type),
        aisle: cell(record, cols.aisle),
        image_url: cell(record, cols.image_url),
    };
    let serving = ServingRef {
        id: cell(record, cols.serving_id),
        measurement_description: cell(record, cols.measurement_description),
    };

    Some(ShoppingItem {
        id,
        recipe_id: cell(record, cols.recipe_id),
        recipe: cell(record, cols.recipe_name).map(|name| RecipeRef { name }),
        food: (food != FoodRef::default()).then_some(food),
        serving: (serving != ServingRef::default()).then_some(serving),
        number_of_servings: cell(record, cols.number_of_servings).and_then(|s| s.parse::<f64>().ok()),
        notes: cell(record, cols.notes),
        name: cell(record, cols.name),
        is_checked: cell(record, cols.is_checked).is_some_and(|s| parse_bool(&s)),
    })
}

/// Parses the flattened CSV export, one row per shopping item.
///
/// Only the `id` column is mandatory. Rows with a blank id are skipped.
pub fn parse_items_csv(bytes: &[u8]) -> Result<Vec<ShoppingItem>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = rdr.headers()?.clone();
    let cols = ColumnIndex::from_headers(&headers)?;

    let mut items = Vec::new();
    for (row_index, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read record at row index {}", row_index))?;
        match item_from_record(&record, &cols) {
            Some(item) => items.push(item),
            None => warn!(row_index, "skipping shopping item row with blank id"),
        }
    }

    if items.is_empty() {
        return Err(anyhow::anyhow!("No shopping items loaded"));
    }
    Ok(items)
}

/// Parses a JSON array of items as returned by the item store.
pub fn parse_items_json(content: &str) -> Result<Vec<ShoppingItem>> {
    let items: Vec<ShoppingItem> =
        serde_json::from_str(content).context("Failed to parse shopping items JSON")?;
    if items.is_empty() {
        return Err(anyhow::anyhow!("No shopping items loaded"));
    }
    Ok(items)
}

pub async fn load_items_csv(path: &Path) -> Result<Vec<ShoppingItem>> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read shopping items CSV at {:?}", path))?;
    parse_items_csv(&bytes).with_context(|| format!("Invalid shopping items CSV at {:?}", path))
}

pub async fn load_items_json(path: &Path) -> Result<Vec<ShoppingItem>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read shopping items JSON at {:?}", path))?;
    parse_items_json(&content).with_context(|| format!("Invalid shopping items JSON at {:?}", path))
}

/// Loads items from `path`, picking the format from the file extension.
pub async fn load_items(path: &Path) -> Result<Vec<ShoppingItem>> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    let items = if is_csv {
        load_items_csv(path).await?
    } else {
        load_items_json(path).await?
    };
    debug!(count = items.len(), path = %path.display(), "loaded shopping items");
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FULL_HEADER: &str = "id,recipe_id,recipe_name,name,spoonacular_id,fat_secret_id,food_type,aisle,image_url,serving_id,measurement_description,number_of_servings,notes,is_checked";

    #[test]
    fn test_parse_items_csv_success() -> Result<()> {
        let csv = format!(
            "{}\n{}\n{}\n{}\n{}\n",
            FULL_HEADER,
            "1,r1,Chili,,11215,,,Produce;Spices,,,clove,2,minced,false",
            "2,,,,,4881,Brand,,,12034,,1,,true",
            ",,,,,,,,,,,,,", // blank id
            "3,,,Paper towels,,,,,,,,abc,,",
        );
        let items = parse_items_csv(csv.as_bytes())?;
        assert_eq!(items.len(), 3);

        let garlic = &items[0];
        assert_eq!(garlic.recipe_id.as_deref(), Some("r1"));
        assert_eq!(garlic.recipe.as_ref().map(|r| r.name.as_str()), Some("Chili"));
        assert_eq!(garlic.food.as_ref().unwrap().spoonacular_id, Some(11215));
        assert_eq!(garlic.serving.as_ref().unwrap().measurement_description.as_deref(), Some("clove"));
        assert_eq!(garlic.number_of_servings, Some(2.0));
        assert_eq!(garlic.notes.as_deref(), Some("minced"));
        assert!(!garlic.is_checked);

        let branded = &items[1];
        assert_eq!(branded.food.as_ref().unwrap().fat_secret_id.as_deref(), Some("4881"));
        assert_eq!(branded.serving.as_ref().unwrap().id.as_deref(), Some("12034"));
        assert!(branded.is_checked);
        assert!(branded.recipe.is_none());

        let custom = &items[2];
        assert!(custom.food.is_none());
        assert!(custom.serving.is_none());
        assert_eq!(custom.name.as_deref(), Some("Paper towels"));
        assert_eq!(custom.number_of_servings, None); // "abc" is not a number
        Ok(())
    }

    #[test]
    fn test_parse_items_csv_optional_columns_absent() -> Result<()> {
        let items = parse_items_csv(b"id,name\n9,Napkins\n")?;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name.as_deref(), Some("Napkins"));
        Ok(())
    }

    #[test]
    fn test_parse_items_csv_missing_id_column() {
        let result = parse_items_csv(b"name,notes\nNapkins,\n");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Column 'id' not found"));
    }

    #[test]
    fn test_parse_items_csv_headers_only() {
        let result = parse_items_csv(format!("{}\n", FULL_HEADER).as_bytes());
        assert!(result.unwrap_err().to_string().contains("No shopping items loaded"));
    }

    #[test]
    fn test_parse_items_json_empty_array() {
        assert!(parse_items_json("[]").is_err());
        assert!(parse_items_json("{ not json").is_err());
    }

    #[tokio::test]
    async fn test_load_items_dispatches_on_extension() -> Result<()> {
        let mut csv_file = tempfile::Builder::new().suffix(".csv").tempfile()?;
        writeln!(csv_file, "id,name")?;
        writeln!(csv_file, "1,Ice")?;
        csv_file.flush()?;
        let from_csv = load_items(csv_file.path()).await?;
        assert_eq!(from_csv[0].name.as_deref(), Some("Ice"));

        let mut json_file = NamedTempFile::new()?;
        write!(json_file, r#"[{{"id": "j1", "notes": "cold"}}]"#)?;
        json_file.flush()?;
        let from_json = load_items(json_file.path()).await?;
        assert_eq!(from_json[0].id, "j1");
        assert_eq!(from_json[0].notes.as_deref(), Some("cold"));
        Ok(())
    }

    #[tokio::test]
    async fn test_load_items_file_not_found() {
        let result = load_items(Path::new("this_file_does_not_exist.json")).await;
        assert!(result.is_err());
        assert!(format!("{:#}", result.unwrap_err()).contains("Failed to read shopping items JSON"));
    }
}
