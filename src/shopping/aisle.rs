use crate::shopping::models::ShoppingItem;

pub const PACKAGED_FOODS_AISLE: &str = "Packaged Foods";
pub const OTHER_AISLE: &str = "Other";

const BRAND_FOOD_TYPE: &str = "Brand";

/// Resolves the single aisle an item is shelved under.
///
/// Foods listed in several aisles ("Produce; Bakery") land in the first one.
/// Branded foods without aisle data go to "Packaged Foods", everything else to "Other".
pub fn get_aisle(item: &ShoppingItem) -> String {
    let Some(food) = item.food.as_ref() else {
        return OTHER_AISLE.to_string();
    };

    if let Some(first) = food
        .aisle
        .as_deref()
        .and_then(|aisles| aisles.split(';').map(str::trim).find(|s| !s.is_empty()))
    {
        return first.to_string();
    }

    if food.food_type.as_deref() == Some(BRAND_FOOD_TYPE) {
        PACKAGED_FOODS_AISLE.to_string()
    } else {
        OTHER_AISLE.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shopping::models::FoodRef;

    fn item_with_food(food: FoodRef) -> ShoppingItem {
        ShoppingItem {
            id: "1".to_string(),
            food: Some(food),
            ..Default::default()
        }
    }

    #[test]
    fn test_first_aisle_wins() {
        let item = item_with_food(FoodRef {
            aisle: Some("Produce; Bakery".to_string()),
            ..Default::default()
        });
        assert_eq!(get_aisle(&item), "Produce");
    }

    #[test]
    fn test_empty_segments_skipped() {
        let item = item_with_food(FoodRef {
            aisle: Some(" ; ;Spices and Seasonings;Baking".to_string()),
            ..Default::default()
        });
        assert_eq!(get_aisle(&item), "Spices and Seasonings");
    }

    #[test]
    fn test_brand_falls_back_to_packaged_foods() {
        let item = item_with_food(FoodRef {
            food_type: Some("Brand".to_string()),
            ..Default::default()
        });
        assert_eq!(get_aisle(&item), "Packaged Foods");

        let blank_aisle = item_with_food(FoodRef {
            food_type: Some("Brand".to_string()),
            aisle: Some(" ; ".to_string()),
            ..Default::default()
        });
        assert_eq!(get_aisle(&blank_aisle), "Packaged Foods");
    }

    #[test]
    fn test_other_fallback() {
        assert_eq!(get_aisle(&ShoppingItem::default()), "Other");
        let generic = item_with_food(FoodRef {
            food_type: Some("Generic".to_string()),
            ..Default::default()
        });
        assert_eq!(get_aisle(&generic), "Other");
    }
}
