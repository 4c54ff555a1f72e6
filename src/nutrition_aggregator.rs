use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct NutritionSummary {
    pub calories: Option<f64>,
    pub protein_g: Option<f64>,
    pub carbohydrate_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub fiber_g: Option<f64>,
    pub sugar_g: Option<f64>,
    pub sodium_mg: Option<f64>,
}

// Invokes `$mac!` once per nutrient field.
macro_rules! for_each_nutrient {
    ($mac:ident) => {
        $mac!(calories);
        $mac!(protein_g);
        $mac!(carbohydrate_g);
        $mac!(fat_g);
        $mac!(fiber_g);
        $mac!(sugar_g);
        $mac!(sodium_mg);
    };
}

impl NutritionSummary {
    /// Every reported value multiplied by `factor`; unreported values stay `None`.
    pub fn scaled(&self, factor: f64) -> Self {
        let source = self;
        let mut scaled = NutritionSummary::default();
        macro_rules! scale {
            ($field:ident) => {
                scaled.$field = source.$field.map(|v| v * factor);
            };
        }
        for_each_nutrient!(scale);
        scaled
    }

    pub fn add(&mut self, other: &NutritionSummary) {
        let total = self;
        macro_rules! add_optional {
            ($field:ident) => {
                if let Some(value) = other.$field {
                    total.$field = Some(total.$field.unwrap_or(0.0) + value);
                }
            };
        }
        for_each_nutrient!(add_optional);
    }
}

/// What a meal-plan or food-log entry refers to.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntryKind {
    /// `nutrition` covers the whole recipe, which yields `recipe_servings` servings.
    Recipe {
        recipe_id: String,
        recipe_servings: f64,
        nutrition: NutritionSummary,
    },
    /// `nutrition` is for one catalog serving.
    Food {
        food_id: String,
        nutrition: NutritionSummary,
    },
    /// Quick-add entry typed in by the user, per serving.
    Custom {
        name: String,
        nutrition: NutritionSummary,
    },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NutritionEntry {
    pub profile_id: String,
    #[serde(default)]
    pub number_of_servings: Option<f64>,
    #[serde(flatten)]
    pub kind: EntryKind,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProfileNutrition {
    pub profile_id: String,
    pub entry_count: usize,
    pub totals: NutritionSummary,
}

pub fn per_serving(entry: &NutritionEntry) -> NutritionSummary {
    match &entry.kind {
        EntryKind::Recipe {
            recipe_servings,
            nutrition,
            ..
        } => {
            let servings = if *recipe_servings > 0.0 { *recipe_servings } else { 1.0 };
            nutrition.scaled(1.0 / servings)
        }
        EntryKind::Food { nutrition, .. } | EntryKind::Custom { nutrition, .. } => nutrition.clone(),
    }
}

/// Nutrition actually eaten for one entry.
pub fn entry_contribution(entry: &NutritionEntry) -> NutritionSummary {
    per_serving(entry).scaled(entry.number_of_servings.unwrap_or(1.0))
}

/// Rolls entries up per household profile, in the order profiles first appear.
pub fn aggregate_by_profile(entries: &[NutritionEntry]) -> Vec<ProfileNutrition> {
    let mut rollups: Vec<ProfileNutrition> = Vec::new();
    let mut index_by_profile: HashMap<&str, usize> = HashMap::new();

    for entry in entries {
        let idx = *index_by_profile
            .entry(entry.profile_id.as_str())
            .or_insert_with(|| {
                rollups.push(ProfileNutrition {
                    profile_id: entry.profile_id.clone(),
                    entry_count: 0,
                    totals: NutritionSummary::default(),
                });
                rollups.len() - 1
            });
        let rollup = &mut rollups[idx];
        rollup.entry_count += 1;
        rollup.totals.add(&entry_contribution(entry));
    }

    rollups
}

pub fn daily_average(summary: &NutritionSummary, days: u32) -> NutritionSummary {
    if days == 0 {
        return summary.clone();
    }
    summary.scaled(1.0 / f64::from(days))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn macros(calories: f64, protein_g: f64) -> NutritionSummary {
        NutritionSummary {
            calories: Some(calories),
            protein_g: Some(protein_g),
            ..Default::default()
        }
    }

    fn entry(profile_id: &str, servings: Option<f64>, kind: EntryKind) -> NutritionEntry {
        NutritionEntry {
            profile_id: profile_id.to_string(),
            number_of_servings: servings,
            kind,
        }
    }

    #[test]
    fn test_recipe_entry_divided_by_recipe_servings() {
        let e = entry(
            "p1",
            Some(2.0),
            EntryKind::Recipe {
                recipe_id: "r1".to_string(),
                recipe_servings: 4.0,
                nutrition: macros(2000.0, 80.0),
            },
        );
        assert_eq!(per_serving(&e), macros(500.0, 20.0));
        assert_eq!(entry_contribution(&e), macros(1000.0, 40.0));
    }

    #[test]
    fn test_zero_recipe_servings_treated_as_one() {
        let e = entry(
            "p1",
            None,
            EntryKind::Recipe {
                recipe_id: "r1".to_string(),
                recipe_servings: 0.0,
                nutrition: macros(600.0, 30.0),
            },
        );
        assert_eq!(entry_contribution(&e), macros(600.0, 30.0));
    }

    #[test]
    fn test_aggregate_by_profile_mixes_entry_types() {
        let entries = vec![
            entry(
                "parent",
                Some(1.5),
                EntryKind::Food {
                    food_id: "f1".to_string(),
                    nutrition: macros(100.0, 10.0),
                },
            ),
            entry(
                "child",
                None,
                EntryKind::Custom {
                    name: "Apple".to_string(),
                    nutrition: NutritionSummary {
                        calories: Some(95.0),
                        fiber_g: Some(4.0),
                        ..Default::default()
                    },
                },
            ),
            entry(
                "parent",
                Some(1.0),
                EntryKind::Recipe {
                    recipe_id: "r1".to_string(),
                    recipe_servings: 2.0,
                    nutrition: macros(800.0, 50.0),
                },
            ),
        ];

        let rollups = aggregate_by_profile(&entries);
        assert_eq!(rollups.len(), 2);
        assert_eq!(rollups[0].profile_id, "parent");
        assert_eq!(rollups[0].entry_count, 2);
        assert_eq!(rollups[0].totals.calories, Some(550.0));
        assert_eq!(rollups[0].totals.protein_g, Some(40.0));
        assert_eq!(rollups[0].totals.fiber_g, None);

        assert_eq!(rollups[1].profile_id, "child");
        assert_eq!(rollups[1].totals.calories, Some(95.0));
        assert_eq!(rollups[1].totals.fiber_g, Some(4.0));
        assert_eq!(rollups[1].totals.protein_g, None);
    }

    #[test]
    fn test_daily_average() {
        let four_days = macros(8000.0, 400.0);
        assert_eq!(daily_average(&four_days, 4), macros(2000.0, 100.0));
        assert_eq!(daily_average(&four_days, 0), four_days);
    }

    #[test]
    fn test_entry_wire_shape() {
        let json = r#"{
            "profile_id": "p1",
            "number_of_servings": 2,
            "type": "food",
            "food_id": "f9",
            "nutrition": { "calories": 120.0 }
        }"#;
        let e: NutritionEntry = serde_json::from_str(json).unwrap();
        assert_eq!(e.number_of_servings, Some(2.0));
        assert!(matches!(e.kind, EntryKind::Food { ref food_id, .. } if food_id == "f9"));
        assert_eq!(entry_contribution(&e).calories, Some(240.0));
    }
}
