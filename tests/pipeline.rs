use std::sync::Mutex;

use async_trait::async_trait;
use nutri_ledger::client::{parse_recipe_details, parse_recipe_summary, RecipeService};
use nutri_ledger::error::{Error, Result};
use nutri_ledger::foods::FoodDatabase;
use nutri_ledger::health::{self, BodyProfile, Sex};
use nutri_ledger::ingredients::{correct_ocr_typos, extract};
use nutri_ledger::lookup::lookup_nutrition;
use nutri_ledger::models::{
    DietaryProfile, FoodRecord, MealTypePreference, RecipeDetails, RecipeQuery, RecipeSummary,
    ResolvedRestrictions,
};
use nutri_ledger::ocr::OcrService;
use nutri_ledger::pipeline::{prepare_query, scan_and_suggest, suggest_recipes};
use nutri_ledger::restrictions::resolve;
use nutri_ledger::{query, NutrientKey, NutrientVector, WeightLog};
use serde_json::json;

#[derive(Default)]
struct MockRecipeService {
    queries: Mutex<Vec<RecipeQuery>>,
    lookups: Mutex<Vec<String>>,
    ingredient: Option<FoodRecord>,
}

#[async_trait]
impl RecipeService for MockRecipeService {
    async fn search_recipes(&self, query: &RecipeQuery) -> Result<Vec<RecipeSummary>> {
        self.queries.lock().unwrap().push(query.clone());
        Ok(vec![RecipeSummary {
            id: 1,
            title: "Tomato Rice".to_string(),
            image: None,
            calories: 420,
        }])
    }

    async fn recipe_details(&self, id: i64) -> Result<RecipeDetails> {
        Err(Error::NotFound(format!("recipe {}", id)))
    }

    async fn lookup_ingredient(&self, name: &str) -> Result<Option<FoodRecord>> {
        self.lookups.lock().unwrap().push(name.to_string());
        Ok(self.ingredient.clone())
    }
}

struct FixedOcr(&'static str);

#[async_trait]
impl OcrService for FixedOcr {
    async fn recognize(&self, _image: &[u8]) -> Result<String> {
        Ok(self.0.to_string())
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn extract_drops_short_lines_and_totals() {
    assert_eq!(extract("Milk\nEggs\nTotal: $5.00\nBr"), strings(&["Milk", "Eggs"]));
}

#[test]
fn extract_trims_and_caps_at_ten() {
    let text = (1..=14)
        .map(|i| format!("  item {}  ", i))
        .collect::<Vec<_>>()
        .join("\r\n");
    let list = extract(&text);
    assert_eq!(list.len(), 10);
    assert_eq!(list[0], "item 1");
    assert_eq!(list[9], "item 10");
}

#[test]
fn extract_filters_are_case_sensitive() {
    let list = extract("Subtotal 4.20\ntotal cereal\nRice $2\nOlive oil");
    assert_eq!(list, strings(&["total cereal", "Olive oil"]));
}

#[test]
fn extract_empty_is_not_an_error() {
    assert!(extract("").is_empty());
    assert!(extract("abc\n \n$1").is_empty());
}

#[test]
fn typo_cleanup_lowercases_and_dedupes() {
    let cleaned = correct_ocr_typos(&strings(&["Tomato", "tomato", "Chicken ITM", "  "]));
    assert_eq!(cleaned, strings(&["tomato", "chicken item"]));
}

#[test]
fn vegan_profile_resolves() {
    let r = resolve(&DietaryProfile {
        meal_type: MealTypePreference::Vegan,
        exclusion_tags: strings(&["sugar"]),
    });
    assert_eq!(r.diet, "vegan");
    assert_eq!(
        r.exclude_ingredients,
        "sugar,pork,beef,chicken,lamb,turkey,fish,shellfish"
    );
}

#[test]
fn eggetarian_has_no_diet_but_excludes_meat() {
    let r = resolve(&DietaryProfile {
        meal_type: MealTypePreference::Eggetarian,
        exclusion_tags: vec![],
    });
    assert_eq!(r.diet, "");
    assert_eq!(r.exclude_ingredients, "pork,beef,chicken,lamb,turkey,fish,shellfish");
}

#[test]
fn non_vegetarian_cleans_tags_only() {
    let r = resolve(&DietaryProfile {
        meal_type: MealTypePreference::NonVegetarian,
        exclusion_tags: strings(&[" peanuts ", "", "dairy,,", "gluten"]),
    });
    assert_eq!(r.diet, "");
    assert_eq!(r.exclude_ingredients, "peanuts,dairy,gluten");
}

#[test]
fn meal_type_parses_loosely() {
    assert_eq!(
        "non-vegetarian".parse::<MealTypePreference>().unwrap(),
        MealTypePreference::NonVegetarian
    );
    assert_eq!("Vegan".parse::<MealTypePreference>().unwrap(), MealTypePreference::Vegan);
    assert!("carnivore".parse::<MealTypePreference>().is_err());
}

#[test]
fn query_payload_shape() {
    let restrictions = ResolvedRestrictions {
        exclude_ingredients: "fish".to_string(),
        diet: "vegetarian".to_string(),
    };
    let q = query::build(&strings(&["rice", "tomato"]), &restrictions).unwrap();
    assert_eq!(
        serde_json::to_value(&q).unwrap(),
        json!({
            "ingredients": "rice,tomato",
            "excludeIngredients": "fish",
            "diet": "vegetarian",
            "resultCount": 6,
            "ranking": "maximize-used"
        })
    );
}

#[test]
fn empty_ingredients_fail_to_build() {
    let err = query::build(&[], &ResolvedRestrictions::default()).unwrap_err();
    assert!(matches!(err, Error::EmptyIngredients));
}

#[test]
fn prepare_query_cleans_and_resolves() {
    let profile = DietaryProfile {
        meal_type: MealTypePreference::Vegetarian,
        exclusion_tags: vec![],
    };
    let q = prepare_query("RICE\nTomato\nrice\nTotal $9", &profile, 3).unwrap();
    assert_eq!(q.ingredients, "rice,tomato");
    assert_eq!(q.diet, "vegetarian");
    assert_eq!(q.result_count, 3);
}

#[tokio::test]
async fn empty_text_short_circuits_before_search() {
    let service = MockRecipeService::default();
    let err = suggest_recipes("Total $4\nab", &DietaryProfile::default(), &service)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::EmptyIngredients));
    assert!(service.queries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn suggest_sends_one_query() {
    let service = MockRecipeService::default();
    let profile = DietaryProfile {
        meal_type: MealTypePreference::Vegan,
        exclusion_tags: strings(&["sugar"]),
    };
    let results = suggest_recipes("Milk\nEggs\nTotal: $5.00\nBr", &profile, &service)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);

    let queries = service.queries.lock().unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].ingredients, "milk,eggs");
    assert_eq!(queries[0].diet, "vegan");
    assert_eq!(queries[0].result_count, 6);
}

#[tokio::test]
async fn scan_runs_ocr_first() {
    let service = MockRecipeService::default();
    let ocr = FixedOcr("Basmati rice\nSpinach\nSUBTOTAL\n$3.10");
    scan_and_suggest(b"jpeg", &ocr, &DietaryProfile::default(), &service)
        .await
        .unwrap();
    assert_eq!(
        service.queries.lock().unwrap()[0].ingredients,
        "basmati rice,spinach,subtotal"
    );

    let err = scan_and_suggest(b"", &ocr, &DietaryProfile::default(), &service)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

const DATASET: &str = r#"[
    {"Dish Name": "Masala Dosa", "Calories (kcal)": 167.6, "Protein (g)": 3.9,
     "Fats (g)": "", "Folate (µg)": 12.5},
    {"Dish Name": "Plain Dosa", "Calories (kcal)": "120", "Fibre (g)": 1.5},
    {"Calories (kcal)": 99}
]"#;

#[test]
fn dataset_rows_map_to_nutrients() {
    let db = FoodDatabase::from_json_str(DATASET).unwrap();
    assert_eq!(db.len(), 2);

    let dosa = db.lookup("masala dosa").unwrap();
    assert_eq!(dosa.nutrients.calories, 168.0);
    assert_eq!(dosa.nutrients.protein_content, 3.9);
    assert_eq!(dosa.nutrients.fat_content, 0.0);
    assert_eq!(dosa.nutrients.folate_content, 12.5);
}

#[test]
fn dataset_lookup_prefers_exact_then_substring() {
    let db = FoodDatabase::from_json_str(DATASET).unwrap();
    assert_eq!(db.lookup(" Plain Dosa ").unwrap().name, "Plain Dosa");
    assert_eq!(db.lookup("dosa").unwrap().name, "Masala Dosa");
    assert!(db.lookup("idli").is_none());
    assert!(db.lookup("").is_none());
}

#[tokio::test]
async fn lookup_uses_local_before_service() {
    let db = FoodDatabase::from_json_str(DATASET).unwrap();
    let service = MockRecipeService::default();

    let record = lookup_nutrition("plain dosa", Some(&db), &service).await.unwrap();
    assert_eq!(record.nutrients.fiber_content, 1.5);
    assert!(service.lookups.lock().unwrap().is_empty());

    let err = lookup_nutrition("idli", Some(&db), &service).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert_eq!(*service.lookups.lock().unwrap(), vec!["idli".to_string()]);

    let err = lookup_nutrition("   ", Some(&db), &service).await.unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[tokio::test]
async fn lookup_falls_back_to_service() {
    let service = MockRecipeService {
        ingredient: Some(FoodRecord {
            name: "banana".to_string(),
            nutrients: NutrientVector::zero().with(NutrientKey::Calories, 89.0),
        }),
        ..Default::default()
    };
    let record = lookup_nutrition("Banana", None, &service).await.unwrap();
    assert_eq!(record.nutrients.calories, 89.0);
}

#[test]
fn recipe_search_hit_parses() {
    let hit = json!({
        "id": 715538,
        "title": "Bruschetta",
        "image": "https://img/715538.jpg",
        "nutrition": {"nutrients": [{"name": "Calories", "amount": 250.7, "unit": "kcal"}]}
    });
    let summary = parse_recipe_summary(&hit).unwrap();
    assert_eq!(summary.id, 715538);
    assert_eq!(summary.calories, 250);

    let bare = parse_recipe_summary(&json!({"id": 1, "title": "Soup"})).unwrap();
    assert_eq!(bare.calories, 0);
    assert!(bare.image.is_none());
    assert!(parse_recipe_summary(&json!({"title": "no id"})).is_none());
}

#[test]
fn recipe_details_map_nutrition() {
    let doc = json!({
        "id": 9,
        "title": "Dal",
        "extendedIngredients": [{"original": "1 cup lentils"}, {"original": "1 tsp salt"}],
        "nutrition": {"nutrients": [
            {"name": "Calories", "amount": 310.9},
            {"name": "Protein", "amount": 18.04},
            {"name": "Saturated Fat", "amount": 1.26},
            {"name": "Vitamin C", "amount": 4.0}
        ]}
    });
    let details = parse_recipe_details(&doc).unwrap();
    assert_eq!(details.ingredients, strings(&["1 cup lentils", "1 tsp salt"]));
    assert_eq!(details.instructions, "Instructions not available.");
    assert_eq!(details.nutrients.calories, 310.0);
    assert_eq!(details.nutrients.protein_content, 18.0);
    assert_eq!(details.nutrients.saturated_fat_content, 1.3);
    assert_eq!(details.nutrients.vitamin_c_content, 4.0);
    assert_eq!(details.nutrients.sodium_content, 0.0);
}

#[test]
fn metrics_follow_mifflin_st_jeor() {
    let profile = BodyProfile {
        age: 30,
        height_cm: 180.0,
        weight_kg: 80.0,
        sex: Sex::Male,
        activity_level: 3,
    };
    let m = health::calculate(&profile).unwrap();
    // 800 + 1125 - 150 + 5 = 1780; * 1.55 = 2759
    assert_eq!(m.bmr, 1780.0);
    assert_eq!(m.calories_maintain, 2759.0);
    assert_eq!(m.calories_mild_loss, 2509.0);
    assert_eq!(m.calories_weight_loss, 2259.0);
    assert_eq!(m.calories_extreme_loss, 2009.0);
    assert_eq!(m.bmi, 24.7);
}

#[test]
fn metrics_read_current_weight_from_log() {
    let mut log = WeightLog::new();
    log.upsert(chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), 90.0)
        .unwrap();
    log.upsert(chrono::NaiveDate::from_ymd_opt(2025, 1, 8).unwrap(), 60.0)
        .unwrap();

    let profile = BodyProfile {
        age: 25,
        height_cm: 165.0,
        weight_kg: 0.0,
        sex: Sex::Female,
        activity_level: 9,
    }
    .with_current_weight(&log);
    assert_eq!(profile.weight_kg, 60.0);

    let m = health::calculate(&profile).unwrap();
    // 600 + 1031.25 - 125 - 161 = 1345.25; unknown level -> 1.2
    assert_eq!(m.bmr, 1345.0);
    assert_eq!(m.calories_maintain, 1614.0);
}

#[test]
fn metrics_reject_missing_inputs() {
    let profile = BodyProfile {
        age: 25,
        height_cm: 165.0,
        weight_kg: 0.0,
        sex: Sex::Female,
        activity_level: 1,
    };
    assert!(matches!(health::calculate(&profile), Err(Error::InvalidInput(_))));
}

#[test]
fn progress_against_target() {
    let summary = NutrientVector::zero().with(NutrientKey::Calories, 1500.0);
    let p = health::progress(&summary, 2000.0);
    assert_eq!(p.remaining, 500.0);
    assert_eq!(p.percent, 75.0);

    let over = health::progress(&summary, 1200.0);
    assert_eq!(over.remaining, -300.0);
}
