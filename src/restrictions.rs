use crate::models::{DietaryProfile, MealTypePreference, ResolvedRestrictions};

/// Excluded for every meat-free meal type.
pub const MEAT_AND_FISH: [&str; 7] = [
    "pork", "beef", "chicken", "lamb", "turkey", "fish", "shellfish",
];

/// Turn a dietary profile into the recipe service's `diet` and
/// `excludeIngredients` values.
///
/// Only vegetarian and vegan map to a native diet filter; eggetarian relies on
/// the meat exclusion list alone.
pub fn resolve(profile: &DietaryProfile) -> ResolvedRestrictions {
    let diet = match profile.meal_type {
        MealTypePreference::Vegetarian => "vegetarian",
        MealTypePreference::Vegan => "vegan",
        MealTypePreference::Eggetarian | MealTypePreference::NonVegetarian => "",
    };

    let mut excluded = profile.exclusion_tags.join(",");
    if profile.meal_type != MealTypePreference::NonVegetarian {
        excluded.push(',');
        excluded.push_str(&MEAT_AND_FISH.join(","));
    }

    ResolvedRestrictions {
        exclude_ingredients: clean_list(&excluded),
        diet: diet.to_string(),
    }
}

/// Split on commas, trim, drop empty tokens and rejoin.
pub fn clean_list(list: &str) -> String {
    list.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}
