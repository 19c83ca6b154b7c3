use std::fmt;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The 13 nutrients tracked per meal and per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NutrientKey {
    Calories,
    FatContent,
    SaturatedFatContent,
    CholesterolContent,
    SodiumContent,
    CarbohydrateContent,
    FiberContent,
    SugarContent,
    ProteinContent,
    CalciumContent,
    IronContent,
    VitaminCContent,
    FolateContent,
}

impl NutrientKey {
    pub const ALL: [NutrientKey; 13] = [
        NutrientKey::Calories,
        NutrientKey::FatContent,
        NutrientKey::SaturatedFatContent,
        NutrientKey::CholesterolContent,
        NutrientKey::SodiumContent,
        NutrientKey::CarbohydrateContent,
        NutrientKey::FiberContent,
        NutrientKey::SugarContent,
        NutrientKey::ProteinContent,
        NutrientKey::CalciumContent,
        NutrientKey::IronContent,
        NutrientKey::VitaminCContent,
        NutrientKey::FolateContent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NutrientKey::Calories => "Calories",
            NutrientKey::FatContent => "FatContent",
            NutrientKey::SaturatedFatContent => "SaturatedFatContent",
            NutrientKey::CholesterolContent => "CholesterolContent",
            NutrientKey::SodiumContent => "SodiumContent",
            NutrientKey::CarbohydrateContent => "CarbohydrateContent",
            NutrientKey::FiberContent => "FiberContent",
            NutrientKey::SugarContent => "SugarContent",
            NutrientKey::ProteinContent => "ProteinContent",
            NutrientKey::CalciumContent => "CalciumContent",
            NutrientKey::IronContent => "IronContent",
            NutrientKey::VitaminCContent => "VitaminCContent",
            NutrientKey::FolateContent => "FolateContent",
        }
    }

    /// Name the recipe service uses in its `nutrition.nutrients` list.
    pub fn service_name(self) -> &'static str {
        match self {
            NutrientKey::Calories => "Calories",
            NutrientKey::FatContent => "Fat",
            NutrientKey::SaturatedFatContent => "Saturated Fat",
            NutrientKey::CholesterolContent => "Cholesterol",
            NutrientKey::SodiumContent => "Sodium",
            NutrientKey::CarbohydrateContent => "Carbohydrates",
            NutrientKey::FiberContent => "Fiber",
            NutrientKey::SugarContent => "Sugar",
            NutrientKey::ProteinContent => "Protein",
            NutrientKey::CalciumContent => "Calcium",
            NutrientKey::IronContent => "Iron",
            NutrientKey::VitaminCContent => "Vitamin C",
            NutrientKey::FolateContent => "Folate",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for NutrientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One entry of the recipe service's nutrient list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceNutrient {
    pub name: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub unit: Option<String>,
}

/// Coerce-then-default: anything that is not a finite, non-negative number
/// becomes 0. Numeric strings are accepted.
pub fn coerce_amount(value: Option<&Value>) -> f64 {
    let n = value.and_then(|v| {
        v.as_f64()
            .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
    });
    sanitize(n.unwrap_or(0.0))
}

fn sanitize(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}

/// Fixed-shape record of the 13 tracked nutrients.
///
/// Every key is always present and never negative; amounts that fail
/// validation are stored as 0. Deserializing applies the same
/// coerce-then-default rule as [`NutrientVector::from_json`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NutrientVector {
    pub calories: f64,
    pub fat_content: f64,
    pub saturated_fat_content: f64,
    pub cholesterol_content: f64,
    pub sodium_content: f64,
    pub carbohydrate_content: f64,
    pub fiber_content: f64,
    pub sugar_content: f64,
    pub protein_content: f64,
    pub calcium_content: f64,
    pub iron_content: f64,
    pub vitamin_c_content: f64,
    pub folate_content: f64,
}

impl NutrientVector {
    pub fn zero() -> Self {
        Self::default()
    }

    fn slots(&self) -> [&f64; 13] {
        [
            &self.calories,
            &self.fat_content,
            &self.saturated_fat_content,
            &self.cholesterol_content,
            &self.sodium_content,
            &self.carbohydrate_content,
            &self.fiber_content,
            &self.sugar_content,
            &self.protein_content,
            &self.calcium_content,
            &self.iron_content,
            &self.vitamin_c_content,
            &self.folate_content,
        ]
    }

    fn slots_mut(&mut self) -> [&mut f64; 13] {
        [
            &mut self.calories,
            &mut self.fat_content,
            &mut self.saturated_fat_content,
            &mut self.cholesterol_content,
            &mut self.sodium_content,
            &mut self.carbohydrate_content,
            &mut self.fiber_content,
            &mut self.sugar_content,
            &mut self.protein_content,
            &mut self.calcium_content,
            &mut self.iron_content,
            &mut self.vitamin_c_content,
            &mut self.folate_content,
        ]
    }

    pub fn get(&self, key: NutrientKey) -> f64 {
        *self.slots()[key.index()]
    }

    /// Sets a nutrient, normalizing NaN, infinities and negatives to 0.
    pub fn set(&mut self, key: NutrientKey, amount: f64) {
        *self.slots_mut()[key.index()] = sanitize(amount);
    }

    pub fn with(mut self, key: NutrientKey, amount: f64) -> Self {
        self.set(key, amount);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (NutrientKey, f64)> + '_ {
        NutrientKey::ALL
            .into_iter()
            .map(move |k| (k, self.get(k)))
    }

    pub fn is_zero(&self) -> bool {
        self.iter().all(|(_, v)| v == 0.0)
    }

    /// Re-applies the invariants to a vector that may have been built by hand
    /// or deserialized from an untrusted document.
    pub fn normalized(mut self) -> Self {
        for slot in self.slots_mut() {
            *slot = sanitize(*slot);
        }
        self
    }

    /// Maps an untyped payload keyed by the canonical names onto the schema.
    pub fn from_json(value: &Value) -> Self {
        let mut out = Self::zero();
        for key in NutrientKey::ALL {
            out.set(key, coerce_amount(value.get(key.as_str())));
        }
        out
    }

    /// Maps the recipe service's nutrient list. Names match case-insensitively,
    /// amounts are rounded to one decimal, missing nutrients are 0.
    pub fn from_service_nutrients(nutrients: &[ServiceNutrient]) -> Self {
        let mut out = Self::zero();
        for key in NutrientKey::ALL {
            let amount = nutrients
                .iter()
                .find(|n| n.name.eq_ignore_ascii_case(key.service_name()))
                .map(|n| (n.amount * 10.0).round() / 10.0)
                .unwrap_or(0.0);
            out.set(key, amount);
        }
        out
    }
}

impl<'de> Deserialize<'de> for NutrientVector {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_json(&value))
    }
}

impl AddAssign for NutrientVector {
    /// Sums saturate at `f64::MAX` so totals stay finite.
    fn add_assign(&mut self, rhs: Self) {
        let rhs = rhs.normalized();
        for (slot, add) in self.slots_mut().into_iter().zip(rhs.slots()) {
            *slot = (sanitize(*slot) + *add).min(f64::MAX);
        }
    }
}

impl Add for NutrientVector {
    type Output = NutrientVector;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}
