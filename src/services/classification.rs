use crate::models::item::{Category, Classification, ClassificationType, Condition};

/// Categories with resale value when still in working order.
const REUSABLE_CATEGORIES: &[Category] = &[
    Category::Computer,
    Category::Projector,
    Category::LabEquipment,
    Category::MobileDevice,
    Category::Accessory,
];

/// Items younger than this (in months) may still be reusable.
const REUSE_AGE_CUTOFF_MONTHS: i32 = 48;

/// Derives a waste classification from item attributes.
///
/// Pure and deterministic; first matching rule wins:
/// 1. batteries, or anything mentioning acid, are hazardous;
/// 2. working equipment under the age cutoff may be reusable;
/// 3. everything else is recyclable.
pub fn classify(
    name: &str,
    notes: Option<&str>,
    category: Category,
    condition: Condition,
    age_months: i32,
) -> Classification {
    let lower_name = name.to_lowercase();
    let lower_notes = notes.map(str::to_lowercase).unwrap_or_default();

    if category == Category::Battery
        || lower_name.contains("acid")
        || lower_notes.contains("acid")
    {
        return Classification {
            kind: ClassificationType::Hazardous,
            notes: "Contains hazardous materials.".to_string(),
        };
    }

    let good_condition = matches!(condition, Condition::Good | Condition::Fair);
    if REUSABLE_CATEGORIES.contains(&category)
        && good_condition
        && age_months < REUSE_AGE_CUTOFF_MONTHS
    {
        return Classification {
            kind: ClassificationType::Reusable,
            notes: "Item may be suitable for reuse.".to_string(),
        };
    }

    Classification {
        kind: ClassificationType::Recyclable,
        notes: String::new(),
    }
}
