//! Property-based tests for the pure pieces: the classification engine and
//! the lifecycle transition table.

use ewaste_api::models::item::{Category, ClassificationType, Condition, ItemStatus};
use ewaste_api::services::classification::classify;
use proptest::prelude::*;

fn category_strategy() -> impl Strategy<Value = Category> {
    prop::sample::select(vec![
        Category::Computer,
        Category::Projector,
        Category::LabEquipment,
        Category::MobileDevice,
        Category::Battery,
        Category::Accessory,
        Category::Other,
    ])
}

fn condition_strategy() -> impl Strategy<Value = Condition> {
    prop::sample::select(vec![
        Condition::Good,
        Condition::Fair,
        Condition::Poor,
        Condition::Dead,
    ])
}

fn status_strategy() -> impl Strategy<Value = ItemStatus> {
    prop::sample::select(vec![
        ItemStatus::Reported,
        ItemStatus::Scheduled,
        ItemStatus::Collected,
        ItemStatus::Sorted,
        ItemStatus::Processed,
        ItemStatus::Recycled,
        ItemStatus::Disposed,
        ItemStatus::Decomposed,
    ])
}

proptest! {
    #[test]
    fn classify_is_deterministic(
        name in ".{0,40}",
        notes in proptest::option::of(".{0,40}"),
        category in category_strategy(),
        condition in condition_strategy(),
        age_months in 0..600i32,
    ) {
        let first = classify(&name, notes.as_deref(), category, condition, age_months);
        let second = classify(&name, notes.as_deref(), category, condition, age_months);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn batteries_are_always_hazardous(
        name in ".{0,40}",
        condition in condition_strategy(),
        age_months in 0..600i32,
    ) {
        let result = classify(&name, None, Category::Battery, condition, age_months);
        prop_assert_eq!(result.kind, ClassificationType::Hazardous);
        prop_assert_eq!(result.notes, "Contains hazardous materials.");
    }

    #[test]
    fn acid_mentions_are_always_hazardous(
        prefix in "[a-z]{0,10}",
        suffix in "[a-z]{0,10}",
        category in category_strategy(),
        condition in condition_strategy(),
        age_months in 0..600i32,
    ) {
        let name = format!("{}acid{}", prefix, suffix);
        let result = classify(&name, None, category, condition, age_months);
        prop_assert_eq!(result.kind, ClassificationType::Hazardous);
    }

    #[test]
    fn classification_notes_match_the_class(
        name in "[a-z ]{0,40}",
        category in category_strategy(),
        condition in condition_strategy(),
        age_months in 0..600i32,
    ) {
        let result = classify(&name, None, category, condition, age_months);
        let expected_notes = match result.kind {
            ClassificationType::Hazardous => "Contains hazardous materials.",
            ClassificationType::Reusable => "Item may be suitable for reuse.",
            ClassificationType::Recyclable => "",
        };
        prop_assert_eq!(result.notes, expected_notes);
    }

    #[test]
    fn terminal_states_never_transition(
        to in status_strategy(),
    ) {
        for terminal in [ItemStatus::Recycled, ItemStatus::Disposed, ItemStatus::Decomposed] {
            prop_assert!(!terminal.can_transition_to(to));
        }
    }

    #[test]
    fn transitions_never_leave_from_a_terminal_state(
        from in status_strategy(),
        to in status_strategy(),
    ) {
        if from.can_transition_to(to) {
            prop_assert!(!from.is_terminal());
            prop_assert!(from != to);
        }
    }

    /// Folding any bid sequence through the accept-if-strictly-greater rule
    /// yields a strictly increasing accepted sequence ending at the maximum
    /// accepted value.
    #[test]
    fn accepted_bid_sequences_are_strictly_increasing(
        starting_bid in 0u64..1_000,
        bids in proptest::collection::vec(0u64..2_000, 0..50),
    ) {
        let mut highest = starting_bid;
        let mut accepted = Vec::new();
        for bid in bids {
            if bid > highest {
                highest = bid;
                accepted.push(bid);
            }
        }
        prop_assert!(accepted.windows(2).all(|w| w[0] < w[1]));
        if let Some(last) = accepted.last() {
            prop_assert_eq!(*last, highest);
            prop_assert!(*last > starting_bid);
        } else {
            prop_assert_eq!(highest, starting_bid);
        }
    }
}
