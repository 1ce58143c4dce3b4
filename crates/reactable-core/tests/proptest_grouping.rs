use proptest::prelude::*;
use reactable_core::classify::{ReactionSymbol, classify};
use reactable_core::group::reaction_groups;
use reactable_core::model::{ReactableSubject, ReactionCounts};
use reactable_core::pagination::cursor::CursorKey;
use uuid::Uuid;

fn arb_uuid() -> impl Strategy<Value = Uuid> {
    any::<u128>().prop_map(Uuid::from_u128)
}

/// Keys that are either hyphenated UUIDs or arbitrary short strings.
fn arb_key() -> impl Strategy<Value = String> {
    prop_oneof![
        arb_uuid().prop_map(|id| id.to_string()),
        "\\PC{0,8}",
        Just("👍".to_string()),
    ]
}

fn arb_counts() -> impl Strategy<Value = Vec<(String, u64)>> {
    prop::collection::vec((arb_key(), any::<u64>()), 0..16)
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(512))]

    #[test]
    fn hyphenated_uuids_classify_as_custom(id in arb_uuid()) {
        prop_assert_eq!(classify(&id.to_string()), ReactionSymbol::CustomEmoji(id));
    }

    #[test]
    fn short_strings_classify_as_emoji(key in "\\PC{0,35}") {
        prop_assert_eq!(classify(&key), ReactionSymbol::Emoji(key.clone()));
    }

    #[test]
    fn one_group_per_key_in_map_order(pairs in arb_counts()) {
        let counts: ReactionCounts = pairs.clone().into_iter().collect();
        let subject = ReactableSubject::new(Uuid::nil(), counts.clone());
        let groups = reaction_groups(&subject);

        prop_assert_eq!(groups.len(), counts.len());
        for (group, (key, count)) in groups.iter().zip(counts.iter()) {
            prop_assert_eq!(group.count(), count);
            prop_assert_eq!(group.symbol(), classify(key));
            prop_assert_eq!(group.filter().subject_id, Uuid::nil());
        }

        let exact: u128 = counts.iter().map(|(_, count)| u128::from(count)).sum();
        let expected = u64::try_from(exact).unwrap_or(u64::MAX);
        prop_assert_eq!(subject.reactions_counts.total(), expected);
    }

    #[test]
    fn group_counts_are_snapshots(pairs in arb_counts(), bump in 1_u64..1000) {
        let counts: ReactionCounts = pairs.into_iter().collect();
        let subject = ReactableSubject::new(Uuid::nil(), counts);
        let before: Vec<u64> = reaction_groups(&subject).iter().map(|g| g.count()).collect();

        let mut mutated = subject.clone();
        let keys: Vec<String> = mutated.reactions_counts.iter().map(|(k, _)| k.to_string()).collect();
        for key in keys {
            let current = mutated.reactions_counts.get(&key).unwrap_or(0);
            mutated.reactions_counts.insert(key, current.wrapping_add(bump));
        }

        let after: Vec<u64> = reaction_groups(&subject).iter().map(|g| g.count()).collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn cursor_tokens_decode_to_their_key(ts in any::<i64>(), id in arb_uuid()) {
        let key = CursorKey::new(ts, id);
        prop_assert_eq!(CursorKey::decode(&key.encode()), Ok(key));
    }

    #[test]
    fn cursor_decode_never_panics(token in "\\PC{0,300}") {
        let _ = CursorKey::decode(&token);
    }
}
