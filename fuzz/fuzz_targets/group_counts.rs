#![no_main]

use libfuzzer_sys::fuzz_target;
use reactable_core::group::reaction_groups;
use reactable_core::model::ReactableSubject;

fuzz_target!(|data: &[u8]| {
    let Ok(subject) = serde_json::from_slice::<ReactableSubject>(data) else {
        return;
    };
    let groups = reaction_groups(&subject);
    assert_eq!(groups.len(), subject.reactions_counts.len());
    for (group, (_, count)) in groups.iter().zip(subject.reactions_counts.iter()) {
        assert_eq!(group.count(), count);
    }
});
