// ABOUTME: Integration tests for priority-based runtime selection.
// ABOUTME: Covers the documented orderings and permutation properties.

use paicku::runtime::{RuntimeType, runtime_priority, select_preferred};
use proptest::prelude::*;

#[test]
fn podman_is_preferred_over_docker() {
    let priority: Vec<RuntimeType> = runtime_priority().into();
    assert_eq!(priority, vec![RuntimeType::Podman, RuntimeType::Docker]);

    let selected = select_preferred(&[RuntimeType::Docker, RuntimeType::Podman], &priority);
    assert_eq!(selected, vec![RuntimeType::Podman, RuntimeType::Docker]);
}

#[test]
fn string_candidates_follow_priority() {
    let installed = ["docker", "podman"];
    let priority = ["podman", "docker"];
    assert_eq!(select_preferred(&installed, &priority), vec!["podman", "docker"]);
}

#[test]
fn single_and_empty_inputs() {
    assert_eq!(select_preferred(&["docker"], &["podman", "docker"]), vec!["docker"]);
    assert!(select_preferred::<&str>(&[], &["podman", "docker"]).is_empty());
}

#[test]
fn unknown_entries_go_last_in_input_order() {
    let installed = ["nerdctl", "docker", "lima", "podman"];
    let priority = ["podman", "docker"];
    assert_eq!(
        select_preferred(&installed, &priority),
        vec!["podman", "docker", "nerdctl", "lima"]
    );
}

proptest! {
    #[test]
    fn output_is_a_permutation_sorted_by_priority(
        installed in proptest::sample::subsequence(vec!["a", "b", "c", "d", "e"], 0..=5)
            .prop_shuffle(),
        priority in Just(vec!["e", "c", "a"]).prop_shuffle(),
    ) {
        let selected = select_preferred(&installed, &priority);

        let mut sorted_in = installed.clone();
        sorted_in.sort();
        let mut sorted_out = selected.clone();
        sorted_out.sort();
        prop_assert_eq!(sorted_in, sorted_out);

        let rank = |x: &&str| priority.iter().position(|p| p == x).unwrap_or(usize::MAX);
        prop_assert!(selected.windows(2).all(|w| rank(&w[0]) <= rank(&w[1])));

        let unranked_in: Vec<_> = installed.iter().filter(|x| rank(x) == usize::MAX).collect();
        let unranked_out: Vec<_> = selected.iter().filter(|x| rank(x) == usize::MAX).collect();
        prop_assert_eq!(unranked_in, unranked_out);
    }
}
