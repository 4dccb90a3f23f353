use itertools::Itertools;

pub mod decompose;
pub mod region;

/// Sort a zone label's characters. `"0"` (like `""`) names the zone outside every ellipse. `None` if any label
/// repeats.
pub fn canonicalize(label: &str) -> Option<String> {
    if label == "0" {
        return Some(String::new());
    }
    let chars: Vec<char> = label.chars().sorted().collect();
    if chars.iter().tuple_windows().any(|(a, b)| a == b) {
        None
    } else {
        Some(chars.into_iter().collect())
    }
}

/// Every non-empty combination of `labels`, in canonical order: by size, then lexicographically.
pub fn zone_labels(labels: &[char]) -> Vec<String> {
    labels
        .iter()
        .sorted()
        .dedup()
        .powerset()
        .filter(|set| !set.is_empty())
        .map(|set| set.into_iter().collect::<String>())
        .sorted_by(|l, r| l.len().cmp(&r.len()).then_with(|| l.cmp(r)))
        .collect()
}
