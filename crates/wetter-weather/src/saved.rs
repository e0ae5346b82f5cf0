//! Saved locations list.
//!
//! Pure functions computing the next list after a save or remove. The list is
//! newest-first, holds at most [`SAVED_LOCATIONS_CAPACITY`] trimmed, non-empty
//! names, and never contains two names that differ only by case.
//! Persisting the result is the caller's job.

/// Maximum number of saved locations
pub const SAVED_LOCATIONS_CAPACITY: usize = 5;

fn same_place(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// List after saving `name`: moved (or added) to the front, oldest dropped past capacity.
///
/// A blank `name` leaves the list unchanged.
pub fn after_save(current: &[String], name: &str) -> Vec<String> {
    let city = name.trim();
    if city.is_empty() {
        return current.to_vec();
    }

    std::iter::once(city.to_string())
        .chain(
            current
                .iter()
                .filter(|saved| !same_place(saved, city))
                .cloned(),
        )
        .take(SAVED_LOCATIONS_CAPACITY)
        .collect()
}

/// List after removing every entry matching `name` case-insensitively.
///
/// `name` is compared as given; surrounding whitespace is not stripped.
pub fn after_remove(current: &[String], name: &str) -> Vec<String> {
    current
        .iter()
        .filter(|saved| !same_place(saved, name))
        .cloned()
        .collect()
}

/// Bring a list loaded from storage back within the list invariants.
///
/// Keeps the stored order; the first of several case-insensitive duplicates wins.
pub fn normalize_saved(loaded: &[String]) -> Vec<String> {
    loaded
        .iter()
        .rev()
        .fold(Vec::new(), |list, name| after_save(&list, name))
}
