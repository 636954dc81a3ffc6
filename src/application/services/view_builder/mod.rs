pub mod forum;
pub mod glossary;

pub use forum::ForumViewBuilder;
pub use glossary::GlossaryViewBuilder;

/// Indexes at which a new display group starts (letter dividers, category
/// headers). `divider_changed` compares each item with its immediate
/// predecessor in the final ordering; the first item always starts a group.
pub fn group_starts<T, F>(items: &[T], divider_changed: F) -> Vec<usize>
where
    F: Fn(&T, &T) -> bool,
{
    let mut starts = Vec::new();
    for (index, item) in items.iter().enumerate() {
        match index.checked_sub(1).map(|i| &items[i]) {
            None => starts.push(index),
            Some(previous) if divider_changed(item, previous) => starts.push(index),
            Some(_) => {}
        }
    }
    starts
}
