use crate::models::Movie;

/// Case-insensitive substring match on the title. Order is preserved and a blank
/// query keeps everything.
pub fn filter_by_title<'a>(movies: &'a [Movie], query: &str) -> Vec<&'a Movie> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return movies.iter().collect();
    }
    movies.iter().filter(|m| m.title.to_lowercase().contains(&needle)).collect()
}
