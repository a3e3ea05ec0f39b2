mod films;
mod search;

pub use films::{extract_films, FILMS_URL};
pub use search::{extract_search_results, search_url};
