use crate::db::Database;
use crate::ApiResult;

/// How many matches a search returns at most.
pub const SEARCH_LIMIT: i64 = 20;

/// Display format for result timestamps.
const DATE_FORMAT: &str = "%d-%m-%Y @ %H:%M:%S";

pub const EMPTY_QUERY_MESSAGE: &str = "Enter a search term.";
pub const NO_MATCHES_MESSAGE: &str = "No matching pastes found.";

pub struct SearchOutcome {
    pub message: Option<&'static str>,
    pub hits: Vec<SearchHit>,
}

pub struct SearchHit {
    pub id: String,
    pub title: String,
    pub created_at: String,
}

/// Substring search over paste ids. Titles and contents are not searched,
/// and expired pastes are not filtered out.
pub async fn search(db: &Database, query: &str) -> ApiResult<SearchOutcome> {
    let query = query.trim();

    if query.is_empty() {
        return Ok(SearchOutcome {
            message: Some(EMPTY_QUERY_MESSAGE),
            hits: Vec::new(),
        });
    }

    let matches = db.search_pastes(query, SEARCH_LIMIT).await?;
    let message = matches.is_empty().then_some(NO_MATCHES_MESSAGE);

    let hits = matches
        .into_iter()
        .map(|paste| SearchHit {
            id: paste.id,
            title: paste.title,
            created_at: paste.created_at.format(DATE_FORMAT).to_string(),
        })
        .collect();

    Ok(SearchOutcome { message, hits })
}
