use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlossaryEntry {
    pub id: i64,
    pub glossary_id: i64,
    pub concept: String,
    pub definition: String,
    pub user_id: i64,
    #[serde(default)]
    pub user_full_name: Option<String>,
    pub time_created: i64,
}

/// One page of remote entries plus the server-reported total for the
/// requested browse mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntriesPage {
    pub entries: Vec<GlossaryEntry>,
    pub total: u32,
}

/// How a glossary listing is browsed. Each variant carries its own
/// parameters and contributes a distinct cache-key fragment, so the same
/// mode with the same parameters always hits the same cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryFetchMode {
    ByLetter { letter: String },
    ByDate { order: DateOrder },
    ByAuthor { letter: String },
    ByCategory { category_id: i64 },
    Search { query: String, full_search: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    CreatedAsc,
    CreatedDesc,
    UpdatedAsc,
    UpdatedDesc,
}

impl DateOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateOrder::CreatedAsc => "created_asc",
            DateOrder::CreatedDesc => "created_desc",
            DateOrder::UpdatedAsc => "updated_asc",
            DateOrder::UpdatedDesc => "updated_desc",
        }
    }
}

impl EntryFetchMode {
    /// Fragment appended to the entries cache key; stable per mode and
    /// parameter set.
    pub fn cache_fragment(&self) -> String {
        match self {
            EntryFetchMode::ByLetter { letter } => format!("letter:{letter}"),
            EntryFetchMode::ByDate { order } => format!("date:{}", order.as_str()),
            EntryFetchMode::ByAuthor { letter } => format!("author:{letter}"),
            EntryFetchMode::ByCategory { category_id } => format!("category:{category_id}"),
            EntryFetchMode::Search { query, full_search } => {
                format!("search:{query}:{full_search}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_fragment_distinguishes_modes() {
        let by_letter = EntryFetchMode::ByLetter { letter: "A".into() };
        let by_author = EntryFetchMode::ByAuthor { letter: "A".into() };
        assert_ne!(by_letter.cache_fragment(), by_author.cache_fragment());

        let search = EntryFetchMode::Search {
            query: "osmosis".into(),
            full_search: true,
        };
        assert_eq!(search.cache_fragment(), "search:osmosis:true");
    }
}
