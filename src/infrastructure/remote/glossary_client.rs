use crate::application::ports::cache::CacheStrategy;
use crate::application::ports::glossary_remote::GlossaryRemote;
use crate::application::ports::transport::WsTransport;
use crate::domain::entities::glossary::{EntriesPage, EntryFetchMode, GlossaryEntry};
use crate::domain::value_objects::ActionOptions;
use crate::infrastructure::cache::MemoryCache;
use crate::infrastructure::remote::{parse_response, read_with_strategy};
use crate::shared::error::AppError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;

/// [`GlossaryRemote`] backed by the web service transport plus a TTL cache
/// for reads. Each browse mode maps to its own web service function and
/// cache-key fragment.
pub struct GlossaryWsClient {
    transport: Arc<dyn WsTransport>,
    cache: Arc<MemoryCache<Value>>,
}

impl GlossaryWsClient {
    pub fn new(transport: Arc<dyn WsTransport>, cache: Arc<MemoryCache<Value>>) -> Self {
        Self { transport, cache }
    }

    fn entries_key(glossary_id: i64, mode: &EntryFetchMode, from: u32, limit: u32) -> String {
        format!(
            "glossary:{glossary_id}:entries:{}:{from}:{limit}",
            mode.cache_fragment()
        )
    }

    fn request(mode: &EntryFetchMode, glossary_id: i64, from: u32, limit: u32) -> (&'static str, Value) {
        let base = json!({ "id": glossary_id, "from": from, "limit": limit });
        let mut params = base;
        match mode {
            EntryFetchMode::ByLetter { letter } => {
                params["letter"] = json!(letter);
                ("mod_glossary_get_entries_by_letter", params)
            }
            EntryFetchMode::ByDate { order } => {
                params["order"] = json!(order.as_str());
                ("mod_glossary_get_entries_by_date", params)
            }
            EntryFetchMode::ByAuthor { letter } => {
                params["letter"] = json!(letter);
                ("mod_glossary_get_entries_by_author", params)
            }
            EntryFetchMode::ByCategory { category_id } => {
                params["categoryid"] = json!(category_id);
                ("mod_glossary_get_entries_by_category", params)
            }
            EntryFetchMode::Search { query, full_search } => {
                params["query"] = json!(query);
                params["fullsearch"] = json!(full_search);
                ("mod_glossary_get_entries_by_search", params)
            }
        }
    }
}

#[derive(Deserialize)]
struct EntriesResponse {
    entries: Vec<WireEntry>,
    #[serde(default)]
    count: u32,
}

#[derive(Deserialize)]
struct WireEntry {
    id: i64,
    glossaryid: i64,
    concept: String,
    #[serde(default)]
    definition: String,
    userid: i64,
    #[serde(default)]
    userfullname: Option<String>,
    timecreated: i64,
}

impl From<WireEntry> for GlossaryEntry {
    fn from(wire: WireEntry) -> Self {
        GlossaryEntry {
            id: wire.id,
            glossary_id: wire.glossaryid,
            concept: wire.concept,
            definition: wire.definition,
            user_id: wire.userid,
            user_full_name: wire.userfullname,
            time_created: wire.timecreated,
        }
    }
}

#[derive(Deserialize)]
struct AddEntryResponse {
    entryid: i64,
}

#[async_trait]
impl GlossaryRemote for GlossaryWsClient {
    async fn entries(
        &self,
        glossary_id: i64,
        mode: &EntryFetchMode,
        from: u32,
        limit: u32,
        strategy: CacheStrategy,
    ) -> Result<EntriesPage, AppError> {
        let (ws_function, params) = Self::request(mode, glossary_id, from, limit);
        let response = read_with_strategy(
            self.transport.as_ref(),
            &self.cache,
            strategy,
            &Self::entries_key(glossary_id, mode, from, limit),
            ws_function,
            params,
        )
        .await?;

        let parsed: EntriesResponse = parse_response(response, "glossary entries")?;
        Ok(EntriesPage {
            entries: parsed.entries.into_iter().map(GlossaryEntry::from).collect(),
            total: parsed.count,
        })
    }

    async fn cached_entries(&self, glossary_id: i64) -> Result<Vec<GlossaryEntry>, AppError> {
        let pages = self
            .cache
            .values_matching(&format!("glossary:{glossary_id}:entries:"))
            .await;

        // The same entry shows up under several browse modes; keep one.
        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        for page in pages {
            let parsed: EntriesResponse = parse_response(page, "glossary entries")?;
            for wire in parsed.entries {
                if seen.insert(wire.id) {
                    entries.push(GlossaryEntry::from(wire));
                }
            }
        }
        Ok(entries)
    }

    async fn add_entry(
        &self,
        glossary_id: i64,
        concept: &str,
        definition: &str,
        options: &ActionOptions,
    ) -> Result<i64, AppError> {
        let response = self
            .transport
            .write(
                "mod_glossary_add_entry",
                json!({
                    "glossaryid": glossary_id,
                    "concept": concept,
                    "definition": definition,
                    "options": options.as_json(),
                }),
            )
            .await?;

        let parsed: AddEntryResponse = parse_response(response, "add entry")?;
        Ok(parsed.entryid)
    }

    async fn invalidate_entries(&self, glossary_id: i64) -> Result<(), AppError> {
        self.cache
            .delete_pattern(&format!("glossary:{glossary_id}:entries"))
            .await;
        Ok(())
    }
}
