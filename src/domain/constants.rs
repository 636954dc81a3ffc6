/// Component identifiers used for attachment uploads, rating sync and
/// activity-log replay.
pub const FORUM_COMPONENT: &str = "mod_forum";
pub const GLOSSARY_COMPONENT: &str = "mod_glossary";

/// Rating area for forum posts.
pub const RATING_AREA_POST: &str = "post";
/// Rating area for glossary entries.
pub const RATING_AREA_ENTRY: &str = "entry";

/// Context level of an activity module instance.
pub const CONTEXT_LEVEL_MODULE: &str = "module";

/// Group id meaning "post to all participants".
pub const ALL_PARTICIPANTS: i64 = -1;

/// Event names published on the event bus when a background sync pass
/// changed local state.
pub const FORUM_AUTO_SYNCED: &str = "forum_auto_synced";
pub const GLOSSARY_AUTO_SYNCED: &str = "glossary_auto_synced";
