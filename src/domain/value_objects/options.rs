use crate::domain::value_objects::attachments::AttachmentsId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Bag of named option/value pairs carried by a pending action
/// (subscription flags, pinned state, attachment descriptors, ...).
///
/// Stored as one JSON column and forwarded verbatim to the write call at
/// sync time, so unknown options survive round trips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOptions(Value);

pub const ATTACHMENTS_OPTION: &str = "attachmentsid";

impl ActionOptions {
    pub fn new(value: Value) -> Result<Self, String> {
        Self::validate(&value)?;
        Ok(Self(value))
    }

    pub fn empty() -> Self {
        Self(Value::Object(serde_json::Map::new()))
    }

    pub fn from_json_str(json: &str) -> Result<Self, String> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| format!("Invalid options JSON: {e}"))?;
        Self::new(value)
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn set(&mut self, name: &str, value: Value) {
        if let Value::Object(map) = &mut self.0 {
            map.insert(name.to_string(), value);
        }
    }

    /// Attachment state of the draft, if any.
    pub fn attachments(&self) -> Option<AttachmentsId> {
        self.get(ATTACHMENTS_OPTION)
            .cloned()
            .and_then(|value| serde_json::from_value(value).ok())
    }

    /// Replace the staged attachment descriptor with the uploaded draft
    /// area id, after the files have reached the server.
    pub fn set_draft_item_id(&mut self, item_id: i64) {
        self.set(ATTACHMENTS_OPTION, Value::from(item_id));
    }

    pub fn set_attachments(&mut self, attachments: AttachmentsId) {
        if let Ok(value) = serde_json::to_value(attachments) {
            self.set(ATTACHMENTS_OPTION, value);
        }
    }

    fn validate(value: &Value) -> Result<(), String> {
        if !value.is_object() {
            return Err("Action options must be a JSON object".to_string());
        }
        Ok(())
    }
}

impl Default for ActionOptions {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<ActionOptions> for Value {
    fn from(options: ActionOptions) -> Self {
        options.0
    }
}
