use serde::{Deserialize, Serialize};

/// Descriptor of a file attached to a draft.
///
/// Already-uploaded files carry a server URL; files staged locally are
/// identified by name inside the draft's staging folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fileurl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filesize: Option<i64>,
}

impl FileRef {
    pub fn local(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            fileurl: None,
            filesize: None,
        }
    }

    pub fn remote(filename: impl Into<String>, fileurl: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            fileurl: Some(fileurl.into()),
            filesize: None,
        }
    }
}

/// Attachments of a draft that has not been synced yet.
///
/// `online` files already live on the server and are re-used as-is;
/// `offline` signals that additional files are staged in the draft's local
/// folder and must be uploaded before the draft itself is submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentSet {
    #[serde(default)]
    pub online: Vec<FileRef>,
    #[serde(default)]
    pub offline: bool,
}

impl AttachmentSet {
    pub fn is_empty(&self) -> bool {
        self.online.is_empty() && !self.offline
    }
}

/// State of the `attachmentsid` option of a draft: either a server-side
/// draft area id (upload already done) or the set still to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttachmentsId {
    DraftItemId(i64),
    Staged(AttachmentSet),
}
