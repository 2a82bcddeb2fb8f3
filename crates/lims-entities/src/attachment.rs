//! Files and notes attached to other records.

use lims_core::LimsError;

use crate::macros::{boolean_fields, lims_entity, string_fields};

lims_entity! {
    /// A file stored by the server and attached to another record.
    File, "File", "files", "file": "file"
}

impl File {
    string_fields! {
        /// URI of the record this file is attached to.
        attached_to => "attached-to";
        /// Where the server stores the file's bytes.
        content_location => "content-location";
        /// Path the file had on the uploader's system.
        original_location, set_original_location => "original-location";
    }

    boolean_fields! {
        is_published, set_is_published => "is-published";
    }
}

lims_entity! {
    /// A free-text note attached to a project or a sample.
    ///
    /// The note's text is the document root's own content.
    Note, "Note", "notes", "ri": "note"
}

impl Note {
    #[allow(missing_docs)]
    pub async fn content(&self) -> Result<Option<String>, LimsError> {
        self.handle.root_text().await
    }

    #[allow(missing_docs)]
    pub async fn set_content(&self, value: &str) -> Result<(), LimsError> {
        self.handle.set_root_text(value).await
    }
}
