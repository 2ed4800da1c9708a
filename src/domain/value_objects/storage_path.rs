use uuid::Uuid;

/// Canonical object-storage locations for a document and its processing
/// artifacts. Every path in the system is built here; nothing else
/// concatenates storage keys, so a lookup never has to guess between
/// path variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePath {
    workspace_id: Uuid,
    document_id: Uuid,
}

impl StoragePath {
    pub fn new(workspace_id: Uuid, document_id: Uuid) -> Self {
        Self {
            workspace_id,
            document_id,
        }
    }

    fn root(&self) -> String {
        format!("documents/{}/{}", self.workspace_id, self.document_id)
    }

    /// Location of the uploaded bytes. The extension is normalized to
    /// lowercase so the dispatch in the extractor sees one spelling.
    pub fn original(&self, extension: &str) -> String {
        let ext = extension.trim_start_matches('.').to_lowercase();
        if ext.is_empty() {
            format!("{}/original", self.root())
        } else {
            format!("{}/original.{}", self.root(), ext)
        }
    }

    pub fn page_image(&self, page_number: u32) -> String {
        format!("{}/pages/{}.png", self.root(), page_number)
    }

    pub fn page_text(&self, page_number: u32) -> String {
        format!("{}/pages/{}.txt", self.root(), page_number)
    }

    pub fn formatted_text(&self) -> String {
        format!("{}/formatted.txt", self.root())
    }

    /// Prefix covering everything stored for the document, used for
    /// cascading artifact deletion.
    pub fn prefix(&self) -> String {
        self.root()
    }

    /// Declared file extension of a stored original, derived from the
    /// canonical path itself.
    pub fn extension_of(path: &str) -> &str {
        path.rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.contains('/'))
            .unwrap_or("")
    }
}
