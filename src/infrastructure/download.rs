use crate::domain::DocumentError;
use std::fs;
use std::path::{Path, PathBuf};

pub struct DocumentRepository;

impl DocumentRepository {
    /// File name offered for a downloaded report. The company name is used
    /// as typed.
    pub fn file_name(company_name: &str) -> String {
        format!("Symbis_Scan_{}.pdf", company_name)
    }

    pub fn save_document(
        document: &[u8],
        company_name: &str,
        directory: &Path,
    ) -> Result<PathBuf, DocumentError> {
        let file_name = Self::file_name(company_name);
        if file_name.contains(['/', '\\']) {
            return Err(DocumentError::InvalidFileName(file_name));
        }

        fs::create_dir_all(directory)?;
        let path = directory.join(&file_name);
        fs::write(&path, document)?;
        log::info!("Saved report ({} bytes) to {}", document.len(), path.display());
        Ok(path)
    }
}
