// 📁 Documents - upload zones and the per-category document repository

use crate::error::{AppealsError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

// ============================================================================
// FILE DESCRIPTORS
// ============================================================================

/// A file offered to an upload zone: only its name and size matter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub name: String,
    pub size: u64,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        FileDescriptor {
            name: name.into(),
            size,
        }
    }

    /// Describe a file on disk by its file name and length
    pub fn from_path(path: &Path) -> Result<Self> {
        let meta = std::fs::metadata(path).map_err(|e| AppealsError::io(path, e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(FileDescriptor::new(name, meta.len()))
    }
}

/// Expand a typed path into descriptors: a directory yields its files
/// (sorted by name, not recursive), anything else yields itself.
pub fn descriptors_from_path(path: &Path) -> Result<Vec<FileDescriptor>> {
    if !path.is_dir() {
        return Ok(vec![FileDescriptor::from_path(path)?]);
    }

    let entries = std::fs::read_dir(path).map_err(|e| AppealsError::io(path, e))?;
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| AppealsError::io(path, e))?;
        let p = entry.path();
        if p.is_file() {
            paths.push(p);
        }
    }
    paths.sort();

    paths.iter().map(|p| FileDescriptor::from_path(p)).collect()
}

// ============================================================================
// UPLOAD ZONES & CLASSIFICATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadZone {
    /// Claims CSV zone: `.csv` only, first match of a batch
    Csv,
    /// Document zone: `.pdf` / `.docx`, every match of a batch
    Document,
}

impl UploadZone {
    pub fn accepts(&self, name: &str) -> bool {
        match self {
            UploadZone::Csv => name.ends_with(".csv"),
            UploadZone::Document => name.ends_with(".pdf") || name.ends_with(".docx"),
        }
    }

    /// Files from a batch that this zone will hand to the container
    pub fn select<'a>(&self, files: &'a [FileDescriptor]) -> Vec<&'a FileDescriptor> {
        let mut accepted = files.iter().filter(|f| self.accepts(&f.name));
        match self {
            UploadZone::Csv => accepted.next().into_iter().collect(),
            UploadZone::Document => accepted.collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentCategory {
    Contracts,
    Gpo,
    Invoices,
}

impl DocumentCategory {
    pub const ALL: [DocumentCategory; 3] = [
        DocumentCategory::Contracts,
        DocumentCategory::Gpo,
        DocumentCategory::Invoices,
    ];

    /// Categorise by case-insensitive name match; "invoice" beats "gpo"
    pub fn classify(name: &str) -> Self {
        let lower = name.to_lowercase();
        let mut category = DocumentCategory::Contracts;
        if lower.contains("gpo") {
            category = DocumentCategory::Gpo;
        }
        if lower.contains("invoice") {
            category = DocumentCategory::Invoices;
        }
        category
    }

    pub fn tab_label(&self) -> &'static str {
        match self {
            DocumentCategory::Contracts => "Contracts",
            DocumentCategory::Gpo => "GPO Docs",
            DocumentCategory::Invoices => "Invoices",
        }
    }

    pub fn list_title(&self) -> &'static str {
        match self {
            DocumentCategory::Contracts => "Contracts",
            DocumentCategory::Gpo => "GPO Documents",
            DocumentCategory::Invoices => "Invoices",
        }
    }

    pub fn empty_message(&self) -> String {
        format!("No {} uploaded yet", self.list_title().to_lowercase())
    }

    pub fn index(&self) -> usize {
        match self {
            DocumentCategory::Contracts => 0,
            DocumentCategory::Gpo => 1,
            DocumentCategory::Invoices => 2,
        }
    }
}

impl fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DocumentCategory::Contracts => "contracts",
            DocumentCategory::Gpo => "gpo",
            DocumentCategory::Invoices => "invoices",
        };
        f.write_str(s)
    }
}

// ============================================================================
// DOCUMENT REPOSITORY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadedFile {
    /// Millisecond timestamp of the upload
    pub id: i64,
    pub name: String,
    pub size: u64,
    pub upload_date: String,
}

impl UploadedFile {
    pub fn size_label(&self) -> String {
        format!("{:.1} KB", self.size as f64 / 1024.0)
    }
}

/// US short date as shown next to each upload, e.g. "3/7/2025"
pub fn display_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentLibrary {
    pub contracts: Vec<UploadedFile>,
    pub gpo: Vec<UploadedFile>,
    pub invoices: Vec<UploadedFile>,
    #[serde(skip)]
    last_id: i64,
}

impl DocumentLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an accepted document; ids stay strictly increasing even when
    /// two uploads share a millisecond.
    pub fn add(
        &mut self,
        file: &FileDescriptor,
        category: DocumentCategory,
        timestamp_ms: i64,
        date: NaiveDate,
    ) -> &UploadedFile {
        let id = timestamp_ms.max(self.last_id + 1);
        self.last_id = id;

        let list = self.list_mut(category);
        list.push(UploadedFile {
            id,
            name: file.name.clone(),
            size: file.size,
            upload_date: display_date(date),
        });
        &list[list.len() - 1]
    }

    pub fn files(&self, category: DocumentCategory) -> &[UploadedFile] {
        match category {
            DocumentCategory::Contracts => &self.contracts,
            DocumentCategory::Gpo => &self.gpo,
            DocumentCategory::Invoices => &self.invoices,
        }
    }

    fn list_mut(&mut self, category: DocumentCategory) -> &mut Vec<UploadedFile> {
        match category {
            DocumentCategory::Contracts => &mut self.contracts,
            DocumentCategory::Gpo => &mut self.gpo,
            DocumentCategory::Invoices => &mut self.invoices,
        }
    }

    pub fn total(&self) -> usize {
        self.contracts.len() + self.gpo.len() + self.invoices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 7).unwrap()
    }

    #[test]
    fn test_classify_by_name() {
        assert_eq!(DocumentCategory::classify("gpo_contract.pdf"), DocumentCategory::Gpo);
        assert_eq!(DocumentCategory::classify("invoice_march.pdf"), DocumentCategory::Invoices);
        assert_eq!(DocumentCategory::classify("msa.pdf"), DocumentCategory::Contracts);
    }

    #[test]
    fn test_invoice_wins_over_gpo() {
        assert_eq!(
            DocumentCategory::classify("GPO_Invoice_42.docx"),
            DocumentCategory::Invoices
        );
    }

    #[test]
    fn test_zone_suffixes_are_case_sensitive() {
        assert!(UploadZone::Document.accepts("msa.pdf"));
        assert!(UploadZone::Document.accepts("terms.docx"));
        assert!(!UploadZone::Document.accepts("MSA.PDF"));
        assert!(!UploadZone::Document.accepts("notes.txt"));
        assert!(UploadZone::Csv.accepts("claims.csv"));
        assert!(!UploadZone::Csv.accepts("claims.pdf"));
    }

    #[test]
    fn test_csv_zone_takes_first_match_only() {
        let files = vec![
            FileDescriptor::new("readme.txt", 10),
            FileDescriptor::new("q1.csv", 20),
            FileDescriptor::new("q2.csv", 30),
        ];
        let picked = UploadZone::Csv.select(&files);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].name, "q1.csv");

        let docs = UploadZone::Document.select(&files);
        assert!(docs.is_empty());
    }

    #[test]
    fn test_library_ids_strictly_increase() {
        let mut library = DocumentLibrary::new();
        let file = FileDescriptor::new("msa.pdf", 2048);

        let first = library.add(&file, DocumentCategory::Contracts, 1_000, date()).id;
        let second = library.add(&file, DocumentCategory::Gpo, 1_000, date()).id;
        let third = library.add(&file, DocumentCategory::Gpo, 900, date()).id;

        assert_eq!(first, 1_000);
        assert_eq!(second, 1_001);
        assert_eq!(third, 1_002);
        assert_eq!(library.files(DocumentCategory::Gpo).len(), 2);
        assert_eq!(library.total(), 3);
    }

    #[test]
    fn test_uploaded_file_labels() {
        let mut library = DocumentLibrary::new();
        let file = FileDescriptor::new("msa.pdf", 1536);
        let uploaded = library.add(&file, DocumentCategory::Contracts, 1, date());
        assert_eq!(uploaded.size_label(), "1.5 KB");
        assert_eq!(uploaded.upload_date, "3/7/2025");
    }

    #[test]
    fn test_empty_messages() {
        assert_eq!(
            DocumentCategory::Gpo.empty_message(),
            "No gpo documents uploaded yet"
        );
        assert_eq!(
            DocumentCategory::Contracts.empty_message(),
            "No contracts uploaded yet"
        );
    }

    #[test]
    fn test_descriptors_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b_invoice.pdf"), b"abc").unwrap();
        std::fs::write(dir.path().join("a_gpo.pdf"), b"abcdef").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let files = descriptors_from_path(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0], FileDescriptor::new("a_gpo.pdf", 6));
        assert_eq!(files[1], FileDescriptor::new("b_invoice.pdf", 3));
    }

    #[test]
    fn test_descriptor_missing_file() {
        assert!(FileDescriptor::from_path(Path::new("/nonexistent/msa.pdf")).is_err());
    }

    proptest! {
        #[test]
        fn classification_ignores_case(prefix in "[a-z_]{0,8}", suffix in "[a-z_]{0,8}") {
            let lower = format!("{prefix}gpo{suffix}.pdf");
            let upper = format!("{prefix}GPO{suffix}.pdf");
            prop_assert_eq!(
                DocumentCategory::classify(&lower),
                DocumentCategory::classify(&upper)
            );
        }

        #[test]
        fn names_without_keywords_are_contracts(name in "[a-fh-z]{1,12}") {
            prop_assume!(!name.contains("invoice"));
            prop_assert_eq!(
                DocumentCategory::classify(&format!("{name}.pdf")),
                DocumentCategory::Contracts
            );
        }
    }
}
