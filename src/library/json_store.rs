//! # JSON Store
//!
//! File-backed implementation of every collaborator interface.
//!
//! A data directory holds one JSON array per collection:
//!
//! ```text
//! data/
//! ├── Patrons.json
//! ├── Authors.json
//! ├── Books.json
//! ├── BookItems.json
//! └── Loans.json
//! ```
//!
//! Everything is loaded once at open. Mutations (see `services.rs`) are
//! written back per collection using atomic rename (write `.tmp`, then
//! `rename()`), and only committed in memory once the write succeeded.

use std::cell::{Ref, RefCell};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use log::{debug, info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::repository::{
    BulkRead, CatalogSource, LoanRepository, PatronRepository, StoreError,
};
use super::services::LoanPolicy;
use super::types::{
    Author, Book, BookItem, Loan, LoanId, LoanRecord, Patron, PatronId,
};

pub const PATRONS_FILE: &str = "Patrons.json";
pub const AUTHORS_FILE: &str = "Authors.json";
pub const BOOKS_FILE: &str = "Books.json";
pub const BOOK_ITEMS_FILE: &str = "BookItems.json";
pub const LOANS_FILE: &str = "Loans.json";

/// All collections of one data directory.
#[derive(Debug, Default, Clone)]
pub struct LibraryData {
    pub patrons: Vec<Patron>,
    pub authors: Vec<Author>,
    pub books: Vec<Book>,
    pub book_items: Vec<BookItem>,
    pub loans: Vec<Loan>,
}

impl LibraryData {
    /// Joins a loan with its copy, book and author where those exist.
    pub fn record_for(&self, loan: &Loan) -> LoanRecord {
        let item = self
            .book_items
            .iter()
            .find(|i| i.id == loan.book_item_id)
            .cloned();
        let book = item
            .as_ref()
            .and_then(|i| self.books.iter().find(|b| b.id == i.book_id))
            .cloned();
        let author = book
            .as_ref()
            .and_then(|b| self.authors.iter().find(|a| a.id == b.author_id))
            .cloned();
        LoanRecord { loan: loan.clone(), item, book, author }
    }
}

pub struct JsonStore {
    dir: PathBuf,
    data: RefCell<LibraryData>,
    pub(super) policy: LoanPolicy,
    today: Option<NaiveDate>,
}

impl JsonStore {
    /// Load every collection from `dir`. A missing file is treated as an empty
    /// collection; a malformed one is an error.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(StoreError::NotFound(format!("data directory {}", dir.display())));
        }
        let data = LibraryData {
            patrons: load_collection(&dir, PATRONS_FILE)?,
            authors: load_collection(&dir, AUTHORS_FILE)?,
            books: load_collection(&dir, BOOKS_FILE)?,
            book_items: load_collection(&dir, BOOK_ITEMS_FILE)?,
            loans: load_collection(&dir, LOANS_FILE)?,
        };
        info!(
            "Loaded {} patrons, {} books, {} copies, {} loans from {}",
            data.patrons.len(),
            data.books.len(),
            data.book_items.len(),
            data.loans.len(),
            dir.display()
        );
        Ok(Self::from_data(dir, data))
    }

    /// Wrap already-loaded data. Nothing is read from `dir` until a mutation
    /// writes to it.
    pub fn from_data(dir: impl Into<PathBuf>, data: LibraryData) -> Self {
        Self {
            dir: dir.into(),
            data: RefCell::new(data),
            policy: LoanPolicy::default(),
            today: None,
        }
    }

    pub fn with_policy(mut self, policy: LoanPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Pin the store's notion of "today" (used by tests and replays).
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn data(&self) -> Ref<'_, LibraryData> {
        self.data.borrow()
    }

    /// Persist `loans` and, on success, make them the in-memory loans.
    pub(super) fn commit_loans(&self, loans: Vec<Loan>) -> Result<(), StoreError> {
        write_collection(&self.dir, LOANS_FILE, &loans)?;
        self.data.borrow_mut().loans = loans;
        Ok(())
    }

    /// Persist `patrons` and, on success, make them the in-memory patrons.
    pub(super) fn commit_patrons(&self, patrons: Vec<Patron>) -> Result<(), StoreError> {
        write_collection(&self.dir, PATRONS_FILE, &patrons)?;
        self.data.borrow_mut().patrons = patrons;
        Ok(())
    }
}

fn load_collection<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<Vec<T>, StoreError> {
    let path = dir.join(file);
    if !path.exists() {
        warn!("{} not found, starting with an empty collection", path.display());
        return Ok(Vec::new());
    }
    let json = fs::read_to_string(&path).map_err(|source| StoreError::Io {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| StoreError::Parse { path, source })
}

/// Atomically write `items` as pretty JSON to `dir/file` (via `.tmp` + rename).
fn write_collection<T: Serialize>(dir: &Path, file: &str, items: &[T]) -> Result<(), StoreError> {
    let path = dir.join(file);
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(items).map_err(|source| StoreError::Parse {
        path: path.clone(),
        source,
    })?;
    fs::write(&tmp_path, json).map_err(|source| StoreError::Io {
        path: tmp_path.clone(),
        source,
    })?;
    fs::rename(&tmp_path, &path).map_err(|source| StoreError::Io {
        path: path.clone(),
        source,
    })?;
    debug!("Wrote {} records to {}", items.len(), path.display());
    Ok(())
}

impl CatalogSource for JsonStore {
    fn books(&self) -> BulkRead<Book> {
        Some(Ok(self.data().books.clone()))
    }

    fn book_items(&self) -> BulkRead<BookItem> {
        Some(Ok(self.data().book_items.clone()))
    }

    fn loans(&self) -> BulkRead<Loan> {
        Some(Ok(self.data().loans.clone()))
    }
}

impl PatronRepository for JsonStore {
    fn search_patrons(&self, query: &str) -> Result<Vec<Patron>, StoreError> {
        let needle = query.to_lowercase();
        let mut matches: Vec<Patron> = self
            .data()
            .patrons
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(matches)
    }

    fn get_patron(&self, id: PatronId) -> Result<Option<Patron>, StoreError> {
        Ok(self.data().patrons.iter().find(|p| p.id == id).cloned())
    }

    fn all_books(&self) -> BulkRead<Book> {
        self.books()
    }

    fn all_book_items(&self) -> BulkRead<BookItem> {
        self.book_items()
    }
}

impl LoanRepository for JsonStore {
    fn get_loan(&self, id: LoanId) -> Result<Option<LoanRecord>, StoreError> {
        let data = self.data();
        Ok(data
            .loans
            .iter()
            .find(|l| l.id == id)
            .map(|l| data.record_for(l)))
    }

    fn loans_by_patron(&self, patron_id: PatronId) -> Result<Vec<LoanRecord>, StoreError> {
        let data = self.data();
        let mut loans: Vec<&Loan> = data.loans.iter().filter(|l| l.patron_id == patron_id).collect();
        loans.sort_by_key(|l| (l.loan_date, l.id));
        Ok(loans.into_iter().map(|l| data.record_for(l)).collect())
    }

    fn all_loans(&self) -> BulkRead<Loan> {
        self.loans()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{date, sample_data, scratch_dir};

    #[test]
    fn test_open_missing_directory_is_not_found() {
        let dir = std::env::temp_dir().join("librarian-does-not-exist-7f3a");
        assert!(matches!(JsonStore::open(&dir), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_open_treats_missing_files_as_empty() {
        let dir = scratch_dir();
        let store = JsonStore::open(&dir).unwrap();
        assert!(store.data().patrons.is_empty());
        assert!(store.data().loans.is_empty());
    }

    #[test]
    fn test_open_rejects_malformed_file() {
        let dir = scratch_dir();
        fs::write(dir.join(BOOKS_FILE), "[{ not json").unwrap();
        assert!(matches!(JsonStore::open(&dir), Err(StoreError::Parse { .. })));
    }

    #[test]
    fn test_commit_loans_round_trips_through_disk() {
        let dir = scratch_dir();
        let store = JsonStore::from_data(&dir, sample_data());
        let mut loans = store.data().loans.clone();
        loans[0].return_date = Some(date(2024, 6, 1));
        store.commit_loans(loans).unwrap();

        let reopened = JsonStore::open(&dir).unwrap();
        assert_eq!(reopened.data().loans[0].return_date, Some(date(2024, 6, 1)));
        assert!(!dir.join("Loans.tmp").exists());
    }

    #[test]
    fn test_search_patrons_is_case_insensitive_and_sorted() {
        let store = JsonStore::from_data(scratch_dir(), sample_data());
        let names: Vec<String> = store
            .search_patrons("SMITH")
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Alice Smith", "Bob Smithers"]);
    }

    #[test]
    fn test_loans_by_patron_joins_available_links() {
        let store = JsonStore::from_data(scratch_dir(), sample_data());
        let records = store.loans_by_patron(1).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].book.as_ref().unwrap().title, "The Hobbit");
        assert_eq!(records[0].author.as_ref().unwrap().name, "J. R. R. Tolkien");
        // Loan 2 points at a copy that is not in the inventory
        assert!(records[1].item.is_none());
        assert!(records[1].clone().resolve().is_none());
    }

    #[test]
    fn test_get_loan_unknown_id() {
        let store = JsonStore::from_data(scratch_dir(), sample_data());
        assert!(store.get_loan(999).unwrap().is_none());
    }
}
