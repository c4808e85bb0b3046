//! # Inventory Reads
//!
//! Whole-collection reads for the book search flow. Each read asks the
//! direct catalog source first; if that source does not expose the read,
//! it falls back to the repository that might; if neither does, or the
//! chosen source fails, the read is empty.
//!
//! ```text
//! books       : catalog.books()       → patrons.all_books()       → []
//! book items  : catalog.book_items()  → patrons.all_book_items()  → []
//! loans       : catalog.loans()       → loans.all_loans()         → []
//! ```

use log::{debug, warn};

use crate::core::availability::AvailabilityReport;
use crate::library::{Book, BookItem, BulkRead, CatalogSource, Loan, LoanRepository, PatronRepository};

pub struct Inventory<'a> {
    pub catalog: Option<&'a dyn CatalogSource>,
    pub patrons: &'a dyn PatronRepository,
    pub loans: &'a dyn LoanRepository,
}

impl Inventory<'_> {
    pub fn books(&self) -> Vec<Book> {
        let read = self
            .catalog
            .and_then(|c| c.books())
            .or_else(|| self.patrons.all_books());
        settle("books", read)
    }

    pub fn book_items(&self) -> Vec<BookItem> {
        let read = self
            .catalog
            .and_then(|c| c.book_items())
            .or_else(|| self.patrons.all_book_items());
        settle("book items", read)
    }

    pub fn loans(&self) -> Vec<Loan> {
        let read = self
            .catalog
            .and_then(|c| c.loans())
            .or_else(|| self.loans.all_loans());
        settle("loans", read)
    }

    /// Fresh availability snapshot for `book`.
    pub fn assess(&self, book: &Book) -> AvailabilityReport {
        let items = self.book_items();
        if items.iter().all(|item| item.book_id != book.id) {
            // No copies: loans are irrelevant
            return AvailabilityReport::assess(book, &items, &[]);
        }
        AvailabilityReport::assess(book, &items, &self.loans())
    }
}

fn settle<T>(what: &str, read: BulkRead<T>) -> Vec<T> {
    match read {
        Some(Ok(records)) => records,
        Some(Err(e)) => {
            warn!("Reading {} failed, treating as empty: {}", what, e);
            Vec::new()
        }
        None => {
            debug!("No source exposes {}", what);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeLibrary, book, sample_data};

    #[test]
    fn test_direct_catalog_wins_over_repository() {
        let direct = FakeLibrary::new(sample_data()).exposing_bulk_reads();
        let mut other = sample_data();
        other.books.truncate(1);
        let repo = FakeLibrary::new(other).exposing_bulk_reads();
        let inventory = Inventory { catalog: Some(&direct), patrons: &repo, loans: &repo };
        assert_eq!(inventory.books().len(), sample_data().books.len());
    }

    #[test]
    fn test_falls_back_to_repository_reads() {
        let repo = FakeLibrary::new(sample_data()).exposing_bulk_reads();
        let inventory = Inventory { catalog: None, patrons: &repo, loans: &repo };
        assert_eq!(inventory.books().len(), sample_data().books.len());
        assert_eq!(inventory.book_items().len(), sample_data().book_items.len());
        assert_eq!(inventory.loans().len(), sample_data().loans.len());
    }

    #[test]
    fn test_nothing_exposed_reads_empty() {
        let repo = FakeLibrary::new(sample_data());
        let inventory = Inventory { catalog: None, patrons: &repo, loans: &repo };
        assert!(inventory.books().is_empty());
        assert!(inventory.book_items().is_empty());
        assert!(inventory.loans().is_empty());
    }

    #[test]
    fn test_failing_source_reads_empty_without_fallback() {
        let direct = FakeLibrary::new(sample_data()).failing_bulk_reads();
        let repo = FakeLibrary::new(sample_data()).exposing_bulk_reads();
        let inventory = Inventory { catalog: Some(&direct), patrons: &repo, loans: &repo };
        assert!(inventory.books().is_empty());
    }

    #[test]
    fn test_assess_uses_fresh_reads() {
        let repo = FakeLibrary::new(sample_data()).exposing_bulk_reads();
        let inventory = Inventory { catalog: None, patrons: &repo, loans: &repo };
        let hobbit = book(1, "The Hobbit");
        let report = inventory.assess(&hobbit);
        assert_eq!(report.copies.len(), 1);
        assert_eq!(report.active_loans.len(), 1);
    }
}
