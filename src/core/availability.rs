//! # Book Availability
//!
//! Title matching and copy classification for the book search flow.
//!
//! A copy is *on loan* when some loan referencing it has no return date;
//! every other copy is *available*. When nothing is available the report
//! carries the earliest due date among the active loans.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::library::{Book, BookItem, Loan};

/// Case-insensitive substring matches against titles, in catalog order.
pub fn match_titles<'a>(books: &'a [Book], fragment: &str) -> Vec<&'a Book> {
    let needle = fragment.to_lowercase();
    books
        .iter()
        .filter(|book| book.title.to_lowercase().contains(&needle))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// The catalog has no physical copy of this title.
    NoCopies,
    Available { available: usize, total: usize },
    /// Every copy is out. `earliest_due` is `None` only when there are no
    /// active loans to read it from; [`AvailabilityReport::assess`] never
    /// produces that, since it only reports `OnLoan` when each copy has one.
    OnLoan { earliest_due: Option<NaiveDate> },
}

/// Snapshot of one book's copies and the loans currently holding them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityReport {
    pub book: Book,
    /// Copies in catalog enumeration order.
    pub copies: Vec<BookItem>,
    /// At most one active loan per copy, in copy order.
    pub active_loans: Vec<Loan>,
}

impl AvailabilityReport {
    /// Cross-references `items` and `loans` for `book`. Either slice may be
    /// empty or contain entries for other books.
    pub fn assess(book: &Book, items: &[BookItem], loans: &[Loan]) -> Self {
        let copies: Vec<BookItem> = items
            .iter()
            .filter(|item| item.book_id == book.id)
            .cloned()
            .collect();
        let active_loans = copies
            .iter()
            .filter_map(|copy| {
                loans
                    .iter()
                    .find(|loan| loan.book_item_id == copy.id && loan.is_active())
                    .cloned()
            })
            .collect();
        Self { book: book.clone(), copies, active_loans }
    }

    pub fn availability(&self) -> Availability {
        let total = self.copies.len();
        if total == 0 {
            return Availability::NoCopies;
        }
        if self.active_loans.len() < total {
            return Availability::Available {
                available: total - self.active_loans.len(),
                total,
            };
        }
        Availability::OnLoan {
            earliest_due: self.active_loans.iter().map(|loan| loan.due_date).min(),
        }
    }

    /// First copy, in enumeration order, that no active loan references.
    pub fn first_available_copy(&self) -> Option<&BookItem> {
        let taken: HashSet<_> = self.active_loans.iter().map(|loan| loan.book_item_id).collect();
        self.copies.iter().find(|copy| !taken.contains(&copy.id))
    }
}
