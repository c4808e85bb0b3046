//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::cell::{Cell, RefCell};
use std::io::Cursor;
use std::path::PathBuf;

use chrono::{Days, NaiveDate};

use crate::console::{Collaborators, Console};
use crate::library::types::{LoanId, PatronId};
use crate::library::{
    Author, Book, BookItem, BulkRead, CatalogSource, ExtensionStatus, LibraryData, Loan,
    LoanRecord, LoanRepository, LoanService, Patron, PatronRepository, PatronService,
    RenewalStatus, ResolvedLoan, ReturnStatus, StoreError,
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// The pinned "today" used with the sample data.
pub fn test_today() -> NaiveDate {
    date(2024, 5, 12)
}

pub fn patron(id: PatronId, name: &str) -> Patron {
    Patron {
        id,
        name: name.to_string(),
        membership_start: date(2023, 1, 1),
        membership_end: date(2025, 1, 1),
    }
}

pub fn book(id: u32, title: &str) -> Book {
    Book { id, title: title.to_string(), author_id: 1 }
}

pub fn copy(id: u32, book_id: u32) -> BookItem {
    BookItem {
        id,
        book_id,
        acquisition_date: date(2020, 1, 1),
        condition: None,
    }
}

pub fn loan(id: LoanId, item_id: u32, due: NaiveDate, returned: Option<NaiveDate>) -> Loan {
    Loan {
        id,
        book_item_id: item_id,
        patron_id: 1,
        loan_date: date(2024, 1, 1),
        due_date: due,
        return_date: returned,
    }
}

pub fn resolved_loan(id: LoanId, title: &str, returned: Option<NaiveDate>) -> ResolvedLoan {
    ResolvedLoan {
        loan: loan(id, 100 + id, date(2024, 6, 1), returned),
        item: copy(100 + id, id),
        book: book(id, title),
        author: Some(Author { id: 1, name: "Someone".to_string() }),
    }
}

pub fn resolved_record(id: LoanId, title: &str) -> LoanRecord {
    let resolved = resolved_loan(id, title, None);
    LoanRecord {
        loan: resolved.loan,
        item: Some(resolved.item),
        book: Some(resolved.book),
        author: resolved.author,
    }
}

pub fn unresolved_record(id: LoanId) -> LoanRecord {
    LoanRecord {
        loan: loan(id, 900 + id, date(2024, 6, 1), None),
        item: None,
        book: None,
        author: None,
    }
}

/// Small dataset:
///
/// - Alice Smith (1): loan 1 on The Hobbit (active), loan 2 on a missing copy
/// - Bob Smithers (2): loan 3 on Dune copy 20 (returned)
/// - Carol Jones (3, membership lapsed): loan 4 on Dune copy 21 (active)
/// - The Fellowship of the Ring: one copy, never loaned
pub fn sample_data() -> LibraryData {
    LibraryData {
        patrons: vec![
            Patron {
                id: 1,
                name: "Alice Smith".into(),
                membership_start: date(2023, 1, 1),
                membership_end: date(2025, 1, 1),
            },
            Patron {
                id: 2,
                name: "Bob Smithers".into(),
                membership_start: date(2023, 6, 1),
                membership_end: date(2024, 6, 1),
            },
            Patron {
                id: 3,
                name: "Carol Jones".into(),
                membership_start: date(2022, 5, 1),
                membership_end: date(2024, 5, 1),
            },
        ],
        authors: vec![
            Author { id: 1, name: "J. R. R. Tolkien".into() },
            Author { id: 2, name: "Frank Herbert".into() },
        ],
        books: vec![
            Book { id: 1, title: "The Hobbit".into(), author_id: 1 },
            Book { id: 2, title: "Dune".into(), author_id: 2 },
            Book { id: 3, title: "The Fellowship of the Ring".into(), author_id: 1 },
        ],
        book_items: vec![copy(10, 1), copy(20, 2), copy(21, 2), copy(30, 3)],
        loans: vec![
            Loan {
                id: 1,
                book_item_id: 10,
                patron_id: 1,
                loan_date: date(2024, 5, 1),
                due_date: date(2024, 5, 15),
                return_date: None,
            },
            Loan {
                id: 2,
                book_item_id: 99,
                patron_id: 1,
                loan_date: date(2024, 5, 10),
                due_date: date(2024, 5, 24),
                return_date: None,
            },
            Loan {
                id: 3,
                book_item_id: 20,
                patron_id: 2,
                loan_date: date(2024, 4, 1),
                due_date: date(2024, 4, 15),
                return_date: Some(date(2024, 4, 10)),
            },
            Loan {
                id: 4,
                book_item_id: 21,
                patron_id: 3,
                loan_date: date(2024, 5, 2),
                due_date: date(2024, 6, 1),
                return_date: None,
            },
        ],
    }
}

/// A fresh, empty directory under the system temp dir.
pub fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("librarian-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

// ============================================================================
// Scripted console
// ============================================================================

pub type ScriptedConsole = Console<Cursor<Vec<u8>>, Vec<u8>>;

/// A console whose operator types `lines`, one per prompt.
pub fn scripted(lines: &[&str]) -> ScriptedConsole {
    let mut input = lines.join("\n");
    input.push('\n');
    Console::new(Cursor::new(input.into_bytes()), Vec::new())
}

pub fn transcript(console: ScriptedConsole) -> String {
    String::from_utf8(console.into_output()).unwrap()
}

// ============================================================================
// In-memory collaborators
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkMode {
    /// Bulk reads are not implemented (`None`).
    Hidden,
    Exposed,
    Failing,
}

/// In-memory collaborators with switches for failure paths.
pub struct FakeLibrary {
    pub data: RefCell<LibraryData>,
    pub bulk: BulkMode,
    pub fail_search: bool,
    pub fail_refresh: bool,
    pub fail_checkout: bool,
    /// After this many bulk loan reads, `late_loan` shows up in every later read.
    late_loan: Option<(usize, Loan)>,
    loan_reads: Cell<usize>,
    pub calls: RefCell<Vec<String>>,
}

impl FakeLibrary {
    pub fn new(data: LibraryData) -> Self {
        Self {
            data: RefCell::new(data),
            bulk: BulkMode::Hidden,
            fail_search: false,
            fail_refresh: false,
            fail_checkout: false,
            late_loan: None,
            loan_reads: Cell::new(0),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn exposing_bulk_reads(mut self) -> Self {
        self.bulk = BulkMode::Exposed;
        self
    }

    pub fn failing_bulk_reads(mut self) -> Self {
        self.bulk = BulkMode::Failing;
        self
    }

    /// Simulates another desk lending a copy while the operator is deciding.
    pub fn with_loan_appearing_after(mut self, reads: usize, loan: Loan) -> Self {
        self.late_loan = Some((reads, loan));
        self
    }

    /// Wires every collaborator role to this fake.
    pub fn collaborators(&self) -> Collaborators<'_> {
        Collaborators {
            patrons: self,
            loans: self,
            loan_service: self,
            patron_service: self,
            catalog: Some(self),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn bulk<T: Clone>(&self, what: &'static str, records: &[T]) -> BulkRead<T> {
        match self.bulk {
            BulkMode::Hidden => None,
            BulkMode::Exposed => Some(Ok(records.to_vec())),
            BulkMode::Failing => Some(Err(StoreError::Unsupported(what))),
        }
    }
}

impl CatalogSource for FakeLibrary {
    fn books(&self) -> BulkRead<Book> {
        self.bulk("books", &self.data.borrow().books)
    }

    fn book_items(&self) -> BulkRead<BookItem> {
        self.bulk("book items", &self.data.borrow().book_items)
    }

    fn loans(&self) -> BulkRead<Loan> {
        let reads = self.loan_reads.get();
        self.loan_reads.set(reads + 1);
        let mut loans = self.data.borrow().loans.clone();
        if let Some((after, late)) = &self.late_loan
            && reads >= *after
        {
            loans.push(late.clone());
        }
        self.bulk("loans", &loans)
    }
}

impl PatronRepository for FakeLibrary {
    fn search_patrons(&self, query: &str) -> Result<Vec<Patron>, StoreError> {
        self.record(format!("search {query}"));
        if self.fail_search {
            return Err(StoreError::Conflict("search backend offline".into()));
        }
        let needle = query.to_lowercase();
        Ok(self
            .data
            .borrow()
            .patrons
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    fn get_patron(&self, id: PatronId) -> Result<Option<Patron>, StoreError> {
        if self.fail_refresh {
            return Err(StoreError::Conflict("refresh failed".into()));
        }
        Ok(self.data.borrow().patrons.iter().find(|p| p.id == id).cloned())
    }

    fn all_books(&self) -> BulkRead<Book> {
        self.books()
    }

    fn all_book_items(&self) -> BulkRead<BookItem> {
        self.book_items()
    }
}

impl LoanRepository for FakeLibrary {
    fn get_loan(&self, id: LoanId) -> Result<Option<LoanRecord>, StoreError> {
        if self.fail_refresh {
            return Err(StoreError::Conflict("refresh failed".into()));
        }
        let data = self.data.borrow();
        Ok(data.loans.iter().find(|l| l.id == id).map(|l| data.record_for(l)))
    }

    fn loans_by_patron(&self, patron_id: PatronId) -> Result<Vec<LoanRecord>, StoreError> {
        let data = self.data.borrow();
        Ok(data
            .loans
            .iter()
            .filter(|l| l.patron_id == patron_id)
            .map(|l| data.record_for(l))
            .collect())
    }

    fn all_loans(&self) -> BulkRead<Loan> {
        self.loans()
    }
}

impl LoanService for FakeLibrary {
    fn return_loan(&self, id: LoanId) -> Result<ReturnStatus, StoreError> {
        self.record(format!("return {id}"));
        let mut data = self.data.borrow_mut();
        let Some(loan) = data.loans.iter_mut().find(|l| l.id == id) else {
            return Ok(ReturnStatus::LoanNotFound);
        };
        if loan.return_date.is_some() {
            return Ok(ReturnStatus::AlreadyReturned);
        }
        loan.return_date = Some(test_today());
        Ok(ReturnStatus::Success)
    }

    fn extend_loan(&self, id: LoanId) -> Result<ExtensionStatus, StoreError> {
        self.record(format!("extend {id}"));
        let mut data = self.data.borrow_mut();
        let Some(loan) = data.loans.iter_mut().find(|l| l.id == id) else {
            return Ok(ExtensionStatus::LoanNotFound);
        };
        if loan.return_date.is_some() {
            return Ok(ExtensionStatus::LoanReturned);
        }
        loan.due_date = loan.due_date + Days::new(14);
        Ok(ExtensionStatus::Success)
    }

    fn checkout_book(&self, patron: &Patron, item: &BookItem) -> Result<Loan, StoreError> {
        self.record(format!("checkout {} {}", patron.id, item.id));
        if self.fail_checkout {
            return Err(StoreError::Conflict("loan desk closed".into()));
        }
        let mut data = self.data.borrow_mut();
        let loan = Loan {
            id: data.loans.iter().map(|l| l.id).max().unwrap_or(0) + 1,
            book_item_id: item.id,
            patron_id: patron.id,
            loan_date: test_today(),
            due_date: test_today() + Days::new(14),
            return_date: None,
        };
        data.loans.push(loan.clone());
        Ok(loan)
    }
}

impl PatronService for FakeLibrary {
    fn renew_membership(&self, id: PatronId) -> Result<RenewalStatus, StoreError> {
        self.record(format!("renew {id}"));
        let mut data = self.data.borrow_mut();
        let Some(patron) = data.patrons.iter_mut().find(|p| p.id == id) else {
            return Ok(RenewalStatus::PatronNotFound);
        };
        patron.membership_end = patron.membership_end + Days::new(365);
        Ok(RenewalStatus::Success)
    }
}
