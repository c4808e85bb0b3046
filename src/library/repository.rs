use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::types::{
    Book, BookItem, ExtensionStatus, Loan, LoanId, LoanRecord, Patron, PatronId, RenewalStatus,
    ReturnStatus,
};

/// Errors raised by data sources and business services.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed data in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0} not found")]
    NotFound(String),
    /// The requested change contradicts current data (e.g. copy already on loan).
    #[error("{0}")]
    Conflict(String),
    /// The collaborator does not implement this call.
    #[error("operation not supported: {0}")]
    Unsupported(&'static str),
}

/// Result of an optional bulk read.
///
/// `None` means the source does not expose this read at all, which is
/// different from exposing it and failing (`Some(Err(..))`).
pub type BulkRead<T> = Option<Result<Vec<T>, StoreError>>;

/// Direct access to whole collections. Every read is optional.
pub trait CatalogSource {
    fn books(&self) -> BulkRead<Book> {
        None
    }

    fn book_items(&self) -> BulkRead<BookItem> {
        None
    }

    fn loans(&self) -> BulkRead<Loan> {
        None
    }
}

pub trait PatronRepository {
    /// Patrons whose name matches `query`, in the repository's result order.
    fn search_patrons(&self, query: &str) -> Result<Vec<Patron>, StoreError>;

    fn get_patron(&self, id: PatronId) -> Result<Option<Patron>, StoreError>;

    /// Full catalog, if this repository can serve it.
    fn all_books(&self) -> BulkRead<Book> {
        None
    }

    /// Full copy inventory, if this repository can serve it.
    fn all_book_items(&self) -> BulkRead<BookItem> {
        None
    }
}

pub trait LoanRepository {
    fn get_loan(&self, id: LoanId) -> Result<Option<LoanRecord>, StoreError>;

    fn loans_by_patron(&self, patron_id: PatronId) -> Result<Vec<LoanRecord>, StoreError>;

    fn all_loans(&self) -> BulkRead<Loan> {
        None
    }
}

pub trait LoanService {
    fn return_loan(&self, id: LoanId) -> Result<ReturnStatus, StoreError>;

    fn extend_loan(&self, id: LoanId) -> Result<ExtensionStatus, StoreError>;

    /// Creates a new active loan of `item` for `patron`.
    fn checkout_book(&self, patron: &Patron, item: &BookItem) -> Result<Loan, StoreError>;
}

pub trait PatronService {
    fn renew_membership(&self, id: PatronId) -> Result<RenewalStatus, StoreError>;
}
