//! # Library Data
//!
//! The collaborators the console talks to: repositories, business services,
//! and the entities they exchange. The console only sees the traits in
//! [`repository`]; [`JsonStore`] is the one implementation shipped.

pub mod json_store;
pub mod repository;
pub mod services;
pub mod types;

pub use json_store::{JsonStore, LibraryData};
pub use repository::{
    BulkRead, CatalogSource, LoanRepository, LoanService, PatronRepository, PatronService,
    StoreError,
};
pub use services::LoanPolicy;
pub use types::{
    Author, Book, BookItem, ExtensionStatus, Loan, LoanRecord, Patron, RenewalStatus,
    ResolvedLoan, ReturnStatus,
};
