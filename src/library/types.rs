use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type PatronId = u32;
pub type AuthorId = u32;
pub type BookId = u32;
pub type BookItemId = u32;
pub type LoanId = u32;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Patron {
    pub id: PatronId,
    pub name: String,
    pub membership_start: NaiveDate,
    pub membership_end: NaiveDate,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
}

/// A catalog title. Physical copies are [`BookItem`]s.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author_id: AuthorId,
}

/// One physical, loanable copy of a [`Book`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct BookItem {
    pub id: BookItemId,
    pub book_id: BookId,
    pub acquisition_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Loan {
    pub id: LoanId,
    pub book_item_id: BookItemId,
    pub patron_id: PatronId,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    /// `None` while the copy is still checked out.
    #[serde(default)]
    pub return_date: Option<NaiveDate>,
}

impl Loan {
    pub fn is_active(&self) -> bool {
        self.return_date.is_none()
    }
}

/// A loan joined with whatever copy/book/author data could be found for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanRecord {
    pub loan: Loan,
    pub item: Option<BookItem>,
    pub book: Option<Book>,
    pub author: Option<Author>,
}

impl LoanRecord {
    /// Returns the loan with its copy and book, or `None` if either link is missing.
    pub fn resolve(self) -> Option<ResolvedLoan> {
        let LoanRecord { loan, item, book, author } = self;
        match (item, book) {
            (Some(item), Some(book)) => Some(ResolvedLoan { loan, item, book, author }),
            _ => None,
        }
    }
}

/// A loan whose copy and book are known. Only these are selectable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLoan {
    pub loan: Loan,
    pub item: BookItem,
    pub book: Book,
    pub author: Option<Author>,
}

impl ResolvedLoan {
    pub fn author_name(&self) -> &str {
        self.author.as_ref().map_or("Unknown", |a| a.name.as_str())
    }

    pub fn is_returned(&self) -> bool {
        self.loan.return_date.is_some()
    }
}

// ============================================================================
// Service statuses
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnStatus {
    Success,
    LoanNotFound,
    AlreadyReturned,
    Error,
}

impl fmt::Display for ReturnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnStatus::Success => write!(f, "Book was successfully returned."),
            ReturnStatus::LoanNotFound => write!(f, "Loan not found."),
            ReturnStatus::AlreadyReturned => write!(f, "Book was already returned."),
            ReturnStatus::Error => write!(f, "Cannot return book due to an error."),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionStatus {
    Success,
    LoanNotFound,
    LoanExpired,
    MembershipExpired,
    LoanReturned,
    Error,
}

impl fmt::Display for ExtensionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtensionStatus::Success => write!(f, "Book loan extension was successful."),
            ExtensionStatus::LoanNotFound => write!(f, "Loan not found."),
            ExtensionStatus::LoanExpired => {
                write!(f, "Cannot extend book loan as it already has expired. Return the book instead.")
            }
            ExtensionStatus::MembershipExpired => {
                write!(f, "Cannot extend book loan due to expired patron's membership.")
            }
            ExtensionStatus::LoanReturned => {
                write!(f, "Cannot extend book loan as the book is already returned.")
            }
            ExtensionStatus::Error => write!(f, "Cannot extend book loan due to an error."),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenewalStatus {
    Success,
    PatronNotFound,
    TooEarlyToRenew,
    LoanNotReturned,
    Error,
}

impl fmt::Display for RenewalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenewalStatus::Success => write!(f, "Membership renewal was successful."),
            RenewalStatus::PatronNotFound => write!(f, "Patron not found."),
            RenewalStatus::TooEarlyToRenew => {
                write!(f, "It is too early to renew the membership.")
            }
            RenewalStatus::LoanNotReturned => {
                write!(f, "Cannot renew membership due to an outstanding loan.")
            }
            RenewalStatus::Error => write!(f, "Cannot renew membership due to an error."),
        }
    }
}
