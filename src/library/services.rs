//! # Business Services
//!
//! Return, extend, renew and checkout on top of [`JsonStore`]. Each call
//! computes the new collection, persists it, and only then commits it in
//! memory, so a failed write leaves the store unchanged.

use chrono::{Days, NaiveDate};
use log::{debug, info};

use super::json_store::JsonStore;
use super::repository::{LoanService, PatronService, StoreError};
use super::types::{
    BookItem, ExtensionStatus, Loan, LoanId, Patron, PatronId, RenewalStatus, ReturnStatus,
};

pub const DEFAULT_LOAN_PERIOD_DAYS: u32 = 14;
pub const DEFAULT_LOAN_EXTENSION_DAYS: u32 = 14;
pub const DEFAULT_MEMBERSHIP_TERM_DAYS: u32 = 365;
pub const DEFAULT_RENEWAL_WINDOW_DAYS: u32 = 30;

/// Day counts that drive the loan and membership rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanPolicy {
    pub loan_period_days: u32,
    pub loan_extension_days: u32,
    pub membership_term_days: u32,
    /// Renewal is refused while the membership ends further out than this.
    pub renewal_window_days: u32,
}

impl Default for LoanPolicy {
    fn default() -> Self {
        Self {
            loan_period_days: DEFAULT_LOAN_PERIOD_DAYS,
            loan_extension_days: DEFAULT_LOAN_EXTENSION_DAYS,
            membership_term_days: DEFAULT_MEMBERSHIP_TERM_DAYS,
            renewal_window_days: DEFAULT_RENEWAL_WINDOW_DAYS,
        }
    }
}

fn add_days(date: NaiveDate, days: u32) -> Result<NaiveDate, StoreError> {
    date.checked_add_days(Days::new(u64::from(days)))
        .ok_or_else(|| StoreError::Conflict(format!("date overflow adding {days} days to {date}")))
}

impl LoanService for JsonStore {
    fn return_loan(&self, id: LoanId) -> Result<ReturnStatus, StoreError> {
        let mut loans = self.data().loans.clone();
        let Some(loan) = loans.iter_mut().find(|l| l.id == id) else {
            return Ok(ReturnStatus::LoanNotFound);
        };
        if loan.return_date.is_some() {
            return Ok(ReturnStatus::AlreadyReturned);
        }
        loan.return_date = Some(self.today());
        self.commit_loans(loans)?;
        info!("Loan {} returned", id);
        Ok(ReturnStatus::Success)
    }

    fn extend_loan(&self, id: LoanId) -> Result<ExtensionStatus, StoreError> {
        let today = self.today();
        let mut loans = self.data().loans.clone();
        let Some(loan) = loans.iter_mut().find(|l| l.id == id) else {
            return Ok(ExtensionStatus::LoanNotFound);
        };
        if loan.return_date.is_some() {
            return Ok(ExtensionStatus::LoanReturned);
        }
        if loan.due_date < today {
            return Ok(ExtensionStatus::LoanExpired);
        }
        let membership_end = self
            .data()
            .patrons
            .iter()
            .find(|p| p.id == loan.patron_id)
            .map(|p| p.membership_end);
        match membership_end {
            Some(end) if end >= today => {}
            _ => return Ok(ExtensionStatus::MembershipExpired),
        }
        loan.due_date = add_days(loan.due_date, self.policy.loan_extension_days)?;
        debug!("Loan {} now due {}", id, loan.due_date);
        self.commit_loans(loans)?;
        Ok(ExtensionStatus::Success)
    }

    fn checkout_book(&self, patron: &Patron, item: &BookItem) -> Result<Loan, StoreError> {
        let today = self.today();
        let mut loans = self.data().loans.clone();
        if !self.data().patrons.iter().any(|p| p.id == patron.id) {
            return Err(StoreError::NotFound(format!("patron {}", patron.id)));
        }
        if !self.data().book_items.iter().any(|i| i.id == item.id) {
            return Err(StoreError::NotFound(format!("book item {}", item.id)));
        }
        if loans.iter().any(|l| l.book_item_id == item.id && l.is_active()) {
            return Err(StoreError::Conflict(format!(
                "book item {} is already on loan",
                item.id
            )));
        }
        let loan = Loan {
            id: loans.iter().map(|l| l.id).max().unwrap_or(0) + 1,
            book_item_id: item.id,
            patron_id: patron.id,
            loan_date: today,
            due_date: add_days(today, self.policy.loan_period_days)?,
            return_date: None,
        };
        loans.push(loan.clone());
        self.commit_loans(loans)?;
        info!("Loan {} created: item {} to patron {}", loan.id, item.id, patron.id);
        Ok(loan)
    }
}

impl PatronService for JsonStore {
    fn renew_membership(&self, id: PatronId) -> Result<RenewalStatus, StoreError> {
        let today = self.today();
        let mut patrons = self.data().patrons.clone();
        let Some(patron) = patrons.iter_mut().find(|p| p.id == id) else {
            return Ok(RenewalStatus::PatronNotFound);
        };
        let overdue = self
            .data()
            .loans
            .iter()
            .any(|l| l.patron_id == id && l.is_active() && l.due_date < today);
        if overdue {
            return Ok(RenewalStatus::LoanNotReturned);
        }
        if patron.membership_end > add_days(today, self.policy.renewal_window_days)? {
            return Ok(RenewalStatus::TooEarlyToRenew);
        }
        let base = patron.membership_end.max(today);
        patron.membership_end = add_days(base, self.policy.membership_term_days)?;
        info!("Membership of patron {} renewed until {}", id, patron.membership_end);
        self.commit_patrons(patrons)?;
        Ok(RenewalStatus::Success)
    }
}
