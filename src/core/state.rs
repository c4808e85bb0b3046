//! # Application State
//!
//! Selection state for one console session. Presentation lives in the
//! `console` module; collaborators live in `library`.
//!
//! ```text
//! App
//! ├── screen: Screen                     // current state tag
//! ├── matching_patrons: Vec<Patron>      // last patron search, in result order
//! ├── selected_patron: Option<Patron>
//! ├── loan_history: Vec<LoanEntry>       // selected patron's loans, as last loaded
//! ├── selected_loan: Option<ResolvedLoan>
//! └── notices: Vec<String>               // operator messages not yet printed
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use crate::core::options::{InputAction, InputOptions};
use crate::library::{LoanRecord, Patron, ResolvedLoan};
use crate::library::types::LoanId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    PatronSearch,
    PatronSearchResults,
    PatronDetails,
    LoanDetails,
    /// Terminal. The session loop stops here.
    Quit,
}

/// One line of a patron's loan history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoanEntry {
    Resolved(ResolvedLoan),
    /// The loan's copy or book could not be found.
    Unresolved(LoanId),
}

impl From<LoanRecord> for LoanEntry {
    fn from(record: LoanRecord) -> Self {
        let id = record.loan.id;
        match record.resolve() {
            Some(loan) => LoanEntry::Resolved(loan),
            None => LoanEntry::Unresolved(id),
        }
    }
}

#[derive(Debug, Default)]
pub struct App {
    pub screen: Screen,
    pub matching_patrons: Vec<Patron>,
    pub selected_patron: Option<Patron>,
    pub loan_history: Vec<LoanEntry>,
    pub selected_loan: Option<ResolvedLoan>,
    pub notices: Vec<String>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// The selectable loans, numbered densely 1..K in history order.
    pub fn selectable_loans(&self) -> Vec<&ResolvedLoan> {
        self.loan_history
            .iter()
            .filter_map(|entry| match entry {
                LoanEntry::Resolved(loan) => Some(loan),
                LoanEntry::Unresolved(_) => None,
            })
            .collect()
    }

    /// Commands offered on the current screen.
    pub fn input_options(&self) -> InputOptions {
        use InputAction::*;

        match self.screen {
            Screen::PatronSearch | Screen::Quit => InputOptions::default(),
            Screen::PatronSearchResults if self.matching_patrons.is_empty() => {
                InputOptions::new(&[SearchPatrons, Quit])
            }
            Screen::PatronSearchResults => InputOptions::new(&[Select, SearchPatrons, Quit]),
            Screen::PatronDetails if self.selectable_loans().is_empty() => {
                InputOptions::new(&[SearchPatrons, Quit])
            }
            Screen::PatronDetails => InputOptions::new(&[
                RenewMembership,
                SearchPatrons,
                Quit,
                Select,
                SearchBooks,
            ]),
            Screen::LoanDetails => {
                let options = InputOptions::new(&[SearchPatrons, Quit]);
                match &self.selected_loan {
                    Some(loan) if !loan.is_returned() => {
                        options.with(ReturnLoan).with(ExtendLoan)
                    }
                    _ => options,
                }
            }
        }
    }
}
