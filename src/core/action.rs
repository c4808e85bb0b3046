//! # Actions
//!
//! Everything that can happen in a session becomes an `Action`.
//! Operator typed "2" on the results screen? That's `Action::Select(2)`.
//! Patron search came back? That's `Action::PatronsFound(patrons)`.
//!
//! `update()` takes the current state and an action, moves the state
//! machine, and returns an `Effect` naming the collaborator call the
//! console must perform next. The console feeds the call's result back in
//! as another action.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::debug;

use crate::core::options::{InputAction, pick};
use crate::core::state::{App, LoanEntry, Screen};
use crate::library::types::{LoanId, PatronId};
use crate::library::{LoanRecord, Patron, ResolvedLoan};

pub const NO_INPUT: &str = "No input provided. Please try again.";
pub const NO_PATRONS: &str = "No matching patrons found.";
pub const INVALID_SELECTION: &str = "Invalid selection. Please enter a number shown in the list above.";
pub const INVALID_INPUT: &str = "Invalid input.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Operator input
    /// Free text typed at the patron search prompt (already trimmed).
    SearchText(String),
    Quit,
    NewSearch,
    RenewMembership,
    SearchBooks,
    ReturnLoan,
    ExtendLoan,
    /// A 1-based list selection.
    Select(usize),
    Unrecognized(String),
    /// Input stream closed.
    EndOfInput,

    // Collaborator results
    PatronsFound(Vec<Patron>),
    LoansLoaded(Vec<LoanRecord>),
    PatronRefreshed(Patron),
    LoanRefreshed(ResolvedLoan),
}

impl Action {
    /// Interprets one line typed while `screen` is showing.
    pub fn parse(screen: Screen, line: &str) -> Self {
        let text = line.trim();
        if screen == Screen::PatronSearch {
            return Action::SearchText(text.to_string());
        }
        match text.to_lowercase().as_str() {
            "q" => Action::Quit,
            "s" => Action::NewSearch,
            "m" => Action::RenewMembership,
            "b" => Action::SearchBooks,
            "r" => Action::ReturnLoan,
            "e" => Action::ExtendLoan,
            digits if is_number(digits) => Action::Select(digits.parse().unwrap_or(usize::MAX)),
            _ => Action::Unrecognized(text.to_string()),
        }
    }
}

/// True for a non-empty run of ASCII digits.
pub fn is_number(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// Side effects that `update` asks the console to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
    SearchPatrons(String),
    RenewMembership(PatronId),
    /// Run the interactive book search sub-flow.
    SearchBooks,
    ReturnLoan(LoanId),
    ExtendLoan(LoanId),
}

/// Applies an action to the state and returns the follow-up effect.
pub fn update(app: &mut App, action: Action) -> Effect {
    debug!("update: {:?} on {:?}", action, app.screen);
    match action {
        Action::EndOfInput => {
            app.screen = Screen::Quit;
            Effect::Quit
        }
        Action::SearchText(text) if app.screen == Screen::PatronSearch => {
            if text.is_empty() {
                app.notices.push(NO_INPUT.to_string());
                Effect::None
            } else {
                Effect::SearchPatrons(text)
            }
        }
        Action::PatronsFound(patrons) => {
            if patrons.is_empty() {
                app.notices.push(NO_PATRONS.to_string());
                app.screen = Screen::PatronSearch;
            } else {
                app.matching_patrons = patrons;
                app.screen = Screen::PatronSearchResults;
            }
            Effect::None
        }
        Action::LoansLoaded(records) => {
            app.loan_history = records.into_iter().map(LoanEntry::from).collect();
            Effect::None
        }
        Action::PatronRefreshed(patron) => {
            app.selected_patron = Some(patron);
            Effect::None
        }
        Action::LoanRefreshed(loan) => {
            app.selected_loan = Some(loan);
            Effect::None
        }
        command => apply_command(app, command),
    }
}

/// Handles operator commands, accepting only those the screen offers.
fn apply_command(app: &mut App, command: Action) -> Effect {
    let options = app.input_options();
    let offered = |action: InputAction| options.contains(action);

    match (app.screen, command) {
        (Screen::Quit, _) => Effect::Quit,
        (_, Action::Quit) if offered(InputAction::Quit) => {
            app.screen = Screen::Quit;
            Effect::Quit
        }
        (_, Action::NewSearch) if offered(InputAction::SearchPatrons) => {
            app.screen = Screen::PatronSearch;
            Effect::None
        }
        (Screen::PatronSearchResults, Action::Select(n)) if offered(InputAction::Select) => {
            let chosen = pick(&app.matching_patrons, n).cloned();
            match chosen {
                Some(patron) => {
                    debug!("Selected patron {} ({})", patron.id, patron.name);
                    app.selected_patron = Some(patron);
                    app.selected_loan = None;
                    app.loan_history.clear();
                    app.screen = Screen::PatronDetails;
                }
                None => app.notices.push(INVALID_SELECTION.to_string()),
            }
            Effect::None
        }
        (Screen::PatronDetails, Action::Select(n)) if offered(InputAction::Select) => {
            let chosen = pick(&app.selectable_loans(), n).map(|loan| (*loan).clone());
            match chosen {
                Some(loan) => {
                    debug!("Selected loan {}", loan.loan.id);
                    app.selected_loan = Some(loan);
                    app.screen = Screen::LoanDetails;
                }
                None => app.notices.push(INVALID_SELECTION.to_string()),
            }
            Effect::None
        }
        (Screen::PatronDetails, Action::RenewMembership) if offered(InputAction::RenewMembership) => {
            match app.selected_patron.as_ref().map(|p| p.id) {
                Some(id) => Effect::RenewMembership(id),
                None => nothing_selected(app),
            }
        }
        (Screen::PatronDetails, Action::SearchBooks) if offered(InputAction::SearchBooks) => {
            Effect::SearchBooks
        }
        (Screen::LoanDetails, Action::ReturnLoan) if offered(InputAction::ReturnLoan) => {
            match app.selected_loan.as_ref().map(|l| l.loan.id) {
                Some(id) => Effect::ReturnLoan(id),
                None => nothing_selected(app),
            }
        }
        (Screen::LoanDetails, Action::ExtendLoan) if offered(InputAction::ExtendLoan) => {
            match app.selected_loan.as_ref().map(|l| l.loan.id) {
                Some(id) => Effect::ExtendLoan(id),
                None => nothing_selected(app),
            }
        }
        (screen, _) => {
            app.notices.push(invalid_input_message(app, screen));
            Effect::None
        }
    }
}

fn nothing_selected(app: &mut App) -> Effect {
    app.notices.push("Nothing is selected. Please search again.".to_string());
    app.screen = Screen::PatronSearch;
    Effect::None
}

fn invalid_input_message(app: &App, screen: Screen) -> String {
    match screen {
        Screen::PatronSearchResults if !app.matching_patrons.is_empty() => {
            "Invalid input. Please enter a number, 's', or 'q'.".to_string()
        }
        Screen::PatronDetails if !app.selectable_loans().is_empty() => {
            "Invalid input. Please enter a number, 'm', 'b', 's', or 'q'.".to_string()
        }
        _ => INVALID_INPUT.to_string(),
    }
}
