//! # Console Adapter
//!
//! The line-oriented layer. Prints screens, reads operator lines, turns
//! them into `core::Action` values, and performs the `Effect` each update
//! asks for by calling the library collaborators.
//!
//! This is the only module that touches the terminal. Collaborator
//! failures are caught here and reported as a line of text; the session
//! only ends when the state machine reaches `Quit`.

mod book_search;
mod checkout;
mod render;
mod terminal;

pub use terminal::{Console, Reply};

use std::io::{self, BufRead, Write};

use log::{debug, info, warn};

use crate::core::action::{Action, Effect, update};
use crate::core::inventory::Inventory;
use crate::core::state::{App, Screen};
use crate::library::types::{LoanId, PatronId};
use crate::library::{CatalogSource, LoanRepository, LoanService, PatronRepository, PatronService};

pub const SEARCH_PROMPT: &str = "Enter a string to search for patrons by name: ";
pub const CHOICE_PROMPT: &str = "Enter your choice: ";

/// The collaborators one session talks to. Every role may be served by a
/// different object; `catalog` is the optional direct data source that
/// bulk reads prefer over the repositories.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub patrons: &'a dyn PatronRepository,
    pub loans: &'a dyn LoanRepository,
    pub loan_service: &'a dyn LoanService,
    pub patron_service: &'a dyn PatronService,
    pub catalog: Option<&'a dyn CatalogSource>,
}

impl<'a> Collaborators<'a> {
    pub fn inventory(&self) -> Inventory<'a> {
        Inventory {
            catalog: self.catalog,
            patrons: self.patrons,
            loans: self.loans,
        }
    }
}

/// Drives the session until the state machine reaches `Quit`.
///
/// Only terminal I/O errors are returned.
pub fn run_session<R: BufRead, W: Write>(
    app: &mut App,
    library: &Collaborators<'_>,
    console: &mut Console<R, W>,
) -> io::Result<()> {
    info!("Session started");
    while app.screen != Screen::Quit {
        let action = show_screen(app, library, console)?;
        dispatch(app, action, library, console)?;
    }
    info!("Session ended");
    Ok(())
}

/// Renders the current screen and reads the operator's answer.
fn show_screen<R: BufRead, W: Write>(
    app: &mut App,
    library: &Collaborators<'_>,
    console: &mut Console<R, W>,
) -> io::Result<Action> {
    let screen = app.screen;
    match screen {
        Screen::PatronSearch => return read_action(console, screen, SEARCH_PROMPT),
        Screen::PatronSearchResults => {
            render::patron_list(console.out(), &app.matching_patrons)?;
        }
        Screen::PatronDetails => {
            let Some(patron_id) = app.selected_patron.as_ref().map(|p| p.id) else {
                return Ok(Action::NewSearch);
            };
            // Reloaded on every visit so returns and checkouts show up
            let history = load_history(library, patron_id, console)?;
            dispatch(app, history, library, console)?;
            if let Some(patron) = &app.selected_patron {
                render::patron_details(console.out(), patron, &app.loan_history)?;
            }
        }
        Screen::LoanDetails => match &app.selected_loan {
            Some(loan) => render::loan_details(console.out(), loan)?,
            None => return Ok(Action::NewSearch),
        },
        Screen::Quit => return Ok(Action::Quit),
    }
    render::input_options(console.out(), &app.input_options())?;
    read_action(console, screen, CHOICE_PROMPT)
}

fn read_action<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    screen: Screen,
    prompt: &str,
) -> io::Result<Action> {
    Ok(match console.ask(prompt)? {
        Reply::Line(line) => Action::parse(screen, &line),
        // Never a search term or a command, on any screen
        Reply::Undecodable(text) => Action::Unrecognized(text),
        Reply::Closed => {
            debug!("Input closed on {:?}", screen);
            Action::EndOfInput
        }
    })
}

/// Runs `action` through `update`, printing notices and performing effects
/// until no follow-up action remains.
fn dispatch<R: BufRead, W: Write>(
    app: &mut App,
    action: Action,
    library: &Collaborators<'_>,
    console: &mut Console<R, W>,
) -> io::Result<()> {
    let mut next = Some(action);
    while let Some(action) = next.take() {
        let effect = update(app, action);
        for notice in app.notices.drain(..) {
            console.say(notice)?;
        }
        next = perform(effect, app, library, console)?;
    }
    Ok(())
}

fn perform<R: BufRead, W: Write>(
    effect: Effect,
    app: &App,
    library: &Collaborators<'_>,
    console: &mut Console<R, W>,
) -> io::Result<Option<Action>> {
    match effect {
        Effect::None | Effect::Quit => Ok(None),
        Effect::SearchPatrons(query) => {
            debug!("Searching patrons for {:?}", query);
            let patrons = match library.patrons.search_patrons(&query) {
                Ok(patrons) => patrons,
                Err(e) => {
                    warn!("Patron search for {:?} failed: {}", query, e);
                    console.say(format!("Patron search failed: {e}"))?;
                    Vec::new()
                }
            };
            Ok(Some(Action::PatronsFound(patrons)))
        }
        Effect::RenewMembership(id) => {
            match library.patron_service.renew_membership(id) {
                Ok(status) => console.say(status)?,
                Err(e) => {
                    warn!("Renewing membership of patron {} failed: {}", id, e);
                    console.say(format!("Membership renewal failed: {e}"))?;
                }
            }
            Ok(refresh_patron(library, id))
        }
        Effect::ReturnLoan(id) => {
            match library.loan_service.return_loan(id) {
                Ok(status) => console.say(status)?,
                Err(e) => {
                    warn!("Returning loan {} failed: {}", id, e);
                    console.say(format!("Returning the book failed: {e}"))?;
                }
            }
            refresh_loan(library, id, console)
        }
        Effect::ExtendLoan(id) => {
            match library.loan_service.extend_loan(id) {
                Ok(status) => console.say(status)?,
                Err(e) => {
                    warn!("Extending loan {} failed: {}", id, e);
                    console.say(format!("Extending the loan failed: {e}"))?;
                }
            }
            refresh_loan(library, id, console)
        }
        Effect::SearchBooks => book_search::run(console, library, app.selected_patron.as_ref()),
    }
}

fn load_history<R: BufRead, W: Write>(
    library: &Collaborators<'_>,
    patron_id: PatronId,
    console: &mut Console<R, W>,
) -> io::Result<Action> {
    let records = match library.loans.loans_by_patron(patron_id) {
        Ok(records) => records,
        Err(e) => {
            warn!("Loading loans of patron {} failed: {}", patron_id, e);
            console.say(format!("Could not load loans: {e}"))?;
            Vec::new()
        }
    };
    Ok(Action::LoansLoaded(records))
}

/// Best effort: on failure the screen keeps showing the previous patron.
fn refresh_patron(library: &Collaborators<'_>, id: PatronId) -> Option<Action> {
    match library.patrons.get_patron(id) {
        Ok(Some(patron)) => Some(Action::PatronRefreshed(patron)),
        Ok(None) => {
            warn!("Patron {} not found on refresh", id);
            None
        }
        Err(e) => {
            warn!("Refreshing patron {} failed: {}", id, e);
            None
        }
    }
}

fn refresh_loan<R: BufRead, W: Write>(
    library: &Collaborators<'_>,
    id: LoanId,
    console: &mut Console<R, W>,
) -> io::Result<Option<Action>> {
    match library.loans.get_loan(id) {
        Ok(Some(record)) => {
            if let Some(loan) = record.resolve() {
                return Ok(Some(Action::LoanRefreshed(loan)));
            }
            warn!("Loan {} no longer resolves to a book", id);
        }
        Ok(None) => warn!("Loan {} not found on refresh", id),
        Err(e) => warn!("Refreshing loan {} failed: {}", id, e),
    }
    console.say("Could not refresh loan details.")?;
    Ok(None)
}
