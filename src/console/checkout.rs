//! # Checkout Coordinator
//!
//! Confirms a checkout with the operator, then lends the first copy of the
//! book that no active loan holds. Availability is re-read after the
//! confirmation because another desk may have lent the last copy while the
//! operator was deciding; in that case nothing is written.

use std::io::{self, BufRead, Write};

use log::{debug, info, warn};

use super::Collaborators;
use super::terminal::Console;
use crate::library::{Book, Patron};

/// Offers `book` to `patron`. Returns the re-fetched patron after a
/// successful checkout, or `None` if nothing changed or the refresh failed.
pub fn offer<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    library: &Collaborators<'_>,
    book: &Book,
    patron: &Patron,
) -> io::Result<Option<Patron>> {
    let question = format!(
        "Would you like to check out '{}' for {}? (y/n): ",
        book.title, patron.name
    );
    let confirmed = console
        .prompt(&question)?
        .is_some_and(|answer| answer.eq_ignore_ascii_case("y"));
    if !confirmed {
        debug!("Checkout of book {} declined", book.id);
        return Ok(None);
    }

    let report = library.inventory().assess(book);
    let Some(copy) = report.first_available_copy() else {
        info!("Book {} has no free copy left at checkout time", book.id);
        console.say("No available copy found at checkout time.")?;
        return Ok(None);
    };

    match library.loan_service.checkout_book(patron, copy) {
        Ok(loan) => {
            console.say(format!(
                "Checked out '{}' to {}. Due date: {}",
                book.title, patron.name, loan.due_date
            ))?;
            Ok(refetch(library, patron))
        }
        Err(e) => {
            warn!("Checkout of item {} for patron {} failed: {}", copy.id, patron.id, e);
            console.say(format!("Error during checkout: {e}"))?;
            Ok(None)
        }
    }
}

/// Best effort: the checkout already happened, so a failed refresh is only logged.
fn refetch(library: &Collaborators<'_>, patron: &Patron) -> Option<Patron> {
    match library.patrons.get_patron(patron.id) {
        Ok(Some(fresh)) => Some(fresh),
        Ok(None) => {
            warn!("Patron {} vanished after checkout", patron.id);
            None
        }
        Err(e) => {
            warn!("Refreshing patron {} after checkout failed: {}", patron.id, e);
            None
        }
    }
}
