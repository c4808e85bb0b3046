//! # Book Search
//!
//! The interactive sub-flow behind `b` on the patron details screen:
//! title prompt, disambiguation, availability report, optional checkout,
//! then "search again" or back to the patron.
//!
//! ```text
//! title ─▶ matches ─┬─ none ──────────────┐
//!                   ├─ one ───▶ report ───┤
//!                   └─ many ─▶ pick ──▶ report
//!                                         ▼
//!                          's' → new title │ else → patron details
//! ```

use std::io::{self, BufRead, Write};

use log::debug;

use super::Collaborators;
use super::checkout;
use super::terminal::Console;
use crate::core::action::{Action, INVALID_INPUT, INVALID_SELECTION, is_number};
use crate::core::availability::{Availability, match_titles};
use crate::core::options::pick;
use crate::library::{Book, Patron};

pub const TITLE_PROMPT: &str = "Enter a book title to search for: ";
const REFINE_PROMPT: &str = "Enter a book title to search for (partial or full): ";
const PICK_PROMPT: &str = "Enter number to select a book, 'r' to refine search, or 'b' to go back: ";
const AGAIN_PROMPT: &str = "Press 's' to search again or 'b' to go back: ";
const NO_TITLE: &str = "No input provided. Returning to patron details.";

enum Pick {
    Book(Book),
    Refine,
    Back,
}

/// Runs the sub-flow for the patron currently selected (if any).
///
/// Returns `PatronRefreshed` when a checkout changed the patron, so the
/// details screen shows fresh data.
pub fn run<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    library: &Collaborators<'_>,
    patron: Option<&Patron>,
) -> io::Result<Option<Action>> {
    let mut patron = patron.cloned();
    let mut refreshed = None;
    let mut prompt = TITLE_PROMPT;

    loop {
        let Some(fragment) = ask_title(console, prompt)? else {
            break;
        };
        prompt = REFINE_PROMPT;
        debug!("Book search for {:?}", fragment);

        let books = library.inventory().books();
        let matches = match_titles(&books, &fragment);
        let chosen = match matches.as_slice() {
            [] => {
                console.say(format!("No book found with title matching: {fragment}"))?;
                None
            }
            [only] => Some((*only).clone()),
            many => match choose(console, many)? {
                Pick::Book(book) => Some(book),
                Pick::Refine => continue,
                Pick::Back => break,
            },
        };

        if let Some(book) = chosen
            && let Some(fresh) = report(console, library, &book, patron.as_ref())?
        {
            patron = Some(fresh.clone());
            refreshed = Some(Action::PatronRefreshed(fresh));
        }

        let again = console
            .prompt(AGAIN_PROMPT)?
            .is_some_and(|choice| choice.eq_ignore_ascii_case("s"));
        if !again {
            break;
        }
    }
    Ok(refreshed)
}

/// `None` when the operator gave nothing (or input ended).
fn ask_title<R: BufRead, W: Write>(console: &mut Console<R, W>, prompt: &str) -> io::Result<Option<String>> {
    match console.prompt(prompt)? {
        Some(title) if !title.is_empty() => Ok(Some(title)),
        Some(_) => {
            console.say(NO_TITLE)?;
            Ok(None)
        }
        None => Ok(None),
    }
}

fn choose<R: BufRead, W: Write>(console: &mut Console<R, W>, matches: &[&Book]) -> io::Result<Pick> {
    console.say("Multiple books match:")?;
    for (rank, book) in matches.iter().enumerate() {
        console.say(format!("{}) {}", rank + 1, book.title))?;
    }
    let Some(answer) = console.prompt(PICK_PROMPT)? else {
        return Ok(Pick::Back);
    };
    let answer = answer.to_lowercase();
    match answer.as_str() {
        "b" => Ok(Pick::Back),
        "r" => Ok(Pick::Refine),
        digits if is_number(digits) => {
            match pick(matches, digits.parse().unwrap_or(usize::MAX)) {
                Some(book) => Ok(Pick::Book((*book).clone())),
                None => {
                    console.say(INVALID_SELECTION)?;
                    Ok(Pick::Refine)
                }
            }
        }
        _ => {
            console.say(INVALID_INPUT)?;
            Ok(Pick::Refine)
        }
    }
}

/// Prints availability for `book` and offers checkout when a copy is free.
fn report<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    library: &Collaborators<'_>,
    book: &Book,
    patron: Option<&Patron>,
) -> io::Result<Option<Patron>> {
    let assessment = library.inventory().assess(book);
    debug!("Availability of book {}: {:?}", book.id, assessment.availability());
    match assessment.availability() {
        Availability::NoCopies => {
            console.say(format!("No physical copy found for '{}'.", book.title))?;
        }
        Availability::Available { .. } => {
            console.say(format!("'{}' is available for loan.", book.title))?;
            match patron {
                Some(patron) => return checkout::offer(console, library, book, patron),
                None => console.say("Select a patron first to perform checkout.")?,
            }
        }
        Availability::OnLoan { earliest_due: Some(due) } => {
            console.say(format!(
                "'{}' is on loan to another patron. The earliest return due date is {}.",
                book.title, due
            ))?;
        }
        Availability::OnLoan { earliest_due: None } => {
            console.say(format!("All copies of '{}' are currently on loan.", book.title))?;
        }
    }
    Ok(None)
}
