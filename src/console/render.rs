//! Screen output: input options, listings and detail views.

use std::io::{self, Write};

use crate::core::options::InputOptions;
use crate::core::state::LoanEntry;
use crate::library::{Patron, ResolvedLoan};

/// Prints one prompt line per offered command.
pub fn input_options(out: &mut impl Write, options: &InputOptions) -> io::Result<()> {
    writeln!(out, "Input Options:")?;
    for action in options.iter() {
        writeln!(out, "{}", action.prompt())?;
    }
    Ok(())
}

pub fn patron_list(out: &mut impl Write, patrons: &[Patron]) -> io::Result<()> {
    writeln!(out, "\nMatching Patrons:")?;
    for (rank, patron) in patrons.iter().enumerate() {
        writeln!(out, "{}) {}", rank + 1, patron.name)?;
    }
    Ok(())
}

/// Patron header and loan history. Only resolvable loans are numbered.
pub fn patron_details(out: &mut impl Write, patron: &Patron, history: &[LoanEntry]) -> io::Result<()> {
    writeln!(out, "\nName: {}", patron.name)?;
    writeln!(out, "Membership Expiration: {}", patron.membership_end)?;
    writeln!(out, "\nBook Loans History:")?;

    let mut number = 0;
    for entry in history {
        match entry {
            LoanEntry::Resolved(loan) => {
                number += 1;
                writeln!(
                    out,
                    "{}) {} - Due: {} - Returned: {}",
                    number,
                    loan.book.title,
                    loan.loan.due_date,
                    yes_no(loan.is_returned())
                )?;
            }
            LoanEntry::Unresolved(_) => {
                writeln!(out, "- [Invalid loan data: missing book information]")?;
            }
        }
    }
    if number == 0 {
        writeln!(out, "No valid loans for this patron.")?;
    }
    Ok(())
}

pub fn loan_details(out: &mut impl Write, loan: &ResolvedLoan) -> io::Result<()> {
    writeln!(out, "\nBook title: {}", loan.book.title)?;
    writeln!(out, "Book Author: {}", loan.author_name())?;
    writeln!(out, "Due date: {}", loan.loan.due_date)?;
    writeln!(out, "Returned: {}\n", yes_no(loan.is_returned()))
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "True" } else { "False" }
}
