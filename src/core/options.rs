//! # Input Options
//!
//! The commands a screen offers, as a set of named capabilities. The same
//! set drives both the printed prompt and the commands `update()` accepts,
//! so a command is never accepted on a screen that did not offer it.

use std::collections::BTreeSet;

/// One operator command. Declaration order is the order prompts are printed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InputAction {
    ReturnLoan,
    ExtendLoan,
    RenewMembership,
    SearchPatrons,
    SearchBooks,
    Quit,
    Select,
}

impl InputAction {
    /// The prompt line for this command.
    pub fn prompt(self) -> &'static str {
        match self {
            InputAction::ReturnLoan => r#" - "r" to mark as returned"#,
            InputAction::ExtendLoan => r#" - "e" to extend the book loan"#,
            InputAction::RenewMembership => r#" - "m" to extend patron's membership"#,
            InputAction::SearchPatrons => r#" - "s" for new search"#,
            InputAction::SearchBooks => r#" - "b" to check for book availability"#,
            InputAction::Quit => r#" - "q" to quit"#,
            InputAction::Select => " - type a number to select a list item.",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputOptions(BTreeSet<InputAction>);

impl InputOptions {
    pub fn new(actions: &[InputAction]) -> Self {
        Self(actions.iter().copied().collect())
    }

    pub fn with(mut self, action: InputAction) -> Self {
        self.0.insert(action);
        self
    }

    pub fn contains(&self, action: InputAction) -> bool {
        self.0.contains(&action)
    }

    /// Offered commands in prompt order.
    pub fn iter(&self) -> impl Iterator<Item = InputAction> + '_ {
        self.0.iter().copied()
    }
}

/// Looks up a 1-based selection. `0` and anything past the end are `None`.
pub fn pick<T>(items: &[T], selection: usize) -> Option<&T> {
    selection.checked_sub(1).and_then(|index| items.get(index))
}
