//! [`SubmitEvent`] and the default action it controls.

/// What happened to the page after a submit event was dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The default action ran: the page navigated away.
    Navigated,
    /// A handler suppressed the default action.
    Suppressed,
}

/// A form submission in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitEvent {
    form_id: String,
    default_prevented: bool,
}

impl SubmitEvent {
    pub(crate) fn new(form_id: String) -> Self {
        Self {
            form_id,
            default_prevented: false,
        }
    }

    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    /// Suppress navigation for this submission. Idempotent.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// The outcome once all handlers have run.
    pub fn outcome(&self) -> SubmitOutcome {
        if self.default_prevented() {
            SubmitOutcome::Suppressed
        } else {
            SubmitOutcome::Navigated
        }
    }
}
