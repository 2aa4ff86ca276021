//! Minimal page model: forms, text inputs and submit events.
//!
//! This is the surface the key deriver is attached to. A page holds forms and
//! input fields by element id; submitting a form produces a [`SubmitEvent`]
//! whose default action (navigation) runs unless a handler suppresses it.

pub mod event;

pub use event::{SubmitEvent, SubmitOutcome};

use std::collections::HashMap;

use thiserror::Error;
use zeroize::Zeroizing;

/// Errors produced by the page model.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    /// No element with the given id exists on the page.
    #[error("element not found: #{0}")]
    ElementNotFound(String),
}

/// A form element. Only its id matters to the deriver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub id: String,
}

/// A text input element. The value is wiped when replaced or dropped.
#[derive(Clone, Default)]
pub struct InputField {
    value: Zeroizing<String>,
}

impl InputField {
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Debug for InputField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Inputs may hold passwords.
        f.debug_struct("InputField")
            .field("value_len", &self.value.len())
            .finish()
    }
}

/// A page of forms and inputs addressed by element id.
#[derive(Debug, Clone, Default)]
pub struct Page {
    forms: HashMap<String, Form>,
    inputs: HashMap<String, InputField>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a form element.
    pub fn with_form(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        self.forms.insert(id.clone(), Form { id });
        self
    }

    /// Add a text input with an initial value.
    pub fn with_input(mut self, id: impl Into<String>, value: impl Into<String>) -> Self {
        self.inputs.insert(
            id.into(),
            InputField {
                value: Zeroizing::new(value.into()),
            },
        );
        self
    }

    pub fn form(&self, id: &str) -> Option<&Form> {
        self.forms.get(id)
    }

    pub fn input(&self, id: &str) -> Option<&InputField> {
        self.inputs.get(id)
    }

    /// Replace the value of an existing input, as typing into it would.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::ElementNotFound`] if no input has that id.
    pub fn set_input_value(
        &mut self,
        id: &str,
        value: impl Into<String>,
    ) -> Result<(), PageError> {
        let field = self
            .inputs
            .get_mut(id)
            .ok_or_else(|| PageError::ElementNotFound(id.to_owned()))?;
        field.value = Zeroizing::new(value.into());
        Ok(())
    }

    /// Create the submit event for a form.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::ElementNotFound`] if no form has that id.
    pub fn submit_event(&self, form_id: &str) -> Result<SubmitEvent, PageError> {
        let form = self
            .form(form_id)
            .ok_or_else(|| PageError::ElementNotFound(form_id.to_owned()))?;
        Ok(SubmitEvent::new(form.id.clone()))
    }
}
