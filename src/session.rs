//! Per-field autocomplete state machine.
//!
//! ```text
//!        input (>= 3 chars)          results           select
//! Idle ───────────────────▶ Searching ─────▶ ShowingSuggestions ─────▶ Resolving ──▶ Idle
//!  ▲                           │  ▲                │
//!  │ input (< 3 chars)         │  └── input ───────┤
//!  └───────────────────────────┴── no results ─────┴── escape / outside activation
//! ```
//!
//! A remote failure passes through a transient `Error` state on the way to
//! `ShowingSuggestions` (fallback results) or `Idle`.
//!
//! Searches are not cancelled. Each [`PendingSearch`] carries the text it
//! was issued for, and [`AutocompleteSession::apply`] drops any outcome
//! whose query no longer equals the field's current value, so the last
//! input wins regardless of the order responses arrive in.

use tracing::debug;

use crate::models::{CanonicalAddress, PlaceSuggestion};
use crate::source::{is_searchable, SearchOutcome, SourcePolicy};

/// The form field an autocomplete session is attached to
pub trait FormBinding {
    fn current_value(&self) -> &str;

    fn on_value_change(&mut self, text: &str);

    fn on_address_resolved(&mut self, address: CanonicalAddress);
}

/// Minimal in-memory field: the current text and the last resolved address
#[derive(Debug, Clone, Default)]
pub struct TextField {
    pub value: String,
    pub resolved: Option<CanonicalAddress>,
}

impl FormBinding for TextField {
    fn current_value(&self) -> &str {
        &self.value
    }

    fn on_value_change(&mut self, text: &str) {
        self.value = text.to_string();
    }

    fn on_address_resolved(&mut self, address: CanonicalAddress) {
        self.resolved = Some(address);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Searching,
    ShowingSuggestions,
    Resolving,
    Error,
}

/// Where a pointer or activation event landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationTarget {
    Input,
    SuggestionList,
    Outside,
}

/// A search issued for one input value
pub struct PendingSearch {
    query: String,
    policy: SourcePolicy,
}

impl PendingSearch {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub async fn run(self) -> SearchOutcome {
        self.policy.search(&self.query).await
    }
}

pub struct AutocompleteSession<F: FormBinding> {
    policy: SourcePolicy,
    field: F,
    state: SessionState,
    suggestions: Vec<PlaceSuggestion>,
    advisory: Option<String>,
}

impl<F: FormBinding> AutocompleteSession<F> {
    pub fn new(policy: SourcePolicy, field: F) -> Self {
        Self {
            policy,
            field,
            state: SessionState::Idle,
            suggestions: Vec::new(),
            advisory: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn suggestions(&self) -> &[PlaceSuggestion] {
        &self.suggestions
    }

    /// Non-fatal notice for the user, set when fallback results are shown
    pub fn advisory(&self) -> Option<&str> {
        self.advisory.as_deref()
    }

    pub fn is_open(&self) -> bool {
        !self.suggestions.is_empty()
    }

    pub fn field(&self) -> &F {
        &self.field
    }

    pub fn into_field(self) -> F {
        self.field
    }

    /// The field's text changed.
    ///
    /// Returns the search to run, or `None` when the text is too short, in
    /// which case the list is cleared and no source is consulted.
    pub fn input(&mut self, text: &str) -> Option<PendingSearch> {
        self.field.on_value_change(text);

        if !is_searchable(text) {
            self.close();
            return None;
        }

        self.transition(SessionState::Searching);
        Some(PendingSearch {
            query: text.to_string(),
            policy: self.policy.clone(),
        })
    }

    /// Apply a finished search. Returns `false` if the outcome was stale
    /// and ignored.
    pub fn apply(&mut self, outcome: SearchOutcome) -> bool {
        if outcome.query != self.field.current_value() {
            debug!(
                "Dropping stale results for {:?} (current value {:?})",
                outcome.query,
                self.field.current_value()
            );
            return false;
        }

        if self.state != SessionState::Searching {
            debug!("Dropping results for {:?} in state {:?}", outcome.query, self.state);
            return false;
        }

        if outcome.advisory.is_some() {
            self.transition(SessionState::Error);
        }

        self.suggestions = outcome.suggestions;
        self.advisory = outcome.advisory;

        if self.suggestions.is_empty() {
            self.transition(SessionState::Idle);
        } else {
            self.transition(SessionState::ShowingSuggestions);
        }
        true
    }

    /// Input followed by its search, for callers that don't interleave
    pub async fn type_text(&mut self, text: &str) -> bool {
        match self.input(text) {
            Some(search) => {
                let outcome = search.run().await;
                self.apply(outcome)
            }
            None => false,
        }
    }

    /// Choose the suggestion at `index`.
    ///
    /// Always produces an address when the index is valid: a failed detail
    /// fetch degrades to the suggestion label.
    pub async fn select(&mut self, index: usize) -> Option<CanonicalAddress> {
        let suggestion = self.suggestions.get(index)?.clone();

        if !suggestion.has_detail {
            self.transition(SessionState::Resolving);
        }

        let address = self.policy.lookup_address(&suggestion).await;

        let display = if address.street.is_empty() {
            suggestion.label.as_str()
        } else {
            address.street.as_str()
        };
        self.field.on_value_change(display);
        self.field.on_address_resolved(address.clone());

        self.close();
        Some(address)
    }

    /// Escape key
    pub fn escape(&mut self) {
        self.close();
    }

    pub fn activate(&mut self, target: ActivationTarget) {
        if target == ActivationTarget::Outside {
            self.close();
        }
    }

    fn close(&mut self) {
        self.suggestions.clear();
        self.advisory = None;
        self.transition(SessionState::Idle);
    }

    fn transition(&mut self, next: SessionState) {
        if self.state != next {
            debug!("Autocomplete {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }
}
