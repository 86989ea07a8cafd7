//! # Field Rules & Prompt Sequences
//!
//! A [`PromptSequence`] is an ordered list of [`FieldRule`]s. Running it presents the
//! whole form, waits for a submit, validates every field in declared order against a
//! fresh view of the store, and re-presents the form (values kept, failing field
//! flagged) until every rule accepts. There is no retry limit; only a cancel ends the
//! loop early.
//!
//! ## Dependent rules
//! A rule sees the raw, in-progress values of the fields *before* it through
//! [`RuleContext::earlier`]. Later fields are never exposed. The quantity rule of a
//! sale, for instance, reads whatever is currently typed in the item id field, whether
//! or not that id is valid yet.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::framework::error::PromptError;
use crate::framework::input::{FieldPrompt, InputClient};

type Predicate<V> = Arc<dyn Fn(&str, &RuleContext<'_, V>) -> bool + Send + Sync>;

/// Supplies the read-only view that rules validate against.
///
/// Fetched once per submit so rules never see a stale snapshot.
#[async_trait]
pub trait ViewSource<V>: Send + Sync {
    type Error: Send;

    async fn current_view(&self) -> Result<V, Self::Error>;
}

/// What a rule may look at besides its own value.
pub struct RuleContext<'a, V> {
    earlier: &'a [String],
    view: &'a V,
}

impl<'a, V> RuleContext<'a, V> {
    pub fn new(earlier: &'a [String], view: &'a V) -> Self {
        Self { earlier, view }
    }

    /// Raw value of an earlier field, or `None` if `index` is not before this rule.
    pub fn earlier(&self, index: usize) -> Option<&'a str> {
        self.earlier.get(index).map(String::as_str)
    }

    pub fn view(&self) -> &'a V {
        self.view
    }
}

/// Label, error message and acceptance predicate for one field.
pub struct FieldRule<V> {
    label: &'static str,
    message: String,
    predicate: Predicate<V>,
}

impl<V> Clone for FieldRule<V> {
    fn clone(&self) -> Self {
        Self {
            label: self.label,
            message: self.message.clone(),
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<V> fmt::Debug for FieldRule<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRule")
            .field("label", &self.label)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

impl<V> FieldRule<V> {
    pub fn new<F>(label: &'static str, message: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&str, &RuleContext<'_, V>) -> bool + Send + Sync + 'static,
    {
        Self {
            label,
            message: message.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// A rule that ignores context.
    pub fn simple<F>(label: &'static str, message: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self::new(label, message, move |value, _| predicate(value))
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn accepts(&self, value: &str, context: &RuleContext<'_, V>) -> bool {
        (self.predicate)(value, context)
    }
}

/// The first rule that rejected its field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleFailure {
    pub index: usize,
    pub label: &'static str,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct PromptSequence<V> {
    title: String,
    rules: Vec<FieldRule<V>>,
}

impl<V: Send + Sync> PromptSequence<V> {
    pub fn new(title: impl Into<String>, rules: Vec<FieldRule<V>>) -> Self {
        Self {
            title: title.into(),
            rules,
        }
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.rules.iter().map(FieldRule::label).collect()
    }

    /// Checks every field in declared order and stops at the first rejection.
    ///
    /// Missing trailing values are treated as blank.
    pub fn validate(&self, values: &[String], view: &V) -> Result<(), RuleFailure> {
        let blank = String::new();
        for (index, rule) in self.rules.iter().enumerate() {
            let value = values.get(index).unwrap_or(&blank);
            let earlier = &values[..index.min(values.len())];
            if !rule.accepts(value, &RuleContext::new(earlier, view)) {
                return Err(RuleFailure {
                    index,
                    label: rule.label,
                    message: rule.message.clone(),
                });
            }
        }
        Ok(())
    }

    /// Runs the form until every rule accepts, returning the raw values in field order.
    ///
    /// With `seed`, visible fields start pre-filled from the given tuple (pre-seeded
    /// mode); otherwise they start blank.
    pub async fn run<S>(
        &self,
        input: &InputClient,
        source: &S,
        seed: Option<&[String]>,
    ) -> Result<Vec<String>, PromptError<S::Error>>
    where
        S: ViewSource<V> + ?Sized,
    {
        let mut values = self.starting_values(seed);
        let mut failure: Option<RuleFailure> = None;

        loop {
            let fields = self.present(&values, failure.as_ref());
            let mut submitted = input.form(&self.title, fields).await?;
            submitted.resize(self.rules.len(), String::new());
            values = submitted;

            let view = source.current_view().await.map_err(PromptError::Source)?;
            match self.validate(&values, &view) {
                Ok(()) => {
                    debug!(title = %self.title, "Form accepted");
                    return Ok(values);
                }
                Err(rejected) => {
                    self.report_rejection(&values, &rejected);
                    failure = Some(rejected);
                }
            }
        }
    }

    /// Logs a rejected field by label and length, never its text.
    fn report_rejection(&self, values: &[String], rejected: &RuleFailure) {
        warn!(
            title = %self.title,
            field = rejected.label,
            value_len = values.get(rejected.index).map_or(0, |value| value.chars().count()),
            "Validation failed: {}",
            rejected.message
        );
    }

    fn starting_values(&self, seed: Option<&[String]>) -> Vec<String> {
        let seed = seed.unwrap_or_default();
        self.rules
            .iter()
            .enumerate()
            .map(|(index, _)| seed.get(index).cloned().unwrap_or_default())
            .collect()
    }

    fn present(&self, values: &[String], failure: Option<&RuleFailure>) -> Vec<FieldPrompt> {
        self.rules
            .iter()
            .zip(values)
            .enumerate()
            .map(|(index, (rule, value))| FieldPrompt {
                label: rule.label,
                value: value.clone(),
                error: failure
                    .filter(|failed| failed.index == index)
                    .map(|failed| failed.message.clone()),
            })
            .collect()
    }
}
