//! Selection definitions.
//!
//! A `Selection` describes one typed choice of an action at game-definition
//! time. Its settings may be constant or computed from earlier arguments;
//! `resolve` collapses them into a [`ResolvedSelection`].
//!
//! ```
//! use rust_tabletop::core::{Args, GameState};
//! use rust_tabletop::selection::{ResolveContext, Selection};
//!
//! let amount = Selection::number("amount")
//!     .min(0)
//!     .max_with(|cx| if cx.args.text("resource") == Some("oil") { 3 } else { 1 });
//!
//! let state = GameState::new(2, 7);
//! let args = Args::new().with("resource", "oil");
//! let resolved = amount.resolve(&ResolveContext::new(&state, &args));
//! assert_eq!(resolved.max, Some(3));
//! ```

use crate::board::ElementQuery;
use crate::core::{Argument, ElementId};
use crate::error::ValidationError;

use super::field::{Field, ResolveContext};
use super::resolved::{Choice, ResolvedKind, ResolvedSelection};

/// Kind-specific payload of a selection definition.
#[derive(Clone, Debug)]
enum Payload {
    Board(Field<Vec<ElementId>>),
    Choices(Field<Vec<Choice>>),
    Number,
    Text(Option<Field<String>>),
    Button(Argument),
}

/// One typed choice within an action.
#[derive(Clone, Debug)]
pub struct Selection {
    name: String,
    prompt: Option<Field<String>>,
    payload: Payload,
    min: Option<Field<i64>>,
    max: Option<Field<i64>>,
    initial: Option<Field<Argument>>,
    skip_if_only_one: bool,
    skip_if: Field<bool>,
    expand: bool,
    client_context: Option<serde_json::Value>,
}

impl Selection {
    fn with_payload(name: impl Into<String>, payload: Payload) -> Self {
        Self {
            name: name.into(),
            prompt: None,
            payload,
            min: None,
            max: None,
            initial: None,
            skip_if_only_one: true,
            skip_if: Field::Constant(false),
            expand: false,
            client_context: None,
        }
    }

    // === Kinds ===

    /// Choose a board element matching `query`, seen from the active viewpoint.
    pub fn board(name: impl Into<String>, query: ElementQuery) -> Self {
        Self::board_with(name, move |cx| cx.all(&query))
    }

    /// Choose a board element from a computed candidate list.
    pub fn board_with(
        name: impl Into<String>,
        candidates: impl Fn(&ResolveContext<'_>) -> Vec<ElementId> + 'static,
    ) -> Self {
        Self::with_payload(name, Payload::Board(Field::computed(candidates)))
    }

    /// Choose one of a fixed list.
    ///
    /// Items may be plain values or `(value, label)` pairs.
    pub fn choices<C: Into<Choice>>(name: impl Into<String>, choices: impl IntoIterator<Item = C>) -> Self {
        let choices = choices.into_iter().map(Into::into).collect();
        Self::with_payload(name, Payload::Choices(Field::Constant(choices)))
    }

    /// Choose one of a computed list.
    pub fn choices_with(
        name: impl Into<String>,
        choices: impl Fn(&ResolveContext<'_>) -> Vec<Choice> + 'static,
    ) -> Self {
        Self::with_payload(name, Payload::Choices(Field::computed(choices)))
    }

    /// Choose an integer. Bounds are set with `min`/`max`.
    pub fn number(name: impl Into<String>) -> Self {
        Self::with_payload(name, Payload::Number)
    }

    /// Enter free text.
    pub fn text(name: impl Into<String>) -> Self {
        Self::with_payload(name, Payload::Text(None))
    }

    /// Confirm with a button carrying `value`.
    pub fn button(name: impl Into<String>, value: impl Into<Argument>) -> Self {
        Self::with_payload(name, Payload::Button(value.into()))
    }

    // === Settings ===

    /// Set a fixed prompt.
    #[must_use]
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(Field::Constant(prompt.into()));
        self
    }

    /// Set a computed prompt.
    #[must_use]
    pub fn prompt_with(mut self, prompt: impl Fn(&ResolveContext<'_>) -> String + 'static) -> Self {
        self.prompt = Some(Field::computed(prompt));
        self
    }

    /// Numeric minimum, or minimum element count on a board selection.
    #[must_use]
    pub fn min(mut self, min: i64) -> Self {
        self.min = Some(Field::Constant(min));
        self
    }

    /// Computed minimum.
    #[must_use]
    pub fn min_with(mut self, min: impl Fn(&ResolveContext<'_>) -> i64 + 'static) -> Self {
        self.min = Some(Field::computed(min));
        self
    }

    /// Numeric maximum, or maximum element count on a board selection.
    #[must_use]
    pub fn max(mut self, max: i64) -> Self {
        self.max = Some(Field::Constant(max));
        self
    }

    /// Computed maximum.
    #[must_use]
    pub fn max_with(mut self, max: impl Fn(&ResolveContext<'_>) -> i64 + 'static) -> Self {
        self.max = Some(Field::computed(max));
        self
    }

    /// Pick exactly `n` board elements.
    #[must_use]
    pub fn count(self, n: i64) -> Self {
        self.min(n).max(n)
    }

    /// Suggested starting value.
    #[must_use]
    pub fn initial(mut self, value: impl Into<Argument>) -> Self {
        self.initial = Some(Field::Constant(value.into()));
        self
    }

    /// Computed starting value.
    #[must_use]
    pub fn initial_with(mut self, value: impl Fn(&ResolveContext<'_>) -> Argument + 'static) -> Self {
        self.initial = Some(Field::computed(value));
        self
    }

    /// Require text to match a regular expression.
    ///
    /// # Panics
    ///
    /// Panics if this is not a text selection.
    #[must_use]
    pub fn pattern(self, pattern: impl Into<String>) -> Self {
        self.set_pattern(Field::Constant(pattern.into()))
    }

    /// Computed text pattern.
    #[must_use]
    pub fn pattern_with(self, pattern: impl Fn(&ResolveContext<'_>) -> String + 'static) -> Self {
        self.set_pattern(Field::computed(pattern))
    }

    fn set_pattern(mut self, pattern: Field<String>) -> Self {
        match &mut self.payload {
            Payload::Text(slot) => *slot = Some(pattern),
            _ => panic!("pattern set on non-text selection {}", self.name),
        }
        self
    }

    /// Auto-skip when exactly one value is legal (default true).
    #[must_use]
    pub fn skip_if_only_one(mut self, skip: bool) -> Self {
        self.skip_if_only_one = skip;
        self
    }

    /// Skip this selection entirely.
    #[must_use]
    pub fn skip_if(mut self, skip: bool) -> Self {
        self.skip_if = Field::Constant(skip);
        self
    }

    /// Skip this selection when `skip` returns true for the prior arguments.
    #[must_use]
    pub fn skip_if_with(mut self, skip: impl Fn(&ResolveContext<'_>) -> bool + 'static) -> Self {
        self.skip_if = Field::computed(skip);
        self
    }

    /// Present the following selection's choices ahead of this one.
    #[must_use]
    pub fn expand(mut self, expand: bool) -> Self {
        self.expand = expand;
        self
    }

    /// Attach opaque UI hints.
    #[must_use]
    pub fn client_context(mut self, context: serde_json::Value) -> Self {
        self.client_context = Some(context);
        self
    }

    // === Inspection ===

    /// Argument key within the action.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind name; safe to call without resolving.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self.payload {
            Payload::Board(_) => "board",
            Payload::Choices(_) => "choices",
            Payload::Number => "number",
            Payload::Text(_) => "text",
            Payload::Button(_) => "button",
        }
    }

    /// Whether the selection has a prompt of its own.
    #[must_use]
    pub fn has_prompt(&self) -> bool {
        self.prompt.is_some()
    }

    /// Whether any setting is computed from prior arguments.
    #[must_use]
    pub fn is_computed(&self) -> bool {
        let payload = match &self.payload {
            Payload::Board(f) => f.is_computed(),
            Payload::Choices(f) => f.is_computed(),
            Payload::Text(Some(f)) => f.is_computed(),
            Payload::Number | Payload::Text(None) | Payload::Button(_) => false,
        };
        payload
            || self.prompt.as_ref().is_some_and(Field::is_computed)
            || self.min.as_ref().is_some_and(Field::is_computed)
            || self.max.as_ref().is_some_and(Field::is_computed)
            || self.initial.as_ref().is_some_and(Field::is_computed)
            || self.skip_if.is_computed()
    }

    /// Whether the selection is skipped for these prior arguments.
    #[must_use]
    pub fn is_skipped(&self, cx: &ResolveContext<'_>) -> bool {
        self.skip_if.resolve(cx)
    }

    // === Resolution ===

    /// Evaluate every computed setting against `cx`.
    #[must_use]
    pub fn resolve(&self, cx: &ResolveContext<'_>) -> ResolvedSelection {
        let kind = match &self.payload {
            Payload::Board(candidates) => ResolvedKind::Board {
                candidates: candidates.resolve(cx),
            },
            Payload::Choices(choices) => ResolvedKind::Choices {
                choices: choices.resolve(cx),
            },
            Payload::Number => ResolvedKind::Number,
            Payload::Text(pattern) => ResolvedKind::Text {
                pattern: pattern.as_ref().map(|p| p.resolve(cx)),
            },
            Payload::Button(value) => ResolvedKind::Button { value: value.clone() },
        };
        let config = cx.state.config();

        ResolvedSelection {
            name: self.name.clone(),
            prompt: self.prompt.as_ref().map(|p| p.resolve(cx)),
            kind,
            min: self.min.as_ref().map(|f| f.resolve(cx)),
            max: self.max.as_ref().map(|f| f.resolve(cx)),
            initial: self.initial.as_ref().map(|f| f.resolve(cx)),
            skip_if_only_one: self.skip_if_only_one,
            skip_if: self.skip_if.resolve(cx),
            expand: self.expand,
            client_context: self.client_context.clone(),
            unbounded_threshold: config.unbounded_threshold,
            default_min: config.default_number_min,
        }
    }

    /// Validate `arg` against this selection resolved with `cx`.
    pub fn validate(&self, arg: &Argument, cx: &ResolveContext<'_>) -> Result<(), ValidationError> {
        self.resolve(cx).validate(arg)
    }
}
