//! Resolved selections.
//!
//! A `ResolvedSelection` is an immutable snapshot of a selection with every
//! computed field evaluated against concrete prior arguments. All legality
//! questions (what values exist, is any possible, is exactly one forced,
//! is this value acceptable) are answered on the snapshot.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::{Argument, ElementId, ElementList};
use crate::error::ValidationError;

/// One value of a choices selection.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Choice {
    /// Value stored in the move arguments.
    pub value: Argument,
    /// Text shown to the player.
    pub label: String,
}

impl Choice {
    /// Create a choice with a distinct label.
    pub fn labeled(value: impl Into<Argument>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

impl From<&str> for Choice {
    fn from(v: &str) -> Self {
        Self::labeled(v, v)
    }
}

impl From<String> for Choice {
    fn from(v: String) -> Self {
        Self {
            label: v.clone(),
            value: Argument::Text(v),
        }
    }
}

impl From<i64> for Choice {
    fn from(v: i64) -> Self {
        Self::labeled(v, v.to_string())
    }
}

impl From<i32> for Choice {
    fn from(v: i32) -> Self {
        Self::labeled(v, v.to_string())
    }
}

impl<V: Into<Argument>> From<(V, &str)> for Choice {
    fn from((value, label): (V, &str)) -> Self {
        Self::labeled(value, label)
    }
}

/// Kind-specific payload of a resolved selection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ResolvedKind {
    /// Pick one (or, with min/max, several) board elements.
    Board { candidates: Vec<ElementId> },
    /// Pick one of an enumerated list.
    Choices { choices: Vec<Choice> },
    /// Pick an integer in [min, max].
    Number,
    /// Enter free text, optionally matching a pattern.
    Text { pattern: Option<String> },
    /// Press a confirmation button carrying a fixed value.
    Button { value: Argument },
}

impl ResolvedKind {
    /// Short kind name, as used by clients.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ResolvedKind::Board { .. } => "board",
            ResolvedKind::Choices { .. } => "choices",
            ResolvedKind::Number => "number",
            ResolvedKind::Text { .. } => "text",
            ResolvedKind::Button { .. } => "button",
        }
    }
}

/// Selection snapshot with all computed fields evaluated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSelection {
    /// Argument key within the action.
    pub name: String,
    /// Prompt shown to the player.
    pub prompt: Option<String>,
    /// Kind-specific payload.
    pub kind: ResolvedKind,
    /// Lower bound: numeric minimum, or minimum element count.
    pub min: Option<i64>,
    /// Upper bound: numeric maximum, or maximum element count.
    pub max: Option<i64>,
    /// Suggested starting value for free-entry widgets.
    pub initial: Option<Argument>,
    /// Auto-skip when only one value is legal.
    pub skip_if_only_one: bool,
    /// Skip entirely; any value is accepted and ignored.
    pub skip_if: bool,
    /// Flatten the next selection's prompts into this one.
    pub expand: bool,
    /// Opaque UI hints passed through untouched.
    pub client_context: Option<serde_json::Value>,
    /// Numeric ranges wider than this are unbounded.
    pub(crate) unbounded_threshold: i64,
    /// Numeric minimum used when `min` is unset.
    pub(crate) default_min: i64,
}

impl ResolvedSelection {
    /// Multi-select board choice: min or max was declared.
    #[must_use]
    pub fn is_multi(&self) -> bool {
        matches!(self.kind, ResolvedKind::Board { .. }) && (self.min.is_some() || self.max.is_some())
    }

    /// Whether this is a board selection.
    #[must_use]
    pub fn is_board(&self) -> bool {
        matches!(self.kind, ResolvedKind::Board { .. })
    }

    /// Single-select board choice, always presented for a click.
    #[must_use]
    pub fn is_single_board(&self) -> bool {
        self.is_board() && !self.is_multi()
    }

    /// Effective numeric minimum.
    #[must_use]
    pub fn number_min(&self) -> i64 {
        self.min.unwrap_or(self.default_min)
    }

    /// Board candidates, empty for other kinds.
    #[must_use]
    pub fn candidates(&self) -> &[ElementId] {
        match &self.kind {
            ResolvedKind::Board { candidates } => candidates,
            _ => &[],
        }
    }

    /// Minimum and maximum element count of a multi-select.
    fn count_bounds(&self, available: usize) -> (usize, usize) {
        let min = self.min.map_or(1, |m| m.max(0) as usize);
        let max = self.max.map_or(available, |m| (m.max(0) as usize).min(available));
        (min, max)
    }

    /// Never exhaustively enumerated: text, buttons, and numeric ranges
    /// without an upper bound or wider than the unbounded threshold.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        match &self.kind {
            ResolvedKind::Number => match self.max {
                None => true,
                Some(max) => max.saturating_sub(self.number_min()).saturating_add(1) > self.unbounded_threshold,
            },
            ResolvedKind::Text { .. } | ResolvedKind::Button { .. } => true,
            ResolvedKind::Board { .. } | ResolvedKind::Choices { .. } => false,
        }
    }

    /// Every concrete value this selection could take.
    ///
    /// Empty for unbounded selections.
    #[must_use]
    pub fn options(&self) -> Vec<Argument> {
        if self.is_unbounded() {
            return Vec::new();
        }
        match &self.kind {
            ResolvedKind::Number => {
                let max = self.max.unwrap_or(self.number_min());
                (self.number_min()..=max).map(Argument::Number).collect()
            }
            ResolvedKind::Choices { choices } => choices.iter().map(|c| c.value.clone()).collect(),
            ResolvedKind::Board { candidates } if self.is_multi() => {
                let (min, max) = self.count_bounds(candidates.len());
                combinations(candidates, min, max)
                    .into_iter()
                    .map(Argument::Elements)
                    .collect()
            }
            ResolvedKind::Board { candidates } => {
                candidates.iter().copied().map(Argument::Element).collect()
            }
            ResolvedKind::Text { .. } | ResolvedKind::Button { .. } => Vec::new(),
        }
    }

    /// False iff there is no legal value at all.
    #[must_use]
    pub fn is_possible(&self) -> bool {
        match &self.kind {
            ResolvedKind::Choices { choices } => !choices.is_empty(),
            ResolvedKind::Number => self.max.map_or(true, |max| self.number_min() <= max),
            ResolvedKind::Board { candidates } if self.is_multi() => {
                let (min, max) = self.count_bounds(candidates.len());
                candidates.len() >= min && min <= max
            }
            ResolvedKind::Board { candidates } => !candidates.is_empty(),
            ResolvedKind::Text { .. } | ResolvedKind::Button { .. } => true,
        }
    }

    /// The single legal value, when `skip_if_only_one` is set and exactly
    /// one value exists.
    #[must_use]
    pub fn is_forced(&self) -> Option<Argument> {
        if !self.skip_if_only_one {
            return None;
        }
        match &self.kind {
            ResolvedKind::Button { value } => Some(value.clone()),
            ResolvedKind::Choices { choices } if choices.len() == 1 => Some(choices[0].value.clone()),
            ResolvedKind::Number => match self.max {
                Some(max) if max == self.number_min() => Some(Argument::Number(max)),
                _ => None,
            },
            ResolvedKind::Board { candidates } if self.is_multi() => {
                let available = candidates.len() as i64;
                (self.min == Some(available) && self.max == Some(available))
                    .then(|| Argument::Elements(ElementList::from_slice(candidates)))
            }
            ResolvedKind::Board { candidates } if candidates.len() == 1 => {
                Some(Argument::Element(candidates[0]))
            }
            _ => None,
        }
    }

    /// Check a supplied value.
    pub fn validate(&self, arg: &Argument) -> Result<(), ValidationError> {
        if self.skip_if {
            return Ok(());
        }
        match &self.kind {
            ResolvedKind::Board { candidates } if self.is_multi() => {
                let picked: &[ElementId] = match arg {
                    Argument::Elements(list) => list,
                    Argument::Element(e) => std::slice::from_ref(e),
                    _ => return Err(ValidationError::WrongType { expected: "elements" }),
                };
                let (min, max) = self.count_bounds(candidates.len());
                if picked.len() < min || picked.len() > max {
                    return Err(ValidationError::WrongCount {
                        min,
                        max: self.max.map_or_else(|| "any number".to_string(), |m| m.to_string()),
                        got: picked.len(),
                    });
                }
                for (i, el) in picked.iter().enumerate() {
                    if !candidates.contains(el) || picked[..i].contains(el) {
                        return Err(ValidationError::NotAnElement { value: el.to_string() });
                    }
                }
                Ok(())
            }
            ResolvedKind::Board { candidates } => match arg {
                Argument::Element(el) if candidates.contains(el) => Ok(()),
                Argument::Element(el) => Err(ValidationError::NotAnElement { value: el.to_string() }),
                _ => Err(ValidationError::WrongType { expected: "element" }),
            },
            ResolvedKind::Choices { choices } => {
                if choices.iter().any(|c| c.value == *arg) {
                    Ok(())
                } else {
                    Err(ValidationError::NotAChoice { value: arg.to_string() })
                }
            }
            ResolvedKind::Number => {
                let n = arg.as_number().ok_or(ValidationError::NotANumber)?;
                if n < self.number_min() {
                    return Err(ValidationError::BelowMinimum { min: self.number_min() });
                }
                if let Some(max) = self.max.filter(|&max| n > max) {
                    return Err(ValidationError::AboveMaximum { max });
                }
                Ok(())
            }
            ResolvedKind::Text { pattern } => {
                let text = arg.as_text().ok_or(ValidationError::WrongType { expected: "text" })?;
                match pattern {
                    Some(pattern) if !compile(pattern).is_match(text) => {
                        Err(ValidationError::PatternMismatch { pattern: pattern.clone() })
                    }
                    _ => Ok(()),
                }
            }
            ResolvedKind::Button { value } => {
                if value == arg {
                    Ok(())
                } else {
                    Err(ValidationError::WrongButton)
                }
            }
        }
    }

    /// Narrow the candidate set to values proven completable.
    ///
    /// Returns a new snapshot; `self` is left unchanged. Only board and
    /// choices selections are narrowed.
    #[must_use]
    pub fn with_options(&self, surviving: &[Argument]) -> ResolvedSelection {
        let mut narrowed = self.clone();
        match &mut narrowed.kind {
            ResolvedKind::Board { candidates } => {
                candidates.retain(|el| surviving.contains(&Argument::Element(*el)));
            }
            ResolvedKind::Choices { choices } => {
                choices.retain(|c| surviving.contains(&c.value));
            }
            _ => {}
        }
        narrowed
    }
}

/// Compile a selection pattern.
///
/// An invalid pattern is a game-definition bug.
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid text pattern {pattern:?}: {e}"))
}

/// All combinations of `items` with size in `min..=max`, smallest first,
/// each in the order the items appear.
#[must_use]
pub fn combinations(items: &[ElementId], min: usize, max: usize) -> Vec<ElementList> {
    let max = max.min(items.len());
    let mut out = Vec::new();
    for size in min..=max {
        let mut indices: Vec<usize> = (0..size).collect();
        loop {
            out.push(indices.iter().map(|&i| items[i]).collect());

            // Advance to the next index combination in lexicographic order.
            let Some(pos) = (0..size).rev().find(|&i| indices[i] != i + items.len() - size) else {
                break;
            };
            indices[pos] += 1;
            for i in pos + 1..size {
                indices[i] = indices[i - 1] + 1;
            }
        }
    }
    out
}
