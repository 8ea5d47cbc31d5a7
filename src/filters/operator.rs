//! generic operator filter engine
//!
//! an `OperatorFilter` binds an ordered catalog of named operators to a value
//! initializer. the consuming table keeps a `FilterState` per column and asks
//! the filter to evaluate rows, reshape values on operator switches, and name
//! the widget for the active operator.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use super::widget::Widget;

/// row predicate shared by every clone of an operator
pub type Predicate<R, F> = Arc<dyn Fn(&R, &F) -> bool + Send + Sync>;

/// value initializer: `(new operator code, previous value) -> new value`
pub type Init<F> = Arc<dyn Fn(&str, Option<&F>) -> F + Send + Sync>;

/// errors raised by the operator engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// the code is not part of this filter's catalog
    #[error("unknown operator '{code}' (available: {})", .available.join(", "))]
    UnknownOperator { code: String, available: Vec<String> },
    #[error("operator catalog is empty")]
    EmptyCatalog,
    #[error("duplicate operator code '{0}'")]
    DuplicateOperator(String),
    #[error("operator filter has no value initializer")]
    MissingInit,
    /// widget text that does not parse into the filter's value type
    #[error("invalid value '{value}' (expected {expected})")]
    InvalidValue { value: String, expected: String },
}

/// a named comparison rule with its own value widget
pub struct Operator<R, F> {
    code: String,
    label: String,
    predicate: Predicate<R, F>,
    widget: Widget,
}

impl<R, F> Operator<R, F> {
    pub fn new<P>(
        code: impl Into<String>,
        label: impl Into<String>,
        predicate: P,
        widget: Widget,
    ) -> Self
    where
        P: Fn(&R, &F) -> bool + Send + Sync + 'static,
    {
        Self {
            code: code.into(),
            label: label.into(),
            predicate: Arc::new(predicate),
            widget,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn widget(&self) -> &Widget {
        &self.widget
    }

    /// run the predicate against a row value
    pub fn test(&self, row: &R, value: &F) -> bool {
        (self.predicate)(row, value)
    }

    /// same operator under a different display label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

impl<R, F> Clone for Operator<R, F> {
    fn clone(&self) -> Self {
        Self {
            code: self.code.clone(),
            label: self.label.clone(),
            predicate: Arc::clone(&self.predicate),
            widget: self.widget.clone(),
        }
    }
}

impl<R, F> fmt::Debug for Operator<R, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operator")
            .field("code", &self.code)
            .field("label", &self.label)
            .field("widget", &self.widget)
            .finish_non_exhaustive()
    }
}

/// per-column filter state owned by the consuming table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterState<F> {
    #[serde(rename = "op")]
    pub operator: String,
    pub value: F,
}

impl<F> FilterState<F> {
    pub fn new(operator: impl Into<String>, value: F) -> Self {
        Self {
            operator: operator.into(),
            value,
        }
    }
}

/// a self-contained filter unit over one value domain
pub struct OperatorFilter<R, F> {
    operators: Vec<Operator<R, F>>,
    init: Init<F>,
}

impl<R, F> OperatorFilter<R, F> {
    /// build a filter from a catalog and an initializer
    pub fn new<I>(operators: Vec<Operator<R, F>>, init: I) -> Result<Self, FilterError>
    where
        I: Fn(&str, Option<&F>) -> F + Send + Sync + 'static,
    {
        Self::from_parts(operators, Arc::new(init))
    }

    pub fn builder() -> OperatorFilterBuilder<R, F> {
        OperatorFilterBuilder::default()
    }

    /// builder seeded with this filter's operators and initializer
    pub fn to_builder(&self) -> OperatorFilterBuilder<R, F> {
        OperatorFilterBuilder {
            operators: self.operators.clone(),
            init: Some(Arc::clone(&self.init)),
        }
    }

    fn from_parts(operators: Vec<Operator<R, F>>, init: Init<F>) -> Result<Self, FilterError> {
        validate_catalog(&operators)?;
        debug!(
            operators = ?operators.iter().map(|op| op.code()).collect::<Vec<_>>(),
            "built operator filter"
        );
        Ok(Self { operators, init })
    }

    /// infallible constructor for the built-in catalogs
    pub(crate) fn from_catalog<I>(operators: Vec<Operator<R, F>>, init: I) -> Self
    where
        I: Fn(&str, Option<&F>) -> F + Send + Sync + 'static,
    {
        debug_assert!(validate_catalog(&operators).is_ok());
        Self {
            operators,
            init: Arc::new(init),
        }
    }

    /// operators in display order
    pub fn operators(&self) -> &[Operator<R, F>] {
        &self.operators
    }

    pub fn codes(&self) -> Vec<&str> {
        self.operators.iter().map(|op| op.code()).collect()
    }

    /// the first operator in the catalog
    pub fn default_operator(&self) -> &Operator<R, F> {
        // catalogs are validated non-empty on construction
        &self.operators[0]
    }

    /// look up an operator by code
    pub fn find(&self, code: &str) -> Result<&Operator<R, F>, FilterError> {
        self.operators
            .iter()
            .find(|op| op.code() == code)
            .ok_or_else(|| FilterError::UnknownOperator {
                code: code.to_string(),
                available: self.codes().into_iter().map(String::from).collect(),
            })
    }

    /// evaluate a row against the operator named by `code`
    pub fn evaluate(&self, code: &str, row: &R, value: &F) -> Result<bool, FilterError> {
        let op = self.find(code)?;
        let matched = op.test(row, value);
        trace!(operator = code, matched, "evaluated row");
        Ok(matched)
    }

    /// compute the value for a newly selected operator
    pub fn on_operator_change(&self, code: &str, previous: Option<&F>) -> Result<F, FilterError> {
        self.find(code)?;
        debug!(operator = code, has_previous = previous.is_some(), "operator changed");
        Ok((self.init)(code, previous))
    }

    /// widget the UI should render for `code`
    pub fn widget_for(&self, code: &str) -> Result<&Widget, FilterError> {
        Ok(self.find(code)?.widget())
    }

    /// state on first activation: default operator with its initial value
    pub fn initial_state(&self) -> FilterState<F> {
        let code = self.default_operator().code();
        FilterState::new(code, (self.init)(code, None))
    }

    /// switch the state's operator, reshaping its value through the initializer
    pub fn switch_operator(
        &self,
        state: &FilterState<F>,
        code: &str,
    ) -> Result<FilterState<F>, FilterError> {
        let value = self.on_operator_change(code, Some(&state.value))?;
        Ok(FilterState::new(code, value))
    }

    /// evaluate a row against a stored state
    pub fn matches(&self, state: &FilterState<F>, row: &R) -> Result<bool, FilterError> {
        self.evaluate(&state.operator, row, &state.value)
    }

    /// resolve the state's operator once and return a row predicate
    pub fn predicate<'a>(
        &'a self,
        state: &'a FilterState<F>,
    ) -> Result<impl Fn(&R) -> bool + 'a, FilterError>
    where
        R: 'a,
        F: 'a,
    {
        let op = self.find(&state.operator)?;
        Ok(move |row: &R| op.test(row, &state.value))
    }
}

impl<R, F> Clone for OperatorFilter<R, F> {
    fn clone(&self) -> Self {
        Self {
            operators: self.operators.clone(),
            init: Arc::clone(&self.init),
        }
    }
}

impl<R, F> fmt::Debug for OperatorFilter<R, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorFilter")
            .field("operators", &self.operators)
            .finish_non_exhaustive()
    }
}

fn validate_catalog<R, F>(operators: &[Operator<R, F>]) -> Result<(), FilterError> {
    if operators.is_empty() {
        return Err(FilterError::EmptyCatalog);
    }

    let mut seen = HashSet::new();
    for op in operators {
        if !seen.insert(op.code()) {
            return Err(FilterError::DuplicateOperator(op.code().to_string()));
        }
    }

    Ok(())
}

/// overrides for a filter's catalog and initializer
pub struct OperatorFilterBuilder<R, F> {
    operators: Vec<Operator<R, F>>,
    init: Option<Init<F>>,
}

impl<R, F> Default for OperatorFilterBuilder<R, F> {
    fn default() -> Self {
        Self {
            operators: Vec::new(),
            init: None,
        }
    }
}

impl<R, F> OperatorFilterBuilder<R, F> {
    /// replace the whole operator list
    pub fn operators(mut self, operators: Vec<Operator<R, F>>) -> Self {
        self.operators = operators;
        self
    }

    /// append one operator
    pub fn operator(mut self, operator: Operator<R, F>) -> Self {
        self.operators.push(operator);
        self
    }

    /// drop every operator whose code is not listed, keeping catalog order
    pub fn only(mut self, codes: &[&str]) -> Self {
        self.operators.retain(|op| codes.contains(&op.code()));
        self
    }

    pub fn init<I>(mut self, init: I) -> Self
    where
        I: Fn(&str, Option<&F>) -> F + Send + Sync + 'static,
    {
        self.init = Some(Arc::new(init));
        self
    }

    pub fn build(self) -> Result<OperatorFilter<R, F>, FilterError> {
        let init = self.init.ok_or(FilterError::MissingInit)?;
        OperatorFilter::from_parts(self.operators, init)
    }
}
