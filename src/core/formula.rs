//! R-style model formulas and design-matrix construction.
//!
//! Supported right-hand-side terms:
//!
//! | syntax      | column                       |
//! |-------------|------------------------------|
//! | `x`         | x                            |
//! | `I(x^k)`    | x raised to the integer k    |
//! | `log(x)`    | natural log of x             |
//! | `sqrt(x)`   | square root of x             |
//! | `x:z`       | elementwise product          |
//!
//! The intercept is included unless the formula contains `- 1` or `+ 0`.

use crate::core::{DataFrame, PredictError};
use faer::Mat;

/// A single right-hand-side term.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Variable(String),
    Power(String, i32),
    Log(String),
    Sqrt(String),
    Interaction(Vec<String>),
}

impl Term {
    /// Predictor variables referenced by this term.
    pub fn variables(&self) -> Vec<&str> {
        match self {
            Term::Variable(v) | Term::Power(v, _) | Term::Log(v) | Term::Sqrt(v) => {
                vec![v.as_str()]
            }
            Term::Interaction(vs) => vs.iter().map(String::as_str).collect(),
        }
    }

    /// Column label in the design matrix.
    pub fn label(&self) -> String {
        match self {
            Term::Variable(v) => v.clone(),
            Term::Power(v, k) => format!("I({}^{})", v, k),
            Term::Log(v) => format!("log({})", v),
            Term::Sqrt(v) => format!("sqrt({})", v),
            Term::Interaction(vs) => vs.join(":"),
        }
    }

    fn evaluate(&self, data: &DataFrame, i: usize) -> Result<f64, PredictError> {
        let value = match self {
            Term::Variable(v) => data.require(v)?[i],
            Term::Power(v, k) => data.require(v)?[i].powi(*k),
            Term::Log(v) => data.require(v)?[i].ln(),
            Term::Sqrt(v) => data.require(v)?[i].sqrt(),
            Term::Interaction(vs) => {
                let mut prod = 1.0;
                for v in vs {
                    prod *= data.require(v)?[i];
                }
                prod
            }
        };
        Ok(value)
    }
}

/// A parsed model formula: optional response plus right-hand-side terms.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    response: Option<String>,
    terms: Vec<Term>,
    intercept: bool,
}

impl Formula {
    /// Build a formula directly from terms.
    pub fn new(response: Option<&str>, terms: Vec<Term>, intercept: bool) -> Self {
        Self {
            response: response.map(str::to_string),
            terms,
            intercept,
        }
    }

    /// Parse a formula such as `"y ~ x + I(x^2) - 1"` or `"~ log(dose)"`.
    pub fn parse(formula: &str) -> Result<Self, PredictError> {
        let (response, rhs) = match formula.split_once('~') {
            Some((lhs, rhs)) => {
                let lhs = lhs.trim();
                (if lhs.is_empty() { None } else { Some(lhs) }, rhs)
            }
            None => (None, formula),
        };
        if let Some(r) = response {
            if !is_identifier(r) {
                return Err(PredictError::InvalidData(format!(
                    "cannot parse response '{}'",
                    r
                )));
            }
        }

        let mut terms = Vec::new();
        let mut intercept = true;
        for (sign, token) in split_top_level(rhs)? {
            match (sign, token.as_str()) {
                ('-', "1") | ('+', "0") => intercept = false,
                ('+', "1") => intercept = true,
                ('-', _) => {
                    return Err(PredictError::InvalidData(format!(
                        "term removal is only supported for the intercept, got '-{}'",
                        token
                    )));
                }
                _ => {
                    let term = parse_term(&token)?;
                    if !terms.contains(&term) {
                        terms.push(term);
                    }
                }
            }
        }

        Ok(Self {
            response: response.map(str::to_string),
            terms,
            intercept,
        })
    }

    /// Response variable, if the formula has a left-hand side.
    pub fn response(&self) -> Option<&str> {
        self.response.as_deref()
    }

    /// Right-hand-side terms (excluding the intercept).
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Whether the design matrix carries an intercept column.
    pub fn has_intercept(&self) -> bool {
        self.intercept
    }

    /// Distinct predictor variables, in order of first appearance.
    pub fn variables(&self) -> Vec<String> {
        let mut vars: Vec<String> = Vec::new();
        for term in &self.terms {
            for v in term.variables() {
                if !vars.iter().any(|seen| seen == v) {
                    vars.push(v.to_string());
                }
            }
        }
        vars
    }

    /// Number of design-matrix columns.
    pub fn n_columns(&self) -> usize {
        self.terms.len() + usize::from(self.intercept)
    }

    /// Design-matrix column labels.
    pub fn column_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.n_columns());
        if self.intercept {
            names.push("(Intercept)".to_string());
        }
        names.extend(self.terms.iter().map(Term::label));
        names
    }

    /// Build the n × p design matrix for `data`.
    ///
    /// Fails with `MissingParameter` if a referenced column is absent and with
    /// `InvalidData` if a transformed value is not finite.
    pub fn design_matrix(&self, data: &DataFrame) -> Result<Mat<f64>, PredictError> {
        for v in self.variables() {
            data.require(&v)?;
        }

        let n = data.nrows();
        let offset = usize::from(self.intercept);
        let mut x = Mat::zeros(n, self.n_columns());

        for i in 0..n {
            if self.intercept {
                x[(i, 0)] = 1.0;
            }
            for (j, term) in self.terms.iter().enumerate() {
                let value = term.evaluate(data, i)?;
                if !value.is_finite() {
                    return Err(PredictError::InvalidData(format!(
                        "term '{}' is not finite in row {}",
                        term.label(),
                        i
                    )));
                }
                x[(i, j + offset)] = value;
            }
        }

        Ok(x)
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '.' || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
}

/// Split on `+`/`-` outside parentheses, returning each token with its sign.
fn split_top_level(rhs: &str) -> Result<Vec<(char, String)>, PredictError> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut sign = '+';
    let mut current = String::new();

    for c in rhs.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    PredictError::InvalidData(format!("unbalanced parentheses in '{}'", rhs))
                })?;
                current.push(c);
            }
            '+' | '-' if depth == 0 => {
                let token = current.trim().to_string();
                if !token.is_empty() {
                    tokens.push((sign, token));
                }
                current.clear();
                sign = c;
            }
            c if c.is_whitespace() => {}
            _ => current.push(c),
        }
    }
    if depth != 0 {
        return Err(PredictError::InvalidData(format!(
            "unbalanced parentheses in '{}'",
            rhs
        )));
    }
    let token = current.trim().to_string();
    if !token.is_empty() {
        tokens.push((sign, token));
    }

    Ok(tokens)
}

fn parse_term(token: &str) -> Result<Term, PredictError> {
    let invalid = || PredictError::InvalidData(format!("cannot parse term '{}'", token));

    if let Some(inner) = strip_call(token, "I") {
        let (var, power) = inner.split_once('^').ok_or_else(invalid)?;
        let power: i32 = power.parse().map_err(|_| invalid())?;
        if !is_identifier(var) {
            return Err(invalid());
        }
        return Ok(Term::Power(var.to_string(), power));
    }
    if let Some(inner) = strip_call(token, "log") {
        return if is_identifier(inner) {
            Ok(Term::Log(inner.to_string()))
        } else {
            Err(invalid())
        };
    }
    if let Some(inner) = strip_call(token, "sqrt") {
        return if is_identifier(inner) {
            Ok(Term::Sqrt(inner.to_string()))
        } else {
            Err(invalid())
        };
    }
    if token.contains(':') {
        let vars: Vec<String> = token.split(':').map(str::to_string).collect();
        if vars.iter().all(|v| is_identifier(v)) {
            return Ok(Term::Interaction(vars));
        }
        return Err(invalid());
    }
    if is_identifier(token) {
        return Ok(Term::Variable(token.to_string()));
    }
    Err(invalid())
}

fn strip_call<'a>(token: &'a str, name: &str) -> Option<&'a str> {
    token
        .strip_prefix(name)?
        .strip_prefix('(')?
        .strip_suffix(')')
}
