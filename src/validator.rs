use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::{MovieDraft, MovieKind, MoviePatch};

pub const MIN_YEAR: i32 = 1880;

/// Whether absent fields are violations (create) or "leave unchanged" (update).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
    Full,
    Partial,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.0.iter().find(|e| e.field == field).map(|e| e.message.as_str())
    }

    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError { field, message: message.into() });
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", err.field, err.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validates a create payload. Every field must be present.
pub fn validate_draft(input: &Value) -> Result<MovieDraft, ValidationErrors> {
    MovieDraft::try_from(validate(input, Mode::Full)?)
}

impl TryFrom<MoviePatch> for MovieDraft {
    type Error = ValidationErrors;

    fn try_from(patch: MoviePatch) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::default();
        let mut require = |present: bool, name: &'static str, label: &str| {
            if !present {
                errors.push(name, format!("{label} is required"));
            }
        };
        require(patch.title.is_some(), "title", "Title");
        require(patch.kind.is_some(), "type", "Type");
        require(patch.director.is_some(), "director", "Director");
        require(patch.budget.is_some(), "budget", "Budget");
        require(patch.location.is_some(), "location", "Location");
        require(patch.duration.is_some(), "duration", "Duration");
        require(patch.year.is_some(), "year", "Year");

        match patch {
            MoviePatch {
                title: Some(title),
                kind: Some(kind),
                director: Some(director),
                budget: Some(budget),
                location: Some(location),
                duration: Some(duration),
                year: Some(year),
            } => Ok(MovieDraft { title, kind, director, budget, location, duration, year }),
            _ => Err(errors),
        }
    }
}

/// Validates an update payload. Absent fields are left out of the patch.
pub fn validate_patch(input: &Value) -> Result<MoviePatch, ValidationErrors> {
    validate(input, Mode::Partial)
}

/// Checks every field of `input` and collects all violations before failing.
pub fn validate(input: &Value, mode: Mode) -> Result<MoviePatch, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let Some(obj) = input.as_object() else {
        errors.push("body", "Request body must be a JSON object");
        return Err(errors);
    };

    let patch = MoviePatch {
        title: field(obj, ("title", "Title"), mode, &mut errors, text),
        kind: field(obj, ("type", "Type"), mode, &mut errors, |v, _| kind(v)),
        director: field(obj, ("director", "Director"), mode, &mut errors, text),
        budget: field(obj, ("budget", "Budget"), mode, &mut errors, |v, _| budget(v)),
        location: field(obj, ("location", "Location"), mode, &mut errors, text),
        duration: field(obj, ("duration", "Duration"), mode, &mut errors, text),
        year: field(obj, ("year", "Year"), mode, &mut errors, |v, _| year(v)),
    };

    if errors.0.is_empty() { Ok(patch) } else { Err(errors) }
}

fn field<T>(
    obj: &Map<String, Value>,
    (name, label): (&'static str, &str),
    mode: Mode,
    errors: &mut ValidationErrors,
    check: impl FnOnce(&Value, &str) -> Result<T, String>,
) -> Option<T> {
    match obj.get(name) {
        None if mode == Mode::Partial => None,
        None | Some(Value::Null) => {
            errors.push(name, format!("{label} is required"));
            None
        },
        Some(value) => match check(value, label) {
            Ok(v) => Some(v),
            Err(message) => {
                errors.push(name, message);
                None
            },
        },
    }
}

fn text(value: &Value, label: &str) -> Result<String, String> {
    match value {
        Value::String(s) if s.trim().is_empty() => Err(format!("{label} is required")),
        Value::String(s) => Ok(s.clone()),
        _ => Err("Expected a string".to_string()),
    }
}

fn kind(value: &Value) -> Result<MovieKind, String> {
    value.as_str().and_then(MovieKind::from_name).ok_or_else(|| {
        let names: Vec<&str> = MovieKind::ALL.iter().map(|k| k.as_str()).collect();
        format!("Type must be one of: {}", names.join(", "))
    })
}

fn budget(value: &Value) -> Result<f64, String> {
    match coerce_number(value) {
        Some(n) if n.is_finite() && n > 0.0 => Ok(n),
        _ => Err("Budget must be a positive number".to_string()),
    }
}

fn year(value: &Value) -> Result<i32, String> {
    let n = coerce_number(value)
        .filter(|n| n.is_finite() && n.fract() == 0.0)
        .ok_or_else(|| "Year must be a whole number".to_string())?;
    if n < f64::from(MIN_YEAR) {
        return Err(format!("Year must be {MIN_YEAR} or later"));
    }
    if n > f64::from(i32::MAX) {
        return Err("Year must be a whole number".to_string());
    }
    Ok(n as i32)
}

/// Accepts JSON numbers and numeric strings, like a form field would send.
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() { None } else { s.parse::<f64>().ok() }
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn valid() -> Value {
        json!({
            "title": "War Horse",
            "type": "Movie",
            "director": "Steven Spielberg",
            "budget": 66000000,
            "location": "Devon, England",
            "duration": "146 min",
            "year": 2011
        })
    }

    #[test]
    fn accepts_a_complete_payload() {
        let draft = validate_draft(&valid()).unwrap();
        assert_eq!(draft.title, "War Horse");
        assert_eq!(draft.kind, MovieKind::Movie);
        assert_eq!(draft.budget, 66_000_000.0);
        assert_eq!(draft.year, 2011);
    }

    #[test]
    fn incomplete_patch_is_not_a_draft() {
        let patch = MoviePatch { title: Some("Heat".to_string()), year: Some(1995), ..Default::default() };
        let errors = MovieDraft::try_from(patch).unwrap_err();
        let fields: Vec<&str> = errors.errors().iter().map(|e| e.field).collect();
        assert_eq!(fields, ["type", "director", "budget", "location", "duration"]);
        assert_eq!(errors.message_for("budget"), Some("Budget is required"));
    }

    #[test]
    fn coerces_numeric_strings() {
        let mut input = valid();
        input["budget"] = json!(" 1500.50 ");
        input["year"] = json!("1999");
        let draft = validate_draft(&input).unwrap();
        assert_eq!(draft.budget, 1500.5);
        assert_eq!(draft.year, 1999);
    }

    #[test]
    fn reports_every_missing_field() {
        let errors = validate_draft(&json!({})).unwrap_err();
        let fields: Vec<&str> = errors.errors().iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            ["title", "type", "director", "budget", "location", "duration", "year"]
        );
        assert_eq!(errors.message_for("title"), Some("Title is required"));
    }

    #[test]
    fn rejects_non_positive_budget() {
        for bad in [json!(0), json!(-5), json!("0"), json!("lots"), json!(true)] {
            let mut input = valid();
            input["budget"] = bad.clone();
            let errors = validate_draft(&input).unwrap_err();
            assert_eq!(
                errors.message_for("budget"),
                Some("Budget must be a positive number"),
                "budget {bad}"
            );
        }
    }

    #[test]
    fn rejects_out_of_range_or_fractional_year() {
        let mut input = valid();
        input["year"] = json!(1879);
        let errors = validate_draft(&input).unwrap_err();
        assert_eq!(errors.message_for("year"), Some("Year must be 1880 or later"));

        input["year"] = json!(1999.5);
        let errors = validate_draft(&input).unwrap_err();
        assert_eq!(errors.message_for("year"), Some("Year must be a whole number"));

        input["year"] = json!(1880);
        assert!(validate_draft(&input).is_ok());
    }

    #[test]
    fn rejects_unknown_type() {
        let mut input = valid();
        input["type"] = json!("Documentary");
        let errors = validate_draft(&input).unwrap_err();
        assert_eq!(errors.message_for("type"), Some("Type must be one of: Movie, TvShow"));

        input["type"] = json!("movie");
        assert!(validate_draft(&input).is_err());
    }

    #[test]
    fn blank_strings_are_missing() {
        let mut input = valid();
        input["director"] = json!("   ");
        input["location"] = json!(42);
        let errors = validate_draft(&input).unwrap_err();
        assert_eq!(errors.message_for("director"), Some("Director is required"));
        assert_eq!(errors.message_for("location"), Some("Expected a string"));
        assert_eq!(errors.errors().len(), 2);
    }

    #[test]
    fn non_object_body_is_rejected() {
        let errors = validate(&json!([1, 2]), Mode::Partial).unwrap_err();
        assert_eq!(errors.message_for("body"), Some("Request body must be a JSON object"));
    }

    #[test]
    fn partial_mode_only_checks_present_fields() {
        let patch = validate_patch(&json!({ "budget": "250" })).unwrap();
        assert_eq!(patch, MoviePatch { budget: Some(250.0), ..Default::default() });

        let patch = validate_patch(&json!({})).unwrap();
        assert!(patch.is_empty());

        let errors = validate_patch(&json!({ "year": 1500, "title": "" })).unwrap_err();
        assert_eq!(errors.errors().len(), 2);
    }

    #[test]
    fn partial_mode_rejects_null() {
        let errors = validate_patch(&json!({ "title": null })).unwrap_err();
        assert_eq!(errors.message_for("title"), Some("Title is required"));
    }

    #[test]
    fn ignores_unknown_and_server_fields() {
        let mut input = valid();
        input["id"] = json!(99);
        input["createdAt"] = json!("2020-01-01T00:00:00Z");
        input["rating"] = json!(5);
        assert!(validate_draft(&input).is_ok());
    }

    #[test]
    fn display_joins_messages() {
        let errors = validate_patch(&json!({ "budget": -1, "year": 10 })).unwrap_err();
        assert_eq!(
            errors.to_string(),
            "budget: Budget must be a positive number; year: Year must be 1880 or later"
        );
    }
}
