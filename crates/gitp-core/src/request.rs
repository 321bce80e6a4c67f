// SPDX-License-Identifier: Apache-2.0

//! Issue and pull request list requests.
//!
//! A list request is built once from loose filter criteria and is immutable
//! afterwards. Validation accumulates every problem instead of stopping at
//! the first one, so the user sees all bad keys and values at once.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

/// Filter key selecting issues, pull requests or both.
pub const OBJ_EQ: &str = "obj__eq";
/// Filter key selecting the issue state.
pub const STATE_EQ: &str = "state__eq";
/// Filter key matching a title substring.
pub const TITLE_CONTAINS: &str = "title__contains";

const ACCEPTED_FILTERS: &[&str] = &[OBJ_EQ, STATE_EQ, TITLE_CONTAINS];

/// Validated filters, keyed by filter name.
pub type Filters = BTreeMap<String, String>;

/// Object kind accepted by the `obj__eq` filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// Plain issues only.
    Issue,
    /// Pull requests only.
    PullRequest,
    /// Issues and pull requests.
    All,
}

impl ObjectKind {
    /// Filter value for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Issue => "issue",
            ObjectKind::PullRequest => "pull request",
            ObjectKind::All => "all",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "issue" => Ok(ObjectKind::Issue),
            "pull request" => Ok(ObjectKind::PullRequest),
            "all" => Ok(ObjectKind::All),
            other => Err(format!("Value {other} for key '{OBJ_EQ}' cannot be used.")),
        }
    }
}

/// Issue state accepted by the `state__eq` filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueState {
    /// Open and closed.
    All,
    /// Open only.
    Open,
    /// Closed only.
    Closed,
}

impl IssueState {
    /// Filter value for this state.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueState::All => "all",
            IssueState::Open => "open",
            IssueState::Closed => "closed",
        }
    }
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(IssueState::All),
            "open" => Ok(IssueState::Open),
            "closed" => Ok(IssueState::Closed),
            other => Err(format!(
                "Value {other} for key '{STATE_EQ}' cannot be used."
            )),
        }
    }
}

/// A well-formed list request.
///
/// `filters` is `None` when the caller asked for everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidRequest {
    filters: Option<Filters>,
}

impl ValidRequest {
    /// Raw filters, if any.
    #[must_use]
    pub fn filters(&self) -> Option<&Filters> {
        self.filters.as_ref()
    }

    /// Requested object kind (`obj__eq`).
    #[must_use]
    pub fn object_kind(&self) -> Option<ObjectKind> {
        self.get(OBJ_EQ).and_then(|v| v.parse().ok())
    }

    /// Requested state (`state__eq`).
    #[must_use]
    pub fn state(&self) -> Option<IssueState> {
        self.get(STATE_EQ).and_then(|v| v.parse().ok())
    }

    /// Requested title substring (`title__contains`).
    #[must_use]
    pub fn title_contains(&self) -> Option<&str> {
        self.get(TITLE_CONTAINS)
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.filters
            .as_ref()
            .and_then(|f| f.get(key))
            .map(String::as_str)
    }
}

/// One validation problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestError {
    /// Offending parameter name.
    pub parameter: String,
    /// What is wrong with it.
    pub message: String,
}

/// A request that failed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidRequest {
    errors: Vec<RequestError>,
}

impl InvalidRequest {
    fn add_error(&mut self, parameter: &str, message: String) {
        self.errors.push(RequestError {
            parameter: parameter.to_string(),
            message,
        });
    }

    /// Whether any error was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Accumulated errors, in the order they were found.
    #[must_use]
    pub fn errors(&self) -> &[RequestError] {
        &self.errors
    }
}

/// Either a valid query or the reasons it is not one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueListRequest {
    /// Well-formed request.
    Valid(ValidRequest),
    /// Request with field-level errors.
    Invalid(InvalidRequest),
}

impl IssueListRequest {
    /// Request matching one object kind in one state whose title contains `title`.
    #[must_use]
    pub fn matching(kind: ObjectKind, state: IssueState, title: &str) -> Self {
        let filters = Filters::from([
            (OBJ_EQ.to_string(), kind.as_str().to_string()),
            (STATE_EQ.to_string(), state.as_str().to_string()),
            (TITLE_CONTAINS.to_string(), title.to_string()),
        ]);
        Self::from_filters(filters)
    }

    /// Validates an already typed filter map.
    #[must_use]
    pub fn from_filters(filters: Filters) -> Self {
        let value = Value::Object(
            filters
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect(),
        );
        build_list_request(Some(&value))
    }

    /// Whether the request passed validation.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, IssueListRequest::Valid(_))
    }

    /// The valid request, if this is one.
    #[must_use]
    pub fn as_valid(&self) -> Option<&ValidRequest> {
        match self {
            IssueListRequest::Valid(valid) => Some(valid),
            IssueListRequest::Invalid(_) => None,
        }
    }

    /// The invalid request, if this is one.
    #[must_use]
    pub fn as_invalid(&self) -> Option<&InvalidRequest> {
        match self {
            IssueListRequest::Valid(_) => None,
            IssueListRequest::Invalid(invalid) => Some(invalid),
        }
    }
}

/// Builds a list request from loose filter criteria.
///
/// `None` (or JSON `null`) means "no filtering". Anything that is not a
/// key-value mapping is rejected as not iterable. Keys are checked in sorted
/// order and every problem is recorded.
#[must_use]
pub fn build_list_request(filters: Option<&Value>) -> IssueListRequest {
    let mut invalid = InvalidRequest::default();

    let entries = match filters {
        None | Some(Value::Null) => {
            return IssueListRequest::Valid(ValidRequest { filters: None });
        }
        Some(Value::Object(map)) => map.iter().collect::<BTreeMap<_, _>>(),
        Some(_) => {
            invalid.add_error("filters", "Is not iterable".to_string());
            return IssueListRequest::Invalid(invalid);
        }
    };

    let mut valid_filters = Filters::new();
    for (key, value) in entries {
        if !ACCEPTED_FILTERS.contains(&key.as_str()) {
            invalid.add_error("filters", format!("Key {key} cannot be used."));
            continue;
        }

        let Some(text) = value.as_str() else {
            invalid.add_error(
                "filters",
                format!("Value {value} for key '{key}' cannot be used."),
            );
            continue;
        };

        let checked = match key.as_str() {
            OBJ_EQ => text.parse::<ObjectKind>().map(|_| ()),
            STATE_EQ => text.parse::<IssueState>().map(|_| ()),
            _ => Ok(()),
        };
        match checked {
            Ok(()) => {
                valid_filters.insert(key.clone(), text.to_string());
            }
            Err(message) => invalid.add_error("filters", message),
        }
    }

    if invalid.has_errors() {
        IssueListRequest::Invalid(invalid)
    } else {
        IssueListRequest::Valid(ValidRequest {
            filters: Some(valid_filters),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_filters_is_valid_without_filters() {
        let request = build_list_request(None);
        assert!(request.is_valid());
        assert!(request.as_valid().unwrap().filters().is_none());

        let request = build_list_request(Some(&Value::Null));
        assert!(request.as_valid().unwrap().filters().is_none());
    }

    #[test]
    fn test_empty_mapping_is_valid() {
        let request = build_list_request(Some(&json!({})));
        assert_eq!(
            request.as_valid().unwrap().filters(),
            Some(&Filters::new())
        );
    }

    #[test]
    fn test_not_a_mapping_is_not_iterable() {
        for value in [json!(5), json!("obj__eq"), json!(["a", "b"])] {
            let request = build_list_request(Some(&value));
            let invalid = request.as_invalid().expect("should be invalid");
            assert_eq!(
                invalid.errors(),
                &[RequestError {
                    parameter: "filters".to_string(),
                    message: "Is not iterable".to_string(),
                }]
            );
        }
    }

    #[test]
    fn test_every_accepted_object_state_pair_is_valid() {
        for obj in ["issue", "pull request", "all"] {
            for state in ["all", "open", "closed"] {
                let input = json!({ "obj__eq": obj, "state__eq": state });
                let request = build_list_request(Some(&input));
                let valid = request.as_valid().expect("pair should be valid");

                let expected = Filters::from([
                    (OBJ_EQ.to_string(), obj.to_string()),
                    (STATE_EQ.to_string(), state.to_string()),
                ]);
                assert_eq!(valid.filters(), Some(&expected));
            }
        }
    }

    #[test]
    fn test_unknown_key_is_reported_even_with_valid_keys() {
        let input = json!({
            "obj__eq": "issue",
            "state__eq": "open",
            "title__contains": "bug",
            "author__eq": "octocat",
        });
        let request = build_list_request(Some(&input));
        let invalid = request.as_invalid().expect("should be invalid");

        assert_eq!(invalid.errors().len(), 1);
        assert_eq!(invalid.errors()[0].message, "Key author__eq cannot be used.");
    }

    #[test]
    fn test_errors_accumulate() {
        let input = json!({
            "obj__eq": "commit",
            "state__eq": "merged",
            "labels": "bug",
        });
        let request = build_list_request(Some(&input));
        let messages: Vec<_> = request
            .as_invalid()
            .unwrap()
            .errors()
            .iter()
            .map(|e| e.message.as_str())
            .collect();

        assert_eq!(
            messages,
            vec![
                "Key labels cannot be used.",
                "Value commit for key 'obj__eq' cannot be used.",
                "Value merged for key 'state__eq' cannot be used.",
            ]
        );
    }

    #[test]
    fn test_non_string_value_is_rejected() {
        let request = build_list_request(Some(&json!({ "title__contains": 3 })));
        let invalid = request.as_invalid().unwrap();
        assert_eq!(
            invalid.errors()[0].message,
            "Value 3 for key 'title__contains' cannot be used."
        );
    }

    #[test]
    fn test_title_contains_accepts_any_string() {
        let request = build_list_request(Some(&json!({ "title__contains": "" })));
        assert!(request.is_valid());
    }

    #[test]
    fn test_validation_is_idempotent() {
        let input = json!({ "obj__eq": "issue", "wrong": "x" });
        assert_eq!(
            build_list_request(Some(&input)),
            build_list_request(Some(&input))
        );
    }

    #[test]
    fn test_matching_builds_typed_accessors() {
        let request = IssueListRequest::matching(ObjectKind::Issue, IssueState::Open, "bug");
        let valid = request.as_valid().unwrap();
        assert_eq!(valid.object_kind(), Some(ObjectKind::Issue));
        assert_eq!(valid.state(), Some(IssueState::Open));
        assert_eq!(valid.title_contains(), Some("bug"));
    }

    #[test]
    fn test_object_kind_round_trips_filter_value() {
        assert_eq!("pull request".parse::<ObjectKind>(), Ok(ObjectKind::PullRequest));
        assert_eq!(ObjectKind::PullRequest.to_string(), "pull request");
        assert!("pr".parse::<ObjectKind>().is_err());
    }
}
