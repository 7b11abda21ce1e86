//! Common assertion helpers for test output validation
//!
//! Provides predicates for validating heady command output and error messages.

#![allow(dead_code)]

use predicates::prelude::*;

/// Creates a predicate that checks for git repository error messages
pub fn not_in_git_repo() -> impl Predicate<str> {
    predicates::str::contains("Not in a git repository")
}

/// Creates a predicate that checks for the trunk guard
pub fn in_trunk_error(action: &str) -> impl Predicate<str> {
    predicates::str::contains(format!("Can not {action}"))
        .and(predicates::str::contains("because it is in trunk"))
}

/// Creates a predicate that checks for a tree line showing `sha`
pub fn shows_commit(sha: &str) -> impl Predicate<str> {
    predicates::str::contains(sha[..8].to_string())
}
