//! Common assertion helpers for CLI output

#![allow(dead_code)]

use predicates::prelude::*;

pub fn not_in_repository() -> impl Predicate<str> {
    predicates::str::contains("Not in a repository")
}

pub fn has_file_index(index: u32) -> impl Predicate<str> {
    predicates::str::contains(format!("[{}]", index))
}

pub fn has_section(title: &str) -> impl Predicate<str> {
    predicates::str::contains(format!("{}:", title))
}

pub fn on_branch(name: &str) -> impl Predicate<str> {
    predicates::str::contains(format!("On branch {}", name))
}

pub fn is_clean() -> impl Predicate<str> {
    predicates::str::contains("Clean")
}
