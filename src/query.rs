//! Filter configuration (the record-level query) and its eager validation.

use crate::date::{current_year, is_sane_year, EARLIEST_DUMP_YEAR};
use crate::error::{ExtractError, Result};
use crate::record::{ANSWER, QUESTION};
use ahash::AHashSet;

/// Tri-state constraint on the presence of `AcceptedAnswerId` (questions only).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AcceptedAnswer {
    Required,
    Forbidden,
    #[default]
    Any,
}

impl AcceptedAnswer {
    pub fn from_flags(has_accepted: bool, no_accepted: bool) -> Self {
        match (has_accepted, no_accepted) {
            (true, _) => Self::Required,
            (false, true) => Self::Forbidden,
            _ => Self::Any,
        }
    }

    #[inline]
    pub fn admits(self, has_accepted: bool) -> bool {
        match self {
            Self::Required => has_accepted,
            Self::Forbidden => !has_accepted,
            Self::Any => true,
        }
    }
}

/// Allowed `PostTypeId` values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PostTypes {
    /// No post-type gate at all.
    Any,
    Only(Vec<String>),
}

impl PostTypes {
    pub fn questions() -> Self {
        Self::Only(vec![QUESTION.to_string()])
    }

    pub fn answers() -> Self {
        Self::Only(vec![ANSWER.to_string()])
    }

    pub fn of<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut v: Vec<String> = ids.into_iter().map(|s| s.as_ref().trim().to_string()).collect();
        v.sort();
        v.dedup();
        Self::Only(v)
    }

    #[inline]
    pub fn admits(&self, post_type: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Only(ids) => ids.iter().any(|id| id == post_type),
        }
    }
}

impl Default for PostTypes {
    /// Questions and answers.
    fn default() -> Self {
        Self::of([QUESTION, ANSWER])
    }
}

/// Immutable bundle of optional constraints, built once per run.
/// Tag lists are stored trimmed; empty sets mean "no constraint".
#[derive(Clone, Debug, Default)]
pub struct FilterConfig {
    pub post_types: PostTypes,
    pub min_score: Option<i64>,
    pub max_score: Option<i64>,
    pub min_views: Option<i64>,
    pub min_answers: Option<i64>,
    pub accepted_answer: AcceptedAnswer,
    pub tags_include: AHashSet<String>,
    pub tags_exclude: AHashSet<String>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub specific_years: AHashSet<i32>,
}

impl FilterConfig {
    /// Accept every record regardless of type or content.
    pub fn allow_all() -> Self {
        Self { post_types: PostTypes::Any, ..Default::default() }
    }

    /// Trim tag names and drop empty entries (e.g. from `"a,,b"`).
    pub fn normalize(mut self) -> Self {
        let clean = |set: &mut AHashSet<String>| {
            let cleaned: AHashSet<String> = set
                .drain()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            *set = cleaned;
        };
        clean(&mut self.tags_include);
        clean(&mut self.tags_exclude);
        self
    }

    pub fn has_year_constraint(&self) -> bool {
        self.min_year.is_some() || self.max_year.is_some() || !self.specific_years.is_empty()
    }

    pub fn has_tag_constraint(&self) -> bool {
        !self.tags_include.is_empty() || !self.tags_exclude.is_empty()
    }

    /// Reject contradictory or out-of-range settings before extraction starts.
    pub fn validate(&self) -> Result<()> {
        if let PostTypes::Only(ids) = &self.post_types {
            if ids.is_empty() {
                return Err(ExtractError::invalid("post type set must not be empty"));
            }
        }
        if let (Some(lo), Some(hi)) = (self.min_score, self.max_score) {
            if lo > hi {
                return Err(ExtractError::invalid(format!(
                    "min score ({lo}) cannot be greater than max score ({hi})"
                )));
            }
        }
        for (name, year) in [("min year", self.min_year), ("max year", self.max_year)] {
            if let Some(y) = year {
                if !is_sane_year(y) {
                    return Err(ExtractError::invalid(format!(
                        "{name} must be between {EARLIEST_DUMP_YEAR} and {}, got {y}",
                        current_year()
                    )));
                }
            }
        }
        if let (Some(lo), Some(hi)) = (self.min_year, self.max_year) {
            if lo > hi {
                return Err(ExtractError::invalid(format!(
                    "min year ({lo}) cannot be greater than max year ({hi})"
                )));
            }
        }
        if !self.specific_years.is_empty() && (self.min_year.is_some() || self.max_year.is_some()) {
            return Err(ExtractError::invalid(
                "an explicit year list cannot be combined with min/max year",
            ));
        }
        Ok(())
    }
}
