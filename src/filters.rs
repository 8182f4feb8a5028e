//! Record-level predicate. Stages run in a fixed order and the first failing one rejects.
//! Question-only stages (views, answers, accepted answer, tags) are skipped for other types.

use crate::date::extract_year;
use crate::query::FilterConfig;
use crate::record::{Record, QUESTION};
use crate::tags::tag_set;

/// Pure, `Sync` predicate over one record; safe to share across threads.
#[derive(Clone, Debug, Default)]
pub struct RecordFilter {
    cfg: FilterConfig,
}

impl RecordFilter {
    pub fn new(cfg: FilterConfig) -> Self {
        Self { cfg: cfg.normalize() }
    }

    pub fn allow_all() -> Self {
        Self::new(FilterConfig::allow_all())
    }

    pub fn config(&self) -> &FilterConfig {
        &self.cfg
    }

    pub fn accept(&self, rec: &Record) -> bool {
        matches_record(rec, &self.cfg)
    }
}

pub fn matches_record(rec: &Record, q: &FilterConfig) -> bool {
    let post_type = rec.post_type();
    if !q.post_types.admits(post_type) {
        return false;
    }

    let score = rec.int_or_zero("Score");
    if let Some(lo) = q.min_score {
        if score < lo { return false; }
    }
    if let Some(hi) = q.max_score {
        if score > hi { return false; }
    }

    if post_type == QUESTION && !matches_question(rec, q) {
        return false;
    }

    matches_year(rec, q)
}

fn matches_question(rec: &Record, q: &FilterConfig) -> bool {
    if let Some(min_views) = q.min_views {
        if rec.int_or_zero("ViewCount") < min_views { return false; }
    }
    if let Some(min_answers) = q.min_answers {
        if rec.int_or_zero("AnswerCount") < min_answers { return false; }
    }
    if !q.accepted_answer.admits(rec.contains_key("AcceptedAnswerId")) {
        return false;
    }

    if q.has_tag_constraint() {
        let tags = tag_set(rec.get_or("Tags", ""));
        if !q.tags_include.is_empty() && !tags.iter().any(|t| q.tags_include.contains(t)) {
            return false;
        }
        if tags.iter().any(|t| q.tags_exclude.contains(t)) {
            return false;
        }
    }
    true
}

/// Year gate; a record without `CreationDate` passes.
pub fn matches_year(rec: &Record, q: &FilterConfig) -> bool {
    if !q.has_year_constraint() {
        return true;
    }
    let created = rec.get_or("CreationDate", "");
    if created.is_empty() {
        return true;
    }
    let year = extract_year(created);

    if !q.specific_years.is_empty() && !q.specific_years.contains(&year) {
        return false;
    }
    if let Some(lo) = q.min_year {
        if year < lo { return false; }
    }
    if let Some(hi) = q.max_year {
        if year > hi { return false; }
    }
    true
}
