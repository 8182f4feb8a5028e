#[path = "common/mod.rs"]
mod common;

use common::rec;
use se_extract::{extract_year, tag_set, AcceptedAnswer, FilterConfig, PostTypes, RecordFilter};
use std::collections::BTreeSet;

fn strings(v: &[&str]) -> ahash::AHashSet<String> {
    v.iter().map(|s| s.to_string()).collect()
}

/// Leading-year extraction never fails: four leading digits or 0.
#[test]
fn year_extraction_is_lenient() {
    assert_eq!(extract_year("2015-07-14T19:35:44.557"), 2015);
    assert_eq!(extract_year("1999"), 1999);
    assert_eq!(extract_year("20151-01-01"), 2015);
    assert_eq!(extract_year(""), 0);
    assert_eq!(extract_year("15-07-14"), 0);
    assert_eq!(extract_year(" 2015-07-14"), 0);
    assert_eq!(extract_year("yesterday"), 0);
}

#[test]
fn tag_set_strips_brackets() {
    let expected: BTreeSet<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
    assert_eq!(tag_set("<a><b><c>"), expected);
    assert!(tag_set("").is_empty());
    assert_eq!(tag_set("<c++><c#>").len(), 2);
}

/// Missing PostTypeId means question; the default filter admits 1 and 2 only.
#[test]
fn post_type_gate_and_default() {
    let f = RecordFilter::new(FilterConfig::default());
    assert!(f.accept(&rec(&[("Id", "1")])));
    assert!(f.accept(&rec(&[("PostTypeId", "2")])));
    assert!(!f.accept(&rec(&[("PostTypeId", "5")])));

    let any = RecordFilter::allow_all();
    assert!(any.accept(&rec(&[("PostTypeId", "5")])));

    let answers = RecordFilter::new(FilterConfig { post_types: PostTypes::answers(), ..Default::default() });
    assert!(!answers.accept(&rec(&[("Id", "1")])));
}

/// Score bounds are inclusive; malformed or missing scores count as 0.
#[test]
fn score_bounds_with_lenient_parsing() {
    let f = RecordFilter::new(FilterConfig { min_score: Some(0), max_score: Some(10), ..Default::default() });
    assert!(f.accept(&rec(&[("Score", "10")])));
    assert!(f.accept(&rec(&[("Score", "0")])));
    assert!(!f.accept(&rec(&[("Score", "11")])));
    assert!(!f.accept(&rec(&[("Score", "-1")])));
    assert!(f.accept(&rec(&[("Score", "not-a-number")])));
    assert!(f.accept(&rec(&[])));

    let strict = RecordFilter::new(FilterConfig { min_score: Some(1), ..Default::default() });
    assert!(!strict.accept(&rec(&[("Score", "garbage")])));
}

/// Views, answers, accepted answer and tags only constrain questions.
#[test]
fn question_only_stages_skip_answers() {
    let cfg = FilterConfig {
        min_views: Some(100),
        min_answers: Some(2),
        accepted_answer: AcceptedAnswer::Required,
        tags_include: strings(&["calculus"]),
        ..Default::default()
    };
    let f = RecordFilter::new(cfg);

    let answer = rec(&[("PostTypeId", "2"), ("Score", "3")]);
    assert!(f.accept(&answer));

    let good_q = rec(&[
        ("PostTypeId", "1"), ("ViewCount", "150"), ("AnswerCount", "2"),
        ("AcceptedAnswerId", "9"), ("Tags", "<calculus>"),
    ]);
    assert!(f.accept(&good_q));

    let few_views = rec(&[("PostTypeId", "1"), ("ViewCount", "99"), ("AnswerCount", "2"), ("AcceptedAnswerId", "9"), ("Tags", "<calculus>")]);
    assert!(!f.accept(&few_views));

    let no_accept = rec(&[("PostTypeId", "1"), ("ViewCount", "150"), ("AnswerCount", "2"), ("Tags", "<calculus>")]);
    assert!(!f.accept(&no_accept));
}

#[test]
fn accepted_answer_forbidden() {
    let f = RecordFilter::new(FilterConfig { accepted_answer: AcceptedAnswer::Forbidden, ..Default::default() });
    assert!(f.accept(&rec(&[("PostTypeId", "1")])));
    assert!(!f.accept(&rec(&[("PostTypeId", "1"), ("AcceptedAnswerId", "")])));
}

#[test]
fn tag_include_is_or_and_exclude_wins() {
    let q = rec(&[("PostTypeId", "1"), ("Tags", "<algebra><geometry>")]);

    let include = RecordFilter::new(FilterConfig { tags_include: strings(&["calculus", "algebra"]), ..Default::default() });
    assert!(include.accept(&q));

    let exclude = RecordFilter::new(FilterConfig { tags_exclude: strings(&["algebra"]), ..Default::default() });
    assert!(!exclude.accept(&q));

    let miss = RecordFilter::new(FilterConfig { tags_include: strings(&["topology"]), ..Default::default() });
    assert!(!miss.accept(&q));
    assert!(!miss.accept(&rec(&[("PostTypeId", "1")])));
}

/// Tag names in the config are trimmed; blank entries are ignored.
#[test]
fn tag_config_is_normalized() {
    let f = RecordFilter::new(FilterConfig { tags_include: strings(&[" algebra ", ""]), ..Default::default() });
    assert!(f.accept(&rec(&[("Tags", "<algebra>")])));
    assert_eq!(f.config().tags_include.len(), 1);
}

#[test]
fn year_range_and_specific_years() {
    let r = rec(&[("CreationDate", "2016-03-01T00:00:00.000")]);

    let range = RecordFilter::new(FilterConfig { min_year: Some(2015), max_year: Some(2018), ..Default::default() });
    assert!(range.accept(&r));

    let specific = RecordFilter::new(FilterConfig { specific_years: [2020].into_iter().collect(), ..Default::default() });
    assert!(!specific.accept(&r));

    // no date: the year stage is skipped
    assert!(specific.accept(&rec(&[("Id", "1")])));
    assert!(specific.accept(&rec(&[("CreationDate", "")])));

    // unparsable date reads as year 0
    let open_min = RecordFilter::new(FilterConfig { min_year: Some(2010), ..Default::default() });
    assert!(!open_min.accept(&rec(&[("CreationDate", "sometime")])));
}

/// Answers are still subject to score and year stages.
#[test]
fn answers_still_checked_for_score_and_year() {
    let f = RecordFilter::new(FilterConfig { min_score: Some(5), max_year: Some(2012), ..Default::default() });
    assert!(!f.accept(&rec(&[("PostTypeId", "2"), ("Score", "1"), ("CreationDate", "2011-01-01")])));
    assert!(!f.accept(&rec(&[("PostTypeId", "2"), ("Score", "9"), ("CreationDate", "2013-01-01")])));
    assert!(f.accept(&rec(&[("PostTypeId", "2"), ("Score", "9"), ("CreationDate", "2011-01-01")])));
}

/// Same inputs, same verdict; the filter holds no per-call state.
#[test]
fn accept_is_pure_and_shareable() {
    let f = RecordFilter::new(FilterConfig { min_score: Some(3), tags_exclude: strings(&["homework"]), ..Default::default() });
    let records = vec![
        rec(&[("Score", "4"), ("Tags", "<algebra>")]),
        rec(&[("Score", "4"), ("Tags", "<homework>")]),
        rec(&[("Score", "2")]),
    ];
    let first: Vec<bool> = records.iter().map(|r| f.accept(r)).collect();
    let second: Vec<bool> = records.iter().map(|r| f.accept(r)).collect();
    assert_eq!(first, vec![true, false, false]);
    assert_eq!(first, second);

    let shared = &f;
    let threaded: Vec<bool> = std::thread::scope(|s| {
        let handles: Vec<_> = records.iter().map(|r| s.spawn(move || shared.accept(r))).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(threaded, first);
}

#[test]
fn validation_rejects_contradictions() {
    let both = FilterConfig { specific_years: [2015].into_iter().collect(), min_year: Some(2012), ..Default::default() };
    assert!(both.validate().is_err());

    let inverted = FilterConfig { min_year: Some(2018), max_year: Some(2012), ..Default::default() };
    assert!(inverted.validate().is_err());

    let ancient = FilterConfig { min_year: Some(1990), ..Default::default() };
    assert!(ancient.validate().is_err());

    let future = FilterConfig { max_year: Some(se_extract::current_year() + 1), ..Default::default() };
    assert!(future.validate().is_err());

    let scores = FilterConfig { min_score: Some(5), max_score: Some(1), ..Default::default() };
    assert!(scores.validate().is_err());

    let empty_types = FilterConfig { post_types: PostTypes::Only(vec![]), ..Default::default() };
    assert!(empty_types.validate().is_err());

    let fine = FilterConfig { min_year: Some(2012), max_year: Some(2018), min_score: Some(0), ..Default::default() };
    assert!(fine.validate().is_ok());
}

/// Integers beyond the i64 range saturate instead of reading as 0.
#[test]
fn oversized_integers_saturate() {
    assert_eq!(rec(&[("Score", "99999999999999999999")]).int_or_zero("Score"), i64::MAX);
    assert_eq!(rec(&[("Score", "-99999999999999999999")]).int_or_zero("Score"), i64::MIN);
    assert_eq!(rec(&[("Score", " +42 ")]).int_or_zero("Score"), 42);
    assert_eq!(rec(&[("Score", "12abc")]).int_or_zero("Score"), 0);
    assert_eq!(rec(&[("Score", "-")]).int_or_zero("Score"), 0);

    let min = RecordFilter::new(FilterConfig { min_score: Some(1), ..Default::default() });
    assert!(min.accept(&rec(&[("Score", "99999999999999999999")])));
    let max = RecordFilter::new(FilterConfig { max_score: Some(0), ..Default::default() });
    assert!(max.accept(&rec(&[("Score", "-99999999999999999999")])));
    assert!(!max.accept(&rec(&[("Score", "99999999999999999999")])));
}
