#![allow(dead_code)]

use se_extract::Record;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Render one self-closing `<row/>` with already-escaped attribute values.
pub fn row(attrs: &[(&str, &str)]) -> String {
    let mut s = String::from("  <row");
    for (k, v) in attrs {
        s.push_str(&format!(" {}=\"{}\"", k, v));
    }
    s.push_str(" />");
    s
}

/// Wrap rows in a `<posts>` document the way the dumps are laid out.
pub fn dump_xml(rows: &[String]) -> String {
    let mut s = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<posts>\n");
    for r in rows {
        s.push_str(r);
        s.push('\n');
    }
    s.push_str("</posts>\n");
    s
}

pub fn write_file(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut f = File::create(path).unwrap();
    f.write_all(contents.as_bytes()).unwrap();
}

/// Write `contents` zstd-compressed at `path`.
pub fn write_zst(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let f = File::create(path).unwrap();
    let mut enc = zstd::stream::write::Encoder::new(f, 3).unwrap();
    enc.write_all(contents.as_bytes()).unwrap();
    enc.finish().unwrap();
}

pub fn rec(pairs: &[(&str, &str)]) -> Record {
    Record::from_pairs(pairs.iter().copied())
}

/// The five-record scenario: types [1,2,1,1,2], scores [10,1,-3,7,2].
pub fn five_rows() -> Vec<String> {
    vec![
        row(&[("Id", "1"), ("PostTypeId", "1"), ("Score", "10"), ("CreationDate", "2016-03-01T00:00:00.000"), ("Title", "First"), ("Tags", "&lt;algebra&gt;&lt;geometry&gt;")]),
        row(&[("Id", "2"), ("PostTypeId", "2"), ("Score", "1"), ("ParentId", "1")]),
        row(&[("Id", "3"), ("PostTypeId", "1"), ("Score", "-3"), ("Title", "Third")]),
        row(&[("Id", "4"), ("PostTypeId", "1"), ("Score", "7"), ("Title", "Fourth")]),
        row(&[("Id", "5"), ("PostTypeId", "2"), ("Score", "2"), ("ParentId", "4")]),
    ]
}

/// A small, realistic math.stackexchange-like dump with HTML bodies and tags.
///
/// | Id | type | score | views | answers | accepted | year | tags                 |
/// |----|------|-------|-------|---------|----------|------|----------------------|
/// | 1  | Q    | 12    | 1500  | 3       | yes      | 2012 | calculus, limits     |
/// | 2  | A    | 8     |       |         |          | 2012 |                      |
/// | 3  | Q    | 2     | 90    | 0       | no       | 2015 | algebra, homework    |
/// | 4  | Q    | 25    | 4000  | 5       | yes      | 2019 | geometry             |
/// | 5  | A    | -1    |       |         |          | 2019 |                      |
/// | 6  | Q    | 5     | 700   | 1       | no       | 2021 | algebra              |
pub fn math_rows() -> Vec<String> {
    vec![
        row(&[
            ("Id", "1"), ("PostTypeId", "1"), ("AcceptedAnswerId", "2"),
            ("CreationDate", "2012-01-05T10:00:00.000"), ("Score", "12"), ("ViewCount", "1500"),
            ("Body", "&lt;p&gt;How do I compute\n   this   limit?&lt;/p&gt;\n"),
            ("Title", "  Limit of   a sequence "), ("Tags", "&lt;calculus&gt;&lt;limits&gt;"),
            ("AnswerCount", "3"),
        ]),
        row(&[
            ("Id", "2"), ("PostTypeId", "2"), ("ParentId", "1"),
            ("CreationDate", "2012-01-05T11:00:00.000"), ("Score", "8"),
            ("Body", "&lt;p&gt;Use L'Hôpital.&lt;/p&gt;"),
        ]),
        row(&[
            ("Id", "3"), ("PostTypeId", "1"),
            ("CreationDate", "2015-06-01T08:30:00.000"), ("Score", "2"), ("ViewCount", "90"),
            ("Body", "&lt;p&gt;Solve x+1=2&lt;/p&gt;"), ("Title", "Simple equation"),
            ("Tags", "&lt;algebra&gt;&lt;homework&gt;"), ("AnswerCount", "0"),
        ]),
        row(&[
            ("Id", "4"), ("PostTypeId", "1"), ("AcceptedAnswerId", "5"),
            ("CreationDate", "2019-09-09T09:09:09.000"), ("Score", "25"), ("ViewCount", "4000"),
            ("Body", "&lt;p&gt;Angles &amp;amp; triangles&lt;/p&gt;"), ("Title", "Triangle angles"),
            ("Tags", "&lt;geometry&gt;"), ("AnswerCount", "5"),
        ]),
        row(&[
            ("Id", "5"), ("PostTypeId", "2"), ("ParentId", "4"),
            ("CreationDate", "2019-09-10T09:09:09.000"), ("Score", "-1"),
            ("Body", "&lt;p&gt;180 degrees&lt;/p&gt;"),
        ]),
        row(&[
            ("Id", "6"), ("PostTypeId", "1"),
            ("CreationDate", "2021-02-02T02:02:02.000"), ("Score", "5"), ("ViewCount", "700"),
            ("Body", "&lt;p&gt;Groups&lt;/p&gt;"), ("Title", "Group theory"),
            ("Tags", "&lt;algebra&gt;"), ("AnswerCount", "1"),
        ]),
    ]
}

/// Write the math dump into a fresh temp dir and return (dir guard, path).
pub fn make_math_dump() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Posts.xml");
    write_file(&path, &dump_xml(&math_rows()));
    (dir, path)
}

pub fn read_to_string(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

pub fn ids(records: &[Record]) -> Vec<String> {
    records.iter().map(|r| r.get_or("Id", "?").to_string()).collect()
}
