//! Stateless filter primitives shared by the list screens.
//!
//! Filters are re-run over the full sequence on every change; there is no
//! index to keep in sync.

use chrono::NaiveDate;

/// Case-insensitive substring query. An empty query matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextQuery {
    needle: String,
}

impl TextQuery {
    pub fn new(query: impl AsRef<str>) -> Self {
        Self {
            needle: query.as_ref().trim().to_lowercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn matches(&self, haystack: &str) -> bool {
        self.is_empty() || haystack.to_lowercase().contains(&self.needle)
    }

    /// True when any of the given fields contains the query.
    pub fn matches_any<'a>(&self, fields: impl IntoIterator<Item = &'a str>) -> bool {
        if self.is_empty() {
            return true;
        }
        fields.into_iter().any(|f| self.matches(f))
    }
}

/// Inclusive date range; either bound may be open.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Build from the raw `YYYY-MM-DD` text of the two date pickers.
    /// Blank or unparseable text leaves that bound open.
    pub fn from_inputs(start: &str, end: &str) -> Self {
        Self {
            start: parse_date(start),
            end: parse_date(end),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
    }
}

/// Parse a `YYYY-MM-DD` date, ignoring surrounding whitespace.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn query_is_case_insensitive() {
        let q = TextQuery::new("XYZ");
        assert!(q.matches("客户xyz付款"));
        assert!(!q.matches("客户付款"));
    }

    #[test]
    fn empty_query_matches_everything() {
        let q = TextQuery::new("   ");
        assert!(q.is_empty());
        assert!(q.matches(""));
        assert!(q.matches_any(["a", "b"]));
    }

    #[test]
    fn matches_any_checks_every_field() {
        let q = TextQuery::new("固定");
        assert!(q.matches_any(["1001", "固定资产"]));
        assert!(!q.matches_any(["1002", "银行存款"]));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let range = DateRange::from_inputs("2023-04-10", "2023-04-20");
        assert!(range.contains(date("2023-04-10")));
        assert!(range.contains(date("2023-04-20")));
        assert!(!range.contains(date("2023-04-21")));
        assert!(!range.contains(date("2023-04-09")));
    }

    #[test]
    fn blank_inputs_leave_range_open() {
        let range = DateRange::from_inputs("", "not-a-date");
        assert!(range.is_unbounded());
        assert!(range.contains(date("1999-01-01")));
    }

    proptest! {
        #[test]
        fn any_substring_of_a_field_matches(s in "[a-zA-Z0-9]{1,16}", start in 0usize..16, len in 1usize..16) {
            let start = start.min(s.len() - 1);
            let end = (start + len).min(s.len());
            let q = TextQuery::new(s[start..end].to_uppercase());
            prop_assert!(q.matches(&s));
        }
    }
}
