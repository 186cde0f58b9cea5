use crate::model::LogStructure;
use crate::parse::normalize::normalize_level;
use std::collections::HashSet;

/// Fields of one pipe-delimited line, borrowed from the raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine<'a> {
    pub date: &'a str,
    pub level: String,
    pub user: &'a str,
    pub reqid: &'a str,
    pub message: &'a str,
}

impl<'a> LogLine<'a> {
    /// `None` when the line does not reach every referenced column or has no user.
    pub fn parse(line: &'a str, structure: &LogStructure) -> Option<Self> {
        let tokens: Vec<&str> = line.split('|').collect();
        if tokens.len() <= structure.max_index() {
            return None;
        }

        let user = tokens[structure.user].trim();
        if user.is_empty() {
            return None;
        }

        Some(LogLine {
            date: tokens[structure.date].trim(),
            level: normalize_level(tokens[structure.level]),
            user,
            reqid: tokens[structure.reqid].trim(),
            message: tokens.get(structure.message).map_or("", |m| m.trim()),
        })
    }
}

/// Remembers `(reqid, level, user)` tuples so a re-emitted event is counted once.
#[derive(Debug, Default)]
pub struct DedupSet {
    seen: HashSet<(String, String, String)>,
}

impl DedupSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// True only the first time this event is seen.
    pub fn first_occurrence(&mut self, line: &LogLine<'_>) -> bool {
        self.seen.insert((
            line.reqid.to_string(),
            line.level.clone(),
            line.user.to_string(),
        ))
    }
}
