//! Calendar Registry

use crate::{CalendarConverter, CalendarDateTime, CalendarMeta, CalendarRef, CalendarSystem};
use kalends_core::{CalendarError, IsoTime, IxdtfRecord};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Calendar descriptors by identifier and alias
pub struct CalendarRegistry {
    calendars: HashMap<String, CalendarRef>,
    aliases: HashMap<String, String>,
}

impl CalendarRegistry {
    pub fn new() -> Self {
        Self {
            calendars: HashMap::new(),
            aliases: HashMap::new(),
        }
    }

    pub fn with_calendar<C: CalendarSystem + 'static>(mut self, c: C) -> Self {
        let meta = c.meta();
        let id = meta.id.to_lowercase();
        for alias in meta.aliases {
            self.aliases.insert(alias.to_lowercase(), id.clone());
        }
        self.calendars.insert(id, Arc::new(c));
        self
    }

    /// Canonical identifier for an id or alias
    pub fn canonical_id(&self, name: &str) -> Option<&str> {
        let key = name.trim().to_lowercase();
        if let Some((id, _)) = self.calendars.get_key_value(&key) {
            return Some(id.as_str());
        }
        self.aliases.get(&key).map(|id| id.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.canonical_id(name).is_some()
    }

    /// Look up a calendar by id or alias
    pub fn get(&self, name: &str) -> Result<CalendarRef, CalendarError> {
        let found = self
            .canonical_id(name)
            .and_then(|id| self.calendars.get(id))
            .cloned();
        match found {
            Some(calendar) => {
                debug!(name, calendar = calendar.meta().id, "calendar lookup");
                Ok(calendar)
            }
            None => {
                let similar = self.find_similar_calendars(name);
                let mut message = format!("unknown calendar '{}'", name);
                if !similar.is_empty() {
                    let suggestions: Vec<&str> = similar.iter().take(3).map(|s| s.as_str()).collect();
                    message.push_str(&format!("; similar: {}", suggestions.join(", ")));
                }
                Err(CalendarError::unsupported(message))
            }
        }
    }

    /// Canonical identifiers, sorted
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.calendars.keys().map(|k| k.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    /// Metadata of every calendar, sorted by id
    pub fn list(&self) -> Vec<CalendarMeta> {
        let mut metas: Vec<CalendarMeta> = self.calendars.values().map(|c| c.meta()).collect();
        metas.sort_by_key(|m| m.id);
        metas
    }

    /// Parse an IXDTF string into a calendar date
    ///
    /// The calendar is `expected` if given, else the `[u-ca=...]` annotation,
    /// else ISO. When both are present they must name the same calendar.
    /// A string without a time part is read as midnight.
    pub fn parse(&self, s: &str, expected: Option<&str>) -> Result<CalendarDateTime, CalendarError> {
        let record = IxdtfRecord::parse(s)?;
        let calendar = match (expected, record.calendar.as_deref()) {
            (Some(wanted), Some(found)) => {
                let wanted_cal = self.get(wanted)?;
                let found_cal = self.get(found)?;
                let (wanted_id, found_id) = (wanted_cal.meta().id, found_cal.meta().id);
                if wanted_id != found_id {
                    return Err(CalendarError::MismatchedCalendar {
                        expected: wanted_id.to_string(),
                        found: found_id.to_string(),
                    });
                }
                wanted_cal
            }
            (Some(name), None) | (None, Some(name)) => self.get(name)?,
            (None, None) => self.get("iso")?,
        };
        let iso = kalends_core::IsoDateTime::new(record.date, record.time.unwrap_or(IsoTime::midnight()));
        CalendarConverter::to_calendar(&iso, &calendar)
    }

    /// Calendars with an id or alias close to `name`, closest first
    ///
    /// A calendar found through one of its aliases is reported as
    /// `id (alias spelling)`.
    fn find_similar_calendars(&self, name: &str) -> Vec<String> {
        let query = name.trim().to_lowercase();
        let spellings = self
            .calendars
            .keys()
            .map(|id| (id.as_str(), id.as_str()))
            .chain(self.aliases.iter().map(|(alias, id)| (alias.as_str(), id.as_str())));

        // Closest spelling of each calendar; ids come first so they win ties
        let mut closest: HashMap<&str, (usize, &str)> = HashMap::new();
        for (spelling, id) in spellings {
            let Some(distance) = Self::suggestion_distance(&query, spelling) else {
                continue;
            };
            closest
                .entry(id)
                .and_modify(|best| {
                    if distance < best.0 {
                        *best = (distance, spelling);
                    }
                })
                .or_insert((distance, spelling));
        }

        let mut matches: Vec<(&str, usize, &str)> = closest
            .into_iter()
            .map(|(id, (distance, spelling))| (id, distance, spelling))
            .collect();
        matches.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        matches
            .into_iter()
            .map(|(id, _, spelling)| {
                if spelling == id {
                    id.to_string()
                } else {
                    format!("{} (alias {})", id, spelling)
                }
            })
            .collect()
    }

    /// Edit distance from `query` to `candidate`, or `None` when too far
    /// apart to be a typo
    ///
    /// One being a prefix of the other always counts, at the cost of the
    /// missing characters.
    fn suggestion_distance(query: &str, candidate: &str) -> Option<usize> {
        let query: Vec<char> = query.chars().collect();
        let candidate: Vec<char> = candidate.chars().collect();
        if candidate.starts_with(&query) || query.starts_with(&candidate) {
            return Some(query.len().abs_diff(candidate.len()));
        }

        // Levenshtein, one row at a time
        let mut row: Vec<usize> = (0..=candidate.len()).collect();
        for (i, q) in query.iter().enumerate() {
            let mut diagonal = row[0];
            row[0] = i + 1;
            for (j, c) in candidate.iter().enumerate() {
                let substitute = diagonal + usize::from(q != c);
                diagonal = row[j + 1];
                row[j + 1] = substitute.min(row[j] + 1).min(diagonal + 1);
            }
        }
        let distance = row[candidate.len()];

        let allowed = (candidate.len() / 3).max(2);
        (distance <= allowed).then_some(distance)
    }
}

impl Default for CalendarRegistry {
    fn default() -> Self {
        Self::new()
    }
}
