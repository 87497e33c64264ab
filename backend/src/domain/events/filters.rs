//! Listing filters shared by the list and count use-cases.

use chrono::{DateTime, Utc};
use pagination::PageWindow;

use super::Event;

/// Sport filter value meaning "every sport".
pub const ALL_SPORTS: &str = "all";

/// Filters applied to an owner's events.
///
/// `date_from` and `date_to` are inclusive. `page` is ignored by counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilters {
    /// Case-insensitive substring of the event name.
    pub search: Option<String>,
    /// Exact canonical sport id.
    pub sport_type: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub page: Option<PageWindow>,
}

impl EventFilters {
    /// Drop blank search terms and the `all` sport sentinel.
    ///
    /// # Examples
    /// ```
    /// use matchday::domain::EventFilters;
    ///
    /// let filters = EventFilters {
    ///     search: Some("  ".to_owned()),
    ///     sport_type: Some("all".to_owned()),
    ///     ..EventFilters::default()
    /// }
    /// .normalised();
    /// assert_eq!(filters, EventFilters::default());
    /// ```
    #[must_use]
    pub fn normalised(mut self) -> Self {
        self.search = self
            .search
            .map(|term| term.trim().to_owned())
            .filter(|term| !term.is_empty());
        self.sport_type = self
            .sport_type
            .map(|sport| sport.trim().to_owned())
            .filter(|sport| !sport.is_empty() && !sport.eq_ignore_ascii_case(ALL_SPORTS));
        self
    }

    /// Whether `event` satisfies every filter except pagination.
    pub fn matches(&self, event: &Event) -> bool {
        let search_ok = self.search.as_ref().is_none_or(|term| {
            event
                .name
                .to_lowercase()
                .contains(term.to_lowercase().as_str())
        });
        let sport_ok = self
            .sport_type
            .as_ref()
            .is_none_or(|sport| event.sport_type == *sport);
        let from_ok = self.date_from.is_none_or(|from| event.date_time >= from);
        let to_ok = self.date_to.is_none_or(|to| event.date_time <= to);
        search_ok && sport_ok && from_ok && to_ok
    }
}
