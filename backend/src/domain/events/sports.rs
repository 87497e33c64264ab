//! Sport registry: the fixed sport set plus configured extras.
//!
//! Sport types are matched case-insensitively against either the id or the
//! display name and always stored as the canonical id.

use serde::Serialize;

/// Broad grouping used by clients to organise sport pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SportCategory {
    Team,
    Individual,
    Water,
    Combat,
    Other,
}

impl SportCategory {
    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Team => "team",
            Self::Individual => "individual",
            Self::Water => "water",
            Self::Combat => "combat",
            Self::Other => "other",
        }
    }
}

/// One selectable sport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sport {
    pub id: String,
    pub name: String,
    pub emoji: String,
    pub category: SportCategory,
}

const FALLBACK_EMOJI: &str = "\u{1F3C6}";

const BUILTIN: [(&str, &str, &str, SportCategory); 11] = [
    ("soccer", "Soccer", "\u{26BD}", SportCategory::Team),
    ("basketball", "Basketball", "\u{1F3C0}", SportCategory::Team),
    ("tennis", "Tennis", "\u{1F3BE}", SportCategory::Individual),
    ("baseball", "Baseball", "\u{26BE}", SportCategory::Team),
    ("football", "Football", "\u{1F3C8}", SportCategory::Team),
    ("hockey", "Hockey", "\u{1F3D2}", SportCategory::Team),
    ("golf", "Golf", "\u{26F3}", SportCategory::Individual),
    ("swimming", "Swimming", "\u{1F3CA}", SportCategory::Water),
    ("running", "Running", "\u{1F3C3}", SportCategory::Individual),
    ("volleyball", "Volleyball", "\u{1F3D0}", SportCategory::Team),
    ("other", "Other", FALLBACK_EMOJI, SportCategory::Other),
];

/// Error raised while parsing an `id` or `id=Name` sport entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SportSpecError {
    #[error("sport entry must not be blank")]
    Blank,
    #[error("sport id `{0}` may only contain a-z, 0-9, '-' or '_'")]
    InvalidId(String),
    #[error("sport `{0}` has an empty display name")]
    EmptyName(String),
}

impl Sport {
    /// Parse a configured extra sport.
    ///
    /// Accepts `id` (name derived by capitalising the id) or `id=Name`.
    /// Extras are categorised as [`SportCategory::Other`].
    ///
    /// # Examples
    /// ```
    /// use matchday::domain::Sport;
    ///
    /// let sport = Sport::from_spec("padel").unwrap();
    /// assert_eq!(sport.id, "padel");
    /// assert_eq!(sport.name, "Padel");
    ///
    /// let sport = Sport::from_spec("ultimate=Ultimate Frisbee").unwrap();
    /// assert_eq!(sport.name, "Ultimate Frisbee");
    /// ```
    pub fn from_spec(spec: &str) -> Result<Self, SportSpecError> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Err(SportSpecError::Blank);
        }
        let (raw_id, raw_name) = match spec.split_once('=') {
            Some((id, name)) => (id.trim(), Some(name.trim())),
            None => (spec, None),
        };
        let id = raw_id.to_ascii_lowercase();
        let valid_id = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
        if !valid_id {
            return Err(SportSpecError::InvalidId(raw_id.to_owned()));
        }
        let name = match raw_name {
            Some("") => return Err(SportSpecError::EmptyName(id)),
            Some(name) => name.to_owned(),
            None => capitalise(&id),
        };
        Ok(Self {
            id,
            name,
            emoji: FALLBACK_EMOJI.to_owned(),
            category: SportCategory::Other,
        })
    }
}

fn capitalise(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Ordered set of sports accepted by the validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SportRegistry {
    sports: Vec<Sport>,
}

impl Default for SportRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SportRegistry {
    /// Registry holding only the fixed sport set.
    pub fn builtin() -> Self {
        let sports = BUILTIN
            .iter()
            .map(|(id, name, emoji, category)| Sport {
                id: (*id).to_owned(),
                name: (*name).to_owned(),
                emoji: (*emoji).to_owned(),
                category: *category,
            })
            .collect();
        Self { sports }
    }

    /// Extend the registry with extra sports, skipping ids already present.
    pub fn with_extras(mut self, extras: impl IntoIterator<Item = Sport>) -> Self {
        for sport in extras {
            if self.resolve(&sport.id).is_none() {
                self.sports.push(sport);
            }
        }
        self
    }

    /// Build a registry from configured `id` / `id=Name` entries.
    pub fn from_specs<I, S>(specs: I) -> Result<Self, SportSpecError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extras = specs
            .into_iter()
            .map(|spec| Sport::from_spec(spec.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::builtin().with_extras(extras))
    }

    /// All sports in display order.
    pub fn sports(&self) -> &[Sport] {
        &self.sports
    }

    /// Find a sport by id or display name, ignoring case and surrounding
    /// whitespace.
    pub fn resolve(&self, candidate: &str) -> Option<&Sport> {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return None;
        }
        self.sports.iter().find(|sport| {
            sport.id.eq_ignore_ascii_case(candidate) || sport.name.eq_ignore_ascii_case(candidate)
        })
    }

    /// Canonical id for `candidate`, if it names a registered sport.
    pub fn canonical_id(&self, candidate: &str) -> Option<&str> {
        self.resolve(candidate).map(|sport| sport.id.as_str())
    }
}
