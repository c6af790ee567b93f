use serde::{Deserialize, Serialize};

/// A character as returned by `GET /character/{id}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Character {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub species: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub origin: Place,
    #[serde(default)]
    pub location: Place,
    #[serde(default)]
    pub image: String,
    /// Episode URLs this character appears in.
    #[serde(default)]
    pub episode: Vec<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub created: String,
}

/// Named reference to a location resource.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// Pagination block of list responses.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageInfo {
    pub count: u32,
    pub pages: u32,
    pub next: Option<String>,
    pub prev: Option<String>,
}

/// One page of `GET /character`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CharacterPage {
    pub info: PageInfo,
    pub results: Vec<Character>,
}

impl CharacterPage {
    pub fn has_next(&self) -> bool {
        self.info.next.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Episode {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub air_date: String,
    /// Season/episode code, e.g. `S01E01`.
    #[serde(default)]
    pub episode: String,
    #[serde(default)]
    pub characters: Vec<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub created: String,
}

/// Values accepted by the `status` filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    Alive,
    Dead,
    Unknown,
}

impl StatusFilter {
    /// Query-string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alive => "alive",
            Self::Dead => "dead",
            Self::Unknown => "unknown",
        }
    }

    pub fn all() -> &'static [StatusFilter] {
        &[Self::Alive, Self::Dead, Self::Unknown]
    }

    /// Case-insensitive parse.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "alive" => Some(Self::Alive),
            "dead" => Some(Self::Dead),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

/// Values accepted by the `gender` filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenderFilter {
    Female,
    Male,
    Genderless,
    Unknown,
}

impl GenderFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Female => "female",
            Self::Male => "male",
            Self::Genderless => "genderless",
            Self::Unknown => "unknown",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "female" => Some(Self::Female),
            "male" => Some(Self::Male),
            "genderless" => Some(Self::Genderless),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

/// Parameters of `GET /character`. Unset fields are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CharacterQuery {
    pub page: Option<u32>,
    pub name: Option<String>,
    pub status: Option<StatusFilter>,
    pub species: Option<String>,
    pub gender: Option<GenderFilter>,
}

impl CharacterQuery {
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }

    /// True when no filter or name search narrows the listing.
    pub fn is_unfiltered(&self) -> bool {
        self.name.is_none() && self.status.is_none() && self.species.is_none() && self.gender.is_none()
    }

    /// Query-string pairs in a stable order.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(name) = &self.name {
            pairs.push(("name", name.clone()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(species) = &self.species {
            pairs.push(("species", species.clone()));
        }
        if let Some(gender) = self.gender {
            pairs.push(("gender", gender.as_str().to_string()));
        }
        pairs
    }
}

/// Character counts by status, for the home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusBreakdown {
    pub total: u32,
    pub alive: u32,
    pub dead: u32,
    pub unknown: u32,
}
