//! Record identifiers as received from API callers.
//!
//! Callers pass ids either as numbers or as raw strings taken from a request.
//! Zero, blank strings and `"0"` count as a missing identifier.

/// An identifier passed to a resource operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Id(u64),
    Raw(String),
    Missing,
}

/// The outcome of normalising an [`Identifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum IdLookup {
    /// No usable identifier was given.
    Missing,
    /// A numeric id to look up.
    Id(u64),
    /// A non-empty value that can never match a record.
    Unmatchable(String),
}

impl Identifier {
    pub(crate) fn lookup(&self) -> IdLookup {
        match self {
            Identifier::Missing | Identifier::Id(0) => IdLookup::Missing,
            Identifier::Id(id) => IdLookup::Id(*id),
            Identifier::Raw(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return IdLookup::Missing;
                }
                match trimmed.parse::<u64>() {
                    Ok(0) => IdLookup::Missing,
                    Ok(id) => IdLookup::Id(id),
                    Err(_) => IdLookup::Unmatchable(trimmed.to_string()),
                }
            }
        }
    }
}

impl From<u64> for Identifier {
    fn from(id: u64) -> Self {
        Identifier::Id(id)
    }
}

impl From<Option<u64>> for Identifier {
    fn from(id: Option<u64>) -> Self {
        id.map_or(Identifier::Missing, Identifier::Id)
    }
}

impl From<&str> for Identifier {
    fn from(raw: &str) -> Self {
        Identifier::Raw(raw.to_string())
    }
}

impl From<String> for Identifier {
    fn from(raw: String) -> Self {
        Identifier::Raw(raw)
    }
}

impl From<&String> for Identifier {
    fn from(raw: &String) -> Self {
        Identifier::Raw(raw.clone())
    }
}
