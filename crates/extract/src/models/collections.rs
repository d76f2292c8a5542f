use serde::Deserialize;
use std::collections::BTreeSet;

/// The external collections a book has been shared with, as recorded in a
/// Calibre custom column.
///
/// Calibre stores custom column values as a JSON object embedded in an XML
/// attribute; the list of names lives under its `#value#` key. A broken
/// payload must never break processing of the rest of the document, so the
/// failure is kept as a variant rather than raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collections {
    /// The document has no entry for the column.
    Absent,
    /// The entry exists but its payload isn't the expected JSON shape.
    Malformed,
    /// The collection names listed in the entry (possibly none).
    Listed(BTreeSet<String>),
}

#[derive(Deserialize)]
struct Payload {
    #[serde(rename = "#value#", default)]
    value: Option<Vec<String>>,
}

impl Collections {
    /// Interprets the raw JSON payload of the column entry.
    pub fn from_payload(payload: Option<&str>) -> Self {
        let Some(payload) = payload else {
            return Self::Absent;
        };
        match serde_json::from_str::<Payload>(payload) {
            // Calibre writes `null` for a column that has no value yet.
            Ok(Payload { value }) => Self::Listed(value.unwrap_or_default().into_iter().collect()),
            Err(e) => {
                tracing::debug!(error = %e, "Unparsable collection payload; treating book as unshared");
                Self::Malformed
            },
        }
    }

    /// Returns `true` only when `name` is positively listed.
    pub fn contains(&self, name: &str) -> bool {
        match self {
            Self::Listed(names) => names.contains(name),
            Self::Absent | Self::Malformed => false,
        }
    }
}
