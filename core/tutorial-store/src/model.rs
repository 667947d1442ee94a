use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Id carried by a tutorial that has not been saved yet.
pub const UNSAVED_ID: i64 = 0;

/// A tutorial record.
///
/// `id` is assigned by [`TutorialStore::save`](crate::TutorialStore::save)
/// on first save; until then it is [`UNSAVED_ID`]. Fields missing from JSON
/// input, or given as `null`, fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tutorial {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub published: bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Tutorial {
    /// Creates an unsaved tutorial.
    pub fn new(title: impl Into<String>, description: impl Into<String>, published: bool) -> Self {
        Self {
            id: UNSAVED_ID,
            title: title.into(),
            description: description.into(),
            published,
        }
    }

    /// Returns a copy with the given id.
    #[must_use]
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    /// Whether this record has been assigned an id by the store.
    pub fn is_saved(&self) -> bool {
        self.id != UNSAVED_ID
    }
}

impl fmt::Display for Tutorial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tutorial [id={}, title={}, desc={}, published={}]",
            self.id, self.title, self.description, self.published
        )
    }
}
