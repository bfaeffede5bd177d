use serde::{Deserialize, Serialize};

/// Identity of a book: unassigned until storage allocates one on first save.
///
/// Serialized as an optional integer so clients keep sending plain JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<i64>", into = "Option<i64>")]
pub enum BookId {
    #[default]
    Unassigned,
    Assigned(i64),
}

impl BookId {
    pub fn get(self) -> Option<i64> {
        match self {
            BookId::Unassigned => None,
            BookId::Assigned(id) => Some(id),
        }
    }

    pub fn is_unassigned(&self) -> bool {
        matches!(self, BookId::Unassigned)
    }
}

impl From<Option<i64>> for BookId {
    fn from(value: Option<i64>) -> Self {
        value.map_or(BookId::Unassigned, BookId::Assigned)
    }
}

impl From<BookId> for Option<i64> {
    fn from(value: BookId) -> Self {
        value.get()
    }
}

/// Domain model for the Books module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Storage-assigned identifier, absent for new books
    #[serde(default, skip_serializing_if = "BookId::is_unassigned")]
    pub id: BookId,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
    /// Genre the book is shelved under
    pub genre: String,
    /// Whether the book can currently be lent out
    pub available: bool,
}

impl Book {
    /// A book that has not been persisted yet.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
        available: bool,
    ) -> Self {
        Self {
            id: BookId::Unassigned,
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
            available,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = BookId::Assigned(id);
        self
    }
}
