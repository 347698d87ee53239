//! Positional column-to-field mapping for feed rows.

use std::fmt;

use thiserror::Error;

/// A product attribute a feed column can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Name,
    Category,
    Price,
    Description,
    Image,
}

impl Field {
    /// Parse one column name from a `SHEETSTALL_FEED_COLUMNS` spec.
    ///
    /// Accepts the short aliases seen in deployed sheets (`desc`, `img`).
    fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "category" => Some(Self::Category),
            "price" => Some(Self::Price),
            "description" | "desc" => Some(Self::Description),
            "image" | "img" => Some(Self::Image),
            _ => None,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Category => "category",
            Self::Price => "price",
            Self::Description => "description",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from parsing a column spec.
#[derive(Debug, Error)]
pub enum ColumnMapError {
    #[error("empty column spec")]
    Empty,
    #[error("unknown column name '{0}'")]
    UnknownColumn(String),
    #[error("duplicate column '{0}'")]
    DuplicateColumn(Field),
}

/// Ordered column layout of the feed rows.
///
/// Fields absent from the layout simply resolve to their fallbacks during
/// parsing, so a sheet without an id column still yields usable products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    order: Vec<Field>,
}

impl ColumnMap {
    /// Parse a comma-separated column spec, e.g. `name,id,price,category`.
    ///
    /// # Errors
    ///
    /// Returns an error on an empty spec, an unknown column name, or a
    /// column named twice.
    pub fn parse(spec: &str) -> Result<Self, ColumnMapError> {
        if spec.trim().is_empty() {
            return Err(ColumnMapError::Empty);
        }

        let mut order = Vec::new();
        for name in spec.split(',') {
            let field = Field::parse(name)
                .ok_or_else(|| ColumnMapError::UnknownColumn(name.trim().to_string()))?;
            if order.contains(&field) {
                return Err(ColumnMapError::DuplicateColumn(field));
            }
            order.push(field);
        }
        Ok(Self { order })
    }

    /// Position of `field` in the row, if the layout carries it.
    #[must_use]
    pub fn position(&self, field: Field) -> Option<usize> {
        self.order.iter().position(|f| *f == field)
    }
}

impl Default for ColumnMap {
    /// The id-first layout of the reference sheet.
    fn default() -> Self {
        Self {
            order: vec![
                Field::Id,
                Field::Name,
                Field::Category,
                Field::Price,
                Field::Description,
                Field::Image,
            ],
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_is_id_first() {
        let map = ColumnMap::default();
        assert_eq!(map.position(Field::Id), Some(0));
        assert_eq!(map.position(Field::Image), Some(5));
    }

    #[test]
    fn test_parse_name_first_layout() {
        let map = ColumnMap::parse("name,id,category,price,desc,img").unwrap();
        assert_eq!(map.position(Field::Name), Some(0));
        assert_eq!(map.position(Field::Id), Some(1));
        assert_eq!(map.position(Field::Description), Some(4));
        assert_eq!(map.position(Field::Image), Some(5));
    }

    #[test]
    fn test_parse_partial_layout() {
        let map = ColumnMap::parse("name,price").unwrap();
        assert_eq!(map.position(Field::Name), Some(0));
        assert_eq!(map.position(Field::Id), None);
    }

    #[test]
    fn test_parse_rejects_unknown_column() {
        let err = ColumnMap::parse("name,sku").unwrap_err();
        assert!(matches!(err, ColumnMapError::UnknownColumn(ref s) if s == "sku"));
    }

    #[test]
    fn test_parse_rejects_duplicates() {
        assert!(matches!(
            ColumnMap::parse("name,name").unwrap_err(),
            ColumnMapError::DuplicateColumn(Field::Name)
        ));
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(ColumnMap::parse("").is_err());
    }
}
