//! Definition of the geo filter's error and result.

use std::fmt;

use thiserror::Error;

use crate::DocId;

/// Raised when a geo value provider does not behave consistently,
/// e.g. it reports a value for a document but fails to return it.
#[derive(Clone)]
pub struct DataCorruption {
    field_name: Option<String>,
    comment: String,
}

impl DataCorruption {
    /// Creates a corruption report that is not attached to any field.
    pub fn comment_only(comment: impl ToString) -> DataCorruption {
        DataCorruption {
            field_name: None,
            comment: comment.to_string(),
        }
    }

    /// Reports a document flagged as having a value, for which no value could be read.
    pub(crate) fn missing_value(doc: DocId) -> DataCorruption {
        DataCorruption::comment_only(format!(
            "doc {doc} is reported as having a geo value, but none could be read"
        ))
    }

    /// Attaches the corruption to `field_name`, unless it is already attached to a field.
    pub(crate) fn with_field(mut self, field_name: &str) -> DataCorruption {
        if self.field_name.is_none() {
            self.field_name = Some(field_name.to_string());
        }
        self
    }
}

impl fmt::Debug for DataCorruption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "Data corruption")?;
        if let Some(field_name) = &self.field_name {
            write!(f, " (in field `{field_name}`)")?;
        }
        write!(f, ": {}.", self.comment)?;
        Ok(())
    }
}

/// The library's failure based error enum
#[derive(Debug, Clone, Error)]
pub enum GeoFilterError {
    /// An invalid argument was passed by the user.
    #[error("An invalid argument was passed: '{0}'")]
    InvalidArgument(String),
    /// No geo point reader is registered for the requested field.
    #[error("Field does not exist: '{0}'")]
    FieldNotFound(String),
    /// The geo point reader does not fit the segment it is read with.
    #[error("Schema error: '{0}'")]
    SchemaError(String),
    /// The geo value provider returned inconsistent data.
    #[error("{0:?}")]
    DataCorruption(DataCorruption),
}

impl From<DataCorruption> for GeoFilterError {
    fn from(data_corruption: DataCorruption) -> GeoFilterError {
        GeoFilterError::DataCorruption(data_corruption)
    }
}
