use crate::fields::BidsField;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error("datasets disagree on available native event fields")]
    InconsistentSchema,

    #[error("native field '{native}' is already mapped to BIDS field '{mapped_to}'")]
    DuplicateMapping { native: String, mapped_to: BidsField },

    #[error("BIDS field '{0}' has no native field mapped yet")]
    UnmappedField(BidsField),

    #[error("BIDS field '{0}' does not support level descriptions")]
    UnsupportedLevelEdit(BidsField),

    #[error("field '{0}' is missing from the event records of a dataset")]
    MissingField(String),

    #[error("'{0}' is not a BIDS event field")]
    UnknownBidsField(String),
}

pub type Result<T> = std::result::Result<T, AnnotationError>;
