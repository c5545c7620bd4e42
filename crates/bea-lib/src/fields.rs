use crate::error::AnnotationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed vocabulary of BIDS event-table fields, in the column order
/// used by `events.tsv`. Every registry holds exactly one entry per variant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum BidsField {
    #[serde(rename = "onset")]
    Onset,
    #[serde(rename = "duration")]
    Duration,
    #[serde(rename = "sample")]
    Sample,
    #[serde(rename = "trial_type")]
    TrialType,
    #[serde(rename = "value")]
    Value,
    #[serde(rename = "stim_file")]
    StimFile,
    #[serde(rename = "response_time")]
    ResponseTime,
    #[serde(rename = "HED")]
    Hed,
}

impl BidsField {
    /// All fields in stable (events.tsv column) order.
    pub const ALL: [BidsField; 8] = [
        BidsField::Onset,
        BidsField::Duration,
        BidsField::Sample,
        BidsField::TrialType,
        BidsField::Value,
        BidsField::StimFile,
        BidsField::ResponseTime,
        BidsField::Hed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BidsField::Onset => "onset",
            BidsField::Duration => "duration",
            BidsField::Sample => "sample",
            BidsField::TrialType => "trial_type",
            BidsField::Value => "value",
            BidsField::StimFile => "stim_file",
            BidsField::ResponseTime => "response_time",
            BidsField::Hed => "HED",
        }
    }

    /// Continuous fields and HED tags carry no categorical levels.
    pub fn supports_levels(&self) -> bool {
        !matches!(
            self,
            BidsField::Onset | BidsField::Duration | BidsField::Sample | BidsField::Hed
        )
    }
}

impl fmt::Display for BidsField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BidsField {
    type Err = AnnotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BidsField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| AnnotationError::UnknownBidsField(s.to_string()))
    }
}
