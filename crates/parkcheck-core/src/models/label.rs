use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Binary classifier output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Label {
    /// Class 0: no signs of Parkinson's.
    Negative,
    /// Class 1: signs of Parkinson's.
    Positive,
}

impl Label {
    pub fn as_class(&self) -> u8 {
        match self {
            Self::Negative => 0,
            Self::Positive => 1,
        }
    }

    /// Result text shown to the user.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Negative => "Test shows no signs of Parkinson's",
            Self::Positive => "Test shows signs of Parkinson's",
        }
    }
}

impl TryFrom<i64> for Label {
    type Error = CoreError;

    fn try_from(class: i64) -> Result<Self, Self::Error> {
        match class {
            0 => Ok(Self::Negative),
            1 => Ok(Self::Positive),
            other => Err(CoreError::InvalidLabel(other)),
        }
    }
}
