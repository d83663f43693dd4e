use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Watch status of a record in the collection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Not watched yet (the only status without rating/watched date)
    Waiting,
    /// Finished watching
    Completed,
    /// Stopped watching
    Dropped,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Waiting, Status::Completed, Status::Dropped];

    /// Canonical names, in the order the choice resolver registers them
    pub const NAMES: [&'static str; 3] = ["waiting", "completed", "dropped"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Waiting => "waiting",
            Status::Completed => "completed",
            Status::Dropped => "dropped",
        }
    }

    pub fn is_watched(&self) -> bool {
        !matches!(self, Status::Waiting)
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Waiting
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "waiting" => Ok(Status::Waiting),
            "completed" => Ok(Status::Completed),
            "dropped" => Ok(Status::Dropped),
            other => Err(format!("Invalid status: {}", other)),
        }
    }
}
