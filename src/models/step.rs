use serde::{Deserialize, Serialize};

/// Position in the booking script.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    Idle,
    Name,
    Email,
    Date,
    Time,
    Services,
    Summary,
    Done,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Idle => "idle",
            Step::Name => "name",
            Step::Email => "email",
            Step::Date => "date",
            Step::Time => "time",
            Step::Services => "services",
            Step::Summary => "summary",
            Step::Done => "done",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
