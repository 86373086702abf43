use serde::{Deserialize, Serialize};

/// Meeting details accumulated across wizard steps.
///
/// Serialized as-is, this is the body of the scheduling request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingDraft {
    /// `YYYY-MM-DD`
    pub date: String,
    /// `h:mm am|pm`
    pub time: String,
    pub user_email: String,
    pub summary: String,
    pub description: String,
    pub guest_emails: Vec<String>,
}

impl BookingDraft {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Extra attendees collected on the services panel.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct GuestEmailSet(Vec<String>);

impl GuestEmailSet {
    /// Returns false when the address is already present.
    pub fn add(&mut self, email: &str) -> bool {
        if self.0.iter().any(|e| e.eq_ignore_ascii_case(email)) {
            return false;
        }
        self.0.push(email.to_string());
        true
    }

    pub fn remove(&mut self, email: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|e| !e.eq_ignore_ascii_case(email));
        self.0.len() != before
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    /// Primary address first, then guests that aren't the primary.
    pub fn merged_with(&self, primary: &str) -> Vec<String> {
        let mut all = vec![primary.to_string()];
        all.extend(
            self.0
                .iter()
                .filter(|e| !e.eq_ignore_ascii_case(primary))
                .cloned(),
        );
        all
    }
}

/// Reply body of the scheduling endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleReceipt {
    #[serde(default)]
    pub message: Option<String>,
}
