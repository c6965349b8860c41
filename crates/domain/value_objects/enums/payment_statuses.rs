use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(PaymentStatus::Pending),
            "completed" => Some(PaymentStatus::Completed),
            "failed" => Some(PaymentStatus::Failed),
            "refunded" => Some(PaymentStatus::Refunded),
            _ => None,
        }
    }

    /// `pending -> completed | failed`, then `completed -> refunded`. Nothing else.
    pub fn can_transition_to(&self, next: PaymentStatus) -> bool {
        matches!(
            (self, next),
            (PaymentStatus::Pending, PaymentStatus::Completed)
                | (PaymentStatus::Pending, PaymentStatus::Failed)
                | (PaymentStatus::Completed, PaymentStatus::Refunded)
        )
    }

    pub fn is_final(&self) -> bool {
        matches!(self, PaymentStatus::Failed | PaymentStatus::Refunded)
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [PaymentStatus; 4] = [
        PaymentStatus::Pending,
        PaymentStatus::Completed,
        PaymentStatus::Failed,
        PaymentStatus::Refunded,
    ];

    #[test]
    fn only_documented_transitions_are_allowed() {
        let allowed: Vec<(PaymentStatus, PaymentStatus)> = ALL
            .iter()
            .flat_map(|from| ALL.iter().map(move |to| (*from, *to)))
            .filter(|(from, to)| from.can_transition_to(*to))
            .collect();

        assert_eq!(
            allowed,
            vec![
                (PaymentStatus::Pending, PaymentStatus::Completed),
                (PaymentStatus::Pending, PaymentStatus::Failed),
                (PaymentStatus::Completed, PaymentStatus::Refunded),
            ]
        );
    }

    #[test]
    fn final_statuses_have_no_way_out() {
        for status in ALL.iter().filter(|status| status.is_final()) {
            assert!(ALL.iter().all(|next| !status.can_transition_to(*next)));
        }
    }

    #[test]
    fn unknown_status_string_is_rejected() {
        assert_eq!(PaymentStatus::from_str("completed"), Some(PaymentStatus::Completed));
        assert_eq!(PaymentStatus::from_str("succeeded"), None);
    }
}
