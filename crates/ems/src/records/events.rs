use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

use super::domain::{
    AdminProfile, AttendanceStatus, DepartmentId, EmployeeId, EventId, LeaveId, LeaveStatus,
    Month, SalaryId,
};

const DEFAULT_CAPACITY: usize = 64;

/// A committed mutation, delivered to every subscriber of the [`ChangeFeed`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordChange {
    EmployeeAdded { id: EmployeeId },
    EmployeeUpdated { id: EmployeeId },
    EmployeeRemoved { id: EmployeeId },
    DepartmentAdded { id: DepartmentId },
    DepartmentUpdated { id: DepartmentId },
    DepartmentRemoved { id: DepartmentId },
    LeaveSubmitted { id: LeaveId },
    LeaveDecided { id: LeaveId, status: LeaveStatus },
    LeaveRemoved { id: LeaveId },
    SalaryAdded { id: SalaryId },
    SalaryPaid { id: SalaryId },
    MonthPaid { month: Month, count: usize },
    SalaryRemoved { id: SalaryId },
    EventAdded { id: EventId },
    EventRemoved { id: EventId },
    AttendanceMarked {
        date: NaiveDate,
        employee: EmployeeId,
        status: AttendanceStatus,
    },
    ProfileChanged { profile: AdminProfile },
}

#[derive(Debug, Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<RecordChange>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RecordChange> {
        self.sender.subscribe()
    }

    /// Returns the number of subscribers that received the change.
    pub fn publish(&self, change: RecordChange) -> usize {
        match self.sender.send(change) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(change)) => {
                debug!(?change, "no subscribers for record change");
                0
            }
        }
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_subscriber_sees_each_change() {
        let feed = ChangeFeed::default();
        let mut first = feed.subscribe();
        let mut second = feed.subscribe();

        let delivered = feed.publish(RecordChange::EmployeeRemoved { id: EmployeeId(3) });
        assert_eq!(delivered, 2);
        assert_eq!(
            first.recv().await.expect("first receives"),
            RecordChange::EmployeeRemoved { id: EmployeeId(3) }
        );
        assert_eq!(
            second.recv().await.expect("second receives"),
            RecordChange::EmployeeRemoved { id: EmployeeId(3) }
        );
    }

    #[test]
    fn publishing_without_subscribers_is_not_an_error() {
        let feed = ChangeFeed::new(4);
        assert_eq!(
            feed.publish(RecordChange::DepartmentAdded { id: DepartmentId(1) }),
            0
        );
    }

    #[test]
    fn changes_serialize_with_kind_tag() {
        let change = RecordChange::ProfileChanged {
            profile: AdminProfile {
                display_name: "Admin".to_string(),
                photo: None,
            },
        };
        let json = serde_json::to_value(&change).expect("serializes");
        assert_eq!(json["kind"], "profile_changed");
        assert_eq!(json["profile"]["display_name"], "Admin");
    }
}
