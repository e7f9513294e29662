// ==========================================
// Grain Receiving - Operation Lifecycle
// ==========================================
// Allowed transitions:
//   PENDING        -> ARRIVED          (gate)
//   ARRIVED        -> QUALITY_OK       (sampling, accepted)
//   ARRIVED        -> REJECTED         (sampling, rejected)
//   QUALITY_OK     -> GROSS_RECORDED   (scale, loaded)
//   GROSS_RECORDED -> COMPLETED        (scale, empty)
// Each station only sees today's operations in its entry states.
// ==========================================

use crate::domain::operation::Operation;
use crate::domain::types::{OperationState, WeighingStep};
use crate::engine::error::{EngineError, EngineResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

// ==========================================
// Station - who is looking at the operation list
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Station {
    Gate,
    Quality,
    Weighing,
}

impl Station {
    /// States an operation must be in to show up at this station.
    pub fn entry_states(&self) -> &'static [OperationState] {
        match self {
            Station::Gate => &[OperationState::Pending],
            Station::Quality => &[OperationState::Arrived],
            Station::Weighing => &[OperationState::QualityOk, OperationState::GrossRecorded],
        }
    }
}

// ==========================================
// OperationLifecycle
// ==========================================
pub struct OperationLifecycle;

impl OperationLifecycle {
    pub fn can_transition(from: OperationState, to: OperationState) -> bool {
        use OperationState::*;
        matches!(
            (from, to),
            (Pending, Arrived)
                | (Arrived, QualityOk)
                | (Arrived, Rejected)
                | (QualityOk, GrossRecorded)
                | (GrossRecorded, Completed)
        )
    }

    /// Move `op` to `to`, rejecting anything outside the transition table.
    pub fn transition(op: &mut Operation, to: OperationState) -> EngineResult<()> {
        let from = op.state;
        if !Self::can_transition(from, to) {
            return Err(EngineError::InvalidStateTransition { from, to });
        }
        op.state = to;
        info!(
            operation_id = %op.id,
            plate = %op.plate,
            from = %from,
            to = %to,
            "operation state changed"
        );
        Ok(())
    }

    /// Fails unless `op` is currently in `expected`.
    ///
    /// `next` is the state the caller is trying to reach, reported back
    /// in the error.
    pub fn require_state(
        op: &Operation,
        expected: OperationState,
        next: OperationState,
    ) -> EngineResult<()> {
        if op.state != expected {
            return Err(EngineError::InvalidStateTransition {
                from: op.state,
                to: next,
            });
        }
        Ok(())
    }

    pub fn is_visible_to(op: &Operation, station: Station, today: NaiveDate) -> bool {
        op.quota_date == today && station.entry_states().contains(&op.state)
    }

    /// Today's work list for a station, in stored order.
    pub fn station_queue<'a>(
        ops: impl IntoIterator<Item = &'a Operation>,
        station: Station,
        today: NaiveDate,
    ) -> Vec<&'a Operation> {
        ops.into_iter()
            .filter(|op| Self::is_visible_to(op, station, today))
            .collect()
    }

    /// The scale reading a weighing-queue operation is waiting for.
    pub fn pending_weighing_step(op: &Operation) -> Option<WeighingStep> {
        match op.state {
            OperationState::QualityOk => Some(WeighingStep::Gross),
            OperationState::GrossRecorded => Some(WeighingStep::Tare),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OperationState::*;

    const ALL: [OperationState; 6] = [Pending, Arrived, QualityOk, GrossRecorded, Completed, Rejected];

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    fn op_in(state: OperationState, date: NaiveDate) -> Operation {
        let mut op = Operation::new_quota("AAA123", "SOJA", date);
        op.state = state;
        op
    }

    #[test]
    fn test_transition_table_is_exact() {
        let allowed = [
            (Pending, Arrived),
            (Arrived, QualityOk),
            (Arrived, Rejected),
            (QualityOk, GrossRecorded),
            (GrossRecorded, Completed),
        ];
        for from in ALL {
            for to in ALL {
                assert_eq!(
                    OperationLifecycle::can_transition(from, to),
                    allowed.contains(&(from, to)),
                    "{} -> {}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn test_terminal_states_never_leave() {
        for to in ALL {
            assert!(!OperationLifecycle::can_transition(Completed, to));
            assert!(!OperationLifecycle::can_transition(Rejected, to));
        }
    }

    #[test]
    fn test_transition_rejects_skip() {
        let mut op = op_in(Arrived, today());
        let err = OperationLifecycle::transition(&mut op, GrossRecorded).unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidStateTransition {
                from: Arrived,
                to: GrossRecorded
            }
        );
        assert_eq!(op.state, Arrived);
    }

    #[test]
    fn test_weighing_queue_filters_state_and_date() {
        let yesterday = today().pred_opt().unwrap();
        let ops = vec![
            op_in(QualityOk, today()),
            op_in(GrossRecorded, today()),
            op_in(Arrived, today()),
            op_in(Completed, today()),
            op_in(QualityOk, yesterday),
        ];

        let queue = OperationLifecycle::station_queue(&ops, Station::Weighing, today());
        assert_eq!(queue.len(), 2);
        assert_eq!(
            OperationLifecycle::pending_weighing_step(queue[0]),
            Some(WeighingStep::Gross)
        );
        assert_eq!(
            OperationLifecycle::pending_weighing_step(queue[1]),
            Some(WeighingStep::Tare)
        );
    }

    #[test]
    fn test_gate_and_quality_queues() {
        let ops = vec![op_in(Pending, today()), op_in(Arrived, today())];
        assert_eq!(OperationLifecycle::station_queue(&ops, Station::Gate, today()).len(), 1);
        assert_eq!(OperationLifecycle::station_queue(&ops, Station::Quality, today()).len(), 1);
    }
}
