use std::time::Duration;

use maze_chase_core::PursuitPhase;

/// Alternating scatter/chase timetable measured from level start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PursuitSchedule {
    phases: Vec<Duration>,
}

impl PursuitSchedule {
    pub(crate) fn new(phases: Vec<Duration>) -> Self {
        Self { phases }
    }

    /// Phase active `elapsed` after level start. Even slots scatter, odd
    /// slots chase, and chase lasts forever after the last slot.
    pub(crate) fn phase_at(&self, elapsed: Duration) -> PursuitPhase {
        let mut boundary = Duration::ZERO;
        for (index, length) in self.phases.iter().enumerate() {
            boundary = boundary.saturating_add(*length);
            if elapsed < boundary {
                return if index % 2 == 0 {
                    PursuitPhase::Scatter
                } else {
                    PursuitPhase::Chase
                };
            }
        }
        PursuitPhase::Chase
    }
}
