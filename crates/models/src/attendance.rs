use crate::status::AttendanceStatus;
use serde::Serialize;

/// Meetings in a semester are numbered 1 through 16
pub const MAX_MEETINGS: i32 = 16;

pub fn is_valid_meeting(meeting: i32) -> bool {
    (1..=MAX_MEETINGS).contains(&meeting)
}

/// Per-student count of attendance marks over every recorded meeting
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AttendanceTally {
    pub present: u32,
    pub excused: u32,
    pub sick: u32,
    pub absent: u32,
}

impl AttendanceTally {
    pub fn record(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Hadir => self.present += 1,
            AttendanceStatus::Izin => self.excused += 1,
            AttendanceStatus::Sakit => self.sick += 1,
            AttendanceStatus::Alfa => self.absent += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.present + self.excused + self.sick + self.absent
    }

    /// Share of recorded meetings marked present, as a percentage. Meetings
    /// that have not been recorded yet do not count.
    pub fn present_percentage(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => f64::from(self.present) / f64::from(total) * 100.0,
        }
    }
}

impl FromIterator<AttendanceStatus> for AttendanceTally {
    fn from_iter<I: IntoIterator<Item = AttendanceStatus>>(iter: I) -> Self {
        let mut tally = Self::default();
        for status in iter {
            tally.record(status);
        }
        tally
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use AttendanceStatus::*;

    #[test]
    fn test_percentage_over_recorded_meetings() {
        let tally: AttendanceTally = [Hadir, Hadir, Alfa, Hadir].into_iter().collect();

        assert_eq!(tally.present, 3);
        assert_eq!(tally.absent, 1);
        assert_eq!(tally.total(), 4);
        assert_eq!(tally.present_percentage(), 75.0);
    }

    #[test]
    fn test_every_status_is_counted() {
        let tally: AttendanceTally = [Hadir, Izin, Sakit, Sakit, Alfa].into_iter().collect();

        assert_eq!(
            tally,
            AttendanceTally {
                present: 1,
                excused: 1,
                sick: 2,
                absent: 1,
            }
        );
        assert_eq!(tally.present_percentage(), 20.0);
    }

    #[test]
    fn test_no_records_is_zero_percent() {
        assert_eq!(AttendanceTally::default().present_percentage(), 0.0);
    }

    #[test]
    fn test_meeting_range() {
        assert!(!is_valid_meeting(0));
        assert!(is_valid_meeting(1));
        assert!(is_valid_meeting(16));
        assert!(!is_valid_meeting(17));
    }
}
