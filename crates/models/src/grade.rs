use sea_orm::{Iterable, entity::prelude::*};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter, Result as FmtResult},
};
use strum::Display as StrumDisplay;

/// Weight of the assignment component in the final score
pub const TASK_WEIGHT: f64 = 0.30;
/// Weight of the midterm exam (UTS)
pub const MIDTERM_WEIGHT: f64 = 0.35;
/// Weight of the final exam (UAS)
pub const FINAL_WEIGHT: f64 = 0.35;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    DeriveActiveEnum,
    StrumDisplay,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum LetterGrade {
    #[sea_orm(string_value = "A")]
    A,
    #[sea_orm(string_value = "AB")]
    AB,
    #[sea_orm(string_value = "B")]
    B,
    #[sea_orm(string_value = "BC")]
    BC,
    #[sea_orm(string_value = "C")]
    C,
    #[sea_orm(string_value = "D")]
    D,
    #[sea_orm(string_value = "E")]
    E,
}

impl LetterGrade {
    /// Descending threshold table, evaluated top-down
    const THRESHOLDS: [(f64, Self, f64); 6] = [
        (85.0, Self::A, 4.0),
        (80.0, Self::AB, 3.5),
        (75.0, Self::B, 3.0),
        (70.0, Self::BC, 2.5),
        (65.0, Self::C, 2.0),
        (50.0, Self::D, 1.0),
    ];

    /// Maps a final score to its letter and grade point
    pub fn from_score(score: f64) -> (Self, f64) {
        Self::THRESHOLDS
            .iter()
            .find(|(min, _, _)| score >= *min)
            .map(|&(_, letter, point)| (letter, point))
            .unwrap_or((Self::E, 0.0))
    }

    /// An E does not count towards passed credits
    pub fn is_passing(self) -> bool {
        self != Self::E
    }
}

/// Component scores submitted by a lecturer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    /// Assignment score (tugas)
    pub task: f64,
    /// Midterm score (UTS)
    pub midterm: f64,
    /// Final exam score (UAS)
    pub final_exam: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScoreError {
    OutOfRange { component: &'static str, value: f64 },
}

impl Display for ScoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::OutOfRange { component, value } => write!(
                f,
                "{component} must be between {MIN_SCORE} and {MAX_SCORE}, got {value}"
            ),
        }
    }
}

impl std::error::Error for ScoreError {}

/// Result of applying the grading rule to a set of scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComputedGrade {
    pub final_score: f64,
    pub letter: LetterGrade,
    pub point: f64,
}

impl Scores {
    pub fn new(task: f64, midterm: f64, final_exam: f64) -> Self {
        Self {
            task,
            midterm,
            final_exam,
        }
    }

    /// Rejects any component outside [0, 100], including NaN
    pub fn validate(&self) -> Result<(), ScoreError> {
        for (component, value) in [
            ("task_score", self.task),
            ("midterm_score", self.midterm),
            ("final_exam_score", self.final_exam),
        ] {
            if !(MIN_SCORE..=MAX_SCORE).contains(&value) {
                return Err(ScoreError::OutOfRange { component, value });
            }
        }
        Ok(())
    }

    /// Validates the scores and computes the weighted final score, letter and
    /// grade point
    pub fn compute(&self) -> Result<ComputedGrade, ScoreError> {
        self.validate()?;
        let final_score =
            self.task * TASK_WEIGHT + self.midterm * MIDTERM_WEIGHT + self.final_exam * FINAL_WEIGHT;
        let (letter, point) = LetterGrade::from_score(final_score);
        Ok(ComputedGrade {
            final_score,
            letter,
            point,
        })
    }
}

/// One graded course as seen by the transcript
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradedCredit {
    pub credits: i32,
    pub letter: LetterGrade,
    pub point: f64,
    pub final_score: f64,
}

/// Credit and GPA totals over a student's grade history
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TranscriptTotals {
    pub total_credits: i32,
    pub total_credits_passed: i32,
    pub total_points: f64,
    pub gpa: f64,
}

impl TranscriptTotals {
    pub fn from_grades<'a>(grades: impl IntoIterator<Item = &'a GradedCredit>) -> Self {
        let mut totals = Self::default();

        for grade in grades {
            totals.total_credits += grade.credits;
            if grade.letter.is_passing() {
                totals.total_credits_passed += grade.credits;
            }
            totals.total_points += grade.point * f64::from(grade.credits);
        }

        if totals.total_credits > 0 {
            totals.gpa = totals.total_points / f64::from(totals.total_credits);
        }

        totals
    }
}

/// Grade distribution and averages for the statistics view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeStatistics {
    pub total_courses: usize,
    pub grade_distribution: BTreeMap<LetterGrade, usize>,
    pub average_score: f64,
    pub total_points: f64,
    pub total_credits: i32,
}

impl GradeStatistics {
    pub fn from_grades(grades: &[GradedCredit]) -> Self {
        // Every letter is reported, even with a zero count
        let mut grade_distribution: BTreeMap<LetterGrade, usize> =
            LetterGrade::iter().map(|letter| (letter, 0)).collect();
        let mut score_sum = 0.0;

        for grade in grades {
            *grade_distribution.entry(grade.letter).or_default() += 1;
            score_sum += grade.final_score;
        }

        let totals = TranscriptTotals::from_grades(grades);
        let average_score = if grades.is_empty() {
            0.0
        } else {
            score_sum / grades.len() as f64
        };

        Self {
            total_courses: grades.len(),
            grade_distribution,
            average_score,
            total_points: totals.total_points,
            total_credits: totals.total_credits,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn graded(credits: i32, score: f64) -> GradedCredit {
        let (letter, point) = LetterGrade::from_score(score);
        GradedCredit {
            credits,
            letter,
            point,
            final_score: score,
        }
    }

    #[test]
    fn test_weighted_final_score() {
        let grade = Scores::new(85.0, 80.0, 78.0).compute().unwrap();
        let expected = 85.0 * 0.30 + 80.0 * 0.35 + 78.0 * 0.35;
        assert_eq!(grade.final_score, expected);
        assert_eq!(grade.letter, LetterGrade::AB);
        assert_eq!(grade.point, 3.5);
    }

    #[test]
    fn test_threshold_boundaries() {
        let cases = [
            (100.0, LetterGrade::A, 4.0),
            (85.0, LetterGrade::A, 4.0),
            (84.999, LetterGrade::AB, 3.5),
            (80.0, LetterGrade::AB, 3.5),
            (79.999, LetterGrade::B, 3.0),
            (75.0, LetterGrade::B, 3.0),
            (74.999, LetterGrade::BC, 2.5),
            (70.0, LetterGrade::BC, 2.5),
            (69.999, LetterGrade::C, 2.0),
            (65.0, LetterGrade::C, 2.0),
            (64.999, LetterGrade::D, 1.0),
            (50.0, LetterGrade::D, 1.0),
            (49.999, LetterGrade::E, 0.0),
            (0.0, LetterGrade::E, 0.0),
        ];

        for (score, letter, point) in cases {
            assert_eq!(LetterGrade::from_score(score), (letter, point), "score {score}");
        }
    }

    #[test]
    fn test_compute_is_deterministic() {
        let scores = Scores::new(66.5, 72.25, 91.0);
        assert_eq!(scores.compute().unwrap(), scores.compute().unwrap());
    }

    #[test]
    fn test_out_of_range_scores_are_rejected() {
        assert!(Scores::new(-0.1, 50.0, 50.0).compute().is_err());
        assert!(Scores::new(50.0, 100.5, 50.0).compute().is_err());
        assert!(Scores::new(50.0, 50.0, f64::NAN).compute().is_err());
        assert!(Scores::new(0.0, 100.0, 100.0).compute().is_ok());

        let err = Scores::new(50.0, 50.0, 101.0).validate().unwrap_err();
        assert_eq!(
            err,
            ScoreError::OutOfRange {
                component: "final_exam_score",
                value: 101.0
            }
        );
    }

    #[test]
    fn test_transcript_totals() {
        let grades = [
            GradedCredit {
                credits: 3,
                letter: LetterGrade::A,
                point: 4.0,
                final_score: 90.0,
            },
            GradedCredit {
                credits: 2,
                letter: LetterGrade::B,
                point: 3.0,
                final_score: 76.0,
            },
        ];
        let totals = TranscriptTotals::from_grades(&grades);

        assert_eq!(totals.total_credits, 5);
        assert_eq!(totals.total_credits_passed, 5);
        assert!((totals.gpa - 3.6).abs() < 1e-9);
    }

    #[test]
    fn test_failed_course_counts_credits_but_not_passed_credits() {
        let grades = [graded(3, 90.0), graded(4, 20.0)];
        let totals = TranscriptTotals::from_grades(&grades);

        assert_eq!(totals.total_credits, 7);
        assert_eq!(totals.total_credits_passed, 3);
        assert!((totals.gpa - 12.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_transcript_has_zero_gpa() {
        let totals = TranscriptTotals::from_grades(&[]);
        assert_eq!(totals, TranscriptTotals::default());
    }

    #[test]
    fn test_grade_statistics_reports_every_letter() {
        let stats = GradeStatistics::from_grades(&[graded(3, 90.0), graded(2, 90.0), graded(2, 40.0)]);

        assert_eq!(stats.total_courses, 3);
        assert_eq!(stats.grade_distribution.len(), 7);
        assert_eq!(stats.grade_distribution[&LetterGrade::A], 2);
        assert_eq!(stats.grade_distribution[&LetterGrade::E], 1);
        assert_eq!(stats.grade_distribution[&LetterGrade::C], 0);
        assert!((stats.average_score - 220.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats.total_credits, 7);
        assert_eq!(stats.total_points, 20.0);
    }
}
