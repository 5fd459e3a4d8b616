use database::services::{enrollment::NewEnrollment, schedule::ScheduleFilter};
use models::grade::Scores;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct EnrollmentRequest {
    pub course_id: Uuid,
    /// 1 to 14
    pub semester: i32,
    /// `YYYY/YYYY`, consecutive years
    pub academic_year: String,
}

impl From<EnrollmentRequest> for NewEnrollment {
    fn from(request: EnrollmentRequest) -> Self {
        Self {
            course_id: request.course_id,
            semester: request.semester,
            academic_year: request.academic_year,
        }
    }
}

/// Optional term filter shared by KRS and grade listings
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TermQuery {
    pub semester: Option<i32>,
    pub academic_year: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailableCoursesQuery {
    /// Defaults to the student's current semester
    pub semester: Option<i32>,
    /// Defaults to the current academic year
    pub academic_year: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ApprovalRequest {
    /// `approve` or `reject`
    pub action: String,
    /// Required when rejecting
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GradeRequest {
    pub task_score: f64,
    pub midterm_score: f64,
    pub final_exam_score: f64,
}

impl From<GradeRequest> for Scores {
    fn from(request: GradeRequest) -> Self {
        Scores::new(
            request.task_score,
            request.midterm_score,
            request.final_exam_score,
        )
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ScheduleQuery {
    pub semester: Option<i32>,
    pub academic_year: Option<String>,
    /// Indonesian day name, e.g. `senin`
    pub day: Option<String>,
}

impl From<ScheduleQuery> for ScheduleFilter {
    fn from(query: ScheduleQuery) -> Self {
        Self {
            semester: query.semester,
            academic_year: query.academic_year,
            day: query.day,
        }
    }
}
