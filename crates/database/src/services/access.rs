use crate::{
    entities::{courses, department_heads, lecturers, students},
    error::{ServiceError, ServiceResult},
};
use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

/// Authorization predicates. Each is a read without side effects and is
/// evaluated before anything is written.
pub struct AccessService;

impl AccessService {
    pub fn is_teaching(lecturer: &lecturers::Model, course: &courses::Model) -> bool {
        course.lecturer_id == Some(lecturer.id)
    }

    /// The lecturer is the student's dosen wali
    pub fn is_advisor_of(lecturer: &lecturers::Model, student: &students::Model) -> bool {
        student.advisor_id == Some(lecturer.id)
    }

    pub fn is_department_head_of(head: &department_heads::Model, department: &str) -> bool {
        head.department == department
    }

    pub fn is_self(student: &students::Model, target_id: Uuid) -> bool {
        student.id == target_id
    }

    /// Loads a course the lecturer teaches. A missing course is `NotFound`,
    /// someone else's course is `Forbidden`.
    pub async fn teaching_course(
        db: &DatabaseConnection,
        lecturer: &lecturers::Model,
        course_id: Uuid,
    ) -> ServiceResult<courses::Model> {
        let course = courses::Entity::find_by_id(course_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("course not found"))?;

        if !Self::is_teaching(lecturer, &course) {
            return Err(ServiceError::forbidden("you are not teaching this course"));
        }

        Ok(course)
    }

    pub fn ensure_self(student: &students::Model, target_id: Uuid) -> ServiceResult<()> {
        if Self::is_self(student, target_id) {
            Ok(())
        } else {
            Err(ServiceError::forbidden(
                "students can only change their own record",
            ))
        }
    }

    /// Loads a course whose lecturer belongs to the head's department
    pub async fn department_course(
        db: &DatabaseConnection,
        head: &department_heads::Model,
        course_id: Uuid,
    ) -> ServiceResult<(courses::Model, lecturers::Model)> {
        let (course, lecturer) = courses::Entity::find_by_id(course_id)
            .find_also_related(lecturers::Entity)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("course not found"))?;

        match lecturer {
            Some(lecturer) if Self::is_department_head_of(head, &lecturer.department) => {
                Ok((course, lecturer))
            }
            _ => Err(ServiceError::forbidden(
                "you can only manage courses in your department",
            )),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::Utc;
    use models::status::{AcademicStatus, RecordStatus};

    fn lecturer(id: Uuid) -> lecturers::Model {
        lecturers::Model {
            id,
            user_id: Uuid::new_v4(),
            nidn: "0011223344".to_string(),
            name: "Dr. Sari".to_string(),
            email: "sari@kampus.ac.id".to_string(),
            department: "Informatika".to_string(),
            phone: None,
            status: RecordStatus::Aktif,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn student(advisor_id: Option<Uuid>) -> students::Model {
        students::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            nim: "2025000001".to_string(),
            name: "Budi".to_string(),
            department: "Informatika".to_string(),
            phone: None,
            academic_status: AcademicStatus::Aktif,
            semester: 1,
            gpa: 0.0,
            advisor_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_advisor_predicate() {
        let advisor = lecturer(Uuid::new_v4());
        let other = lecturer(Uuid::new_v4());
        let advisee = student(Some(advisor.id));

        assert!(AccessService::is_advisor_of(&advisor, &advisee));
        assert!(!AccessService::is_advisor_of(&other, &advisee));
        assert!(!AccessService::is_advisor_of(&advisor, &student(None)));
    }

    #[test]
    fn test_self_predicate() {
        let budi = student(None);
        assert!(AccessService::ensure_self(&budi, budi.id).is_ok());
        assert!(matches!(
            AccessService::ensure_self(&budi, Uuid::new_v4()),
            Err(ServiceError::Forbidden(_))
        ));
    }
}
