pub mod attendances;
pub mod courses;
pub mod department_heads;
pub mod enrollments;
pub mod grades;
pub mod lecturers;
pub mod materials;
pub mod rectors;
pub mod schedules;
pub mod students;
pub mod users;
