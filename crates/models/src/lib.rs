pub mod academic_year;
pub mod approval;
pub mod attendance;
pub mod days;
pub mod grade;
pub mod pagination;
pub mod role;
pub mod status;
