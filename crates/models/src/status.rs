use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Whether an account, lecturer, material, etc. is still in use
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RecordStatus {
    #[default]
    #[sea_orm(string_value = "aktif")]
    Aktif,
    #[sea_orm(string_value = "nonaktif")]
    Nonaktif,
}

/// Academic standing of a student
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AcademicStatus {
    #[default]
    #[sea_orm(string_value = "aktif")]
    Aktif,
    /// On leave
    #[sea_orm(string_value = "cuti")]
    Cuti,
    #[sea_orm(string_value = "drop_out")]
    DropOut,
    /// Graduated
    #[sea_orm(string_value = "lulus")]
    Lulus,
}

impl AcademicStatus {
    /// Label printed on the transcript
    pub fn graduation_label(self) -> &'static str {
        match self {
            Self::Lulus => "Lulus",
            Self::DropOut => "Drop Out",
            Self::Aktif | Self::Cuti => "Aktif",
        }
    }
}

/// Lifecycle status of a KRS entry as shown to the student
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EnrollmentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Taken
    #[sea_orm(string_value = "diambil")]
    Diambil,
    /// Rejected
    #[sea_orm(string_value = "ditolak")]
    Ditolak,
}

/// Approval state of a KRS entry
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ApprovalStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GradeStatus {
    #[sea_orm(string_value = "belum_dinilai")]
    BelumDinilai,
    #[sea_orm(string_value = "sudah_dinilai")]
    SudahDinilai,
}

/// Attendance mark for a single meeting
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AttendanceStatus {
    /// Present
    #[sea_orm(string_value = "hadir")]
    Hadir,
    /// Excused
    #[sea_orm(string_value = "izin")]
    Izin,
    /// Sick
    #[sea_orm(string_value = "sakit")]
    Sakit,
    /// Absent without notice
    #[sea_orm(string_value = "alfa")]
    Alfa,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MaterialType {
    #[sea_orm(string_value = "slide")]
    Slide,
    #[sea_orm(string_value = "video")]
    Video,
    #[sea_orm(string_value = "document")]
    Document,
    #[sea_orm(string_value = "link")]
    Link,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ClassType {
    /// Regular lecture
    #[default]
    #[sea_orm(string_value = "kuliah")]
    Kuliah,
    /// Exam
    #[sea_orm(string_value = "ujian")]
    Ujian,
    /// Lab session
    #[sea_orm(string_value = "praktikum")]
    Praktikum,
}

/// Whether a department head opens or closes a class for the current
/// academic year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ClassAction {
    /// Open
    Buka,
    /// Close
    Tutup,
}
