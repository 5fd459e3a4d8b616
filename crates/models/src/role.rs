use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Role tag stored on every account; selects which profile table holds the
/// account's details
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
pub enum Role {
    /// Student
    #[sea_orm(string_value = "mahasiswa")]
    Mahasiswa,
    /// Lecturer
    #[sea_orm(string_value = "dosen")]
    Dosen,
    /// Department head
    #[sea_orm(string_value = "kajur")]
    Kajur,
    #[sea_orm(string_value = "rektor")]
    Rektor,
}

impl Role {
    /// Whether this role may maintain the course catalog
    pub fn manages_catalog(self) -> bool {
        matches!(self, Self::Kajur | Self::Rektor)
    }
}
