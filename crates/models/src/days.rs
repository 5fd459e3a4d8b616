use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Day of the week a class meets, using the campus' Indonesian day names
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Day {
    #[sea_orm(string_value = "senin")]
    Senin,
    #[sea_orm(string_value = "selasa")]
    Selasa,
    #[sea_orm(string_value = "rabu")]
    Rabu,
    #[sea_orm(string_value = "kamis")]
    Kamis,
    #[sea_orm(string_value = "jumat")]
    Jumat,
    #[sea_orm(string_value = "sabtu")]
    Sabtu,
    #[sea_orm(string_value = "minggu")]
    Minggu,
}

impl Day {
    /// Days in calendar order, Monday first
    pub const WEEK: [Self; 7] = [
        Self::Senin,
        Self::Selasa,
        Self::Rabu,
        Self::Kamis,
        Self::Jumat,
        Self::Sabtu,
        Self::Minggu,
    ];

    /// Position within the week, starting at 1 for Monday
    pub fn ordinal(self) -> u8 {
        match self {
            Self::Senin => 1,
            Self::Selasa => 2,
            Self::Rabu => 3,
            Self::Kamis => 4,
            Self::Jumat => 5,
            Self::Sabtu => 6,
            Self::Minggu => 7,
        }
    }

    /// Capitalised name used as the key of the weekly schedule view
    pub fn label(self) -> &'static str {
        match self {
            Self::Senin => "Senin",
            Self::Selasa => "Selasa",
            Self::Rabu => "Rabu",
            Self::Kamis => "Kamis",
            Self::Jumat => "Jumat",
            Self::Sabtu => "Sabtu",
            Self::Minggu => "Minggu",
        }
    }
}

impl PartialOrd for Day {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Day {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.ordinal().cmp(&other.ordinal())
    }
}
