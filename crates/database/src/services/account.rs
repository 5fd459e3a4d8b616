use super::student::normalize_phone;
use crate::{
    entities::{department_heads, lecturers, rectors, students, users},
    error::{ServiceError, ServiceResult},
};
use chrono::Utc;
use models::{
    academic_year::is_valid_semester,
    role::Role,
    status::{AcademicStatus, RecordStatus},
};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

/// Role-specific details of an account, resolved through the `user_id` on the
/// matching profile table
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "role", content = "detail", rename_all = "snake_case")]
pub enum Profile {
    Mahasiswa(students::Model),
    Dosen(lecturers::Model),
    Kajur(department_heads::Model),
    Rektor(rectors::Model),
}

impl Profile {
    pub fn role(&self) -> Role {
        match self {
            Self::Mahasiswa(_) => Role::Mahasiswa,
            Self::Dosen(_) => Role::Dosen,
            Self::Kajur(_) => Role::Kajur,
            Self::Rektor(_) => Role::Rektor,
        }
    }

    pub fn student(&self) -> ServiceResult<&students::Model> {
        match self {
            Self::Mahasiswa(student) => Ok(student),
            _ => Err(ServiceError::forbidden("only students can access this resource")),
        }
    }

    pub fn lecturer(&self) -> ServiceResult<&lecturers::Model> {
        match self {
            Self::Dosen(lecturer) => Ok(lecturer),
            _ => Err(ServiceError::forbidden("only lecturers can access this resource")),
        }
    }

    pub fn department_head(&self) -> ServiceResult<&department_heads::Model> {
        match self {
            Self::Kajur(head) => Ok(head),
            _ => Err(ServiceError::forbidden(
                "only department heads can access this resource",
            )),
        }
    }
}

/// An authenticated account together with its profile
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Account {
    pub user: users::Model,
    pub profile: Profile,
}

/// Registration input. The password arrives already hashed.
#[derive(Clone, Debug, Default)]
pub struct NewAccount {
    pub username: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Option<Role>,
    pub nim: Option<String>,
    pub nidn: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub semester: Option<i32>,
    pub academic_status: Option<AcademicStatus>,
}

fn char_len_between(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&value.chars().count())
}

/// Returns the trimmed value of a required role-specific field
fn required<'a>(value: &'a Option<String>, field: &str, role: Role) -> ServiceResult<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ServiceError::invalid(format!("{field} is required for role {role}")))
}

fn validate_identity_number(value: &str, field: &str) -> ServiceResult<()> {
    if char_len_between(value, 8, 20) {
        Ok(())
    } else {
        Err(ServiceError::invalid(format!(
            "{field} must be between 8 and 20 characters"
        )))
    }
}

pub struct AccountService;

impl AccountService {
    /// Creates the account and its role profile in one transaction. Nothing is
    /// persisted when either insert fails.
    pub async fn register(db: &DatabaseConnection, new: NewAccount) -> ServiceResult<Account> {
        let role = new
            .role
            .ok_or_else(|| ServiceError::invalid("role must be one of mahasiswa, dosen, kajur, rektor"))?;
        Self::validate_common(&new)?;

        let now = Utc::now();
        let txn = db.begin().await?;

        let user = users::Entity::insert(users::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(new.username.trim().to_string()),
            email: Set(new.email.trim().to_lowercase()),
            password_hash: Set(new.password_hash.clone()),
            role: Set(role),
            status: Set(RecordStatus::Aktif),
            created_at: Set(now),
            updated_at: Set(now),
        })
        .exec_with_returning(&txn)
        .await?;

        // Dropping `txn` on any error below rolls back the account row
        let profile = Self::insert_profile(&txn, &user, role, &new).await?;

        txn.commit().await?;
        log::info!("Registered {} account {}", role, user.username);

        Ok(Account { user, profile })
    }

    fn validate_common(new: &NewAccount) -> ServiceResult<()> {
        if !char_len_between(new.username.trim(), 3, 50) {
            return Err(ServiceError::invalid(
                "username must be between 3 and 50 characters",
            ));
        }
        if !char_len_between(new.name.trim(), 2, 100) {
            return Err(ServiceError::invalid(
                "name must be between 2 and 100 characters",
            ));
        }

        let email = new.email.trim();
        let valid_email = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !valid_email {
            return Err(ServiceError::invalid("email is not a valid address"));
        }

        if let Some(phone) = &new.phone {
            normalize_phone(phone)?;
        }

        if let Some(semester) = new.semester
            && !is_valid_semester(semester)
        {
            return Err(ServiceError::invalid("semester must be between 1 and 14"));
        }

        Ok(())
    }

    async fn insert_profile(
        txn: &impl ConnectionTrait,
        user: &users::Model,
        role: Role,
        new: &NewAccount,
    ) -> ServiceResult<Profile> {
        let now = Utc::now();
        let name = new.name.trim().to_string();
        let phone = new.phone.as_deref().map(normalize_phone).transpose()?;

        let profile = match role {
            Role::Mahasiswa => {
                let nim = required(&new.nim, "nim", role)?;
                validate_identity_number(nim, "nim")?;
                let department = required(&new.department, "department", role)?;

                let student = students::Entity::insert(students::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(user.id),
                    nim: Set(nim.to_string()),
                    name: Set(name),
                    department: Set(department.to_string()),
                    phone: Set(phone),
                    academic_status: Set(new.academic_status.unwrap_or_default()),
                    semester: Set(new.semester.unwrap_or(1)),
                    gpa: Set(0.0),
                    advisor_id: Set(None),
                    created_at: Set(now),
                    updated_at: Set(now),
                })
                .exec_with_returning(txn)
                .await?;
                Profile::Mahasiswa(student)
            }
            Role::Dosen => {
                let nidn = required(&new.nidn, "nidn", role)?;
                validate_identity_number(nidn, "nidn")?;
                let department = required(&new.department, "department", role)?;

                let lecturer = lecturers::Entity::insert(lecturers::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(user.id),
                    nidn: Set(nidn.to_string()),
                    name: Set(name),
                    email: Set(user.email.clone()),
                    department: Set(department.to_string()),
                    phone: Set(phone),
                    status: Set(RecordStatus::Aktif),
                    created_at: Set(now),
                    updated_at: Set(now),
                })
                .exec_with_returning(txn)
                .await?;
                Profile::Dosen(lecturer)
            }
            Role::Kajur => {
                let nidn = required(&new.nidn, "nidn", role)?;
                validate_identity_number(nidn, "nidn")?;
                let department = required(&new.department, "department", role)?;

                let head = department_heads::Entity::insert(department_heads::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(user.id),
                    nidn: Set(nidn.to_string()),
                    name: Set(name),
                    email: Set(user.email.clone()),
                    department: Set(department.to_string()),
                    status: Set(RecordStatus::Aktif),
                    created_at: Set(now),
                    updated_at: Set(now),
                })
                .exec_with_returning(txn)
                .await?;
                Profile::Kajur(head)
            }
            Role::Rektor => {
                let nidn = required(&new.nidn, "nidn", role)?;
                validate_identity_number(nidn, "nidn")?;

                let rector = rectors::Entity::insert(rectors::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(user.id),
                    nidn: Set(nidn.to_string()),
                    name: Set(name),
                    email: Set(user.email.clone()),
                    status: Set(RecordStatus::Aktif),
                    created_at: Set(now),
                    updated_at: Set(now),
                })
                .exec_with_returning(txn)
                .await?;
                Profile::Rektor(rector)
            }
        };

        Ok(profile)
    }

    /// Finds the account a login identifier refers to. Identifiers are tried
    /// as username, email, NIM, then NIDN of a lecturer, department head and
    /// rector, in that order.
    pub async fn find_by_identifier(
        db: &DatabaseConnection,
        identifier: &str,
    ) -> Result<Option<users::Model>, DbErr> {
        let identifier = identifier.trim();

        if let Some(user) = users::Entity::find()
            .filter(users::Column::Username.eq(identifier))
            .one(db)
            .await?
        {
            return Ok(Some(user));
        }

        if let Some(user) = users::Entity::find()
            .filter(users::Column::Email.eq(identifier.to_lowercase()))
            .one(db)
            .await?
        {
            return Ok(Some(user));
        }

        let user_id = if let Some(student) = students::Entity::find()
            .filter(students::Column::Nim.eq(identifier))
            .one(db)
            .await?
        {
            Some(student.user_id)
        } else if let Some(lecturer) = lecturers::Entity::find()
            .filter(lecturers::Column::Nidn.eq(identifier))
            .one(db)
            .await?
        {
            Some(lecturer.user_id)
        } else if let Some(head) = department_heads::Entity::find()
            .filter(department_heads::Column::Nidn.eq(identifier))
            .one(db)
            .await?
        {
            Some(head.user_id)
        } else {
            rectors::Entity::find()
                .filter(rectors::Column::Nidn.eq(identifier))
                .one(db)
                .await?
                .map(|rector| rector.user_id)
        };

        match user_id {
            Some(user_id) => users::Entity::find_by_id(user_id).one(db).await,
            None => Ok(None),
        }
    }

    /// Resolves the account to check a password against. Unknown identifiers
    /// and inactive accounts are rejected.
    pub async fn resolve_login(
        db: &DatabaseConnection,
        identifier: &str,
    ) -> ServiceResult<users::Model> {
        let user = Self::find_by_identifier(db, identifier)
            .await?
            .ok_or_else(|| ServiceError::Unauthenticated("invalid credentials".to_string()))?;

        if !user.is_active() {
            return Err(ServiceError::Unauthenticated(
                "account is not active".to_string(),
            ));
        }

        Ok(user)
    }

    /// Loads the profile row selected by the account's role tag
    pub async fn profile(db: &DatabaseConnection, user: &users::Model) -> ServiceResult<Profile> {
        let profile = match user.role {
            Role::Mahasiswa => students::Entity::find()
                .filter(students::Column::UserId.eq(user.id))
                .one(db)
                .await?
                .map(Profile::Mahasiswa),
            Role::Dosen => lecturers::Entity::find()
                .filter(lecturers::Column::UserId.eq(user.id))
                .one(db)
                .await?
                .map(Profile::Dosen),
            Role::Kajur => department_heads::Entity::find()
                .filter(department_heads::Column::UserId.eq(user.id))
                .one(db)
                .await?
                .map(Profile::Kajur),
            Role::Rektor => rectors::Entity::find()
                .filter(rectors::Column::UserId.eq(user.id))
                .one(db)
                .await?
                .map(Profile::Rektor),
        };

        profile.ok_or_else(|| ServiceError::not_found(format!("{} profile not found", user.role)))
    }

    /// Loads an active account and its profile by account id, as named in a
    /// token's subject
    pub async fn account(db: &DatabaseConnection, user_id: Uuid) -> ServiceResult<Account> {
        let user = users::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .filter(users::Model::is_active)
            .ok_or_else(|| {
                ServiceError::Unauthenticated("account not found or inactive".to_string())
            })?;

        let profile = Self::profile(db, &user).await?;
        Ok(Account { user, profile })
    }
}
