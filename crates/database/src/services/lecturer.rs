use super::contains_ignore_case;
use crate::{
    entities::{department_heads, lecturers, students},
    error::ServiceResult,
};
use futures::future::try_join_all;
use models::{
    pagination::{Page, PageRequest},
    status::RecordStatus,
};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use serde::Serialize;

#[derive(Clone, Debug, Default)]
pub struct LecturerFilter {
    pub status: Option<RecordStatus>,
    /// Substring of the name, NIDN or email
    pub search: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DepartmentLecturer {
    #[serde(flatten)]
    pub lecturer: lecturers::Model,
    /// Students this lecturer advises
    pub advisee_count: u64,
}

pub struct LecturerService;

impl LecturerService {
    /// Lecturers of the head's department, ordered by name
    pub async fn in_department(
        db: &DatabaseConnection,
        head: &department_heads::Model,
        filter: LecturerFilter,
        page: PageRequest,
    ) -> ServiceResult<Page<DepartmentLecturer>> {
        let mut condition =
            Condition::all().add(lecturers::Column::Department.eq(head.department.as_str()));

        if let Some(status) = filter.status {
            condition = condition.add(lecturers::Column::Status.eq(status));
        }
        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            condition = condition.add(
                Condition::any()
                    .add(contains_ignore_case((lecturers::Entity, lecturers::Column::Name), search))
                    .add(contains_ignore_case((lecturers::Entity, lecturers::Column::Nidn), search))
                    .add(contains_ignore_case((lecturers::Entity, lecturers::Column::Email), search)),
            );
        }

        let query = lecturers::Entity::find()
            .filter(condition)
            .order_by_asc(lecturers::Column::Name);

        let total = query.clone().count(db).await?;
        let lecturers = query.paginate(db, page.limit).fetch_page(page.index()).await?;

        let with_counts = lecturers.into_iter().map(|lecturer| async move {
            let advisee_count = students::Entity::find()
                .filter(students::Column::AdvisorId.eq(lecturer.id))
                .count(db)
                .await?;

            Ok::<_, DbErr>(DepartmentLecturer {
                lecturer,
                advisee_count,
            })
        });

        Ok(Page {
            items: try_join_all(with_counts).await?,
            request: page,
            total,
        })
    }
}
