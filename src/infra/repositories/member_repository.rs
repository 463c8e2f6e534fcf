//! Member repository: derived queries, projections, paging and search.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    AccessMode, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, JoinType, LoaderTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Select, Set, TransactionTrait,
};

use super::entities::member::{self, ActiveModel, Entity as MemberEntity};
use super::entities::team::{self, Entity as TeamEntity};
use super::member_search::{apply_page, apply_sort, filtered_members, search_query, MemberDtoRow};
use crate::domain::{
    Member, MemberDto, MemberSearchCondition, MemberTeamDto, MemberWithTeam, NewMember, Team,
    UsernameOnly,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::types::{page_or_count, Page, PageRequest, Slice};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Member repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Persist a new member
    async fn save(&self, member: NewMember) -> AppResult<Member>;

    /// Find member by ID
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Member>>;

    /// List all members ordered by ID
    async fn find_all(&self) -> AppResult<Vec<Member>>;

    /// Page over all members
    async fn find_all_paged(&self, request: &PageRequest) -> AppResult<Page<Member>>;

    /// Count all members
    async fn count(&self) -> AppResult<u64>;

    /// Delete member by ID, returning the number of rows removed
    async fn delete(&self, id: i64) -> AppResult<u64>;

    /// Move a member to another team (or out of any team)
    async fn change_team(&self, id: i64, team_id: Option<i64>) -> AppResult<Member>;

    /// Change a member's username
    async fn rename(&self, id: i64, username: String) -> AppResult<Member>;

    /// Members with the given username and an age strictly above `age`
    async fn find_by_username_and_age_greater_than(
        &self,
        username: &str,
        age: i32,
    ) -> AppResult<Vec<Member>>;

    /// First three members by ID
    async fn find_top3(&self) -> AppResult<Vec<Member>>;

    /// Members matching both username and age
    async fn find_user(&self, username: &str, age: i32) -> AppResult<Vec<Member>>;

    /// Members that belong to a team, with the team name
    async fn find_member_dto(&self) -> AppResult<Vec<MemberTeamDto>>;

    /// Members whose username is in `names`
    async fn find_by_names(&self, names: Vec<String>) -> AppResult<Vec<Member>>;

    /// Page over members of the given age
    async fn find_page_by_age(&self, age: i32, request: &PageRequest) -> AppResult<Page<Member>>;

    /// Slice over members of the given age, without a count query
    async fn find_slice_by_age(&self, age: i32, request: &PageRequest)
        -> AppResult<Slice<Member>>;

    /// Add one to the age of every member aged `age` or older
    async fn bulk_age_plus(&self, age: i32) -> AppResult<u64>;

    /// Members with their team, loaded in a single joined query
    async fn find_member_fetch_join(&self) -> AppResult<Vec<MemberWithTeam>>;

    /// All members with their team loaded eagerly
    async fn find_all_with_team(&self) -> AppResult<Vec<MemberWithTeam>>;

    /// Members with their team loaded through a batched second query
    async fn find_member_entity_graph(&self) -> AppResult<Vec<MemberWithTeam>>;

    /// Members with the given username, team loaded eagerly
    async fn find_by_username(&self, username: &str) -> AppResult<Vec<MemberWithTeam>>;

    /// Members with the given username, read inside a read-only transaction
    async fn find_read_only_by_username(&self, username: &str) -> AppResult<Vec<Member>>;

    /// Username projection of members with the given username
    async fn find_projections_by_username(&self, username: &str) -> AppResult<Vec<UsernameOnly>>;

    /// Conditional search returning every match
    async fn search(&self, cond: &MemberSearchCondition) -> AppResult<Vec<MemberDto>>;

    /// Conditional search; always runs the count query
    async fn search_page_simple(
        &self,
        cond: &MemberSearchCondition,
        request: &PageRequest,
    ) -> AppResult<Page<MemberDto>>;

    /// Conditional search; runs the count query only when the total
    /// cannot be derived from the page itself
    async fn search_page_complex(
        &self,
        cond: &MemberSearchCondition,
        request: &PageRequest,
    ) -> AppResult<Page<MemberDto>>;
}

#[derive(Debug, FromQueryResult)]
struct MemberTeamRow {
    id: i64,
    username: String,
    teamname: String,
}

#[derive(Debug, FromQueryResult)]
struct UsernameRow {
    username: String,
}

/// Members with the given username, ordered by ID
pub(crate) fn by_username(username: &str) -> Select<MemberEntity> {
    MemberEntity::find()
        .filter(member::Column::Username.eq(username))
        .order_by_asc(member::Column::Id)
}

/// Pair each member with its team, loading the teams in one batched query.
async fn with_teams<C>(db: &C, models: Vec<member::Model>) -> AppResult<Vec<MemberWithTeam>>
where
    C: ConnectionTrait,
{
    let teams = models.load_one(TeamEntity, db).await?;

    Ok(models
        .into_iter()
        .zip(teams)
        .map(|(model, team)| MemberWithTeam {
            member: Member::from(model),
            team: team.map(Team::from),
        })
        .collect())
}

/// Update the username of an existing member.
pub(crate) async fn rename_member<C>(
    db: &C,
    id: i64,
    username: String,
    auditor: &str,
) -> AppResult<Member>
where
    C: ConnectionTrait,
{
    let model = MemberEntity::find_by_id(id).one(db).await?.ok_or_not_found()?;

    let mut active: ActiveModel = model.into();
    active.username = Set(username);
    active.last_modified_by = Set(auditor.to_string());

    let model = active.update(db).await?;
    Ok(Member::from(model))
}

/// Concrete implementation of MemberRepository
pub struct MemberStore {
    db: DatabaseConnection,
    auditor: String,
}

impl MemberStore {
    /// Create new repository instance; `auditor` is recorded as the author
    /// of every change made through it.
    pub fn new(db: DatabaseConnection, auditor: impl Into<String>) -> Self {
        Self {
            db,
            auditor: auditor.into(),
        }
    }

    async fn load_page(
        &self,
        query: Select<MemberEntity>,
        request: &PageRequest,
        total: u64,
        joins_team: bool,
    ) -> AppResult<Page<Member>> {
        let models = apply_page(query, request, joins_team)?.all(&self.db).await?;
        let content = models.into_iter().map(Member::from).collect();
        Ok(Page::new(content, request, total))
    }

    async fn search_content(
        &self,
        cond: &MemberSearchCondition,
        request: &PageRequest,
    ) -> AppResult<Vec<MemberDto>> {
        let rows = apply_page(search_query(cond), request, true)?
            .into_model::<MemberDtoRow>()
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(MemberDto::from).collect())
    }
}

#[async_trait]
impl MemberRepository for MemberStore {
    async fn save(&self, member: NewMember) -> AppResult<Member> {
        let active_model = ActiveModel {
            username: Set(member.username),
            age: Set(member.age),
            team_id: Set(member.team_id),
            created_by: Set(self.auditor.clone()),
            last_modified_by: Set(self.auditor.clone()),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await?;
        Ok(Member::from(model))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Member>> {
        let result = MemberEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Member::from))
    }

    async fn find_all(&self) -> AppResult<Vec<Member>> {
        let models = MemberEntity::find()
            .order_by_asc(member::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Member::from).collect())
    }

    async fn find_all_paged(&self, request: &PageRequest) -> AppResult<Page<Member>> {
        let total = MemberEntity::find().count(&self.db).await?;
        self.load_page(MemberEntity::find(), request, total, false).await
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(MemberEntity::find().count(&self.db).await?)
    }

    async fn delete(&self, id: i64) -> AppResult<u64> {
        let result = MemberEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }

    async fn change_team(&self, id: i64, team_id: Option<i64>) -> AppResult<Member> {
        let model = MemberEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found()?;

        let mut active: ActiveModel = model.into();
        active.team_id = Set(team_id);
        active.last_modified_by = Set(self.auditor.clone());

        let model = active.update(&self.db).await?;
        Ok(Member::from(model))
    }

    async fn rename(&self, id: i64, username: String) -> AppResult<Member> {
        rename_member(&self.db, id, username, &self.auditor).await
    }

    async fn find_by_username_and_age_greater_than(
        &self,
        username: &str,
        age: i32,
    ) -> AppResult<Vec<Member>> {
        let models = by_username(username)
            .filter(member::Column::Age.gt(age))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Member::from).collect())
    }

    async fn find_top3(&self) -> AppResult<Vec<Member>> {
        let models = MemberEntity::find()
            .order_by_asc(member::Column::Id)
            .limit(3)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Member::from).collect())
    }

    async fn find_user(&self, username: &str, age: i32) -> AppResult<Vec<Member>> {
        let models = MemberEntity::find()
            .filter(member::Column::Username.eq(username))
            .filter(member::Column::Age.eq(age))
            .order_by_asc(member::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Member::from).collect())
    }

    async fn find_member_dto(&self) -> AppResult<Vec<MemberTeamDto>> {
        let rows = MemberEntity::find()
            .select_only()
            .column(member::Column::Id)
            .column(member::Column::Username)
            .column_as(team::Column::Name, "teamname")
            .join(JoinType::InnerJoin, member::Relation::Team.def())
            .order_by_asc(member::Column::Id)
            .into_model::<MemberTeamRow>()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| MemberTeamDto {
                id: row.id,
                username: row.username,
                teamname: row.teamname,
            })
            .collect())
    }

    async fn find_by_names(&self, names: Vec<String>) -> AppResult<Vec<Member>> {
        let models = MemberEntity::find()
            .filter(member::Column::Username.is_in(names))
            .order_by_asc(member::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Member::from).collect())
    }

    async fn find_page_by_age(&self, age: i32, request: &PageRequest) -> AppResult<Page<Member>> {
        // The data query joins team; the count query stays on member alone.
        let data = MemberEntity::find()
            .join(JoinType::LeftJoin, member::Relation::Team.def())
            .filter(member::Column::Age.eq(age));
        let total = MemberEntity::find()
            .filter(member::Column::Age.eq(age))
            .count(&self.db)
            .await?;

        self.load_page(data, request, total, true).await
    }

    async fn find_slice_by_age(
        &self,
        age: i32,
        request: &PageRequest,
    ) -> AppResult<Slice<Member>> {
        let query = MemberEntity::find().filter(member::Column::Age.eq(age));
        let models = apply_sort(query, request, false)?
            .offset(request.offset())
            .limit(request.size + 1)
            .all(&self.db)
            .await?;

        let rows = models.into_iter().map(Member::from).collect();
        Ok(Slice::new(rows, request))
    }

    async fn bulk_age_plus(&self, age: i32) -> AppResult<u64> {
        let result = MemberEntity::update_many()
            .col_expr(member::Column::Age, Expr::col(member::Column::Age).add(1))
            .filter(member::Column::Age.gte(age))
            .exec(&self.db)
            .await?;

        tracing::debug!(age, rows = result.rows_affected, "bulk age update");
        Ok(result.rows_affected)
    }

    async fn find_member_fetch_join(&self) -> AppResult<Vec<MemberWithTeam>> {
        let rows = MemberEntity::find()
            .find_also_related(TeamEntity)
            .order_by_asc(member::Column::Id)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(model, team)| MemberWithTeam {
                member: Member::from(model),
                team: team.map(Team::from),
            })
            .collect())
    }

    async fn find_all_with_team(&self) -> AppResult<Vec<MemberWithTeam>> {
        let models = MemberEntity::find()
            .order_by_asc(member::Column::Id)
            .all(&self.db)
            .await?;
        with_teams(&self.db, models).await
    }

    async fn find_member_entity_graph(&self) -> AppResult<Vec<MemberWithTeam>> {
        self.find_all_with_team().await
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Vec<MemberWithTeam>> {
        let models = by_username(username).all(&self.db).await?;
        with_teams(&self.db, models).await
    }

    async fn find_read_only_by_username(&self, username: &str) -> AppResult<Vec<Member>> {
        let txn = self
            .db
            .begin_with_config(None, Some(AccessMode::ReadOnly))
            .await?;

        let models = by_username(username).all(&txn).await?;
        txn.commit().await?;

        Ok(models.into_iter().map(Member::from).collect())
    }

    async fn find_projections_by_username(&self, username: &str) -> AppResult<Vec<UsernameOnly>> {
        let rows = by_username(username)
            .select_only()
            .column(member::Column::Username)
            .into_model::<UsernameRow>()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| UsernameOnly {
                username: row.username,
            })
            .collect())
    }

    async fn search(&self, cond: &MemberSearchCondition) -> AppResult<Vec<MemberDto>> {
        let rows = search_query(cond)
            .order_by_asc(member::Column::Id)
            .into_model::<MemberDtoRow>()
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(MemberDto::from).collect())
    }

    async fn search_page_simple(
        &self,
        cond: &MemberSearchCondition,
        request: &PageRequest,
    ) -> AppResult<Page<MemberDto>> {
        let (content, total) = tokio::try_join!(
            self.search_content(cond, request),
            async {
                filtered_members(cond)
                    .count(&self.db)
                    .await
                    .map_err(AppError::from)
            },
        )?;

        Ok(Page::new(content, request, total))
    }

    async fn search_page_complex(
        &self,
        cond: &MemberSearchCondition,
        request: &PageRequest,
    ) -> AppResult<Page<MemberDto>> {
        let content = self.search_content(cond, request).await?;

        let db = &self.db;
        page_or_count(content, request, move || async move {
            tracing::debug!("running deferred member count query");
            filtered_members(cond).count(db).await.map_err(AppError::from)
        })
        .await
    }
}
