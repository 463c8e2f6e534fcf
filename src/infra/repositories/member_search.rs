//! Conditional member search over `member LEFT JOIN team`.
//!
//! Every unset filter is left out of the `WHERE` clause entirely; the
//! remaining predicates are joined with `AND`.

use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, FromQueryResult, JoinType, Order, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select,
};

use super::entities::{member, team};
use crate::domain::{MemberDto, MemberSearchCondition};
use crate::errors::{AppError, AppResult};
use crate::types::{Direction, PageRequest};

/// Row shape of the search projection
#[derive(Debug, FromQueryResult)]
pub(crate) struct MemberDtoRow {
    pub id: i64,
    pub username: String,
    pub age: i32,
    pub team_id: Option<i64>,
    pub teamname: Option<String>,
}

impl From<MemberDtoRow> for MemberDto {
    fn from(row: MemberDtoRow) -> Self {
        MemberDto::new(row.id, row.username, row.age, row.team_id, row.teamname)
    }
}

/// Build the `AND` of the active filters of `cond`.
pub(crate) fn search_filter(cond: &MemberSearchCondition) -> Condition {
    Condition::all()
        .add_option(cond.username_filter().map(|name| member::Column::Username.eq(name)))
        .add_option(cond.teamname_filter().map(|name| team::Column::Name.eq(name)))
        .add_option(cond.age_goe.map(|age| member::Column::Age.gte(age)))
        .add_option(cond.age_loe.map(|age| member::Column::Age.lte(age)))
}

/// Members left-joined to their team and filtered by `cond`, selecting
/// every member column.
pub(crate) fn filtered_members(cond: &MemberSearchCondition) -> Select<member::Entity> {
    let query = member::Entity::find().join(JoinType::LeftJoin, member::Relation::Team.def());

    let filter = search_filter(cond);
    if filter.is_empty() {
        query
    } else {
        query.filter(filter)
    }
}

/// The search projection: member id, username, age, team id and team name.
pub(crate) fn search_query(cond: &MemberSearchCondition) -> Select<member::Entity> {
    filtered_members(cond)
        .select_only()
        .column(member::Column::Id)
        .column(member::Column::Username)
        .column(member::Column::Age)
        .column_as(team::Column::Id, "team_id")
        .column_as(team::Column::Name, "teamname")
}

/// Resolve a sort property to a column.
///
/// `teamname` is only available on queries that join `team`.
fn sort_column(property: &str, joins_team: bool) -> AppResult<SimpleExpr> {
    let column = match property {
        "id" => Expr::col((member::Entity, member::Column::Id)),
        "username" => Expr::col((member::Entity, member::Column::Username)),
        "age" => Expr::col((member::Entity, member::Column::Age)),
        "teamname" | "team.name" if joins_team => Expr::col((team::Entity, team::Column::Name)),
        other => {
            return Err(AppError::bad_request(format!(
                "unknown sort property '{}'",
                other
            )))
        }
    };
    Ok(column.into())
}

/// Apply the requested orders, falling back to `member.id` ascending.
pub(crate) fn apply_sort(
    mut query: Select<member::Entity>,
    request: &PageRequest,
    joins_team: bool,
) -> AppResult<Select<member::Entity>> {
    if request.sort.is_empty() {
        return Ok(query.order_by_asc(member::Column::Id));
    }

    for order in &request.sort {
        let direction = match order.direction {
            Direction::Asc => Order::Asc,
            Direction::Desc => Order::Desc,
        };
        query = query.order_by(sort_column(&order.property, joins_team)?, direction);
    }
    Ok(query)
}

/// Apply sort orders plus the offset and limit of `request`.
pub(crate) fn apply_page(
    query: Select<member::Entity>,
    request: &PageRequest,
    joins_team: bool,
) -> AppResult<Select<member::Entity>> {
    Ok(apply_sort(query, request, joins_team)?
        .offset(request.offset())
        .limit(request.size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SortOrder;
    use sea_orm::{DbBackend, QueryTrait};

    fn sql(cond: &MemberSearchCondition) -> String {
        search_query(cond).build(DbBackend::Postgres).to_string()
    }

    #[test]
    fn test_no_filters_has_no_where_clause() {
        let sql = sql(&MemberSearchCondition::default());

        assert!(sql.contains(r#"LEFT JOIN "team""#));
        assert!(!sql.contains("WHERE"));
    }

    #[test]
    fn test_blank_strings_are_omitted() {
        let cond = MemberSearchCondition::default()
            .with_username(" ")
            .with_teamname("");
        assert!(!sql(&cond).contains("WHERE"));
    }

    #[test]
    fn test_active_filters_are_anded() {
        let cond = MemberSearchCondition::default()
            .with_teamname("teamB")
            .with_age_between(Some(35), Some(40));
        let sql = sql(&cond);

        assert!(sql.contains(r#""team"."name" = 'teamB'"#));
        assert!(sql.contains(r#""member"."age" >= 35"#));
        assert!(sql.contains(r#""member"."age" <= 40"#));
        assert!(!sql.contains(r#""member"."username" ="#));
        assert!(!sql.contains(" OR "));
    }

    #[test]
    fn test_projection_columns() {
        let sql = sql(&MemberSearchCondition::default());

        assert!(sql.contains(r#""team"."id" AS "team_id""#));
        assert!(sql.contains(r#""team"."name" AS "teamname""#));
    }

    #[test]
    fn test_page_applies_sort_offset_limit() {
        let request = PageRequest::of(2, 10).with_sort(SortOrder::desc("username"));
        let query = apply_page(search_query(&MemberSearchCondition::default()), &request, true)
            .unwrap();
        let sql = query.build(DbBackend::Postgres).to_string();

        assert!(sql.contains(r#"ORDER BY "member"."username" DESC"#));
        assert!(sql.contains("LIMIT 10"));
        assert!(sql.contains("OFFSET 20"));
    }

    #[test]
    fn test_default_order_is_member_id() {
        let query = apply_sort(member::Entity::find(), &PageRequest::of(0, 5), false).unwrap();
        let sql = query.build(DbBackend::Postgres).to_string();

        assert!(sql.contains(r#"ORDER BY "member"."id" ASC"#));
    }

    #[test]
    fn test_unknown_sort_property_is_bad_request() {
        let request = PageRequest::of(0, 5).with_sort(SortOrder::asc("password"));
        let result = apply_sort(member::Entity::find(), &request, true);
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        // teamname needs the join
        let request = PageRequest::of(0, 5).with_sort(SortOrder::asc("teamname"));
        let result = apply_sort(member::Entity::find(), &request, false);
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
