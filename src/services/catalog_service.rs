use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::catalog::{CityWithDistricts, ServiceGroupWithServices, TagGroupWithTags, TaxonomyList},
    error::AppResult,
    models::TaxonomyItem,
    response::ApiResponse,
};

#[derive(sqlx::FromRow)]
struct GroupedRow {
    group_id: Uuid,
    group_name: String,
    group_slug: String,
    id: Option<Uuid>,
    name: Option<String>,
    slug: Option<String>,
}

/// Cities with their districts nested, for the location picker.
pub async fn cities_with_districts(
    pool: &DbPool,
) -> AppResult<ApiResponse<Vec<CityWithDistricts>>> {
    let rows: Vec<GroupedRow> = sqlx::query_as(
        r#"
        SELECT c.id AS group_id, c.name AS group_name, c.slug AS group_slug,
               d.id, d.name, d.slug
        FROM cities c
        LEFT JOIN districts d ON d.city_id = c.id
        ORDER BY c.name, d.name
        "#,
    )
    .fetch_all(pool)
    .await?;

    let groups = group_rows(rows)
        .into_iter()
        .map(|(id, name, slug, children)| CityWithDistricts {
            id,
            name,
            slug,
            districts: children,
        })
        .collect();

    Ok(ApiResponse::success("Cities", groups, None))
}

/// Service groups with their services nested, for the filter sidebar.
pub async fn service_groups_with_services(
    pool: &DbPool,
) -> AppResult<ApiResponse<Vec<ServiceGroupWithServices>>> {
    let rows: Vec<GroupedRow> = sqlx::query_as(
        r#"
        SELECT g.id AS group_id, g.name AS group_name, g.slug AS group_slug,
               s.id, s.name, s.slug
        FROM service_groups g
        LEFT JOIN services s ON s.group_id = g.id
        ORDER BY g.name, s.name
        "#,
    )
    .fetch_all(pool)
    .await?;

    let groups = group_rows(rows)
        .into_iter()
        .map(|(id, name, slug, children)| ServiceGroupWithServices {
            id,
            name,
            slug,
            services: children,
        })
        .collect();

    Ok(ApiResponse::success("Service groups", groups, None))
}

/// Tag groups with their tags nested.
pub async fn tag_groups_with_tags(pool: &DbPool) -> AppResult<ApiResponse<Vec<TagGroupWithTags>>> {
    let rows: Vec<GroupedRow> = sqlx::query_as(
        r#"
        SELECT g.id AS group_id, g.name AS group_name, g.slug AS group_slug,
               t.id, t.name, t.slug
        FROM tag_groups g
        LEFT JOIN tags t ON t.group_id = g.id
        ORDER BY g.name, t.name
        "#,
    )
    .fetch_all(pool)
    .await?;

    let groups = group_rows(rows)
        .into_iter()
        .map(|(id, name, slug, children)| TagGroupWithTags {
            id,
            name,
            slug,
            tags: children,
        })
        .collect();

    Ok(ApiResponse::success("Tag groups", groups, None))
}

/// Flat taxonomy list for the simple tables (categories, cuisine types,
/// delivery models, customer segments). `table` is a fixed name supplied by
/// the route layer, never caller input.
pub async fn flat_list(pool: &DbPool, table: &str) -> AppResult<ApiResponse<TaxonomyList>> {
    let sql = format!("SELECT id, name, slug FROM {table} ORDER BY name");
    let items: Vec<TaxonomyItem> = sqlx::query_as(&sql).fetch_all(pool).await?;
    Ok(ApiResponse::success(
        "Taxonomy",
        TaxonomyList { items },
        None,
    ))
}

/// Fold ordered parent/child rows into groups, preserving row order. Parents
/// without children keep an empty list.
fn group_rows(rows: Vec<GroupedRow>) -> Vec<(Uuid, String, String, Vec<TaxonomyItem>)> {
    let mut groups: Vec<(Uuid, String, String, Vec<TaxonomyItem>)> = Vec::new();
    for row in rows {
        if groups.last().map(|g| g.0) != Some(row.group_id) {
            groups.push((row.group_id, row.group_name, row.group_slug, Vec::new()));
        }
        if let (Some(id), Some(name), Some(slug)) = (row.id, row.name, row.slug) {
            if let Some(last) = groups.last_mut() {
                last.3.push(TaxonomyItem { id, name, slug });
            }
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(group: Uuid, child: Option<&str>) -> GroupedRow {
        GroupedRow {
            group_id: group,
            group_name: "g".into(),
            group_slug: "g".into(),
            id: child.map(|_| Uuid::new_v4()),
            name: child.map(String::from),
            slug: child.map(String::from),
        }
    }

    #[test]
    fn groups_consecutive_rows_and_keeps_childless_parents() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let grouped = group_rows(vec![
            row(a, Some("one")),
            row(a, Some("two")),
            row(b, None),
        ]);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].3.len(), 2);
        assert!(grouped[1].3.is_empty());
    }
}
