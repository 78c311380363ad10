use chrono::Utc;
use sqlx::{Postgres, Transaction};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::database::{
    get_pool,
    models::{Project, ProjectInput},
    utils::sql,
};

pub async fn create(
    tx: &mut Transaction<'_, Postgres>,
    project: &Project,
) -> Result<Project, sqlx::Error> {
    let project = sqlx::query_as::<_, Project>(&sql(r#"
        INSERT INTO
            projects (
                id,
                name,
                slug,
                is_active,
                is_public,
                is_chargable,
                client_id,
                created_at,
                updated_at
            )
        VALUES
            (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING
            id,
            name,
            slug,
            is_active,
            is_public,
            is_chargable,
            client_id,
            created_at,
            updated_at
    "#))
    .bind(project.id)
    .bind(&project.name)
    .bind(&project.slug)
    .bind(project.is_active)
    .bind(project.is_public)
    .bind(project.is_chargable)
    .bind(project.client_id)
    .bind(project.created_at)
    .bind(project.updated_at)
    .fetch_one(&mut **tx)
    .await?;

    Ok(project)
}

pub async fn update(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    input: &ProjectInput,
) -> Result<Project, sqlx::Error> {
    let project = sqlx::query_as::<_, Project>(&sql(r#"
        UPDATE
            projects
        SET
            name = ?,
            is_public = COALESCE(?, is_public),
            is_chargable = COALESCE(?, is_chargable),
            client_id = ?,
            updated_at = ?
        WHERE
            id = ?
        RETURNING
            id,
            name,
            slug,
            is_active,
            is_public,
            is_chargable,
            client_id,
            created_at,
            updated_at
    "#))
    .bind(&input.name)
    .bind(input.is_public)
    .bind(input.is_chargable)
    .bind(input.client_id)
    .bind(Utc::now())
    .bind(id)
    .fetch_one(&mut **tx)
    .await?;

    Ok(project)
}

/// Replaces the manager and member lists wholesale.
pub async fn set_people(
    tx: &mut Transaction<'_, Postgres>,
    project_id: Uuid,
    managers: &[Uuid],
    members: &[Uuid],
) -> Result<(), sqlx::Error> {
    sqlx::query(&sql(r#"
        DELETE FROM
            project_managers
        WHERE
            project_id = ?
    "#))
    .bind(project_id)
    .execute(&mut **tx)
    .await?;

    sqlx::query(&sql(r#"
        DELETE FROM
            project_members
        WHERE
            project_id = ?
    "#))
    .bind(project_id)
    .execute(&mut **tx)
    .await?;

    for employee_id in managers.iter().collect::<BTreeSet<_>>() {
        sqlx::query(&sql(r#"
            INSERT INTO
                project_managers (project_id, employee_id)
            VALUES
                (?, ?)
        "#))
        .bind(project_id)
        .bind(employee_id)
        .execute(&mut **tx)
        .await?;
    }

    for employee_id in members.iter().collect::<BTreeSet<_>>() {
        sqlx::query(&sql(r#"
            INSERT INTO
                project_members (project_id, employee_id)
            VALUES
                (?, ?)
        "#))
        .bind(project_id)
        .bind(employee_id)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

pub async fn set_active(id: Uuid, active: bool) -> Result<Project, sqlx::Error> {
    let project = sqlx::query_as::<_, Project>(&sql(r#"
        UPDATE
            projects
        SET
            is_active = ?,
            updated_at = ?
        WHERE
            id = ?
        RETURNING
            id,
            name,
            slug,
            is_active,
            is_public,
            is_chargable,
            client_id,
            created_at,
            updated_at
    "#))
    .bind(active)
    .bind(Utc::now())
    .bind(id)
    .fetch_one(get_pool())
    .await?;

    Ok(project)
}

pub async fn find_by_slug(slug: &str) -> Result<Option<Project>, sqlx::Error> {
    let project = sqlx::query_as::<_, Project>(&sql(r#"
        SELECT
            id,
            name,
            slug,
            is_active,
            is_public,
            is_chargable,
            client_id,
            created_at,
            updated_at
        FROM
            projects
        WHERE
            slug = ?
    "#))
    .bind(slug)
    .fetch_optional(get_pool())
    .await?;

    Ok(project)
}

pub async fn find_by_id(id: Uuid) -> Result<Option<Project>, sqlx::Error> {
    let project = sqlx::query_as::<_, Project>(&sql(r#"
        SELECT
            id,
            name,
            slug,
            is_active,
            is_public,
            is_chargable,
            client_id,
            created_at,
            updated_at
        FROM
            projects
        WHERE
            id = ?
    "#))
    .bind(id)
    .fetch_optional(get_pool())
    .await?;

    Ok(project)
}

pub async fn list(include_inactive: bool) -> Result<Vec<Project>, sqlx::Error> {
    let projects = sqlx::query_as::<_, Project>(&sql(r#"
        SELECT
            id,
            name,
            slug,
            is_active,
            is_public,
            is_chargable,
            client_id,
            created_at,
            updated_at
        FROM
            projects
        WHERE
            is_active = TRUE
            OR ? = TRUE
        ORDER BY
            name
    "#))
    .bind(include_inactive)
    .fetch_all(get_pool())
    .await?;

    Ok(projects)
}

/// Projects the employee may report hours on: active, and either public or
/// with the employee on the member list.
pub async fn available_for(employee_id: Uuid) -> Result<Vec<Project>, sqlx::Error> {
    let projects = sqlx::query_as::<_, Project>(&sql(r#"
        SELECT
            id,
            name,
            slug,
            is_active,
            is_public,
            is_chargable,
            client_id,
            created_at,
            updated_at
        FROM
            projects
        WHERE
            is_active = TRUE
            AND (
                is_public = TRUE
                OR EXISTS (
                    SELECT
                        1
                    FROM
                        project_members
                    WHERE
                        project_id = projects.id
                        AND employee_id = ?
                )
            )
        ORDER BY
            name
    "#))
    .bind(employee_id)
    .fetch_all(get_pool())
    .await?;

    Ok(projects)
}

pub async fn managers_of(project_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
    let ids = sqlx::query_scalar::<_, Uuid>(&sql(r#"
        SELECT
            employee_id
        FROM
            project_managers
        WHERE
            project_id = ?
    "#))
    .bind(project_id)
    .fetch_all(get_pool())
    .await?;

    Ok(ids)
}

pub async fn members_of(project_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
    let ids = sqlx::query_scalar::<_, Uuid>(&sql(r#"
        SELECT
            employee_id
        FROM
            project_members
        WHERE
            project_id = ?
    "#))
    .bind(project_id)
    .fetch_all(get_pool())
    .await?;

    Ok(ids)
}

pub async fn managed_project_ids(employee_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
    let ids = sqlx::query_scalar::<_, Uuid>(&sql(r#"
        SELECT
            project_id
        FROM
            project_managers
        WHERE
            employee_id = ?
    "#))
    .bind(employee_id)
    .fetch_all(get_pool())
    .await?;

    Ok(ids)
}

pub async fn slugs_starting_with(base: &str) -> Result<Vec<String>, sqlx::Error> {
    let slugs = sqlx::query_scalar::<_, String>(&sql(r#"
        SELECT
            slug
        FROM
            projects
        WHERE
            slug LIKE ?
    "#))
    .bind(format!("{}%", base))
    .fetch_all(get_pool())
    .await?;

    Ok(slugs)
}
