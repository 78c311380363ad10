use chrono::Utc;
use uuid::Uuid;

use crate::database::{get_pool, models::Client, utils::sql};

pub async fn create(client: &Client) -> Result<Client, sqlx::Error> {
    let client = sqlx::query_as::<_, Client>(&sql(r#"
        INSERT INTO
            clients (
                id,
                name,
                slug,
                is_active,
                created_at,
                updated_at
            )
        VALUES
            (?, ?, ?, ?, ?, ?)
        RETURNING
            id,
            name,
            slug,
            is_active,
            created_at,
            updated_at
    "#))
    .bind(client.id)
    .bind(&client.name)
    .bind(&client.slug)
    .bind(client.is_active)
    .bind(client.created_at)
    .bind(client.updated_at)
    .fetch_one(get_pool())
    .await?;

    Ok(client)
}

pub async fn update_name(id: Uuid, name: &str) -> Result<Client, sqlx::Error> {
    let client = sqlx::query_as::<_, Client>(&sql(r#"
        UPDATE
            clients
        SET
            name = ?,
            updated_at = ?
        WHERE
            id = ?
        RETURNING
            id,
            name,
            slug,
            is_active,
            created_at,
            updated_at
    "#))
    .bind(name)
    .bind(Utc::now())
    .bind(id)
    .fetch_one(get_pool())
    .await?;

    Ok(client)
}

pub async fn set_active(id: Uuid, active: bool) -> Result<Client, sqlx::Error> {
    let client = sqlx::query_as::<_, Client>(&sql(r#"
        UPDATE
            clients
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
            created_at,
            updated_at
    "#))
    .bind(active)
    .bind(Utc::now())
    .bind(id)
    .fetch_one(get_pool())
    .await?;

    Ok(client)
}

pub async fn find_by_slug(slug: &str) -> Result<Option<Client>, sqlx::Error> {
    let client = sqlx::query_as::<_, Client>(&sql(r#"
        SELECT
            id,
            name,
            slug,
            is_active,
            created_at,
            updated_at
        FROM
            clients
        WHERE
            slug = ?
    "#))
    .bind(slug)
    .fetch_optional(get_pool())
    .await?;

    Ok(client)
}

pub async fn find_by_id(id: Uuid) -> Result<Option<Client>, sqlx::Error> {
    let client = sqlx::query_as::<_, Client>(&sql(r#"
        SELECT
            id,
            name,
            slug,
            is_active,
            created_at,
            updated_at
        FROM
            clients
        WHERE
            id = ?
    "#))
    .bind(id)
    .fetch_optional(get_pool())
    .await?;

    Ok(client)
}

pub async fn list(include_inactive: bool) -> Result<Vec<Client>, sqlx::Error> {
    let clients = sqlx::query_as::<_, Client>(&sql(r#"
        SELECT
            id,
            name,
            slug,
            is_active,
            created_at,
            updated_at
        FROM
            clients
        WHERE
            is_active = TRUE
            OR ? = TRUE
        ORDER BY
            name
    "#))
    .bind(include_inactive)
    .fetch_all(get_pool())
    .await?;

    Ok(clients)
}

pub async fn slugs_starting_with(base: &str) -> Result<Vec<String>, sqlx::Error> {
    let slugs = sqlx::query_scalar::<_, String>(&sql(r#"
        SELECT
            slug
        FROM
            clients
        WHERE
            slug LIKE ?
    "#))
    .bind(format!("{}%", base))
    .fetch_all(get_pool())
    .await?;

    Ok(slugs)
}
