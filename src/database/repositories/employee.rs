use chrono::Utc;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::database::{
    get_pool,
    models::{Employee, UpdateEmployeeInput},
    utils::sql,
};

pub async fn create(employee: &Employee) -> Result<Employee, sqlx::Error> {
    let employee = sqlx::query_as::<_, Employee>(&sql(r#"
        INSERT INTO
            employees (
                id,
                email,
                password_hash,
                first_name,
                last_name,
                slug,
                tax_id,
                is_admin,
                is_active,
                created_at,
                updated_at
            )
        VALUES
            (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING
            id,
            email,
            password_hash,
            first_name,
            last_name,
            slug,
            tax_id,
            is_admin,
            is_active,
            created_at,
            updated_at
    "#))
    .bind(employee.id)
    .bind(&employee.email)
    .bind(&employee.password_hash)
    .bind(&employee.first_name)
    .bind(&employee.last_name)
    .bind(&employee.slug)
    .bind(&employee.tax_id)
    .bind(employee.is_admin)
    .bind(employee.is_active)
    .bind(employee.created_at)
    .bind(employee.updated_at)
    .fetch_one(get_pool())
    .await?;

    Ok(employee)
}

pub async fn update(id: Uuid, input: &UpdateEmployeeInput) -> Result<Employee, sqlx::Error> {
    let employee = sqlx::query_as::<_, Employee>(&sql(r#"
        UPDATE
            employees
        SET
            email = ?,
            first_name = ?,
            last_name = ?,
            tax_id = ?,
            is_admin = COALESCE(?, is_admin),
            updated_at = ?
        WHERE
            id = ?
        RETURNING
            id,
            email,
            password_hash,
            first_name,
            last_name,
            slug,
            tax_id,
            is_admin,
            is_active,
            created_at,
            updated_at
    "#))
    .bind(&input.email)
    .bind(&input.first_name)
    .bind(&input.last_name)
    .bind(&input.tax_id)
    .bind(input.is_admin)
    .bind(Utc::now())
    .bind(id)
    .fetch_one(get_pool())
    .await?;

    Ok(employee)
}

pub async fn set_active(id: Uuid, active: bool) -> Result<Employee, sqlx::Error> {
    let employee = sqlx::query_as::<_, Employee>(&sql(r#"
        UPDATE
            employees
        SET
            is_active = ?,
            updated_at = ?
        WHERE
            id = ?
        RETURNING
            id,
            email,
            password_hash,
            first_name,
            last_name,
            slug,
            tax_id,
            is_admin,
            is_active,
            created_at,
            updated_at
    "#))
    .bind(active)
    .bind(Utc::now())
    .bind(id)
    .fetch_one(get_pool())
    .await?;

    Ok(employee)
}

pub async fn find_by_id(id: Uuid) -> Result<Option<Employee>, sqlx::Error> {
    let employee = sqlx::query_as::<_, Employee>(&sql(r#"
        SELECT
            id,
            email,
            password_hash,
            first_name,
            last_name,
            slug,
            tax_id,
            is_admin,
            is_active,
            created_at,
            updated_at
        FROM
            employees
        WHERE
            id = ?
    "#))
    .bind(id)
    .fetch_optional(get_pool())
    .await?;

    Ok(employee)
}

pub async fn find_by_slug(slug: &str) -> Result<Option<Employee>, sqlx::Error> {
    let employee = sqlx::query_as::<_, Employee>(&sql(r#"
        SELECT
            id,
            email,
            password_hash,
            first_name,
            last_name,
            slug,
            tax_id,
            is_admin,
            is_active,
            created_at,
            updated_at
        FROM
            employees
        WHERE
            slug = ?
    "#))
    .bind(slug)
    .fetch_optional(get_pool())
    .await?;

    Ok(employee)
}

pub async fn find_by_email(email: &str) -> Result<Option<Employee>, sqlx::Error> {
    let employee = sqlx::query_as::<_, Employee>(&sql(r#"
        SELECT
            id,
            email,
            password_hash,
            first_name,
            last_name,
            slug,
            tax_id,
            is_admin,
            is_active,
            created_at,
            updated_at
        FROM
            employees
        WHERE
            email = ?
    "#))
    .bind(email)
    .fetch_optional(get_pool())
    .await?;

    Ok(employee)
}

pub async fn list(include_inactive: bool) -> Result<Vec<Employee>, sqlx::Error> {
    let employees = sqlx::query_as::<_, Employee>(&sql(r#"
        SELECT
            id,
            email,
            password_hash,
            first_name,
            last_name,
            slug,
            tax_id,
            is_admin,
            is_active,
            created_at,
            updated_at
        FROM
            employees
        WHERE
            is_active = TRUE
            OR ? = TRUE
        ORDER BY
            last_name,
            first_name
    "#))
    .bind(include_inactive)
    .fetch_all(get_pool())
    .await?;

    Ok(employees)
}

/// Slugs already taken in the `base`, `base-2`, ... family.
pub async fn slugs_starting_with(base: &str) -> Result<Vec<String>, sqlx::Error> {
    let slugs = sqlx::query_scalar::<_, String>(&sql(r#"
        SELECT
            slug
        FROM
            employees
        WHERE
            slug LIKE ?
    "#))
    .bind(format!("{}%", base))
    .fetch_all(get_pool())
    .await?;

    Ok(slugs)
}

/// Locks the employee row for the rest of the transaction. Interval writes
/// take this lock first so concurrent inserts cannot both pass the overlap
/// scan against the same snapshot.
pub async fn lock_by_id(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> Result<Option<Employee>, sqlx::Error> {
    let employee = sqlx::query_as::<_, Employee>(&sql(r#"
        SELECT
            id,
            email,
            password_hash,
            first_name,
            last_name,
            slug,
            tax_id,
            is_admin,
            is_active,
            created_at,
            updated_at
        FROM
            employees
        WHERE
            id = ?
        FOR UPDATE
    "#))
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(employee)
}
