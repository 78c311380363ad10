use chrono::Utc;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::database::{
    get_pool,
    models::{Rate, RateInput},
    utils::sql,
};

pub async fn create(
    tx: &mut Transaction<'_, Postgres>,
    rate: &Rate,
) -> Result<Rate, sqlx::Error> {
    let rate = sqlx::query_as::<_, Rate>(&sql(r#"
        INSERT INTO
            rates (
                id,
                employee_id,
                chargable_amount,
                chargable_currency,
                internal_amount,
                internal_currency,
                start_date,
                end_date,
                comment,
                created_at,
                updated_at
            )
        VALUES
            (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING
            id,
            employee_id,
            chargable_amount,
            chargable_currency,
            internal_amount,
            internal_currency,
            start_date,
            end_date,
            comment,
            created_at,
            updated_at
    "#))
    .bind(rate.id)
    .bind(rate.employee_id)
    .bind(&rate.chargable_amount)
    .bind(&rate.chargable_currency)
    .bind(&rate.internal_amount)
    .bind(&rate.internal_currency)
    .bind(rate.start_date)
    .bind(rate.end_date)
    .bind(&rate.comment)
    .bind(rate.created_at)
    .bind(rate.updated_at)
    .fetch_one(&mut **tx)
    .await?;

    Ok(rate)
}

pub async fn update(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    input: &RateInput,
) -> Result<Rate, sqlx::Error> {
    let rate = sqlx::query_as::<_, Rate>(&sql(r#"
        UPDATE
            rates
        SET
            chargable_amount = ?,
            chargable_currency = ?,
            internal_amount = ?,
            internal_currency = ?,
            start_date = ?,
            end_date = ?,
            comment = ?,
            updated_at = ?
        WHERE
            id = ?
        RETURNING
            id,
            employee_id,
            chargable_amount,
            chargable_currency,
            internal_amount,
            internal_currency,
            start_date,
            end_date,
            comment,
            created_at,
            updated_at
    "#))
    .bind(&input.chargable_amount)
    .bind(&input.chargable_currency)
    .bind(&input.internal_amount)
    .bind(&input.internal_currency)
    .bind(input.start_date)
    .bind(input.end_date)
    .bind(&input.comment)
    .bind(Utc::now())
    .bind(id)
    .fetch_one(&mut **tx)
    .await?;

    Ok(rate)
}

pub async fn delete(tx: &mut Transaction<'_, Postgres>, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(&sql(r#"
        DELETE FROM
            rates
        WHERE
            id = ?
    "#))
    .bind(id)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected())
}

pub async fn find_by_id(id: Uuid) -> Result<Option<Rate>, sqlx::Error> {
    let rate = sqlx::query_as::<_, Rate>(&sql(r#"
        SELECT
            id,
            employee_id,
            chargable_amount,
            chargable_currency,
            internal_amount,
            internal_currency,
            start_date,
            end_date,
            comment,
            created_at,
            updated_at
        FROM
            rates
        WHERE
            id = ?
    "#))
    .bind(id)
    .fetch_optional(get_pool())
    .await?;

    Ok(rate)
}

pub async fn list_for_employee(employee_id: Uuid) -> Result<Vec<Rate>, sqlx::Error> {
    let rates = sqlx::query_as::<_, Rate>(&sql(r#"
        SELECT
            id,
            employee_id,
            chargable_amount,
            chargable_currency,
            internal_amount,
            internal_currency,
            start_date,
            end_date,
            comment,
            created_at,
            updated_at
        FROM
            rates
        WHERE
            employee_id = ?
        ORDER BY
            start_date
    "#))
    .bind(employee_id)
    .fetch_all(get_pool())
    .await?;

    Ok(rates)
}

/// Same listing inside a transaction, for the overlap scan and for pricing
/// a grid save consistently with the rows it writes.
pub async fn list_for_employee_tx(
    tx: &mut Transaction<'_, Postgres>,
    employee_id: Uuid,
) -> Result<Vec<Rate>, sqlx::Error> {
    let rates = sqlx::query_as::<_, Rate>(&sql(r#"
        SELECT
            id,
            employee_id,
            chargable_amount,
            chargable_currency,
            internal_amount,
            internal_currency,
            start_date,
            end_date,
            comment,
            created_at,
            updated_at
        FROM
            rates
        WHERE
            employee_id = ?
        ORDER BY
            start_date
    "#))
    .bind(employee_id)
    .fetch_all(&mut **tx)
    .await?;

    Ok(rates)
}
