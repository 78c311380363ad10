use chrono::Utc;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::database::{
    get_pool,
    models::{Contract, ContractInput},
    utils::sql,
};

pub async fn create(
    tx: &mut Transaction<'_, Postgres>,
    contract: &Contract,
) -> Result<Contract, sqlx::Error> {
    let contract = sqlx::query_as::<_, Contract>(&sql(r#"
        INSERT INTO
            contracts (
                id,
                employee_id,
                name,
                contract_type,
                sign_date,
                start_date,
                end_date,
                comment,
                created_at,
                updated_at
            )
        VALUES
            (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING
            id,
            employee_id,
            name,
            contract_type,
            sign_date,
            start_date,
            end_date,
            comment,
            created_at,
            updated_at
    "#))
    .bind(contract.id)
    .bind(contract.employee_id)
    .bind(&contract.name)
    .bind(contract.contract_type)
    .bind(contract.sign_date)
    .bind(contract.start_date)
    .bind(contract.end_date)
    .bind(&contract.comment)
    .bind(contract.created_at)
    .bind(contract.updated_at)
    .fetch_one(&mut **tx)
    .await?;

    Ok(contract)
}

pub async fn update(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    input: &ContractInput,
) -> Result<Contract, sqlx::Error> {
    let contract = sqlx::query_as::<_, Contract>(&sql(r#"
        UPDATE
            contracts
        SET
            name = ?,
            contract_type = ?,
            sign_date = ?,
            start_date = ?,
            end_date = ?,
            comment = ?,
            updated_at = ?
        WHERE
            id = ?
        RETURNING
            id,
            employee_id,
            name,
            contract_type,
            sign_date,
            start_date,
            end_date,
            comment,
            created_at,
            updated_at
    "#))
    .bind(&input.name)
    .bind(input.contract_type)
    .bind(input.sign_date)
    .bind(input.start_date)
    .bind(input.end_date)
    .bind(&input.comment)
    .bind(Utc::now())
    .bind(id)
    .fetch_one(&mut **tx)
    .await?;

    Ok(contract)
}

pub async fn delete(tx: &mut Transaction<'_, Postgres>, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(&sql(r#"
        DELETE FROM
            contracts
        WHERE
            id = ?
    "#))
    .bind(id)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected())
}

pub async fn find_by_id(id: Uuid) -> Result<Option<Contract>, sqlx::Error> {
    let contract = sqlx::query_as::<_, Contract>(&sql(r#"
        SELECT
            id,
            employee_id,
            name,
            contract_type,
            sign_date,
            start_date,
            end_date,
            comment,
            created_at,
            updated_at
        FROM
            contracts
        WHERE
            id = ?
    "#))
    .bind(id)
    .fetch_optional(get_pool())
    .await?;

    Ok(contract)
}

pub async fn list_for_employee(employee_id: Uuid) -> Result<Vec<Contract>, sqlx::Error> {
    let contracts = sqlx::query_as::<_, Contract>(&sql(r#"
        SELECT
            id,
            employee_id,
            name,
            contract_type,
            sign_date,
            start_date,
            end_date,
            comment,
            created_at,
            updated_at
        FROM
            contracts
        WHERE
            employee_id = ?
        ORDER BY
            start_date
    "#))
    .bind(employee_id)
    .fetch_all(get_pool())
    .await?;

    Ok(contracts)
}

/// Same listing inside a transaction, for the overlap scan taken under the
/// employee row lock.
pub async fn list_for_employee_tx(
    tx: &mut Transaction<'_, Postgres>,
    employee_id: Uuid,
) -> Result<Vec<Contract>, sqlx::Error> {
    let contracts = sqlx::query_as::<_, Contract>(&sql(r#"
        SELECT
            id,
            employee_id,
            name,
            contract_type,
            sign_date,
            start_date,
            end_date,
            comment,
            created_at,
            updated_at
        FROM
            contracts
        WHERE
            employee_id = ?
        ORDER BY
            start_date
    "#))
    .bind(employee_id)
    .fetch_all(&mut **tx)
    .await?;

    Ok(contracts)
}
