use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;
use crate::domain::interval::{DateInterval, Spanned};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub name: String,
    pub contract_type: ContractType,
    pub sign_date: NaiveDate,  // DATE
    pub start_date: NaiveDate, // DATE
    pub end_date: Option<NaiveDate>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contract {
    pub fn new(employee_id: Uuid, input: ContractInput) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            employee_id,
            name: input.name,
            contract_type: input.contract_type,
            sign_date: input.sign_date,
            start_date: input.start_date,
            end_date: input.end_date,
            comment: input.comment,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Spanned for Contract {
    fn span_id(&self) -> Uuid {
        self.id
    }

    fn span(&self) -> DateInterval {
        DateInterval {
            start: self.start_date,
            end: self.end_date,
        }
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "snake_case")]
    pub enum ContractType {
        Permanent => "permanent",
        ContractForService => "contract_for_service",
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractInput {
    pub name: String,
    pub contract_type: ContractType,
    pub sign_date: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub comment: Option<String>,
}
