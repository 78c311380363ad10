use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::interval::{DateInterval, Spanned};
use crate::domain::money::Money;
use crate::domain::rates::RateSpan;

/// Price list of one employee for one period: what the client is charged
/// per hour on chargable projects and what an hour costs internally.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Rate {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub chargable_amount: BigDecimal, // NUMERIC
    pub chargable_currency: String,
    pub internal_amount: BigDecimal,
    pub internal_currency: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Rate {
    pub fn new(employee_id: Uuid, input: RateInput) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            employee_id,
            chargable_amount: input.chargable_amount,
            chargable_currency: input.chargable_currency,
            internal_amount: input.internal_amount,
            internal_currency: input.internal_currency,
            start_date: input.start_date,
            end_date: input.end_date,
            comment: input.comment,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn to_span(&self) -> RateSpan {
        RateSpan {
            interval: self.span(),
            chargable: Money::new(self.chargable_amount.clone(), self.chargable_currency.clone()),
            internal: Money::new(self.internal_amount.clone(), self.internal_currency.clone()),
        }
    }
}

impl Spanned for Rate {
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

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateInput {
    pub chargable_amount: BigDecimal,
    pub chargable_currency: String,
    pub internal_amount: BigDecimal,
    pub internal_currency: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub comment: Option<String>,
}
