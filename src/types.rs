use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

pub type Mtn = i64;
pub type IssueId = i64;

/// Одна запись о денежном переводе.
///
/// Поля в JSON записаны в camelCase (`senderFullName`, `issueSolved` и т.д.).
/// Значение `null` или отсутствующее поле для ненулевых полей превращается
/// в значение по умолчанию, поэтому неполная запись не ломает загрузку.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Transaction {
    #[serde(deserialize_with = "null_as_default")]
    pub mtn: Mtn,
    #[serde(deserialize_with = "null_as_default")]
    pub amount: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub sender_full_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sender_age: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub beneficiary_full_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub beneficiary_age: i32,
    pub issue_id: Option<IssueId>,
    #[serde(deserialize_with = "null_as_default")]
    pub issue_solved: bool,
    pub issue_message: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Перевод в группировке по получателю.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeneficiaryTransaction {
    pub mtn: Mtn,
    pub amount: f64,
    pub sender_full_name: String,
}

impl From<&Transaction> for BeneficiaryTransaction {
    fn from(tx: &Transaction) -> Self {
        BeneficiaryTransaction {
            mtn: tx.mtn,
            amount: tx.amount,
            sender_full_name: tx.sender_full_name.clone(),
        }
    }
}

/// Имя получателя -> (номер перевода строкой -> перевод).
pub type BeneficiaryIndex = BTreeMap<String, BTreeMap<String, BeneficiaryTransaction>>;
