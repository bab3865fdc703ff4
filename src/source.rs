//! Загрузка набора транзакций из JSON.
//!
//! Источник отдаёт упорядоченный список [`Transaction`], порядок записей
//! в файле сохраняется.

use std::{fs, io, path::Path};

use log::info;

use crate::{error::LoadError, types::Transaction};

/// Трейт, который должны реализовывать все источники записей.
pub trait RecordSource {
    /// Читает транзакции из потока.
    fn load(reader: impl io::Read) -> Result<Vec<Transaction>, LoadError>;
}

/// Источник, читающий JSON-массив объектов-транзакций.
pub struct JsonSource;

impl RecordSource for JsonSource {
    fn load(reader: impl io::Read) -> Result<Vec<Transaction>, LoadError> {
        let reader = io::BufReader::new(reader);
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Читает и парсит транзакции из JSON-массива.
///
/// # Ошибки
///
/// Возвращает [`LoadError`], если:
/// * JSON некорректен или корневой элемент не массив.
/// * Возникла ошибка ввода-вывода при чтении из `reader`.
///
/// # Пример
///
/// ```rust
/// use txquery::load_from_json;
///
/// let data = r#"[{"mtn": 663458, "amount": 430.2,
///                 "senderFullName": "Tom Shelby", "senderAge": 22,
///                 "beneficiaryFullName": "Alfie Solomons", "beneficiaryAge": 33,
///                 "issueId": 1, "issueSolved": false,
///                 "issueMessage": "Looks like money laundering"}]"#;
///
/// let txs = load_from_json(data.as_bytes()).expect("Ошибка загрузки");
/// assert_eq!(txs.len(), 1);
/// assert_eq!(txs[0].sender_full_name, "Tom Shelby");
/// assert_eq!(txs[0].issue_id, Some(1));
/// ```
pub fn load_from_json(reader: impl io::Read) -> Result<Vec<Transaction>, LoadError> {
    JsonSource::load(reader)
}

/// Открывает файл по пути `path` и читает из него транзакции в JSON.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<Vec<Transaction>, LoadError> {
    let path = path.as_ref();
    let file = fs::File::open(path)?;
    let transactions = load_from_json(file)?;
    info!(
        "loaded {} transactions from {}",
        transactions.len(),
        path.display()
    );
    Ok(transactions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_full_record() {
        let input = r#"[{
            "mtn": 1284564,
            "amount": 150.2,
            "senderFullName": "Tom Shelby",
            "senderAge": 22,
            "beneficiaryFullName": "Arthur Shelby",
            "beneficiaryAge": 60,
            "issueId": 2,
            "issueSolved": true,
            "issueMessage": "Never gonna give you up"
        }]"#;

        let expected = Transaction {
            mtn: 1284564,
            amount: 150.2,
            sender_full_name: "Tom Shelby".to_string(),
            sender_age: 22,
            beneficiary_full_name: "Arthur Shelby".to_string(),
            beneficiary_age: 60,
            issue_id: Some(2),
            issue_solved: true,
            issue_message: Some("Never gonna give you up".to_string()),
        };

        let got = load_from_json(input.as_bytes()).unwrap();
        assert_eq!(got, vec![expected]);
    }

    #[test]
    fn test_load_keeps_record_order() {
        let input = r#"[{"mtn": 3}, {"mtn": 1}, {"mtn": 2}]"#;

        let got = load_from_json(input.as_bytes()).unwrap();
        let mtns: Vec<_> = got.iter().map(|tx| tx.mtn).collect();
        assert_eq!(mtns, vec![3, 1, 2]);
    }

    #[test]
    fn test_nulls_and_missing_fields_become_defaults() {
        let input = r#"[{
            "mtn": 5,
            "amount": null,
            "senderFullName": null,
            "beneficiaryFullName": "Aberama Gold",
            "issueId": null,
            "issueSolved": null,
            "issueMessage": null
        }]"#;

        let got = load_from_json(input.as_bytes()).unwrap();
        assert_eq!(got.len(), 1);
        let tx = &got[0];
        assert_eq!(tx.amount, 0.0);
        assert_eq!(tx.sender_full_name, "");
        assert_eq!(tx.sender_age, 0);
        assert_eq!(tx.beneficiary_full_name, "Aberama Gold");
        assert_eq!(tx.issue_id, None);
        assert!(!tx.issue_solved);
        assert_eq!(tx.issue_message, None);
    }

    #[test]
    fn test_negative_integers_are_accepted() {
        let input = r#"[
            {"mtn": 1, "amount": 10.0, "senderFullName": "A", "senderAge": -1},
            {"mtn": -5, "amount": 2.5, "beneficiaryFullName": "B", "beneficiaryAge": -30}
        ]"#;

        let got = load_from_json(input.as_bytes()).unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].sender_age, -1);
        assert_eq!(got[1].mtn, -5);
        assert_eq!(got[1].beneficiary_age, -30);
    }

    #[test]
    fn test_empty_array() {
        let got = load_from_json("[]".as_bytes()).unwrap();
        assert!(got.is_empty());
    }

    #[test]
    fn test_malformed_json() {
        let got = load_from_json(r#"[{"mtn": 1,"#.as_bytes());
        assert!(matches!(got, Err(LoadError::InvalidFormat(_))));
    }

    #[test]
    fn test_root_is_not_array() {
        let got = load_from_json(r#"{"mtn": 1}"#.as_bytes());
        assert!(matches!(got, Err(LoadError::InvalidFormat(_))));
    }

    #[test]
    fn test_missing_file() {
        let got = load_from_file("definitely/not/here/transactions.json");
        assert!(matches!(got, Err(LoadError::IOError(_))));
    }
}
