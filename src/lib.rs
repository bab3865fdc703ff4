//! # txquery
//!
//! Библиотека для агрегирующих запросов над историей денежных переводов.
//!
//! Набор транзакций загружается один раз из JSON-массива (см. [`load_from_json`],
//! [`load_from_file`]) и передаётся в [`QueryEngine`], который отвечает на запросы:
//! суммы, максимум, топ переводов, группировка по получателю и поиск по проблемам
//! комплаенса.
//!
//! ## Быстрый старт
//!
//! ```rust
//! use txquery::{load_from_json, QueryEngine};
//!
//! let data = r#"[
//!     {"mtn": 1, "amount": 10.0, "senderFullName": "A", "beneficiaryFullName": "X"},
//!     {"mtn": 2, "amount": 20.0, "senderFullName": "B", "beneficiaryFullName": "X"},
//!     {"mtn": 3, "amount": 15.0, "senderFullName": "A", "beneficiaryFullName": "Y"}
//! ]"#;
//!
//! let txs = load_from_json(data.as_bytes()).expect("Ошибка загрузки");
//! let engine = QueryEngine::new(txs);
//!
//! assert_eq!(engine.total_amount(), 45.0);
//! assert_eq!(engine.top_sender(), Some("A"));
//! ```
//!
//! ## Обработка ошибок
//! Ошибку ([`error::LoadError`]) может вернуть только загрузка. Запросы движка
//! ошибок не возвращают: на пустом наборе они отдают значение по умолчанию.

pub mod engine;
pub mod error;
pub mod types;

mod source;

pub use engine::{ClientScope, IssueMatch, QueryEngine, QueryPolicy};

pub use source::{JsonSource, RecordSource, load_from_file, load_from_json};
