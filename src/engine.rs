//! Движок запросов над загруженным набором транзакций.
//!
//! Набор записей передаётся в [`QueryEngine::new`] один раз и дальше только
//! читается. Каждый запрос заново проходит по записям и ничего не кэширует.
//! Ни один запрос не возвращает ошибку: для пустого набора он отдаёт ноль,
//! пустую коллекцию или `None`.

use std::{
    collections::{BTreeSet, HashMap, HashSet},
    path::Path,
    sync::Arc,
};

use log::{debug, error, warn};

use crate::{
    source,
    types::{BeneficiaryIndex, BeneficiaryTransaction, IssueId, Transaction},
};

/// Кого считать клиентом в [`QueryEngine::unique_client_count`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ClientScope {
    #[default]
    Senders,
    SendersAndBeneficiaries,
}

/// Какой статус проблемы ищет [`QueryEngine::has_unsolved_issue_for`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum IssueMatch {
    /// `issueSolved == true`, историческое поведение.
    #[default]
    Solved,
    /// `issueSolved == false` при наличии `issueId`.
    Unsolved,
}

/// Настройки спорных запросов. Значение по умолчанию повторяет
/// историческое поведение.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryPolicy {
    pub client_scope: ClientScope,
    pub issue_match: IssueMatch,
    /// Добавлять ли `None` в [`QueryEngine::unsolved_issue_ids`] для записей без `issueId`.
    pub include_missing_issue_ids: bool,
}

impl Default for QueryPolicy {
    fn default() -> Self {
        QueryPolicy {
            client_scope: ClientScope::default(),
            issue_match: IssueMatch::default(),
            include_missing_issue_ids: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryEngine {
    records: Arc<[Transaction]>,
    policy: QueryPolicy,
}

impl QueryEngine {
    /// Создаёт движок над готовым набором записей.
    ///
    /// # Пример
    ///
    /// ```rust
    /// use txquery::{QueryEngine, types::Transaction};
    ///
    /// let engine = QueryEngine::new(vec![
    ///     Transaction { amount: 5.0, ..Default::default() },
    ///     Transaction { amount: 12.0, ..Default::default() },
    /// ]);
    /// assert_eq!(engine.total_amount(), 17.0);
    /// assert_eq!(engine.max_amount(), 12.0);
    /// ```
    pub fn new(records: Vec<Transaction>) -> Self {
        QueryEngine {
            records: records.into(),
            policy: QueryPolicy::default(),
        }
    }

    /// Загружает записи из JSON-файла. При ошибке загрузки пишет её в лог
    /// и возвращает движок с пустым набором.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match source::load_from_file(path) {
            Ok(records) => {
                if records.is_empty() {
                    warn!("{} contains no transactions", path.display());
                }
                Self::new(records)
            }
            Err(err) => {
                error!(
                    "error loading transaction data from {}: {}",
                    path.display(),
                    err
                );
                Self::default()
            }
        }
    }

    pub fn with_policy(mut self, policy: QueryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> QueryPolicy {
        self.policy
    }

    /// Подменяет набор записей целиком. Клоны движка, снятые до вызова,
    /// продолжают видеть старый набор.
    pub fn reload(&mut self, records: Vec<Transaction>) {
        self.records = records.into();
    }

    pub fn records(&self) -> &[Transaction] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Сумма всех переводов.
    pub fn total_amount(&self) -> f64 {
        self.records.iter().fold(0.0, |total, tx| total + tx.amount)
    }

    /// Сумма переводов отправителя `sender_full_name`, имя сравнивается без учёта регистра.
    pub fn total_amount_sent_by(&self, sender_full_name: &str) -> f64 {
        self.records
            .iter()
            .filter(|tx| eq_ignore_case(&tx.sender_full_name, sender_full_name))
            .fold(0.0, |total, tx| total + tx.amount)
    }

    /// Наибольшая сумма перевода. Не бывает меньше нуля.
    pub fn max_amount(&self) -> f64 {
        self.records
            .iter()
            .map(|tx| tx.amount)
            .fold(0.0, |max, amount| if amount > max { amount } else { max })
    }

    /// Количество различных клиентов. Состав зависит от [`ClientScope`].
    pub fn unique_client_count(&self) -> usize {
        let mut clients: HashSet<&str> = HashSet::new();
        for tx in self.records.iter() {
            clients.insert(&tx.sender_full_name);
            if self.policy.client_scope == ClientScope::SendersAndBeneficiaries {
                clients.insert(&tx.beneficiary_full_name);
            }
        }
        clients.len()
    }

    /// Есть ли у получателя `beneficiary_full_name` (точное совпадение имени)
    /// перевод с проблемой. Статус проблемы выбирается через [`IssueMatch`].
    pub fn has_unsolved_issue_for(&self, beneficiary_full_name: &str) -> bool {
        self.records
            .iter()
            .filter(|tx| tx.beneficiary_full_name == beneficiary_full_name)
            .any(|tx| match self.policy.issue_match {
                IssueMatch::Solved => tx.issue_solved,
                IssueMatch::Unsolved => tx.issue_id.is_some() && !tx.issue_solved,
            })
    }

    /// Переводы, сгруппированные по получателю и номеру перевода.
    /// Запись с повторным номером у того же получателя заменяет предыдущую.
    ///
    /// # Пример
    ///
    /// ```rust
    /// use txquery::{QueryEngine, types::Transaction};
    ///
    /// let engine = QueryEngine::new(vec![Transaction {
    ///     mtn: 42,
    ///     amount: 10.0,
    ///     sender_full_name: "Tom Shelby".to_string(),
    ///     beneficiary_full_name: "Alfie Solomons".to_string(),
    ///     ..Default::default()
    /// }]);
    ///
    /// let index = engine.transactions_by_beneficiary();
    /// assert_eq!(index["Alfie Solomons"]["42"].sender_full_name, "Tom Shelby");
    /// ```
    pub fn transactions_by_beneficiary(&self) -> BeneficiaryIndex {
        let mut index = BeneficiaryIndex::new();
        for tx in self.records.iter() {
            index
                .entry(tx.beneficiary_full_name.clone())
                .or_default()
                .insert(tx.mtn.to_string(), BeneficiaryTransaction::from(tx));
        }
        index
    }

    /// Идентификаторы нерешённых проблем. `None` означает запись без `issueId`
    /// и попадает в результат только при `include_missing_issue_ids`.
    pub fn unsolved_issue_ids(&self) -> BTreeSet<Option<IssueId>> {
        self.records
            .iter()
            .filter(|tx| !tx.issue_solved)
            .filter(|tx| tx.issue_id.is_some() || self.policy.include_missing_issue_ids)
            .map(|tx| tx.issue_id)
            .collect()
    }

    /// Сообщения решённых проблем в порядке записей. Пустые сообщения пропускаются.
    pub fn all_solved_issue_messages(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter(|tx| tx.issue_solved)
            .filter_map(|tx| tx.issue_message.as_deref())
            .filter(|message| !message.is_empty())
            .collect()
    }

    /// До `n` самых крупных переводов по убыванию суммы.
    /// При равных суммах сохраняется исходный порядок записей.
    pub fn top_by_amount(&self, n: usize) -> Vec<&Transaction> {
        let mut sorted: Vec<&Transaction> = self.records.iter().collect();
        // NaN уходит в конец
        sorted.sort_by(|a, b| match (a.amount.is_nan(), b.amount.is_nan()) {
            (false, false) => b.amount.total_cmp(&a.amount),
            (a_nan, b_nan) => a_nan.cmp(&b_nan),
        });
        sorted.truncate(n);
        sorted
    }

    pub fn top3_by_amount(&self) -> Vec<&Transaction> {
        self.top_by_amount(3)
    }

    /// Отправитель с наибольшей суммой переводов. При равенстве выигрывает
    /// тот, кто раньше встретился в записях. Сумма NaN не участвует.
    pub fn top_sender(&self) -> Option<&str> {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut totals: Vec<(&str, f64)> = Vec::new();
        for tx in self.records.iter() {
            let sender = tx.sender_full_name.as_str();
            let pos = *positions.entry(sender).or_insert_with(|| {
                totals.push((sender, 0.0));
                totals.len() - 1
            });
            totals[pos].1 += tx.amount;
        }
        debug!("top_sender: {} distinct senders", totals.len());

        let mut top: Option<(&str, f64)> = None;
        for (sender, total) in totals {
            if total.is_nan() {
                continue;
            }
            match top {
                Some((_, best)) if total <= best => {}
                _ => top = Some((sender, total)),
            }
        }
        top.map(|(sender, _)| sender)
    }
}

fn eq_ignore_case(lhs: &str, rhs: &str) -> bool {
    lhs.chars()
        .flat_map(char::to_lowercase)
        .eq(rhs.chars().flat_map(char::to_lowercase))
}
