use std::collections::BTreeSet;
use std::io::Write;
use std::{fmt, io};

use clap::Parser;
use serde::Serialize;
use txquery::{
    ClientScope, IssueMatch, QueryEngine, QueryPolicy, error,
    types::{BeneficiaryIndex, IssueId, Transaction},
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Путь до JSON-файла с транзакциями
    #[arg(long, env = "TXQUERY_INPUT", default_value = "transactions.json")]
    input_file: String,

    /// Отправитель для суммы переводов
    #[arg(long, default_value = "Tom Shelby")]
    sender: String,

    /// Получатель для проверки проблем комплаенса
    #[arg(long, default_value = "Arthur Shelby")]
    beneficiary: String,

    /// Кого считать клиентом: senders/all
    #[arg(long, value_enum, default_value_t = KnownClientScope::Senders)]
    client_scope: KnownClientScope,

    /// Какой статус проблемы искать у получателя: solved/unsolved
    #[arg(long, value_enum, default_value_t = KnownIssueMatch::Solved)]
    issue_match: KnownIssueMatch,

    /// Не включать записи без issueId в список нерешённых проблем
    #[arg(long)]
    skip_missing_issue_ids: bool,

    /// Завершаться с ошибкой, если файл не загрузился
    #[arg(long)]
    strict: bool,

    /// Вывести отчёт в JSON
    #[arg(long)]
    json: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum KnownClientScope {
    Senders,
    All,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum KnownIssueMatch {
    Solved,
    Unsolved,
}

impl Args {
    fn policy(&self) -> QueryPolicy {
        QueryPolicy {
            client_scope: match self.client_scope {
                KnownClientScope::Senders => ClientScope::Senders,
                KnownClientScope::All => ClientScope::SendersAndBeneficiaries,
            },
            issue_match: match self.issue_match {
                KnownIssueMatch::Solved => IssueMatch::Solved,
                KnownIssueMatch::Unsolved => IssueMatch::Unsolved,
            },
            include_missing_issue_ids: !self.skip_missing_issue_ids,
        }
    }
}

#[derive(Debug)]
enum Error {
    Load(String),
    Output(String),
    IO(String),
}

impl Error {
    fn code(&self) -> i32 {
        match self {
            Self::Load(_) => 1,
            Self::Output(_) => 2,
            Self::IO(_) => 4,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load(msg) | Self::Output(msg) => write!(f, "{}", msg),
            Self::IO(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl From<error::LoadError> for Error {
    fn from(value: error::LoadError) -> Self {
        Error::Load(format!("ошибка загрузки транзакций: {}", value))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Output(format!("ошибка сериализации отчёта: {}", err))
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::IO(format!("ошибка ввода-вывода: {}", err))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    total_amount: f64,
    total_amount_sent_by: f64,
    max_amount: f64,
    unique_client_count: usize,
    has_unsolved_issue: bool,
    transactions_by_beneficiary: BeneficiaryIndex,
    unsolved_issue_ids: BTreeSet<Option<IssueId>>,
    all_solved_issue_messages: Vec<&'a str>,
    top3_by_amount: Vec<&'a Transaction>,
    top_sender: Option<&'a str>,
}

impl<'a> Report<'a> {
    fn build(engine: &'a QueryEngine, args: &Args) -> Self {
        Report {
            total_amount: engine.total_amount(),
            total_amount_sent_by: engine.total_amount_sent_by(&args.sender),
            max_amount: engine.max_amount(),
            unique_client_count: engine.unique_client_count(),
            has_unsolved_issue: engine.has_unsolved_issue_for(&args.beneficiary),
            transactions_by_beneficiary: engine.transactions_by_beneficiary(),
            unsolved_issue_ids: engine.unsolved_issue_ids(),
            all_solved_issue_messages: engine.all_solved_issue_messages(),
            top3_by_amount: engine.top3_by_amount(),
            top_sender: engine.top_sender(),
        }
    }
}

fn write_text(writer: &mut impl io::Write, report: &Report, args: &Args) -> Result<(), Error> {
    writeln!(writer, "Total transactions amount: {}", report.total_amount)?;
    writeln!(
        writer,
        "Total amount sent by {}: {}",
        args.sender, report.total_amount_sent_by
    )?;
    writeln!(writer, "Max transaction amount: {}", report.max_amount)?;
    writeln!(writer, "Unique clients: {}", report.unique_client_count)?;
    writeln!(
        writer,
        "Has open compliance issues ({}): {}",
        args.beneficiary, report.has_unsolved_issue
    )?;

    writeln!(writer, "Transactions by beneficiary:")?;
    for (beneficiary, transactions) in &report.transactions_by_beneficiary {
        writeln!(writer, "  {}:", beneficiary)?;
        for tx in transactions.values() {
            writeln!(
                writer,
                "    MTN {}: {} from {}",
                tx.mtn, tx.amount, tx.sender_full_name
            )?;
        }
    }

    let ids: Vec<String> = report
        .unsolved_issue_ids
        .iter()
        .map(|id| match id {
            Some(id) => id.to_string(),
            None => "null".to_string(),
        })
        .collect();
    writeln!(writer, "Unsolved issue ids: [{}]", ids.join(", "))?;

    writeln!(writer, "All solved issue messages:")?;
    for message in &report.all_solved_issue_messages {
        writeln!(writer, "  {}", message)?;
    }

    writeln!(writer, "Top 3 transactions by amount:")?;
    for tx in &report.top3_by_amount {
        writeln!(
            writer,
            "  MTN {}: {} ({} -> {})",
            tx.mtn, tx.amount, tx.sender_full_name, tx.beneficiary_full_name
        )?;
    }

    match report.top_sender {
        Some(sender) => writeln!(writer, "Top sender: {}", sender)?,
        None => writeln!(writer, "Top sender: none")?,
    }
    Ok(())
}

fn run() -> Result<(), Error> {
    let args = Args::parse();

    let engine = if args.strict {
        QueryEngine::new(txquery::load_from_file(&args.input_file)?)
    } else {
        QueryEngine::load(&args.input_file)
    };
    let engine = engine.with_policy(args.policy());

    let report = Report::build(&engine, &args);
    let mut output = io::stdout().lock();
    if args.json {
        serde_json::to_writer_pretty(&mut output, &report)?;
        writeln!(output)?;
    } else {
        write_text(&mut output, &report, &args)?;
    }
    Ok(())
}

fn main() {
    env_logger::init();

    match run() {
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.code());
        }
    }
}
