//! txnpay CLI
//!
//! A thin command-line front end over the gateway client.
//!
//! # Usage
//!
//! ```bash
//! txnpay banks > banks.csv
//! txnpay cash-in request.json
//! txnpay cash-out 123456 1500.0 364
//! ```
//!
//! # Environment Variables
//!
//! - `TXNPAY_SECRET_KEY`, `TXNPAY_API_KEY`: merchant credentials
//! - `TXNPAY_BASE_URL`: gateway base URL (defaults to the sandbox)
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use serde::Serialize;
use serde_json::Value;
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use txnpay::models::write_banks;
use txnpay::{
    CashInRequest, CashOutRequest, GatewayClient, GatewayConfig, GatewayError,
    LinkBankAccountRequest, ReqwestTransport, Result,
};

const USAGE: &str = "txnpay <command> [args]

Commands:
  banks
  bank-accounts
  otp
  cash-in <request.json>
  cash-out <otp> <amount> <bank_account>
  link-account <bank_code> <bank_type> <account_number> <account_name>";

#[derive(Debug, PartialEq)]
enum Command {
    Banks,
    BankAccounts,
    Otp,
    CashIn(PathBuf),
    CashOut(CashOutRequest),
    LinkAccount(LinkBankAccountRequest),
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let command = parse_args(&args)?;

    match command {
        Command::Banks => {
            let client =
                GatewayClient::unauthenticated(GatewayConfig::from_env(), ReqwestTransport::new()?);
            let banks = client.fetch_banks()?;
            let stdout = io::stdout();
            write_banks(&banks, stdout.lock())?;
        }
        Command::BankAccounts => {
            let client = GatewayClient::from_env()?;
            print_json(&client.fetch_bank_accounts()?)?;
        }
        Command::Otp => {
            let client = GatewayClient::from_env()?;
            print_json(&client.fetch_otp()?)?;
        }
        Command::CashIn(path) => {
            let contents = fs::read_to_string(path)?;
            let request = CashInRequest::from_json(serde_json::from_str(&contents)?)?;
            let client = GatewayClient::from_env()?;
            println!("{}", client.cash_in(&request)?);
        }
        Command::CashOut(request) => {
            let client = GatewayClient::from_env()?;
            print_json(&client.cash_out(&request)?)?;
        }
        Command::LinkAccount(request) => {
            let client = GatewayClient::from_env()?;
            print_json(&client.link_bank_account(&request)?)?;
        }
    }

    Ok(())
}

fn parse_args(args: &[String]) -> Result<Command> {
    let (name, rest) = args.split_first().ok_or(GatewayError::Usage(USAGE))?;

    let command = match (name.as_str(), rest) {
        ("banks", []) => Command::Banks,
        ("bank-accounts", []) => Command::BankAccounts,
        ("otp", []) => Command::Otp,
        ("cash-in", [path]) => Command::CashIn(PathBuf::from(path)),
        ("cash-out", [otp, amount, bank_account]) => Command::CashOut(CashOutRequest::new(
            otp.as_str(),
            number_or_text(amount),
            number_or_text(bank_account),
        )),
        ("link-account", [bank_code, bank_type, account_number, account_name]) => {
            Command::LinkAccount(LinkBankAccountRequest::new(
                bank_code.as_str(),
                bank_type.as_str(),
                account_number.as_str(),
                account_name.as_str(),
            ))
        }
        _ => return Err(GatewayError::Usage(USAGE)),
    };

    Ok(command)
}

/// Parses a numeric argument, keeping anything else as text so the client
/// reports it as a type error.
fn number_or_text(arg: &str) -> Value {
    match serde_json::from_str::<Value>(arg.trim()) {
        Ok(value @ Value::Number(_)) => value,
        _ => Value::String(arg.to_string()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, value)?;
    writeln!(handle)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use txnpay::FieldValue;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_args(&args(&["banks"])).unwrap(), Command::Banks);
        assert_eq!(parse_args(&args(&["otp"])).unwrap(), Command::Otp);
        assert_eq!(
            parse_args(&args(&["cash-in", "req.json"])).unwrap(),
            Command::CashIn(PathBuf::from("req.json"))
        );
    }

    #[test]
    fn test_parse_cash_out_numbers() {
        let command = parse_args(&args(&["cash-out", "123456", "1500.0", "364"])).unwrap();
        match command {
            Command::CashOut(request) => {
                assert_eq!(request.otp, Some(FieldValue::Json(json!("123456"))));
                assert_eq!(request.amount, Some(FieldValue::Json(json!(1500.0))));
                assert_eq!(request.bank_account, Some(FieldValue::Json(json!(364))));
            }
            other => panic!("Expected CashOut, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_kept_as_text() {
        assert_eq!(number_or_text("abc"), json!("abc"));
        assert_eq!(number_or_text("[1]"), json!("[1]"));
        assert_eq!(number_or_text("42"), json!(42));
    }

    #[test]
    fn test_usage_errors() {
        assert!(matches!(parse_args(&[]), Err(GatewayError::Usage(_))));
        assert!(matches!(
            parse_args(&args(&["banks", "extra"])),
            Err(GatewayError::Usage(_))
        ));
        assert!(matches!(
            parse_args(&args(&["refund"])),
            Err(GatewayError::Usage(_))
        ));
    }
}
