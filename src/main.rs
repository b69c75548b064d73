use clap::Parser;
use miette::{IntoDiagnostic, Result, miette};
use qrpay::application::client::{PaymentClient, RequestOutcome};
use qrpay::application::directory::ProviderDirectory;
use qrpay::application::poller::{PollConfig, PollOutcome, StatusPoller};
use qrpay::domain::payment::{Amount, OrderId, PaymentRequest, PaymentState};
use qrpay::domain::provider::{Availability, ProviderDescriptor, ProviderKey};
use qrpay::infrastructure::simulated::{ScriptedStatus, SimulatedGateway};
use qrpay::interfaces::display::{IDR, format_amount};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Drives one QR checkout cycle against the simulated provider rails.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Amount in the smallest currency unit
    amount: i64,

    /// Order identifier, unique per attempt
    #[arg(long, default_value = "ORDER-1")]
    order_id: String,

    /// Provider key (qris, gopay, dana). Omit for auto-selection.
    #[arg(long)]
    provider: Option<String>,

    #[arg(long, default_value = "consultation booking")]
    description: String,

    /// Scripted provider statuses, comma separated
    /// (pending, success, failed, expired, error)
    #[arg(long, default_value = "pending,pending,success")]
    script: String,

    /// Polling attempt budget
    #[arg(long, default_value_t = 5)]
    max_attempts: u32,

    /// Polling interval in milliseconds
    #[arg(long, default_value_t = 200)]
    interval_ms: u64,
}

fn parse_script(raw: &str) -> Result<Vec<ScriptedStatus>> {
    raw.split(',')
        .map(|step| match step.trim() {
            "pending" => Ok(ScriptedStatus::Report(PaymentState::Pending)),
            "success" => Ok(ScriptedStatus::Report(PaymentState::Success)),
            "failed" => Ok(ScriptedStatus::Report(PaymentState::Failed)),
            "expired" => Ok(ScriptedStatus::Report(PaymentState::Expired)),
            "error" => Ok(ScriptedStatus::TransportError),
            other => Err(miette!("unknown script step: {other}")),
        })
        .collect()
}

fn build_directory(script: Vec<ScriptedStatus>) -> ProviderDirectory {
    let mut directory = ProviderDirectory::new();
    for (key, name) in [(ProviderKey::Qris, "QRIS"), (ProviderKey::Gopay, "GoPay")] {
        directory.register(
            ProviderDescriptor {
                key,
                display_name: name.to_string(),
                features: vec!["qr".to_string(), "ewallet".to_string()],
                availability: Availability::Active,
            },
            Arc::new(SimulatedGateway::with_script(key, script.clone())),
        );
    }
    directory.register(
        ProviderDescriptor {
            key: ProviderKey::Dana,
            display_name: "DANA".to_string(),
            features: vec!["qr".to_string()],
            availability: Availability::ComingSoon,
        },
        Arc::new(SimulatedGateway::new(ProviderKey::Dana)),
    );
    directory
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let provider = cli
        .provider
        .as_deref()
        .map(str::parse::<ProviderKey>)
        .transpose()
        .into_diagnostic()?;
    let script = parse_script(&cli.script)?;
    let config = PollConfig::new(cli.max_attempts, Duration::from_millis(cli.interval_ms))
        .into_diagnostic()?;

    let request = PaymentRequest::new(
        Amount::new(cli.amount).into_diagnostic()?,
        OrderId::new(cli.order_id).into_diagnostic()?,
        cli.description,
        None,
    )
    .into_diagnostic()?;

    let mut directory = build_directory(script);
    let key = match provider {
        Some(key) => key,
        None => directory.select().into_diagnostic()?,
    };
    let gateway = directory.gateway(key).into_diagnostic()?;

    let started = Instant::now();
    let outcome = PaymentClient::new(gateway.clone())
        .create_payment(&request)
        .await
        .into_diagnostic()?;
    directory.record_outcome(
        key,
        started.elapsed(),
        matches!(outcome, RequestOutcome::Accepted(_)),
    );

    let transaction = match outcome {
        RequestOutcome::Accepted(transaction) => transaction,
        RequestOutcome::Rejected { reason } => {
            println!("payment request rejected: {reason}");
            println!("try again with a new order id");
            return Ok(());
        }
    };

    println!(
        "order {} via {} | {} | pay before {}",
        transaction.order_id,
        key,
        format_amount(transaction.amount, &IDR),
        transaction.expires_at.format("%H:%M:%S")
    );
    if let Some(qr) = &transaction.qr_asset {
        println!("scan to pay: {qr}");
    }

    let poller = StatusPoller::new(gateway);
    let outcome = poller
        .run(&transaction.transaction_id, config, |status| {
            println!("attempt {}: {}", status.attempt, status.state);
        })
        .await
        .into_diagnostic()?;

    match outcome {
        PollOutcome::Finished(status) => match status.state {
            PaymentState::Success => {
                println!(
                    "payment settled: {}",
                    format_amount(transaction.amount, &IDR)
                );
            }
            PaymentState::Failed => println!("payment failed, try again"),
            PaymentState::Expired => {
                println!("QR code expired before settlement, request a new one");
            }
            PaymentState::Timeout => {
                println!("gave up waiting for settlement, check payment status manually");
            }
            PaymentState::Pending => {}
        },
        PollOutcome::Cancelled => println!("polling cancelled"),
    }

    Ok(())
}
