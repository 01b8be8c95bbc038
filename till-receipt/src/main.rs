use anyhow::{Context, bail};
use till_receipt::{
    Config, ConnectOutcome, PrinterTransport, Transaction, setup_environment,
};

const USAGE: &str = "Usage: till-receipt <command>

Commands:
  status                             show printer settings
  test                               print the test page
  drawer                             open the cash drawer
  connect-network <ip> [port]        use a network printer (port 9100)
  connect-bluetooth <address> [name] use a Bluetooth printer
  disconnect                         disconnect the printer
  print <transaction.json>           print a receipt
  preview <transaction.json>         show a receipt as plain text";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    setup_environment(&config).context("Failed to prepare work directory")?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        println!("{}", USAGE);
        return Ok(());
    };

    let mut transport = PrinterTransport::open(&config)?;
    tracing::debug!(
        settings = ?transport.settings(),
        platform = ?config.platform,
        "Transport ready"
    );

    // Startup auto-connect is best effort; the commands enforce their own preconditions
    if let Err(e) = transport.restore_connection().await {
        tracing::warn!(error = %e, "Failed to restore printer connection");
    }

    match command.as_str() {
        "status" => {
            println!("{}", serde_json::to_string_pretty(transport.settings())?);
        }
        "test" => {
            transport.print_test_receipt().await?;
        }
        "drawer" => {
            transport.open_cash_drawer().await?;
        }
        "connect-network" => {
            let ip = arg(&args, 1, "ip")?;
            let port = args
                .get(2)
                .map(|p| p.parse::<u16>())
                .transpose()
                .context("Invalid port")?;
            let outcome = transport.connect_network(ip, port).await?;
            if outcome == ConnectOutcome::RawSocketMayBeBlocked {
                eprintln!("Warning: raw socket connections may be blocked on this platform");
            }
        }
        "connect-bluetooth" => {
            let address = arg(&args, 1, "address")?;
            transport
                .connect_bluetooth(address, args.get(2).map(String::as_str))
                .await?;
        }
        "disconnect" => {
            transport.disconnect().await?;
        }
        "print" => {
            let transaction = read_transaction(arg(&args, 1, "transaction.json")?)?;
            transport.print_receipt(&transaction, None, false, None).await?;
        }
        "preview" => {
            let transaction = read_transaction(arg(&args, 1, "transaction.json")?)?;
            print!("{}", transport.preview_receipt(&transaction, None, None, None));
        }
        other => {
            bail!("Unknown command: {}\n\n{}", other, USAGE);
        }
    }

    Ok(())
}

fn arg<'a>(args: &'a [String], index: usize, name: &str) -> anyhow::Result<&'a str> {
    args.get(index)
        .map(String::as_str)
        .with_context(|| format!("Missing argument <{}>\n\n{}", name, USAGE))
}

fn read_transaction(path: &str) -> anyhow::Result<Transaction> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid transaction in {}", path))
}
