// ABOUTME: Example application sending one SMS through an SMSC with a transceiver bind
// ABOUTME: Shows client::connect, the bind/submit/unbind shortcuts and delivery receipt handling

use argh::FromArgs;
use smpp::{SessionEvent, client};
use std::error::Error;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Send a single SMS message and wait briefly for its delivery receipt
#[derive(FromArgs)]
struct CliArgs {
    /// whether or not to enable debugging
    #[argh(switch, short = 'd')]
    debugging: bool,

    /// the system id
    #[argh(option)]
    system_id: Option<String>,

    /// the password
    #[argh(option)]
    password: Option<String>,

    /// the hostname of IP address of the SMSC (default: localhost)
    #[argh(option)]
    host: Option<String>,

    /// the port to use when connecting to the SMSC (default: 2775)
    #[argh(option, short = 'p')]
    port: Option<u16>,

    /// the message to send
    #[argh(option, short = 'm')]
    message: String,

    /// the recipient telephone number
    #[argh(option, short = 't')]
    to: String,

    /// the telephone number that the message will be from
    #[argh(option, short = 'f')]
    from: String,

    /// seconds to wait for a delivery receipt (default: 0)
    #[argh(option, default = "0")]
    wait: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli_args: CliArgs = argh::from_env();

    let level = if cli_args.debugging {
        Level::TRACE
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let host = cli_args
        .host
        .unwrap_or_else(|| client::DEFAULT_HOST.to_owned());
    let port = cli_args.port.unwrap_or(client::DEFAULT_PORT);
    let system_id = cli_args.system_id.unwrap_or_default();
    let password = cli_args.password.unwrap_or_default();

    let (session, mut events) = client::connect(&host, port).await?;

    let bound = session
        .bind_transceiver(|pdu| pdu.field("system_id", system_id).field("password", password))
        .await?;
    if !bound.is_ok() {
        eprintln!("Bind failed: {bound}");
        session.close();
        return Err("bind rejected".into());
    }
    println!("Connected and bound successfully");

    let wants_receipt = cli_args.wait > 0;
    let submitted = session
        .submit_sm(|pdu| {
            pdu.field("source_addr", cli_args.from)
                .field("destination_addr", cli_args.to)
                .field("registered_delivery", u8::from(wants_receipt))
                .field("short_message", cli_args.message)
        })
        .await?;
    match submitted.get("message_id").and_then(|v| v.as_str()) {
        Some(id) if submitted.is_ok() => println!("Message sent successfully! Message ID: {id}"),
        _ => eprintln!("Failed to send message: {submitted}"),
    }

    if wants_receipt {
        let wait = tokio::time::sleep(Duration::from_secs(cli_args.wait));
        tokio::pin!(wait);
        loop {
            tokio::select! {
                _ = &mut wait => break,
                event = events.recv() => match event {
                    Some(SessionEvent::Pdu(pdu)) if pdu.is_delivery_acknowledgement() => {
                        match pdu.delivery_acknowledgement() {
                            Ok(receipt) => println!("Receipt for {}: {}", receipt.id, receipt.status),
                            Err(e) => eprintln!("Unreadable receipt: {e}"),
                        }
                        session.send(pdu.response().build()?)?;
                        break;
                    }
                    Some(SessionEvent::Closed) | None => break,
                    Some(_) => {}
                },
            }
        }
    }

    if let Err(e) = session.unbind(|pdu| pdu).await {
        eprintln!("Warning: Unbind failed: {e}");
    }
    session.close();
    Ok(())
}
