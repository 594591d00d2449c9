//! Command-line console client.
//!
//! Connection settings come from the environment (`RCON_HOST`,
//! `RCON_PORT`, `RCON_PASSWORD`, and the timeout overrides).
//!
//! ```text
//! console list                  print the player list as JSON
//! console verify <objective>    run the conservation check, JSON report
//! console <command...>          run one raw command, print its reply
//! ```
//!
//! Exits 1 on any failure, including a non-ok conservation report.

use craftcon::prelude::*;
use craftcon::verify_from_remote;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let ok = match run().await {
        Ok(ok) => ok,
        Err(err) => {
            eprintln!("error: {err}");
            false
        }
    };
    if !ok {
        std::process::exit(1);
    }
}

async fn run() -> Result<bool, Error> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((first, rest)) = args.split_first() else {
        eprintln!("usage: console list | console verify <objective> | console <command...>");
        return Ok(false);
    };

    let config = ClientConfig::from_env()?;

    match first.as_str() {
        "list" => {
            let client = RconClient::connect(&config).await?;
            let result = client.player_list().await;
            client.close().await;
            let list = result?;
            println!("{}", serde_json::to_string_pretty(&list).unwrap_or_default());
            Ok(true)
        }
        "verify" => {
            let Some(objective) = rest.first() else {
                eprintln!("usage: console verify <objective>");
                return Ok(false);
            };
            let client = RconClient::connect(&config).await?;
            let report = verify_from_remote(&client, objective).await;
            client.close().await;
            println!("{}", serde_json::to_string_pretty(&report).unwrap_or_default());
            Ok(report.ok)
        }
        _ => {
            let command = args.join(" ");
            let reply = RconClient::one_shot(&config, &command).await?;
            println!("{}", reply.body);
            Ok(true)
        }
    }
}
