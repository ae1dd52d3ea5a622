use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{sleep_until, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coinflip::config::Config;
use coinflip::host::{render_help, render_history, render_view, Intent};
use coinflip::{repository, FlipTicket, SecureRandomness, WagerService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with JSON formatting (configurable via env)
    let use_json = std::env::var("LOG_FORMAT")
        .unwrap_or_else(|_| "text".to_string())
        .eq_ignore_ascii_case("json");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "coinflip=info".into());

    // Logs go to stderr, stdout belongs to the game
    if use_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::info!(
        service = "coinflip",
        version = env!("CARGO_PKG_VERSION"),
        log_format = if use_json { "json" } else { "text" },
        "Starting coin flip"
    );

    let config = Config::load()?;
    tracing::info!("Configuration loaded");

    let repository = repository::from_config(&config.store).await?;
    let mut service = WagerService::open(repository, Arc::new(SecureRandomness::new())).await?;
    let flip_delay = config.game.flip_delay();

    println!("{}\n", render_help());
    println!("{}", render_view(&service.view()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut in_flight: Option<(FlipTicket, Instant)> = None;

    loop {
        let deadline = in_flight.map(|(_, deadline)| deadline);

        tokio::select! {
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if let Some((ticket, _)) = in_flight.take() {
                    let round = service.resolve_flip(&ticket).await?;
                    tracing::debug!(outcome = %round.outcome, "Coin landed");
                    println!("{}", render_view(&service.view()));
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };

                let intent = match line.parse::<Intent>() {
                    Ok(intent) => intent,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                };

                match intent {
                    Intent::SelectBet(bet) => {
                        service.select_bet(bet);
                        println!("{}", render_view(&service.view()));
                    }
                    Intent::SelectChoice(face) => {
                        service.select_choice(face);
                        println!("{}", render_view(&service.view()));
                    }
                    Intent::Flip => match service.place_flip().await {
                        Ok(ticket) => {
                            in_flight = Some((ticket, Instant::now() + flip_delay));
                            println!("{}", render_view(&service.view()));
                        }
                        Err(e) if e.is_rejection() => println!("{}", service.view().message),
                        Err(e) => return Err(e.into()),
                    },
                    Intent::Reset => {
                        // The session cancels the in-flight flip, so its ticket is dead
                        service.reset().await;
                        in_flight = None;
                        println!("{}", render_view(&service.view()));
                    }
                    Intent::Show => println!("{}", render_view(&service.view())),
                    Intent::History => println!("{}", render_history(&service.view().history)),
                    Intent::Help => println!("{}", render_help()),
                    Intent::Quit => break,
                }
            }
        }
    }

    // A placed flip always resolves, even when the player leaves mid-spin
    if let Some((ticket, deadline)) = in_flight.take() {
        sleep_until(deadline).await;
        service.resolve_flip(&ticket).await?;
        println!("{}", render_view(&service.view()));
    }

    tracing::info!(balance = %service.session().balance(), "Session closed");
    Ok(())
}
