mod app;
mod cli;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, warn};
use tracing_subscriber::{fmt, EnvFilter};

use ride_core::backend::http::HttpSessionBackend;
use ride_core::role::Role;

use crate::app::{NavigationReport, RideApp};
use crate::cli::{Cli, Command};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("tracing init failed: {err}");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    let backend = match HttpSessionBackend::from_config(&config) {
        Ok(backend) => backend,
        Err(err) => {
            error!(error = %err, "failed to build session backend");
            return ExitCode::FAILURE;
        }
    };
    let app = RideApp::new(&config, backend);

    match cli.command {
        Command::Navigate {
            path,
            rider_token,
            captain_token,
        } => {
            for (role, token) in [(Role::Rider, rider_token), (Role::Captain, captain_token)] {
                let Some(token) = token else { continue };
                if let Err(err) = app.sign_in(role, &token) {
                    error!(%role, error = %err, "cannot store token");
                    return ExitCode::FAILURE;
                }
            }
            match app.navigate(&path).await {
                NavigationReport::Public(screen) => println!("{path}: public screen {screen:?}"),
                NavigationReport::Granted { screen, user } => {
                    println!("{path}: {screen:?} for {user}")
                }
                NavigationReport::LoggedOut(outcome) => {
                    println!("{path}: logged out, redirect to {}", outcome.redirect_to)
                }
                NavigationReport::Redirected { to, reason } => {
                    println!("{path}: redirect to {to} ({reason:?})")
                }
                NavigationReport::NotFound => {
                    println!("{path}: no such route");
                    return ExitCode::FAILURE;
                }
            }
        }
        Command::Logout { role, token } => {
            let role = Role::from(role);
            if let Err(err) = app.sign_in(role, &token) {
                error!(%role, error = %err, "cannot store token");
                return ExitCode::FAILURE;
            }
            let outcome = app.logout(role).await;
            if !outcome.backend_acknowledged {
                warn!(%role, "backend did not acknowledge logout");
            }
            println!("{role} logged out, redirect to {}", outcome.redirect_to);
        }
        Command::Fares { trip, surge } => match app.quote(trip.into(), surge) {
            Ok(catalog) => {
                println!("fare catalog revision {}", catalog.revision());
                for (vehicle, fare) in catalog.iter() {
                    println!("  {:<8} {:>10}", vehicle.display_name(), fare);
                }
            }
            Err(err) => {
                error!(error = %err, "cannot price trip");
                return ExitCode::FAILURE;
            }
        },
        Command::Book { vehicle, trip } => match app.book(&vehicle, trip.into()) {
            Ok(report) => {
                for option in &report.options {
                    println!(
                        "  {:<8} seats {} | {} min away | {} | {}",
                        option.display_name,
                        option.capacity,
                        option.eta_minutes,
                        option.blurb,
                        option.fare
                    );
                }
                match report.confirmed() {
                    Some(ride) => println!("confirmed {} at {}", ride.vehicle, ride.fare),
                    None => {
                        println!("no ride booked: {:?}", report.outcome);
                        return ExitCode::FAILURE;
                    }
                }
            }
            Err(err) => {
                error!(error = %err, "cannot price trip");
                return ExitCode::FAILURE;
            }
        },
    }

    ExitCode::SUCCESS
}
