//! Command-line surface of the client.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use ride_core::config::{ClientConfig, ConfigError};
use ride_core::gate::TransportFailurePolicy;
use ride_core::pricing::TripEstimate;
use ride_core::role::Role;

#[derive(Debug, Parser)]
#[command(
    name = "ride_app",
    about = "Ride-hailing client: session-gated navigation and ride booking",
    long_about = "Navigates the client's routes behind the rider and captain session gates,\n\
                  logs sessions out, and walks the vehicle selection and fare confirmation panels."
)]
pub struct Cli {
    /// JSON config file; RIDE_* environment variables and flags override it
    #[arg(long, env = "RIDE_CONFIG")]
    pub config: Option<PathBuf>,
    /// Backend base URL
    #[arg(long)]
    pub base_url: Option<String>,
    /// Put /riding and /captain-riding behind their role's gate
    #[arg(long)]
    pub gate_riding_screens: bool,
    /// Drop the stored token when the backend cannot be reached
    #[arg(long)]
    pub clear_token_on_transport_failure: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Navigate to a route and report what renders
    Navigate {
        path: String,
        /// Rider session token to seed before navigating
        #[arg(long)]
        rider_token: Option<String>,
        /// Captain session token to seed before navigating
        #[arg(long)]
        captain_token: Option<String>,
    },
    /// End a rider or captain session
    Logout {
        #[arg(value_enum)]
        role: RoleArg,
        #[arg(long)]
        token: String,
    },
    /// Print the fare catalog for a trip
    Fares {
        #[command(flatten)]
        trip: TripArgs,
        /// Surge multiplier applied on top of the base quote
        #[arg(long, default_value_t = 1.0)]
        surge: f64,
    },
    /// Choose a vehicle for a trip and confirm its fare
    Book {
        /// car, moto or auto
        vehicle: String,
        #[command(flatten)]
        trip: TripArgs,
    },
}

#[derive(Debug, Clone, Copy, Args)]
pub struct TripArgs {
    #[arg(long)]
    pub distance_km: f64,
    #[arg(long)]
    pub duration_min: f64,
}

impl From<TripArgs> for TripEstimate {
    fn from(args: TripArgs) -> Self {
        TripEstimate {
            distance_km: args.distance_km,
            duration_min: args.duration_min,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    Rider,
    Captain,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Rider => Role::Rider,
            RoleArg::Captain => Role::Captain,
        }
    }
}

impl Cli {
    /// Defaults, then the config file, then the environment, then flags.
    pub fn resolve_config(&self) -> Result<ClientConfig, ConfigError> {
        let from_file = match &self.config {
            Some(path) => ClientConfig::from_json_file(path)?,
            None => ClientConfig::default(),
        };
        let config = from_file.with_env_overrides()?;
        let config = self.apply_flags(config);
        config.validate()?;
        Ok(config)
    }

    fn apply_flags(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url.clone());
        }
        if self.gate_riding_screens {
            config = config.with_gate_riding_screens(true);
        }
        if self.clear_token_on_transport_failure {
            config = config.with_transport_failure_policy(TransportFailurePolicy::ClearCredential);
        }
        config
    }
}
