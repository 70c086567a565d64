use clap::{Parser, Subcommand};

use crate::expiry::REMINDER_EXPIRING_DAYS;
use crate::models::Compartment;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the inventory CSV file (name,category,compartment,expiry_date)
    #[arg(short, long)]
    pub inventory: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Suggest recipes that use up what is in the fridge
    Suggest,
    /// List items, optionally for one compartment (e.g. 蔬果盒 or crisper)
    List {
        #[arg(short, long, value_parser = parse_compartment)]
        compartment: Option<Compartment>,
    },
    /// Items expiring within the given number of days
    Expiring {
        #[arg(short, long, default_value_t = REMINDER_EXPIRING_DAYS)]
        days: i64,
    },
    /// Fridge statistics
    Stats,
    /// Send an expiry reminder
    Remind {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, default_value_t = REMINDER_EXPIRING_DAYS)]
        days: i64,
    },
    /// Guess a food item from label text
    ReadLabel {
        #[arg(short, long)]
        text: String,
    },
}

fn parse_compartment(raw: &str) -> Result<Compartment, String> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|_| format!("unknown compartment '{}'", raw))
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
