use awscron::{AwsSpecificDetails, TimezoneExpander};
use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "awscron",
    about = "Convert AWS crontabs and expand local-time crontabs to UTC",
    version
)]
struct Cli {
    /// Crontab (6-field AWS format, or 5-field standard format with --to-aws)
    crontab: Option<String>,

    /// Validate the AWS crontab without converting it
    #[arg(long)]
    check: bool,

    /// Convert an AWS crontab to standard 5-field cron (the default without --tz)
    #[arg(long, conflicts_with = "to_aws")]
    to_standard: bool,

    /// Convert a standard crontab back to AWS format (requires --details)
    #[arg(long, requires = "details")]
    to_aws: bool,

    /// AWS specific details as JSON, e.g. '{"year":"2024","question_parts":["day"]}'
    #[arg(long)]
    details: Option<String>,

    /// IANA timezone the crontab is written in; prints the equivalent UTC crontabs
    #[arg(long, env = "AWSCRON_TZ")]
    tz: Option<String>,

    /// Year whose DST transitions are used (defaults to the crontab's year field, or the current year)
    #[arg(long, requires = "tz")]
    year: Option<i16>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let crontab = match cli.crontab {
        Some(ref cron) => cron.as_str(),
        None => {
            eprintln!("error: no crontab provided");
            process::exit(2);
        }
    };

    if cli.to_aws {
        let details: AwsSpecificDetails = match cli.details.as_deref().map(serde_json::from_str) {
            Some(Ok(details)) => details,
            Some(Err(e)) => {
                eprintln!("error: invalid --details JSON: {e}");
                process::exit(2);
            }
            None => {
                eprintln!("error: --to-aws requires --details");
                process::exit(2);
            }
        };
        match awscron::standard_to_aws_cron(crontab, &details) {
            Ok(cron) => {
                println!("{cron}");
                process::exit(0);
            }
            Err(e) => {
                eprintln!("{}", e.display_rich());
                process::exit(1);
            }
        }
    }

    if cli.check {
        match awscron::validate_aws_cron(crontab) {
            Ok(()) => {
                println!("\u{2713} valid");
                process::exit(0);
            }
            Err(e) => {
                eprintln!("{}", e.display_rich());
                process::exit(1);
            }
        }
    }

    if let Some(tz) = cli.tz.as_deref().filter(|_| !cli.to_standard) {
        let mut expander = TimezoneExpander::new();
        if let Some(year) = cli.year {
            expander = expander.with_year(year);
        }
        let crons = match expander.expand(crontab, tz) {
            Ok(crons) => crons,
            Err(e) => {
                eprintln!("{}", e.display_rich());
                process::exit(1);
            }
        };
        tracing::info!(count = crons.len(), timezone = tz, "expanded to UTC");

        if cli.json {
            print_json(serde_json::to_string(&crons));
        } else {
            for cron in &crons {
                println!("{cron}");
            }
        }
        process::exit(0);
    }

    // Default: convert to standard cron
    let converted = match awscron::aws_to_standard_cron(crontab) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e.display_rich());
            process::exit(1);
        }
    };

    if cli.json {
        print_json(serde_json::to_string(&converted));
    } else {
        println!("{}", converted.crontab);
    }
}

fn print_json(json: serde_json::Result<String>) {
    match json {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("error: failed to serialize: {e}");
            process::exit(1);
        }
    }
}
