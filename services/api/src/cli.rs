use crate::demo::{run_demo, run_report, DemoArgs, ReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use esg_ledger::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "ESG Ledger",
    about = "Record annual ESG questionnaire responses and report derived sustainability ratios",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print stored responses for one user from the configured store
    Report(ReportArgs),
    /// Seed an in-memory store with sample responses and print the report
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Report(args) => run_report(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::ReportFormat;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn missing_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["esg-ledger-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn report_requires_non_blank_user() {
        assert!(Cli::try_parse_from(["esg-ledger-api", "report", "--user", " "]).is_err());

        let cli = Cli::try_parse_from([
            "esg-ledger-api",
            "report",
            "--user",
            "user-u",
            "--year",
            "2023-24",
            "--format",
            "csv",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Report(args)) => {
                assert_eq!(args.user.as_str(), "user-u");
                assert_eq!(args.year.as_ref().map(|year| year.as_str()), Some("2023-24"));
                assert_eq!(args.format, ReportFormat::Csv);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
