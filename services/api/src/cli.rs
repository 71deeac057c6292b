use crate::demo::{run_demo, run_score, DemoArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use mortgage_intake::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Rate Wizard",
    about = "Run the Get Your Rate lead-capture service or score answers from the command line",
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
    /// Score a saved Answer Set and print the CRM summary
    Score(ScoreArgs),
    /// Walk sample applicants through the wizard, scoring and hand-off
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
        Command::Score(args) => run_score(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve_without_subcommand() {
        let cli = Cli::try_parse_from(["rate-wizard"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn score_requires_an_input_path() {
        assert!(Cli::try_parse_from(["rate-wizard", "score"]).is_err());

        let cli = Cli::try_parse_from(["rate-wizard", "score", "--input", "answers.json", "--json"])
            .expect("parses");
        match cli.command {
            Some(Command::Score(args)) => {
                assert_eq!(args.input.to_string_lossy(), "answers.json");
                assert!(args.json);
            }
            other => panic!("expected score command, got {other:?}"),
        }
    }
}
