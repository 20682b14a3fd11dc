//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(name = "tarpush")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Tar the current directory and upload it for an API
    Push(PushArgs),
}

#[derive(clap::Args)]
pub struct PushArgs {
    /// API identifier the archive is uploaded for
    #[arg(value_name = "IDENTIFIER")]
    pub identifier: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_push_takes_identifier() {
        let cli = Cli::try_parse_from(["tarpush", "push", "billing"]).unwrap();
        let Commands::Push(args) = cli.command;
        assert_eq!(args.identifier, "billing");
    }

    #[test]
    fn test_push_requires_identifier() {
        let err = Cli::try_parse_from(["tarpush", "push"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_push_rejects_extra_arguments() {
        assert!(Cli::try_parse_from(["tarpush", "push", "a", "b"]).is_err());
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Cli::try_parse_from(["tarpush"]).is_err());
    }
}
