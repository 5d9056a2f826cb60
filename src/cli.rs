use std::path::PathBuf;

use clap::Parser;

/// Terminal music player streaming from a remote search catalog.
#[derive(Parser, Debug, Default)]
#[command(name = "crescendo", version, about)]
pub struct Cli {
    /// Run this catalog search right after startup.
    #[arg(long, short = 's', value_name = "QUERY")]
    pub search: Option<String>,

    /// Config file to use instead of the default location.
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the effective settings as TOML and exit.
    #[arg(long)]
    pub print_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_search_and_config() {
        let cli = Cli::try_parse_from(["crescendo", "--search", "rock & roll", "-c", "/tmp/c.toml"])
            .unwrap();
        assert_eq!(cli.search.as_deref(), Some("rock & roll"));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
        assert!(!cli.print_config);
    }

    #[test]
    fn no_arguments_is_valid() {
        let cli = Cli::try_parse_from(["crescendo"]).unwrap();
        assert!(cli.search.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
