use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "vtree",
    about = "Diff, patch and render virtual trees",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compute the patch map between two trees
    Diff(DiffArgs),
    /// Apply a patch map to a rendered tree
    Patch(PatchArgs),
    /// Check that patching OLD yields NEW
    Check(DiffArgs),
    /// Print the markup of a tree
    Render(RenderArgs),
}

#[derive(Args)]
pub struct DiffArgs {
    /// Old tree (JSON)
    pub old: PathBuf,
    /// New tree (JSON)
    pub new: PathBuf,
    /// Diff configuration (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct PatchArgs {
    /// Tree to render before patching (JSON)
    pub old: PathBuf,
    /// Patch map (JSON)
    pub patches: PathBuf,
}

#[derive(Args)]
pub struct RenderArgs {
    pub tree: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_diff() {
        let cli = Cli::try_parse_from(["vtree", "diff", "a.json", "b.json"]).unwrap();
        if let Command::Diff(args) = cli.command {
            assert_eq!(args.old, PathBuf::from("a.json"));
            assert_eq!(args.new, PathBuf::from("b.json"));
            assert!(args.config.is_none());
        } else { panic!("wrong command"); }
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn parse_check_with_config() {
        let cli = Cli::try_parse_from(["vtree", "check", "a.json", "b.json", "--config", "diff.toml"]).unwrap();
        if let Command::Check(args) = cli.command {
            assert_eq!(args.config, Some(PathBuf::from("diff.toml")));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_patch() {
        let cli = Cli::try_parse_from(["vtree", "patch", "old.json", "patches.json"]).unwrap();
        assert!(matches!(cli.command, Command::Patch(_)));
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::try_parse_from(["vtree", "render", "t.json", "--format", "json", "-v"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Command::Render(_)));
    }

    #[test]
    fn diff_requires_two_trees() {
        assert!(Cli::try_parse_from(["vtree", "diff", "a.json"]).is_err());
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["vtree", "render", "t.json", "--format", "yaml"]).is_err());
    }
}
