use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use scanhook_config::Workspace;

#[derive(Parser, Debug)]
#[command(name = "scanhook")]
#[command(about = "Recognize text in the newest screenshot and post it to a webhook")]
#[command(version)]
pub struct Cli {
    /// Program directory holding settings.ini, captures and ocr.log
    /// [default: directory of the executable]
    #[arg(short, long, env = "SCANHOOK_DIR")]
    pub dir: Option<PathBuf>,

    /// Print the effective settings as JSON and exit
    #[arg(long)]
    pub dump_config: bool,

    /// Verbose stderr logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn workspace(&self) -> Result<Workspace> {
        match &self.dir {
            Some(dir) => Ok(Workspace::new(dir)),
            None => Workspace::from_current_exe().context("Failed to locate program directory"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_flag() {
        let cli = Cli::try_parse_from(["scanhook", "--dir", "/srv/captures", "-v"]).unwrap();
        assert_eq!(
            cli.workspace().unwrap(),
            Workspace::new("/srv/captures")
        );
        assert!(cli.verbose);
        assert!(!cli.dump_config);
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
