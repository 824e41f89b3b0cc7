use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "nupkg",
    about = "Interactive menu for packing NuGet packages",
    version
)]
pub struct Cli {
    /// Project directory or .nuspec file to pack immediately on startup
    pub path: Option<PathBuf>,

    /// Directory holding remembered paths and logs
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_parse_without_arguments() {
        let cli = Cli::try_parse_from(["nupkg"]).unwrap();
        assert!(cli.path.is_none());
        assert!(cli.data_dir.is_none());
    }

    #[test]
    fn test_should_parse_path_and_data_dir() {
        let cli = Cli::try_parse_from(["nupkg", "./MyLib", "--data-dir", "/tmp/state"]).unwrap();
        assert_eq!(cli.path, Some(PathBuf::from("./MyLib")));
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/state")));
    }

    #[test]
    fn test_should_reject_extra_positional() {
        assert!(Cli::try_parse_from(["nupkg", "a", "b"]).is_err());
    }
}
