//! Command-line interface definitions.
//!
//! Single-purpose command: point dupsleuth at a directory and it
//! fingerprints every image underneath, moving duplicates to the
//! system trash and recording each move in a manifest.
//!
//! # Example
//!
//! ```bash
//! # Scan a directory, quarantining duplicates to trash
//! dupsleuth ~/Pictures
//!
//! # Scan additional extensions and write the manifest elsewhere
//! dupsleuth ~/Pictures --ext webp --manifest /tmp/duplicates.txt
//!
//! # Verbose mode for debugging
//! dupsleuth -v ~/Pictures
//! ```

use clap::Parser;
use std::path::PathBuf;

use crate::manifest::DEFAULT_MANIFEST_NAME;

/// Duplicate image scanner that quarantines duplicates to the trash.
///
/// dupsleuth walks a directory tree, computes a perceptual fingerprint
/// for every image, and moves files whose fingerprint was already seen
/// to the system trash. Every move is recorded in a plain-text
/// manifest so the scan can be audited afterwards.
#[derive(Debug, Parser)]
#[command(name = "dupsleuth")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory containing the image files to scan
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// Extra extensions to scan, besides png/jpg/jpeg
    /// (can be specified multiple times)
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Where to write the audit manifest
    ///
    /// The file is created fresh for each scan; one line is appended
    /// per quarantined duplicate.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_MANIFEST_NAME)]
    pub manifest: PathBuf,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Emit errors as JSON on stderr (for scripting)
    #[arg(long)]
    pub json_errors: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_directory() {
        let cli = Cli::parse_from(["dupsleuth", "/pics"]);

        assert_eq!(cli.directory, PathBuf::from("/pics"));
        assert_eq!(cli.manifest, PathBuf::from("duplicates.txt"));
        assert!(cli.extensions.is_empty());
        assert!(!cli.quiet);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_cli_extension_overrides() {
        let cli = Cli::parse_from(["dupsleuth", "/pics", "--ext", "webp", "--ext", "bmp"]);

        assert_eq!(cli.extensions, vec!["webp", "bmp"]);
    }

    #[test]
    fn test_cli_manifest_override() {
        let cli = Cli::parse_from(["dupsleuth", "/pics", "--manifest", "/tmp/audit.txt"]);

        assert_eq!(cli.manifest, PathBuf::from("/tmp/audit.txt"));
    }

    #[test]
    fn test_cli_verbosity_flags() {
        let cli = Cli::parse_from(["dupsleuth", "-vv", "/pics"]);
        assert_eq!(cli.verbose, 2);

        let cli = Cli::parse_from(["dupsleuth", "--quiet", "/pics"]);
        assert!(cli.quiet);
    }

    #[test]
    fn test_cli_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["dupsleuth", "-v", "--quiet", "/pics"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_requires_directory() {
        let result = Cli::try_parse_from(["dupsleuth"]);
        assert!(result.is_err());
    }
}
