//! Command line: `chartstream [--config <path>] [--capacity <bytes>] [<stream file> ...]`

use std::{ffi::OsString, path::PathBuf};

#[derive(Debug, Default, PartialEq)]
pub struct Args {
    pub config: Option<PathBuf>,
    pub capacity: Option<usize>,
    /// Streams to replay. Empty replays the built-in demo chart.
    pub paths: Vec<PathBuf>,
}
impl Args {
    /// Parse arguments, not including the program name.
    /// # Errors
    /// Unknown options, or options missing their value.
    pub fn parse(args: impl IntoIterator<Item = OsString>) -> anyhow::Result<Self> {
        let mut parsed = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.to_str() {
                Some("--config") => {
                    let path = args
                        .next()
                        .ok_or_else(|| anyhow::anyhow!("--config needs a path"))?;
                    parsed.config = Some(path.into());
                }
                Some("--capacity") => {
                    let bytes = args
                        .next()
                        .ok_or_else(|| anyhow::anyhow!("--capacity needs a byte count"))?;
                    let bytes = bytes
                        .to_str()
                        .and_then(|bytes| bytes.parse().ok())
                        .ok_or_else(|| anyhow::anyhow!("invalid capacity {bytes:?}"))?;
                    parsed.capacity = Some(bytes);
                }
                // Everything after is a path, even if it looks like an option.
                Some("--") => {
                    parsed.paths.extend(args.by_ref().map(PathBuf::from));
                }
                Some(option) if option.starts_with("--") => {
                    anyhow::bail!("unknown option {option}");
                }
                // Paths are OSStrings, let the system handle character encoding restrictions.
                _ => parsed.paths.push(arg.into()),
            }
        }
        Ok(parsed)
    }
}
