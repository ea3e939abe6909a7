//! Command-line argument parsing.
//!
//! Usage:
//!   gordian [-dxs] [-L<dir>] [-p<file>] <script>

use std::path::PathBuf;

use crate::loader::FileLoader;

pub const USAGE: &str = "Usage: gordian [-dxs] [-L<dir>] [-p<file>] <script>";

// ── Public types ──────────────────────────────────────────────────────────────

/// Parsed command-line arguments.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Script root override (`-L<dir>`).
    pub root: Option<PathBuf>,
    /// Properties file whose entries become globals (`-p<file>`).
    pub properties: Option<PathBuf>,
    /// Debug logging (`-d`).
    pub debug: bool,
    /// Stop at the first failing statement (`-x`).
    pub abort_on_error: bool,
    /// Run one statement per tick (`-s`).
    pub step: bool,
    /// Script identifier, relative to the root.
    pub script: String,
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse `std::env::args()` and return [`CliArgs`] or an error message.
pub fn parse_args() -> Result<CliArgs, String> {
    let raw: Vec<String> = std::env::args().collect();
    parse_argv(raw.get(1..).unwrap_or_default())
}

/// Parse a slice of argument strings (exposed for testing).
pub fn parse_argv(argv: &[String]) -> Result<CliArgs, String> {
    let mut args = CliArgs::default();
    let mut positional: Vec<String> = Vec::new();
    let mut i = 0;

    while i < argv.len() {
        let arg = argv[i].as_str();

        if arg == "--" {
            positional.extend(argv[i + 1..].iter().cloned());
            break;
        }

        if !arg.starts_with('-') || arg == "-" {
            positional.push(arg.to_owned());
            i += 1;
            continue;
        }

        let chars: Vec<char> = arg[1..].chars().collect();
        let mut j = 0;
        while j < chars.len() {
            match chars[j] {
                'd' => args.debug = true,
                'x' => args.abort_on_error = true,
                's' => args.step = true,

                // -L<dir> or -L <dir>
                'L' => {
                    let dir = option_value(&chars, &mut j, argv, &mut i)
                        .ok_or("-L requires a directory argument")?;
                    args.root = Some(PathBuf::from(dir));
                }

                // -p<file> or -p <file>
                'p' => {
                    let file = option_value(&chars, &mut j, argv, &mut i)
                        .ok_or("-p requires a file argument")?;
                    args.properties = Some(PathBuf::from(file));
                }

                c => return Err(format!("unknown option: -{c}")),
            }
            j += 1;
        }
        i += 1;
    }

    match positional.len() {
        0 => Err("missing script argument".to_owned()),
        1 => {
            args.script = positional.remove(0);
            Ok(args)
        }
        n => Err(format!("too many arguments ({n})")),
    }
}

/// The value of an option letter at `chars[*j]`: the rest of the same
/// argument, or else the next argument.
fn option_value(chars: &[char], j: &mut usize, argv: &[String], i: &mut usize) -> Option<String> {
    if *j + 1 < chars.len() {
        let s: String = chars[*j + 1..].iter().collect();
        *j = chars.len();
        Some(s)
    } else if *i + 1 < argv.len() {
        *i += 1;
        Some(argv[*i].clone())
    } else {
        None
    }
}

// ── Path helpers ──────────────────────────────────────────────────────────────

/// Determine the directory scripts are loaded from.
///
/// Priority: `-L<dir>` CLI flag → `GORDIAN_ROOT` env var → the platform data
/// directory, if it exists → the working directory.
pub fn resolve_root(cli_override: Option<&PathBuf>) -> PathBuf {
    if let Some(d) = cli_override {
        return d.clone();
    }
    if let Ok(d) = std::env::var("GORDIAN_ROOT") {
        return PathBuf::from(d);
    }
    FileLoader::data_dir()
        .filter(|d| d.is_dir())
        .unwrap_or_else(|| PathBuf::from("."))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|&s| s.to_owned()).collect()
    }

    #[test]
    fn script_only() {
        let a = parse_argv(&argv(&["auto.gor"])).unwrap();
        assert_eq!(a.script, "auto.gor");
        assert!(!a.debug && !a.abort_on_error && !a.step);
        assert!(a.root.is_none() && a.properties.is_none());
    }

    #[test]
    fn missing_script() {
        assert!(parse_argv(&argv(&[])).is_err());
        assert!(parse_argv(&argv(&["-d"])).is_err());
    }

    #[test]
    fn bool_flags() {
        let a = parse_argv(&argv(&["-d", "-x", "-s", "a.gor"])).unwrap();
        assert!(a.debug && a.abort_on_error && a.step);
    }

    #[test]
    fn combined_bool_flags() {
        let a = parse_argv(&argv(&["-dxs", "a.gor"])).unwrap();
        assert!(a.debug && a.abort_on_error && a.step);
    }

    #[test]
    fn root_embedded() {
        let a = parse_argv(&argv(&["-L/some/dir", "a.gor"])).unwrap();
        assert_eq!(a.root, Some(PathBuf::from("/some/dir")));
    }

    #[test]
    fn root_separate() {
        let a = parse_argv(&argv(&["-L", "/some/dir", "a.gor"])).unwrap();
        assert_eq!(a.root, Some(PathBuf::from("/some/dir")));
        assert_eq!(a.script, "a.gor");
    }

    #[test]
    fn properties_after_bool_flags() {
        let a = parse_argv(&argv(&["-dprobot.properties", "a.gor"])).unwrap();
        assert!(a.debug);
        assert_eq!(a.properties, Some(PathBuf::from("robot.properties")));
    }

    #[test]
    fn option_without_value() {
        assert!(parse_argv(&argv(&["a.gor", "-L"])).is_err());
        assert!(parse_argv(&argv(&["a.gor", "-p"])).is_err());
    }

    #[test]
    fn double_dash_ends_flags() {
        let a = parse_argv(&argv(&["--", "-odd.gor"])).unwrap();
        assert_eq!(a.script, "-odd.gor");
    }

    #[test]
    fn too_many_positional() {
        assert!(parse_argv(&argv(&["a.gor", "b.gor"])).is_err());
    }

    #[test]
    fn unknown_flag() {
        assert!(parse_argv(&argv(&["-z", "a.gor"])).is_err());
    }

    #[test]
    fn root_priority() {
        // Only test in this crate touching GORDIAN_ROOT.
        std::env::set_var("GORDIAN_ROOT", "/from/env");
        assert_eq!(resolve_root(None), PathBuf::from("/from/env"));
        let dir = PathBuf::from("/explicit");
        assert_eq!(resolve_root(Some(&dir)), dir);

        std::env::remove_var("GORDIAN_ROOT");
        let fallback = resolve_root(None);
        assert_ne!(fallback, PathBuf::from("/from/env"));
        assert!(fallback == PathBuf::from(".") || fallback.is_dir());
    }
}
