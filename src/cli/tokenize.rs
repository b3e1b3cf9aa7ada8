//! Argument normalization.
//!
//! Rewrites the raw argument list so every element is a single keyword or a
//! single value:
//!
//! - `-vv` becomes `-v -v`
//! - `--clean=dist` becomes `--clean dist`
//! - the value after `-Xcc`, `-Xlinker` or `-Xswiftc` is left untouched

use super::token::SwitchKeyword;
use std::collections::VecDeque;

/// One-slot lookbehind carried across the fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Normal,
    Raw,
}

fn is_raw_consumer(arg: &str) -> bool {
    SwitchKeyword::from_spelling(arg).is_some_and(SwitchKeyword::consumes_raw_argument)
}

pub fn tokenize<I, S>(args: I) -> VecDeque<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = VecDeque::new();
    let mut pending = Pending::Normal;

    for arg in args {
        let arg = arg.as_ref();

        if pending == Pending::Raw {
            pending = Pending::Normal;
            out.push_back(arg.to_string());
            continue;
        }

        if is_raw_consumer(arg) {
            pending = Pending::Raw;
            out.push_back(arg.to_string());
            continue;
        }

        if arg.len() > 1 && arg.starts_with('-') && !arg.starts_with("--") {
            out.extend(arg.chars().skip(1).map(|c| format!("-{c}")));
            continue;
        }

        if let Some((flag, value)) = arg.split_once('=') {
            out.push_back(flag.to_string());
            out.push_back(value.to_string());
            continue;
        }

        out.push_back(arg.to_string());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(args: &[&str]) -> Vec<String> {
        tokenize(args).into_iter().collect()
    }

    #[test]
    fn test_bundled_short_flags_are_split() {
        assert_eq!(tokens(&["-vv"]), vec!["-v", "-v"]);
        assert_eq!(tokens(&["-vk"]), vec!["-v", "-k"]);
    }

    #[test]
    fn test_equals_splits_once() {
        assert_eq!(tokens(&["--clean=dist"]), vec!["--clean", "dist"]);
        assert_eq!(
            tokens(&["--generate-xcodeproj=out=x.xcodeproj"]),
            vec!["--generate-xcodeproj", "out=x.xcodeproj"]
        );
        assert_eq!(
            tokens(&["--chdir=--weird"]),
            vec!["--chdir", "--weird"]
        );
    }

    #[test]
    fn test_passthrough_value_is_untouched() {
        assert_eq!(
            tokens(&["-Xcc", "-I/opt/include", "-vv"]),
            vec!["-Xcc", "-I/opt/include", "-v", "-v"]
        );
        assert_eq!(
            tokens(&["-Xlinker", "-rpath=/usr/lib"]),
            vec!["-Xlinker", "-rpath=/usr/lib"]
        );
    }

    #[test]
    fn test_raw_marker_covers_only_one_token() {
        assert_eq!(
            tokens(&["-Xswiftc", "-Onone", "-vv"]),
            vec!["-Xswiftc", "-Onone", "-v", "-v"]
        );
        // A raw consumer as the value of another raw consumer is plain data.
        assert_eq!(
            tokens(&["-Xcc", "-Xcc", "-vv"]),
            vec!["-Xcc", "-Xcc", "-v", "-v"]
        );
    }

    #[test]
    fn test_lone_dash_is_kept() {
        assert_eq!(tokens(&["-"]), vec!["-"]);
    }

    #[test]
    fn test_canonical_stream_is_a_fixed_point() {
        let canonical = ["--configuration", "release", "-v", "-C", "dir", "--fetch"];
        assert_eq!(tokens(&canonical), canonical.to_vec());

        let once = tokens(&["-vv", "--clean=dist", "-Xcc", "-DFOO=1"]);
        let twice: Vec<String> = tokenize(&once).into_iter().collect();
        assert_eq!(once, twice);
    }
}
