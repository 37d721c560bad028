/// Solver command lines
///
/// Commands are split into an argument vector with POSIX-like quoting rules
/// and executed directly, never through a shell.
use crate::config::types::{GraderError, Result};
use std::fmt;

/// A parsed solver invocation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolverCommand {
    raw: String,
    argv: Vec<String>,
}

impl SolverCommand {
    /// Split `line` into arguments.
    ///
    /// Whitespace separates arguments. Single quotes preserve everything
    /// literally; double quotes allow `\"`, `\\`, `` \` `` and `\$` escapes;
    /// outside quotes a backslash escapes the next character.
    pub fn parse(line: &str) -> Result<Self> {
        let argv = split_words(line)?;
        if argv.is_empty() {
            return Err(GraderError::Config("solver command is empty".to_string()));
        }
        Ok(Self {
            raw: line.trim().to_string(),
            argv,
        })
    }

    /// Build from an explicit argument vector.
    pub fn from_argv(argv: Vec<String>) -> Result<Self> {
        if argv.is_empty() || argv[0].is_empty() {
            return Err(GraderError::Config("solver command is empty".to_string()));
        }
        Ok(Self {
            raw: argv.join(" "),
            argv,
        })
    }

    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// The command as the operator typed it
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for SolverCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Quote {
    None,
    Single,
    Double,
}

fn split_words(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote = Quote::None;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match (quote, ch) {
            (Quote::Single, '\'') => quote = Quote::None,
            (Quote::Single, _) => current.push(ch),
            (Quote::Double, '"') => quote = Quote::None,
            (Quote::Double, '\\') => match chars.next() {
                Some(next @ ('"' | '\\' | '$' | '`')) => current.push(next),
                Some(next) => {
                    current.push('\\');
                    current.push(next);
                }
                None => break,
            },
            (Quote::Double, _) => current.push(ch),
            (Quote::None, '\'') => {
                quote = Quote::Single;
                in_word = true;
            }
            (Quote::None, '"') => {
                quote = Quote::Double;
                in_word = true;
            }
            (Quote::None, '\\') => match chars.next() {
                Some(next) => {
                    current.push(next);
                    in_word = true;
                }
                None => {
                    return Err(GraderError::Config(
                        "solver command ends with a dangling backslash".to_string(),
                    ))
                }
            },
            (Quote::None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (Quote::None, _) => {
                current.push(ch);
                in_word = true;
            }
        }
    }

    if quote != Quote::None {
        return Err(GraderError::Config(format!(
            "unterminated quote in solver command: {line}"
        )));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(line: &str) -> Vec<String> {
        SolverCommand::parse(line).unwrap().argv().to_vec()
    }

    #[test]
    fn splits_on_whitespace() {
        assert_eq!(argv("  python3   solver.py  "), ["python3", "solver.py"]);
        assert_eq!(SolverCommand::parse(" ./a ").unwrap().as_str(), "./a");
    }

    #[test]
    fn quotes_group_arguments() {
        assert_eq!(
            argv(r#"sh -c 'echo "hi there"' "a b" c"d"e"#),
            ["sh", "-c", "echo \"hi there\"", "a b", "cde"]
        );
        assert_eq!(argv("prog '' x"), ["prog", "", "x"]);
    }

    #[test]
    fn backslash_escapes() {
        assert_eq!(argv(r"prog a\ b"), ["prog", "a b"]);
        assert_eq!(argv(r#"prog "x\"y" "p\q""#), ["prog", "x\"y", r"p\q"]);
    }

    #[test]
    fn rejects_empty_and_unterminated() {
        assert!(SolverCommand::parse("   ").is_err());
        assert!(SolverCommand::parse("prog 'oops").is_err());
        assert!(SolverCommand::parse("prog \"oops").is_err());
        assert!(SolverCommand::parse("prog \\").is_err());
    }

    #[test]
    fn from_argv_keeps_arguments_verbatim() {
        let cmd = SolverCommand::from_argv(vec!["./solver".into(), "a b".into()]).unwrap();
        assert_eq!(cmd.program(), "./solver");
        assert_eq!(cmd.args(), ["a b"]);
        assert!(SolverCommand::from_argv(Vec::new()).is_err());
    }
}
