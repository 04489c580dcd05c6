use std::io::{self, Write};

use console::style;
use snapscribe_core::{Error, Result as CoreResult, VerifierSource};

/// Ask the user for one missing configuration value on stderr. An empty
/// answer (including closed stdin) is a missing-configuration error.
pub fn ask(label: &str) -> CoreResult<String> {
    eprint!("Enter your {label}: ");
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let value = line.trim().to_string();
    if value.is_empty() {
        return Err(Error::ConfigurationMissing(label.to_string()));
    }
    Ok(value)
}

/// Supplies the out-of-band OAuth verifier by sending the user to the
/// authorization URL and reading the code back from stdin.
pub struct StdinVerifier;

impl VerifierSource for StdinVerifier {
    fn verifier(&self, authorize_url: &str) -> CoreResult<String> {
        eprintln!("Authorize write access by visiting:");
        eprintln!("  {}", style(authorize_url).cyan());
        eprint!("Verifier code: ");
        io::stderr().flush()?;

        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }
}
