//! Interactive prompts. Each question is asked exactly once per run and the
//! answer travels as an explicit value, never ambient state.

use forge_core::config::Destination;
use std::io::{BufRead, Write};

fn read_line() -> anyhow::Result<Option<String>> {
    let mut line = String::new();
    let n = std::io::stdin().lock().read_line(&mut line)?;
    if n == 0 {
        return Ok(None); // EOF
    }
    Ok(Some(line.trim().to_string()))
}

/// Ask where droids should be installed. Re-asks on unrecognized input.
pub fn choose_destination(verb: &str) -> anyhow::Result<Destination> {
    loop {
        print!("{verb} droids in: [1] this project (.factory/droids)  [2] your user directory (~/.factory/droids): ");
        std::io::stdout().flush()?;
        match read_line()? {
            None => anyhow::bail!("no destination chosen (stdin closed)"),
            Some(answer) => match answer.as_str() {
                "1" | "project" => return Ok(Destination::Project),
                "2" | "user" => return Ok(Destination::User),
                _ => println!("Please enter 1 or 2."),
            },
        }
    }
}

/// Which locations an uninstall should touch.
pub fn choose_uninstall_locations() -> anyhow::Result<Vec<Destination>> {
    loop {
        print!("Remove droids from: [1] project  [2] user  [3] both: ");
        std::io::stdout().flush()?;
        match read_line()? {
            None => anyhow::bail!("no location chosen (stdin closed)"),
            Some(answer) => match answer.as_str() {
                "1" | "project" => return Ok(vec![Destination::Project]),
                "2" | "user" => return Ok(vec![Destination::User]),
                "3" | "both" => return Ok(vec![Destination::Project, Destination::User]),
                _ => println!("Please enter 1, 2 or 3."),
            },
        }
    }
}

/// Yes/no question. Anything other than y/yes counts as no; EOF counts as no.
pub fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{question} [y/N]: ");
    std::io::stdout().flush()?;
    match read_line()? {
        None => Ok(false),
        Some(answer) => Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes")),
    }
}
