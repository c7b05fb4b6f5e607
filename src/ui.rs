use colored::Colorize;
use reconcile::{Event, Outcome, Report};

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

// ============================================================================
// Reconciliation Reports
// ============================================================================

/// Text after the verb: `name`, `name [branch]`, `name: cause` or `name commit`
pub fn subject(event: &Event) -> String {
    match &event.outcome {
        Outcome::Ok { branch: Some(b) } | Outcome::Updated { branch: Some(b) } => {
            format!("{} [{b}]", event.name)
        }
        Outcome::Revision { commit } => format!("{} {commit}", event.name),
        Outcome::Error(e) => format!("{}: {e}", event.name),
        _ => event.name.clone(),
    }
}

/// One line per report: results on stdout, failures on stderr
pub fn report(report: &Report) {
    match report {
        Report::Entry(event) => match &event.outcome {
            Outcome::Revision { .. } => println!("{}", subject(event)),
            Outcome::Error(_) => eprintln!("{} {}", "ERROR".red().bold(), subject(event)),
            outcome => {
                let verb = match outcome {
                    Outcome::Cloned => outcome.verb().cyan(),
                    Outcome::Updated { .. } => outcome.verb().green(),
                    _ => outcome.verb().normal(),
                };
                println!("{verb} {}", subject(event));
            }
        },
        Report::Deleted(name) => println!("{} {name}", "DELETE".yellow()),
        Report::SweepFailed { target, error } => {
            eprintln!("{} {target}: cannot remove ({error})", "ERROR".red().bold());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reconcile::EntryError;

    fn event(outcome: Outcome) -> Event {
        Event {
            name: "telescope.nvim".to_string(),
            outcome,
        }
    }

    #[test]
    fn test_subject_plain() {
        assert_eq!(subject(&event(Outcome::Cloned)), "telescope.nvim");
        assert_eq!(
            subject(&event(Outcome::Ok { branch: None })),
            "telescope.nvim"
        );
    }

    #[test]
    fn test_subject_with_branch() {
        let e = event(Outcome::Updated {
            branch: Some("master".to_string()),
        });
        assert_eq!(subject(&e), "telescope.nvim [master]");
    }

    #[test]
    fn test_subject_error_and_revision() {
        assert_eq!(
            subject(&event(Outcome::Error(EntryError::NotInstalled))),
            "telescope.nvim: not installed"
        );
        assert_eq!(
            subject(&event(Outcome::Revision {
                commit: "abc123".to_string()
            })),
            "telescope.nvim abc123"
        );
    }
}
