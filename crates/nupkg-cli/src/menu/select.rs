use std::io::{self, BufRead, Write};
use std::path::Path;

use nupkg_core::build::path_label;
use nupkg_core::store::PathStore;
use tracing::debug;

use crate::console::Console;

/// List `candidates` with 1-based numbers and ask for one.
///
/// Returns the 0-based index of the choice, or `None` when there is nothing
/// to choose from, the input closed, or `max_attempts` invalid answers were
/// given.
pub fn select_index<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    candidates: &[&str],
    max_attempts: u32,
) -> io::Result<Option<usize>> {
    if candidates.is_empty() {
        console.say("No paths available.")?;
        return Ok(None);
    }

    for (i, path) in candidates.iter().enumerate() {
        console.say(format_args!("{}) {}  {path}", i + 1, path_label(Path::new(path))))?;
    }

    let n = candidates.len();
    for attempt in 1..=max_attempts.max(1) {
        let Some(answer) = console.prompt(format_args!("Select a path (1-{n}): "))? else {
            return Ok(None);
        };
        match answer.trim().parse::<usize>() {
            Ok(choice) if (1..=n).contains(&choice) => return Ok(Some(choice - 1)),
            _ => {
                debug!(attempt, answer = %answer, "invalid selection");
                if attempt < max_attempts {
                    console.say("Invalid selection, try again.")?;
                }
            }
        }
    }

    Ok(None)
}

/// Ask the operator to pick one of the remembered paths.
pub fn select_path<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    paths: &PathStore,
    max_attempts: u32,
) -> io::Result<Option<String>> {
    let candidates: Vec<&str> = paths.iter().collect();
    let index = select_index(console, &candidates, max_attempts)?;
    Ok(index.map(|i| candidates[i].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::tests::{printed, scripted};

    const THREE: &[&str] = &["/work/a", "/work/b", "/work/c"];

    #[test]
    fn test_should_return_chosen_index() {
        let mut console = scripted(&["2"]);
        assert_eq!(select_index(&mut console, THREE, 3).unwrap(), Some(1));

        let out = printed(&console);
        assert!(out.contains("1) a [missing]  /work/a"));
        assert!(out.contains("3) c [missing]  /work/c"));
    }

    #[test]
    fn test_should_reprompt_on_invalid_input() {
        let mut console = scripted(&["0", "abc", "3"]);
        assert_eq!(select_index(&mut console, THREE, 3).unwrap(), Some(2));
        assert_eq!(printed(&console).matches("Invalid selection").count(), 2);
    }

    #[test]
    fn test_should_give_up_after_retry_budget() {
        let mut console = scripted(&["0", "4", "abc", "1"]);
        assert_eq!(select_index(&mut console, THREE, 3).unwrap(), None);
        // the fourth line is left unread
        assert_eq!(console.read_line().unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_should_report_empty_candidates_without_prompting() {
        let mut console = scripted(&["1"]);
        assert_eq!(select_index(&mut console, &[], 3).unwrap(), None);
        assert!(printed(&console).contains("No paths available."));
        assert!(!printed(&console).contains("Select a path"));
    }

    #[test]
    fn test_should_stop_when_input_closes() {
        let mut console = scripted(&["x"]);
        assert_eq!(select_index(&mut console, THREE, 5).unwrap(), None);
    }

    #[test]
    fn test_should_select_remembered_path() {
        let paths: PathStore = ["/work/b", "/work/a"].into_iter().collect();
        let mut console = scripted(&["2"]);
        assert_eq!(
            select_path(&mut console, &paths, 3).unwrap().as_deref(),
            Some("/work/b")
        );
    }
}
