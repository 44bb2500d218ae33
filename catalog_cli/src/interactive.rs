//! Line-prompt version of the cascading menus.
//!
//! Each menu accepts a number from the list or the exact option text.
//! `b` goes back one menu, `q` quits. Once a member is shown, `p` publishes
//! properties under a suffix.

use std::io::{self, BufRead, Write};

use catalog_core::{CatalogResult, SelectorSession};
use tracing::debug;

use crate::output;

enum Choice {
    Picked(String),
    Back,
    Quit,
}

enum Stage {
    Category,
    Series,
    Member,
    Actions,
}

fn read_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return None;
    }

    let mut input = String::new();
    match io::stdin().lock().read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input.trim().to_string()),
    }
}

fn prompt_choice(label: &str, options: &[String]) -> Choice {
    output::print_list(label, options);

    loop {
        let Some(input) = read_line(&format!("{} [1-{}, b=back, q=quit]: ", label, options.len())) else {
            return Choice::Quit;
        };

        match input.as_str() {
            "q" | "Q" => return Choice::Quit,
            "b" | "B" => return Choice::Back,
            _ => {}
        }

        if let Ok(n) = input.parse::<usize>() {
            if (1..=options.len()).contains(&n) {
                return Choice::Picked(options[n - 1].clone());
            }
            println!("Invalid choice: {}. Enter a number between 1 and {}.", n, options.len());
            continue;
        }

        if options.iter().any(|o| *o == input) {
            return Choice::Picked(input);
        }
        println!("Unknown option: {}", input);
    }
}

/// Run the cascading picker until the user quits.
pub fn run(session: &mut SelectorSession) -> CatalogResult<()> {
    let mut stage = Stage::Category;

    loop {
        stage = match stage {
            Stage::Category => {
                let options = session.category_options();
                if options.is_empty() {
                    println!("No catalog files in {}", session.inventory().root().display());
                    return Ok(());
                }
                match prompt_choice("Section Type", &options) {
                    Choice::Picked(category) => {
                        session.select_category(&category);
                        Stage::Series
                    }
                    Choice::Back => Stage::Category,
                    Choice::Quit => return Ok(()),
                }
            }
            Stage::Series => {
                let options = session.series_options().to_vec();
                match prompt_choice("Series", &options) {
                    Choice::Picked(series) => {
                        session.select_series(&series);
                        output::print_diagnostics(session);
                        if session.member_options().is_empty() {
                            Stage::Series
                        } else {
                            Stage::Member
                        }
                    }
                    Choice::Back => Stage::Category,
                    Choice::Quit => return Ok(()),
                }
            }
            Stage::Member => {
                let options = session.member_options().to_vec();
                match prompt_choice("Member", &options) {
                    Choice::Picked(member) => {
                        session.select_member(&member);
                        println!();
                        output::print_member(session);
                        Stage::Actions
                    }
                    Choice::Back => Stage::Series,
                    Choice::Quit => return Ok(()),
                }
            }
            Stage::Actions => {
                let Some(input) = read_line("\n[p=publish, b=back to members, q=quit]: ") else {
                    return Ok(());
                };
                match input.as_str() {
                    "p" | "P" => {
                        publish_prompt(session);
                        Stage::Actions
                    }
                    "b" | "B" => Stage::Member,
                    "q" | "Q" => return Ok(()),
                    _ => Stage::Actions,
                }
            }
        };
    }
}

fn publish_prompt(session: &mut SelectorSession) {
    let Some(keys) = read_line("Properties (comma separated, e.g. Ix,Zx,E): ") else {
        return;
    };
    let suffix = read_line("Suffix (e.g. 1): ").unwrap_or_default();

    let keys: Vec<&str> = keys.split(',').map(str::trim).filter(|k| !k.is_empty()).collect();
    debug!(?keys, suffix = %suffix, "publish requested");

    match session.define_properties(&suffix, &keys) {
        Ok(bindings) => {
            println!("Defined {} variable(s):", bindings.len());
            output::print_diagnostics(session);
        }
        Err(e) => println!("Error: {}", e),
    }
}
