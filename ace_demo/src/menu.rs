//! Exercise menu: listing and choice parsing.

/// What the user picked from the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// `0`: leave without running anything
    Exit,
    /// Zero-based index into the sorted exercise list
    Run(usize),
}

/// Parse a 1-based menu entry. `None` for anything unparsable or out of range.
pub fn parse_choice(input: &str, exercise_count: usize) -> Option<MenuChoice> {
    let choice: usize = input.trim().parse().ok()?;
    match choice {
        0 => Some(MenuChoice::Exit),
        n if n <= exercise_count => Some(MenuChoice::Run(n - 1)),
        _ => None,
    }
}

/// Menu text, one numbered line per exercise
pub fn format_menu(names: &[&str]) -> String {
    let mut menu = String::from("=== Ace Engine Exercises ===\n");
    for (index, name) in names.iter().enumerate() {
        menu.push_str(&format!("  {}) {}\n", index + 1, name));
    }
    menu.push_str("  0) Exit\n");
    menu
}

#[cfg(test)]
#[path = "menu_tests.rs"]
mod tests;
