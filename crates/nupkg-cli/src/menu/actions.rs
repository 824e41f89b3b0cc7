#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    SetPath,
    SelectPath,
    RemovePath,
    ClearPaths,
    DisplayPath,
    Build,
    Help,
    Exit,
}

pub struct MenuItem {
    pub action: MenuAction,
    pub label: &'static str,
    pub description: &'static str,
}

/// Menu entries in display order.
pub const MENU_ITEMS: &[MenuItem] = &[
    MenuItem {
        action: MenuAction::SetPath,
        label: "Set package path",
        description: "Enter a project directory or .nuspec file to build",
    },
    MenuItem {
        action: MenuAction::SelectPath,
        label: "Select package path",
        description: "Pick a previously built path",
    },
    MenuItem {
        action: MenuAction::RemovePath,
        label: "Remove package path",
        description: "Forget one of the remembered paths",
    },
    MenuItem {
        action: MenuAction::ClearPaths,
        label: "Clear package paths",
        description: "Forget every remembered path",
    },
    MenuItem {
        action: MenuAction::DisplayPath,
        label: "Display package path",
        description: "Show the current path and the remembered paths",
    },
    MenuItem {
        action: MenuAction::Build,
        label: "Build package",
        description: "Run dotnet pack (directories) or nuget pack (.nuspec files)",
    },
    MenuItem {
        action: MenuAction::Help,
        label: "Help",
        description: "Describe every menu option",
    },
    MenuItem {
        action: MenuAction::Exit,
        label: "Exit",
        description: "Save the remembered paths and quit",
    },
];

/// Map a 1-based menu number to its item.
pub fn parse_choice(input: &str) -> Option<&'static MenuItem> {
    let n: usize = input.trim().parse().ok()?;
    n.checked_sub(1).and_then(|i| MENU_ITEMS.get(i))
}
