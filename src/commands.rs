/// `:` commands of the terminal app and their autocomplete
use crate::shell::PageId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAction {
  /// Follow a `data-page` link
  Open(PageId),
  Back,
  Install,
  /// Turn down the install prompt
  DismissInstall,
  Share,
  Language,
  Logout,
  Quit,
}

#[derive(Debug, Clone)]
pub struct Command {
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  pub description: &'static str,
  pub action: CommandAction,
}

/// All available commands
pub const COMMANDS: &[Command] = &[
  Command {
    name: "home",
    aliases: &["h", "inicio"],
    description: "Partidos de hoy",
    action: CommandAction::Open(PageId::Home),
  },
  Command {
    name: "matches",
    aliases: &["m", "partidos"],
    description: "Todos los partidos",
    action: CommandAction::Open(PageId::Matches),
  },
  Command {
    name: "profile",
    aliases: &["p", "perfil"],
    description: "Mi perfil",
    action: CommandAction::Open(PageId::Profile),
  },
  Command {
    name: "settings",
    aliases: &["config", "ajustes"],
    description: "Configuración",
    action: CommandAction::Open(PageId::Settings),
  },
  Command {
    name: "back",
    aliases: &["b", "atras"],
    description: "Go back in history",
    action: CommandAction::Back,
  },
  Command {
    name: "install",
    aliases: &["i", "a2hs"],
    description: "Add to home screen",
    action: CommandAction::Install,
  },
  Command {
    name: "dismiss",
    aliases: &["later", "despues"],
    description: "Not now",
    action: CommandAction::DismissInstall,
  },
  Command {
    name: "share",
    aliases: &["compartir"],
    description: "Share the current page",
    action: CommandAction::Share,
  },
  Command {
    name: "lang",
    aliases: &["l", "idioma"],
    description: "Toggle language",
    action: CommandAction::Language,
  },
  Command {
    name: "logout",
    aliases: &["o", "salir"],
    description: "Cerrar sesión",
    action: CommandAction::Logout,
  },
  Command {
    name: "quit",
    aliases: &["q", "exit"],
    description: "Exit futbol-total",
    action: CommandAction::Quit,
  },
];

/// Match rank of a command for the input; lower is better.
fn rank(cmd: &Command, input: &str) -> Option<u32> {
  if cmd.name == input {
    Some(0)
  } else if cmd.aliases.contains(&input) {
    Some(1)
  } else if cmd.name.starts_with(input) {
    Some(2)
  } else if cmd.aliases.iter().any(|a| a.starts_with(input)) {
    Some(3)
  } else if cmd.name.contains(input) {
    Some(4)
  } else if cmd.aliases.iter().any(|a| a.contains(input)) {
    Some(5)
  } else {
    None
  }
}

/// Get autocomplete suggestions for a given input
pub fn get_suggestions(input: &str) -> Vec<&'static Command> {
  let input = input.trim().to_lowercase();
  if input.is_empty() {
    return COMMANDS.iter().collect();
  }

  let mut matches: Vec<(&Command, u32)> = COMMANDS
    .iter()
    .filter_map(|cmd| rank(cmd, &input).map(|r| (cmd, r)))
    .collect();
  // Stable sort keeps declaration order within a rank
  matches.sort_by_key(|(_, r)| *r);
  matches.into_iter().map(|(cmd, _)| cmd).collect()
}

/// Resolve typed input, preferring the highlighted suggestion.
pub fn resolve(input: &str, selected: usize) -> Option<&'static Command> {
  get_suggestions(input).get(selected).copied()
}
