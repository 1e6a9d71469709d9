use std::io::ErrorKind;

use dialoguer::{Error as DialoguerError, Input, Password};
use dockci_core::DeploymentMode;
use secrecy::SecretString;

/// Attempts allowed for a required value before the run is abandoned.
pub const MAX_ATTEMPTS: u32 = 2;

/// Source of interactive answers.
pub trait Prompter {
    /// Read one line of free text. An empty answer means "take the default";
    /// callers resolve that themselves.
    fn input(&mut self, prompt: &str, default: Option<&str>) -> anyhow::Result<String>;

    /// Read a value without echoing it.
    fn secret(&mut self, prompt: &str) -> anyhow::Result<SecretString>;
}

/// Prompts on the terminal via dialoguer.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn input(&mut self, prompt: &str, default: Option<&str>) -> anyhow::Result<String> {
        let mut input = Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true);
        if let Some(default) = default {
            input = input.default(default.to_owned());
        }
        input.interact_text().map_err(|e| read_error(prompt, e))
    }

    fn secret(&mut self, prompt: &str) -> anyhow::Result<SecretString> {
        let value = Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .map_err(|e| read_error(prompt, e))?;
        Ok(SecretString::from(value))
    }
}

/// Refuses every prompt; used where all values must come from flags.
pub struct NonInteractive;

impl Prompter for NonInteractive {
    fn input(&mut self, prompt: &str, _default: Option<&str>) -> anyhow::Result<String> {
        anyhow::bail!("{prompt} is required in non-interactive mode")
    }

    fn secret(&mut self, prompt: &str) -> anyhow::Result<SecretString> {
        anyhow::bail!("{prompt} is required in non-interactive mode")
    }
}

fn read_error(prompt: &str, err: DialoguerError) -> anyhow::Error {
    match err {
        DialoguerError::IO(e) if e.kind() == ErrorKind::Interrupted => {
            anyhow::anyhow!("cancelled")
        }
        e => anyhow::anyhow!("failed to read {prompt}: {e}"),
    }
}

/// Ask for a value until `parse` accepts it, at most [`MAX_ATTEMPTS`] times.
///
/// Blank input is replaced by `default` before parsing.
pub fn ask<P, T, F>(
    prompter: &mut P,
    prompt: &str,
    default: Option<&str>,
    parse: F,
) -> anyhow::Result<T>
where
    P: Prompter + ?Sized,
    F: Fn(&str) -> Result<T, String>,
{
    for attempt in 1..=MAX_ATTEMPTS {
        let raw = prompter.input(prompt, default)?;
        let raw = raw.trim();
        let value = match default {
            Some(default) if raw.is_empty() => default,
            _ => raw,
        };

        match parse(value) {
            Ok(parsed) => return Ok(parsed),
            Err(reason) => {
                tracing::debug!(attempt, prompt, "input rejected");
                if attempt < MAX_ATTEMPTS {
                    eprintln!("  {reason}; please try again");
                } else {
                    eprintln!("  {reason}");
                }
            }
        }
    }
    anyhow::bail!("{prompt}: no valid value after {MAX_ATTEMPTS} attempts")
}

/// [`ask`] for a free-text value that only has to be non-blank.
pub fn ask_required<P: Prompter + ?Sized>(
    prompter: &mut P,
    prompt: &str,
    default: Option<&str>,
) -> anyhow::Result<String> {
    ask(prompter, prompt, default, |v| {
        if v.is_empty() {
            Err(format!("{prompt} must not be empty"))
        } else {
            Ok(v.to_owned())
        }
    })
}

/// Hidden-input variant of [`ask_required`].
pub fn ask_secret<P: Prompter + ?Sized>(
    prompter: &mut P,
    prompt: &str,
) -> anyhow::Result<SecretString> {
    use secrecy::ExposeSecret;

    for _ in 1..=MAX_ATTEMPTS {
        let value = prompter.secret(prompt)?;
        if !value.expose_secret().trim().is_empty() {
            return Ok(value);
        }
        eprintln!("  {prompt} must not be empty");
    }
    anyhow::bail!("{prompt}: no value after {MAX_ATTEMPTS} attempts")
}

/// Single-letter menu over a subset of deployment modes.
#[derive(Debug, Clone)]
pub struct ModeMenu {
    choices: Vec<DeploymentMode>,
    default: DeploymentMode,
}

impl ModeMenu {
    /// `default` must be one of `choices`; otherwise the first choice is used.
    pub fn new(choices: &[DeploymentMode], default: DeploymentMode) -> Self {
        let default = match choices.first() {
            Some(first) if !choices.contains(&default) => *first,
            _ => default,
        };
        Self {
            choices: choices.to_vec(),
            default,
        }
    }

    /// The A/B/C menu offering every mode.
    pub fn standard(default: DeploymentMode) -> Self {
        Self::new(&DeploymentMode::ALL, default)
    }

    pub fn default_mode(&self) -> DeploymentMode {
        self.default
    }

    /// Map one letter (any case) to a mode offered by this menu.
    pub fn parse(&self, input: &str) -> Result<DeploymentMode, String> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(self.default);
        }

        let mut chars = input.chars();
        let selected = match (chars.next(), chars.next()) {
            (Some(letter), None) => DeploymentMode::from_letter(letter),
            _ => None,
        };
        selected
            .filter(|mode| self.choices.contains(mode))
            .ok_or_else(|| {
                format!(
                    "'{input}' is not a valid choice (expected one of {})",
                    self.letters()
                )
            })
    }

    fn letters(&self) -> String {
        self.choices
            .iter()
            .map(|m| m.letter().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Show the menu, then read a selection with the usual retry limit.
    pub fn select<P: Prompter + ?Sized>(&self, prompter: &mut P) -> anyhow::Result<DeploymentMode> {
        eprintln!("Deployment mode:");
        for mode in &self.choices {
            eprintln!("  {}) {:<15} {}", mode.letter(), mode.name(), mode.description());
        }
        let default = self.default_mode().letter().to_string();
        ask(prompter, "Choose deployment mode", Some(&default), |v| {
            self.parse(v)
        })
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedPrompter;
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn menu_letters_are_case_insensitive() {
        let menu = ModeMenu::standard(DeploymentMode::Inline);
        assert_eq!(menu.parse("b"), Ok(DeploymentMode::LocalReusable));
        assert_eq!(menu.parse(" C "), Ok(DeploymentMode::RemoteShared));
    }

    #[test]
    fn menu_blank_selects_default() {
        let menu = ModeMenu::standard(DeploymentMode::LocalReusable);
        assert_eq!(menu.parse(""), Ok(DeploymentMode::LocalReusable));
    }

    #[test]
    fn two_way_menu_rejects_third_letter() {
        let menu = ModeMenu::new(
            &[DeploymentMode::Inline, DeploymentMode::LocalReusable],
            DeploymentMode::LocalReusable,
        );
        let err = menu.parse("c").unwrap_err();
        assert!(err.contains("A, B"));
    }

    #[test]
    fn menu_rejects_words() {
        let menu = ModeMenu::standard(DeploymentMode::Inline);
        assert!(menu.parse("inline").is_err());
        assert!(menu.parse("AB").is_err());
    }

    #[test]
    fn menu_default_outside_choices_falls_back_to_first() {
        let menu = ModeMenu::new(&[DeploymentMode::LocalReusable], DeploymentMode::RemoteShared);
        assert_eq!(menu.default_mode(), DeploymentMode::LocalReusable);
    }

    #[test]
    fn select_retries_once_then_accepts() {
        let mut prompter = ScriptedPrompter::new(["x", "b"]);
        let mode = ModeMenu::standard(DeploymentMode::Inline)
            .select(&mut prompter)
            .unwrap();
        assert_eq!(mode, DeploymentMode::LocalReusable);
    }

    #[test]
    fn select_fails_after_two_invalid_answers() {
        let mut prompter = ScriptedPrompter::new(["x", "z", "a"]);
        let err = ModeMenu::standard(DeploymentMode::Inline)
            .select(&mut prompter)
            .unwrap_err();
        assert!(err.to_string().contains("2 attempts"));
        assert_eq!(prompter.remaining(), 1);
    }

    #[test]
    fn ask_required_uses_default_for_blank() {
        let mut prompter = ScriptedPrompter::new([""]);
        let value = ask_required(&mut prompter, "Dockerfile path", Some("./Dockerfile")).unwrap();
        assert_eq!(value, "./Dockerfile");
    }

    #[test]
    fn ask_required_fails_after_two_blanks_without_default() {
        let mut prompter = ScriptedPrompter::new(["", "   "]);
        assert!(ask_required(&mut prompter, "Docker Hub username", None).is_err());
    }

    #[test]
    fn ask_secret_retries_blank() {
        let mut prompter = ScriptedPrompter::new(["", "dckr_pat_abc"]);
        let token = ask_secret(&mut prompter, "Docker Hub token").unwrap();
        assert_eq!(token.expose_secret(), "dckr_pat_abc");
    }

    #[test]
    fn non_interactive_refuses_prompts() {
        let err = ask_required(&mut NonInteractive, "Docker Hub username", None).unwrap_err();
        assert!(err.to_string().contains("non-interactive"));
    }
}
