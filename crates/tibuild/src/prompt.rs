//! Terminal prompts backed by `dialoguer`.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Select};
use tibuild_sdk::{Prompter, WizardError};

/// Arrow-key menu prompter. Esc or `q` dismisses the menu, which the wizard
/// treats as cancelling the session.
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    /// Asks whether to run another session. Dismissing counts as "no".
    pub fn another_build(&self) -> Result<bool, WizardError> {
        let answer = Confirm::with_theme(&self.theme)
            .with_prompt("Start another build?")
            .default(true)
            .interact_opt()
            .map_err(|e| WizardError::Prompt(e.to_string()))?;
        Ok(answer.unwrap_or(false))
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn select(&mut self, prompt: &str, options: &[String]) -> Result<Option<usize>, WizardError> {
        Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(options)
            .default(0)
            .interact_opt()
            .map_err(|e| WizardError::Prompt(e.to_string()))
    }
}
