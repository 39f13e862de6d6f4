//! Operator prompts via `dialoguer`.

use anyhow::Result;

use crate::application::ports::Prompter;

/// Production `Prompter`.
///
/// `assume_yes` answers every question with yes; `non_interactive` (CI, no
/// TTY) answers with the question's default without prompting.
pub struct DialoguerPrompter {
    pub assume_yes: bool,
    pub non_interactive: bool,
}

impl Prompter for DialoguerPrompter {
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        if self.non_interactive {
            tracing::debug!(prompt, default, "non-interactive; using default answer");
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
