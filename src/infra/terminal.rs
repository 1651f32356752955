use crate::domain::{AnswerSet, PromptCollector, PromptSchema, ServiceDefinition};
use anyhow::{Context, Result, bail};
use std::io::{self, BufRead, Write};

/// Prompt collector backed by the terminal: questions and the picker go to
/// stderr, answers come from stdin. Stdout stays clean for the summary.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    pub fn new() -> Self {
        Self
    }

    /// None on EOF
    fn read_line(&self) -> Result<Option<String>> {
        let mut line = String::new();
        let bytes = io::stdin()
            .lock()
            .read_line(&mut line)
            .context("reading interactive input")?;
        if bytes == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl PromptCollector for TerminalPrompt {
    fn collect(&self, schemas: &[PromptSchema]) -> Result<AnswerSet> {
        let mut answers = AnswerSet::new();

        for schema in schemas {
            loop {
                eprint!("{} [{}]: ", schema.message, schema.default);
                io::stderr().flush().ok();

                let Some(line) = self.read_line()? else {
                    // EOF: fall back to the default for this and stop asking
                    let value = schema.default.clone();
                    schema.validate(&value)?;
                    answers.insert(schema.name.clone(), value);
                    break;
                };

                let value = if line.is_empty() {
                    schema.default.clone()
                } else {
                    line
                };

                match schema.validate(&value) {
                    Ok(()) => {
                        answers.insert(schema.name.clone(), value);
                        break;
                    }
                    Err(error) => eprintln!("{error}"),
                }
            }
        }

        Ok(answers)
    }

    fn select_services(&self, choices: &[ServiceDefinition]) -> Result<Vec<String>> {
        eprintln!("Takeout containers to enable:");
        for (idx, definition) in choices.iter().enumerate() {
            eprintln!("  {}. {}", idx + 1, definition.menu_label());
        }
        eprint!("Selection (numbers or shortnames, comma-separated, empty cancels): ");
        io::stderr().flush().ok();

        let Some(line) = self.read_line()? else {
            return Ok(Vec::new());
        };
        if line.is_empty() {
            return Ok(Vec::new());
        }

        let mut selected = Vec::new();
        for token in line.split([',', ' ']).map(str::trim) {
            if token.is_empty() {
                continue;
            }
            match token.parse::<usize>() {
                Ok(number) if (1..=choices.len()).contains(&number) => {
                    selected.push(choices[number - 1].short_name.clone());
                }
                Ok(number) => bail!("selection {number} is out of range"),
                // Shortnames are taken as-is; resolution validates them
                Err(_) => selected.push(token.to_string()),
            }
        }

        Ok(selected)
    }
}
