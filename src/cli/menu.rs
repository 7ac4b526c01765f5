//! Interactive menu.

use std::io::{self, BufRead, Write};

use console::style;

use super::app::{App, EXPORT_LIMIT, HISTORY_LIMIT};
use super::render::Mark;
use super::ExportFormat;

/// Line-based prompts over any buffered reader. `None` means end of input.
pub struct Prompter<R> {
    input: R,
}

impl<R: BufRead> Prompter<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    pub fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        print!("{}: ", question);
        io::stdout().flush()?;
        self.read_line()
    }

    /// Ask until one of `choices` is entered. An empty answer picks `default`.
    pub fn choose(
        &mut self,
        question: &str,
        choices: &[&str],
        default: &str,
    ) -> io::Result<Option<String>> {
        loop {
            let prompt = format!("{} [{}] ({})", question, choices.join("/"), default);
            let Some(answer) = self.ask(&prompt)? else {
                return Ok(None);
            };
            let answer = answer.trim();
            if answer.is_empty() {
                return Ok(Some(default.to_string()));
            }
            if choices.contains(&answer) {
                return Ok(Some(answer.to_string()));
            }
            println!(
                "{} Please select one of the available options",
                Mark::Warn
            );
        }
    }

    pub fn confirm(&mut self, question: &str) -> io::Result<Option<bool>> {
        loop {
            let Some(answer) = self.ask(&format!("{} [y/n]", question))? else {
                return Ok(None);
            };
            match answer.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" => return Ok(Some(true)),
                "n" | "no" => return Ok(Some(false)),
                _ => println!("{} Please enter Y or N", Mark::Warn),
            }
        }
    }

    /// Wait for Enter. Returns `false` at end of input.
    pub fn pause(&mut self) -> io::Result<bool> {
        print!("\nPress Enter to continue...");
        io::stdout().flush()?;
        Ok(self.read_line()?.is_some())
    }
}

fn show_header() {
    let title = "Text Analyzer CLI";
    let rule = "─".repeat(title.len() + 2);
    println!("{}", style(format!("┌{}┐", rule)).cyan());
    println!(
        "{} {} {}",
        style("│").cyan(),
        style(title).cyan().bold(),
        style("│").cyan()
    );
    println!("{}", style(format!("└{}┘", rule)).cyan());
}

/// Run the menu until the user quits or input ends.
pub async fn run_menu<R: BufRead>(app: &App, prompter: &mut Prompter<R>) -> anyhow::Result<()> {
    show_header();

    loop {
        println!("\n{}", style("Main Menu").bold());
        println!("1. {}", style("Analyze Text").cyan());
        println!("2. {}", style("View History").cyan());
        println!("3. {}", style("Export Data").cyan());
        println!("4. {}", style("Quit").red());

        let Some(choice) = prompter.choose("Choose an option", &["1", "2", "3", "4"], "1")? else {
            break;
        };

        match choice.as_str() {
            "1" => {
                println!(
                    "{}",
                    style("Tip: .txt and .pdf files (selectable text) are supported.").dim()
                );
                let Some(input) = prompter.ask("Enter text to analyze (or file path)")? else {
                    break;
                };
                app.analyze_input(&input).await;
            }
            "2" => app.show_history(HISTORY_LIMIT),
            "3" => {
                if !export_menu(app, prompter).await? {
                    break;
                }
            }
            _ => match prompter.confirm("Are you sure you want to exit?")? {
                Some(false) => {}
                Some(true) | None => {
                    println!("{}", style("Goodbye!").cyan().bold());
                    break;
                }
            },
        }

        if !prompter.pause()? {
            break;
        }
    }

    Ok(())
}

/// Returns `false` when input ended.
async fn export_menu<R: BufRead>(app: &App, prompter: &mut Prompter<R>) -> anyhow::Result<bool> {
    println!("\n{}", style("Export Options").bold());
    println!("1. {}", style("Export to CSV").cyan());
    println!("2. {}", style("Export to Markdown").cyan());
    println!("3. {}", style("Export to Google Sheet").green());
    println!("4. {}", style("Cancel").dim());

    let Some(choice) = prompter.choose("Choose format", &["1", "2", "3", "4"], "1")? else {
        return Ok(false);
    };

    let (format, sheet_name) = match choice.as_str() {
        "1" => (ExportFormat::Csv, None),
        "2" => (ExportFormat::Markdown, None),
        "3" => {
            if app.store().count() == 0 {
                println!("{} No history to export.", Mark::Warn);
                return Ok(true);
            }
            let Some(name) = prompter.ask("Enter Google Sheet Name")? else {
                return Ok(false);
            };
            (ExportFormat::Sheet, Some(name))
        }
        _ => return Ok(true),
    };

    if let Err(e) = app.export(format, sheet_name.as_deref(), EXPORT_LIMIT).await {
        println!("{} Export failed: {}", Mark::Fail, e);
    }
    Ok(true)
}
