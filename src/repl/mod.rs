//! Terminal presentation layer
//!
//! Renders whatever the core exposes and issues its commands; owns no state
//! of its own. Onboarding prompts via rustyline, a spinner while a plan
//! request is in flight, then the dashboard summary and the chat loop.

use crate::app::Companion;
use crate::controller::ViewState;
use crate::onboarding::{OnboardingWizard, WizardStep, STEP_COUNT};
use crate::types::{MessageStatus, Profile, Role, SkillLevel, TimeCommitment};
use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::time::Duration;

/// Run the full onboarding -> generation -> dashboard flow
pub async fn run(mut companion: Companion) -> Result<()> {
    let mut editor = DefaultEditor::new()?;

    println!("{}", "Let's build your plan".bold());

    let Some(profile) = run_wizard(&mut editor)? else {
        return Ok(());
    };
    let topic = profile.topic().to_string();

    if !generate_with_retries(&mut companion, &mut editor, profile, &topic).await? {
        return Ok(());
    }

    render_dashboard(&companion);
    chat_loop(&mut companion, &mut editor).await
}

/// Walk the 4-step wizard; None when the user bails out
fn run_wizard(editor: &mut DefaultEditor) -> Result<Option<Profile>> {
    let mut wizard = OnboardingWizard::new();

    while !wizard.is_complete() {
        println!(
            "\n{}",
            format!("Step {} of {}", wizard.step().number(), STEP_COUNT).dimmed()
        );

        match wizard.step() {
            WizardStep::Topic => {
                println!("{}", "What do you want to learn?".bold());
                let Some(input) = read_line(editor, "e.g. Python, Pottery... > ")? else {
                    return Ok(None);
                };
                wizard.set_topic(&input);
                if !wizard.advance() {
                    println!("{}", "Please enter a topic to continue.".yellow());
                }
            }
            WizardStep::TimeCommitment => {
                println!("{}", "How much time do you have daily?".bold());
                for (i, option) in TimeCommitment::all().iter().enumerate() {
                    println!("  {}. {}", i + 1, option);
                }
                let Some(input) = read_line(editor, "choice [2] > ")? else {
                    return Ok(None);
                };
                if let Some(choice) = parse_choice(&input, TimeCommitment::all().len()) {
                    wizard.set_time_commitment(TimeCommitment::all()[choice]);
                }
                wizard.advance();
            }
            WizardStep::Level => {
                println!("{}", "What is your current level?".bold());
                for (i, option) in SkillLevel::all().iter().enumerate() {
                    println!("  {}. {}", i + 1, option);
                }
                let Some(input) = read_line(editor, "choice [1] > ")? else {
                    return Ok(None);
                };
                if let Some(choice) = parse_choice(&input, SkillLevel::all().len()) {
                    wizard.set_level(SkillLevel::all()[choice]);
                }
                wizard.advance();
            }
            WizardStep::Motivation => {
                println!("{}", "Why are you learning this? (Optional)".bold());
                let Some(input) = read_line(editor, "> ")? else {
                    return Ok(None);
                };
                wizard.set_motivation(&input);
                wizard.advance();
            }
        }
    }

    Ok(wizard.finish())
}

/// Run generation, offering retries on failure; false when the user gives up
async fn generate_with_retries(
    companion: &mut Companion,
    editor: &mut DefaultEditor,
    profile: Profile,
    topic: &str,
) -> Result<bool> {
    let spinner = start_spinner(&format!("Curating your personalized plan for {}...", topic));
    companion.complete_onboarding(profile).await;
    spinner.finish_and_clear();

    loop {
        match companion.view() {
            ViewState::Dashboard { .. } => return Ok(true),
            ViewState::GenerationFailed { reason, .. } => {
                println!(
                    "{} {}",
                    "Something went wrong generating the plan:".red(),
                    reason
                );
                let Some(answer) = read_line(editor, "Retry? [y/N] > ")? else {
                    return Ok(false);
                };
                if !answer.trim().eq_ignore_ascii_case("y") {
                    return Ok(false);
                }

                let spinner = start_spinner("Retrying...");
                companion.retry_generation().await;
                spinner.finish_and_clear();
            }
            _ => return Ok(false),
        }
    }
}

fn render_dashboard(companion: &Companion) {
    if let ViewState::Dashboard { profile, plan } = companion.view() {
        println!(
            "\n{}",
            format!("Your {} plan", profile.topic()).bold().underline()
        );
        println!("{}", plan.to_pretty_string());
    }

    if let Some(session) = companion.session() {
        if let Some(greeting) = session.messages().first() {
            println!("\n{} {}", "companion>".purple().bold(), greeting.content);
        }
    }
    println!(
        "{}",
        "Type a question, /revise <feedback> to regenerate, or /quit to exit.".dimmed()
    );
}

async fn chat_loop(companion: &mut Companion, editor: &mut DefaultEditor) -> Result<()> {
    loop {
        let Some(input) = read_line(editor, "you> ")? else {
            return Ok(());
        };
        let input = input.trim().to_string();

        match input.as_str() {
            "" => continue,
            "/quit" | "/exit" => return Ok(()),
            _ if input.starts_with("/revise") => {
                let feedback = input.trim_start_matches("/revise").trim();
                let Some(profile) = dashboard_profile(companion) else {
                    continue;
                };
                let derived = profile.with_feedback(feedback);
                let topic = derived.topic().to_string();

                let spinner = start_spinner(&format!("Refining your {} plan...", topic));
                companion.revise_plan(derived).await;
                spinner.finish_and_clear();

                match companion.view() {
                    ViewState::Dashboard { .. } => render_dashboard(companion),
                    ViewState::GenerationFailed { reason, .. } => {
                        println!("{} {}", "Revision failed:".red(), reason);
                        return Ok(());
                    }
                    _ => return Ok(()),
                }
            }
            _ => {
                let spinner = start_spinner("Thinking...");
                companion.post_user_message(&input).await;
                spinner.finish_and_clear();
                print_last_reply(companion);
            }
        }
    }
}

fn print_last_reply(companion: &Companion) {
    let Some(session) = companion.session() else {
        return;
    };
    let Some(last) = session
        .messages()
        .iter()
        .rev()
        .find(|m| m.role == Role::Assistant)
    else {
        return;
    };

    match last.status {
        MessageStatus::Failed => {
            println!("{} {}", "companion>".purple().bold(), last.content.red())
        }
        _ => println!("{} {}", "companion>".purple().bold(), last.content),
    }
}

fn dashboard_profile(companion: &Companion) -> Option<Profile> {
    match companion.view() {
        ViewState::Dashboard { profile, .. } => Some(profile.clone()),
        _ => None,
    }
}

/// Read one line; None on Ctrl-C / Ctrl-D
fn read_line(editor: &mut DefaultEditor, prompt: &str) -> Result<Option<String>> {
    match editor.readline(prompt) {
        Ok(line) => {
            let _ = editor.add_history_entry(&line);
            Ok(Some(line))
        }
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Parse a 1-based menu choice; None keeps the default
fn parse_choice(input: &str, options: usize) -> Option<usize> {
    let n: usize = input.trim().parse().ok()?;
    if (1..=options).contains(&n) {
        Some(n - 1)
    } else {
        None
    }
}

fn start_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").expect("static template is valid"),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("1", 4), Some(0));
        assert_eq!(parse_choice(" 4 ", 4), Some(3));
        assert_eq!(parse_choice("5", 4), None);
        assert_eq!(parse_choice("0", 4), None);
        assert_eq!(parse_choice("abc", 4), None);
        assert_eq!(parse_choice("", 4), None);
    }
}
