use std::fmt;
use std::sync::Arc;

use anyhow::{bail, Context};
use colored::*;
use inquire::{Confirm, InquireError, Select, Text};
use leadflow_ai::{OfflineSmartChat, SmartChat, SmartChatService};
use leadflow_chat::{ChatEngine, ContactDetails, FlowState, TransitionOutcome};
use leadflow_cli::render::progress_bar;
use leadflow_config::Config;
use leadflow_core::{Button, ChatMessage, MessageRole};
use leadflow_sync::{ConversationMirror, NoopMirror, RetryPolicy, SyncQueue};
use tracing::warn;

/// One entry of the answer menu
enum Choice {
    Button(Button),
    Type,
    Skip,
    Reset,
    Quit,
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::Button(button) => f.write_str(&button.label),
            Choice::Type => f.write_str("Type an answer…"),
            Choice::Skip => f.write_str("Skip this question"),
            Choice::Reset => f.write_str("Start over"),
            Choice::Quit => f.write_str("Quit"),
        }
    }
}

pub async fn run_chat(config: &Config, offline: bool, offer: Option<String>) -> anyhow::Result<()> {
    let registry = Arc::new(super::registry(config, offline).await?);

    let smart_chat: Arc<dyn SmartChat> = if offline {
        Arc::new(OfflineSmartChat)
    } else {
        Arc::new(SmartChatService::new(config).context("failed to build smart chat client")?)
    };

    let queue = if offline {
        None
    } else {
        let store = Arc::new(super::api_client(config)?);
        let policy = RetryPolicy::with_max_retries(config.sync_max_retries);
        Some(Arc::new(SyncQueue::spawn(store, policy)))
    };
    let mirror: Arc<dyn ConversationMirror> = match &queue {
        Some(queue) => queue.clone(),
        None => Arc::new(NoopMirror),
    };

    let mut engine = ChatEngine::new(registry, smart_chat, mirror)
        .with_context_window(config.context_window);

    if offline {
        println!("{}", "Offline mode: answers advance locally".dimmed());
    }

    let result = converse(&mut engine, offer).await;

    // Flush mirrored updates before exiting
    drop(engine);
    if let Some(queue) = queue {
        match Arc::try_unwrap(queue) {
            Ok(queue) => queue.shutdown().await,
            Err(_) => warn!("Conversation sync queue still shared; not waiting for it"),
        }
    }

    result
}

async fn converse(engine: &mut ChatEngine, offer: Option<String>) -> anyhow::Result<()> {
    let mut shown = print_new_messages(engine, 0);

    if let Some(offer) = offer {
        let Some(button) = engine
            .current_buttons()
            .iter()
            .find(|b| b.value == offer)
            .cloned()
        else {
            bail!("unknown offer '{}'", offer);
        };
        engine.handle_button(&button).await;
        shown = print_new_messages(engine, shown);
    }

    loop {
        let outcome = match engine.state() {
            FlowState::Complete => {
                print_summary(engine);
                let again = Confirm::new("Start another conversation?")
                    .with_default(false)
                    .prompt();
                if prompt(again)? != Some(true) {
                    return Ok(());
                }
                engine.reset()
            }
            FlowState::ContactModal(_) => match prompt_contact()? {
                Some(details) => engine.submit_contact(details),
                None => return Ok(()),
            },
            _ => {
                let Some(choice) = prompt(Select::new("›", choices(engine)).prompt())? else {
                    return Ok(());
                };
                match choice {
                    Choice::Button(button) => engine.handle_button(&button).await,
                    Choice::Type => match prompt(Text::new("You:").prompt())? {
                        Some(text) => engine.handle_free_text(&text).await,
                        None => continue,
                    },
                    Choice::Skip => engine.skip_current(),
                    Choice::Reset => engine.reset(),
                    Choice::Quit => return Ok(()),
                }
            }
        };

        if outcome == TransitionOutcome::Reset {
            shown = 0;
        }
        shown = print_new_messages(engine, shown);
        print_status(engine, &outcome);
    }
}

fn choices(engine: &ChatEngine) -> Vec<Choice> {
    let mut choices: Vec<Choice> = engine
        .current_buttons()
        .iter()
        .cloned()
        .map(Choice::Button)
        .collect();

    if let Some(question) = engine.current_question() {
        choices.push(Choice::Type);
        if !question.required {
            choices.push(Choice::Skip);
        }
    }
    if engine.session().selected_offer.is_some() {
        choices.push(Choice::Reset);
    }
    choices.push(Choice::Quit);
    choices
}

fn prompt_contact() -> anyhow::Result<Option<ContactDetails>> {
    println!("{}", "Almost done! Where should we send your plan?".cyan().bold());

    let Some(name) = prompt(Text::new("Name:").prompt())? else {
        return Ok(None);
    };
    let Some(email) = prompt(
        Text::new("Email:")
            .with_validator(|input: &str| {
                if input.contains('@') {
                    Ok(inquire::validator::Validation::Valid)
                } else {
                    Ok(inquire::validator::Validation::Invalid(
                        "Please enter an email address".into(),
                    ))
                }
            })
            .prompt(),
    )?
    else {
        return Ok(None);
    };
    let phone = prompt(Text::new("Phone (optional):").prompt())?.filter(|p| !p.trim().is_empty());

    Ok(Some(ContactDetails { name, email, phone }))
}

/// Escape and Ctrl-C end the conversation instead of failing it
fn prompt<T>(result: Result<T, InquireError>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn print_new_messages(engine: &ChatEngine, shown: usize) -> usize {
    let messages = &engine.session().messages;
    for message in messages.iter().skip(shown) {
        print_message(message);
    }
    messages.len()
}

fn print_message(message: &ChatMessage) {
    match message.role {
        MessageRole::Assistant => println!("{} {}", "Leadflow:".green().bold(), message.content),
        MessageRole::User => println!("{} {}", "You:".blue().bold(), message.content.dimmed()),
    }
}

fn print_status(engine: &ChatEngine, outcome: &TransitionOutcome) {
    let session = engine.session();

    if let Some(insight) = session
        .last_tracker
        .as_ref()
        .and_then(|t| t.insight.as_deref())
        .filter(|_| matches!(outcome, TransitionOutcome::Advanced { .. }))
    {
        println!("  {} {}", "💡".yellow(), insight.italic());
    }
    if session.current_intent.is_some() && !matches!(outcome, TransitionOutcome::Reset) {
        println!("  {}", progress_bar(session.progress, 20).cyan());
    }
    if matches!(outcome, TransitionOutcome::Ignored) {
        println!("  {}", "That doesn't apply right now".yellow());
    }
}

fn print_summary(engine: &ChatEngine) {
    let session = engine.session();
    println!();
    println!("{}", "Collected answers".blue().bold());
    for (key, value) in session.user_input() {
        println!("  {} {}", format!("{}:", key).dimmed(), value);
    }
    if let Some(id) = &session.conversation_id {
        println!("  {} {}", "conversation:".dimmed(), id);
    }
    println!();
}
