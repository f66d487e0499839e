//! `concierge chat` -- interactive conversation on the terminal.
//!
//! Plays the caller's role: keeps the conversation state between turns
//! and sends each line as a validation turn of the dining intent. Lines
//! starting with `:` are meta-commands.

use std::io::{self, BufRead, Write};

use concierge_engine::{
    ConversationState, DialogEngine, Fulfillment, Intent, InvocationPhase, TurnInput, TurnOutput,
};

use super::OutputFormat;

/// Run the chat REPL until `:quit` or end of input.
pub fn run_chat(engine: &DialogEngine, output: OutputFormat) {
    if output == OutputFormat::Text {
        println!();
        println!("  Concierge chat");
        println!("  Commands: :greet, :thanks, :state, :reset, :help, :quit");
        println!();
    }

    let mut state = say(engine, opening_turn(ConversationState::new()), output);

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        if output == OutputFormat::Text {
            print!("you> ");
        }
        if io::stdout().flush().is_err() {
            break;
        }

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => {
                // EOF (Ctrl-D)
                if output == OutputFormat::Text {
                    println!();
                }
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("error reading input: {}", e);
                break;
            }
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let input = match trimmed {
            ":quit" | ":exit" => break,
            ":help" => {
                print_help();
                continue;
            }
            ":state" => {
                print_state(&state, output);
                continue;
            }
            ":reset" => {
                if output == OutputFormat::Text {
                    println!("  conversation reset");
                }
                state = say(engine, opening_turn(ConversationState::new()), output);
                continue;
            }
            ":greet" => intent_turn(Intent::Greeting, &state, trimmed),
            ":thanks" => intent_turn(Intent::ThankYou, &state, trimmed),
            cmd if cmd.starts_with(':') => {
                eprintln!("unknown command: {}. Type ':help' for available commands.", cmd);
                continue;
            }
            utterance => TurnInput::dining(state.clone(), utterance),
        };

        let is_dining = input.intent == Intent::DiningSuggestions;
        let next = say(engine, input, output);
        if is_dining {
            state = next;
        }
    }
}

/// Run a turn, print the reply and return the state to carry forward.
///
/// A fulfilled dining close ends the conversation, so the next line
/// starts a fresh one.
fn say(engine: &DialogEngine, input: TurnInput, output: OutputFormat) -> ConversationState {
    let out = engine.handle_turn(input);
    print_turn(&out, output);
    match out {
        TurnOutput::Close {
            intent: Intent::DiningSuggestions,
            fulfillment: Fulfillment::Fulfilled,
            ..
        } => ConversationState::new(),
        TurnOutput::Prompt { state, .. }
        | TurnOutput::Delegate { state }
        | TurnOutput::Close { state, .. } => state,
    }
}

fn opening_turn(state: ConversationState) -> TurnInput {
    TurnInput::dining(state, "").with_phase(InvocationPhase::Elicit)
}

/// Greetings and thanks never see the dining state.
fn intent_turn(intent: Intent, state: &ConversationState, utterance: &str) -> TurnInput {
    let mut input = TurnInput::dining(state.clone(), utterance);
    input.intent = intent;
    input
}

fn print_turn(out: &TurnOutput, output: OutputFormat) {
    match output {
        OutputFormat::Text => {
            if let Some(message) = out.message() {
                println!("bot> {}", message);
            }
            if let TurnOutput::Close {
                fulfillment: Fulfillment::Failed,
                ..
            } = out
            {
                println!("  (send any line to retry)");
            }
        }
        OutputFormat::Json => {
            let json = match out {
                TurnOutput::Prompt {
                    field,
                    message,
                    state,
                } => serde_json::json!({
                    "action": "prompt",
                    "field": field.slot_name(),
                    "message": message,
                    "state": state.to_attributes(),
                }),
                TurnOutput::Delegate { state } => serde_json::json!({
                    "action": "delegate",
                    "state": state.to_attributes(),
                }),
                TurnOutput::Close {
                    intent,
                    fulfillment,
                    message,
                    state,
                } => serde_json::json!({
                    "action": "close",
                    "intent": intent.name(),
                    "fulfillment": fulfillment,
                    "message": message,
                    "state": state.to_attributes(),
                }),
            };
            println!("{}", json);
        }
    }
}

fn print_state(state: &ConversationState, output: OutputFormat) {
    let attributes = state.to_attributes();
    match output {
        OutputFormat::Json => println!("{}", serde_json::json!(attributes)),
        OutputFormat::Text => {
            if attributes.is_empty() {
                println!("  (nothing confirmed yet)");
            }
            for (key, value) in &attributes {
                println!("  {:<18} {}", key, value);
            }
        }
    }
}

fn print_help() {
    println!("  Type an answer to the current question, or:");
    println!("    :greet    say hello");
    println!("    :thanks   say thank you");
    println!("    :state    show the confirmed values");
    println!("    :reset    start over");
    println!("    :quit     leave");
}
