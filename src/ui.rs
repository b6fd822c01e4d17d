// UI layer: renders the conversation as a terminal chat. `dialoguer`
// reads the input line, the session decides what happens next, and this
// module performs the requested network call and prints whatever the
// session appended to the transcript.

use crate::api::ApiClient;
use crate::session::{Action, Line, LineKind, Session};
use anyhow::Result;
use crossterm::style::Stylize;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::time::Duration;

/// Main chat loop. Blocks until the conversation reaches its end (a
/// script was generated) or the input stream closes.
pub fn run_chat(api: ApiClient) -> Result<()> {
    println!("{}", "MakeCloud".bold());
    println!("Tell me which cloud resource you want to provision (e.g. \"S3 bucket\"),");
    println!("answer a few questions, and I will generate the Terraform script.");
    println!();

    let mut session = Session::new();
    let mut printed = 0;

    while !session.is_done() {
        // Empty input is allowed here so the session can apply its own
        // whitespace rule (ignore, no transcript line).
        let input: String = Input::new()
            .with_prompt("you")
            .allow_empty(true)
            .interact_text()?;

        let mut next = session.submit_input(&input);
        printed = flush(&session, printed);

        // An action may produce a follow-up action in the same turn
        // (a backend with zero questions submits immediately).
        while let Some(action) = next {
            next = run_action(&api, &mut session, action);
            printed = flush(&session, printed);
        }
    }
    Ok(())
}

/// Perform one network action under a spinner and feed the outcome back
/// into the session. Errors become transcript lines, not failures of the
/// chat loop itself.
fn run_action(api: &ApiClient, session: &mut Session, action: Action) -> Option<Action> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    spinner.enable_steady_tick(Duration::from_millis(80));

    let follow_up = match action {
        Action::FetchQuestions { resource_type } => {
            spinner.set_message("Fetching questions...");
            match api.fetch_questions(&resource_type) {
                Ok(questions) => session.questions_loaded(questions),
                Err(e) => {
                    session.fetch_failed(&e.to_string());
                    None
                }
            }
        }
        Action::SubmitAnswers {
            resource_type,
            questions,
            answers,
        } => {
            spinner.set_message("Generating script...");
            match api.generate_script(&resource_type, &questions, &answers) {
                Ok(value) => {
                    session.submission_succeeded(render_result(&value));
                    None
                }
                Err(e) => {
                    session.submission_failed(&e.to_string());
                    None
                }
            }
        }
    };
    spinner.finish_and_clear();
    follow_up
}

/// Print transcript lines appended since the last flush; returns the new
/// watermark.
fn flush(session: &Session, printed: usize) -> usize {
    for line in &session.transcript()[printed..] {
        print_line(line);
    }
    session.transcript().len()
}

fn print_line(line: &Line) {
    match line.kind {
        LineKind::Echo => println!("{}", line.text.as_str().dark_grey()),
        LineKind::Question => println!("{}", line.text.as_str().cyan()),
        LineKind::Notice => println!("{}", line.text.as_str().dark_grey().italic()),
        LineKind::Error => println!("{}", line.text.as_str().red()),
        // Scripts stay unstyled so they can be copied out of the terminal.
        LineKind::Output => println!("\n{}\n", line.text),
    }
}

/// Turn the opaque generation result into display text. The backend
/// usually answers with either a bare string or an object carrying a
/// `script` plus optional terraform output/error, but nothing is
/// guaranteed; anything unrecognized is shown as pretty-printed JSON.
pub fn render_result(value: &Value) -> String {
    if let Some(s) = value.as_str() {
        return s.trim().to_string();
    }
    if let Some(obj) = value.as_object() {
        if let Some(script) = obj.get("script").and_then(Value::as_str) {
            let mut out = script.trim().to_string();
            if let Some(tf) = obj.get("terraform_output").and_then(Value::as_str) {
                out.push_str("\n\nTerraform output:\n");
                out.push_str(tf.trim());
            }
            if let Some(err) = obj.get("terraform_error").and_then(Value::as_str) {
                out.push_str("\n\nTerraform reported an error:\n");
                out.push_str(err.trim());
            }
            return out;
        }
    }
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::render_result;
    use serde_json::json;

    #[test]
    fn bare_string_results_are_trimmed() {
        let value = json!("\nprovider \"aws\" {}\n");
        assert_eq!(render_result(&value), "provider \"aws\" {}");
    }

    #[test]
    fn script_object_includes_terraform_error() {
        let value = json!({
            "script": "provider \"aws\" {}",
            "terraform_error": "terraform: command not found",
        });
        let out = render_result(&value);
        assert!(out.starts_with("provider \"aws\" {}"));
        assert!(out.contains("terraform: command not found"));
    }

    #[test]
    fn unknown_shapes_fall_back_to_pretty_json() {
        let value = json!({"status": "ok", "id": 7});
        let out = render_result(&value);
        assert!(out.contains("\"status\": \"ok\""));
    }
}
