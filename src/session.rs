// Conversation controller: a pure state machine over the chat session.
// It owns the transcript and the collected data and never does I/O; the
// UI feeds it user input and network outcomes, and it answers with the
// next `Action` the UI should perform (if any).

use tracing::debug;

/// How a transcript line should be presented. The controller only cares
/// about the text; the kind exists so the UI can style lines without
/// parsing them back apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// User input echoed back with the prompt marker.
    Echo,
    /// A question fetched from the backend.
    Question,
    /// Progress/status notices ("sending", etc.).
    Notice,
    /// A failed network call, surfaced to the user.
    Error,
    /// The generated script/result.
    Output,
}

/// One entry in the append-only transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub kind: LineKind,
    pub text: String,
}

impl Line {
    fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Line { kind, text: text.into() }
    }
}

/// Where the conversation currently is. Each phase carries exactly the
/// data that is valid in it, so states like "answers collected before a
/// resource type exists" cannot be constructed. `FetchingQuestions` and
/// `Submitting` double as busy states: while the UI is off performing
/// the corresponding request, fresh input is rejected (fetch) or treated
/// as a manual retry (submit), so two calls can never overlap.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    AwaitingResourceType,
    FetchingQuestions {
        resource_type: String,
    },
    AwaitingAnswers {
        resource_type: String,
        questions: Vec<String>,
        answers: Vec<String>,
    },
    Submitting {
        resource_type: String,
        questions: Vec<String>,
        answers: Vec<String>,
    },
    Done,
}

/// A network effect the UI must perform on the controller's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    FetchQuestions {
        resource_type: String,
    },
    SubmitAnswers {
        resource_type: String,
        questions: Vec<String>,
        answers: Vec<String>,
    },
}

const SENDING_NOTICE: &str = "Sending your answers...";

/// Per-conversation state: the transcript plus the current phase.
/// Created empty when the chat starts and discarded when it ends;
/// nothing is persisted.
#[derive(Debug)]
pub struct Session {
    transcript: Vec<Line>,
    phase: Phase,
}

impl Session {
    pub fn new() -> Self {
        Session {
            transcript: Vec::new(),
            phase: Phase::AwaitingResourceType,
        }
    }

    /// The full transcript so far, in display order.
    pub fn transcript(&self) -> &[Line] {
        &self.transcript
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    fn push(&mut self, kind: LineKind, text: impl Into<String>) {
        self.transcript.push(Line::new(kind, text));
    }

    fn echo(&mut self, input: &str) {
        self.push(LineKind::Echo, format!("> {input}"));
    }

    /// Handle one line of user input. Whitespace-only input is ignored
    /// entirely. Accepted input is echoed to the transcript before any
    /// action is handed back, so the transcript always reflects input
    /// order even when the resulting network call is slow or fails.
    pub fn submit_input(&mut self, input: &str) -> Option<Action> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        match &mut self.phase {
            Phase::AwaitingResourceType => {
                self.echo(input);
                let resource_type = input.to_string();
                debug!(%resource_type, "resource type captured");
                self.phase = Phase::FetchingQuestions {
                    resource_type: resource_type.clone(),
                };
                Some(Action::FetchQuestions { resource_type })
            }
            // A questions request is still outstanding; drop the input
            // rather than queueing a second call behind it.
            Phase::FetchingQuestions { .. } => None,
            Phase::AwaitingAnswers { .. } => {
                self.echo(input);
                self.record_answer(input)
            }
            Phase::Submitting {
                resource_type,
                questions,
                answers,
            } => {
                // A prior submission failed (or is conceptually pending):
                // any new input retries with the unchanged payload.
                let action = Action::SubmitAnswers {
                    resource_type: resource_type.clone(),
                    questions: questions.clone(),
                    answers: answers.clone(),
                };
                self.echo(input);
                self.push(LineKind::Notice, SENDING_NOTICE);
                Some(action)
            }
            Phase::Done => None,
        }
    }

    fn record_answer(&mut self, input: &str) -> Option<Action> {
        match std::mem::replace(&mut self.phase, Phase::Done) {
            Phase::AwaitingAnswers {
                resource_type,
                questions,
                mut answers,
            } => {
                answers.push(input.to_string());
                if answers.len() < questions.len() {
                    let next = questions[answers.len()].clone();
                    self.phase = Phase::AwaitingAnswers {
                        resource_type,
                        questions,
                        answers,
                    };
                    self.push(LineKind::Question, next);
                    None
                } else {
                    // Every question has an answer; move to submission.
                    let action = Action::SubmitAnswers {
                        resource_type: resource_type.clone(),
                        questions: questions.clone(),
                        answers: answers.clone(),
                    };
                    self.phase = Phase::Submitting {
                        resource_type,
                        questions,
                        answers,
                    };
                    self.push(LineKind::Notice, SENDING_NOTICE);
                    Some(action)
                }
            }
            other => {
                self.phase = other;
                None
            }
        }
    }

    /// The questions request completed. A non-empty list starts the
    /// answer round; an empty list means the backend needs nothing more,
    /// so the session submits immediately with zero answers.
    pub fn questions_loaded(&mut self, questions: Vec<String>) -> Option<Action> {
        let Phase::FetchingQuestions { resource_type } = &self.phase else {
            debug!("questions_loaded outside FetchingQuestions; ignored");
            return None;
        };
        let resource_type = resource_type.clone();
        debug!(count = questions.len(), "questions received");

        if questions.is_empty() {
            self.push(
                LineKind::Notice,
                "No further details needed for this resource type.",
            );
            self.push(LineKind::Notice, SENDING_NOTICE);
            self.phase = Phase::Submitting {
                resource_type: resource_type.clone(),
                questions: Vec::new(),
                answers: Vec::new(),
            };
            return Some(Action::SubmitAnswers {
                resource_type,
                questions: Vec::new(),
                answers: Vec::new(),
            });
        }

        self.push(LineKind::Question, questions[0].clone());
        self.phase = Phase::AwaitingAnswers {
            resource_type,
            questions,
            answers: Vec::new(),
        };
        None
    }

    /// The questions request failed. Surface the error and return to the
    /// start so the user can try another resource type.
    pub fn fetch_failed(&mut self, message: &str) {
        self.push(
            LineKind::Error,
            format!("Could not fetch questions: {message}. Enter a resource type to try again."),
        );
        self.phase = Phase::AwaitingResourceType;
    }

    /// Submission succeeded; `rendered` is the display-ready result.
    pub fn submission_succeeded(&mut self, rendered: String) {
        self.push(LineKind::Output, rendered);
        self.phase = Phase::Done;
    }

    /// Submission failed. The collected payload is left untouched so the
    /// user can retry by typing anything.
    pub fn submission_failed(&mut self, message: &str) {
        self.push(
            LineKind::Error,
            format!("Could not generate the script: {message}. Type anything to retry."),
        );
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
