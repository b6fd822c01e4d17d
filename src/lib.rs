// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) uses these modules to implement the chat.
//
// Module responsibilities:
// - `api`: the gateway to the MakeCloud backend — fetch questions for a
//   resource type, submit answers for script generation.
// - `session`: the conversation state machine. Pure and synchronous;
//   all networking is delegated back to the caller as `Action` values.
// - `ui`: the terminal chat loop that connects the two.
//
// Keeping the state machine free of I/O makes the conversation logic
// testable without a backend and keeps the UI replaceable.
pub mod api;
pub mod session;
pub mod ui;
