//! Interactive REPL
//!
//! Thin presentation layer over the session controller: slash commands for
//! session management, plain input sends a message to the current chat.

use docchat_core::{Error, SessionController};
use nu_ansi_term::{Color, Style};
use reedline::{
    ColumnarMenu, Completer, DefaultHinter, Emacs, KeyCode, KeyModifiers, Keybindings,
    MenuBuilder, Prompt, Reedline, ReedlineEvent, ReedlineMenu, Signal, Suggestion,
};
use tracing::info;

/// Available commands for autocomplete display
const COMMANDS: &[(&str, &str)] = &[
    ("/new", "Create a new chat"),
    ("/chats", "List all chats"),
    ("/open", "Switch to a chat: /open <id>"),
    ("/delete", "Delete a chat: /delete <id>"),
    ("/attach", "Attach a PDF: /attach <path>"),
    ("/detach", "Remove the attached PDF"),
    ("/clear", "Clear the current chat's messages"),
    ("/history", "Show the current chat's messages"),
    ("/help", "Show help"),
    ("/exit", "Quit"),
    ("/quit", "Quit"),
];

/// Command completer for reedline
#[derive(Clone, Default)]
pub struct CommandCompleter;

impl Completer for CommandCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        if !line.starts_with('/') {
            return Vec::new();
        }

        COMMANDS
            .iter()
            .filter(|(cmd, _)| cmd.starts_with(line))
            .map(|(cmd, desc)| Suggestion {
                value: cmd.to_string(),
                description: Some(desc.to_string()),
                extra: None,
                span: reedline::Span::new(0, pos),
                append_whitespace: true,
                style: None,
            })
            .collect()
    }
}

/// Custom prompt with colored styling
struct ColoredPrompt {
    style: Style,
}

impl ColoredPrompt {
    fn new() -> Self {
        Self {
            style: Color::Cyan.bold(),
        }
    }
}

impl Prompt for ColoredPrompt {
    fn render_prompt_left(&self) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Owned(self.style.paint("> ").to_string())
    }

    fn render_prompt_right(&self) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Borrowed("")
    }

    fn render_prompt_indicator(
        &self,
        _prompt_mode: reedline::PromptEditMode,
    ) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Borrowed("")
    }

    fn render_prompt_multiline_indicator(&self) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Borrowed("")
    }

    fn render_prompt_history_search_indicator(
        &self,
        _history_search: reedline::PromptHistorySearch,
    ) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Borrowed("")
    }
}

/// Run the interactive REPL
pub async fn run_repl(mut controller: SessionController) -> anyhow::Result<()> {
    info!("Starting REPL");
    print_welcome();

    let mut keybindings = default_keybindings();

    // Trigger completion on '/' key
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Char('/'),
        ReedlineEvent::Edit(vec![reedline::EditCommand::Complete]),
    );

    let menu = Box::new(
        ColumnarMenu::default()
            .with_name("command_menu")
            .with_columns(1)
            .with_column_width(Some(40))
            .with_only_buffer_difference(false),
    );

    let hinter = DefaultHinter::default().with_style(Style::new().dimmed());

    let mut line_editor = Reedline::create()
        .with_completer(Box::new(CommandCompleter))
        .with_menu(ReedlineMenu::EngineCompleter(menu))
        .with_hinter(Box::new(hinter))
        .with_edit_mode(Box::new(Emacs::new(keybindings)));

    let prompt = ColoredPrompt::new();

    loop {
        let signal = line_editor.read_line(&prompt);

        match signal {
            Ok(Signal::Success(line)) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }

                if input.starts_with('/') {
                    if !handle_command(input, &mut controller).await {
                        break;
                    }
                    continue;
                }

                match controller.send_message(input).await {
                    Ok(reply) => println!("\n{}\n", reply.content),
                    Err(e) => print_error(&e),
                }
            }
            Ok(Signal::CtrlC) => {
                println!("^C");
                continue;
            }
            Ok(Signal::CtrlD) => {
                println!("\nBye!\n");
                break;
            }
            Err(err) => {
                eprintln!("\nError: {}\n", err);
                break;
            }
        }
    }

    Ok(())
}

/// Handle a slash command; returns false when the REPL should exit
async fn handle_command(input: &str, controller: &mut SessionController) -> bool {
    let mut parts = input.splitn(2, ' ');
    let command = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).unwrap_or_default();

    match command {
        "/exit" | "/quit" => {
            println!("Bye!");
            return false;
        }
        "/help" => print_help(),
        "/new" => match controller.new_chat().await {
            Ok(chat_id) => println!("Created chat {}", chat_id),
            Err(e) => print_error(&e),
        },
        "/chats" => print_chats(controller),
        "/open" => {
            if arg.is_empty() {
                println!("Usage: /open <id>");
            } else {
                controller.select_chat(arg);
                match controller.store().current_id() {
                    Some(id) if id == arg => print_chat_header(controller),
                    _ => println!("No chat with id {}", arg),
                }
            }
        }
        "/delete" => {
            if arg.is_empty() {
                println!("Usage: /delete <id>");
            } else {
                controller.delete_chat(arg);
                match controller.store().current_id() {
                    Some(id) => println!("Deleted. Current chat is now {}", id),
                    None => println!("Deleted. No chats left"),
                }
            }
        }
        "/attach" => {
            if arg.is_empty() {
                println!("Usage: /attach <path>");
            } else {
                attach_file(arg, controller).await;
            }
        }
        "/detach" => {
            controller.detach_document();
            println!("Document detached");
        }
        "/clear" => {
            controller.clear_messages();
            println!("Messages cleared");
        }
        "/history" => print_history(controller),
        _ => println!("Unknown command: {} (try /help)", command),
    }

    true
}

async fn attach_file(path: &str, controller: &mut SessionController) {
    let file_name = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());

    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Cannot read {}: {}", path, e);
            return;
        }
    };

    println!("Uploading {}...", file_name);
    match controller.attach_document(&file_name, bytes).await {
        Ok(()) => println!("{} is ready for chat", file_name),
        Err(e) => print_error(&e),
    }
}

fn print_chats(controller: &SessionController) {
    let store = controller.store();
    if store.is_empty() {
        println!("No chats yet. Create one with /new");
        return;
    }

    let current = store.current_id();
    for session in store.sessions() {
        let marker = if Some(session.id.as_str()) == current { "*" } else { " " };
        let doc = session
            .document_name
            .as_deref()
            .unwrap_or("no document");
        println!(
            "{} {}  [{}]  {} messages",
            marker,
            session.id,
            doc,
            session.message_count()
        );
    }
}

fn print_chat_header(controller: &SessionController) {
    if let Some(session) = controller.store().current() {
        match &session.document_name {
            Some(name) => println!("Chat {} - ask me anything about {}", session.id, name),
            None => println!("Chat {} - upload a PDF to start the conversation", session.id),
        }
    }
}

fn print_history(controller: &SessionController) {
    match controller.store().current() {
        None => println!("No active chat"),
        Some(session) if session.is_empty() => println!("No messages yet"),
        Some(session) => {
            for message in &session.messages {
                let (label, color) = match message.sender {
                    docchat_core::Sender::User => ("you", Color::Green),
                    docchat_core::Sender::Bot => ("bot", Color::Blue),
                };
                println!(
                    "{} {}",
                    color.bold().paint(format!("[{}]", label)),
                    message.content
                );
            }
        }
    }
}

fn print_error(error: &Error) {
    if error.is_validation() {
        println!("{}", Color::Yellow.paint(error.to_string()));
    } else {
        eprintln!("{}", Color::Red.paint(error.to_string()));
    }
}

fn print_welcome() {
    println!();
    println!("{}", Color::Cyan.bold().paint("docchat - chat with your PDF"));
    println!("Create a chat with /new, attach a PDF with /attach <path>,");
    println!("then just type to ask questions. /help lists all commands.");
    println!();
}

fn print_help() {
    println!();
    for (cmd, desc) in COMMANDS {
        println!("  {:<10} {}", cmd, desc);
    }
    println!();
}

/// Default keybindings for reedline
fn default_keybindings() -> Keybindings {
    let mut keybindings = Keybindings::new();
    // Tab key triggers completion
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::Edit(vec![reedline::EditCommand::Complete]),
    );
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Enter, ReedlineEvent::Submit);
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Esc, ReedlineEvent::Esc);
    keybindings.add_binding(
        KeyModifiers::CONTROL,
        KeyCode::Char('c'),
        ReedlineEvent::CtrlC,
    );
    keybindings.add_binding(
        KeyModifiers::CONTROL,
        KeyCode::Char('d'),
        ReedlineEvent::CtrlD,
    );
    keybindings
}
