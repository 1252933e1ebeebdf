use std::collections::HashMap;
use std::path::PathBuf;

use emx_core::CompletionKind;
use emx_core::ContextEngine;
use emx_core::SnippetLibrary;
use emx_core::load_config;
use tokio::sync::RwLock;
use tower_lsp_server::Client;
use tower_lsp_server::LanguageServer;
use tower_lsp_server::jsonrpc::Result as LspResult;
use tower_lsp_server::ls_types::*;

/// Characters that may appear in an abbreviation, besides ASCII
/// alphanumerics. Used to find the abbreviation under the cursor.
const ABBREVIATION_CHARS: &str = "#.>+*^$[]{}()=:!\"'-_,";

/// State for a single open document.
#[derive(Debug, Clone)]
struct DocumentState {
	/// The full text content of the document.
	content: String,
}

/// Workspace-level state shared across all LSP requests.
#[derive(Debug, Default)]
struct WorkspaceState {
	/// The workspace root path.
	root: Option<PathBuf>,
	/// Open documents keyed by URI.
	documents: HashMap<Uri, DocumentState>,
	/// The expansion engine, rebuilt whenever the config is (re)loaded.
	engine: ContextEngine,
}

impl WorkspaceState {
	/// Rebuild the expansion engine from the workspace config file, falling
	/// back to the built-in tables when no config exists or it fails to parse.
	fn reload_config(&mut self) {
		let Some(root) = &self.root else {
			return;
		};

		self.engine = match load_config(root) {
			Ok(Some(config)) => ContextEngine::with_library(SnippetLibrary::with_config(&config)),
			Ok(None) => ContextEngine::new(),
			Err(e) => {
				tracing::warn!(error = %e, "failed to load emx config, using built-ins");
				ContextEngine::new()
			}
		};
	}
}

/// Convert an LSP `Position` (0-indexed line, character in UTF-16 code units)
/// to a byte offset within `content`. Returns `None` if the position is out of
/// bounds.
fn lsp_position_to_offset(content: &str, position: Position) -> Option<usize> {
	let mut offset = 0;
	for (i, line) in content.split('\n').enumerate() {
		if i == position.line as usize {
			// LSP character offsets count UTF-16 code units, so walk the line
			// converting from UTF-16 units to byte indices.
			let mut utf16_offset = 0u32;
			for (byte_idx, c) in line.char_indices() {
				if utf16_offset == position.character {
					return Some(offset + byte_idx);
				}
				utf16_offset += c.len_utf16() as u32;
			}
			// Position at end of line (past last character).
			if utf16_offset == position.character {
				return Some(offset + line.len());
			}
			return None;
		}
		offset += line.len() + 1; // +1 for '\n'
	}
	None
}

fn is_abbreviation_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || ABBREVIATION_CHARS.contains(c)
}

/// Extract the abbreviation ending at the cursor.
///
/// Scans backwards over abbreviation characters, stopping at whitespace or
/// anything outside the abbreviation alphabet (an opening `<`, template
/// braces, and so on). Returns the abbreviation text and the position of its
/// first character, for building the replacement edit.
fn abbreviation_before_cursor(content: &str, position: Position) -> Option<(String, Position)> {
	let line = content.split('\n').nth(position.line as usize)?;
	let cursor = lsp_position_to_offset(line, Position {
		line: 0,
		character: position.character,
	})?;

	let before = &line[..cursor];
	let start = before
		.char_indices()
		.rev()
		.take_while(|(_, c)| is_abbreviation_char(*c))
		.last()
		.map_or(cursor, |(idx, _)| idx);

	if start == cursor {
		return None;
	}

	let start_character = line[..start].chars().map(char::len_utf16).sum::<usize>() as u32;
	Some((
		before[start..].to_string(),
		Position {
			line: position.line,
			character: start_character,
		},
	))
}

/// Compute completion items at a position: the abbreviation prefix before the
/// cursor is matched against mnemonics, patterns, tags, and curated
/// abbreviations, and each candidate carries an edit replacing the prefix
/// with its snippet-format expansion.
fn compute_completions(state: &WorkspaceState, uri: &Uri, position: Position) -> Vec<CompletionItem> {
	let Some(doc) = state.documents.get(uri) else {
		return Vec::new();
	};

	let Some((prefix, start)) = abbreviation_before_cursor(&doc.content, position) else {
		return Vec::new();
	};

	let replace_range = Range {
		start,
		end: position,
	};

	state
		.engine
		.completions(&prefix)
		.into_iter()
		.map(|completion| {
			let kind = match completion.kind {
				CompletionKind::Tag => CompletionItemKind::PROPERTY,
				CompletionKind::Snippet => CompletionItemKind::SNIPPET,
			};

			CompletionItem {
				label: completion.label.clone(),
				kind: Some(kind),
				detail: Some(completion.detail),
				documentation: Some(Documentation::MarkupContent(MarkupContent {
					kind: MarkupKind::PlainText,
					value: completion.documentation,
				})),
				filter_text: Some(completion.label),
				insert_text_format: Some(InsertTextFormat::SNIPPET),
				text_edit: Some(CompletionTextEdit::Edit(TextEdit {
					range: replace_range,
					new_text: completion.insert_text,
				})),
				..Default::default()
			}
		})
		.collect()
}

/// Compute an expansion preview for the abbreviation under the cursor.
fn compute_hover(state: &WorkspaceState, uri: &Uri, position: Position) -> Option<Hover> {
	let doc = state.documents.get(uri)?;
	let (abbreviation, start) = abbreviation_before_cursor(&doc.content, position)?;

	let expanded = state.engine.expand_with_context(&abbreviation);
	let value = format!("**Emmet:** `{abbreviation}`\n\n```html\n{expanded}\n```");

	Some(Hover {
		contents: HoverContents::Markup(MarkupContent {
			kind: MarkupKind::Markdown,
			value,
		}),
		range: Some(Range {
			start,
			end: position,
		}),
	})
}

/// The emx language server.
#[derive(Debug)]
pub struct EmxLanguageServer {
	client: Client,
	state: RwLock<WorkspaceState>,
}

impl EmxLanguageServer {
	pub fn new(client: Client) -> Self {
		Self {
			client,
			state: RwLock::new(WorkspaceState::default()),
		}
	}

	async fn on_document_change(&self, uri: &Uri, content: String) {
		let mut state = self.state.write().await;
		state.documents.insert(uri.clone(), DocumentState { content });
	}
}

impl LanguageServer for EmxLanguageServer {
	async fn initialize(&self, params: InitializeParams) -> LspResult<InitializeResult> {
		// Determine workspace root — prefer `workspace_folders` (modern LSP),
		// fall back to the deprecated `root_uri` for older clients.
		let root = params
			.workspace_folders
			.as_ref()
			.and_then(|folders| folders.first())
			.and_then(|folder| folder.uri.to_file_path().map(std::borrow::Cow::into_owned))
			.or_else(|| {
				#[allow(deprecated)]
				params
					.root_uri
					.as_ref()
					.and_then(|uri| uri.to_file_path().map(std::borrow::Cow::into_owned))
			});

		{
			let mut state = self.state.write().await;
			state.root = root;
			state.reload_config();
		}

		Ok(InitializeResult {
			capabilities: ServerCapabilities {
				text_document_sync: Some(TextDocumentSyncCapability::Kind(
					TextDocumentSyncKind::INCREMENTAL,
				)),
				hover_provider: Some(HoverProviderCapability::Simple(true)),
				completion_provider: Some(CompletionOptions {
					trigger_characters: Some(vec![
						".".to_string(),
						"#".to_string(),
						">".to_string(),
						"+".to_string(),
						"*".to_string(),
						":".to_string(),
						"!".to_string(),
					]),
					..Default::default()
				}),
				..Default::default()
			},
			server_info: Some(ServerInfo {
				name: "emx-lsp".to_string(),
				version: Some(env!("CARGO_PKG_VERSION").to_string()),
			}),
			offset_encoding: None,
		})
	}

	async fn initialized(&self, _: InitializedParams) {
		self.client
			.log_message(MessageType::INFO, "emx language server initialized")
			.await;
	}

	async fn shutdown(&self) -> LspResult<()> {
		Ok(())
	}

	async fn did_open(&self, params: DidOpenTextDocumentParams) {
		let uri = params.text_document.uri;
		let content = params.text_document.text;
		self.on_document_change(&uri, content).await;
	}

	async fn did_change(&self, params: DidChangeTextDocumentParams) {
		let uri = params.text_document.uri;

		// Get the current document content to apply incremental changes to.
		let current_content = {
			let state = self.state.read().await;
			state.documents.get(&uri).map(|doc| doc.content.clone())
		};

		let Some(mut content) = current_content else {
			// Document not tracked yet — use the last change as full content.
			if let Some(change) = params.content_changes.into_iter().next_back() {
				self.on_document_change(&uri, change.text).await;
			}
			return;
		};

		// Apply each content change in order. With INCREMENTAL sync, each
		// change has a `range` indicating the region to replace. If `range`
		// is `None`, treat it as a full content replacement (backward compat).
		for change in params.content_changes {
			if let Some(range) = change.range {
				let start = lsp_position_to_offset(&content, range.start);
				let end = lsp_position_to_offset(&content, range.end);
				if let (Some(start), Some(end)) = (start, end) {
					content.replace_range(start..end, &change.text);
				}
			} else {
				content = change.text;
			}
		}

		self.on_document_change(&uri, content).await;
	}

	async fn did_save(&self, params: DidSaveTextDocumentParams) {
		let uri = &params.text_document.uri;
		if uri.path().as_str().ends_with(".toml") {
			let mut state = self.state.write().await;
			state.reload_config();
		}
	}

	async fn did_close(&self, params: DidCloseTextDocumentParams) {
		let uri = params.text_document.uri;
		let mut state = self.state.write().await;
		state.documents.remove(&uri);
	}

	async fn hover(&self, params: HoverParams) -> LspResult<Option<Hover>> {
		let uri = &params.text_document_position_params.text_document.uri;
		let position = params.text_document_position_params.position;

		let state = self.state.read().await;
		Ok(compute_hover(&state, uri, position))
	}

	async fn completion(&self, params: CompletionParams) -> LspResult<Option<CompletionResponse>> {
		let uri = &params.text_document_position.text_document.uri;
		let position = params.text_document_position.position;

		let state = self.state.read().await;
		let items = compute_completions(&state, uri, position);

		if items.is_empty() {
			Ok(None)
		} else {
			Ok(Some(CompletionResponse::Array(items)))
		}
	}
}

/// Start the LSP server on stdin/stdout. This is used by the `emx lsp` CLI
/// subcommand.
pub async fn run_server() {
	// Logs must go to stderr: stdout carries the protocol stream. The host
	// process may already have installed a subscriber, so ignore failure.
	let _ = tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_writer(std::io::stderr)
		.try_init();

	let stdin = tokio::io::stdin();
	let stdout = tokio::io::stdout();

	let (service, socket) = tower_lsp_server::LspService::new(EmxLanguageServer::new);
	tower_lsp_server::Server::new(stdin, stdout, socket)
		.serve(service)
		.await;
}
