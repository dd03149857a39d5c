//! Integration tests for decoding and editing against the mock terminal.
//!
//! These tests drive the full read-decode-edit-render loop over scripted
//! bytes and check both the submitted line and what reached the terminal.

use shellkit_core::{
    ConsoleInput, DecodeError, Key, KeyDecoder, LineEditor, PrefixSuggester,
};
use shellkit_io::mock::{mock_output, MockConsoleInput};

/// Run one line through the editor; `None` means end of input.
fn edit_line(input: &MockConsoleInput, editor: &mut LineEditor) -> Option<String> {
    let mut decoder = KeyDecoder::new(input.clone());
    editor.render().unwrap();
    loop {
        let key = match decoder.read_key() {
            Ok(key) => key,
            Err(DecodeError::EndOfStream) => return None,
            Err(e) => panic!("unexpected decode error: {e}"),
        };
        if editor.handle_key(key) {
            if key.is(Key::Enter) {
                return Some(editor.text());
            }
            return None;
        }
        editor.render().unwrap();
    }
}

#[test]
fn test_typed_line_is_submitted() {
    let input = MockConsoleInput::new();
    input.queue_text("echo hello\r");

    let mut editor = LineEditor::new("$ ");
    assert_eq!(edit_line(&input, &mut editor), Some("echo hello".to_string()));
}

#[test]
fn test_arrow_keys_and_insertion() {
    let input = MockConsoleInput::new();
    // "wrld", Left x3, insert 'o', End, '!'
    input.queue_text("wrld");
    input.queue_bytes(b"\x1b[D\x1b[D\x1b[D");
    input.queue_text("o");
    input.queue_bytes(b"\x1b[F!\r");

    let mut editor = LineEditor::new("$ ");
    assert_eq!(edit_line(&input, &mut editor), Some("world!".to_string()));
}

#[test]
fn test_word_editing_keys() {
    let input = MockConsoleInput::new();
    input.queue_text("git commit --amend");
    // Ctrl+W removes "--amend", Alt+b back to "commit", Alt+d deletes it
    input.queue_bytes(&[23]);
    input.queue_bytes(b"\x1bb\x1bd");
    input.queue_text("push");
    input.queue_bytes(b"\r");

    let mut editor = LineEditor::new("$ ");
    assert_eq!(edit_line(&input, &mut editor), Some("git push ".to_string()));
}

#[test]
fn test_ctrl_arrows_and_delete_key() {
    let input = MockConsoleInput::new();
    input.queue_text("one two three");
    input.queue_bytes(b"\x1b[1;5D\x1b[1;5D");
    input.queue_bytes(b"\x1b[3~\x1b[3~\x1b[3~\x1b[3~");
    input.queue_bytes(b"\x1b[1;5C\r");

    let mut editor = LineEditor::new("");
    assert_eq!(edit_line(&input, &mut editor), Some("one three".to_string()));
    assert_eq!(editor.cursor(), 9);
}

#[test]
fn test_multibyte_input() {
    let input = MockConsoleInput::new();
    input.queue_text("héllo 世界");
    input.queue_bytes(&[127, 127]);
    input.queue_text("🦀\r");

    let mut editor = LineEditor::new("");
    assert_eq!(edit_line(&input, &mut editor), Some("héllo 🦀".to_string()));
    assert_eq!(editor.len(), 7);
}

#[test]
fn test_ctrl_d_on_empty_line_ends_input() {
    let input = MockConsoleInput::new();
    input.queue_bytes(&[4]);

    let mut editor = LineEditor::new("$ ");
    assert_eq!(edit_line(&input, &mut editor), None);
}

#[test]
fn test_ctrl_d_on_text_deletes() {
    let input = MockConsoleInput::new();
    input.queue_text("hello");
    input.queue_bytes(&[1, 4, 13]);

    let mut editor = LineEditor::new("$ ");
    assert_eq!(edit_line(&input, &mut editor), Some("ello".to_string()));
}

#[test]
fn test_stream_end_mid_line() {
    let input = MockConsoleInput::new();
    input.queue_text("partial");

    let mut editor = LineEditor::new("$ ");
    assert_eq!(edit_line(&input, &mut editor), None);
    assert_eq!(editor.text(), "partial");
}

#[test]
fn test_lone_escape_then_text() {
    let input = MockConsoleInput::new();
    input.queue_bytes(&[27]);
    input.queue_pause();
    input.queue_text("b\r");

    let mut editor = LineEditor::new("");
    // The pause splits ESC from 'b', so 'b' is typed rather than Alt+b
    assert_eq!(edit_line(&input, &mut editor), Some("b".to_string()));
}

#[test]
fn test_render_output_reaches_terminal() {
    let input = MockConsoleInput::new();
    input.queue_text("ls\r");

    let (output, captured) = mock_output();
    let mut editor = LineEditor::new("$ ");
    editor.attach_output(Box::new(output));
    assert_eq!(edit_line(&input, &mut editor), Some("ls".to_string()));

    let screen = captured.contents();
    assert!(screen.starts_with("\x1b[2K\r$ \r\x1b[2C"), "{screen:?}");
    assert!(screen.ends_with("\x1b[2K\r$ ls\r\x1b[4C"), "{screen:?}");
}

#[test]
fn test_ghost_text_is_rendered_dim() {
    let input = MockConsoleInput::new();
    input.queue_text("car");

    let (output, captured) = mock_output();
    let mut editor = LineEditor::new("$ ");
    editor.set_suggestion_provider(Box::new(PrefixSuggester::new(["cargo test"])));
    editor.attach_output(Box::new(output));
    edit_line(&input, &mut editor);

    assert!(captured
        .contents()
        .ends_with("\x1b[2K\r$ car\x1b[2mgo test\x1b[0m\r\x1b[5C"));
    assert_eq!(editor.text(), "car");
}

#[test]
fn test_raw_mode_scoped_to_line() {
    let input = MockConsoleInput::new();
    input.queue_text("x\r");
    {
        let _guard = input.enable_raw_mode().unwrap();
        assert!(input.is_raw());
        let mut editor = LineEditor::new("");
        edit_line(&input, &mut editor);
    }
    assert!(!input.is_raw());
    assert_eq!(input.restore_count(), 1);
}

#[test]
fn test_raw_mode_restored_after_panic() {
    let input = MockConsoleInput::new();
    let handle = input.clone();
    let result = std::panic::catch_unwind(move || {
        let _guard = input.enable_raw_mode().unwrap();
        panic!("editor crashed");
    });
    assert!(result.is_err());
    assert!(!handle.is_raw());
    assert_eq!(handle.restore_count(), 1);
}
