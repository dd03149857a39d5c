//! End-to-end editing scenarios: raw bytes are decoded into keys and fed to
//! the line editor, the same path a terminal session takes.

use shellkit_core::{decode_all, Key, KeyEvent, LineEditor};

/// Feed `bytes` to a fresh editor. Returns the editor and whether a key
/// finished the line.
fn type_bytes(bytes: &[u8]) -> (LineEditor, Option<KeyEvent>) {
    let mut editor = LineEditor::new("$ ");
    for key in decode_all(bytes).unwrap() {
        if editor.handle_key(key) {
            return (editor, Some(key));
        }
    }
    (editor, None)
}

#[test]
fn test_plain_typing_and_enter() {
    let (editor, done) = type_bytes(b"ls -la\r");
    assert_eq!(editor.text(), "ls -la");
    assert_eq!(done, Some(KeyEvent::special(Key::Enter)));
}

#[test]
fn test_keys_after_enter_are_not_consumed() {
    let (editor, done) = type_bytes(b"pwd\nls\r");
    assert_eq!(editor.text(), "pwd");
    assert!(done.unwrap().is(Key::Enter));
}

#[test]
fn test_kill_to_start_and_end() {
    // "hello world", Ctrl+A, Alt+f, Ctrl+K
    let (editor, _) = type_bytes(b"hello world\x01\x1bf\x0b");
    assert_eq!(editor.text(), "hello ");

    // "hello world", Left x5, Ctrl+U
    let (editor, _) = type_bytes(b"hello world\x1b[D\x1b[D\x1b[D\x1b[D\x1b[D\x15");
    assert_eq!(editor.text(), "world");
    assert_eq!(editor.cursor(), 0);
}

#[test]
fn test_home_end_variants() {
    for (home, end) in [
        (&b"\x1b[H"[..], &b"\x1b[F"[..]),
        (&b"\x1bOH"[..], &b"\x1bOF"[..]),
        (&b"\x1b[1~"[..], &b"\x1b[4~"[..]),
        (&b"\x1b[7~"[..], &b"\x1b[8~"[..]),
    ] {
        let mut bytes = b"bc".to_vec();
        bytes.extend_from_slice(home);
        bytes.push(b'a');
        bytes.extend_from_slice(end);
        bytes.push(b'd');
        let (editor, _) = type_bytes(&bytes);
        assert_eq!(editor.text(), "abcd", "{home:?} {end:?}");
    }
}

#[test]
fn test_word_motion_scenario() {
    // "hello   world", Ctrl+Left from the end lands on the second word
    let (mut editor, _) = type_bytes(b"hello   world\x1b[1;5D");
    assert_eq!(editor.cursor(), 8);

    editor.set_cursor(5);
    editor.move_word_right();
    assert_eq!(editor.cursor(), 8);
}

#[test]
fn test_forward_and_backward_word_deletion() {
    let (editor, _) = type_bytes(b"hello world\x01\x1bd");
    assert_eq!(editor.text(), " world");

    let (editor, _) = type_bytes(b"hello world\x17");
    assert_eq!(editor.text(), "hello ");
}

#[test]
fn test_ctrl_d_behaviour() {
    let (_, done) = type_bytes(b"\x04");
    assert!(done.unwrap().is(Key::ControlD));

    let (editor, done) = type_bytes(b"hello\x01\x04");
    assert_eq!(editor.text(), "ello");
    assert_eq!(done, None);
}

#[test]
fn test_unicode_editing() {
    let (editor, _) = type_bytes("naïve café\x7f\x7f".as_bytes());
    assert_eq!(editor.text(), "naïve ca");
    assert_eq!(editor.len(), 8);
}

#[test]
fn test_garbage_sequences_do_not_disturb_text() {
    let (editor, _) = type_bytes(b"ab\x1b[5~\x1b[Z\x1bOPcd");
    // Each unsupported sequence decodes to a single Escape
    assert_eq!(editor.text(), "abcd");
}
