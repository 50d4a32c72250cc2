//! Key encoding: crossterm key events to the byte sequences an xterm sends.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Encode a key press as terminal input, or `None` for keys that produce
/// no input (bare modifiers, media keys, ...).
pub fn encode_key(event: &KeyEvent) -> Option<String> {
    let mods = event.modifiers;
    let alt = mods.contains(KeyModifiers::ALT);

    let seq = match event.code {
        KeyCode::Char(ch) => return Some(encode_char(ch, mods)),
        KeyCode::Enter => "\r".to_string(),
        KeyCode::Tab => "\t".to_string(),
        KeyCode::BackTab => "\x1b[Z".to_string(),
        KeyCode::Backspace => "\x7f".to_string(),
        KeyCode::Esc => "\x1b".to_string(),

        KeyCode::Up => cursor_key('A', mods),
        KeyCode::Down => cursor_key('B', mods),
        KeyCode::Right => cursor_key('C', mods),
        KeyCode::Left => cursor_key('D', mods),
        KeyCode::Home => cursor_key('H', mods),
        KeyCode::End => cursor_key('F', mods),

        KeyCode::Insert => tilde_key(2, mods),
        KeyCode::Delete => tilde_key(3, mods),
        KeyCode::PageUp => tilde_key(5, mods),
        KeyCode::PageDown => tilde_key(6, mods),

        KeyCode::F(n) => function_key(n, mods)?,

        _ => return None,
    };

    // Alt prefixes ESC only onto the single-byte keys; the CSI forms
    // already carry it in their modifier parameter.
    let single_byte = matches!(
        event.code,
        KeyCode::Enter | KeyCode::Tab | KeyCode::Backspace | KeyCode::Esc
    );
    if alt && single_byte {
        return Some(format!("\x1b{seq}"));
    }
    Some(seq)
}

fn encode_char(ch: char, mods: KeyModifiers) -> String {
    let ctrl = mods.contains(KeyModifiers::CONTROL);
    let alt = mods.contains(KeyModifiers::ALT);

    let base = if ctrl {
        control_char(ch).map(String::from).unwrap_or_else(|| ch.to_string())
    } else {
        ch.to_string()
    };

    if alt {
        format!("\x1b{base}")
    } else {
        base
    }
}

/// The C0 control character for Ctrl+`ch`, if there is one.
fn control_char(ch: char) -> Option<char> {
    let code = match ch {
        'a'..='z' => ch as u8 - b'a' + 1,
        'A'..='Z' => ch as u8 - b'A' + 1,
        '@' | ' ' | '`' | '2' => 0x00,
        '[' | '3' => 0x1b,
        '\\' | '4' => 0x1c,
        ']' | '5' => 0x1d,
        '^' | '~' | '6' => 0x1e,
        '_' | '/' | '7' => 0x1f,
        '?' | '8' => 0x7f,
        _ => return None,
    };
    Some(char::from(code))
}

/// xterm modifier parameter: 1 + shift(1) + alt(2) + ctrl(4).
fn modifier_param(mods: KeyModifiers) -> u8 {
    let mut param = 1;
    if mods.contains(KeyModifiers::SHIFT) {
        param += 1;
    }
    if mods.contains(KeyModifiers::ALT) {
        param += 2;
    }
    if mods.contains(KeyModifiers::CONTROL) {
        param += 4;
    }
    param
}

fn cursor_key(key: char, mods: KeyModifiers) -> String {
    match modifier_param(mods) {
        1 => format!("\x1b[{key}"),
        param => format!("\x1b[1;{param}{key}"),
    }
}

fn tilde_key(code: u8, mods: KeyModifiers) -> String {
    match modifier_param(mods) {
        1 => format!("\x1b[{code}~"),
        param => format!("\x1b[{code};{param}~"),
    }
}

fn function_key(n: u8, mods: KeyModifiers) -> Option<String> {
    let param = modifier_param(mods);
    let ss3 = |key: char| {
        if param == 1 {
            format!("\x1bO{key}")
        } else {
            format!("\x1b[1;{param}{key}")
        }
    };

    let seq = match n {
        1 => ss3('P'),
        2 => ss3('Q'),
        3 => ss3('R'),
        4 => ss3('S'),
        5 => tilde_key(15, mods),
        6 => tilde_key(17, mods),
        7 => tilde_key(18, mods),
        8 => tilde_key(19, mods),
        9 => tilde_key(20, mods),
        10 => tilde_key(21, mods),
        11 => tilde_key(23, mods),
        12 => tilde_key(24, mods),
        _ => return None,
    };
    Some(seq)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn plain(code: KeyCode) -> Option<String> {
        encode_key(&key(code, KeyModifiers::NONE))
    }

    #[test]
    fn printable_characters() {
        assert_eq!(plain(KeyCode::Char('a')).as_deref(), Some("a"));
        assert_eq!(
            encode_key(&key(KeyCode::Char('A'), KeyModifiers::SHIFT)).as_deref(),
            Some("A")
        );
        assert_eq!(plain(KeyCode::Char('é')).as_deref(), Some("é"));
    }

    #[test]
    fn control_characters() {
        assert_eq!(
            encode_key(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)).as_deref(),
            Some("\x03")
        );
        assert_eq!(
            encode_key(&key(KeyCode::Char('d'), KeyModifiers::CONTROL)).as_deref(),
            Some("\x04")
        );
        assert_eq!(
            encode_key(&key(KeyCode::Char(' '), KeyModifiers::CONTROL)).as_deref(),
            Some("\0")
        );
        assert_eq!(
            encode_key(&key(KeyCode::Char(']'), KeyModifiers::CONTROL)).as_deref(),
            Some("\x1d")
        );
    }

    #[test]
    fn alt_prefixes_escape() {
        assert_eq!(
            encode_key(&key(KeyCode::Char('b'), KeyModifiers::ALT)).as_deref(),
            Some("\x1bb")
        );
        assert_eq!(
            encode_key(&key(KeyCode::Backspace, KeyModifiers::ALT)).as_deref(),
            Some("\x1b\x7f")
        );
    }

    #[test]
    fn editing_keys() {
        assert_eq!(plain(KeyCode::Enter).as_deref(), Some("\r"));
        assert_eq!(plain(KeyCode::Tab).as_deref(), Some("\t"));
        assert_eq!(plain(KeyCode::BackTab).as_deref(), Some("\x1b[Z"));
        assert_eq!(plain(KeyCode::Backspace).as_deref(), Some("\x7f"));
        assert_eq!(plain(KeyCode::Esc).as_deref(), Some("\x1b"));
    }

    #[test]
    fn cursor_keys() {
        assert_eq!(plain(KeyCode::Up).as_deref(), Some("\x1b[A"));
        assert_eq!(plain(KeyCode::Left).as_deref(), Some("\x1b[D"));
        assert_eq!(plain(KeyCode::Home).as_deref(), Some("\x1b[H"));
        assert_eq!(
            encode_key(&key(KeyCode::Right, KeyModifiers::CONTROL)).as_deref(),
            Some("\x1b[1;5C")
        );
        assert_eq!(
            encode_key(&key(
                KeyCode::Up,
                KeyModifiers::SHIFT | KeyModifiers::ALT
            ))
            .as_deref(),
            Some("\x1b[1;4A")
        );
    }

    #[test]
    fn tilde_keys() {
        assert_eq!(plain(KeyCode::Delete).as_deref(), Some("\x1b[3~"));
        assert_eq!(plain(KeyCode::PageDown).as_deref(), Some("\x1b[6~"));
        assert_eq!(
            encode_key(&key(KeyCode::PageUp, KeyModifiers::SHIFT)).as_deref(),
            Some("\x1b[5;2~")
        );
    }

    #[test]
    fn function_keys() {
        assert_eq!(plain(KeyCode::F(1)).as_deref(), Some("\x1bOP"));
        assert_eq!(plain(KeyCode::F(5)).as_deref(), Some("\x1b[15~"));
        assert_eq!(plain(KeyCode::F(12)).as_deref(), Some("\x1b[24~"));
        assert_eq!(
            encode_key(&key(KeyCode::F(2), KeyModifiers::CONTROL)).as_deref(),
            Some("\x1b[1;5Q")
        );
        assert_eq!(plain(KeyCode::F(13)), None);
    }

    #[test]
    fn keys_without_input() {
        assert_eq!(plain(KeyCode::CapsLock), None);
        assert_eq!(plain(KeyCode::Null), None);
    }
}
