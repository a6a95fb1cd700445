// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Plantscribe-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Plantscribe and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Label escaping.
//!
//! PlantUML's escape character is `~`: `~x` renders `x` literally. Labels are escaped against
//! two hazards: creole markup (`**bold**`, `//italic//`, `--strike--`, `__under__`, `""mono""`,
//! `==`, `[[links]]`, HTML-style tags such as `<b>`, `<color:red>`, `<&icon>` and `<:emoji:>`,
//! list and heading markers at the start of a line) and the terminators of the production the
//! label sits in (`;` after an action, `)` inside `if (...)`, `|` in a swimlane). Single-line
//! positions also encode line breaks as `\n`, so every backslash is doubled.

/// Characters that toggle creole styling when doubled.
const CREOLE_PAIRS: &[char] = &['*', '/', '"', '-', '_', '=', '['];

/// Characters that start a list or heading when they lead a line.
const LINE_LEADERS: &[char] = &['*', '#', '='];

/// Class members additionally start with visibility markers, `{modifier}` and separator rules
/// (`..`, `--`, `__`, `==`).
const MEMBER_LEADERS: &[char] = &['*', '#', '=', '.', '-', '_', '+', '{'];

/// Where a label is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Context {
    /// Escaped wherever they occur.
    terminators: &'static [char],
    /// Escaped only as the final character.
    trailing: &'static [char],
    /// Escaped when they start a line.
    leaders: &'static [char],
    /// Lines are kept as real line breaks (note and legend bodies).
    multiline: bool,
    /// HTML-style tags pass through unescaped.
    markup: bool,
}

impl Context {
    const fn single(terminators: &'static [char], trailing: &'static [char]) -> Self {
        Self { terminators, trailing, leaders: LINE_LEADERS, multiline: false, markup: false }
    }
}

/// Free text after a `:` separator (messages, transitions, relations).
pub(crate) const LABEL: Context = Context::single(&[], &[]);
/// Action text between `:` and its shape terminator.
pub(crate) const ACTION: Context = Context::single(&[], &[';', '|', '<', '>', '/', ']', '}']);
/// Inside `( ... )`.
pub(crate) const PAREN: Context = Context::single(&['(', ')'], &[]);
/// Inside `"..."`.
pub(crate) const QUOTED: Context = Context::single(&['"'], &[]);
/// Inside `|...|`.
pub(crate) const PIPE: Context = Context::single(&['|'], &[]);
/// Inside `<< ... >>`.
pub(crate) const STEREOTYPE: Context = Context::single(&['>'], &[]);
/// One class member line inside `{ ... }`.
pub(crate) const MEMBER: Context = Context { leaders: MEMBER_LEADERS, ..LABEL };
/// Inside `"..."` where markup is meant to render, such as an autonumber format.
pub(crate) const FORMAT: Context = Context { markup: true, ..QUOTED };
/// Body lines of `note ... end note` and `legend ... endlegend`.
pub(crate) const BLOCK: Context = Context { multiline: true, ..LABEL };

pub(crate) fn escape_into(out: &mut String, text: &str, ctx: Context) {
    let chars: Vec<char> = text.chars().collect();
    let mut line_start = true;
    for (idx, &ch) in chars.iter().enumerate() {
        match ch {
            '\n' => {
                out.push_str(if ctx.multiline { "\n" } else { "\\n" });
                line_start = true;
                continue;
            }
            '\r' => {
                out.push_str("\\r");
                continue;
            }
            '\\' => out.push_str("\\\\"),
            '~' => out.push_str("~~"),
            ' ' | '\t' => out.push(ch),
            _ => {
                let doubled = CREOLE_PAIRS.contains(&ch)
                    && ((idx > 0 && chars[idx - 1] == ch) || chars.get(idx + 1) == Some(&ch));
                let leads = line_start
                    && (ctx.leaders.contains(&ch)
                        || (ctx.multiline && starts_keyword(&chars[idx..], "end")));
                let opens_tag =
                    ch == '<' && !ctx.markup && chars.get(idx + 1).is_some_and(opens_markup);
                let last = idx + 1 == chars.len();
                if doubled
                    || leads
                    || opens_tag
                    || ctx.terminators.contains(&ch)
                    || (last && ctx.trailing.contains(&ch))
                {
                    out.push('~');
                }
                out.push(ch);
            }
        }
        if !matches!(ch, ' ' | '\t') {
            line_start = false;
        }
    }
}

/// Whether a character right after `<` turns it into a tag: `<b>`, `</b>`, `<&icon>`, `<:emoji:>`.
fn opens_markup(next: &char) -> bool {
    next.is_ascii_alphabetic() || matches!(next, '/' | '&' | ':')
}

fn starts_keyword(rest: &[char], keyword: &str) -> bool {
    rest.len() >= keyword.len() && rest.iter().zip(keyword.chars()).all(|(a, b)| *a == b)
}

/// Inverts label escaping: `~x` becomes `x`, `\n`, `\r` and `\\` are decoded.
///
/// Other backslash sequences are kept as written.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '~' => out.push(chars.next().unwrap_or('~')),
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('\\') => out.push('\\'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            },
            _ => out.push(ch),
        }
    }
    out
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    const CONTEXTS: [Context; 9] =
        [LABEL, ACTION, PAREN, QUOTED, PIPE, STEREOTYPE, MEMBER, FORMAT, BLOCK];

    /// Pieces that collide with markup, terminators or the escape scheme itself.
    const FRAGMENTS: &[&str] = &[
        "~", "\\", "\\n", "\n", "\r", "*", "/", "\"", "-", "_", "=", "[", "]", "<", ">", "<b>",
        "</b>", "<&", "<:", "[[", "..", "#", "+", "{", ";", "|", "(", ")", "end", " ", "x", "✓",
    ];

    // ===================
    // Strategies
    // ===================

    fn text_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            any::<String>(),
            prop::collection::vec(prop::sample::select(FRAGMENTS), 0..24)
                .prop_map(|parts| parts.concat()),
        ]
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Whether escaped output still holds an unescaped tag opener or link opener.
    fn bare_markup(out: &str) -> bool {
        let mut chars = out.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '~' => {
                    chars.next();
                }
                '<' if chars.peek().is_some_and(opens_markup) => return true,
                '[' if chars.peek() == Some(&'[') => return true,
                _ => {}
            }
        }
        false
    }

    /// Unescaping the output of any context yields the original text.
    fn check_unescape_inverts_escape(text: &str) -> Result<(), TestCaseError> {
        for ctx in CONTEXTS {
            let mut out = String::new();
            escape_into(&mut out, text, ctx);
            prop_assert_eq!(unescape(&out), text);
            if !ctx.multiline {
                prop_assert!(!out.contains(['\n', '\r']));
            }
            if !ctx.markup {
                prop_assert!(!bare_markup(&out), "markup survived in {:?}", out);
            }
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn unescape_inverts_escape(text in text_strategy()) {
            check_unescape_inverts_escape(&text)?;
        }
    }
}
