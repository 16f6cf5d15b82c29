use std::collections::HashSet;

/// How the head token of a list shapes the indentation of its body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadClass {
    /// `do` / `do*`: three-part layout with the body aligned under the
    /// bindings list.
    DoLoop,
    /// Binding/control forms, definers, and `with-` wrappers: body indents
    /// one unit past the opening delimiter.
    Body,
    /// Ordinary function call: arguments align under the second element.
    Call,
}

/// Per-language-mode classification data consumed by the indentation
/// engine.
///
/// This is plain data rather than dispatch: the token set and prefix rules
/// are the only per-mode variability the engine needs, so an editor mode
/// (or the user's config file) supplies a table instead of subclassing
/// anything.
#[derive(Debug, Clone)]
pub struct ModeConfig {
    /// Columns added per nesting level for body-style forms.
    pub indent_unit: usize,
    /// Tokens whose body indents at a fixed offset.
    pub special_forms: HashSet<String>,
    /// Tokens starting with this prefix are definers (body-style).
    pub definer_prefix: String,
    /// Tokens starting with this prefix are wrapper macros (body-style).
    pub body_prefix: String,
}

impl ModeConfig {
    pub fn classify(&self, token: &str) -> HeadClass {
        if token == "do" || token == "do*" {
            HeadClass::DoLoop
        } else if token.starts_with(&self.definer_prefix)
            || token.starts_with(&self.body_prefix)
            || self.special_forms.contains(token)
        {
            HeadClass::Body
        } else {
            HeadClass::Call
        }
    }
}

impl Default for ModeConfig {
    fn default() -> Self {
        let special_forms = [
            "block",
            "case",
            "catch",
            "cond",
            "destructuring-bind",
            "dolist",
            "dotimes",
            "ecase",
            "etypecase",
            "eval-when",
            "flet",
            "handler-case",
            "if",
            "labels",
            "lambda",
            "let",
            "let*",
            "loop",
            "macrolet",
            "multiple-value-bind",
            "prog1",
            "prog2",
            "progn",
            "typecase",
            "unless",
            "unwind-protect",
            "when",
        ]
        .into_iter()
        .map(str::to_owned)
        .collect();

        Self {
            indent_unit: 2,
            special_forms,
            definer_prefix: "def".to_owned(),
            body_prefix: "with-".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn do_forms_are_structural() {
        let mode = ModeConfig::default();
        assert_eq!(mode.classify("do"), HeadClass::DoLoop);
        assert_eq!(mode.classify("do*"), HeadClass::DoLoop);
        // not a prefix rule
        assert_eq!(mode.classify("dolist"), HeadClass::Body);
    }

    #[test]
    fn definer_and_wrapper_prefixes() {
        let mode = ModeConfig::default();
        assert_eq!(mode.classify("defun"), HeadClass::Body);
        assert_eq!(mode.classify("defmacro"), HeadClass::Body);
        assert_eq!(mode.classify("with-open-file"), HeadClass::Body);
    }

    #[test]
    fn set_members_are_body_forms() {
        let mode = ModeConfig::default();
        assert_eq!(mode.classify("let"), HeadClass::Body);
        assert_eq!(mode.classify("unwind-protect"), HeadClass::Body);
    }

    #[test]
    fn unknown_tokens_are_calls() {
        let mode = ModeConfig::default();
        assert_eq!(mode.classify("format"), HeadClass::Call);
        assert_eq!(mode.classify("+"), HeadClass::Call);
    }

    #[test]
    fn user_extensions_take_effect() {
        let mut mode = ModeConfig::default();
        mode.special_forms.insert("my-macro".to_owned());
        assert_eq!(mode.classify("my-macro"), HeadClass::Body);
    }
}
