//
// Colors
//

pub const C1: &str = "EEA5A6";

//
// Language
//

// `class`, `super` and `this` are reserved without grammar: the scanner tags
// them as keywords, the parser rejects them, panic-mode recovery uses them
// as statement boundaries.
pub const KEYWORDS: &[&str] = &[
    "and", "class", "else", "false", "for", "fun", "if", "nil", "or", "print", "return", "super",
    "this", "true", "var", "while",
];
