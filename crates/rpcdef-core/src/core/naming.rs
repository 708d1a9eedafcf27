// crates/rpcdef-core/src/core/naming.rs
// ============================================================================
// Module: Naming Helpers
// Description: Identifier case conversion and visibility rules.
// Purpose: Derive lower-camel display names and exportedness from identifiers.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Renderers address methods, fields, and types by a lower-camel variant of
//! the declared identifier. Leading acronym runs are folded as a unit so that
//! `ID` becomes `id` and `URLValue` becomes `urlValue`.

// ============================================================================
// SECTION: Case Conversion
// ============================================================================

/// Converts an identifier to lower camel case.
///
/// # Examples
/// ```
/// use rpcdef_core::naming::camelize_down;
///
/// assert_eq!(camelize_down("GreetRequest"), "greetRequest");
/// assert_eq!(camelize_down("ID"), "id");
/// assert_eq!(camelize_down("URLValue"), "urlValue");
/// ```
#[must_use]
pub fn camelize_down(identifier: &str) -> String {
    let chars: Vec<char> = identifier.chars().collect();
    let upper_run = chars.iter().take_while(|ch| ch.is_uppercase()).count();
    let fold = match upper_run {
        0 => 0,
        run if run == chars.len() => run,
        1 => 1,
        run => {
            // Keep the last capital when it starts the next word.
            let next_is_lower = chars.get(run).is_some_and(|ch| ch.is_lowercase());
            if next_is_lower { run - 1 } else { run }
        }
    };
    let mut out = String::with_capacity(identifier.len());
    for (index, ch) in chars.iter().enumerate() {
        if index < fold {
            out.extend(ch.to_lowercase());
        } else {
            out.push(*ch);
        }
    }
    out
}

// ============================================================================
// SECTION: Visibility
// ============================================================================

/// Returns true when the identifier is externally visible (starts uppercase).
#[must_use]
pub fn is_exported(identifier: &str) -> bool {
    identifier.chars().next().is_some_and(char::is_uppercase)
}
