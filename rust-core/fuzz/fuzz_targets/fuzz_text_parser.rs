// SPDX-License-Identifier: PMPL-1.0-or-later
//
// Fuzz target for the free-text query parser.
// Run with: cargo +nightly fuzz run fuzz_text_parser
//
// Arbitrary UTF-8 must be rejected with an error, never a panic or hang.

#![no_main]

use jqlix_query::{TextAnalysis, TextQueryParser};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if input.len() <= 4096 {
            let parser = TextQueryParser::new(TextAnalysis::default());
            let _ = parser.parse("summary", input);
        }
    }
});
