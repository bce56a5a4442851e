// SPDX-License-Identifier: PMPL-1.0-or-later
//
// Fuzz target for LIKE translation.
// Run with: cargo +nightly fuzz run fuzz_like_factory
//
// Whatever the user types, the query must stay on its own field and the
// two presence marker fields.

#![no_main]

use jqlix_query::{
    LikeQueryFactory, Operator, OperatorSpecificQueryFactory, QueryLiteral, NON_EMPTY_FIELD_IDS, VISIBLE_FIELD_IDS,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if input.len() <= 4096 {
            let factory = LikeQueryFactory::default();
            for operator in [Operator::Like, Operator::NotLike] {
                let result =
                    factory.create_query_for_single_value("description", operator, &[QueryLiteral::Text(input.to_string())]);
                for field in result.query().fields() {
                    assert!(
                        field == "description" || field == NON_EMPTY_FIELD_IDS || field == VISIBLE_FIELD_IDS,
                        "escaped to field {field}"
                    );
                }
            }
        }
    }
});
