#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use noterelay::fuzz_api::secret_matches;

#[derive(Arbitrary, Debug)]
struct Input {
    expected: String,
    provided: String,
}

fuzz_target!(|input: Input| {
    let matched = secret_matches(&input.expected, &input.provided);
    assert_eq!(matched, input.expected == input.provided);
});
