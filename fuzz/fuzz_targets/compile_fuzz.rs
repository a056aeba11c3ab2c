#![no_main]
use libfuzzer_sys::fuzz_target;

// Arbitrary text must either compile or return a structured error; panics
// and hangs are bugs.
fuzz_target!(|data: &[u8]| {
    if let Ok(source) = std::str::from_utf8(data) {
        let _ = pegra::compile(source);
    }
});
