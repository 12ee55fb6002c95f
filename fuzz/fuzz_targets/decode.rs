#![no_main]

use cilfmt::{disassemble_to_string, formatter::FormatterOptions, MapResolver};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = disassemble_to_string(data, &MapResolver::new(), FormatterOptions::default());
});
