#![no_main]

use hashcode_io::ReadError;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut r = hashcode_io::reader::TokenReader::new(data);
    let mut last = 0;
    let end = loop {
        match r.next_line_tokens() {
            Ok(_) => {
                assert_eq!(r.line_number(), last + 1);
                last = r.line_number();
            }
            Err(e) => break e,
        }
    };
    // invalid UTF-8 surfaces as an IO error and may leave lines behind
    if matches!(end, ReadError::EndOfInput { .. }) {
        assert!(r.close().is_ok());
    }
});
