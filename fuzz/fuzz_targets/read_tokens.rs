#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut r = hashcode_io::reader::TokenReader::new(data);
    // stops at the first error, including end of input
    while let Ok(token) = r.read_token() {
        let _ = token.parse::<i64>();
        let _ = r.read_bool();
    }
    let _ = r.close();
});
