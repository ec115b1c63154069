#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(requests) = baton::fuzzing::parse_request_list_input(data) {
        for request in &requests {
            debug_assert!(!request.method().as_str().is_empty());
        }
    }
});
