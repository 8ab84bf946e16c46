#![no_main]

use std::path::Path;

use declpack::domain::services::rebase_sources;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Malformed maps must surface as errors, not panics
        let _ = rebase_sources(content, Path::new("/p/dist/a"), Path::new("/p/types"));
    }
});
