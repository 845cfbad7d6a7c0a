#![no_main]

use libfuzzer_sys::fuzz_target;

use aja_tools::job::{find_recipe_names, parse_segments, Job};

fuzz_target!(|data: &[u8]| {
    if let Ok(segments) = parse_segments(data) {
        for pair in segments.windows(2) {
            assert_eq!(pair[0].offset + pair[0].bytes.len(), pair[1].offset);
        }
    }
    let _ = Job::from_bytes("fuzz", data);

    let text = String::from_utf8_lossy(data);
    let _ = find_recipe_names(&text, &["Au", "Au_thick", "Ti"]);
});
