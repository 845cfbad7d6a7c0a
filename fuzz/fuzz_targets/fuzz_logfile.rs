#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

use aja_tools::align::{align, AlignConfig};
use aja_tools::logfile::LogfileReader;
use aja_tools::recipe::RecipeCatalog;

const CATALOG: &str = r#"
[[recipe]]
name = "any"

[[recipe.step]]
targets = { "power" = { min = 0.0, max = 100.0 } }
"#;

fuzz_target!(|data: &[u8]| {
    // Loading must fail with an error, never panic
    let Ok(timeline) = LogfileReader::new().read(Cursor::new(data)) else {
        return;
    };

    // Whatever loads must keep its ordering invariant
    for pair in timeline.samples().windows(2) {
        assert!(pair[0].timestamp < pair[1].timestamp);
    }

    if timeline.channels().contains("power") {
        if let Ok(catalog) = RecipeCatalog::from_toml_str(CATALOG) {
            let _ = align(&timeline, &catalog, &AlignConfig::default());
        }
    }
});
