#![no_main]

use libfuzzer_sys::fuzz_target;
use stagetimer::api::{StatusSnapshot, UploadsLocation};
use stagetimer::viewer::ViewerRenderer;

fuzz_target!(|data: &[u8]| {
    // Any decodable status response must render without panicking
    if let Ok(s) = std::str::from_utf8(data)
        && let Ok(snapshot) = StatusSnapshot::from_json_str(s)
        && let Ok(url) = "http://127.0.0.1:5000/static/uploads".parse()
    {
        let mut renderer = ViewerRenderer::new(UploadsLocation::new(url));
        let _ = renderer.apply(&snapshot).render_text_lines();
    }
});
